//! First-run sample data.
//!
//! A fresh deployment has nothing to browse, so when the schools table is
//! empty we load a small directory of real Liberian institutions along with
//! contacts, features, a few testimonials and gallery entries.

use anyhow::Result;
use sqlx::PgPool;

struct SeedSchool {
    id: &'static str,
    name: &'static str,
    school_type: &'static str,
    county: &'static str,
    location: &'static str,
    description: &'static str,
    founded: i32,
    students: i32,
    rating: f64,
    image: &'static str,
    email: &'static str,
    phone: &'static str,
    address: &'static str,
    features: &'static [&'static str],
}

const SEED_SCHOOLS: &[SeedSchool] = &[
    SeedSchool {
        id: "1",
        name: "Muslim Congress High School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Mechlin Street, Monrovia",
        description: "A premier institution providing quality education that blends the national curriculum with Islamic values. We produce disciplined, morally upright, and academically sound future leaders.",
        founded: 1960,
        students: 1500,
        rating: 4.8,
        image: "https://picsum.photos/800/600?random=10",
        email: "info@muslimcongress.edu.lr",
        phone: "+231 777 111 222",
        address: "Mechlin Street, Monrovia",
        features: &["Mosque on Campus", "Arabic Classes", "Science Labs", "Debate Club"],
    },
    SeedSchool {
        id: "2",
        name: "Sekou I Sherf High School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Gardnersville, Monrovia",
        description: "Liberia's leading Islamic higher education institution. We offer degree programs in Theology, Arabic Language, Education, and Business Administration within a faith-based environment.",
        founded: 2005,
        students: 2200,
        rating: 4.6,
        image: "https://picsum.photos/800/600?random=11",
        email: "admissions@sis.edu.lr",
        phone: "+231 886 999 000",
        address: "Gardnersville, Somalia Drive",
        features: &["Sharia Law Faculty", "Library", "Student Housing", "Scholarship Programs"],
    },
    SeedSchool {
        id: "3",
        name: "A.M. Fofana High School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Sinkor, Monrovia",
        description: "An integrated school offering both secular and Islamic education. Our focus is on raising children who are competitive globally while remaining steadfast in their deen.",
        founded: 1985,
        students: 850,
        rating: 4.5,
        image: "https://picsum.photos/800/600?random=12",
        email: "amfofana@islamic.edu.lr",
        phone: "+231 770 555 444",
        address: "Vai Town, Bushrod Island",
        features: &["Dual Curriculum", "Computer Lab", "Islamic History", "Sports"],
    },
    SeedSchool {
        id: "4",
        name: "Dawah Ummah High School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Monrovia, Montserrado County",
        description: "Dedicated specifically to the memorization of the Holy Quran. We provide boarding facilities for students from across the country to focus entirely on Hifz.",
        founded: 1998,
        students: 300,
        rating: 4.9,
        image: "https://picsum.photos/800/600?random=13",
        email: "info@darulquran.lr",
        phone: "+231 888 222 333",
        address: "Gbarnga City, Bong",
        features: &["Full Boarding", "Tajweed Expert Tutors", "Moral Etiquette", "Halal Meals"],
    },
    SeedSchool {
        id: "5",
        name: "Jafariayah Islamic School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Lynch Street, Monrovia",
        description: "Serving the community of Lofa with excellence. We provide K-12 education with a strong emphasis on discipline, Arabic literacy, and community service.",
        founded: 1975,
        students: 1100,
        rating: 4.4,
        image: "https://picsum.photos/800/600?random=14",
        email: "jafariayah@edu.lr",
        phone: "+231 776 123 789",
        address: "Monrovia, Liberia",
        features: &["Agricultural Program", "Arabic Fluency", "Community Masjid"],
    },
    SeedSchool {
        id: "6",
        name: "Fanima High School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Clara Town, Monrovia",
        description: "Empowering youth with technical skills in carpentry, masonry, and electronics, guided by Islamic principles of honest work and trade.",
        founded: 2010,
        students: 450,
        rating: 4.3,
        image: "https://picsum.photos/800/600?random=15",
        email: "fanima@nimba.lr",
        phone: "+231 555 666 777",
        address: "Clara Town, Monrovia",
        features: &["Technical Workshops", "Entrepreneurship", "Prayer Hall"],
    },
    SeedSchool {
        id: "7",
        name: "Salim Bakhit High School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Sinkor, Monrovia",
        description: "An all-girls Islamic institution focused on empowering young Muslim women through rigorous academic and spiritual education.",
        founded: 1992,
        students: 600,
        rating: 4.7,
        image: "https://picsum.photos/800/600?random=16",
        email: "admissions@khadija.edu.lr",
        phone: "+231 777 999 888",
        address: "15th Street Sinkor, Beachside",
        features: &["All-Girls Environment", "Hijab Friendly", "Science & Arts", "Home Economics"],
    },
    SeedSchool {
        id: "8",
        name: "Salafia Grammar High School",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Front Street, Monrovia",
        description: "A large network of schools providing affordable, high-quality Islamic and secular education to the residents of Margibi County.",
        founded: 1980,
        students: 1800,
        rating: 4.2,
        image: "https://picsum.photos/800/600?random=17",
        email: "admin@salafia.edu.lr",
        phone: "+231 886 111 000",
        address: "Front Street, Monrovia",
        features: &["Large Campus", "Bus Service", "Quranic Competition"],
    },
    SeedSchool {
        id: "9",
        name: "PSI",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Caldwell, Monrovia",
        description: "Lighting the way for the next generation. We focus on STEM education integrated with Quranic studies.",
        founded: 2015,
        students: 400,
        rating: 4.5,
        image: "https://picsum.photos/800/600?random=18",
        email: "annoor@academy.lr",
        phone: "+231 775 555 123",
        address: "Caldwell Road, Montserrado",
        features: &["Robotics Club", "Hifz Program", "Modern Playground"],
    },
    SeedSchool {
        id: "10",
        name: "UISL",
        school_type: "HIGH_SCHOOL",
        county: "MONTSERRADO",
        location: "Monrovia, Montserrado County",
        description: "A sanctuary for learning and spiritual growth in the heart of Buchanan. We offer intensive Arabic and Islamic studies courses.",
        founded: 2000,
        students: 250,
        rating: 4.6,
        image: "https://picsum.photos/800/600?random=19",
        email: "contact@hidayah.lr",
        phone: "+231 880 123 456",
        address: "Monrovia, Montserrado",
        features: &["Intensive Arabic", "Islamic Studies", "Quiet Study Halls"],
    },
];

const SEED_TESTIMONIALS: &[(&str, &str, &str, &str)] = &[
    (
        "1",
        "Aisha Kamara",
        "Parent",
        "Wonderful environment and excellent teachers. My child improved significantly.",
    ),
    (
        "1",
        "Mohamed J.",
        "Alumnus",
        "The school prepared me well for university and instilled strong values.",
    ),
    (
        "2",
        "Fatmata S.",
        "Parent",
        "Competent staff and a strong academic program.",
    ),
];

const SEED_GALLERY: &[(&str, &str, &str)] = &[
    ("1", "https://picsum.photos/1200/800?random=101", "Main campus building"),
    ("1", "https://picsum.photos/1200/800?random=102", "Students during assembly"),
    ("2", "https://picsum.photos/1200/800?random=103", "Library and study area"),
];

/// Loads sample data when the schools table is empty. Returns the number of
/// schools inserted; zero means the database already had data.
pub async fn seed_if_empty(pool: &PgPool) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schools")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;

    for school in SEED_SCHOOLS {
        sqlx::query(
            "INSERT INTO schools (id, name, type, county, location, description, founded, students, rating, image)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(school.id)
        .bind(school.name)
        .bind(school.school_type)
        .bind(school.county)
        .bind(school.location)
        .bind(school.description)
        .bind(school.founded)
        .bind(school.students)
        .bind(school.rating)
        .bind(school.image)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO school_contacts (school_id, email, phone, address) VALUES ($1, $2, $3, $4)",
        )
        .bind(school.id)
        .bind(school.email)
        .bind(school.phone)
        .bind(school.address)
        .execute(&mut *tx)
        .await?;

        for feature in school.features {
            sqlx::query("INSERT INTO school_features (school_id, feature) VALUES ($1, $2)")
                .bind(school.id)
                .bind(feature)
                .execute(&mut *tx)
                .await?;
        }
    }

    for (school_id, author, title, text) in SEED_TESTIMONIALS {
        sqlx::query(
            "INSERT INTO school_testimonials (school_id, author, title, text) VALUES ($1, $2, $3, $4)",
        )
        .bind(school_id)
        .bind(author)
        .bind(title)
        .bind(text)
        .execute(&mut *tx)
        .await?;
    }

    for (school_id, url, caption) in SEED_GALLERY {
        sqlx::query("INSERT INTO school_gallery (school_id, url, caption) VALUES ($1, $2, $3)")
            .bind(school_id)
            .bind(url)
            .bind(caption)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(SEED_SCHOOLS.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::school::{County, SchoolType};
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn seed_ids_are_unique() {
        let ids: HashSet<&str> = SEED_SCHOOLS.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), SEED_SCHOOLS.len());
    }

    #[test]
    fn seed_rows_use_known_enum_tokens() {
        for school in SEED_SCHOOLS {
            SchoolType::from_str(school.school_type).unwrap();
            County::from_str(school.county).unwrap();
        }
    }

    #[test]
    fn testimonials_and_gallery_reference_seeded_schools() {
        let ids: HashSet<&str> = SEED_SCHOOLS.iter().map(|s| s.id).collect();
        for (school_id, ..) in SEED_TESTIMONIALS {
            assert!(ids.contains(school_id));
        }
        for (school_id, ..) in SEED_GALLERY {
            assert!(ids.contains(school_id));
        }
    }
}
