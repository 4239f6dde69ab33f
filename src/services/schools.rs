use chrono::Utc;
use sqlx::PgPool;

use crate::models::school::{
    Contact, GalleryItem, LeadershipInput, LeadershipMember, LeadershipPatch, NewSchool, Person,
    PersonPatch, School, SchoolRow, SchoolUpdate, Testimonial,
};

const SCHOOL_COLS: &str =
    "id, name, type, county, location, description, mission, vision, core_values,
     founded, students, rating, image, hero_image, logo, website, theme,
     created_at, updated_at";

const PERSON_COLS: &str = "id, school_id, name, role, bio, image, display_order";

pub struct SchoolService;

impl SchoolService {
    /// All schools, name-ordered, each fully hydrated.
    pub async fn get_all(pool: &PgPool) -> anyhow::Result<Vec<School>> {
        let rows = sqlx::query_as::<_, SchoolRow>(&format!(
            "SELECT {SCHOOL_COLS} FROM schools ORDER BY name"
        ))
        .fetch_all(pool)
        .await?;

        let mut schools = Vec::with_capacity(rows.len());
        for row in rows {
            schools.push(Self::hydrate(pool, row).await?);
        }
        Ok(schools)
    }

    pub async fn get_by_id(pool: &PgPool, id: &str) -> anyhow::Result<Option<School>> {
        let row = sqlx::query_as::<_, SchoolRow>(&format!(
            "SELECT {SCHOOL_COLS} FROM schools WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(pool, row).await?)),
            None => Ok(None),
        }
    }

    pub async fn exists(pool: &PgPool, id: &str) -> anyhow::Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Case-insensitive substring match across name, location and type.
    /// Callers are expected to guard the empty query.
    pub async fn search(pool: &PgPool, query: &str) -> anyhow::Result<Vec<School>> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query_as::<_, SchoolRow>(&format!(
            "SELECT {SCHOOL_COLS} FROM schools
             WHERE name ILIKE $1 OR location ILIKE $1 OR type ILIKE $1
             ORDER BY name"
        ))
        .bind(&pattern)
        .fetch_all(pool)
        .await?;

        let mut schools = Vec::with_capacity(rows.len());
        for row in rows {
            schools.push(Self::hydrate(pool, row).await?);
        }
        Ok(schools)
    }

    /// Inserts the school row with its contact, features and optional
    /// leadership and testimonials in one transaction so a partial failure
    /// never leaves an orphaned school.
    pub async fn create(pool: &PgPool, data: NewSchool) -> anyhow::Result<School> {
        let id = data
            .id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Utc::now().timestamp_millis().to_string());

        let theme = data
            .theme
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let core_values = data
            .core_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO schools
             (id, name, type, county, location, description, mission, vision, core_values,
              founded, students, rating, image, website, hero_image, logo, theme)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17)",
        )
        .bind(&id)
        .bind(&data.name)
        .bind(data.school_type.to_string())
        .bind(data.county.to_string())
        .bind(&data.location)
        .bind(&data.description)
        .bind(&data.mission)
        .bind(&data.vision)
        .bind(&core_values)
        .bind(data.founded)
        .bind(data.students)
        .bind(data.rating)
        .bind(&data.image)
        .bind(&data.website)
        .bind(&data.hero_image)
        .bind(&data.logo)
        .bind(&theme)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO school_contacts (school_id, email, phone, address) VALUES ($1,$2,$3,$4)",
        )
        .bind(&id)
        .bind(&data.contact.email)
        .bind(&data.contact.phone)
        .bind(&data.contact.address)
        .execute(&mut *tx)
        .await?;

        for feature in &data.features {
            sqlx::query("INSERT INTO school_features (school_id, feature) VALUES ($1,$2)")
                .bind(&id)
                .bind(feature)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(leadership) = &data.leadership {
            insert_leadership(&mut tx, &id, leadership).await?;
        }

        if let Some(testimonials) = &data.testimonials {
            for t in testimonials {
                sqlx::query(
                    "INSERT INTO school_testimonials (school_id, author, title, text)
                     VALUES ($1,$2,$3,$4)",
                )
                .bind(&id)
                .bind(&t.author)
                .bind(&t.title)
                .bind(&t.text)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Self::get_by_id(pool, &id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("School vanished after create: {id}"))
    }

    /// Partial update with replace semantics for the collection fields.
    /// Returns None when the id does not exist; never an implicit create.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: SchoolUpdate,
    ) -> anyhow::Result<Option<School>> {
        let Some(existing) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        let merged = patch.merge_scalars(&existing);

        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE schools
             SET name=$1, type=$2, county=$3, location=$4, description=$5, mission=$6,
                 vision=$7, founded=$8, students=$9, rating=$10, image=$11, website=$12,
                 updated_at = NOW()
             WHERE id=$13",
        )
        .bind(&merged.name)
        .bind(&merged.school_type)
        .bind(&merged.county)
        .bind(&merged.location)
        .bind(&merged.description)
        .bind(&merged.mission)
        .bind(&merged.vision)
        .bind(merged.founded)
        .bind(merged.students)
        .bind(merged.rating)
        .bind(&merged.image)
        .bind(&merged.website)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // Branding columns are rewritten as a group when any of their keys is
        // present in the patch; keys absent from the patch become NULL.
        if patch.touches_image_group() {
            let hero_image = patch.hero_image.clone().flatten();
            let logo = patch.logo.clone().flatten();
            let theme = patch
                .theme
                .as_ref()
                .and_then(|t| t.as_ref())
                .map(serde_json::to_string)
                .transpose()?;
            let core_values = patch
                .core_values
                .as_ref()
                .and_then(|v| v.as_ref())
                .map(serde_json::to_string)
                .transpose()?;
            sqlx::query(
                "UPDATE schools SET hero_image=$1, logo=$2, theme=$3, core_values=$4 WHERE id=$5",
            )
            .bind(&hero_image)
            .bind(&logo)
            .bind(&theme)
            .bind(&core_values)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(contact) = &patch.contact {
            sqlx::query(
                "UPDATE school_contacts SET email=$1, phone=$2, address=$3 WHERE school_id=$4",
            )
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.address)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(features) = &patch.features {
            sqlx::query("DELETE FROM school_features WHERE school_id=$1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for feature in features {
                sqlx::query("INSERT INTO school_features (school_id, feature) VALUES ($1,$2)")
                    .bind(id)
                    .bind(feature)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        // A present key always clears the prior rows; null (or an empty
        // array) leaves the collection empty.
        if let Some(leadership) = &patch.leadership {
            sqlx::query("DELETE FROM school_leadership WHERE school_id=$1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if let Some(members) = leadership {
                insert_leadership(&mut tx, id, members).await?;
            }
        }

        if let Some(testimonials) = &patch.testimonials {
            sqlx::query("DELETE FROM school_testimonials WHERE school_id=$1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for t in testimonials.as_deref().unwrap_or_default() {
                sqlx::query(
                    "INSERT INTO school_testimonials (school_id, author, title, text)
                     VALUES ($1,$2,$3,$4)",
                )
                .bind(id)
                .bind(&t.author)
                .bind(&t.title)
                .bind(&t.text)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Self::get_by_id(pool, id).await
    }

    /// Child rows go with the school via ON DELETE CASCADE.
    pub async fn delete(pool: &PgPool, id: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM schools WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Gallery ---

    pub async fn add_gallery_item(
        pool: &PgPool,
        school_id: &str,
        url: &str,
        caption: Option<&str>,
    ) -> anyhow::Result<GalleryItem> {
        let item = sqlx::query_as::<_, GalleryItem>(
            "INSERT INTO school_gallery (school_id, url, caption)
             VALUES ($1,$2,$3)
             RETURNING id, url, caption, created_at",
        )
        .bind(school_id)
        .bind(url)
        .bind(caption)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn delete_gallery_item(
        pool: &PgPool,
        school_id: &str,
        id: i64,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM school_gallery WHERE id = $1 AND school_id = $2")
            .bind(id)
            .bind(school_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Leadership (legacy) ---

    pub async fn add_leadership_member(
        pool: &PgPool,
        school_id: &str,
        member: &LeadershipInput,
    ) -> anyhow::Result<LeadershipMember> {
        let row = sqlx::query_as::<_, LeadershipMember>(
            "INSERT INTO school_leadership (school_id, name, title, bio, photo, display_order)
             VALUES ($1,$2,$3,$4,$5,$6)
             RETURNING id, name, title, bio, photo, display_order",
        )
        .bind(school_id)
        .bind(&member.name)
        .bind(&member.title)
        .bind(&member.bio)
        .bind(&member.photo)
        .bind(member.display_order.unwrap_or(0))
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    /// Partial field update; unsupplied fields retain prior values. Rows
    /// belonging to a different school are treated as not found.
    pub async fn update_leadership_member(
        pool: &PgPool,
        school_id: &str,
        id: i64,
        patch: &LeadershipPatch,
    ) -> anyhow::Result<Option<LeadershipMember>> {
        let row = sqlx::query_as::<_, LeadershipMember>(
            "UPDATE school_leadership
             SET name = COALESCE($1, name),
                 title = COALESCE($2, title),
                 bio = COALESCE($3, bio),
                 photo = COALESCE($4, photo),
                 display_order = COALESCE($5, display_order)
             WHERE id = $6 AND school_id = $7
             RETURNING id, name, title, bio, photo, display_order",
        )
        .bind(&patch.name)
        .bind(&patch.title)
        .bind(&patch.bio)
        .bind(&patch.photo)
        .bind(patch.display_order)
        .bind(id)
        .bind(school_id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_leadership_member(
        pool: &PgPool,
        school_id: &str,
        id: i64,
    ) -> anyhow::Result<bool> {
        let result =
            sqlx::query("DELETE FROM school_leadership WHERE id = $1 AND school_id = $2")
                .bind(id)
                .bind(school_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- People (current staff/administrators table) ---

    pub async fn list_people(pool: &PgPool, school_id: &str) -> anyhow::Result<Vec<Person>> {
        let rows = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLS} FROM people WHERE school_id = $1 ORDER BY display_order, name"
        ))
        .bind(school_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn add_person(
        pool: &PgPool,
        school_id: &str,
        name: &str,
        role: &str,
        bio: Option<&str>,
        image: Option<&str>,
        display_order: i32,
    ) -> anyhow::Result<Person> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "INSERT INTO people (school_id, name, role, bio, image, display_order)
             VALUES ($1,$2,$3,$4,$5,$6)
             RETURNING {PERSON_COLS}"
        ))
        .bind(school_id)
        .bind(name)
        .bind(role)
        .bind(bio)
        .bind(image)
        .bind(display_order)
        .fetch_one(pool)
        .await?;
        Ok(person)
    }

    pub async fn update_person(
        pool: &PgPool,
        school_id: &str,
        id: i64,
        patch: &PersonPatch,
    ) -> anyhow::Result<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "UPDATE people
             SET name = COALESCE($1, name),
                 role = COALESCE($2, role),
                 bio = COALESCE($3, bio),
                 image = COALESCE($4, image),
                 display_order = COALESCE($5, display_order),
                 updated_at = NOW()
             WHERE id = $6 AND school_id = $7
             RETURNING {PERSON_COLS}"
        ))
        .bind(&patch.name)
        .bind(&patch.role)
        .bind(&patch.bio)
        .bind(&patch.image)
        .bind(patch.display_order)
        .bind(id)
        .bind(school_id)
        .fetch_optional(pool)
        .await?;
        Ok(person)
    }

    pub async fn delete_person(pool: &PgPool, school_id: &str, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM people WHERE id = $1 AND school_id = $2")
            .bind(id)
            .bind(school_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Testimonials ---

    pub async fn add_testimonial(
        pool: &PgPool,
        school_id: &str,
        author: Option<&str>,
        title: Option<&str>,
        text: &str,
    ) -> anyhow::Result<Testimonial> {
        let row = sqlx::query_as::<_, Testimonial>(
            "INSERT INTO school_testimonials (school_id, author, title, text)
             VALUES ($1,$2,$3,$4)
             RETURNING id, author, title, text, created_at",
        )
        .bind(school_id)
        .bind(author)
        .bind(title)
        .bind(text)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    async fn hydrate(pool: &PgPool, row: SchoolRow) -> anyhow::Result<School> {
        let contact = sqlx::query_as::<_, Contact>(
            "SELECT email, phone, address FROM school_contacts WHERE school_id = $1",
        )
        .bind(&row.id)
        .fetch_optional(pool)
        .await?;

        let features: Vec<String> =
            sqlx::query_scalar("SELECT feature FROM school_features WHERE school_id = $1")
                .bind(&row.id)
                .fetch_all(pool)
                .await?;

        let leadership = sqlx::query_as::<_, LeadershipMember>(
            "SELECT id, name, title, bio, photo, display_order
             FROM school_leadership WHERE school_id = $1
             ORDER BY display_order, name",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        let testimonials = sqlx::query_as::<_, Testimonial>(
            "SELECT id, author, title, text, created_at
             FROM school_testimonials WHERE school_id = $1
             ORDER BY created_at DESC",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        let gallery = sqlx::query_as::<_, GalleryItem>(
            "SELECT id, url, caption, created_at
             FROM school_gallery WHERE school_id = $1
             ORDER BY created_at DESC",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        Ok(School::assemble(
            row,
            contact,
            features,
            leadership,
            testimonials,
            gallery,
        ))
    }
}

/// display_order defaults to the member's position in the supplied array.
async fn insert_leadership(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    school_id: &str,
    members: &[LeadershipInput],
) -> anyhow::Result<()> {
    for (index, member) in members.iter().enumerate() {
        sqlx::query(
            "INSERT INTO school_leadership (school_id, name, title, bio, photo, display_order)
             VALUES ($1,$2,$3,$4,$5,$6)",
        )
        .bind(school_id)
        .bind(&member.name)
        .bind(&member.title)
        .bind(&member.bio)
        .bind(&member.photo)
        .bind(member.display_order.unwrap_or(index as i32))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
