use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::double_option;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchoolType {
    HighSchool,
    Integrated,
    University,
    Tahfeez,
    Vocational,
}

impl std::fmt::Display for SchoolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SchoolType::HighSchool => "HIGH_SCHOOL",
            SchoolType::Integrated => "INTEGRATED",
            SchoolType::University => "UNIVERSITY",
            SchoolType::Tahfeez => "TAHFEEZ",
            SchoolType::Vocational => "VOCATIONAL",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SchoolType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH_SCHOOL" => Ok(SchoolType::HighSchool),
            "INTEGRATED" => Ok(SchoolType::Integrated),
            "UNIVERSITY" => Ok(SchoolType::University),
            "TAHFEEZ" => Ok(SchoolType::Tahfeez),
            "VOCATIONAL" => Ok(SchoolType::Vocational),
            _ => Err(anyhow::anyhow!("Unknown school type: {s}")),
        }
    }
}

/// Closed set of Liberian counties served by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum County {
    Montserrado,
    Nimba,
    Bong,
    GrandBassa,
    Margibi,
    Lofa,
    Maryland,
    Other,
}

impl std::fmt::Display for County {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            County::Montserrado => "MONTSERRADO",
            County::Nimba => "NIMBA",
            County::Bong => "BONG",
            County::GrandBassa => "GRAND_BASSA",
            County::Margibi => "MARGIBI",
            County::Lofa => "LOFA",
            County::Maryland => "MARYLAND",
            County::Other => "OTHER",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for County {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MONTSERRADO" => Ok(County::Montserrado),
            "NIMBA" => Ok(County::Nimba),
            "BONG" => Ok(County::Bong),
            "GRAND_BASSA" => Ok(County::GrandBassa),
            "MARGIBI" => Ok(County::Margibi),
            "LOFA" => Ok(County::Lofa),
            "MARYLAND" => Ok(County::Maryland),
            "OTHER" => Ok(County::Other),
            _ => Err(anyhow::anyhow!("Unknown county: {s}")),
        }
    }
}

/// Per-school branding overrides applied by the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Legacy leadership entry. The people table supersedes this, but both
/// representations are still served.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipMember {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    #[serde(skip_serializing)]
    pub school_id: String,
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: i64,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: i64,
    pub author: Option<String>,
    pub title: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Flat schools-table row. Hydrated into a full School by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct SchoolRow {
    pub id: String,
    pub name: String,
    #[sqlx(rename = "type")]
    pub school_type: String,
    pub county: String,
    pub location: String,
    pub description: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub core_values: Option<String>,
    pub founded: i32,
    pub students: i32,
    pub rating: f64,
    pub image: String,
    pub hero_image: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub theme: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully hydrated aggregate as served to the rendering layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub school_type: String,
    pub county: String,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_values: Option<Vec<String>>,
    pub founded: i32,
    pub students: i32,
    pub rating: f64,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    pub contact: Contact,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leadership: Option<Vec<LeadershipMember>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<GalleryItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl School {
    /// Assemble the aggregate from its row and child collections. Empty child
    /// collections surface as absent, matching what callers already expect.
    pub fn assemble(
        row: SchoolRow,
        contact: Option<Contact>,
        features: Vec<String>,
        leadership: Vec<LeadershipMember>,
        testimonials: Vec<Testimonial>,
        gallery: Vec<GalleryItem>,
    ) -> Self {
        School {
            id: row.id,
            name: row.name,
            school_type: row.school_type,
            county: row.county,
            location: row.location,
            description: row.description,
            mission: row.mission,
            vision: row.vision,
            core_values: row
                .core_values
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
            founded: row.founded,
            students: row.students,
            rating: row.rating,
            image: row.image,
            hero_image: row.hero_image,
            logo: row.logo,
            website: row.website,
            theme: row.theme.as_deref().and_then(|s| serde_json::from_str(s).ok()),
            contact: contact.unwrap_or_default(),
            features,
            leadership: if leadership.is_empty() { None } else { Some(leadership) },
            testimonials: if testimonials.is_empty() { None } else { Some(testimonials) },
            gallery: if gallery.is_empty() { None } else { Some(gallery) },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// Request DTOs

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchool {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub school_type: SchoolType,
    pub county: County,
    pub location: String,
    pub description: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub core_values: Option<Vec<String>>,
    pub founded: i32,
    pub students: i32,
    pub rating: f64,
    pub image: String,
    pub hero_image: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub theme: Option<Theme>,
    pub contact: Contact,
    #[serde(default)]
    pub features: Vec<String>,
    pub leadership: Option<Vec<LeadershipInput>>,
    pub testimonials: Option<Vec<TestimonialInput>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipInput {
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TestimonialInput {
    pub author: Option<String>,
    pub title: Option<String>,
    pub text: String,
}

/// Partial update for a School. Scalar fields merge onto the existing record;
/// contact/features/leadership/testimonials apply only when their key is
/// present, with full-replace semantics for the collections. The branding
/// group and the collections use double options so an explicit null still
/// counts as "key present" (null leadership empties the set, it does not
/// skip the replace).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub school_type: Option<SchoolType>,
    pub county: Option<County>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub founded: Option<i32>,
    pub students: Option<i32>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub website: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub hero_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub theme: Option<Option<Theme>>,
    #[serde(default, deserialize_with = "double_option")]
    pub core_values: Option<Option<Vec<String>>>,
    pub contact: Option<Contact>,
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub leadership: Option<Option<Vec<LeadershipInput>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub testimonials: Option<Option<Vec<TestimonialInput>>>,
}

/// Scalar columns written unconditionally on every school update, after
/// merging the partial onto the existing record.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedScalars {
    pub name: String,
    pub school_type: String,
    pub county: String,
    pub location: String,
    pub description: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub founded: i32,
    pub students: i32,
    pub rating: f64,
    pub image: String,
    pub website: Option<String>,
}

impl SchoolUpdate {
    pub fn merge_scalars(&self, existing: &School) -> MergedScalars {
        MergedScalars {
            name: self.name.clone().unwrap_or_else(|| existing.name.clone()),
            school_type: self
                .school_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| existing.school_type.clone()),
            county: self
                .county
                .map(|c| c.to_string())
                .unwrap_or_else(|| existing.county.clone()),
            location: self
                .location
                .clone()
                .unwrap_or_else(|| existing.location.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| existing.description.clone()),
            mission: self.mission.clone().or_else(|| existing.mission.clone()),
            vision: self.vision.clone().or_else(|| existing.vision.clone()),
            founded: self.founded.unwrap_or(existing.founded),
            students: self.students.unwrap_or(existing.students),
            rating: self.rating.unwrap_or(existing.rating),
            image: self.image.clone().unwrap_or_else(|| existing.image.clone()),
            website: self.website.clone().or_else(|| existing.website.clone()),
        }
    }

    /// The hero image, logo, theme and core values columns are rewritten as a
    /// group: supplying any of them (a value or an explicit null) replaces
    /// all four from this partial.
    pub fn touches_image_group(&self) -> bool {
        self.hero_image.is_some()
            || self.logo.is_some()
            || self.theme.is_some()
            || self.core_values.is_some()
    }
}

// Child-entity request DTOs

#[derive(Debug, Deserialize)]
pub struct NewGalleryItem {
    pub url: Option<String>,
    pub caption: Option<String>,
    /// Inline-encoded image (data URI); takes precedence over url.
    #[serde(rename = "fileData")]
    pub file_data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub display_order: Option<i32>,
    pub file_data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub display_order: Option<i32>,
    pub file_data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_school() -> School {
        School {
            id: "1700000000000".into(),
            name: "Test Academy".into(),
            school_type: "TAHFEEZ".into(),
            county: "BONG".into(),
            location: "Gbarnga".into(),
            description: "A memorization school".into(),
            mission: Some("Hifz for all".into()),
            vision: None,
            core_values: None,
            founded: 1998,
            students: 220,
            rating: 4.5,
            image: "https://example.com/a.jpg".into(),
            hero_image: None,
            logo: None,
            website: None,
            theme: None,
            contact: Contact {
                email: "a@b.com".into(),
                phone: "000".into(),
                address: "X".into(),
            },
            features: vec!["Hifz Program".into()],
            leadership: None,
            testimonials: None,
            gallery: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_partial_merges_to_identity() {
        let school = sample_school();
        let merged = SchoolUpdate::default().merge_scalars(&school);
        assert_eq!(merged.name, school.name);
        assert_eq!(merged.school_type, school.school_type);
        assert_eq!(merged.county, school.county);
        assert_eq!(merged.mission, school.mission);
        assert_eq!(merged.founded, school.founded);
        assert_eq!(merged.students, school.students);
        assert_eq!(merged.rating, school.rating);
        assert_eq!(merged.image, school.image);
        assert_eq!(merged.website, school.website);
    }

    #[test]
    fn partial_overrides_only_supplied_scalars() {
        let school = sample_school();
        let patch = SchoolUpdate {
            name: Some("Renamed Academy".into()),
            students: Some(300),
            ..Default::default()
        };
        let merged = patch.merge_scalars(&school);
        assert_eq!(merged.name, "Renamed Academy");
        assert_eq!(merged.students, 300);
        assert_eq!(merged.location, school.location);
        assert_eq!(merged.rating, school.rating);
    }

    #[test]
    fn image_group_presence_detection() {
        assert!(!SchoolUpdate::default().touches_image_group());
        let patch = SchoolUpdate {
            logo: Some(Some("https://example.com/logo.png".into())),
            ..Default::default()
        };
        assert!(patch.touches_image_group());
        let patch = SchoolUpdate {
            core_values: Some(Some(vec!["Ihsan".into()])),
            ..Default::default()
        };
        assert!(patch.touches_image_group());
    }

    #[test]
    fn explicit_null_branding_keys_count_as_present() {
        let patch: SchoolUpdate = serde_json::from_str(r#"{"heroImage":null}"#).unwrap();
        assert_eq!(patch.hero_image, Some(None));
        assert!(patch.touches_image_group());

        let patch: SchoolUpdate = serde_json::from_str(r#"{"theme":null}"#).unwrap();
        assert_eq!(patch.theme, Some(None));
        assert!(patch.touches_image_group());

        // Absent keys stay absent and leave the group untouched.
        let patch: SchoolUpdate = serde_json::from_str(r#"{"name":"N"}"#).unwrap();
        assert_eq!(patch.hero_image, None);
        assert!(!patch.touches_image_group());
    }

    #[test]
    fn null_collections_are_present_but_empty() {
        let patch: SchoolUpdate = serde_json::from_str(r#"{"leadership":null}"#).unwrap();
        assert!(matches!(patch.leadership, Some(None)));

        let patch: SchoolUpdate = serde_json::from_str(r#"{"testimonials":null}"#).unwrap();
        assert!(matches!(patch.testimonials, Some(None)));

        let patch: SchoolUpdate = serde_json::from_str("{}").unwrap();
        assert!(patch.leadership.is_none());
        assert!(patch.testimonials.is_none());

        let patch: SchoolUpdate = serde_json::from_str(
            r#"{"leadership":[{"name":"A","title":"Principal"}]}"#,
        )
        .unwrap();
        let members = patch.leadership.unwrap().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "A");
    }

    #[test]
    fn enum_tokens_round_trip() {
        for t in [
            SchoolType::HighSchool,
            SchoolType::Integrated,
            SchoolType::University,
            SchoolType::Tahfeez,
            SchoolType::Vocational,
        ] {
            assert_eq!(t.to_string().parse::<SchoolType>().unwrap(), t);
        }
        assert_eq!("GRAND_BASSA".parse::<County>().unwrap(), County::GrandBassa);
        assert!("ATLANTIS".parse::<County>().is_err());
    }

    #[test]
    fn new_school_deserializes_request_shape() {
        let body = serde_json::json!({
            "name": "Test Academy",
            "type": "TAHFEEZ",
            "county": "BONG",
            "location": "Gbarnga",
            "description": "desc",
            "founded": 1998,
            "students": 220,
            "rating": 4.5,
            "image": "https://example.com/a.jpg",
            "contact": { "email": "a@b.com", "phone": "000", "address": "X" },
            "features": ["Hifz Program"]
        });
        let parsed: NewSchool = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.school_type, SchoolType::Tahfeez);
        assert_eq!(parsed.county, County::Bong);
        assert_eq!(parsed.features, vec!["Hifz Program"]);
        assert!(parsed.id.is_none());
        assert!(parsed.leadership.is_none());
    }
}
