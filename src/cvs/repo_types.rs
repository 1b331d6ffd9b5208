use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_TEMPLATE: &str = "modern";

/// CV record as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cv {
    pub id: Uuid,
    /// Owner; absent for CVs created under global tenancy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub template: String,
    /// Opaque token granting anonymous read access.
    pub share_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Cv {
    pub fn empty(user_id: Option<Uuid>) -> Self {
        let now = crate::db::now_utc();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: None,
            full_name: None,
            email: None,
            phone: None,
            summary: None,
            experience: None,
            education: None,
            skills: None,
            template: DEFAULT_TEMPLATE.to_string(),
            share_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
