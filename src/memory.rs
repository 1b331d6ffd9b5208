use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{repo::UserStore, repo_types::User};
use crate::cvs::{repo::CvStore, repo_types::Cv};
use crate::error::StoreError;

/// In-process user and CV store with the same uniqueness rules as the database.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    cvs: RwLock<HashMap<Uuid, Cv>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by(cv: &Cv, owner: Option<Uuid>) -> bool {
    owner.map_or(true, |o| cv.user_id == Some(o))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl CvStore for MemoryStore {
    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<Cv>, StoreError> {
        let cvs = self.cvs.read().await;
        let mut out: Vec<Cv> = cvs.values().filter(|c| owned_by(c, owner)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Cv>, StoreError> {
        let cvs = self.cvs.read().await;
        Ok(cvs.get(&id).filter(|c| owned_by(c, owner)).cloned())
    }

    async fn find_by_share_id(&self, share_id: &str) -> Result<Option<Cv>, StoreError> {
        let cvs = self.cvs.read().await;
        Ok(cvs
            .values()
            .find(|c| c.share_id.as_deref() == Some(share_id))
            .cloned())
    }

    async fn insert(&self, cv: &Cv) -> Result<(), StoreError> {
        let mut cvs = self.cvs.write().await;
        if cv.share_id.is_some() && cvs.values().any(|c| c.share_id == cv.share_id) {
            return Err(StoreError::Duplicate("shareId"));
        }
        cvs.insert(cv.id, cv.clone());
        Ok(())
    }

    async fn update(&self, cv: &Cv) -> Result<Option<Cv>, StoreError> {
        let mut cvs = self.cvs.write().await;
        let Some(slot) = cvs.get_mut(&cv.id) else {
            return Ok(None);
        };
        // Owner, share id and creation time are not writable through update.
        let updated = Cv {
            user_id: slot.user_id,
            share_id: slot.share_id.clone(),
            created_at: slot.created_at,
            ..cv.clone()
        };
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, StoreError> {
        let mut cvs = self.cvs.write().await;
        match cvs.get(&id) {
            Some(c) if owned_by(c, owner) => {
                cvs.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
