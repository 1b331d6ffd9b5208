use tracing::{info, warn};
use uuid::Uuid;

use super::dto::CvFields;
use super::repo_types::Cv;
use crate::auth::extractors::Requester;
use crate::error::AppError;
use crate::state::AppState;

const NOT_FOUND: &str = "CV not found";

/// 16 hex chars from 8 random bytes. Uniqueness is left to the store.
pub fn generate_share_id() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND.into())
}

/// Path ids that are not UUIDs cannot name a CV.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

pub async fn list_cvs(state: &AppState, requester: Requester) -> Result<Vec<Cv>, AppError> {
    Ok(state.cvs.list(requester.owner()).await?)
}

pub async fn create_cv(
    state: &AppState,
    requester: Requester,
    fields: CvFields,
) -> Result<Cv, AppError> {
    fields.validate()?;
    let mut cv = Cv::empty(requester.owner());
    fields.apply_to(&mut cv);
    cv.share_id = Some(generate_share_id());

    state.cvs.insert(&cv).await?;
    info!(cv_id = %cv.id, owner = ?cv.user_id, "cv created");
    Ok(cv)
}

/// Missing and foreign CVs both report NotFound.
pub async fn update_cv(
    state: &AppState,
    requester: Requester,
    id: &str,
    fields: CvFields,
) -> Result<Cv, AppError> {
    let id = parse_id(id)?;
    fields.validate()?;

    let Some(mut cv) = state.cvs.find(id, requester.owner()).await? else {
        warn!(cv_id = %id, requester = ?requester, "update on missing or foreign cv");
        return Err(not_found());
    };

    fields.apply_to(&mut cv);
    cv.updated_at = crate::db::now_utc().max(cv.updated_at);

    let updated = state.cvs.update(&cv).await?.ok_or_else(not_found)?;
    info!(cv_id = %updated.id, "cv updated");
    Ok(updated)
}

pub async fn delete_cv(state: &AppState, requester: Requester, id: &str) -> Result<(), AppError> {
    let id = parse_id(id)?;
    if !state.cvs.delete(id, requester.owner()).await? {
        warn!(cv_id = %id, requester = ?requester, "delete on missing or foreign cv");
        return Err(not_found());
    }
    info!(cv_id = %id, "cv deleted");
    Ok(())
}

/// Anonymous read of a single shared CV.
pub async fn get_by_share_id(state: &AppState, share_id: &str) -> Result<Cv, AppError> {
    state
        .cvs
        .find_by_share_id(share_id)
        .await?
        .ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> CvFields {
        CvFields {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[test]
    fn share_ids_are_sixteen_hex_chars() {
        let id = generate_share_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_share_id());
    }

    #[tokio::test]
    async fn create_attaches_owner_share_id_and_default_template() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        let cv = create_cv(&state, Requester::Owner(owner), titled("Backend"))
            .await
            .unwrap();
        assert_eq!(cv.user_id, Some(owner));
        assert_eq!(cv.template, "modern");
        assert_eq!(cv.share_id.as_ref().map(String::len), Some(16));
        assert_eq!(cv.created_at, cv.updated_at);
        assert_eq!(cv.created_at.nanosecond() % 1_000, 0);
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let state = AppState::fake();
        let a = Requester::Owner(Uuid::new_v4());
        let b = Requester::Owner(Uuid::new_v4());
        let first = create_cv(&state, a, titled("one")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = create_cv(&state, a, titled("two")).await.unwrap();
        create_cv(&state, b, titled("other")).await.unwrap();

        let mine = list_cvs(&state, a).await.unwrap();
        assert_eq!(
            mine.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert_eq!(list_cvs(&state, Requester::Anyone).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn cross_user_update_and_delete_are_not_found() {
        let state = AppState::fake();
        let a = Requester::Owner(Uuid::new_v4());
        let b = Requester::Owner(Uuid::new_v4());
        let cv = create_cv(&state, a, titled("mine")).await.unwrap();
        let id = cv.id.to_string();

        let err = update_cv(&state, b, &id, titled("hijack")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete_cv(&state, b, &id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let still = state.cvs.find(cv.id, None).await.unwrap().unwrap();
        assert_eq!(still.title.as_deref(), Some("mine"));
    }

    #[tokio::test]
    async fn partial_update_changes_only_given_fields_and_bumps_timestamp() {
        let state = AppState::fake();
        let a = Requester::Owner(Uuid::new_v4());
        let fields = CvFields {
            title: Some("Old".into()),
            full_name: Some("Ada Lovelace".into()),
            skills: Some("Math".into()),
            ..Default::default()
        };
        let cv = create_cv(&state, a, fields).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = update_cv(&state, a, &cv.id.to_string(), titled("New"))
            .await
            .unwrap();
        assert_eq!(updated.title.as_deref(), Some("New"));
        assert_eq!(updated.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(updated.skills.as_deref(), Some("Math"));
        assert_eq!(updated.share_id, cv.share_id);
        assert_eq!(updated.created_at, cv.created_at);
        assert!(updated.updated_at > cv.updated_at);
    }

    #[tokio::test]
    async fn delete_missing_or_malformed_id_is_not_found() {
        let state = AppState::fake();
        let a = Requester::Owner(Uuid::new_v4());
        for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let err = delete_cv(&state, a, &id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }

        let cv = create_cv(&state, a, titled("gone")).await.unwrap();
        delete_cv(&state, a, &cv.id.to_string()).await.unwrap();
        let err = delete_cv(&state, a, &cv.id.to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn global_scope_ignores_ownership() {
        let state = AppState::fake();
        let cv = create_cv(&state, Requester::Anyone, titled("shared")).await.unwrap();
        assert_eq!(cv.user_id, None);
        let updated = update_cv(&state, Requester::Anyone, &cv.id.to_string(), titled("edit"))
            .await
            .unwrap();
        assert_eq!(updated.title.as_deref(), Some("edit"));
        delete_cv(&state, Requester::Anyone, &cv.id.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn share_lookup_returns_record_or_not_found() {
        let state = AppState::fake();
        let cv = create_cv(&state, Requester::Owner(Uuid::new_v4()), titled("public"))
            .await
            .unwrap();
        let share_id = cv.share_id.clone().unwrap();
        assert_eq!(get_by_share_id(&state, &share_id).await.unwrap(), cv);
        let err = get_by_share_id(&state, "0000000000000000").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
