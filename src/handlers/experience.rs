use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::experience::activity::Activity;
use crate::experience::progression::Progression;
use crate::middleware::auth::AuthMember;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::ExperienceService;

#[derive(Debug, Deserialize)]
pub struct GrantExperienceRequest {
    /// Raw experience amount; mutually exclusive with `activity`
    pub amount: Option<i32>,
    /// Activity kind granted at its configured reward
    pub activity: Option<Activity>,
}

#[derive(Debug, Serialize)]
pub struct GrantExperienceResponse {
    pub experience: i32,
    pub progress: Progression,
}

/// GET /api/members/:member_id/experience - progression snapshot
pub async fn progress_get(
    Extension(auth): Extension<AuthMember>,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Progression> {
    ensure_self(&auth, member_id)?;

    let service = ExperienceService::new().await?;
    let progress = service.get_progress(member_id).await?;

    Ok(ApiResponse::success(progress))
}

/// POST /api/members/:member_id/experience - grant experience
///
/// The body carries exactly one of `amount` or `activity`.
pub async fn grant_post(
    Extension(auth): Extension<AuthMember>,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<GrantExperienceRequest>,
) -> ApiResult<GrantExperienceResponse> {
    ensure_self(&auth, member_id)?;

    // Reject malformed bodies before touching the database
    let grant = match (payload.amount, payload.activity) {
        (Some(amount), None) => Grant::Amount(amount),
        (None, Some(activity)) => Grant::Activity(activity),
        _ => {
            return Err(ApiError::bad_request(
                "provide exactly one of 'amount' or 'activity'",
            ))
        }
    };

    let service = ExperienceService::new().await?;
    let experience = match grant {
        Grant::Amount(amount) => service.grant_experience(member_id, amount).await?,
        Grant::Activity(activity) => service.grant_for_activity(member_id, activity).await?,
    };
    let progress = service.get_progress(member_id).await?;

    Ok(ApiResponse::success(GrantExperienceResponse {
        experience,
        progress,
    }))
}

enum Grant {
    Amount(i32),
    Activity(Activity),
}

/// Members may only read or grow their own counter.
fn ensure_self(auth: &AuthMember, member_id: Uuid) -> Result<(), ApiError> {
    if auth.member_id != member_id {
        return Err(ApiError::forbidden(
            "members may only access their own experience",
        ));
    }
    Ok(())
}
