//! HTTP handlers for goods-received notes

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::grn::{CreateGrnInput, CreatedGrn, GrnRow};
use crate::services::GrnService;
use crate::AppState;

/// Record a goods receipt
pub async fn create_grn(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateGrnInput>,
) -> AppResult<(StatusCode, Json<CreatedGrn>)> {
    let service = GrnService::new(state.db);
    let created = service.create(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the current user's goods receipts
pub async fn list_grns(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<GrnRow>>> {
    let service = GrnService::new(state.db);
    let grns = service.list(current_user.0.user_id).await?;
    Ok(Json(grns))
}
