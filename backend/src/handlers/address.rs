//! HTTP handlers for address management endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::address::{AddressRef, AddressRow, CreateAddressInput, PersonType};
use crate::services::AddressService;
use crate::AppState;
use shared::types::PersonKind;

/// Create an address
pub async fn create_address(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateAddressInput>,
) -> AppResult<(StatusCode, Json<AddressRow>)> {
    let service = AddressService::new(state.db);
    let address = service.create(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// List the current user's addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<AddressRow>>> {
    let service = AddressService::new(state.db);
    let addresses = service.list(current_user.0.user_id).await?;
    Ok(Json(addresses))
}

/// List the current user's vendor addresses
pub async fn list_vendor_addresses(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<AddressRef>>> {
    let service = AddressService::new(state.db);
    let addresses = service
        .list_by_kind(current_user.0.user_id, PersonKind::Vendor)
        .await?;
    Ok(Json(addresses))
}

/// List the current user's customer addresses
pub async fn list_customer_addresses(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<AddressRef>>> {
    let service = AddressService::new(state.db);
    let addresses = service
        .list_by_kind(current_user.0.user_id, PersonKind::Customer)
        .await?;
    Ok(Json(addresses))
}

/// List person types
pub async fn list_person_types(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<PersonType>>> {
    let service = AddressService::new(state.db);
    let types = service.person_types().await?;
    Ok(Json(types))
}
