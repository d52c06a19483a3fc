//! Admin-only account lookup.

use crate::errors::LmsError;
use crate::models::AccountResponse;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Look up an account by id.
///
/// GET /api/v1/admin/accounts/:id
///
/// Inactive accounts are returned too; the projection carries `is_active`.
#[instrument(skip_all, name = "lms.handlers.admin.get_account")]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountResponse>, LmsError> {
    let account_id = Uuid::parse_str(&account_id)
        .map_err(|_| LmsError::BadRequest("Invalid account id".to_string()))?;

    let account = state
        .store
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| LmsError::NotFound("Account not found".to_string()))?;

    Ok(Json(AccountResponse {
        success: true,
        account,
    }))
}
