//! Authentication token endpoint

use super::users::{validate_email, validate_password};
use crate::auth::password::verify_password_blocking;
use crate::server::state::AppState;
use crate::storage::{Scope, StoreError};
use crate::utils::error::{ApiError, Result};
use crate::utils::validator::Validator;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Lifetime of a bearer token
pub fn authentication_ttl() -> chrono::Duration {
    chrono::Duration::hours(24)
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /v1/tokens/authentication`
pub async fn create_authentication_token(
    state: web::Data<AppState>,
    body: web::Json<CreateTokenRequest>,
) -> Result<HttpResponse> {
    let input = body.into_inner();

    let mut v = Validator::new();
    validate_email(&mut v, &input.email)?;
    validate_password(&mut v, &input.password);
    v.finish()?;

    let storage = &state.storage;
    let user = match storage.bounded(storage.users().get_by_email(&input.email)).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(ApiError::InvalidLogin),
        Err(e) => return Err(e.into()),
    };

    if !verify_password_blocking(input.password, user.password_hash.clone()).await? {
        return Err(ApiError::InvalidLogin);
    }

    let token = storage
        .bounded(
            storage
                .tokens()
                .new_token(user.id, authentication_ttl(), Scope::Authentication),
        )
        .await?;

    info!(user_id = user.id, "Authentication token issued");
    Ok(HttpResponse::Created().json(json!({ "authentication_token": token })))
}
