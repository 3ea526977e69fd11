//! Registration and activation endpoints

use crate::auth::password::hash_password_blocking;
use crate::auth::tokens::TOKEN_LENGTH;
use crate::auth::{MOVIES_READ, MOVIES_WRITE};
use crate::server::state::AppState;
use crate::services::mailer::Template;
use crate::storage::{Scope, StoreError, User};
use crate::utils::error::{ApiError, Result};
use crate::utils::validator::{Validator, is_email};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Lifetime of the token mailed after registration
pub fn activation_ttl() -> chrono::Duration {
    chrono::Duration::days(3)
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivateUserRequest {
    #[serde(default)]
    pub token: String,
}

pub fn validate_email(v: &mut Validator, email: &str) -> Result<()> {
    v.check(!email.is_empty(), "email", "must be provided");
    v.check(is_email(email)?, "email", "must be a valid email address");
    Ok(())
}

pub fn validate_password(v: &mut Validator, password: &str) {
    v.check(!password.is_empty(), "password", "must be provided");
    v.check(password.len() >= 8, "password", "must be at least 8 bytes long");
    v.check(password.len() <= 72, "password", "must not be more than 72 bytes long");
}

pub fn validate_token(v: &mut Validator, token: &str) {
    v.check(!token.is_empty(), "token", "must be provided");
    v.check(token.len() == TOKEN_LENGTH, "token", "must be 26 bytes long");
}

fn validate_registration(input: &RegisterUserRequest) -> Result<()> {
    let mut v = Validator::new();
    v.check(!input.name.is_empty(), "name", "must be provided");
    v.check(input.name.len() <= 500, "name", "must not be more than 500 bytes long");
    validate_email(&mut v, &input.email)?;
    validate_password(&mut v, &input.password);
    v.finish()
}

fn field_error(key: &str, message: &str) -> ApiError {
    let mut v = Validator::new();
    v.add_error(key, message);
    ApiError::failed_validation(v.errors().clone())
}

/// `POST /v1/users`
///
/// Answers 202 once the user is stored; the welcome mail is delivered by
/// the background tracker.
pub async fn register_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse> {
    let input = body.into_inner();
    validate_registration(&input)?;

    let password_hash = hash_password_blocking(input.password).await?;
    let storage = &state.storage;

    let user = match storage
        .bounded(storage.users().insert(User::new(input.name, input.email, password_hash)))
        .await
    {
        Ok(user) => user,
        Err(StoreError::DuplicateEmail) => {
            return Err(field_error("email", "a user with this email address already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    let mut granted = vec![MOVIES_READ];
    if state.config.storage().grant_write_on_register {
        granted.push(MOVIES_WRITE);
    }
    storage
        .bounded(storage.permissions().add_for_user(user.id, &granted))
        .await?;

    let token = storage
        .bounded(storage.tokens().new_token(user.id, activation_ttl(), Scope::Activation))
        .await?;

    info!(user_id = user.id, "User registered");

    let mailer = Arc::clone(&state.mailer);
    let recipient = user.email.clone();
    let data = json!({
        "activationToken": token.plaintext,
        "userID": user.id,
    });
    state.tracker.run("user_welcome", move || async move {
        mailer.send(&recipient, Template::UserWelcome, data).await
    });

    Ok(HttpResponse::Accepted().json(json!({ "user": user })))
}

/// `PUT /v1/users/activated`
pub async fn activate_user(
    state: web::Data<AppState>,
    body: web::Json<ActivateUserRequest>,
) -> Result<HttpResponse> {
    let input = body.into_inner();

    let mut v = Validator::new();
    validate_token(&mut v, &input.token);
    v.finish()?;

    let storage = &state.storage;
    let mut user = match storage
        .bounded(storage.users().get_for_token(Scope::Activation, &input.token))
        .await
    {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            return Err(field_error("token", "invalid or expired activation token"));
        }
        Err(e) => return Err(e.into()),
    };

    user.activated = true;
    let user = storage.bounded(storage.users().update(user)).await?;

    storage
        .bounded(storage.tokens().delete_all_for_user(Scope::Activation, user.id))
        .await?;

    info!(user_id = user.id, "User activated");
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
