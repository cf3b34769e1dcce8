use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password_blocking, verify_password_blocking},
    repo::UserStore,
    repo_types::User,
};
use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Creates the account and returns it with a fresh token.
pub async fn register(
    users: &UserStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> AppResult<(User, String)> {
    let (Some(username), Some(email), Some(password)) =
        (present(req.username), present(req.email), present(req.password))
    else {
        return Err(AppError::Validation("All fields are required".into()));
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    let password_hash = hash_password_blocking(password).await?;
    let user = users
        .insert(User {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        })
        .await
        .map_err(|e| {
            if matches!(e, AppError::Conflict(_)) {
                warn!("registration conflict");
            }
            e
        })?;

    let token = keys.issue(&user.id, &user.username)?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((user, token))
}

/// Checks credentials; unknown login and wrong password are indistinguishable.
pub async fn login(
    users: &UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> AppResult<(User, String)> {
    let (Some(login), Some(password)) = (present(req.username), present(req.password)) else {
        return Err(AppError::Validation("Username and password are required".into()));
    };

    let Some(user) = users.find_by_login(&login).await else {
        warn!(%login, "login unknown user");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.issue(&user.id, &user.username)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}
