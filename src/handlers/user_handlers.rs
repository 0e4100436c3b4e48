use std::sync::Arc;

use axum::{Extension, Json};

use crate::{
    authentication::{issue_access_token, verify_identity_assertion, AuthUser, MaybeUser},
    config::Config,
    data_formats::{
        MultiplePrayersWrapper, SessionRequest, SuccessResponse, UpdateUserRequest, UserResponse,
        UserWrapper,
    },
    db_helpers::{
        delete_user_in_db, get_user_by_id, list_prayers_by_author_in_db, sync_identity_in_db,
        update_user_in_db, IdentityProfile,
    },
    errors::RequestError,
};

use super::{with_comments, JsonResult, Pool};

type UserJson = UserWrapper<UserResponse>;

// ----------------- Auth Handlers -----------------

/// Exchanges an identity-provider sign-in for a backend access token.
pub async fn create_session(
    Extension(pool): Extension<Pool>,
    Extension(config): Extension<Arc<Config>>,
    Json(SessionRequest { assertion }): Json<SessionRequest>,
) -> JsonResult<UserJson> {
    let assertion = verify_identity_assertion(&config, &assertion)?;

    let email = match assertion.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => {
            return Err(RequestError::RunTimeError(
                "Identity provider did not share an email",
            ))
        }
    };
    let name = assertion
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    let profile = IdentityProfile {
        provider: assertion.provider,
        provider_account_id: assertion.sub,
        email,
        name,
        image: assertion.picture,
    };
    let user = sync_identity_in_db(&pool, &profile).await?;

    let token = issue_access_token(&config, user.id, &user.email).map_err(|e| {
        tracing::error!(error = %e, "could not issue access token");
        RequestError::ServerError
    })?;
    tracing::info!(user_id = %user.id, "signed in");
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

// ----------------- User Handlers -----------------
pub async fn get_current_user(
    Extension(pool): Extension<Pool>,
    maybe_user: MaybeUser,
) -> JsonResult<UserJson> {
    let AuthUser { id, token } = maybe_user.require()?;
    let user = get_user_by_id(&pool, id)
        .await?
        .ok_or(RequestError::NotAuthorized("User no longer exists"))?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn update_user(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Json(UserWrapper { user }): Json<UserWrapper<UpdateUserRequest>>,
) -> JsonResult<UserJson> {
    let AuthUser { id, token } = maybe_user.require()?;
    let user = update_user_in_db(&pool, id, user).await?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn delete_user(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
) -> JsonResult<SuccessResponse> {
    let AuthUser { id, .. } = maybe_user.require()?;
    delete_user_in_db(&pool, id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// The caller's own visible prayers, newest first.
pub async fn list_user_prayers(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
) -> JsonResult<MultiplePrayersWrapper> {
    let AuthUser { id, .. } = maybe_user.require()?;
    let prayers = list_prayers_by_author_in_db(&pool, id).await?;
    let count = prayers.len() as i64;
    let prayers = with_comments(&pool, prayers, Some(id)).await?;
    Ok(Json(MultiplePrayersWrapper {
        prayers,
        prayers_count: count,
        page: 1,
        total_pages: i64::from(count > 0),
    }))
}
