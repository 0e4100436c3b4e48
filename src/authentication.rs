use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{config::Config, errors::RequestError};

const TOKEN_AUDIENCE: &str = "authenticated";
const TOKEN_ROLE: &str = "authenticated";

/// Claims of the backend access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub aud: String,
    pub role: String,
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign-in assertion issued by the identity-provider bridge.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityAssertion {
    /// Account id at the provider.
    pub sub: String,
    pub provider: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub exp: i64,
}

pub struct AuthUser {
    pub id: Uuid,
    pub token: String,
}

pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn get_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|a| a.id)
    }

    pub fn require(self) -> Result<AuthUser, RequestError> {
        self.0
            .ok_or(RequestError::NotAuthorized("Need to be authorized"))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = match parts.headers.get("Authorization") {
            Some(header) => header,
            None => return Ok(MaybeUser(None)),
        };
        let header = header.to_str().map_err(|_| {
            tracing::debug!("authorization header is not valid utf-8");
            RequestError::NotAuthorized("Invalid token")
        })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::debug!("authorization header without bearer prefix");
            RequestError::NotAuthorized("Invalid token")
        })?;

        let config = parts
            .extensions
            .get::<Arc<Config>>()
            .ok_or(RequestError::ServerError)?;

        let claims = verify_access_token(config, token)?;

        Ok(MaybeUser(Some(AuthUser {
            id: claims.sub,
            token: token.to_string(),
        })))
    }
}

pub fn issue_access_token(config: &Config, id: Uuid, email: &str) -> Result<String> {
    let now = OffsetDateTime::now_utc();
    let claims = AccessClaims {
        iss: config.token_issuer.clone(),
        aud: TOKEN_AUDIENCE.to_string(),
        role: TOKEN_ROLE.to_string(),
        sub: id,
        email: email.to_string(),
        iat: now.unix_timestamp(),
        exp: (now + config.token_ttl).unix_timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .context("Failed to generate jwt token")
}

pub fn verify_access_token(config: &Config, token: &str) -> Result<AccessClaims, RequestError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[TOKEN_AUDIENCE]);
    validation.set_issuer(&[config.token_issuer.as_str()]);

    let claims = jsonwebtoken::decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "rejected access token");
        RequestError::NotAuthorized("Invalid token")
    })?
    .claims;

    if claims.exp < OffsetDateTime::now_utc().unix_timestamp() {
        return Err(RequestError::NotAuthorized("Token expired"));
    }
    Ok(claims)
}

pub fn verify_identity_assertion(
    config: &Config,
    assertion: &str,
) -> Result<IdentityAssertion, RequestError> {
    let validation = Validation::new(Algorithm::HS256);
    let assertion = jsonwebtoken::decode::<IdentityAssertion>(
        assertion,
        &DecodingKey::from_secret(config.identity_provider_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "rejected identity assertion");
        RequestError::NotAuthorized("Invalid identity assertion")
    })?
    .claims;

    if assertion.exp < OffsetDateTime::now_utc().unix_timestamp() {
        return Err(RequestError::NotAuthorized("Identity assertion expired"));
    }
    Ok(assertion)
}
