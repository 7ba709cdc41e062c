use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::collections::HashMap;
use time::OffsetDateTime;

/// Claims as they appear on the wire in an Auth0-issued access token.
/// See: <https://datatracker.ietf.org/doc/html/rfc9068>
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct RawAccessTokenClaims {
    pub(crate) iss: String,
    pub(crate) sub: String,
    pub(crate) aud: RawAudiences,
    pub(crate) exp: i64,
    pub(crate) iat: i64,
    pub(crate) azp: Option<String>,
    pub(crate) scope: Option<String>,
    pub(crate) permissions: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) remaining: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum RawAudiences {
    Single(String),
    Multiple(Vec<String>),
}

/// Decoded and validated claims of an Auth0 access token.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Auth0AccessTokenClaims {
    /// (iss) Issuer identifier. For Auth0 this is the tenant domain with a
    /// trailing slash, e.g. `https://coffee-shop2020.us.auth0.com/`.
    pub issuer: String,

    /// (sub) Subject identifier. A locally unique and never reassigned
    /// identifier for the end-user within the issuer, e.g.
    /// `auth0|5e9f8c...` or `google-oauth2|1042...`.
    pub subject_identifier: String,

    /// (aud) Audience(s) this access token is intended for. Contains the API
    /// identifier the token was requested for and may additionally contain
    /// the tenant's `/userinfo` endpoint.
    pub audiences: Audiences,

    /// (`exp`) Expiration time on or after which the token MUST NOT be
    /// accepted for processing.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// (`iat`) Time at which the token was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,

    /// (`azp`) Authorized party - the client ID the token was issued to.
    pub authorized_party: Option<String>,

    /// (`scope`) Space separated list of granted scopes.
    pub scope: Option<String>,

    /// AUTH0 SPECIFIC. RBAC permissions granted to the user for the requested
    /// audience. Only present when RBAC is enabled for the API in the Auth0
    /// dashboard and "Add Permissions in the Access Token" is switched on.
    pub permissions: Option<Vec<String>>,

    pub additional_claims: HashMap<String, serde_json::Value>,
}

/// An authorization failure while inspecting the `permissions` claim of an
/// otherwise valid access token.
///
/// The two variants mirror the two distinct API failure modes: a token
/// without the claim is malformed (the tenant is misconfigured), while a
/// token lacking a specific permission belongs to a user that is simply not
/// allowed to perform the action.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum PermissionError {
    #[snafu(display("PermissionError: Token contains no 'permissions' claim"))]
    PermissionsClaimMissing,

    #[snafu(display("PermissionError: Permission '{permission}' not granted"))]
    NotGranted { permission: String },
}

impl Auth0AccessTokenClaims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|it| it == permission)
    }

    /// Checks that the token grants the given permission.
    ///
    /// # Errors
    /// Returns [`PermissionError::PermissionsClaimMissing`] when the token
    /// carries no `permissions` claim at all and [`PermissionError::NotGranted`]
    /// when the permission is not among the granted ones.
    pub fn require_permission(&self, permission: &str) -> Result<(), PermissionError> {
        let Some(permissions) = self.permissions.as_deref() else {
            return Err(PermissionError::PermissionsClaimMissing);
        };
        if permissions.iter().any(|it| it == permission) {
            Ok(())
        } else {
            Err(PermissionError::NotGranted {
                permission: permission.to_owned(),
            })
        }
    }
}

impl From<RawAccessTokenClaims> for Auth0AccessTokenClaims {
    fn from(raw: RawAccessTokenClaims) -> Self {
        Self {
            issuer: raw.iss,
            subject_identifier: raw.sub,
            audiences: match raw.aud {
                RawAudiences::Single(s) => Audiences::Single(s),
                RawAudiences::Multiple(m) => Audiences::Multiple(m),
            },
            expires_at: OffsetDateTime::from_unix_timestamp(raw.exp).unwrap_or_else(|err| {
                tracing::warn!(?err, "Token contained a non-parsable 'exp' (expires_at) value. Continuing with `now_utc()` being the expiry time.");
                OffsetDateTime::now_utc()
            }),
            issued_at: OffsetDateTime::from_unix_timestamp(raw.iat).unwrap_or_else(|err| {
                tracing::warn!(?err, "Token contained a non-parsable 'iat' (issued_at) value. Continuing with `now_utc()` being the issuing time.");
                OffsetDateTime::now_utc()
            }),
            authorized_party: raw.azp,
            scope: raw.scope,
            permissions: raw.permissions,
            additional_claims: raw.remaining,
        }
    }
}

/// Represents the audience(s) (`aud` claim) from an access token.
///
/// The claim may be either a single string or an array of strings. This enum
/// handles both cases.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Audiences {
    /// A single audience value (common case).
    Single(String),

    /// Multiple audience values.
    Multiple(Vec<String>),
}
