use serde::{Deserialize, Serialize};

/// An enumeration representing the response to token requests, including
/// success and error responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum TokenResponse {
    Success(SuccessTokenResponse),
    Error(ErrorResponse),
}

/// A successful response from Auth0's `/oauth/token` endpoint.
///
/// `id_token` is only present when the `openid` scope was requested,
/// `refresh_token` only when `offline_access` was.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct SuccessTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: Option<String>,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// See [RFC 6749 Section 5.2](https://datatracker.ietf.org/doc/html/rfc6749#section-5.2) for details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum KnownOauthErrorCode {
    /// The request is missing a required parameter, includes an unsupported parameter value
    /// (other than grant type), repeats a parameter, includes multiple credentials,
    /// utilizes more than one mechanism for authenticating the client, or is otherwise malformed.
    #[serde(rename = "invalid_request")]
    InvalidRequest,

    /// Client authentication failed (e.g., unknown client, no client authentication included,
    /// or unsupported authentication method).
    #[serde(rename = "invalid_client")]
    InvalidClient,

    /// The provided authorization grant (e.g., authorization code, resource owner credentials) or
    /// refresh token is invalid, expired, revoked, does not match the redirection URI used in the
    /// authorization request, or was issued to another client. Auth0 also reports a failed PKCE
    /// verification this way.
    #[serde(rename = "invalid_grant")]
    InvalidGrant,

    /// The authenticated client is not authorized to use this authorization grant type.
    #[serde(rename = "unauthorized_client")]
    UnauthorizedClient,

    /// The authorization grant type is not supported by the authorization server.
    #[serde(rename = "unsupported_grant_type")]
    UnsupportedGrantType,

    /// The requested scope is invalid, unknown, malformed, or exceeds the scope granted by the
    /// resource owner.
    #[serde(rename = "invalid_scope")]
    InvalidScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OauthErrorCode {
    Known(KnownOauthErrorCode),
    Unknown(String),
}

/// OAuth error response received from Auth0 during token exchange or token
/// refresh. Errors follow the OAuth 2.0 error response format.
///
/// See [RFC 6749 Section 5.2](https://datatracker.ietf.org/doc/html/rfc6749#section-5.2) for details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// The error code (e.g., `invalid_client` or `invalid_grant`).
    pub error: OauthErrorCode,

    /// OPTIONAL. Human-readable ASCII text providing additional information,
    /// used to assist the client developer in understanding the error that
    /// occurred.
    pub error_description: Option<String>,

    /// OPTIONAL. A URI identifying a human-readable web page with information
    /// about the error.
    pub error_uri: Option<String>,
}

impl ErrorResponse {
    /// Check if this error indicates that the presented grant (authorization
    /// code or refresh token) is no longer usable. In that case any stored
    /// refresh token can be dropped, the user must log in again.
    pub fn is_invalid_grant(&self) -> bool {
        self.error == OauthErrorCode::Known(KnownOauthErrorCode::InvalidGrant)
    }
}
