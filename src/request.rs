use reqwest::IntoUrl;
use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use std::collections::HashMap;

use crate::response::{ErrorResponse, TokenResponse};
use crate::token::TokenData;

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(display("RequestError: Could not send request"))]
    Send { source: reqwest::Error },

    #[snafu(display("RequestError: Could not decode payload"))]
    Decode { source: reqwest::Error },

    #[snafu(display("RequestError: Received an error response"))]
    ErrResponse { error_response: ErrorResponse },
}

/// Fetches the tenant's JWK set used to verify access token signatures.
///
/// Individually undecodable keys are skipped with a warning, so a tenant
/// publishing a key type unknown to `jsonwebtoken` does not break validation
/// against the remaining keys.
pub(crate) async fn retrieve_jwk_set(
    client: &reqwest::Client,
    jwk_set_endpoint: impl IntoUrl,
) -> Result<jsonwebtoken::jwk::JwkSet, RequestError> {
    #[derive(Deserialize)]
    pub struct RawJwkSet {
        pub keys: Vec<serde_json::Value>,
    }
    let raw_set = client
        .get(jwk_set_endpoint)
        .send()
        .await
        .context(SendSnafu {})?
        .json::<RawJwkSet>()
        .await
        .context(DecodeSnafu {})?;
    let mut set = jsonwebtoken::jwk::JwkSet { keys: Vec::new() };
    for key in raw_set.keys {
        match serde_json::from_value::<jsonwebtoken::jwk::Jwk>(key) {
            Ok(parsed) => set.keys.push(parsed),
            Err(err) => tracing::warn!(?err, "Found non-decodable JWK"),
        }
    }
    Ok(set)
}

/// Exchanges an authorization code for tokens at the tenant's token endpoint,
/// presenting the PKCE code verifier matching the challenge the code was
/// requested with.
pub(crate) async fn exchange_code_for_token(
    client: &reqwest::Client,
    token_endpoint: impl IntoUrl,
    client_id: impl AsRef<str>,
    redirect_uri: impl AsRef<str>,
    code: impl AsRef<str>,
    code_verifier: impl AsRef<str>,
) -> Result<TokenData, RequestError> {
    let params: HashMap<&str, &str> = HashMap::from([
        ("grant_type", "authorization_code"),
        ("client_id", client_id.as_ref()),
        ("redirect_uri", redirect_uri.as_ref()),
        ("code", code.as_ref()),
        ("code_verifier", code_verifier.as_ref()),
    ]);
    request_token(client, token_endpoint, &params).await
}

/// Obtains a fresh access token using a refresh token.
pub(crate) async fn refresh_token(
    client: &reqwest::Client,
    token_endpoint: impl IntoUrl,
    client_id: impl AsRef<str>,
    refresh_token: impl AsRef<str>,
) -> Result<TokenData, RequestError> {
    let params: HashMap<&str, &str> = HashMap::from([
        ("grant_type", "refresh_token"),
        ("client_id", client_id.as_ref()),
        ("refresh_token", refresh_token.as_ref()),
    ]);
    request_token(client, token_endpoint, &params).await
}

async fn request_token(
    client: &reqwest::Client,
    token_endpoint: impl IntoUrl,
    params: &HashMap<&str, &str>,
) -> Result<TokenData, RequestError> {
    match client
        .post(token_endpoint)
        .form(params)
        .send()
        .await
        .context(SendSnafu {})?
        .json::<TokenResponse>()
        .await
        .context(DecodeSnafu {})?
    {
        TokenResponse::Success(success) => Ok(success.into()),
        TokenResponse::Error(error) => Err(ErrResponseSnafu {
            error_response: error,
        }
        .build()),
    }
}
