use std::sync::RwLock;

use jsonwebtoken::jwk::JwkSet;
use time::{Duration, OffsetDateTime};
use url::Url;

use crate::code_verifier::CodeVerifier;
use crate::endpoints::{DerivedUrlError, DerivedUrls};
use crate::environment::{Auth0Config, EnvironmentConfig};
use crate::error::Auth0Error;
use crate::request::{self, RequestError};
use crate::token::TokenData;
use crate::token_claims::Auth0AccessTokenClaims;
use crate::{login, logout, token_validation};

/// Time after which the cached JWK set is considered too old.
/// After this age is reached, a new set of JWKs is queried for.
const DEFAULT_MAX_JWK_SET_AGE: Duration = Duration::minutes(5);

#[derive(Debug, Clone)]
struct JwkSetWithTimestamp {
    jwk_set: JwkSet,
    retrieved: OffsetDateTime,
}

/// Client for the Auth0 tenant configured in an [`EnvironmentConfig`].
///
/// Covers the full authentication lifecycle of the frontend: producing the
/// login and logout URLs, exchanging the authorization code returned to the
/// callback URL, refreshing tokens, and validating received access tokens
/// against the tenant's JWK set (which is cached and re-fetched when stale).
#[derive(Debug)]
pub struct Auth0Client {
    auth0: Auth0Config,
    urls: DerivedUrls,
    scope: Vec<String>,
    http_client: reqwest::Client,
    jwk_set: RwLock<Option<JwkSetWithTimestamp>>,
    max_jwk_set_age: Duration,
}

impl Auth0Client {
    /// Creates a client for the given tenant, deriving all endpoint URLs
    /// from the tenant domain.
    ///
    /// # Errors
    /// Returns a [`DerivedUrlError`] if the tenant domain prefix does not
    /// form valid URLs.
    pub fn new(auth0: Auth0Config) -> Result<Self, DerivedUrlError> {
        let urls = DerivedUrls::derive(&auth0)?;
        Ok(Self::with_derived_urls(auth0, urls))
    }

    /// Creates a client for the active build profile.
    ///
    /// # Errors
    /// Returns a [`DerivedUrlError`] if the tenant domain prefix does not
    /// form valid URLs.
    pub fn from_environment(environment: &EnvironmentConfig) -> Result<Self, DerivedUrlError> {
        Self::new(environment.auth0.clone())
    }

    /// Creates a client with explicitly given endpoint URLs instead of URLs
    /// derived from the default `{url}.auth0.com` tenant domain. Use this for
    /// tenants behind an Auth0 custom domain.
    pub fn with_derived_urls(auth0: Auth0Config, urls: DerivedUrls) -> Self {
        Self {
            auth0,
            urls,
            scope: vec!["profile".to_owned(), "email".to_owned()],
            http_client: reqwest::Client::new(),
            jwk_set: RwLock::new(None),
            max_jwk_set_age: DEFAULT_MAX_JWK_SET_AGE,
        }
    }

    /// Replaces the default scopes (`profile`, `email`). `openid` is always
    /// requested in addition.
    #[must_use]
    pub fn with_scope(mut self, scope: Vec<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn derived_urls(&self) -> &DerivedUrls {
        &self.urls
    }

    /// A login URL together with the code verifier belonging to its PKCE
    /// challenge. The verifier must be kept until the authorization code
    /// arrives at the callback URL and is passed to [`Self::exchange_code`].
    pub fn login_url(&self) -> (Url, CodeVerifier) {
        let code_verifier = CodeVerifier::generate();
        let login_url = login::create_login_url(
            &self.auth0,
            &self.urls,
            &code_verifier.to_code_challenge(),
            &self.scope,
        );
        (login_url, code_verifier)
    }

    pub fn logout_url(&self) -> Url {
        logout::create_logout_url(&self.auth0, &self.urls)
    }

    /// Exchanges the authorization code received at the callback URL for
    /// tokens.
    ///
    /// # Errors
    /// Returns a [`RequestError`] on transport failures or when Auth0 answers
    /// with an OAuth error response (e.g. a failed PKCE verification).
    pub async fn exchange_code(
        &self,
        code: impl AsRef<str>,
        code_verifier: &CodeVerifier,
    ) -> Result<TokenData, RequestError> {
        request::exchange_code_for_token(
            &self.http_client,
            self.urls.token_endpoint.clone(),
            &self.auth0.client_id,
            &self.auth0.callback_url,
            code,
            code_verifier.code_verifier(),
        )
        .await
    }

    /// Obtains fresh tokens using a refresh token.
    ///
    /// # Errors
    /// Returns a [`RequestError`] on transport failures or when Auth0 answers
    /// with an OAuth error response. [`crate::ErrorResponse::is_invalid_grant`]
    /// on the contained error response tells whether the user must log in
    /// again.
    pub async fn refresh(&self, refresh_token: impl AsRef<str>) -> Result<TokenData, RequestError> {
        request::refresh_token(
            &self.http_client,
            self.urls.token_endpoint.clone(),
            &self.auth0.client_id,
            refresh_token,
        )
        .await
    }

    /// Validates an access token against the tenant's JWK set, expecting the
    /// configured audience and the tenant issuer, and decodes its claims.
    ///
    /// # Errors
    /// Fails with [`Auth0Error::Request`] when the JWK set cannot be fetched
    /// and with [`Auth0Error::Validation`] when the token does not hold up.
    pub async fn validate_access_token(
        &self,
        access_token: impl AsRef<str>,
    ) -> Result<Auth0AccessTokenClaims, Auth0Error> {
        use snafu::ResultExt;

        let jwk_set = self
            .jwk_set()
            .await
            .context(crate::error::RequestSnafu {})?;

        token_validation::validate(
            access_token.as_ref(),
            &jwk_set,
            Some(&[self.auth0.audience.clone()]),
            Some(&[self.urls.issuer.to_string()]),
        )
        .context(crate::error::ValidationSnafu {})
    }

    /// The tenant's JWK set, fetched on first use and re-fetched once older
    /// than the configured max age.
    ///
    /// # Errors
    /// Returns a [`RequestError`] when the set must be (re-)fetched and the
    /// request fails. A cached set is never dropped on a failed refresh.
    pub async fn jwk_set(&self) -> Result<JwkSet, RequestError> {
        let cached = self
            .jwk_set
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        if let Some(cached) = cached {
            if OffsetDateTime::now_utc() - cached.retrieved <= self.max_jwk_set_age {
                return Ok(cached.jwk_set);
            }
            tracing::trace!("Cached JWK set is stale, re-fetching");
        }

        let jwk_set =
            request::retrieve_jwk_set(&self.http_client, self.urls.jwks_endpoint.clone()).await?;

        *self
            .jwk_set
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(JwkSetWithTimestamp {
            jwk_set: jwk_set.clone(),
            retrieved: OffsetDateTime::now_utc(),
        });
        Ok(jwk_set)
    }
}
