//! Client-side support for the Coffee Shop application: the per-profile
//! environment configuration, the Auth0 integration reading it, and a client
//! for the drinks API.
//!
//! ```no_run
//! use coffee_shop_client::{ApiClient, Auth0Client, EnvironmentConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // The profile is selected at compile time via the `production` feature.
//! let environment = EnvironmentConfig::active();
//!
//! // Send the user to Auth0, keep the verifier for the callback.
//! let auth = Auth0Client::from_environment(environment)?;
//! let (login_url, code_verifier) = auth.login_url();
//!
//! // Back at the callback URL, trade the received code for tokens and use
//! // the access token against the drinks API.
//! let token = auth.exchange_code("received-code", &code_verifier).await?;
//! let api = ApiClient::from_environment(environment)?.with_access_token(token.access_token);
//! for drink in api.drinks_detail().await? {
//!     println!("{}: {} ingredients", drink.title, drink.recipe.len());
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod auth;
mod code_verifier;
mod endpoints;
mod environment;
mod error;
mod login;
mod logout;
mod request;
mod response;
mod token;
mod token_claims;
mod token_validation;

pub mod drinks;

// Library exports (additional to pub modules).
pub use api::{ApiClient, ApiError};
pub use auth::Auth0Client;
pub use code_verifier::{CodeChallenge, CodeChallengeMethod, CodeVerifier};
pub use endpoints::{DerivedUrlError, DerivedUrls};
pub use environment::{Auth0Config, DEVELOPMENT, EnvironmentConfig, PRODUCTION};
pub use error::Auth0Error;
pub use login::create_login_url;
pub use logout::create_logout_url;
pub use request::RequestError;
pub use response::{ErrorResponse, KnownOauthErrorCode, OauthErrorCode};
pub use token::TokenData;
pub use token_claims::{Audiences, Auth0AccessTokenClaims, PermissionError};
pub use token_validation::{JwtValidationError, validate};

pub mod url {
    pub use url::Url;
}
pub mod reqwest {
    pub use reqwest::*;
}

type AuthorizationEndpoint = ::url::Url;
type TokenEndpoint = ::url::Url;
type JwkSetEndpoint = ::url::Url;
type EndSessionEndpoint = ::url::Url;

