use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Deployment-specific constants for the Coffee Shop frontend.
///
/// One instance exists per build profile ([`DEVELOPMENT`], [`PRODUCTION`]).
/// The active profile is selected at compile time through the `production`
/// cargo feature, see [`EnvironmentConfig::active`]. Instances are never
/// mutated after construction.
///
/// The serialized form (field names and the nested `auth0` object) matches
/// the `environment.ts` file consumed by the original Angular frontend and
/// must stay stable, as other tooling reads the same JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Whether this is a production build profile.
    pub production: bool,

    /// Base URL of the drinks API backend, e.g. "http://127.0.0.1:5000".
    #[serde(rename = "apiServerUrl")]
    pub api_server_url: String,

    /// Auth0 integration settings.
    pub auth0: Auth0Config,
}

/// The Auth0 tenant settings issued for the Coffee Shop application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Auth0Config {
    /// The Auth0 tenant domain prefix, e.g. "coffee-shop2020.us".
    /// The full tenant domain is `{url}.auth0.com`.
    pub url: String,

    /// The audience (API identifier) access tokens must be issued for.
    pub audience: String,

    /// The public client ID generated for this application in the Auth0
    /// dashboard.
    #[serde(rename = "clientId")]
    pub client_id: String,

    /// Base URL of the running frontend. Auth0 redirects here after
    /// completing an authentication flow.
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

/// The development profile, pointing at a locally running Flask backend and
/// Ionic frontend.
pub static DEVELOPMENT: LazyLock<EnvironmentConfig> = LazyLock::new(|| EnvironmentConfig {
    production: false,
    api_server_url: "http://127.0.0.1:5000".to_owned(),
    auth0: Auth0Config {
        url: "coffee-shop2020.us".to_owned(),
        audience: "coffee".to_owned(),
        client_id: "6A1vETyup8EP71aCQJsVD65aldz1VM9d".to_owned(),
        callback_url: "http://localhost:8100".to_owned(),
    },
});

/// The production profile. Same tenant, deployed backend and frontend.
pub static PRODUCTION: LazyLock<EnvironmentConfig> = LazyLock::new(|| EnvironmentConfig {
    production: true,
    api_server_url: "https://coffee-shop2020.herokuapp.com".to_owned(),
    auth0: Auth0Config {
        url: "coffee-shop2020.us".to_owned(),
        audience: "coffee".to_owned(),
        client_id: "6A1vETyup8EP71aCQJsVD65aldz1VM9d".to_owned(),
        callback_url: "https://coffee-shop2020.netlify.app".to_owned(),
    },
});

impl EnvironmentConfig {
    /// The profile selected for this build: [`PRODUCTION`] when the
    /// `production` cargo feature is enabled, [`DEVELOPMENT`] otherwise.
    pub fn active() -> &'static EnvironmentConfig {
        if cfg!(feature = "production") {
            &PRODUCTION
        } else {
            &DEVELOPMENT
        }
    }
}
