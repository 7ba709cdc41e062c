use snafu::{ResultExt, Snafu};
use url::Url;

use crate::environment::Auth0Config;
use crate::{AuthorizationEndpoint, EndSessionEndpoint, JwkSetEndpoint, TokenEndpoint};

#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DerivedUrlError {
    #[snafu(display("DerivedUrlError: Could not parse '{input}'"))]
    Parsing { input: String, source: url::ParseError },
}

/// Auth0 endpoint URLs derived from the tenant settings of an
/// [`crate::EnvironmentConfig`]. Auth0 does not require an OIDC discovery
/// round-trip for these, all of them follow directly from the tenant domain.
///
/// Endpoints include:
/// - **Authorization Endpoint**: For initiating the authorization code flow
/// - **Token Endpoint**: For exchanging authorization codes and refreshing tokens
/// - **JWK Set Endpoint**: For fetching public keys to verify token signatures
/// - **End Session Endpoint**: For logout operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedUrls {
    /// Expected `iss` claim of tokens issued by this tenant.
    /// Note the trailing slash, Auth0 includes it.
    pub issuer: Url,

    pub authorization_endpoint: AuthorizationEndpoint,

    pub token_endpoint: TokenEndpoint,

    pub jwks_endpoint: JwkSetEndpoint,

    pub end_session_endpoint: EndSessionEndpoint,
}

impl Auth0Config {
    /// The full tenant domain, e.g. "coffee-shop2020.us.auth0.com".
    pub fn tenant_domain(&self) -> String {
        format!("{}.auth0.com", self.url)
    }
}

impl DerivedUrls {
    /// Derives all endpoint URLs for the given tenant.
    ///
    /// # Errors
    /// Returns a [`DerivedUrlError`] if the tenant domain prefix does not
    /// form valid URLs.
    pub fn derive(auth0: &Auth0Config) -> Result<Self, DerivedUrlError> {
        let domain = auth0.tenant_domain();
        Ok(Self {
            issuer: parse(format!("https://{domain}/"))?,
            authorization_endpoint: parse(format!("https://{domain}/authorize"))?,
            token_endpoint: parse(format!("https://{domain}/oauth/token"))?,
            jwks_endpoint: parse(format!("https://{domain}/.well-known/jwks.json"))?,
            end_session_endpoint: parse(format!("https://{domain}/v2/logout"))?,
        })
    }
}

fn parse(input: String) -> Result<Url, DerivedUrlError> {
    Url::parse(&input).context(ParsingSnafu { input })
}
