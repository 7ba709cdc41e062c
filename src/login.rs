use std::borrow::Cow;

use itertools::Itertools;
use url::Url;

use crate::code_verifier::CodeChallenge;
use crate::endpoints::DerivedUrls;
use crate::environment::Auth0Config;

/// Builds the URL a user must be sent to in order to log in, following the
/// authorization code flow with PKCE.
///
/// In addition to the standard OAuth parameters, Auth0 expects the `audience`
/// parameter, without it the returned access token is an opaque token that
/// cannot be verified by the drinks API.
///
/// The configured scopes are always extended with `openid`.
pub fn create_login_url(
    auth0: &Auth0Config,
    urls: &DerivedUrls,
    code_challenge: &CodeChallenge,
    scope: &[String],
) -> Url {
    let scope = match scope.len() {
        0 => Cow::Borrowed("openid"),
        _ => Cow::Owned(scope.iter().map(|it| it.trim()).chain(["openid"]).join(" ")),
    };

    let mut login_url: Url = urls.authorization_endpoint.clone();
    login_url
        .query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("code_challenge", code_challenge.code_challenge())
        .append_pair(
            "code_challenge_method",
            code_challenge.code_challenge_method().as_str(),
        )
        .append_pair("client_id", &auth0.client_id)
        .append_pair("redirect_uri", &auth0.callback_url)
        .append_pair("audience", &auth0.audience)
        .append_pair("scope", &scope);
    login_url
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;

    use crate::code_verifier::CodeVerifier;
    use crate::endpoints::DerivedUrls;
    use crate::environment::DEVELOPMENT;

    use super::create_login_url;

    fn query_param(url: &url::Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[test]
    fn login_url_targets_the_authorization_endpoint() {
        let urls = DerivedUrls::derive(&DEVELOPMENT.auth0).unwrap();
        let challenge = CodeVerifier::generate().to_code_challenge();
        let login_url = create_login_url(&DEVELOPMENT.auth0, &urls, &challenge, &[]);

        assert_that(login_url.host_str().unwrap()).is_equal_to("coffee-shop2020.us.auth0.com");
        assert_that(login_url.path()).is_equal_to("/authorize");
    }

    #[test]
    fn login_url_carries_client_audience_and_pkce_parameters() {
        let urls = DerivedUrls::derive(&DEVELOPMENT.auth0).unwrap();
        let challenge = CodeVerifier::generate().to_code_challenge();
        let login_url = create_login_url(&DEVELOPMENT.auth0, &urls, &challenge, &[]);

        assert_that(query_param(&login_url, "response_type"))
            .is_equal_to(Some("code".to_owned()));
        assert_that(query_param(&login_url, "client_id"))
            .is_equal_to(Some(DEVELOPMENT.auth0.client_id.clone()));
        assert_that(query_param(&login_url, "redirect_uri"))
            .is_equal_to(Some("http://localhost:8100".to_owned()));
        assert_that(query_param(&login_url, "audience")).is_equal_to(Some("coffee".to_owned()));
        assert_that(query_param(&login_url, "code_challenge"))
            .is_equal_to(Some(challenge.code_challenge().to_owned()));
        assert_that(query_param(&login_url, "code_challenge_method"))
            .is_equal_to(Some("S256".to_owned()));
    }

    #[test]
    fn empty_scope_defaults_to_openid() {
        let urls = DerivedUrls::derive(&DEVELOPMENT.auth0).unwrap();
        let challenge = CodeVerifier::generate().to_code_challenge();
        let login_url = create_login_url(&DEVELOPMENT.auth0, &urls, &challenge, &[]);

        assert_that(query_param(&login_url, "scope")).is_equal_to(Some("openid".to_owned()));
    }

    #[test]
    fn scopes_are_joined_and_extended_with_openid() {
        let urls = DerivedUrls::derive(&DEVELOPMENT.auth0).unwrap();
        let challenge = CodeVerifier::generate().to_code_challenge();
        let login_url = create_login_url(
            &DEVELOPMENT.auth0,
            &urls,
            &challenge,
            &["profile".to_owned(), " email ".to_owned()],
        );

        assert_that(query_param(&login_url, "scope"))
            .is_equal_to(Some("profile email openid".to_owned()));
    }
}
