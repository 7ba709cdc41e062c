use url::Url;

use crate::endpoints::DerivedUrls;
use crate::environment::Auth0Config;

/// Builds the URL a user must be sent to in order to log out.
///
/// Auth0's `/v2/logout` endpoint clears the tenant session and then redirects
/// to `returnTo`, which must be listed as an allowed logout URL in the Auth0
/// dashboard. We send the user back to the frontend's callback URL.
pub fn create_logout_url(auth0: &Auth0Config, urls: &DerivedUrls) -> Url {
    let mut logout_url: Url = urls.end_session_endpoint.clone();
    logout_url
        .query_pairs_mut()
        .append_pair("client_id", &auth0.client_id)
        .append_pair("returnTo", &auth0.callback_url);
    logout_url
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;

    use crate::endpoints::DerivedUrls;
    use crate::environment::DEVELOPMENT;

    use super::create_logout_url;

    #[test]
    fn logout_url_targets_the_end_session_endpoint() {
        let urls = DerivedUrls::derive(&DEVELOPMENT.auth0).unwrap();
        let logout_url = create_logout_url(&DEVELOPMENT.auth0, &urls);

        assert_that(logout_url.host_str().unwrap()).is_equal_to("coffee-shop2020.us.auth0.com");
        assert_that(logout_url.path()).is_equal_to("/v2/logout");
    }

    #[test]
    fn logout_url_returns_to_the_callback_url() {
        let urls = DerivedUrls::derive(&DEVELOPMENT.auth0).unwrap();
        let logout_url = create_logout_url(&DEVELOPMENT.auth0, &urls);

        let return_to = logout_url
            .query_pairs()
            .find(|(key, _)| key == "returnTo")
            .map(|(_, value)| value.into_owned());
        assert_that(return_to).is_equal_to(Some("http://localhost:8100".to_owned()));
    }
}
