use http::StatusCode;
use snafu::{ResultExt, Snafu};
use url::Url;

use crate::drinks::{ApiErrorBody, DeleteEnvelope, Drink, DrinkSummary, DrinkUpdate, DrinksEnvelope, NewDrink};
use crate::endpoints::{DerivedUrlError, ParsingSnafu};
use crate::environment::EnvironmentConfig;

#[derive(Debug, Snafu)]
pub enum ApiError {
    #[snafu(display("ApiError: Could not send request"))]
    Send { source: reqwest::Error },

    #[snafu(display("ApiError: Could not decode payload"))]
    Decode { source: reqwest::Error },

    #[snafu(display("ApiError: API responded with status {status}: {}", error_response.message))]
    ErrResponse {
        status: StatusCode,
        error_response: ApiErrorBody,
    },
}

/// Client for the drinks API configured through
/// [`EnvironmentConfig::api_server_url`].
///
/// All requests automatically include the configured access token in the
/// `Authorization` header as a bearer token. The public listing endpoint
/// works without one, every other endpoint requires a token granting the
/// matching permission (see [`crate::drinks::permissions`]).
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given API base URL.
    ///
    /// # Errors
    /// Returns a [`DerivedUrlError`] if the base URL cannot be parsed.
    pub fn new(api_server_url: &str) -> Result<Self, DerivedUrlError> {
        let base_url = Url::parse(api_server_url).context(ParsingSnafu {
            input: api_server_url.to_owned(),
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            access_token: None,
        })
    }

    /// Creates a client for the active build profile's API server.
    ///
    /// # Errors
    /// Returns a [`DerivedUrlError`] if the configured base URL cannot be
    /// parsed.
    pub fn from_environment(environment: &EnvironmentConfig) -> Result<Self, DerivedUrlError> {
        Self::new(&environment.api_server_url)
    }

    /// Attaches the access token sent with subsequent requests.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Fetches all drinks in their public short representation.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failures or error responses.
    /// The API reports 404 when no drinks exist at all.
    pub async fn drinks(&self) -> Result<Vec<DrinkSummary>, ApiError> {
        let response = self.send(self.client.get(self.endpoint(&["drinks"]))).await?;
        let envelope = response
            .json::<DrinksEnvelope<DrinkSummary>>()
            .await
            .context(DecodeSnafu {})?;
        Ok(envelope.drinks)
    }

    /// Fetches all drinks with their full recipes.
    /// Requires the `get:drinks-detail` permission.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failures or error responses.
    pub async fn drinks_detail(&self) -> Result<Vec<Drink>, ApiError> {
        let response = self
            .send(self.client.get(self.endpoint(&["drinks-detail"])))
            .await?;
        let envelope = response
            .json::<DrinksEnvelope<Drink>>()
            .await
            .context(DecodeSnafu {})?;
        Ok(envelope.drinks)
    }

    /// Creates a new drink and returns it as stored by the API.
    /// Requires the `post:drinks` permission.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failures or error responses,
    /// e.g. 400 for a recipe not in the full representation.
    pub async fn create_drink(&self, drink: &NewDrink) -> Result<Vec<Drink>, ApiError> {
        let response = self
            .send(self.client.post(self.endpoint(&["drinks"])).json(drink))
            .await?;
        let envelope = response
            .json::<DrinksEnvelope<Drink>>()
            .await
            .context(DecodeSnafu {})?;
        Ok(envelope.drinks)
    }

    /// Partially updates the drink with the given id.
    /// Requires the `patch:drinks` permission.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failures or error responses,
    /// e.g. 404 for an unknown id.
    pub async fn update_drink(&self, id: i64, update: &DrinkUpdate) -> Result<Vec<Drink>, ApiError> {
        let response = self
            .send(
                self.client
                    .patch(self.endpoint(&["drinks", &id.to_string()]))
                    .json(update),
            )
            .await?;
        let envelope = response
            .json::<DrinksEnvelope<Drink>>()
            .await
            .context(DecodeSnafu {})?;
        Ok(envelope.drinks)
    }

    /// Deletes the drink with the given id and returns the deleted id.
    /// Requires the `delete:drinks` permission.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failures or error responses,
    /// e.g. 404 for an unknown id.
    pub async fn delete_drink(&self, id: i64) -> Result<i64, ApiError> {
        let response = self
            .send(self.client.delete(self.endpoint(&["drinks", &id.to_string()])))
            .await?;
        let envelope = response
            .json::<DeleteEnvelope>()
            .await
            .context(DecodeSnafu {})?;
        Ok(envelope.delete)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("no cannot-be-a-base url")
            .pop_if_empty()
            .extend(segments);
        url
    }

    /// Sends the request with the access token attached and turns non-2xx
    /// responses into [`ApiError::ErrResponse`], decoding the API's error
    /// envelope. An undecodable error body is reported with the plain status
    /// text instead.
    async fn send(&self, mut req_builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        if let Some(access_token) = &self.access_token {
            req_builder = req_builder.bearer_auth(access_token);
        }
        let response = req_builder.send().await.context(SendSnafu {})?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_response = match response.json::<ApiErrorBody>().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(?err, %status, "API error response carried no decodable error body");
                ApiErrorBody {
                    success: false,
                    error: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_owned(),
                }
            }
        };
        Err(ErrResponseSnafu {
            status,
            error_response,
        }
        .build())
    }
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;

    use super::ApiClient;

    #[test]
    fn endpoints_are_joined_onto_the_base_url() {
        let client = ApiClient::new("http://127.0.0.1:5000").unwrap();
        assert_that(client.endpoint(&["drinks"]).as_str())
            .is_equal_to("http://127.0.0.1:5000/drinks");
        assert_that(client.endpoint(&["drinks", "1"]).as_str())
            .is_equal_to("http://127.0.0.1:5000/drinks/1");
    }

    #[test]
    fn trailing_slash_in_the_base_url_is_tolerated() {
        let client = ApiClient::new("http://127.0.0.1:5000/").unwrap();
        assert_that(client.endpoint(&["drinks"]).as_str())
            .is_equal_to("http://127.0.0.1:5000/drinks");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert_that(ApiClient::new("not a url").is_err()).is_true();
    }
}
