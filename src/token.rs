use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::response::SuccessTokenResponse;

/// A structure representing the storage of authentication tokens.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TokenData {
    /// Access token. Sent to the drinks API as a bearer token unless expired.
    pub access_token: String,

    /// Point in time when the `access_token` expires.
    #[serde(with = "time::serde::rfc3339")]
    pub access_token_expires_at: OffsetDateTime,

    /// The ID Token, containing claims about the authentication of the
    /// end-user. Only present when the `openid` scope was requested.
    pub id_token: Option<String>,

    /// Refresh token. May be used to obtain a new access token without user
    /// intervention. Only present when the `offline_access` scope was
    /// requested.
    pub refresh_token: Option<String>,

    /// The scopes actually granted, which may be fewer than requested.
    pub scope: Option<String>,

    /// Point in time this token data was received.
    /// This may be used to calculate an estimated lifetime of the access
    /// token.
    #[serde(with = "time::serde::rfc3339")]
    pub time_received: OffsetDateTime,
}

impl TokenData {
    pub fn access_token_time_left(&self) -> Duration {
        self.access_token_expires_at - OffsetDateTime::now_utc()
    }

    pub fn estimated_access_token_lifetime(&self) -> Duration {
        self.access_token_expires_at - self.time_received
    }

    pub fn access_token_expired(&self) -> bool {
        self.access_token_expires_at < OffsetDateTime::now_utc()
    }
}

impl From<SuccessTokenResponse> for TokenData {
    fn from(value: SuccessTokenResponse) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            access_token: value.access_token,
            access_token_expires_at: now + Duration::seconds(value.expires_in),
            id_token: value.id_token,
            refresh_token: value.refresh_token,
            scope: value.scope,
            time_received: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;
    use time::Duration;

    use crate::response::SuccessTokenResponse;

    use super::TokenData;

    fn token_response(expires_in: i64) -> SuccessTokenResponse {
        SuccessTokenResponse {
            access_token: "at".to_owned(),
            expires_in,
            token_type: Some("Bearer".to_owned()),
            id_token: None,
            refresh_token: Some("rt".to_owned()),
            scope: None,
        }
    }

    #[test]
    fn fresh_token_is_not_expired() {
        let token = TokenData::from(token_response(86400));
        assert_that(token.access_token_expired()).is_false();
        assert_that(token.access_token_time_left() > Duration::seconds(86000)).is_true();
    }

    #[test]
    fn token_with_elapsed_lifetime_is_expired() {
        let token = TokenData::from(token_response(-1));
        assert_that(token.access_token_expired()).is_true();
    }

    #[test]
    fn estimated_lifetime_matches_expires_in() {
        let token = TokenData::from(token_response(3600));
        assert_that(token.estimated_access_token_lifetime()).is_equal_to(Duration::seconds(3600));
    }
}
