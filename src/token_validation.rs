use snafu::{ResultExt, Snafu};

use crate::token_claims::{Auth0AccessTokenClaims, RawAccessTokenClaims};

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum JwtValidationError {
    #[snafu(display(
        "JwtValidationError: Could not decode JWT header. Input may have the wrong format"
    ))]
    DecodeHeader { source: jsonwebtoken::errors::Error },

    #[snafu(display(
        "JwtValidationError: Could not find a JWK which would match the tokens 'kid': {token_kid:?}"
    ))]
    NoMatchingJwk { token_kid: Option<String> },

    #[snafu(display("JwtValidationError: Could not construct DecodingKey from JWK"))]
    JwkToDecodingKey { source: jsonwebtoken::errors::Error },

    #[snafu(display("JwtValidationError: Could not decode JWT"))]
    Decode { source: jsonwebtoken::errors::Error },
}

/// Validates the signature, expiry and (when given) audience and issuer of an
/// access token and decodes its claims.
///
/// The signing key is looked up in the given JWK set through the token
/// header's `kid`, as Auth0 rotates signing keys.
///
/// # Errors
/// Returns a [`JwtValidationError`] describing the first check that failed.
pub fn validate(
    access_token: &str,
    jwk_set: &jsonwebtoken::jwk::JwkSet,
    expected_audiences: Option<&[String]>,
    expected_issuers: Option<&[String]>,
) -> Result<Auth0AccessTokenClaims, JwtValidationError> {
    let raw_claims = validate_and_decode_base64_encoded_token(
        access_token,
        expected_audiences,
        expected_issuers,
        jwk_set,
    )?;

    Ok(Auth0AccessTokenClaims::from(raw_claims))
}

fn validate_and_decode_base64_encoded_token(
    base64_encoded_token: &str,
    expected_audiences: Option<&[String]>,
    expected_issuers: Option<&[String]>,
    jwk_set: &jsonwebtoken::jwk::JwkSet,
) -> Result<RawAccessTokenClaims, JwtValidationError> {
    let jwt_header =
        jsonwebtoken::decode_header(base64_encoded_token).context(DecodeHeaderSnafu {})?;

    tracing::trace!(?jwt_header, "Decoded JWT header");

    let mut validation = jsonwebtoken::Validation::new(jwt_header.alg);
    if let Some(expected_audiences) = expected_audiences {
        validation.set_audience(expected_audiences);
    }
    if let Some(expected_issuers) = expected_issuers {
        validation.set_issuer(expected_issuers);
    }

    let jwk = jwk_set
        .keys
        .iter()
        .find(|it| it.common.key_id == jwt_header.kid)
        .ok_or_else(|| {
            NoMatchingJwkSnafu {
                token_kid: jwt_header.kid,
            }
            .build()
        })?;

    let jwt_decoding_key =
        jsonwebtoken::DecodingKey::from_jwk(jwk).context(JwkToDecodingKeySnafu {})?;

    let token_data = jsonwebtoken::decode::<RawAccessTokenClaims>(
        base64_encoded_token,
        &jwt_decoding_key,
        &validation,
    )
    .context(DecodeSnafu {})?;

    let raw_claims: RawAccessTokenClaims = token_data.claims;
    tracing::trace!(?raw_claims, "Decoded JWT");

    Ok(raw_claims)
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;
    use time::OffsetDateTime;

    use super::{JwtValidationError, validate};

    const SECRET: &[u8] = b"coffee-shop-test-secret";
    const KID: &str = "test-key-1";

    fn jwk_set() -> jsonwebtoken::jwk::JwkSet {
        serde_json::from_value(json!({
            "keys": [{
                "kty": "oct",
                "kid": KID,
                "k": URL_SAFE_NO_PAD.encode(SECRET),
            }]
        }))
        .unwrap()
    }

    fn sign_token(kid: Option<&str>, claims: serde_json::Value) -> String {
        let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256);
        header.kid = kid.map(ToOwned::to_owned);
        jsonwebtoken::encode(
            &header,
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn barista_claims(expires_at: i64) -> serde_json::Value {
        json!({
            "iss": "https://coffee-shop2020.us.auth0.com/",
            "sub": "auth0|barista",
            "aud": "coffee",
            "exp": expires_at,
            "iat": expires_at - 86400,
            "permissions": ["get:drinks-detail"],
        })
    }

    fn in_one_hour() -> i64 {
        (OffsetDateTime::now_utc() + time::Duration::hours(1)).unix_timestamp()
    }

    #[test]
    fn valid_token_decodes_into_claims() {
        let token = sign_token(Some(KID), barista_claims(in_one_hour()));
        let claims = validate(
            &token,
            &jwk_set(),
            Some(&["coffee".to_owned()]),
            Some(&["https://coffee-shop2020.us.auth0.com/".to_owned()]),
        )
        .unwrap();

        assert_that(claims.subject_identifier.as_str()).is_equal_to("auth0|barista");
        assert_that(claims.has_permission("get:drinks-detail")).is_true();
    }

    #[test]
    fn token_with_unknown_kid_is_rejected() {
        let token = sign_token(Some("other-key"), barista_claims(in_one_hour()));
        let err = validate(&token, &jwk_set(), None, None).unwrap_err();
        assert_that(err).is_equal_to(JwtValidationError::NoMatchingJwk {
            token_kid: Some("other-key".to_owned()),
        });
    }

    #[test]
    fn expired_token_is_rejected() {
        let expires_at = (OffsetDateTime::now_utc() - time::Duration::hours(1)).unix_timestamp();
        let token = sign_token(Some(KID), barista_claims(expires_at));
        let err = validate(&token, &jwk_set(), None, None).unwrap_err();
        assert_that(matches!(err, JwtValidationError::Decode { .. })).is_true();
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let token = sign_token(Some(KID), barista_claims(in_one_hour()));
        let err = validate(&token, &jwk_set(), Some(&["tea".to_owned()]), None).unwrap_err();
        assert_that(matches!(err, JwtValidationError::Decode { .. })).is_true();
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let token = sign_token(Some(KID), barista_claims(in_one_hour()));
        let err = validate(
            &token,
            &jwk_set(),
            None,
            Some(&["https://other-tenant.us.auth0.com/".to_owned()]),
        )
        .unwrap_err();
        assert_that(matches!(err, JwtValidationError::Decode { .. })).is_true();
    }

    #[test]
    fn garbage_input_fails_at_the_header() {
        let err = validate("not-a-jwt", &jwk_set(), None, None).unwrap_err();
        assert_that(matches!(err, JwtValidationError::DecodeHeader { .. })).is_true();
    }
}
