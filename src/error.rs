use snafu::Snafu;

use crate::request::RequestError;
use crate::token_validation::JwtValidationError;

/// An enumeration representing various authentication-related errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Auth0Error {
    #[snafu(display("Auth0Error: Request error"))]
    Request { source: RequestError },

    #[snafu(display("Auth0Error: Token validation failed"))]
    Validation { source: JwtValidationError },
}
