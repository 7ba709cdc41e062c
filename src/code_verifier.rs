/// PKCE code verifier as of RFC 7636.
///
/// Auth0 requires the authorization code flow with PKCE for single page
/// applications. The verifier is kept on the client between requesting the
/// login URL and exchanging the returned authorization code, which is why it
/// is (de)serializable.
///
/// see: <https://datatracker.ietf.org/doc/html/rfc7636>
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CodeVerifier {
    code_verifier: String,
}

impl CodeVerifier {
    /// Length of the generated verifier. RFC 7636 allows 43 to 128
    /// characters, we always generate the maximum.
    pub const LENGTH: usize = 128;

    pub fn generate() -> Self {
        use rand::Rng;

        const CHARSET: &[u8] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
        let mut rng = rand::rng();

        let code_verifier = (0..Self::LENGTH)
            .map(|_i| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect::<String>();

        Self { code_verifier }
    }

    pub fn to_code_challenge(&self) -> CodeChallenge {
        use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
        use sha2::Digest;

        let mut hasher = sha2::Sha256::new();
        hasher.update(self.code_verifier.as_bytes());
        let digest = hasher.finalize();

        let code_challenge = URL_SAFE_NO_PAD.encode(digest);

        CodeChallenge {
            code_challenge,
            code_challenge_method: CodeChallengeMethod::S256,
        }
    }

    pub fn code_verifier(&self) -> &str {
        self.code_verifier.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChallengeMethod {
    S256,
}

impl CodeChallengeMethod {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            CodeChallengeMethod::S256 => "S256",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge {
    code_challenge: String,
    code_challenge_method: CodeChallengeMethod,
}

impl CodeChallenge {
    pub fn code_challenge(&self) -> &str {
        self.code_challenge.as_str()
    }

    pub fn code_challenge_method(&self) -> CodeChallengeMethod {
        self.code_challenge_method
    }
}

#[cfg(test)]
mod test {
    use assertr::prelude::*;

    use super::{CodeChallengeMethod, CodeVerifier};

    #[test]
    fn generates_verifier_of_full_length() {
        let verifier = CodeVerifier::generate();
        assert_that(verifier.code_verifier()).has_length(CodeVerifier::LENGTH);
    }

    #[test]
    fn generates_distinct_verifiers() {
        let a = CodeVerifier::generate();
        let b = CodeVerifier::generate();
        assert_that(a == b).is_false();
    }

    #[test]
    fn challenge_is_a_base64url_encoded_sha256_digest() {
        let verifier = CodeVerifier::generate();
        let challenge = verifier.to_code_challenge();

        // 32 digest bytes encode to 43 characters without padding.
        assert_that(challenge.code_challenge()).has_length(43);
        assert_that(challenge.code_challenge_method()).is_equal_to(CodeChallengeMethod::S256);
    }
}
