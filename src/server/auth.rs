//! Caller authentication by shared API key

use crate::config::SecretString;
use crate::server::errors::ApiError;
use axum::http::HeaderMap;
use secrecy::ExposeSecret;

/// Header carrying the caller's key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Check the `x-api-key` header against the configured key
///
/// A missing or blank header is [`ApiError::MissingApiKey`]; any other
/// value that differs from the key is [`ApiError::InvalidApiKey`].
pub fn authorize(headers: &HeaderMap, expected: &SecretString) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingApiKey)?;

    if expected.expose_secret().matches(provided) {
        Ok(())
    } else {
        Err(ApiError::InvalidApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use axum::http::HeaderValue;

    fn headers_with(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(key).unwrap());
        headers
    }

    #[test]
    fn test_valid_key() {
        let expected = secret_string("s3cret".to_string());
        assert!(authorize(&headers_with("s3cret"), &expected).is_ok());
        assert!(authorize(&headers_with(" s3cret "), &expected).is_ok());
    }

    #[test]
    fn test_missing_key() {
        let expected = secret_string("s3cret".to_string());
        assert!(matches!(
            authorize(&HeaderMap::new(), &expected),
            Err(ApiError::MissingApiKey)
        ));
        assert!(matches!(
            authorize(&headers_with(""), &expected),
            Err(ApiError::MissingApiKey)
        ));
    }

    #[test]
    fn test_wrong_key() {
        let expected = secret_string("s3cret".to_string());
        assert!(matches!(
            authorize(&headers_with("guess"), &expected),
            Err(ApiError::InvalidApiKey)
        ));
    }
}
