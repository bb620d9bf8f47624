//! Shared construction helpers for HTTP-backed service clients.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use tenancy::{TenancyError, TenancyResult};
use url::Url;

pub(crate) fn bearer_headers(token: &str) -> TenancyResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| TenancyError::Configuration(format!("invalid API key: {e}")))?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

pub(crate) fn key_header(name: &'static str, token: &str) -> TenancyResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::from_str(token)
        .map_err(|e| TenancyError::Configuration(format!("invalid API key: {e}")))?;
    value.set_sensitive(true);
    headers.insert(HeaderName::from_static(name), value);
    Ok(headers)
}

pub(crate) fn client(headers: HeaderMap, timeout: Duration) -> TenancyResult<reqwest::Client> {
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| TenancyError::Configuration(format!("build HTTP client: {e}")))
}

pub(crate) fn base_url(raw: &str) -> TenancyResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| TenancyError::Configuration(format!("invalid base URL '{raw}': {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(TenancyError::Configuration(format!(
            "unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_rejects_non_http_schemes() {
        assert!(base_url("ftp://example.com").is_err());
        assert!(base_url("not a url").is_err());
        assert!(base_url("https://api.example.com/v1").is_ok());
    }

    #[test]
    fn test_bearer_headers_are_sensitive() {
        let headers = bearer_headers("secret").unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_invalid_header_value_is_a_config_error() {
        assert!(bearer_headers("bad\nkey").is_err());
    }
}
