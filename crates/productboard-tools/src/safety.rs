//! Outbound URL checks and redaction.

use crate::runtime::ProductboardToolsError;
use url::Url;

/// Parse and check the configured API base URL.
///
/// Only `http(s)` URLs with a host are accepted.
///
/// # Errors
///
/// Returns a config error if the URL does not parse, uses another scheme, or has no host.
pub fn validate_base_url(raw: &str) -> Result<Url, ProductboardToolsError> {
    let url = Url::parse(raw).map_err(|e| {
        ProductboardToolsError::Config(format!("Invalid base URL '{raw}': {e}"))
    })?;

    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ProductboardToolsError::Config(format!(
            "Invalid base URL '{raw}': unsupported scheme '{scheme}'"
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ProductboardToolsError::Config(format!(
            "Invalid base URL '{raw}': missing host"
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ProductboardToolsError::Config(format!(
            "Invalid base URL '{raw}': cannot be used as a base"
        )));
    }

    Ok(url)
}

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Ids travel in the query string (custom field values); keep them out of messages.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_base_url() {
        let url = validate_base_url("https://api.productboard.com").expect("valid");
        assert_eq!(url.host_str(), Some("api.productboard.com"));
    }

    #[test]
    fn rejects_non_http_schemes() {
        let err = validate_base_url("ftp://api.productboard.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));

        let err = validate_base_url("not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[test]
    fn redact_url_drops_query_and_credentials() {
        let url = Url::parse(
            "https://user:pw@api.productboard.com/hierarchy-entities/custom-fields-values/value?customField.id=cf1#frag",
        )
        .expect("url");
        assert_eq!(
            redact_url(&url),
            "https://api.productboard.com/hierarchy-entities/custom-fields-values/value"
        );
    }
}
