use super::error::ClientError;

pub const MAX_URL_LEN: usize = 2048;
pub const MAX_COMMENT_LEN: usize = 500;

/// Check a hyperlink before it is sent. Only http and https URLs are accepted.
pub fn validate_hyperlink(url: &str, comment: &str) -> Result<(), ClientError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ClientError::Validation("URL cannot be empty".into()));
    }
    if url.chars().count() > MAX_URL_LEN {
        return Err(ClientError::Validation(format!(
            "URL too long (max {MAX_URL_LEN} characters)"
        )));
    }
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(ClientError::Validation(format!(
            "comment too long (max {MAX_COMMENT_LEN} characters)"
        )));
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(ClientError::Validation(
            "invalid URL scheme: only http and https are supported".into(),
        ));
    };
    if scheme.is_empty() || rest.is_empty() || rest.starts_with('/') {
        return Err(ClientError::Validation("invalid URL format".into()));
    }
    if !matches!(scheme.to_ascii_lowercase().as_str(), "http" | "https") {
        return Err(ClientError::Validation(
            "invalid URL scheme: only http and https are supported".into(),
        ));
    }
    if rest.chars().any(char::is_whitespace) {
        return Err(ClientError::Validation("invalid URL format".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(url: &str, comment: &str) -> String {
        validate_hyperlink(url, comment).unwrap_err().to_string()
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_hyperlink("https://example.com/a?b=c", "").is_ok());
        assert!(validate_hyperlink("http://localhost:8080", "note").is_ok());
    }

    #[test]
    fn rejects_missing_or_foreign_scheme() {
        assert!(message("ftp://example.com", "").starts_with("invalid URL scheme"));
        assert!(message("example.com/page", "").starts_with("invalid URL scheme"));
    }

    #[test]
    fn rejects_malformed_url() {
        assert_eq!(message("://invalid", ""), "invalid URL format");
        assert_eq!(message("https://", ""), "invalid URL format");
        assert_eq!(message("https://exa mple.com", ""), "invalid URL format");
    }

    #[test]
    fn rejects_oversize_inputs() {
        let long_url = format!("https://example.com/{}", "a".repeat(MAX_URL_LEN));
        assert!(message(&long_url, "").starts_with("URL too long"));
        assert!(message("https://example.com", &"c".repeat(600)).starts_with("comment too long"));
        assert!(validate_hyperlink("https://example.com", &"c".repeat(500)).is_ok());
    }
}
