use url::Url;

/// Prefix `https://` when the input carries no http(s) scheme.
///
/// Returns `None` for blank input or anything that still fails to parse.
pub fn normalize_target_url(input: &str) -> Option<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    Url::parse(&candidate).ok().filter(|url| url.host_str().is_some())
}

/// Host of the URL with a leading `www.` removed.
///
/// Falls back to the raw input when it cannot be parsed.
pub fn display_domain(input: &str) -> String {
    match Url::parse(input) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            host.strip_prefix("www.").unwrap_or(host).to_string()
        }
        Err(_) => input.to_string(),
    }
}
