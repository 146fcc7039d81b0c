//! Small helpers for signup validation and verification links.

use regex::Regex;
use url::Url;

use super::VERIFY_EMAIL_PATH;

/// Normalize an email for lookup/uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(super) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Build the link embedded in verification emails.
///
/// Any path on `base_url` is kept as a prefix and the token is query-encoded.
pub(super) fn build_verify_url(base_url: &str, token: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    let path = format!("{}{VERIFY_EMAIL_PATH}", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut().append_pair("token", token);
    Ok(url.into())
}
