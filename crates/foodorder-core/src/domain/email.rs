use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$"
    )
    .expect("email pattern");
}

/// Syntactic email check: dot-atom local part, dotted domain with a TLD.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, _domain)) = value.split_once('@') else {
        return false;
    };
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    value.len() <= 254 && local.len() <= 64 && EMAIL_RE.is_match(value)
}

/// Text before the first `@`, or the whole value when there is none.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}

/// Human name guessed from an address: `rosa.parks@x.com` -> `rosa parks`.
pub fn display_name_from_email(email: &str) -> String {
    email_local_part(email.trim()).replace('.', " ")
}
