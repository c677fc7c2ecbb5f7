//! `mailto:` links telling everyone who ordered from a restaurant that the
//! food has arrived.
//!
//! Mail clients and browsers truncate long `mailto:` URLs, so recipients are
//! split across several links, each with a bcc list shorter than
//! `max_bcc_chars`.

use crate::domain::restaurant::RestaurantTag;
use crate::error::CoreError;
use crate::rules::grouping::RestaurantGroups;
use serde::Serialize;
use url::form_urlencoded;

pub const DEFAULT_MAX_BCC_CHARS: usize = 1900;
pub const MIN_MAX_BCC_CHARS: usize = 64;

const RESTAURANT_PLACEHOLDER: &str = "{restaurant}";
const RECIPIENT_SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailTemplate {
    /// `{restaurant}` is replaced by the restaurant's display name.
    pub subject: String,
    pub body: String,
}

impl Default for MailTemplate {
    fn default() -> Self {
        Self {
            subject: "Your food from {restaurant} arrived!".to_string(),
            body: "Hi,\nPlease find your selected meal in the kitchen. \
                   Check the order list to remember what you ordered.\nHugs,\nThe lunch team"
                .to_string(),
        }
    }
}

impl MailTemplate {
    pub fn subject_for(&self, restaurant: &str) -> String {
        self.subject.replace(RESTAURANT_PLACEHOLDER, restaurant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantMailto {
    pub restaurant: RestaurantTag,
    pub display_name: String,
    pub recipients: usize,
    pub links: Vec<String>,
}

pub fn validate_max_bcc_chars(value: usize) -> Result<usize, CoreError> {
    if value >= MIN_MAX_BCC_CHARS {
        Ok(value)
    } else {
        Err(CoreError::InvalidMaxBccChars(value))
    }
}

pub fn mailto_links(
    groups: &RestaurantGroups,
    template: &MailTemplate,
    max_bcc_chars: usize,
) -> Vec<RestaurantMailto> {
    groups
        .iter()
        .filter_map(|group| {
            let mut recipients: Vec<&str> = Vec::new();
            for order in &group.orders {
                let email = order.email.as_str();
                if !email.is_empty() && !recipients.contains(&email) {
                    recipients.push(email);
                }
            }
            if recipients.is_empty() {
                return None;
            }

            let display_name = group.restaurant.display_name().to_string();
            let prefix = mailto_prefix(&template.subject_for(&display_name), &template.body);
            let encoded: Vec<String> =
                recipients.iter().map(|email| encode_address(email)).collect();
            let encoded_refs: Vec<&str> = encoded.iter().map(String::as_str).collect();
            let links = chunk_recipients(&encoded_refs, max_bcc_chars)
                .into_iter()
                .map(|bcc| format!("{prefix}{bcc}"))
                .collect();

            Some(RestaurantMailto {
                restaurant: group.restaurant.clone(),
                display_name,
                recipients: recipients.len(),
                links,
            })
        })
        .collect()
}

/// Joins addresses with `;`, starting a new chunk before one would reach
/// `max_chars`. An address that alone reaches the limit gets its own chunk.
/// Lengths are measured as given, so pass addresses already encoded for the URL.
pub fn chunk_recipients(emails: &[&str], max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for email in emails {
        if !current.is_empty() {
            if current.len() + 1 + email.len() >= max_chars {
                chunks.push(std::mem::take(&mut current));
            } else {
                current.push(RECIPIENT_SEPARATOR);
            }
        }
        current.push_str(email);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn mailto_prefix(subject: &str, body: &str) -> String {
    format!(
        "mailto:?subject={}&body={}&bcc=",
        encode_component(subject),
        encode_component(body)
    )
}

/// Like [`encode_component`] but leaves `@` readable; it is legal in a query.
fn encode_address(email: &str) -> String {
    encode_component(email).replace("%40", "@")
}

fn encode_component(value: &str) -> String {
    // form encoding writes spaces as '+', which mail clients show literally
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
