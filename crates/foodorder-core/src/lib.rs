pub mod domain;
pub mod dto;
pub mod error;
pub mod mailto;
pub mod rules;
pub mod session;
pub mod time;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use mailto::{
    chunk_recipients, mailto_links, validate_max_bcc_chars, MailTemplate, RestaurantMailto,
    DEFAULT_MAX_BCC_CHARS,
};
pub use rules::*;
pub use session::{reduce, Action, ViewError, ViewState};
