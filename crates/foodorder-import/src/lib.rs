pub mod csv_upload;
pub mod error;
#[cfg(feature = "remote")]
pub mod remote;

pub use csv_upload::{parse_orders_csv, read_orders_csv, ParsedUpload};
pub use error::{ImportError, Result};
#[cfg(feature = "remote")]
pub use remote::GatewayClient;
