//! Types shared by every Synthara feature crate

mod error;
mod http_client;

pub use error::{HttpError, upstream_status};
pub use http_client::http_client;
