// x1-api: Async Rust client for the Gira X1 IoT REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;
pub mod uiconfig;
pub mod values;

pub use client::X1Client;
pub use error::Error;
pub use models::{ValueRecord, WireValue};
pub use transport::{TlsMode, TransportConfig};
pub use uiconfig::Expand;
