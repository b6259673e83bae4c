pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;

pub use client::{Client, Scope};
pub use config::ClientConfig;
pub use error::{InvokeError, TransportError};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
