// Typed client for the external gallery backend (HTTP)

pub mod client;
pub mod types;

pub use client::{BackendClient, BackendConfig, BackendError};
pub use types::*;
