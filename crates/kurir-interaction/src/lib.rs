//! Backend bindings for the Kurir chat client.
//!
//! This crate connects the session controller in `kurir-core` to a live
//! chat backend: an HTTP [`Transport`](kurir_core::transport::Transport)
//! implementation plus configuration loading for it.

pub mod config;
pub mod http_transport;

pub use config::{BackendConfig, load_backend_config};
pub use http_transport::HttpTransport;
