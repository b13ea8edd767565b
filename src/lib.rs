//! WiFi QR Code Generator
//!
//! This library turns WiFi network credentials into the standard `WIFI:`
//! payload and renders it as a scannable QR code PNG. A small web interface
//! serves a form, shows the generated code inline, and offers it as a
//! download.
//!
//! # Modules
//!
//! - [`config`] - Configuration file handling for server and QR settings
//! - [`error`] - Custom error types for the library
//! - [`form`] - Decoding of submitted HTML forms into credentials
//! - [`logging`] - Tracing subscriber setup
//! - [`payload`] - `WIFI:` payload formatting
//! - [`render`] - QR symbol encoding and PNG rendering
//! - [`server`] - HTTP interface
//!
//! # Example Usage
//!
//! ```no_run
//! use wifi_qr::{format_payload, render, AuthType};
//!
//! let payload = format_payload("HomeNet", "password123", &AuthType::Wpa, false);
//! let png = render(&payload, 10).expect("payload fits in a QR symbol");
//! std::fs::write("wifi.png", png).expect("write failed");
//! ```

/// Configuration module for server and rendering settings.
/// Handles reading/writing the TOML config file.
pub mod config;

/// Error module defining custom error types for the library.
/// Uses `thiserror` for ergonomic error handling.
pub mod error;

/// Form module mapping request bodies to [`WifiCredentials`].
pub mod form;

pub mod logging;

/// Payload module building the `WIFI:` credential string.
pub mod payload;

/// Render module encoding text into QR code PNG images.
pub mod render;

/// Server module providing the web interface.
/// Uses Axum for routing and Tera for the HTML page.
pub mod server;

pub use error::WifiQrError;

pub use payload::{format_payload, AuthType, WifiCredentials};

pub use render::{render, ErrorCorrection, QrRenderer};
