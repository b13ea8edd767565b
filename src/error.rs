use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WifiQrError {
    #[error("Failed to encode QR symbol: {0}")]
    Encoding(#[from] qrcode::types::QrError),

    #[error("Failed to encode PNG image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to render template: {0}")]
    Template(#[from] tera::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IntoResponse for WifiQrError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Internal Server Error</h1><p>The QR code could not be generated.</p>"),
        )
            .into_response()
    }
}
