//! # Mapa Client
//!
//! Glue between a viewer and the layout-generation service.
//!
//! ```text
//! ViewerState ──capture──▶ ExportPayload ──multipart──▶ POST /dxf/gerar-layout
//!                                                            │
//!                                   save to disk ◀── GET ◀── pdf_url
//! ```
//!
//! Drawing files are turned into entities by the same service through
//! `POST /dxf/upload`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod form;
pub mod payload;
pub mod retry;

pub use client::{
    artifact_file_name, service_message, ClientConfig, LayoutClient, DEFAULT_USER_EMAIL,
    USER_EMAIL_HEADER,
};
pub use error::{ClientError, ClientResult};
pub use form::LayoutForm;
pub use payload::{drawing_name, drawing_stem, ExportPayload};
pub use retry::RetryPolicy;
