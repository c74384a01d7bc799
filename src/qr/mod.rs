//! QR code generation layer.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │ RawGenerationRequest
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          validate() (request)           │
//! └────────────────────┬────────────────────┘
//!                      │ GenerationRequest
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               QrEncoder                 │
//! │   qrcode (symbol) → image (PNG bytes)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`RawGenerationRequest`]: JSON body with every field optional
//! - [`GenerationRequest`]: validated parameters with defaults applied
//! - [`QrEncoder`]: builds the symbol and renders it as PNG

mod encoder;
mod request;

pub use encoder::{parse_color, QrEncoder, ERROR_CORRECTION, PNG_CONTENT_TYPE};
pub use request::{
    GenerationRequest, RawGenerationRequest, DEFAULT_BACKGROUND_COLOR, DEFAULT_BORDER_WIDTH,
    DEFAULT_FOREGROUND_COLOR, DEFAULT_MODULE_SIZE, MAX_BORDER_WIDTH, MAX_MODULE_SIZE,
    MIN_BORDER_WIDTH, MIN_MODULE_SIZE,
};
