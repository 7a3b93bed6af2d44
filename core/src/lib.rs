//! txqr Core Library
//!
//! Scan sessions and payload parsing for transaction QR codes.
//! Provides functionality to:
//! - Drive a camera QR decoder through initialize / start / stop
//! - Parse `transfer:` and `deposit:` payloads into typed requests
//! - Persist scanner settings (frame rate, detection box, camera)
//! - Central engine that queues parsed payloads for a polling host UI
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Payload shapes, parsing and scan session types
//! - `ports`: Trait definitions for the decoding engine and user alerts
//! - `adapters`: Channel-fed decoder and notifier implementations
//! - `application`: The scanner session service
//!
//! The image-to-text decoding itself lives outside this crate; a decoder
//! adapter only hands decoded text to the session.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod engine;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{
    is_recognized_transaction_payload, parse_deposit_request, parse_transfer_request,
    CameraFacing, ParsedDepositRequest, ParsedTransferRequest, ScanConfig, ScanState,
    StopOutcome, TransactionRequest,
};

// Re-export other commonly used types
pub use adapters::{ChannelDecoderFactory, FrameSender, QueuedNotifier, TracingNotifier};
pub use application::ScannerSession;
pub use config::{ConfigStore, ScannerSettings};
pub use engine::{ScanEvent, TransactionScanEngine};
pub use error::{Error, Result, ScanError};
