//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod decoder;
mod notifier;

pub use decoder::{DecoderFactory, OnDecodeError, OnDecoded, QrDecoder};
pub use notifier::UserNotifier;
