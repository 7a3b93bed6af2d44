//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with external systems.

pub mod decoder;
pub mod notifier;

// Re-export main types for convenience
pub use decoder::{ChannelDecoder, ChannelDecoderFactory, FrameOutcome, FrameSender};
pub use notifier::{QueuedNotifier, TracingNotifier};
