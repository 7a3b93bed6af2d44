//! Domain layer - Pure business logic and data models.
//!
//! This module contains the payload shapes and scan session types.
//! These types have no I/O dependencies and can be tested in isolation.

mod payload;
mod scan;

// Re-export all domain types
pub use payload::{
    is_recognized_transaction_payload, parse_deposit_request, parse_transfer_request,
    ParsedDepositRequest, ParsedTransferRequest, TransactionRequest, DEPOSIT_PREFIX,
    TRANSFER_PREFIX,
};
pub use scan::{
    CameraFacing, ScanConfig, ScanState, StopOutcome, DEFAULT_FRAME_RATE, DEFAULT_QR_BOX,
    MAX_FRAME_RATE,
};
