//! UniFFI bindings for txqr-core library.
//!
//! This crate provides FFI bindings for Swift and Kotlin host apps.
//! The main entry point is `RustScanner`, which wraps the scan engine.
//! The host owns the camera: it forwards each decoded frame with
//! `submit_decoded_text` and polls `get_pending_events` for parsed requests.

use std::sync::Arc;

use txqr_core::{
    ChannelDecoderFactory, ConfigStore, FrameSender, ParsedDepositRequest,
    ParsedTransferRequest, QueuedNotifier, ScanError, ScanEvent, StopOutcome,
    TransactionRequest, TransactionScanEngine,
};

uniffi::setup_scaffolding!();

/// Frames buffered between the host camera callback and the capture loop.
const FRAME_BUFFER: usize = 32;

/// Error type exposed via FFI.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RustScannerError {
    #[error("Initialization failed: {msg}")]
    InitializationFailed { msg: String },

    #[error("Camera unavailable: {msg}")]
    CameraUnavailable { msg: String },

    #[error("Stop failed: {msg}")]
    StopFailed { msg: String },

    #[error("Config error: {msg}")]
    ConfigError { msg: String },
}

impl From<ScanError> for RustScannerError {
    fn from(e: ScanError) -> Self {
        let msg = e.to_string();
        match e {
            ScanError::Initialization { .. } => RustScannerError::InitializationFailed { msg },
            ScanError::DecoderUnavailable | ScanError::CameraUnavailable(_) => {
                RustScannerError::CameraUnavailable { msg }
            }
            ScanError::Stop(_) => RustScannerError::StopFailed { msg },
        }
    }
}

impl From<txqr_core::Error> for RustScannerError {
    fn from(e: txqr_core::Error) -> Self {
        RustScannerError::ConfigError { msg: e.to_string() }
    }
}

/// Transfer request exposed to the host.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct RustTransferRequest {
    pub kind: String,
    pub recipient_account: String,
    pub recipient_name: String,
    pub amount: String,
    pub reference: String,
}

impl From<ParsedTransferRequest> for RustTransferRequest {
    fn from(t: ParsedTransferRequest) -> Self {
        Self {
            kind: ParsedTransferRequest::KIND.to_string(),
            recipient_account: t.recipient_account,
            recipient_name: t.recipient_name,
            amount: t.amount,
            reference: t.reference,
        }
    }
}

/// Deposit request exposed to the host.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct RustDepositRequest {
    pub kind: String,
    pub recipient_account: String,
    pub bank_code: String,
    pub amount: String,
    pub reference: String,
}

impl From<ParsedDepositRequest> for RustDepositRequest {
    fn from(d: ParsedDepositRequest) -> Self {
        Self {
            kind: ParsedDepositRequest::KIND.to_string(),
            recipient_account: d.recipient_account,
            bank_code: d.bank_code,
            amount: d.amount,
            reference: d.reference,
        }
    }
}

/// Scan event exposed to the host.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum RustScanEvent {
    Transfer { request: RustTransferRequest },
    Deposit { request: RustDepositRequest },
    Unrecognized { payload: String },
}

impl From<ScanEvent> for RustScanEvent {
    fn from(event: ScanEvent) -> Self {
        match event {
            ScanEvent::Transaction(TransactionRequest::Transfer(t)) => {
                RustScanEvent::Transfer { request: t.into() }
            }
            ScanEvent::Transaction(TransactionRequest::Deposit(d)) => {
                RustScanEvent::Deposit { request: d.into() }
            }
            ScanEvent::Unrecognized { payload } => RustScanEvent::Unrecognized { payload },
        }
    }
}

/// Main scanner interface exposed via FFI.
///
/// This wraps `TransactionScanEngine` and provides everything the host UI
/// needs for a scan session.
#[derive(uniffi::Object)]
pub struct RustScanner {
    engine: TransactionScanEngine<ChannelDecoderFactory, QueuedNotifier>,
    frames: FrameSender,
    alerts: QueuedNotifier,
}

impl RustScanner {
    fn with_store(store: &ConfigStore) -> Result<Self, RustScannerError> {
        let (frames, factory) = ChannelDecoderFactory::channel(FRAME_BUFFER);
        let alerts = QueuedNotifier::new();
        let engine = TransactionScanEngine::from_config_store(factory, alerts.clone(), store)?;
        Ok(Self {
            engine,
            frames,
            alerts,
        })
    }
}

#[uniffi::export]
impl RustScanner {
    /// Create a scanner using the settings in `~/.txqr/config.json`.
    #[uniffi::constructor]
    pub fn new() -> Result<Arc<Self>, RustScannerError> {
        let store = ConfigStore::new()?;
        Ok(Arc::new(Self::with_store(&store)?))
    }

    /// Session identifier, for correlating logs.
    pub fn session_id(&self) -> String {
        self.engine.session_id().to_string()
    }

    /// Configured display target id.
    pub fn reader_element_id(&self) -> String {
        self.engine.settings().reader_element_id.clone()
    }

    // MARK: - Lifecycle

    /// Bind the decoder to a display target.
    pub fn initialize(&self, reader_element_id: String) -> Result<(), RustScannerError> {
        self.engine.initialize(&reader_element_id).map_err(Into::into)
    }

    /// Start scanning. On camera failure an alert is queued as well.
    pub fn start(&self, reader_element_id: String) -> Result<(), RustScannerError> {
        self.engine.start(&reader_element_id).map_err(Into::into)
    }

    /// Stop scanning. Returns false if nothing was running.
    pub fn stop(&self) -> Result<bool, RustScannerError> {
        let outcome = self.engine.stop()?;
        Ok(outcome == StopOutcome::Stopped)
    }

    /// Check if scanning is running.
    pub fn is_scanning(&self) -> bool {
        self.engine.is_scanning()
    }

    // MARK: - Frames

    /// Forward text the host camera decoded. Returns false if the frame was
    /// dropped because the buffer is full.
    pub fn submit_decoded_text(&self, text: String) -> bool {
        self.frames.try_send(Ok(text)).is_ok()
    }

    /// Forward a frame the host camera could not decode.
    pub fn submit_decode_failure(&self, reason: String) -> bool {
        self.frames.try_send(Err(reason)).is_ok()
    }

    // MARK: - Polling

    /// Get and clear pending scan events.
    pub fn get_pending_events(&self) -> Vec<RustScanEvent> {
        self.engine
            .get_pending_events()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Check if there are pending scan events.
    pub fn has_pending_events(&self) -> bool {
        self.engine.has_pending_events()
    }

    /// Get and clear alerts the host must show to the user.
    pub fn get_pending_alerts(&self) -> Vec<String> {
        self.alerts.take_alerts()
    }

    /// Reason the most recent undecodable frame gave.
    pub fn last_decode_error(&self) -> Option<String> {
        self.engine.last_decode_error()
    }
}

// MARK: - Payload parsing

/// Parse a `transfer:` payload.
#[uniffi::export]
pub fn parse_transfer_request(text: String) -> Option<RustTransferRequest> {
    txqr_core::parse_transfer_request(&text).map(Into::into)
}

/// Parse a `deposit:` payload.
#[uniffi::export]
pub fn parse_deposit_request(text: String) -> Option<RustDepositRequest> {
    txqr_core::parse_deposit_request(&text).map(Into::into)
}

/// Check whether a payload has a known prefix.
#[uniffi::export]
pub fn is_recognized_transaction_payload(text: String) -> bool {
    txqr_core::is_recognized_transaction_payload(&text)
}
