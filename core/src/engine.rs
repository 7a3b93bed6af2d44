//! Transaction scan engine - Session ownership and event polling.
//!
//! This module provides the engine a host UI drives: it owns a runtime and a
//! [`ScannerSession`], turns decoded frames into parsed transaction events,
//! and queues them until the host polls.
//!
//! # Usage Pattern
//! The host calls `initialize` once, `start`, then polls
//! `get_pending_events()` (e.g. from its UI timer) until it has what it
//! needs, and finally calls `stop`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;
use uuid::Uuid;

use crate::application::ScannerSession;
use crate::config::{ConfigStore, ScannerSettings};
use crate::domain::{ScanState, StopOutcome, TransactionRequest};
use crate::error::{Error, Result, ScanError};
use crate::ports::{DecoderFactory, UserNotifier};

/// Oldest events are dropped past this many unpolled events.
const MAX_PENDING_EVENTS: usize = 256;

/// Something the scanner saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A payload that parsed into a transaction request.
    Transaction(TransactionRequest),
    /// Decoded text that is not a valid transaction payload.
    Unrecognized { payload: String },
}

impl ScanEvent {
    /// Classify decoded text.
    pub fn from_payload(payload: String) -> Self {
        match TransactionRequest::parse(&payload) {
            Some(request) => ScanEvent::Transaction(request),
            None => ScanEvent::Unrecognized { payload },
        }
    }
}

/// The main scan engine.
///
/// Safe to share across threads; lifecycle calls are serialized on an
/// internal lock.
pub struct TransactionScanEngine<F: DecoderFactory, N: UserNotifier> {
    runtime: Runtime,
    settings: ScannerSettings,
    session: Mutex<ScannerSession<F, N>>,

    // Written from the capture loop
    pending_events: Arc<RwLock<Vec<ScanEvent>>>,
    last_decode_error: Arc<RwLock<Option<String>>>,
    decoded_frames: Arc<AtomicU64>,
}

impl<F: DecoderFactory, N: UserNotifier> TransactionScanEngine<F, N> {
    /// Create an engine with explicit settings.
    pub fn new(factory: F, notifier: N, settings: ScannerSettings) -> Result<Self> {
        let runtime = Self::build_runtime()?;
        Self::with_runtime(runtime, factory, notifier, settings)
    }

    /// Create an engine with settings read from `store`.
    pub fn from_config_store(factory: F, notifier: N, store: &ConfigStore) -> Result<Self> {
        let runtime = Self::build_runtime()?;
        let settings = runtime.block_on(store.load())?;
        Self::with_runtime(runtime, factory, notifier, settings)
    }

    fn build_runtime() -> Result<Runtime> {
        // One worker keeps the capture loop running between host calls
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("txqr-capture")
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("Failed to create runtime: {}", e)))
    }

    fn with_runtime(
        runtime: Runtime,
        factory: F,
        notifier: N,
        settings: ScannerSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let session = ScannerSession::new(factory, notifier).with_config(settings.scan_config());

        Ok(Self {
            runtime,
            settings,
            session: Mutex::new(session),
            pending_events: Arc::new(RwLock::new(Vec::new())),
            last_decode_error: Arc::new(RwLock::new(None)),
            decoded_frames: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Settings the engine was created with.
    pub fn settings(&self) -> &ScannerSettings {
        &self.settings
    }

    /// Identifier of the underlying session.
    pub fn session_id(&self) -> Uuid {
        self.session.lock().id()
    }

    // MARK: - Lifecycle

    /// Construct the decoder for `element_id`.
    pub fn initialize(&self, element_id: &str) -> std::result::Result<(), ScanError> {
        self.session.lock().initialize(element_id)
    }

    /// Construct the decoder for the configured display target.
    pub fn initialize_default(&self) -> std::result::Result<(), ScanError> {
        self.initialize(&self.settings.reader_element_id)
    }

    /// Start scanning; decoded frames become pending events.
    pub fn start(&self, element_id: &str) -> std::result::Result<(), ScanError> {
        let events = Arc::clone(&self.pending_events);
        let decoded = Arc::clone(&self.decoded_frames);
        let last_error = Arc::clone(&self.last_decode_error);

        let on_success = move |text: String| {
            decoded.fetch_add(1, Ordering::SeqCst);
            let event = ScanEvent::from_payload(text);
            let mut events = events.write();
            if events.len() >= MAX_PENDING_EVENTS {
                events.remove(0);
            }
            events.push(event);
        };
        let on_error = move |reason: String| {
            *last_error.write() = Some(reason);
        };

        let mut session = self.session.lock();
        self.runtime
            .block_on(session.start(element_id, on_success, on_error))
    }

    /// Stop scanning.
    pub fn stop(&self) -> std::result::Result<StopOutcome, ScanError> {
        let mut session = self.session.lock();
        self.runtime.block_on(session.stop())
    }

    /// Current scan state.
    pub fn state(&self) -> ScanState {
        self.session.lock().state()
    }

    /// Check if scanning is running.
    pub fn is_scanning(&self) -> bool {
        self.session.lock().is_scanning()
    }

    // MARK: - Events

    /// Get and clear pending events.
    pub fn get_pending_events(&self) -> Vec<ScanEvent> {
        std::mem::take(&mut *self.pending_events.write())
    }

    /// Check if there are pending events.
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.read().is_empty()
    }

    /// Reason the most recent undecodable frame gave, if any.
    pub fn last_decode_error(&self) -> Option<String> {
        self.last_decode_error.read().clone()
    }

    /// Number of frames decoded since the engine was created.
    pub fn decoded_frame_count(&self) -> u64 {
        self.decoded_frames.load(Ordering::SeqCst)
    }
}

impl<F: DecoderFactory, N: UserNotifier> Drop for TransactionScanEngine<F, N> {
    fn drop(&mut self) {
        let session = self.session.get_mut();
        if session.is_scanning() {
            debug!(session_id = %session.id(), "Stopping scan on engine drop");
            let _ = self.runtime.block_on(session.stop());
        }
    }
}
