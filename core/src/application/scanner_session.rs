//! Scan session application service.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{ScanConfig, ScanState, StopOutcome};
use crate::error::{ScanError, CAMERA_UNAVAILABLE_MESSAGE};
use crate::ports::{DecoderFactory, QrDecoder, UserNotifier};

/// One camera scanning session, from initialize to stop.
///
/// Owns the decoder produced by the factory and the `Idle`/`Scanning` state.
/// Lifecycle calls take `&mut self`, so they cannot overlap on one session.
/// Failures are logged and returned; nothing here panics.
pub struct ScannerSession<F: DecoderFactory, N: UserNotifier> {
    id: Uuid,
    factory: F,
    notifier: N,
    config: ScanConfig,
    decoder: Option<F::Decoder>,
    state: ScanState,
}

impl<F: DecoderFactory, N: UserNotifier> ScannerSession<F, N> {
    /// Create an empty session with the default scan configuration.
    pub fn new(factory: F, notifier: N) -> Self {
        Self {
            id: Uuid::new_v4(),
            factory,
            notifier,
            config: ScanConfig::default(),
            decoder: None,
            state: ScanState::Idle,
        }
    }

    /// Use `config` for subsequent starts.
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Session identifier, as used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current scan state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Check if capture is running.
    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Scanning
    }

    /// Check if a decoder has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.decoder.is_some()
    }

    /// Scan configuration handed to the decoder on start.
    pub fn config(&self) -> ScanConfig {
        self.config
    }

    /// Construct the decoder bound to `element_id`.
    ///
    /// Replaces any previous decoder. Refused while a scan is running.
    pub fn initialize(&mut self, element_id: &str) -> Result<(), ScanError> {
        if self.is_scanning() {
            let err = ScanError::Initialization {
                element_id: element_id.to_string(),
                reason: "a scan is already running".to_string(),
            };
            error!(session_id = %self.id, error = %err, "QR scanner initialization error");
            return Err(err);
        }

        match self.factory.create(element_id) {
            Ok(decoder) => {
                self.decoder = Some(decoder);
                info!(session_id = %self.id, element_id, "QR scanner initialized");
                Ok(())
            }
            Err(err) => {
                error!(session_id = %self.id, element_id, error = %err, "QR scanner initialization error");
                Err(err)
            }
        }
    }

    /// Open the camera and start delivering decoded frames.
    ///
    /// `on_success` gets the text of each decoded frame, `on_error` the
    /// reason for each frame that did not decode. Both may run on the
    /// engine's thread. If the decoder is missing or the camera cannot be
    /// opened the user is alerted and the state stays unchanged.
    pub async fn start<S, E>(
        &mut self,
        element_id: &str,
        on_success: S,
        on_error: E,
    ) -> Result<(), ScanError>
    where
        S: Fn(String) + Send + Sync + 'static,
        E: Fn(String) + Send + Sync + 'static,
    {
        let result = match self.decoder.as_mut() {
            None => Err(ScanError::DecoderUnavailable),
            Some(decoder) => {
                if decoder.element_id() != element_id {
                    warn!(
                        session_id = %self.id,
                        element_id,
                        bound_to = decoder.element_id(),
                        "Decoder is bound to a different display target"
                    );
                }
                decoder
                    .start(self.config, Arc::new(on_success), Arc::new(on_error))
                    .await
            }
        };

        match result {
            Ok(()) => {
                self.state = ScanState::Scanning;
                info!(session_id = %self.id, fps = self.config.fps, "Scanning started");
                Ok(())
            }
            Err(err) => {
                error!(session_id = %self.id, error = %err, "Error starting scanner");
                if err.needs_user_alert() {
                    self.notifier.alert(CAMERA_UNAVAILABLE_MESSAGE);
                }
                Err(err)
            }
        }
    }

    /// Halt capture.
    ///
    /// Without a decoder or a running scan this does nothing and reports
    /// [`StopOutcome::NotScanning`].
    pub async fn stop(&mut self) -> Result<StopOutcome, ScanError> {
        if self.state != ScanState::Scanning {
            debug!(session_id = %self.id, "Stop requested while idle");
            return Ok(StopOutcome::NotScanning);
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(StopOutcome::NotScanning);
        };

        match decoder.stop().await {
            Ok(()) => {
                self.state = ScanState::Idle;
                info!(session_id = %self.id, "Scanning stopped");
                Ok(StopOutcome::Stopped)
            }
            Err(err) => {
                error!(session_id = %self.id, error = %err, "Error stopping scanner");
                Err(err)
            }
        }
    }
}
