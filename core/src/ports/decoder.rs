//! QR decoding engine port (interface).

use std::sync::Arc;

use crate::domain::ScanConfig;
use crate::error::ScanError;

/// Called with the text of every successfully decoded frame.
pub type OnDecoded = Arc<dyn Fn(String) + Send + Sync>;

/// Called with the reason of every frame that failed to decode.
pub type OnDecodeError = Arc<dyn Fn(String) + Send + Sync>;

/// Port for constructing a decoder bound to a display target.
///
/// Stands for the engine's constructor: the element id names where the
/// camera preview is rendered.
pub trait DecoderFactory: Send + Sync {
    /// The decoder this factory produces.
    type Decoder: QrDecoder;

    /// Construct a decoder for `element_id`.
    fn create(&self, element_id: &str) -> Result<Self::Decoder, ScanError>;
}

/// Port for a camera-backed QR decoder.
///
/// The engine owns the capture loop. Callbacks may be invoked from any
/// thread until `stop` resolves.
pub trait QrDecoder: Send {
    /// Display target this decoder renders to.
    fn element_id(&self) -> &str;

    /// Open the camera and start continuous capture.
    fn start(
        &mut self,
        config: ScanConfig,
        on_decoded: OnDecoded,
        on_error: OnDecodeError,
    ) -> impl std::future::Future<Output = Result<(), ScanError>> + Send;

    /// Halt capture and release the camera.
    fn stop(&mut self) -> impl std::future::Future<Output = Result<(), ScanError>> + Send;
}
