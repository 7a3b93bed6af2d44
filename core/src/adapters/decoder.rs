//! Channel-fed decoder adapter.
//!
//! Stands in for a camera engine living outside the process: whoever holds
//! the [`FrameSender`] pushes one outcome per captured frame (decoded text or
//! a decode failure) and the capture loop delivers them to the registered
//! callbacks at the configured frame rate. Host UIs with their own camera
//! stack feed it from their frame callback; the CLI feeds it from stdin.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::domain::ScanConfig;
use crate::error::ScanError;
use crate::ports::{DecoderFactory, OnDecodeError, OnDecoded, QrDecoder};

/// Outcome of one captured frame: decoded text, or why decoding failed.
pub type FrameOutcome = std::result::Result<String, String>;

/// Sending half of the frame source.
pub type FrameSender = mpsc::Sender<FrameOutcome>;

type FrameReceiver = mpsc::Receiver<FrameOutcome>;

/// The frame source, held here while no capture owns it.
type CameraSlot = Arc<Mutex<Option<FrameReceiver>>>;

/// Factory for [`ChannelDecoder`]s sharing one frame source.
///
/// The frame source plays the camera: only one decoder can capture from it
/// at a time.
pub struct ChannelDecoderFactory {
    camera: CameraSlot,
}

impl ChannelDecoderFactory {
    /// Create a factory and the sender feeding its frame source.
    pub fn channel(buffer: usize) -> (FrameSender, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let factory = Self {
            camera: Arc::new(Mutex::new(Some(rx))),
        };
        (tx, factory)
    }

    /// Create a factory whose decoders never get camera access.
    pub fn without_camera() -> Self {
        Self {
            camera: Arc::new(Mutex::new(None)),
        }
    }
}

impl DecoderFactory for ChannelDecoderFactory {
    type Decoder = ChannelDecoder;

    fn create(&self, element_id: &str) -> Result<ChannelDecoder, ScanError> {
        if element_id.trim().is_empty() {
            return Err(ScanError::Initialization {
                element_id: element_id.to_string(),
                reason: "display target id is empty".to_string(),
            });
        }

        Ok(ChannelDecoder {
            element_id: element_id.to_string(),
            camera: Arc::clone(&self.camera),
            capture: None,
        })
    }
}

/// A running capture loop.
struct Capture {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Decoder that reads frame outcomes from a channel.
pub struct ChannelDecoder {
    element_id: String,
    camera: CameraSlot,
    capture: Option<Capture>,
}

impl QrDecoder for ChannelDecoder {
    fn element_id(&self) -> &str {
        &self.element_id
    }

    async fn start(
        &mut self,
        config: ScanConfig,
        on_decoded: OnDecoded,
        on_error: OnDecodeError,
    ) -> Result<(), ScanError> {
        let frames = self.camera.lock().take().ok_or_else(|| {
            ScanError::CameraUnavailable("camera is in use or not present".to_string())
        })?;
        if frames.is_closed() && frames.is_empty() {
            warn!(element_id = %self.element_id, "Frame source closed");
            return Err(ScanError::CameraUnavailable(
                "frame source is closed".to_string(),
            ));
        }

        debug!(
            element_id = %self.element_id,
            fps = config.fps,
            qr_box = config.qr_box,
            facing = %config.facing,
            "Starting capture"
        );

        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(capture_loop(
            frames,
            Arc::clone(&self.camera),
            shutdown_rx,
            config,
            on_decoded,
            on_error,
        ));
        self.capture = Some(Capture { shutdown, handle });
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ScanError> {
        let Some(capture) = self.capture.take() else {
            return Ok(());
        };

        // The loop may already be gone if the frame source closed.
        let _ = capture.shutdown.send(());
        capture.handle.await.map_err(|e| {
            warn!(element_id = %self.element_id, error = %e, "Capture task failed");
            ScanError::Stop(e.to_string())
        })?;

        debug!(element_id = %self.element_id, "Capture stopped");
        Ok(())
    }
}

/// Exclusive hold on the frame source for one capture.
///
/// Puts the source back into the camera slot when dropped, including when a
/// callback panics, unless the source closed while held.
struct FrameLease {
    frames: Option<FrameReceiver>,
    camera: CameraSlot,
}

impl FrameLease {
    async fn next(&mut self) -> Option<FrameOutcome> {
        let frames = self.frames.as_mut()?;
        let frame = frames.recv().await;
        if frame.is_none() {
            self.frames = None;
        }
        frame
    }
}

impl Drop for FrameLease {
    fn drop(&mut self) {
        if let Some(frames) = self.frames.take() {
            *self.camera.lock() = Some(frames);
        }
    }
}

/// Deliver one frame outcome per tick until shut down or the source closes.
async fn capture_loop(
    frames: FrameReceiver,
    camera: CameraSlot,
    mut shutdown: oneshot::Receiver<()>,
    config: ScanConfig,
    on_decoded: OnDecoded,
    on_error: OnDecodeError,
) {
    let mut lease = FrameLease {
        frames: Some(frames),
        camera,
    };
    let mut ticker = tokio::time::interval(config.frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            _ = &mut shutdown => break,
            frame = lease.next() => match frame {
                Some(Ok(text)) => on_decoded(text),
                Some(Err(reason)) => on_error(reason),
                None => {
                    debug!("Frame source closed");
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc::unbounded_channel;

    fn forward_to(
        tx: mpsc::UnboundedSender<FrameOutcome>,
    ) -> (OnDecoded, OnDecodeError) {
        let ok_tx = tx.clone();
        let on_decoded: OnDecoded = Arc::new(move |text| {
            let _ = ok_tx.send(Ok(text));
        });
        let on_error: OnDecodeError = Arc::new(move |reason| {
            let _ = tx.send(Err(reason));
        });
        (on_decoded, on_error)
    }

    #[test]
    fn test_blank_element_id_fails() {
        let (_tx, factory) = ChannelDecoderFactory::channel(4);
        let err = factory.create("  ").err().unwrap();
        assert!(matches!(err, ScanError::Initialization { .. }));
        assert!(factory.create("reader").is_ok());
    }

    #[tokio::test]
    async fn test_frames_reach_callbacks_in_order() {
        let (frames, factory) = ChannelDecoderFactory::channel(8);
        let mut decoder = factory.create("reader").unwrap();
        let (out_tx, mut out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);

        decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap();

        frames.send(Ok("transfer:A:B:1".into())).await.unwrap();
        frames.send(Err("no code".into())).await.unwrap();

        assert_eq!(out_rx.recv().await, Some(Ok("transfer:A:B:1".to_string())));
        assert_eq!(out_rx.recv().await, Some(Err("no code".to_string())));

        decoder.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_camera_is_exclusive() {
        let (_frames, factory) = ChannelDecoderFactory::channel(4);
        let mut first = factory.create("reader").unwrap();
        let mut second = factory.create("reader").unwrap();
        let (out_tx, _out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);

        first
            .start(ScanConfig::default(), on_decoded.clone(), on_error.clone())
            .await
            .unwrap();
        let err = second
            .start(ScanConfig::default(), on_decoded.clone(), on_error.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::CameraUnavailable(_)));

        // Released on stop
        first.stop().await.unwrap();
        second
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap();
        second.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_without_camera() {
        let factory = ChannelDecoderFactory::without_camera();
        let mut decoder = factory.create("reader").unwrap();
        let (out_tx, _out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);

        let err = decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::CameraUnavailable(_)));
    }

    #[tokio::test]
    async fn test_stop_after_source_closed() {
        let (frames, factory) = ChannelDecoderFactory::channel(4);
        let mut decoder = factory.create("reader").unwrap();
        let (out_tx, _out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);

        decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap();
        drop(frames);
        tokio::time::sleep(Duration::from_millis(50)).await;

        decoder.stop().await.unwrap();
        assert!(decoder.stop().await.is_ok());
    }

    #[tokio::test]
    async fn test_restart_after_source_closed() {
        let (frames, factory) = ChannelDecoderFactory::channel(4);
        let mut decoder = factory.create("reader").unwrap();
        let (out_tx, _out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);

        decoder
            .start(ScanConfig::default(), on_decoded.clone(), on_error.clone())
            .await
            .unwrap();
        drop(frames);
        tokio::time::sleep(Duration::from_millis(50)).await;
        decoder.stop().await.unwrap();

        let err = decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::CameraUnavailable(_)));
    }

    #[tokio::test]
    async fn test_start_on_closed_source_fails() {
        let (frames, factory) = ChannelDecoderFactory::channel(4);
        drop(frames);
        let mut decoder = factory.create("reader").unwrap();
        let (out_tx, _out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);

        let err = decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::CameraUnavailable(_)));
    }

    #[tokio::test]
    async fn test_buffered_frames_drain_after_sender_dropped() {
        let (frames, factory) = ChannelDecoderFactory::channel(4);
        frames.send(Ok("deposit:ACC1:BNK01:10".into())).await.unwrap();
        drop(frames);
        let mut decoder = factory.create("reader").unwrap();
        let (out_tx, mut out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);

        decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap();
        assert_eq!(out_rx.recv().await, Some(Ok("deposit:ACC1:BNK01:10".to_string())));
        decoder.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_callback_releases_camera() {
        let (frames, factory) = ChannelDecoderFactory::channel(4);
        let mut decoder = factory.create("reader").unwrap();
        let on_decoded: OnDecoded = Arc::new(|text| panic!("handler failed on {}", text));
        let on_error: OnDecodeError = Arc::new(|_| {});

        decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap();
        frames.send(Ok("transfer:A:B:1".into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = decoder.stop().await.unwrap_err();
        assert!(matches!(err, ScanError::Stop(_)));

        // The frame source went back to the slot
        let (out_tx, mut out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);
        decoder
            .start(ScanConfig::default(), on_decoded, on_error)
            .await
            .unwrap();
        frames.send(Ok("transfer:A:B:2".into())).await.unwrap();
        assert_eq!(out_rx.recv().await, Some(Ok("transfer:A:B:2".to_string())));
        decoder.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_fast_frame_rate_captures() {
        let (frames, factory) = ChannelDecoderFactory::channel(4);
        let mut decoder = factory.create("reader").unwrap();
        let (out_tx, mut out_rx) = unbounded_channel();
        let (on_decoded, on_error) = forward_to(out_tx);
        let config = ScanConfig {
            fps: 2000,
            ..ScanConfig::default()
        };

        decoder.start(config, on_decoded, on_error).await.unwrap();
        frames.send(Ok("transfer:A:B:1".into())).await.unwrap();
        assert_eq!(out_rx.recv().await, Some(Ok("transfer:A:B:1".to_string())));
        decoder.stop().await.unwrap();
    }
}
