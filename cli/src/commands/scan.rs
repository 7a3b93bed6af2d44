//! Scan command - run a session over decoded frames.
//!
//! Each input line is one captured frame: a non-empty line is the decoded
//! text, an empty line a frame where no code was found.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use txqr_core::ports::UserNotifier;
use txqr_core::{
    ChannelDecoderFactory, ConfigStore, FrameSender, ScannerSession, TransactionRequest,
};

const FRAME_BUFFER: usize = 64;
const NO_CODE_FOUND: &str = "No QR code found in frame";

/// Prints alerts to stderr.
struct StderrNotifier;

impl UserNotifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}

type FrameReader = Box<dyn AsyncBufRead + Unpin + Send>;

pub async fn run(
    input: Option<PathBuf>,
    limit: Option<usize>,
    element: Option<String>,
    json: bool,
) -> Result<()> {
    let settings = ConfigStore::new()?.load().await?;
    let element_id = element.unwrap_or_else(|| settings.reader_element_id.clone());

    let reader: FrameReader = match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let (frames, factory) = ChannelDecoderFactory::channel(FRAME_BUFFER);
    let mut session =
        ScannerSession::new(factory, StderrNotifier).with_config(settings.scan_config());
    session.initialize(&element_id)?;

    let (payload_tx, mut payloads) = mpsc::unbounded_channel::<String>();
    session
        .start(
            &element_id,
            move |text| {
                let _ = payload_tx.send(text);
            },
            |reason: String| debug!(reason = %reason, "Frame not decoded"),
        )
        .await?;

    let feeder = tokio::spawn(feed_frames(reader, frames));

    let mut transactions = 0usize;
    let mut unrecognized = 0usize;
    let mut source_exhausted = true;

    while let Some(text) = payloads.recv().await {
        let Some(request) = TransactionRequest::parse(&text) else {
            unrecognized += 1;
            warn!(payload = %text, "Ignoring unrecognized payload");
            continue;
        };

        print_request(&request, json)?;
        transactions += 1;
        if limit.is_some_and(|n| transactions >= n) {
            source_exhausted = false;
            break;
        }
    }

    session.stop().await?;

    if source_exhausted {
        feeder.await??;
    } else {
        feeder.abort();
    }

    if !json {
        println!(
            "\nScanned {} transactions ({} unrecognized payloads)",
            transactions, unrecognized
        );
    }
    Ok(())
}

fn print_request(request: &TransactionRequest, json: bool) -> Result<()> {
    let now = Local::now();
    if json {
        let mut record = serde_json::to_value(request)?;
        record["scannedAt"] = serde_json::Value::String(now.to_rfc3339());
        println!("{}", record);
    } else {
        println!("[{}] {}", now.format("%H:%M:%S"), request);
    }
    Ok(())
}

/// Push one frame per line into the decoder until the reader is exhausted.
async fn feed_frames<R>(reader: R, frames: FrameSender) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let frame = match line.trim() {
            "" => Err(NO_CODE_FOUND.to_string()),
            text => Ok(text.to_string()),
        };
        if frames.send(frame).await.is_err() {
            break;
        }
    }
    Ok(())
}
