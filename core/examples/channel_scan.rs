//! Example: Run a scan session over a few simulated frames.

use std::sync::Arc;

use parking_lot::Mutex;
use txqr_core::{ChannelDecoderFactory, ScannerSession, TracingNotifier, TransactionRequest};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (frames, factory) = ChannelDecoderFactory::channel(8);
    let mut session = ScannerSession::new(factory, TracingNotifier);

    if let Err(e) = session.initialize("reader") {
        eprintln!("Error initializing scanner: {}", e);
        return;
    }

    let decoded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&decoded);
    let started = session
        .start(
            "reader",
            move |text| sink.lock().push(text),
            |reason| eprintln!("  frame skipped: {}", reason),
        )
        .await;
    if let Err(e) = started {
        eprintln!("Error starting scanner: {}", e);
        return;
    }

    println!("Scanning...\n");
    for frame in [
        Ok("transfer:ACC123:Jane Doe:500:INV-9"),
        Err("No QR code found"),
        Ok("deposit:ACC1:BNK01:1000"),
        Ok("https://example.com"),
    ] {
        let _ = frames
            .send(frame.map(str::to_string).map_err(str::to_string))
            .await;
    }
    // Closing the source ends the capture loop once every frame is delivered
    drop(frames);
    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    if let Err(e) = session.stop().await {
        eprintln!("Error stopping scanner: {}", e);
    }

    for text in decoded.lock().iter() {
        match TransactionRequest::parse(text) {
            Some(request) => println!("{}", request),
            None => println!("(ignored) {}", text),
        }
    }
}
