//! Config command - show and change scanner settings.

use anyhow::{anyhow, bail, Result};
use txqr_core::{CameraFacing, ConfigStore};

pub async fn show(json: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    let settings = store.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Config file:   {}", store.path().display());
    println!("Reader target: {}", settings.reader_element_id);
    println!("Frame rate:    {} fps", settings.frame_rate);
    println!("QR box:        {}x{}", settings.qr_box, settings.qr_box);
    println!("Camera:        {}", settings.facing_mode);
    Ok(())
}

pub async fn set(
    element: Option<String>,
    fps: Option<u32>,
    qr_box: Option<u32>,
    facing: Option<String>,
) -> Result<()> {
    if element.is_none() && fps.is_none() && qr_box.is_none() && facing.is_none() {
        bail!("Nothing to change; pass at least one of --element, --fps, --qr-box, --facing");
    }

    let facing = facing
        .map(|f| f.parse::<CameraFacing>().map_err(|e| anyhow!(e)))
        .transpose()?;

    let store = ConfigStore::new()?;
    let settings = store
        .update(|s| {
            if let Some(element) = element {
                s.reader_element_id = element;
            }
            if let Some(fps) = fps {
                s.frame_rate = fps;
            }
            if let Some(size) = qr_box {
                s.qr_box = size;
            }
            if let Some(facing) = facing {
                s.facing_mode = facing;
            }
        })
        .await?;

    println!(
        "Saved: target {}, {} fps, box {}, {} camera",
        settings.reader_element_id, settings.frame_rate, settings.qr_box, settings.facing_mode
    );
    Ok(())
}
