//! Headless rendering to an image file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::geometry::Point;
use crate::pointer::PointerSample;
use crate::radar::{Radar, CANVAS_SIZE};
use crate::renderer::Canvas;

/// Render frame number `frames` (1-based) of a fresh session, with an
/// optional fixed target, and return the canvas with labels rasterized.
pub fn render(config: &Config, frames: u64, target: Option<Point>) -> Canvas {
    let mut radar = Radar::new(CANVAS_SIZE, CANVAS_SIZE, config.detection);
    for _ in 1..frames {
        radar.advance();
    }

    let sample = target.map(PointerSample::at).unwrap_or_default();
    let mut canvas = Canvas::new(CANVAS_SIZE, CANVAS_SIZE);
    let detection = radar.render(&mut canvas, sample);
    canvas.burn_labels();

    if let Some(d) = detection {
        info!(
            bearing = d.polar.bearing.to_degrees(),
            range = d.polar.range_factor,
            bright = d.bright,
            "Target"
        );
    }
    canvas
}

pub fn run(config: &Config, frames: u64, target: Option<Point>, path: &Path) -> Result<()> {
    let canvas = render(config, frames, target);

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    canvas
        .write_ppm(BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote frame {} to {}", frames, path.display());
    Ok(())
}
