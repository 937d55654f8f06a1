// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Shows color bars on the overlay, drawn in slices the way a decoder would hand them over.

use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use argh::FromArgs;
use log::info;

use pxa_overlay::config::DEFAULT_OVERLAY_DEVICE;
use pxa_overlay::config::DEFAULT_PRIMARY_DEVICE;
use pxa_overlay::Fourcc;
use pxa_overlay::OverlayConfig;
use pxa_overlay::PxaOverlay;
use pxa_overlay::Resolution;
use pxa_overlay::SliceRequest;
use pxa_overlay::VideoOutput;

/// Rows handed over per slice.
const SLICE_HEIGHT: usize = 16;

/// Limited range Y, U, V of white, yellow, cyan, green, magenta, red, blue and black.
const BARS: [(u8, u8, u8); 8] = [
    (235, 128, 128),
    (210, 16, 146),
    (170, 166, 16),
    (145, 54, 34),
    (106, 202, 222),
    (81, 90, 240),
    (41, 240, 110),
    (16, 128, 128),
];

/// Draw color bars on the PXA overlay.
#[derive(FromArgs)]
struct Args {
    /// primary framebuffer, read for the native resolution
    #[argh(option, default = "PathBuf::from(DEFAULT_PRIMARY_DEVICE)")]
    primary: PathBuf,

    /// overlay framebuffer to draw on
    #[argh(option, default = "PathBuf::from(DEFAULT_OVERLAY_DEVICE)")]
    overlay: PathBuf,

    /// content width, defaults to the native width
    #[argh(option)]
    width: Option<u32>,

    /// content height, defaults to the native height
    #[argh(option)]
    height: Option<u32>,

    /// how long to keep the pattern on screen
    #[argh(option, default = "5")]
    seconds: u64,
}

/// A frame with padded rows, as decoders usually produce.
struct Frame {
    planes: [Vec<u8>; 3],
    strides: [usize; 3],
}

impl Frame {
    fn color_bars(resolution: Resolution) -> Self {
        let width = resolution.width as usize;
        let height = resolution.height as usize;
        let strides = [width + 32, width / 2 + 16, width / 2 + 16];
        let rows = [height, height / 2, height / 2];

        let mut planes: [Vec<u8>; 3] = Default::default();
        for (index, plane) in planes.iter_mut().enumerate() {
            let row_bytes = if index == 0 { width } else { width / 2 };
            *plane = vec![0; strides[index] * rows[index]];
            for row in 0..rows[index] {
                for col in 0..row_bytes {
                    let bar = BARS[col * BARS.len() / row_bytes.max(1)];
                    plane[row * strides[index] + col] = match index {
                        0 => bar.0,
                        1 => bar.1,
                        _ => bar.2,
                    };
                }
            }
        }

        Frame { planes, strides }
    }

    /// The slice covering luma rows `y..y + height`.
    fn slice(&self, width: usize, y: usize, height: usize) -> SliceRequest<'_> {
        let luma = &self.planes[0][y * self.strides[0]..];
        let u = &self.planes[1][(y / 2) * self.strides[1]..];
        let v = &self.planes[2][(y / 2) * self.strides[2]..];
        SliceRequest::new([luma, u, v], self.strides, width, height, 0, y)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();
    let config = OverlayConfig::default()
        .primary_device(args.primary)
        .overlay_device(args.overlay);

    let mut vo = PxaOverlay::from_config(&config);
    vo.probe().context("failed to probe the primary display")?;
    let native = vo
        .display()
        .map(|display| display.native())
        .context("no display after probe")?;

    let content = Resolution::new(
        args.width.unwrap_or(native.width),
        args.height.unwrap_or(native.height),
    );
    vo.configure(content, content, Fourcc::I420)
        .with_context(|| format!("failed to configure a {content} overlay"))?;

    let frame = Frame::color_bars(content);
    let height = content.height as usize;
    for y in (0..height).step_by(SLICE_HEIGHT) {
        let slice = frame.slice(content.width as usize, y, SLICE_HEIGHT.min(height - y));
        vo.blit_slice(&slice)
            .with_context(|| format!("failed to draw the slice at row {y}"))?;
    }
    info!("showing {} color bars for {}s", content, args.seconds);

    sleep(Duration::from_secs(args.seconds));
    vo.release();

    Ok(())
}
