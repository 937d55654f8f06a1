// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Video sink for the second overlay plane of PXA27x/3xx framebuffers.
//!
//! Decoded planar 4:2:0 frames are copied slice by slice into a shared mapping of the overlay
//! framebuffer. The overlay has no scaler, so content is shown 1:1 and centered on the native
//! display.

pub mod blit;
pub mod config;
pub mod driver;
pub mod error;
pub mod fb;
pub mod format;
pub mod geometry;
mod mmap;
pub mod probe;
pub mod surface;
#[cfg(test)]
mod test_utils;

pub use blit::SliceRequest;
pub use config::OverlayConfig;
pub use driver::Control;
pub use driver::ControlReply;
pub use driver::PxaOverlay;
pub use driver::VideoOutput;
pub use driver::VoInfo;
pub use error::BlitError;
pub use error::ConfigError;
pub use error::ProbeError;
pub use error::VoError;
pub use fb::DeviceProvider;
pub use fb::FbDevNodes;
pub use fb::FramebufferDevice;
pub use format::Capabilities;
pub use format::Fourcc;
pub use geometry::DisplayGeometry;
pub use geometry::OverlayOffset;
pub use geometry::Resolution;
pub use surface::OverlaySurface;
pub use surface::Plane;
