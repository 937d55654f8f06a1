// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The entry points a media player dispatches to, and the overlay driver implementing them.

use log::debug;
use log::info;

use crate::blit::blit;
use crate::blit::SliceRequest;
use crate::config::OverlayConfig;
use crate::error::BlitError;
use crate::error::ConfigError;
use crate::error::VoError;
use crate::fb::DeviceProvider;
use crate::fb::FbDevNodes;
use crate::format::query_format;
use crate::format::Capabilities;
use crate::format::Fourcc;
use crate::geometry::DisplayGeometry;
use crate::geometry::Resolution;
use crate::probe::probe_display;
use crate::surface::OverlaySurface;

/// Static description of a video output driver.
#[derive(Debug, PartialEq, Eq)]
pub struct VoInfo {
    pub name: &'static str,
    pub short_name: &'static str,
    pub author: &'static str,
    pub comment: &'static str,
}

pub static PXA_OVERLAY_INFO: VoInfo = VoInfo {
    name: "PXA27x/3xx overlay",
    short_name: "pxa",
    author: "The ChromiumOS Authors",
    comment: "",
};

/// Requests passed through [`VideoOutput::control`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Ask for the capabilities of a pixel format.
    QueryFormat(Fourcc),
    /// Any request this driver does not know about, by its raw code.
    Other(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlReply {
    Capabilities(Capabilities),
}

/// The fixed set of operations a video output exposes to the player.
///
/// The player calls `probe` once, then `configure` for each stream, then any number of
/// `blit_slice` calls, and `release` when done.
pub trait VideoOutput {
    fn info(&self) -> &'static VoInfo;

    /// Reads the display properties the output is sized against.
    fn probe(&mut self) -> Result<(), VoError>;

    /// Sets the output up for `source` sized frames of `format`, shown at `destination` size.
    /// A previously configured output is released first.
    fn configure(
        &mut self,
        source: Resolution,
        destination: Resolution,
        format: Fourcc,
    ) -> Result<(), VoError>;

    /// Capabilities for `format`, empty when it cannot be displayed.
    fn query_format(&self, format: Fourcc) -> Capabilities;

    fn control(&mut self, request: Control) -> Result<ControlReply, VoError>;

    /// Draws a whole frame at once.
    fn draw_frame(&mut self, planes: [&[u8]; 3]) -> Result<(), VoError>;

    /// Draws one rectangle of the current frame.
    fn blit_slice(&mut self, slice: &SliceRequest) -> Result<(), VoError>;

    fn draw_osd(&mut self);

    fn flip_page(&mut self);

    fn check_events(&mut self);

    /// Releases everything acquired by `configure`. Calling it again does nothing.
    fn release(&mut self);
}

/// Video output on the PXA27x/3xx overlay 2 plane.
///
/// Holds at most one [`OverlaySurface`]. The surface is released on reconfiguration, on
/// [`VideoOutput::release`] and when the driver is dropped.
pub struct PxaOverlay<P: DeviceProvider = FbDevNodes> {
    provider: P,
    display: Option<DisplayGeometry>,
    surface: Option<OverlaySurface<P::Device>>,
}

impl PxaOverlay<FbDevNodes> {
    pub fn from_config(config: &OverlayConfig) -> Self {
        PxaOverlay::new(FbDevNodes::new(config))
    }
}

impl<P: DeviceProvider> PxaOverlay<P> {
    pub fn new(provider: P) -> Self {
        PxaOverlay {
            provider,
            display: None,
            surface: None,
        }
    }

    /// The probed display, if `probe` succeeded.
    pub fn display(&self) -> Option<&DisplayGeometry> {
        self.display.as_ref()
    }

    /// The live overlay surface, if configured.
    pub fn surface(&self) -> Option<&OverlaySurface<P::Device>> {
        self.surface.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.surface.is_some()
    }
}

impl<P: DeviceProvider> VideoOutput for PxaOverlay<P> {
    fn info(&self) -> &'static VoInfo {
        &PXA_OVERLAY_INFO
    }

    fn probe(&mut self) -> Result<(), VoError> {
        self.display = Some(probe_display(&self.provider)?);
        Ok(())
    }

    fn configure(
        &mut self,
        source: Resolution,
        destination: Resolution,
        format: Fourcc,
    ) -> Result<(), VoError> {
        self.release();

        let display = self.display.ok_or(ConfigError::NotProbed)?;
        let surface =
            OverlaySurface::negotiate(&self.provider, &display, source, destination, format)?;
        self.surface = Some(surface);
        info!("configured and opened 2nd overlay");

        Ok(())
    }

    fn query_format(&self, format: Fourcc) -> Capabilities {
        query_format(format)
    }

    fn control(&mut self, request: Control) -> Result<ControlReply, VoError> {
        debug!("control {:?}", request);
        match request {
            Control::QueryFormat(format) => {
                Ok(ControlReply::Capabilities(self.query_format(format)))
            }
            Control::Other(_) => Err(VoError::NotImplemented),
        }
    }

    fn draw_frame(&mut self, _planes: [&[u8]; 3]) -> Result<(), VoError> {
        // Frames always arrive as slices.
        Err(VoError::NotImplemented)
    }

    fn blit_slice(&mut self, slice: &SliceRequest) -> Result<(), VoError> {
        let surface = self.surface.as_mut().ok_or(BlitError::NotConfigured)?;
        blit(surface, slice)?;
        Ok(())
    }

    fn draw_osd(&mut self) {}

    fn flip_page(&mut self) {}

    fn check_events(&mut self) {}

    fn release(&mut self) {
        if let Some(surface) = self.surface.take() {
            drop(surface);
            debug!("overlay released");
        }
    }
}

impl<P: DeviceProvider> Drop for PxaOverlay<P> {
    fn drop(&mut self) {
        self.release();
    }
}
