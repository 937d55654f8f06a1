// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Negotiation of the overlay mode and the live mapping of the overlay planes.
//!
//! The overlay is always programmed to the native display size. Its memory holds three planes
//! laid out back to back, sized from the native resolution:
//!
//! ```text
//! [ Y: W*H ][ U: W*H/4 ][ V: W*H/4 ]
//! ```
//!
//! Content smaller than the display is drawn centered inside these planes.

use std::num::NonZeroUsize;
use std::ops::Range;

use log::debug;
use log::error;
use log::info;

use crate::error::ConfigError;
use crate::fb::DeviceProvider;
use crate::fb::FramebufferDevice;
use crate::fb::FB_ACTIVATE_NOW;
use crate::fb::PXA_NONSTD_YUV420P_ORIGIN;
use crate::format::query_format;
use crate::format::Fourcc;
use crate::geometry::DisplayGeometry;
use crate::geometry::OverlayOffset;
use crate::geometry::Resolution;
use crate::mmap::Mmap;

/// Black in limited range YUV.
pub const BLACK_LUMA: u8 = 16;
pub const BLACK_CHROMA: u8 = 128;

const OVERLAY_BITS_PER_PIXEL: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    Y,
    U,
    V,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Y, Plane::U, Plane::V];

    pub fn is_chroma(self) -> bool {
        self != Plane::Y
    }
}

/// Offsets of the 4:2:0 planes inside the overlay memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneLayout {
    native: Resolution,
}

impl PlaneLayout {
    pub fn new(native: Resolution) -> Self {
        PlaneLayout { native }
    }

    fn luma_len(&self) -> usize {
        self.native.area()
    }

    fn chroma_len(&self) -> usize {
        self.native.area() / 4
    }

    /// Bytes needed to hold all three planes.
    pub fn total_len(&self) -> usize {
        self.luma_len() + 2 * self.chroma_len()
    }

    /// Byte range of `plane` inside the overlay memory.
    pub fn range(&self, plane: Plane) -> Range<usize> {
        let u_start = self.luma_len();
        let v_start = u_start + self.chroma_len();
        match plane {
            Plane::Y => 0..u_start,
            Plane::U => u_start..v_start,
            Plane::V => v_start..v_start + self.chroma_len(),
        }
    }

    /// Distance in bytes between two rows of `plane`.
    pub fn pitch(&self, plane: Plane) -> usize {
        match plane {
            Plane::Y => self.native.width as usize,
            Plane::U | Plane::V => self.native.width as usize / 2,
        }
    }
}

/// The configured overlay: the open overlay node and its mapped memory.
///
/// The plane views exist only while the mapping does; dropping the surface unmaps the memory and
/// then closes the node.
pub struct OverlaySurface<D: FramebufferDevice> {
    // Declared before `device`: fields drop in order, and the memory must be unmapped first.
    mapping: Mmap,
    device: D,
    native: Resolution,
    resolution: Resolution,
    offset: OverlayOffset,
    layout: PlaneLayout,
}

impl<D: FramebufferDevice> OverlaySurface<D> {
    /// Validates the requested geometry, programs the overlay for planar YUV 4:2:0 at the native
    /// resolution, maps its memory and paints it black.
    ///
    /// Every resource acquired before a failure is released before the error is returned.
    pub fn negotiate<P>(
        provider: &P,
        display: &DisplayGeometry,
        source: Resolution,
        destination: Resolution,
        format: Fourcc,
    ) -> Result<Self, ConfigError>
    where
        P: DeviceProvider<Device = D>,
    {
        let native = display.native();
        debug!(
            "config() source: {}, destination: {}, format: {}",
            source, destination, format
        );

        if query_format(format).is_empty() {
            return Err(ConfigError::UnsupportedFormat(format));
        }
        if !source.fits_in(&native) {
            error!("source image {} is too big, scaling not supported", source);
            return Err(ConfigError::SourceTooLarge {
                source_res: source,
                native,
            });
        }
        if !destination.fits_in(&native) {
            error!("destination {} is too big, scaling not supported", destination);
            return Err(ConfigError::DestinationTooLarge {
                destination,
                native,
            });
        }
        if source != destination {
            error!("source != destination, scaling not supported");
            return Err(ConfigError::ScalingUnsupported {
                source_res: source,
                destination,
            });
        }

        let offset = display.centering_offset(destination);

        let mut device = provider
            .open_overlay()
            .map_err(|source| ConfigError::OpenDevice {
                path: provider.overlay_path().to_path_buf(),
                source,
            })?;

        let mut mode = device.var_screeninfo().map_err(|e| {
            error!("FBIOGET_VSCREENINFO failed on the overlay: {}", e);
            ConfigError::ModeQuery(e)
        })?;
        mode.xres = native.width;
        mode.xres_virtual = native.width;
        mode.yres = native.height;
        mode.yres_virtual = native.height;
        mode.bits_per_pixel = OVERLAY_BITS_PER_PIXEL;
        mode.activate = FB_ACTIVATE_NOW;
        mode.nonstd = PXA_NONSTD_YUV420P_ORIGIN;
        device.put_var_screeninfo(&mut mode).map_err(|e| {
            error!("FBIOPUT_VSCREENINFO failed on the overlay: {}", e);
            ConfigError::ModeRejected(e)
        })?;

        let fix = device.fix_screeninfo().map_err(|e| {
            error!("FBIOGET_FSCREENINFO failed on the overlay: {}", e);
            ConfigError::FixedInfo(e)
        })?;

        let layout = PlaneLayout::new(native);
        let mapping_len = fix.smem_len as usize;
        if mapping_len < layout.total_len() {
            error!(
                "overlay memory is {} bytes, {} needed",
                mapping_len,
                layout.total_len()
            );
            return Err(ConfigError::MappingTooSmall {
                required: layout.total_len(),
                actual: mapping_len,
            });
        }
        // total_len() is non-zero for a probed display, so is the mapping.
        let size = NonZeroUsize::new(mapping_len).ok_or(ConfigError::MappingTooSmall {
            required: layout.total_len(),
            actual: mapping_len,
        })?;
        let mapping = Mmap::new(&device, size).map_err(|e| {
            error!("failed to mmap overlay: {}", e);
            ConfigError::MapFailed(e)
        })?;

        let mut surface = OverlaySurface {
            mapping,
            device,
            native,
            resolution: destination,
            offset,
            layout,
        };
        surface.fill_black();

        info!(
            "configured overlay for {} content at +{}+{}",
            destination, offset.x, offset.y
        );

        Ok(surface)
    }

    fn fill_black(&mut self) {
        for plane in Plane::ALL {
            let value = if plane.is_chroma() {
                BLACK_CHROMA
            } else {
                BLACK_LUMA
            };
            self.plane_mut(plane).fill(value);
        }
    }

    /// Native resolution the overlay planes are sized to.
    pub fn native(&self) -> Resolution {
        self.native
    }

    /// Content resolution accepted by [`crate::blit::blit`].
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Position of the content origin on the overlay.
    pub fn offset(&self) -> OverlayOffset {
        self.offset
    }

    pub fn layout(&self) -> &PlaneLayout {
        &self.layout
    }

    /// Length of the overlay memory, as reported by the device.
    pub fn mapping_len(&self) -> usize {
        self.mapping.len()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// The current contents of `plane`, `pitch(plane)` bytes per row.
    pub fn plane(&self, plane: Plane) -> &[u8] {
        &self.mapping[self.layout.range(plane)]
    }

    pub(crate) fn plane_mut(&mut self, plane: Plane) -> &mut [u8] {
        let range = self.layout.range(plane);
        &mut self.mapping[range]
    }
}
