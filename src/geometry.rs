// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;

/// Width and height in luma pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Resolution { width, height }
    }

    /// Whether `self` fits inside `other` in both dimensions.
    pub fn fits_in(&self, other: &Resolution) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Native mode of the primary display, read once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayGeometry {
    native: Resolution,
}

impl DisplayGeometry {
    pub fn new(native: Resolution) -> Self {
        DisplayGeometry { native }
    }

    pub fn native(&self) -> Resolution {
        self.native
    }

    /// Offset that centers `content` on the display. `content` must fit.
    pub fn centering_offset(&self, content: Resolution) -> OverlayOffset {
        debug_assert!(content.fits_in(&self.native));
        OverlayOffset {
            x: ((self.native.width - content.width) / 2) as usize,
            y: ((self.native.height - content.height) / 2) as usize,
        }
    }
}

/// Position of the content origin on the overlay, in luma pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayOffset {
    pub x: usize,
    pub y: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centering_uses_floor_division() {
        let display = DisplayGeometry::new(Resolution::new(640, 480));
        assert_eq!(
            display.centering_offset(Resolution::new(320, 240)),
            OverlayOffset { x: 160, y: 120 }
        );
        assert_eq!(
            display.centering_offset(Resolution::new(637, 475)),
            OverlayOffset { x: 1, y: 2 }
        );
        assert_eq!(
            display.centering_offset(Resolution::new(640, 480)),
            OverlayOffset::default()
        );
        assert_eq!(
            display.centering_offset(Resolution::new(0, 0)),
            OverlayOffset { x: 320, y: 240 }
        );
    }

    #[test]
    fn fits_in() {
        let native = Resolution::new(320, 240);
        assert!(Resolution::new(320, 240).fits_in(&native));
        assert!(Resolution::new(1, 1).fits_in(&native));
        assert!(!Resolution::new(321, 240).fits_in(&native));
        assert!(!Resolution::new(320, 241).fits_in(&native));
    }
}
