// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::path::PathBuf;

/// Primary display node, only read for its native resolution.
pub const DEFAULT_PRIMARY_DEVICE: &str = "/dev/fb0";
/// Overlay 2 of the PXA27x/3xx LCD controller.
pub const DEFAULT_OVERLAY_DEVICE: &str = "/dev/fb2";

/// Device nodes used by the overlay driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayConfig {
    pub primary_device: PathBuf,
    pub overlay_device: PathBuf,
}

impl OverlayConfig {
    pub fn primary_device(mut self, path: impl Into<PathBuf>) -> Self {
        self.primary_device = path.into();
        self
    }

    pub fn overlay_device(mut self, path: impl Into<PathBuf>) -> Self {
        self.overlay_device = path.into();
        self
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            primary_device: PathBuf::from(DEFAULT_PRIMARY_DEVICE),
            overlay_device: PathBuf::from(DEFAULT_OVERLAY_DEVICE),
        }
    }
}
