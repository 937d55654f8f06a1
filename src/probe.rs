// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use log::info;

use crate::error::ProbeError;
use crate::fb::DeviceProvider;
use crate::fb::FramebufferDevice;
use crate::geometry::DisplayGeometry;
use crate::geometry::Resolution;

/// Reads the native resolution of the primary display. The device is closed before returning.
pub fn probe_display<P: DeviceProvider>(provider: &P) -> Result<DisplayGeometry, ProbeError> {
    let primary = provider
        .open_primary()
        .map_err(|source| ProbeError::OpenDevice {
            path: provider.primary_path().to_path_buf(),
            source,
        })?;
    let mode = primary
        .var_screeninfo()
        .map_err(ProbeError::ModeQuery)?;

    if mode.xres == 0 || mode.yres == 0 {
        return Err(ProbeError::EmptyMode {
            width: mode.xres,
            height: mode.yres,
        });
    }

    let native = Resolution::new(mode.xres, mode.yres);
    info!("main plane res is {}", native);

    Ok(DisplayGeometry::new(native))
}
