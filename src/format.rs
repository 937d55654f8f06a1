// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Pixel formats accepted by the overlay and the capabilities reported for them.

use std::fmt;

use bitflags::bitflags;
use log::error;

/// A little-endian four character code identifying a pixel format.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Fourcc(u32);

impl Fourcc {
    /// Planar Y, V, U 4:2:0.
    pub const YV12: Fourcc = Fourcc::from_bytes(b"YV12");
    /// Planar Y, U, V 4:2:0.
    pub const I420: Fourcc = Fourcc::from_bytes(b"I420");
    /// Same layout as I420, registered under a different code.
    pub const IYUV: Fourcc = Fourcc::from_bytes(b"IYUV");

    pub const fn from_bytes(code: &[u8; 4]) -> Self {
        Fourcc(u32::from_le_bytes(*code))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl From<u32> for Fourcc {
    fn from(fourcc: u32) -> Self {
        Fourcc(fourcc)
    }
}

impl From<Fourcc> for u32 {
    fn from(fourcc: Fourcc) -> Self {
        fourcc.0
    }
}

impl From<&[u8; 4]> for Fourcc {
    fn from(code: &[u8; 4]) -> Self {
        Fourcc::from_bytes(code)
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            f.write_str(&String::from_utf8_lossy(&bytes))
        } else {
            write!(f, "0x{:08x}", self.0)
        }
    }
}

impl fmt::Debug for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fourcc({self})")
    }
}

bitflags! {
    /// Capabilities of the output for a given input format. Empty means unsupported.
    #[derive(Default)]
    pub struct Capabilities: u32 {
        /// The format can be displayed.
        const CSP_SUPPORTED = 0x001;
        /// The format is displayed without software conversion.
        const CSP_SUPPORTED_BY_HW = 0x002;
        /// Source planes may use arbitrary row strides.
        const ACCEPT_STRIDE = 0x400;
    }
}

/// Returns the capabilities of the overlay for `format`, or empty capabilities if it cannot be
/// shown. Only the three planar 4:2:0 layouts are accepted.
pub fn query_format(format: Fourcc) -> Capabilities {
    match format {
        Fourcc::YV12 | Fourcc::IYUV | Fourcc::I420 => {
            Capabilities::CSP_SUPPORTED
                | Capabilities::CSP_SUPPORTED_BY_HW
                | Capabilities::ACCEPT_STRIDE
        }
        _ => {
            error!("format {} is not supported", format);
            Capabilities::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_420_formats_are_supported() {
        for format in [Fourcc::YV12, Fourcc::I420, Fourcc::IYUV] {
            let caps = query_format(format);
            assert!(!caps.is_empty());
            assert!(caps.contains(Capabilities::ACCEPT_STRIDE));
            assert_eq!(caps.bits(), 0x403);
        }
    }

    #[test]
    fn other_formats_are_rejected() {
        for code in [b"NV12", b"YUY2", b"UYVY", b"RGB3", b"BGR4", b"I422", b"\0\0\0\0"] {
            assert_eq!(query_format(Fourcc::from(code)).bits(), 0);
        }
    }

    #[test]
    fn query_is_idempotent() {
        assert_eq!(query_format(Fourcc::I420), query_format(Fourcc::I420));
    }

    #[test]
    fn fourcc_codes() {
        assert_eq!(u32::from(Fourcc::YV12), 0x3231_5659);
        assert_eq!(u32::from(Fourcc::I420), 0x3032_3449);
        assert_eq!(u32::from(Fourcc::IYUV), 0x5655_5949);
        assert_eq!(Fourcc::I420.to_string(), "I420");
        assert_eq!(Fourcc::from(0x0000_0001).to_string(), "0x00000001");
    }
}
