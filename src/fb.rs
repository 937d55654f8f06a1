// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Access to Linux fbdev nodes: the screeninfo structures and the ioctls that read and write
//! them.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::RawFd;
use std::path::Path;
use std::path::PathBuf;

use libc::c_ulong;

use crate::config::OverlayConfig;

/// Apply the submitted mode immediately.
pub const FB_ACTIVATE_NOW: u32 = 0;

/// `nonstd` pixel format code for planar YUV 4:2:0 on the PXA overlays.
const PXA_NONSTD_YUV420P: u32 = 4;

/// Packs the PXA `nonstd` descriptor: format code in bits 20.., X position in bits 10..20 and Y
/// position in bits 0..10.
pub const fn pxa_nonstd(format: u32, x: u32, y: u32) -> u32 {
    (format << 20) | ((x & 0x3ff) << 10) | (y & 0x3ff)
}

/// `nonstd` value requesting planar YUV 4:2:0 at pixel offset (0, 0).
pub const PXA_NONSTD_YUV420P_ORIGIN: u32 = pxa_nonstd(PXA_NONSTD_YUV420P, 0, 0);

/// Layout of one color channel inside a pixel. Mandated by the fbdev ABI.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

/// The variable screen information (`struct fb_var_screeninfo`). Mandated by the
/// FBIOGET_VSCREENINFO and FBIOPUT_VSCREENINFO ioctls.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FbVarScreeninfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

/// The fixed screen information (`struct fb_fix_screeninfo`). Mandated by the
/// FBIOGET_FSCREENINFO ioctl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FbFixScreeninfo {
    pub id: [u8; 16],
    pub smem_start: c_ulong,
    /// Length of the frame buffer memory, the size to mmap.
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

mod ioctl {
    use super::FbFixScreeninfo;
    use super::FbVarScreeninfo;

    // The fbdev ioctls predate the _IOR/_IOW encoding.
    nix::ioctl_read_bad!(fbioget_vscreeninfo, 0x4600, FbVarScreeninfo);
    nix::ioctl_readwrite_bad!(fbioput_vscreeninfo, 0x4601, FbVarScreeninfo);
    nix::ioctl_read_bad!(fbioget_fscreeninfo, 0x4602, FbFixScreeninfo);
}

/// A framebuffer node whose memory can be mapped through its file descriptor.
pub trait FramebufferDevice: AsRawFd {
    /// Reads the current mode.
    fn var_screeninfo(&self) -> io::Result<FbVarScreeninfo>;

    /// Submits `info` as the new mode. The device may adjust fields it cannot honor; the
    /// adjusted values are written back into `info`.
    fn put_var_screeninfo(&mut self, info: &mut FbVarScreeninfo) -> io::Result<()>;

    /// Reads the fixed information, including the true length of the device memory.
    fn fix_screeninfo(&self) -> io::Result<FbFixScreeninfo>;
}

/// An fbdev node opened for reading and writing.
#[derive(Debug)]
pub struct FbDevice {
    file: File,
}

impl FbDevice {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(FbDevice { file })
    }
}

impl AsRawFd for FbDevice {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl FramebufferDevice for FbDevice {
    fn var_screeninfo(&self) -> io::Result<FbVarScreeninfo> {
        let mut info = FbVarScreeninfo::default();
        // SAFETY: `info` is a valid, writable fb_var_screeninfo and the fd is owned by `self`.
        unsafe { ioctl::fbioget_vscreeninfo(self.file.as_raw_fd(), &mut info) }?;
        Ok(info)
    }

    fn put_var_screeninfo(&mut self, info: &mut FbVarScreeninfo) -> io::Result<()> {
        // SAFETY: `info` is a valid fb_var_screeninfo that the kernel reads and writes back.
        unsafe { ioctl::fbioput_vscreeninfo(self.file.as_raw_fd(), info) }?;
        Ok(())
    }

    fn fix_screeninfo(&self) -> io::Result<FbFixScreeninfo> {
        let mut info = FbFixScreeninfo::default();
        // SAFETY: `info` is a valid, writable fb_fix_screeninfo and the fd is owned by `self`.
        unsafe { ioctl::fbioget_fscreeninfo(self.file.as_raw_fd(), &mut info) }?;
        Ok(info)
    }
}

/// Opens the framebuffer nodes the driver talks to.
pub trait DeviceProvider {
    type Device: FramebufferDevice;

    fn primary_path(&self) -> &Path;

    fn overlay_path(&self) -> &Path;

    /// Opens the primary display, used only to read the native resolution.
    fn open_primary(&self) -> io::Result<Self::Device>;

    /// Opens the overlay plane that receives the video.
    fn open_overlay(&self) -> io::Result<Self::Device>;
}

/// The real `/dev/fbN` nodes.
#[derive(Clone, Debug)]
pub struct FbDevNodes {
    primary: PathBuf,
    overlay: PathBuf,
}

impl FbDevNodes {
    pub fn new(config: &OverlayConfig) -> Self {
        FbDevNodes {
            primary: config.primary_device.clone(),
            overlay: config.overlay_device.clone(),
        }
    }
}

impl DeviceProvider for FbDevNodes {
    type Device = FbDevice;

    fn primary_path(&self) -> &Path {
        &self.primary
    }

    fn overlay_path(&self) -> &Path {
        &self.overlay
    }

    fn open_primary(&self) -> io::Result<FbDevice> {
        FbDevice::open(&self.primary)
    }

    fn open_overlay(&self) -> io::Result<FbDevice> {
        FbDevice::open(&self.overlay)
    }
}
