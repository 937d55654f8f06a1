// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::cell::Cell;
use std::cell::RefCell;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::RawFd;
use std::os::unix::net::UnixDatagram;
use std::path::Path;
use std::rc::Rc;

use crate::fb::DeviceProvider;
use crate::fb::FbFixScreeninfo;
use crate::fb::FbVarScreeninfo;
use crate::fb::FramebufferDevice;
use crate::geometry::Resolution;

/// Size of the planar 4:2:0 planes of a `native` sized overlay.
pub fn yuv420_len(native: Resolution) -> usize {
    native.area() + 2 * (native.area() / 4)
}

/// In-memory framebuffer. The memory is a temporary file, so mapping it behaves like mapping the
/// real device.
pub struct FakeFramebuffer {
    fd: OwnedFd,
    var: FbVarScreeninfo,
    smem_len: u32,
    fail_mode_query: bool,
    reject_mode: bool,
    fail_fix_query: bool,
    submitted: Rc<RefCell<Vec<FbVarScreeninfo>>>,
    open_handles: Rc<Cell<usize>>,
}

impl AsRawFd for FakeFramebuffer {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl FramebufferDevice for FakeFramebuffer {
    fn var_screeninfo(&self) -> io::Result<FbVarScreeninfo> {
        if self.fail_mode_query {
            return Err(io::Error::from_raw_os_error(libc::ENOTTY));
        }
        Ok(self.var)
    }

    fn put_var_screeninfo(&mut self, info: &mut FbVarScreeninfo) -> io::Result<()> {
        self.submitted.borrow_mut().push(*info);
        if self.reject_mode {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }
        self.var = *info;
        Ok(())
    }

    fn fix_screeninfo(&self) -> io::Result<FbFixScreeninfo> {
        if self.fail_fix_query {
            return Err(io::Error::from_raw_os_error(libc::ENOTTY));
        }
        Ok(FbFixScreeninfo {
            smem_len: self.smem_len,
            ..Default::default()
        })
    }
}

impl Drop for FakeFramebuffer {
    fn drop(&mut self) {
        self.open_handles.set(self.open_handles.get() - 1);
    }
}

/// Hands out fake primary and overlay framebuffers and tracks how many are open.
pub struct FakeProvider {
    native: Resolution,
    overlay_mode: Resolution,
    overlay_memory: usize,
    primary_present: bool,
    overlay_present: bool,
    fail_primary_mode_query: bool,
    fail_overlay_mode_query: bool,
    reject_overlay_mode: bool,
    fail_fix_query: bool,
    unmappable_overlay: bool,
    submitted: Rc<RefCell<Vec<FbVarScreeninfo>>>,
    open_handles: Rc<Cell<usize>>,
}

impl FakeProvider {
    pub fn new(native: Resolution) -> Self {
        FakeProvider {
            native,
            overlay_mode: Resolution::new(176, 144),
            overlay_memory: yuv420_len(native),
            primary_present: true,
            overlay_present: true,
            fail_primary_mode_query: false,
            fail_overlay_mode_query: false,
            reject_overlay_mode: false,
            fail_fix_query: false,
            unmappable_overlay: false,
            submitted: Rc::new(RefCell::new(Vec::new())),
            open_handles: Rc::new(Cell::new(0)),
        }
    }

    pub fn without_primary(mut self) -> Self {
        self.primary_present = false;
        self
    }

    pub fn without_overlay(mut self) -> Self {
        self.overlay_present = false;
        self
    }

    pub fn failing_primary_mode_query(mut self) -> Self {
        self.fail_primary_mode_query = true;
        self
    }

    pub fn failing_overlay_mode_query(mut self) -> Self {
        self.fail_overlay_mode_query = true;
        self
    }

    pub fn rejecting_overlay_mode(mut self) -> Self {
        self.reject_overlay_mode = true;
        self
    }

    pub fn failing_fix_query(mut self) -> Self {
        self.fail_fix_query = true;
        self
    }

    /// The overlay fd refers to a socket, which cannot be mapped.
    pub fn unmappable_overlay(mut self) -> Self {
        self.unmappable_overlay = true;
        self
    }

    /// Length reported in the overlay's fixed screeninfo.
    pub fn with_overlay_memory(mut self, len: usize) -> Self {
        self.overlay_memory = len;
        self
    }

    /// Number of fake devices currently open.
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }

    /// Every mode submitted to the overlay, in order.
    pub fn submitted_modes(&self) -> Vec<FbVarScreeninfo> {
        self.submitted.borrow().clone()
    }

    fn open(&self, mode: Resolution, mappable: bool, len: usize) -> io::Result<FakeFramebuffer> {
        let fd: OwnedFd = if mappable {
            let file = tempfile::tempfile()?;
            file.set_len(len as u64)?;
            file.into()
        } else {
            let (socket, _) = UnixDatagram::pair()?;
            socket.into()
        };
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(FakeFramebuffer {
            fd,
            var: FbVarScreeninfo {
                xres: mode.width,
                yres: mode.height,
                xres_virtual: mode.width,
                yres_virtual: mode.height,
                bits_per_pixel: 16,
                ..Default::default()
            },
            smem_len: len as u32,
            fail_mode_query: false,
            reject_mode: false,
            fail_fix_query: false,
            submitted: self.submitted.clone(),
            open_handles: self.open_handles.clone(),
        })
    }
}

impl DeviceProvider for FakeProvider {
    type Device = FakeFramebuffer;

    fn primary_path(&self) -> &Path {
        Path::new("/dev/fake-fb0")
    }

    fn overlay_path(&self) -> &Path {
        Path::new("/dev/fake-fb2")
    }

    fn open_primary(&self) -> io::Result<FakeFramebuffer> {
        if !self.primary_present {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }
        let mut primary = self.open(self.native, true, yuv420_len(self.native) * 2)?;
        primary.fail_mode_query = self.fail_primary_mode_query;
        Ok(primary)
    }

    fn open_overlay(&self) -> io::Result<FakeFramebuffer> {
        if !self.overlay_present {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }
        let mut overlay = self.open(
            self.overlay_mode,
            !self.unmappable_overlay,
            self.overlay_memory,
        )?;
        overlay.fail_mode_query = self.fail_overlay_mode_query;
        overlay.reject_mode = self.reject_overlay_mode;
        overlay.fail_fix_query = self.fail_fix_query;
        Ok(overlay)
    }
}
