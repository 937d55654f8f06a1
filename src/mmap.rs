// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::io;
use std::num::NonZeroUsize;
use std::ops::Deref;
use std::ops::DerefMut;
use std::os::unix::io::AsRawFd;

use log::warn;

/// A shared read/write mapping of device memory. Unmapped on drop.
///
/// The mapping does not own the file descriptor it was created from; the owner must keep it open
/// at least as long as the mapping to satisfy drivers that tear down memory on close.
pub struct Mmap {
    ptr: *mut u8,
    size: NonZeroUsize,
}

impl Mmap {
    pub fn new(fd: &impl AsRawFd, size: NonZeroUsize) -> io::Result<Self> {
        // SAFETY: Memory space managed by Rust is not modified.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size.get(),
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd.as_raw_fd(),
                0,
            )
        } as *mut u8;
        if ptr == libc::MAP_FAILED as *mut u8 {
            Err(io::Error::last_os_error())
        } else {
            Ok(Self { ptr, size })
        }
    }
}

impl Deref for Mmap {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        // SAFETY: ptr and size is guaranteed to be valid.
        // SAFETY: lifetime is the same as self.
        unsafe { std::slice::from_raw_parts(self.ptr, self.size.get()) }
    }
}

impl DerefMut for Mmap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: ptr and size is guaranteed to be valid.
        // SAFETY: lifetime is the same as self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.size.get()) }
    }
}

impl Drop for Mmap {
    fn drop(&mut self) {
        // SAFETY: ptr and size is guaranteed to be valid.
        let res = unsafe { libc::munmap(self.ptr as *mut libc::c_void, self.size.get()) };
        if res != 0 {
            warn!("munmap failed: {}", io::Error::last_os_error());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::io::Seek;
    use std::io::SeekFrom;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_mmap_shared() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&[1; 4096]).unwrap();
        let mut mmap = Mmap::new(&file, NonZeroUsize::new(4096).unwrap()).unwrap();
        assert_eq!(mmap.len(), 4096);
        assert_eq!(&mmap[0..4096], &[1; 4096]);
        mmap[1024..2048].copy_from_slice(&[2; 1024]);

        // munmap(2) succeeds.
        drop(mmap);

        // Writes went to the file, not to a private copy.
        let mut contents = Vec::new();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.read_to_end(&mut contents).unwrap();
        assert_eq!(&contents[0..1024], &[1; 1024]);
        assert_eq!(&contents[1024..2048], &[2; 1024]);
        assert_eq!(&contents[2048..4096], &[1; 2048]);
    }

    #[test]
    fn test_mmap_non_page_size() {
        let file = tempfile::tempfile().unwrap();
        file.set_len(20).unwrap();
        let mut mmap = Mmap::new(&file, NonZeroUsize::new(20).unwrap()).unwrap();
        assert_eq!(mmap.len(), 20);
        assert_eq!(&mmap[0..20], &[0; 20]);
        mmap[15..20].copy_from_slice(&[2; 5]);
        assert_eq!(&mmap[15..20], &[2; 5]);
    }

    #[test]
    fn test_mmap_read_only_fd_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(4096).unwrap();
        let read_only = std::fs::File::open(file.path()).unwrap();
        assert!(Mmap::new(&read_only, NonZeroUsize::new(4096).unwrap()).is_err());
    }
}
