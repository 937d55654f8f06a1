// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Copy of decoded 4:2:0 slices into the overlay planes.

use log::debug;
use log::error;

use crate::error::BlitError;
use crate::fb::FramebufferDevice;
use crate::surface::OverlaySurface;
use crate::surface::Plane;

/// A rectangle of a decoded planar 4:2:0 frame to draw.
///
/// `width`, `height`, `x` and `y` are in luma pixels; the chroma planes cover half of each
/// dimension. `x` and `y` are relative to the origin of the configured content.
#[derive(Clone, Copy, Debug)]
pub struct SliceRequest<'a> {
    /// Y, U and V source planes, each starting at the first byte of the slice.
    pub planes: [&'a [u8]; 3],
    /// Bytes between the starts of two consecutive rows, per plane.
    pub strides: [usize; 3],
    pub width: usize,
    pub height: usize,
    pub x: usize,
    pub y: usize,
}

impl<'a> SliceRequest<'a> {
    pub fn new(
        planes: [&'a [u8]; 3],
        strides: [usize; 3],
        width: usize,
        height: usize,
        x: usize,
        y: usize,
    ) -> Self {
        SliceRequest {
            planes,
            strides,
            width,
            height,
            x,
            y,
        }
    }

    /// Rows and bytes per row read from `plane`.
    fn extent(&self, plane: Plane) -> (usize, usize) {
        if plane.is_chroma() {
            (self.height / 2, self.width / 2)
        } else {
            (self.height, self.width)
        }
    }
}

fn plane_index(plane: Plane) -> usize {
    match plane {
        Plane::Y => 0,
        Plane::U => 1,
        Plane::V => 2,
    }
}

/// Bytes a strided read of `rows` rows of `row_bytes` bytes spans, or `None` on overflow.
fn strided_len(rows: usize, row_bytes: usize, stride: usize) -> Option<usize> {
    if rows == 0 || row_bytes == 0 {
        return Some(0);
    }
    (rows - 1).checked_mul(stride)?.checked_add(row_bytes)
}

fn copy_rows(
    dst: &mut [u8],
    dst_pitch: usize,
    src: &[u8],
    src_stride: usize,
    rows: usize,
    row_bytes: usize,
) {
    for row in 0..rows {
        let d = row * dst_pitch;
        let s = row * src_stride;
        dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
    }
}

/// Copies `slice` into the overlay at the content offset.
///
/// A slice that does not fit inside the configured content, or whose source planes are too short
/// for the given strides, is rejected before any byte is written.
pub fn blit<D: FramebufferDevice>(
    surface: &mut OverlaySurface<D>,
    slice: &SliceRequest,
) -> Result<(), BlitError> {
    let bounds = surface.resolution();
    let offset = surface.offset();
    debug!(
        "draw_slice() w {} h {} x {} y {} stride {} {} {}",
        slice.width,
        slice.height,
        slice.x,
        slice.y,
        slice.strides[0],
        slice.strides[1],
        slice.strides[2]
    );

    let fits = |start: usize, len: usize, limit: u32| {
        start
            .checked_add(len)
            .map_or(false, |end| end <= limit as usize)
    };
    if !fits(slice.x, slice.width, bounds.width) || !fits(slice.y, slice.height, bounds.height) {
        error!("too big image");
        return Err(BlitError::OutOfBounds {
            x: slice.x,
            y: slice.y,
            width: slice.width,
            height: slice.height,
            bounds,
        });
    }

    for plane in Plane::ALL {
        let (rows, row_bytes) = slice.extent(plane);
        let src = slice.planes[plane_index(plane)];
        let required = strided_len(rows, row_bytes, slice.strides[plane_index(plane)])
            .unwrap_or(usize::MAX);
        if src.len() < required {
            error!("{:?} plane too short for slice", plane);
            return Err(BlitError::SourceTooShort {
                plane,
                required,
                actual: src.len(),
            });
        }
    }

    let x = offset.x + slice.x;
    let y = offset.y + slice.y;
    let layout = *surface.layout();
    for plane in Plane::ALL {
        let (rows, row_bytes) = slice.extent(plane);
        if rows == 0 || row_bytes == 0 {
            continue;
        }
        let pitch = layout.pitch(plane);
        let start = if plane.is_chroma() {
            (y / 2) * pitch + x / 2
        } else {
            y * pitch + x
        };
        copy_rows(
            &mut surface.plane_mut(plane)[start..],
            pitch,
            slice.planes[plane_index(plane)],
            slice.strides[plane_index(plane)],
            rows,
            row_bytes,
        );
    }

    Ok(())
}
