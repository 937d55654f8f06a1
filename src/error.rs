// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::Fourcc;
use crate::geometry::Resolution;
use crate::surface::Plane;

/// The native mode of the primary display could not be read. Fatal to driver startup.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to open display {path:?}: {source}")]
    OpenDevice { path: PathBuf, source: io::Error },
    #[error("FBIOGET_VSCREENINFO failed on the primary display: {0}")]
    ModeQuery(io::Error),
    #[error("primary display reports an empty mode {width}x{height}")]
    EmptyMode { width: u32, height: u32 },
}

/// Overlay negotiation failures. The driver is left unconfigured and may be configured again.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("the display has not been probed")]
    NotProbed,
    #[error("format {0} is not supported")]
    UnsupportedFormat(Fourcc),
    #[error("source {source_res} does not fit the native {native} display, scaling not supported")]
    SourceTooLarge {
        source_res: Resolution,
        native: Resolution,
    },
    #[error("destination {destination} does not fit the native {native} display, scaling not supported")]
    DestinationTooLarge {
        destination: Resolution,
        native: Resolution,
    },
    #[error("source {source_res} != destination {destination}, scaling not supported")]
    ScalingUnsupported {
        source_res: Resolution,
        destination: Resolution,
    },
    #[error("failed to open overlay {path:?}: {source}")]
    OpenDevice { path: PathBuf, source: io::Error },
    #[error("FBIOGET_VSCREENINFO failed on the overlay: {0}")]
    ModeQuery(io::Error),
    #[error("overlay refused the YUV420 mode: {0}")]
    ModeRejected(io::Error),
    #[error("FBIOGET_FSCREENINFO failed on the overlay: {0}")]
    FixedInfo(io::Error),
    #[error("overlay memory is {actual} bytes, the planes need {required}")]
    MappingTooSmall { required: usize, actual: usize },
    #[error("failed to mmap the overlay: {0}")]
    MapFailed(io::Error),
}

/// A rejected slice. Nothing was copied and the surface remains usable.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlitError {
    #[error("no overlay surface is configured")]
    NotConfigured,
    #[error("slice {width}x{height}+{x}+{y} exceeds the {bounds} overlay")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        bounds: Resolution,
    },
    #[error("{plane:?} source plane holds {actual} bytes, the slice reads {required}")]
    SourceTooShort {
        plane: Plane,
        required: usize,
        actual: usize,
    },
}

/// Errors surfaced through the [`crate::VideoOutput`] dispatch interface.
#[derive(Error, Debug)]
pub enum VoError {
    #[error("probe: {0}")]
    Probe(#[from] ProbeError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("draw_slice: {0}")]
    Blit(#[from] BlitError),
    #[error("not implemented")]
    NotImplemented,
}
