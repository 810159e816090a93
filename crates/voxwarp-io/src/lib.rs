//! Image readers and writers for voxwarp.
//!
//! Only NIfTI-1 single files (`.nii`, `.nii.gz`) are supported.

pub mod nifti_io;

use std::path::Path;

use anyhow::{bail, Result};
use voxwarp_core::Image;

pub use nifti_io::{read_nifti, write_nifti};

/// On-disk image formats known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Uncompressed NIfTI-1 (`.nii`).
    Nifti,
    /// Gzip-compressed NIfTI-1 (`.nii.gz`).
    NiftiGz,
}

impl ImageFormat {
    /// Detect the format from a file name, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".nii.gz") {
            Some(Self::NiftiGz)
        } else if name.ends_with(".nii") {
            Some(Self::Nifti)
        } else {
            None
        }
    }
}

/// Read an 8-bit image, choosing the reader from the file extension.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Image<u8>> {
    let path = path.as_ref();
    match ImageFormat::from_path(path) {
        Some(ImageFormat::Nifti | ImageFormat::NiftiGz) => read_nifti(path),
        None => bail!(
            "Unsupported image format for {} (expected .nii or .nii.gz)",
            path.display()
        ),
    }
}

/// Write an 8-bit image, choosing the writer from the file extension.
pub fn write_image<P: AsRef<Path>>(path: P, image: &Image<u8>) -> Result<()> {
    let path = path.as_ref();
    match ImageFormat::from_path(path) {
        Some(ImageFormat::Nifti | ImageFormat::NiftiGz) => write_nifti(path, image),
        None => bail!(
            "Unsupported image format for {} (expected .nii or .nii.gz)",
            path.display()
        ),
    }
}
