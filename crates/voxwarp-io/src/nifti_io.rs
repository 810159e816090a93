//! NIfTI-1 reading and writing.
//!
//! Voxel data is read as unsigned 8-bit samples. Geometry comes from the
//! sform when present, then the qform, then `pixdim` alone. Physical
//! coordinates are the file's own world frame; no axis flips are applied.

use std::path::Path;

use anyhow::{bail, Context, Result};
use nalgebra::SMatrix;
use ndarray::{Array3, Axis, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use tracing::{debug, warn};
use voxwarp_core::image::{Image, ImageGrid};
use voxwarp_core::spatial::{Direction, Matrix, Point3, Spacing3, Vector3};

/// NIfTI code for scanner-based anatomical coordinates.
const XFORM_SCANNER_ANAT: i16 = 1;
/// NIfTI `xyzt_units` value for millimetres.
const UNITS_MM: u8 = 2;

/// Voxel-to-world affine as three rows of `[R·diag(spacing) | origin]`.
type Affine = [[f64; 4]; 3];

/// Read a 3D NIfTI volume as an 8-bit image.
///
/// Trailing singleton dimensions (e.g. a one-frame time axis) are dropped;
/// anything other than three spatial dimensions is rejected.
pub fn read_nifti<P: AsRef<Path>>(path: P) -> Result<Image<u8>> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("Failed to read NIfTI file {}", path.display()))?;
    let header = obj.header();
    let (origin, spacing, direction) = geometry_from_affine(&header_affine(header));

    let volume = obj.into_volume();
    let mut array = volume
        .into_ndarray::<u8>()
        .context("Failed to convert volume to ndarray")?;
    while array.ndim() > 3 && array.shape()[array.ndim() - 1] == 1 {
        let last = array.ndim() - 1;
        array = array.index_axis_move(Axis(last), 0);
    }
    if array.ndim() != 3 {
        bail!(
            "Expected 3D NIfTI file, found dimensions {:?}",
            array.shape()
        );
    }
    let array = array
        .into_dimensionality::<Ix3>()
        .context("Failed to view volume as 3D")?;
    let size = [array.shape()[0], array.shape()[1], array.shape()[2]];

    let grid = ImageGrid::new(size, origin, spacing, direction)
        .with_context(|| format!("Invalid geometry in {}", path.display()))?;
    debug!(
        "Read {}: size {:?}, origin {:?}, spacing {:?}",
        path.display(),
        size,
        origin.coords(),
        spacing.components()
    );

    Ok(Image::from_fn(grid, |i, j, k| array[[i, j, k]]))
}

/// Write an 8-bit image to a NIfTI file.
///
/// The header carries `pixdim` and an sform encoding origin, spacing and
/// direction. A `.nii.gz` path is gzip-compressed.
pub fn write_nifti<P: AsRef<Path>>(path: P, image: &Image<u8>) -> Result<()> {
    let path = path.as_ref();
    if image.is_empty() {
        bail!("Cannot write an empty image to {}", path.display());
    }

    let [nx, ny, nz] = image.size();
    let array = Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| image.get(i, j, k));
    let header = header_for(image);

    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&array)
        .with_context(|| format!("Failed to write NIfTI file {}", path.display()))?;
    debug!("Wrote {}: size {:?}", path.display(), image.size());
    Ok(())
}

/// Voxel-to-world affine of a header: sform, qform, then `pixdim` alone.
fn header_affine(header: &NiftiHeader) -> Affine {
    let widen = |row: [f32; 4]| row.map(f64::from);

    if header.sform_code > 0 {
        return [widen(header.srow_x), widen(header.srow_y), widen(header.srow_z)];
    }

    let pixdim = |axis: usize| {
        let value = f64::from(header.pixdim[axis]);
        if value > 0.0 && value.is_finite() {
            value
        } else {
            warn!("pixdim[{}] = {} is not usable, assuming 1.0", axis, value);
            1.0
        }
    };
    let (dx, dy, dz) = (pixdim(1), pixdim(2), pixdim(3));

    if header.qform_code > 0 {
        let b = f64::from(header.quatern_b);
        let c = f64::from(header.quatern_c);
        let d = f64::from(header.quatern_d);
        let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let dz = dz * qfac;

        let r = [
            [a * a + b * b - c * c - d * d, 2.0 * (b * c - a * d), 2.0 * (b * d + a * c)],
            [2.0 * (b * c + a * d), a * a + c * c - b * b - d * d, 2.0 * (c * d - a * b)],
            [2.0 * (b * d - a * c), 2.0 * (c * d + a * b), a * a + d * d - c * c - b * b],
        ];
        let offset = [header.quatern_x, header.quatern_y, header.quatern_z].map(f64::from);
        return [0, 1, 2].map(|row| {
            [r[row][0] * dx, r[row][1] * dy, r[row][2] * dz, offset[row]]
        });
    }

    [
        [dx, 0.0, 0.0, 0.0],
        [0.0, dy, 0.0, 0.0],
        [0.0, 0.0, dz, 0.0],
    ]
}

/// Split an affine into origin, spacing (column norms) and direction.
fn geometry_from_affine(affine: &Affine) -> (Point3, Spacing3, Direction<3>) {
    let origin = Point3::new([affine[0][3], affine[1][3], affine[2][3]]);
    let axes = [Vector3::x_axis(), Vector3::y_axis(), Vector3::z_axis()];

    let mut spacing = [1.0; 3];
    let mut columns = [nalgebra::Vector3::zeros(); 3];
    for col in 0..3 {
        let column = Vector3::new([affine[0][col], affine[1][col], affine[2][col]]);
        let norm = column.norm();
        if norm > 1e-9 && norm.is_finite() {
            spacing[col] = norm;
            columns[col] = (column / norm).0;
        } else {
            columns[col] = axes[col].0;
        }
    }

    let direction = Matrix(SMatrix::<f64, 3, 3>::from_columns(&columns));
    (origin, Spacing3::new(spacing), direction)
}

/// Header with `pixdim` and an sform describing `image`'s grid.
fn header_for(image: &Image<u8>) -> NiftiHeader {
    let spacing = image.spacing();
    let origin = image.origin();
    let direction = image.direction();

    let row = |r: usize| -> [f32; 4] {
        [
            (direction[(r, 0)] * spacing[0]) as f32,
            (direction[(r, 1)] * spacing[1]) as f32,
            (direction[(r, 2)] * spacing[2]) as f32,
            origin[r] as f32,
        ]
    };

    let mut pixdim = [1.0f32; 8];
    pixdim[1] = spacing[0] as f32;
    pixdim[2] = spacing[1] as f32;
    pixdim[3] = spacing[2] as f32;

    NiftiHeader {
        pixdim,
        sform_code: XFORM_SCANNER_ANAT,
        qform_code: 0,
        srow_x: row(0),
        srow_y: row(1),
        srow_z: row(2),
        xyzt_units: UNITS_MM,
        ..Default::default()
    }
}
