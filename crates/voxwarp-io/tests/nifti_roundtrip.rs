use anyhow::Result;
use ndarray::{Array, Array4};
use nifti::writer::WriterOptions;
use tempfile::tempdir;
use voxwarp_core::image::{Image, ImageGrid};
use voxwarp_core::spatial::{Direction3, Point3, Spacing3};
use voxwarp_io::{read_image, write_image};

fn oblique_image() -> Image<u8> {
    let direction = Direction3::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
    let grid = ImageGrid::new(
        [5, 4, 3],
        Point3::new([12.5, -8.0, 30.0]),
        Spacing3::new([0.5, 1.25, 2.0]),
        direction,
    )
    .unwrap();
    Image::from_fn(grid, |i, j, k| (i * 50 + j * 7 + k * 3) as u8)
}

fn assert_geometry_close(a: &Image<u8>, b: &Image<u8>) {
    assert_eq!(a.size(), b.size());
    for axis in 0..3 {
        assert!((a.origin()[axis] - b.origin()[axis]).abs() < 1e-5);
        assert!((a.spacing()[axis] - b.spacing()[axis]).abs() < 1e-5);
        for col in 0..3 {
            assert!((a.direction()[(axis, col)] - b.direction()[(axis, col)]).abs() < 1e-5);
        }
    }
}

#[test]
fn test_roundtrip_nii() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volume.nii");
    let image = oblique_image();

    write_image(&path, &image)?;
    let restored = read_image(&path)?;

    assert_geometry_close(&image, &restored);
    assert_eq!(image.samples(), restored.samples());
    Ok(())
}

#[test]
fn test_roundtrip_nii_gz() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volume.nii.gz");
    let image = oblique_image();

    write_image(&path, &image)?;
    let restored = read_image(&path)?;

    assert_geometry_close(&image, &restored);
    assert_eq!(image.samples(), restored.samples());
    Ok(())
}

#[test]
fn test_trailing_singleton_dimension_is_dropped() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("frame.nii");
    let array: Array4<u8> = Array::from_shape_fn((3, 2, 2, 1), |(i, j, k, _)| (i + 3 * j + 6 * k) as u8);
    WriterOptions::new(&path).write_nifti(&array)?;

    let image = read_image(&path)?;
    assert_eq!(image.size(), [3, 2, 2]);
    assert_eq!(image.get(2, 1, 1), 11);
    Ok(())
}

#[test]
fn test_four_dimensional_volume_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("series.nii");
    let array: Array4<u8> = Array::zeros((3, 2, 2, 2));
    WriterOptions::new(&path).write_nifti(&array)?;

    let err = read_image(&path).unwrap_err();
    assert!(err.to_string().contains("Expected 3D NIfTI file"));
    Ok(())
}

#[test]
fn test_missing_file_reports_path() {
    let err = read_image("/nonexistent/dir/input.nii").unwrap_err();
    assert!(format!("{:#}", err).contains("input.nii"));
}
