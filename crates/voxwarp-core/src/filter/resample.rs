//! Resample image filter.
//!
//! This module provides ResampleImageFilter which resamples an image
//! into a new sampling grid using a transform and an interpolator.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::image::{Image, ImageGrid, Pixel};
use crate::interpolation::trait_::Interpolator;
use crate::interpolation::LinearInterpolator;
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::transform::trait_::Transform;

/// Resample image filter.
///
/// Resamples an image by applying a transform to map points from the
/// output image space to the input image space, and then interpolating values.
///
/// The transform maps from Output Physical Space -> Input Physical Space.
/// The filter never inverts it: to move image content by a map `T` that goes
/// from source to output, pass `T.inverse()`.
///
/// For every output voxel `(i, j, k)`:
/// 1. `p_out = origin' + direction' · (index ⊙ spacing')`
/// 2. `p_in = T(p_out)`
/// 3. the continuous index of `p_in` in the input is interpolated; indices
///    outside the input grid produce the default pixel value.
///
/// Output k-slices are filled in parallel on the rayon pool. Every voxel is
/// a pure function of its index, so parallel and sequential runs produce
/// identical images.
///
/// # Type Parameters
/// * `T` - The transform type
/// * `I` - The interpolator type
pub struct ResampleImageFilter<T, I>
where
    T: Transform<3>,
    I: Interpolator,
{
    grid: ImageGrid,
    transform: T,
    interpolator: I,
    default_pixel_value: f64,
    parallel: bool,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl<T, I> ResampleImageFilter<T, I>
where
    T: Transform<3>,
    I: Interpolator,
{
    /// Create a new resample filter.
    ///
    /// # Arguments
    /// * `grid` - Output sampling grid (size, origin, spacing, direction)
    /// * `transform` - Transform from output space to input space
    /// * `interpolator` - Interpolator for input image sampling
    pub fn new(grid: ImageGrid, transform: T, interpolator: I) -> Self {
        Self {
            grid,
            transform,
            interpolator,
            default_pixel_value: 0.0,
            parallel: true,
            progress: None,
        }
    }

    /// Create from a reference image.
    ///
    /// Uses the sampling grid of the reference image.
    pub fn new_from_reference<P: Pixel>(reference: &Image<P>, transform: T, interpolator: I) -> Self {
        Self::new(reference.grid().clone(), transform, interpolator)
    }

    /// Set default pixel value for outside the field of view.
    ///
    /// The value is quantized into the pixel type of the input image.
    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.default_pixel_value = value;
        self
    }

    /// Enable or disable slice-parallel execution (enabled by default).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Output sampling grid.
    pub fn grid(&self) -> &ImageGrid {
        &self.grid
    }

    /// Transform from output space to input space.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Default pixel value for outside the field of view.
    pub fn default_pixel_value(&self) -> f64 {
        self.default_pixel_value
    }

    /// Apply filter to an input image.
    ///
    /// # Errors
    /// Returns [`Error::Cancelled`] when the progress callback asks to stop.
    /// No partial image is returned in that case.
    pub fn apply<P: Pixel>(&self, input: &Image<P>) -> Result<Image<P>> {
        let mut output = Image::from_grid(self.grid.clone());
        if output.is_empty() {
            debug!("Output grid {:?} is empty, nothing to resample", self.grid.size());
            return Ok(output);
        }

        let [nx, ny, nz] = self.grid.size();
        let default = P::from_f64(self.default_pixel_value);
        let tracker = ProgressTracker::start(self.progress.clone(), nz);
        debug!(
            "Resampling {:?} -> {}x{}x{} (parallel: {})",
            input.size(),
            nx,
            ny,
            nz,
            self.parallel
        );

        let run_slice = |(k, slice): (usize, &mut [P])| -> Result<()> {
            if tracker.should_cancel() {
                return Err(Error::Cancelled {
                    completed: tracker.completed(),
                    total: tracker.total(),
                });
            }
            self.fill_slice(input, k, slice, default);
            tracker.slice_done();
            trace!("Slice {} done", k);
            Ok(())
        };

        let slice_len = self.grid.slice_len();
        let result = if self.parallel {
            output
                .samples_mut()
                .par_chunks_mut(slice_len)
                .enumerate()
                .try_for_each(run_slice)
        } else {
            output
                .samples_mut()
                .chunks_mut(slice_len)
                .enumerate()
                .try_for_each(run_slice)
        };

        if let Err(err) = result {
            info!("{}", err);
            return Err(err);
        }

        tracker.complete();
        debug!("Resampled {} voxels", output.len());
        Ok(output)
    }

    /// Fill one output k-slice, `i` varying fastest.
    fn fill_slice<P: Pixel>(&self, input: &Image<P>, k: usize, slice: &mut [P], default: P) {
        let [nx, ny, _] = self.grid.size();
        for j in 0..ny {
            for i in 0..nx {
                let output_point = self.grid.index_to_physical(i, j, k);
                let input_point = self.transform.transform_point(&output_point);
                let index = input.physical_to_index(&input_point);
                slice[j * nx + i] = self
                    .interpolator
                    .interpolate_pixel(input, &index)
                    .unwrap_or(default);
            }
        }
    }
}

impl<T, I> fmt::Debug for ResampleImageFilter<T, I>
where
    T: Transform<3>,
    I: Interpolator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResampleImageFilter")
            .field("grid", &self.grid)
            .field("default_pixel_value", &self.default_pixel_value)
            .field("parallel", &self.parallel)
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

/// Resample `input` onto its own grid with trilinear interpolation and a
/// zero default.
pub fn resample<P, T>(input: &Image<P>, transform: T) -> Result<Image<P>>
where
    P: Pixel,
    T: Transform<3>,
{
    ResampleImageFilter::new_from_reference(
        input,
        transform,
        LinearInterpolator::new(),
    )
    .apply(input)
}
