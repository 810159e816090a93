//! `voxwarp`: apply a composite affine transform to a 3D image.
//!
//! Reads one image, builds the transform (translate, scale, set center,
//! rotate), resamples the input onto its own grid and writes the result.

mod config;
mod error;
mod progress_bar;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use voxwarp_core::filter::ResampleImageFilter;
use voxwarp_core::interpolation::InterpolationMode;
use voxwarp_core::progress::LoggingProgressCallback;
use voxwarp_core::spatial::Vector3;

use config::{CenterMode, TransformParameters};
use error::{DriverError, Result};
use progress_bar::SliceProgressBar;

#[derive(Parser, Debug)]
#[command(name = "voxwarp", version)]
#[command(about = "Resample a 3D image through a composite affine transform")]
struct Cli {
    /// Input image (.nii or .nii.gz)
    input: PathBuf,

    /// Output image (.nii or .nii.gz)
    output: PathBuf,

    /// Translation x,y,z in physical units
    #[arg(long, value_parser = parse_vector3, default_value = "6,2,4", allow_hyphen_values = true)]
    translation: Vector3,

    /// Scale factors x,y,z (strictly positive)
    #[arg(long, value_parser = parse_vector3, default_value = "0.5,0.75,0.9")]
    scale: Vector3,

    /// How the rotation center is derived from the image
    #[arg(long, value_enum, default_value_t = CenterArg::SizeHalf)]
    center_mode: CenterArg,

    /// Rotation axis x,y,z
    #[arg(long, value_parser = parse_vector3, default_value = "1,0,0", allow_hyphen_values = true)]
    axis: Vector3,

    /// Rotation angle in degrees
    #[arg(long, default_value_t = 60.0, allow_hyphen_values = true)]
    angle: f64,

    /// Pre-compose the rotation instead of post-composing it
    #[arg(long)]
    pre_multiply: bool,

    /// Interpolation method
    #[arg(long, value_enum, default_value_t = InterpolatorArg::Linear)]
    interpolator: InterpolatorArg,

    /// Value written where the transform leaves the input
    #[arg(long, default_value_t = 0)]
    default_value: u8,

    /// Resample with the inverse transform
    #[arg(long)]
    invert: bool,

    /// Number of worker threads (defaults to one per core)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    threads: Option<u16>,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CenterArg {
    /// (Nx/2, Ny/2, Nz/2) taken as a physical point
    SizeHalf,
    /// Physical position of the image center
    Physical,
}

impl From<CenterArg> for CenterMode {
    fn from(arg: CenterArg) -> Self {
        match arg {
            CenterArg::SizeHalf => CenterMode::SizeHalf,
            CenterArg::Physical => CenterMode::Physical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InterpolatorArg {
    /// Trilinear
    Linear,
    /// Nearest neighbor
    Nearest,
}

impl From<InterpolatorArg> for InterpolationMode {
    fn from(arg: InterpolatorArg) -> Self {
        match arg {
            InterpolatorArg::Linear => InterpolationMode::Linear,
            InterpolatorArg::Nearest => InterpolationMode::Nearest,
        }
    }
}

/// Parse `x,y,z` into a vector.
fn parse_vector3(s: &str) -> std::result::Result<Vector3, String> {
    let components = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    let [x, y, z] = components[..] else {
        return Err(format!("expected three comma-separated values, got '{s}'"));
    };
    let vector = Vector3::new([x, y, z]);
    if !vector.is_finite() {
        return Err(format!("components must be finite, got '{s}'"));
    }
    Ok(vector)
}

/// First line of a clap error without its `error: ` prefix.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

impl Cli {
    fn transform_parameters(&self) -> TransformParameters {
        TransformParameters::default()
            .with_translation(self.translation)
            .with_scale(self.scale)
            .with_center_mode(self.center_mode.into())
            .with_rotation(self.axis, self.angle)
            .with_pre_multiply(self.pre_multiply)
    }

    fn log_filter(&self) -> EnvFilter {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            report(DriverError::Argument(clap_message(&err)));
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}

/// Print an error to stderr; argument errors are followed by the usage line.
fn report(err: DriverError) {
    match err {
        DriverError::Argument(message) => {
            let program = std::env::args().next().unwrap_or_else(|| "voxwarp".to_string());
            eprintln!("Error: {message}");
            eprintln!("Using: {program} <InputFileName> <OutputFileName>");
        }
        // `{:#}` prints the whole cause chain on one line.
        err => eprintln!("Error: {:#}", anyhow::Error::from(err)),
    }
}

/// Read, build, resample, write.
fn run(cli: &Cli) -> Result<()> {
    info!("Reading {}", cli.input.display());
    let input = voxwarp_io::read_image(&cli.input).map_err(|source| DriverError::Read {
        path: cli.input.clone(),
        source,
    })?;
    info!(
        "Input size {:?}, spacing {:?}, origin {:?}",
        input.size(),
        input.spacing().components(),
        input.origin().coords()
    );

    let parameters = cli.transform_parameters();
    let mut transform = parameters.build(&input).map_err(DriverError::Transform)?;
    if cli.invert {
        transform = transform.try_inverse().map_err(DriverError::Transform)?;
    }
    debug!("Transform: {:?}", transform);

    let mut filter = ResampleImageFilter::new_from_reference(
        &input,
        transform,
        InterpolationMode::from(cli.interpolator),
    )
    .with_default_pixel_value(f64::from(cli.default_value));

    if cli.progress {
        match SliceProgressBar::new() {
            Ok(bar) => filter = filter.with_progress(Arc::new(bar)),
            Err(e) => warn!("Progress bar unavailable: {}", e),
        }
    } else if cli.verbose > 0 {
        filter = filter.with_progress(Arc::new(LoggingProgressCallback::default()));
    }

    let output = match cli.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(usize::from(threads))
                .build()?;
            pool.install(|| filter.apply(&input))
        }
        None => filter.apply(&input),
    }
    .map_err(DriverError::Resample)?;

    info!("Writing {}", cli.output.display());
    voxwarp_io::write_image(&cli.output, &output).map_err(|source| DriverError::Write {
        path: cli.output.clone(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector3() {
        assert_eq!(parse_vector3("6,2,4").unwrap(), Vector3::new([6.0, 2.0, 4.0]));
        assert_eq!(parse_vector3(" -1.5, 0 ,2e1").unwrap(), Vector3::new([-1.5, 0.0, 20.0]));
        assert!(parse_vector3("1,2").is_err());
        assert!(parse_vector3("1,2,3,4").is_err());
        assert!(parse_vector3("1,x,3").is_err());
        assert!(parse_vector3("1,inf,3").is_err());
    }

    #[test]
    fn test_cli_defaults_match_parameters() {
        let cli = Cli::try_parse_from(["voxwarp", "in.nii", "out.nii"]).unwrap();
        assert_eq!(cli.transform_parameters(), TransformParameters::default());
        assert_eq!(cli.interpolator, InterpolatorArg::Linear);
        assert_eq!(cli.default_value, 0);
        assert!(!cli.invert);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "voxwarp",
            "in.nii",
            "out.nii.gz",
            "--translation",
            "-1,0,0",
            "--axis",
            "0,0,1",
            "--angle",
            "-90",
            "--center-mode",
            "physical",
            "--interpolator",
            "nearest",
            "--threads",
            "2",
            "-vv",
        ])
        .unwrap();
        let params = cli.transform_parameters();
        assert_eq!(params.translation, Vector3::new([-1.0, 0.0, 0.0]));
        assert_eq!(params.axis, Vector3::z_axis());
        assert_eq!(params.angle_degrees, -90.0);
        assert_eq!(params.center_mode, CenterMode::Physical);
        assert_eq!(cli.interpolator, InterpolatorArg::Nearest);
        assert_eq!(cli.threads, Some(2));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_clap_message_is_one_line() {
        let err = Cli::try_parse_from(["voxwarp"]).unwrap_err();
        let message = clap_message(&err);
        assert!(!message.contains('\n'));
        assert!(!message.starts_with("error:"));
        assert!(message.contains("required"));
    }

    #[test]
    fn test_cli_requires_two_paths() {
        assert!(Cli::try_parse_from(["voxwarp"]).is_err());
        assert!(Cli::try_parse_from(["voxwarp", "in.nii"]).is_err());
        assert!(Cli::try_parse_from(["voxwarp", "a.nii", "b.nii", "c.nii"]).is_err());
        assert!(Cli::try_parse_from(["voxwarp", "a.nii", "b.nii", "--threads", "0"]).is_err());
    }
}
