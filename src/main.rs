//! barrelfit CLI — convert radial (k1, k2) distortion into barrel (a, b, c, d) coefficients.

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use barrelfit::{
    compare_models, fit_barrel_distortion, BarrelFitResult, CompareConfig, CompareReport,
    RadialDistortion, SensorGeometry,
};

#[derive(Parser)]
#[command(name = "barrelfit")]
#[command(about = "Fit ImageMagick barrel (a, b, c, d) coefficients to a Brown-Conrady (k1, k2) lens model")]
#[command(version)]
struct Cli {
    /// Image width in pixels.
    #[arg(long, default_value = "2560")]
    width: u32,

    /// Image height in pixels.
    #[arg(long, default_value = "1920")]
    height: u32,

    /// Focal length in pixels.
    #[arg(long)]
    focal_px: f64,

    /// First radial coefficient.
    #[arg(long, allow_negative_numbers = true, default_value = "0.0")]
    k1: f64,

    /// Second radial coefficient.
    #[arg(long, allow_negative_numbers = true, default_value = "0.0")]
    k2: f64,

    /// Compare both remaps over a test grid and report the disagreement.
    #[arg(long)]
    compare: bool,

    /// Number of grid cells across the image width for --compare.
    #[arg(long, default_value = "32")]
    grid_divisions: u32,

    /// Print a single JSON object instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    sensor: &'a SensorGeometry,
    radial: &'a RadialDistortion,
    fit: &'a BarrelFitResult,
    warper_argument: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    compare: Option<CompareReport>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    anyhow::ensure!(
        cli.width > 0 && cli.height > 0,
        "image size must be positive, got {}x{}",
        cli.width,
        cli.height
    );
    anyhow::ensure!(
        cli.focal_px.is_finite() && cli.focal_px > 0.0,
        "focal length must be a positive number of pixels, got {}",
        cli.focal_px
    );

    let sensor = SensorGeometry::new(cli.width, cli.height);
    let radial = RadialDistortion::new(cli.focal_px, cli.k1, cli.k2);

    let fit = fit_barrel_distortion(&sensor, &radial).with_context(|| {
        format!(
            "fitting barrel coefficients for {}x{}, f={} px",
            cli.width, cli.height, cli.focal_px
        )
    })?;

    let compare = cli.compare.then(|| {
        let config = CompareConfig {
            grid_divisions: cli.grid_divisions,
        };
        compare_models(&sensor, &radial, &fit.model, &config)
    });

    if cli.json {
        let out = Output {
            sensor: &sensor,
            radial: &radial,
            fit: &fit,
            warper_argument: fit.model.warper_argument(),
            compare,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Image size: {}x{}, focal_pixels: {:.6}, k1: {:.6}, k2: {:.6}",
        sensor.width, sensor.height, radial.focal_length_px, radial.k1, radial.k2
    );
    println!(
        "Estimated a, b, c, d: {:.6}, {:.6}, {:.6}, {:.6}",
        fit.model.a, fit.model.b, fit.model.c, fit.model.d
    );
    println!("  -distort barrel '{}'", fit.model.warper_argument());

    if let Some(report) = compare {
        println!(
            "Grid comparison ({} nodes, step {} px):",
            report.n_samples, report.grid_step_px
        );
        println!("  max error:  {:.3} px", report.max_error_px);
        println!("  RMS error:  {:.3} px", report.rms_error_px);
        println!(
            "  worst node: ({:.0}, {:.0})",
            report.worst_point_px[0], report.worst_point_px[1]
        );
    }

    Ok(())
}
