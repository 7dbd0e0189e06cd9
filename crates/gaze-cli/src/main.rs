use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use gaze_core::{CalibrationConstants, Pt3, Vec3};
use gaze_pipeline::{GazeEstimator, GazePoint, GlintPupilFrame, PipelineConfig};
use log::info;
use serde::Serialize;

/// Gaze estimation for recorded glint/pupil frames.
#[derive(Debug, Parser)]
#[command(author, version, about = "Remote two-light gaze estimation")]
struct Args {
    /// Path to JSON CalibrationConstants.
    #[arg(long)]
    constants: String,

    /// Path to a JSON array of frames ({ "glint_1", "glint_2", "pupil" } in pixels).
    #[arg(long)]
    frames: String,

    /// Optional path to JSON PipelineConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,

    /// Log per-frame intermediates (overridden by RUST_LOG).
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum FrameReport {
    Estimated {
        index: usize,
        gaze: GazePoint,
        cornea_center: Pt3,
        optic_axis: Vec3,
        visual_axis: Vec3,
    },
    Failed {
        index: usize,
        error: String,
    },
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

fn run_from_files(
    constants_path: &str,
    frames_path: &str,
    config_path: Option<&str>,
) -> Result<String> {
    let constants: CalibrationConstants = load_json_file(Path::new(constants_path))?;
    let frames: Vec<GlintPupilFrame> = load_json_file(Path::new(frames_path))?;
    let config = match config_path {
        Some(path) => load_json_file::<PipelineConfig>(Path::new(path))?,
        None => PipelineConfig::default(),
    };

    let estimator =
        GazeEstimator::new(constants, config).context("invalid calibration constants")?;

    let reports: Vec<FrameReport> = estimator
        .estimate_batch(&frames)
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(est) => FrameReport::Estimated {
                index,
                gaze: est.gaze,
                cornea_center: est.cornea.center,
                optic_axis: est.optic_axis.axis,
                visual_axis: est.visual_axis,
            },
            Err(e) => FrameReport::Failed {
                index,
                error: e.to_string(),
            },
        })
        .collect();

    let failed = reports
        .iter()
        .filter(|r| matches!(r, FrameReport::Failed { .. }))
        .count();
    info!("{} frames, {} failed", reports.len(), failed);

    Ok(serde_json::to_string_pretty(&reports)?)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let json = run_from_files(&args.constants, &args.frames, args.config.as_deref())?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_core::test_utils::{reference_constants, reference_frames};
    use gaze_core::Pt2;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn write_json<T: Serialize>(value: &T, path: &Path) {
        serde_json::to_writer_pretty(fs::File::create(path).unwrap(), value).unwrap();
    }

    fn frames_with_one_bad() -> Vec<GlintPupilFrame> {
        let mut frames: Vec<GlintPupilFrame> = reference_frames()
            .iter()
            .take(2)
            .map(|f| GlintPupilFrame::new(f.glint_1, f.glint_2, f.pupil))
            .collect();
        let mut off_cornea = frames[0];
        off_cornea.pupil = Pt2::new(100.0, 500.0);
        frames.push(off_cornea);
        frames
    }

    #[test]
    fn reports_every_frame_including_failures() {
        let constants_file = NamedTempFile::new().unwrap();
        let frames_file = NamedTempFile::new().unwrap();
        write_json(&reference_constants(), constants_file.path());
        write_json(&frames_with_one_bad(), frames_file.path());

        let json = run_from_files(
            constants_file.path().to_str().unwrap(),
            frames_file.path().to_str().unwrap(),
            None,
        )
        .expect("cli helper should succeed");

        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.len(), 3);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry["index"], i);
        }
        assert_eq!(entries[0]["gaze"]["frame"], "wcs");
        let z = entries[0]["gaze"]["position"][2].as_f64().unwrap();
        assert!((z + 18.0).abs() < 1e-9, "gaze z {z}");
        assert!(entries[1]["visual_axis"].is_array());
        assert!(entries[2]["error"]
            .as_str()
            .unwrap()
            .contains("corneal sphere"));
    }

    #[test]
    fn config_file_is_applied() {
        let constants_file = NamedTempFile::new().unwrap();
        let frames_file = NamedTempFile::new().unwrap();
        let config_file = NamedTempFile::new().unwrap();
        write_json(&reference_constants(), constants_file.path());
        write_json(&frames_with_one_bad(), frames_file.path());
        fs::write(config_file.path(), r#"{ "cornea": { "max_residual_cm": 1e-9 } }"#).unwrap();

        let json = run_from_files(
            constants_file.path().to_str().unwrap(),
            frames_file.path().to_str().unwrap(),
            Some(config_file.path().to_str().unwrap()),
        )
        .unwrap();

        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        let message = entries[0]["error"].as_str().unwrap();
        assert!(message.contains("cornea-center minimization failed"), "{message}");
    }

    #[test]
    fn invalid_constants_fail_the_run() {
        let mut constants = reference_constants();
        constants.pupil_distance_cm = 1.0;
        let constants_file = NamedTempFile::new().unwrap();
        let frames_file = NamedTempFile::new().unwrap();
        write_json(&constants, constants_file.path());
        write_json(&frames_with_one_bad(), frames_file.path());

        let err = run_from_files(
            constants_file.path().to_str().unwrap(),
            frames_file.path().to_str().unwrap(),
            None,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("cornea_radius_cm"));
    }

    #[test]
    fn missing_frames_file_is_an_error() {
        let constants_file = NamedTempFile::new().unwrap();
        write_json(&reference_constants(), constants_file.path());
        assert!(run_from_files(
            constants_file.path().to_str().unwrap(),
            "/nonexistent/frames.json",
            None
        )
        .is_err());
    }
}
