use gaze_core::{
    is_finite3, CalibrationConstants, FrameKind, FramedPoint, FramedVector, GazeError, GazeResult,
    Pt3, Vec3, Wcs,
};
use gaze_eye::{
    estimate_optic_axis, project_gaze_point, visual_axis, CorneaModel, OpticAxisEstimate,
};
use gaze_optim::cornea_center::{estimate_cornea_center, CorneaCenterEstimate, CorneaCenterProblem};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{GazePoint, GlintPupilFrame, PipelineConfig};

/// Everything computed for one frame, all WCS except `gaze`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeEstimate {
    pub cornea: CorneaCenterEstimate,
    pub optic_axis: OpticAxisEstimate,
    pub visual_axis: Vec3,
    pub gaze: GazePoint,
}

impl GazeEstimate {
    pub fn cornea_center(&self) -> &Pt3 {
        &self.cornea.center
    }
}

/// Validated constants and solver settings, shared across frames.
///
/// Holds no per-frame state, so one estimator can serve many threads.
#[derive(Debug, Clone)]
pub struct GazeEstimator {
    constants: CalibrationConstants,
    model: CorneaModel,
    config: PipelineConfig,
}

impl GazeEstimator {
    /// Fails with `InvalidConfiguration` when the constants are unphysical.
    pub fn new(constants: CalibrationConstants, config: PipelineConfig) -> GazeResult<Self> {
        constants.validate()?;
        if !(config.cornea.max_residual_cm > 0.0) {
            return Err(GazeError::InvalidConfiguration {
                field: "cornea.max_residual_cm",
                reason: format!("must be positive, got {}", config.cornea.max_residual_cm),
            });
        }
        let model = CorneaModel::from_constants(&constants);
        Ok(Self {
            constants,
            model,
            config,
        })
    }

    pub fn constants(&self) -> &CalibrationConstants {
        &self.constants
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn estimate(&self, frame: &GlintPupilFrame) -> GazeResult<GazeEstimate> {
        let constants = &self.constants;
        let camera = constants.camera_position;

        let glint_1: FramedPoint<Wcs> = constants.lift_pixel(&frame.glint_1);
        let glint_2: FramedPoint<Wcs> = constants.lift_pixel(&frame.glint_2);
        let pupil: FramedPoint<Wcs> = constants.lift_pixel(&frame.pupil);
        for p in [&glint_1, &glint_2, &pupil] {
            if !is_finite3(&p.value().coords) {
                return Err(GazeError::GeometricDegeneracy {
                    what: "image measurement",
                });
            }
        }
        let problem = CorneaCenterProblem::new(
            camera,
            [*glint_1.value(), *glint_2.value()],
            [constants.light_1, constants.light_2],
            constants.cornea_radius_cm,
        )?;
        let cornea = estimate_cornea_center(&problem, constants.eye_distance_cm, &self.config.cornea)?;

        let optic_axis = estimate_optic_axis(&camera, pupil.value(), &cornea.center, &self.model)?;

        let g = visual_axis(&optic_axis.axis, constants.alpha_rad, constants.beta_rad)?;

        let gaze = self.project(&cornea.center, &g)?;
        debug!(
            "gaze point {:?} in {:?} (cornea {:?}, visual axis {:?})",
            gaze.position, gaze.frame, cornea.center, g
        );

        Ok(GazeEstimate {
            cornea,
            optic_axis,
            visual_axis: g,
            gaze,
        })
    }

    pub fn estimate_point(&self, frame: &GlintPupilFrame) -> GazeResult<GazePoint> {
        self.estimate(frame).map(|e| e.gaze)
    }

    /// Process frames independently; failures are reported per frame.
    pub fn estimate_batch(&self, frames: &[GlintPupilFrame]) -> Vec<GazeResult<GazeEstimate>> {
        frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let result = self.estimate(frame);
                if let Err(e) = &result {
                    warn!("frame {i} dropped: {e}");
                }
                result
            })
            .collect()
    }

    fn project(&self, cornea_center: &Pt3, visual_axis: &Vec3) -> GazeResult<GazePoint> {
        let plane_z = self.constants.screen_z_cm;
        match self.constants.screen_transform() {
            Some(to_screen) => {
                let c = to_screen.transform_point(&FramedPoint::<Wcs>::new(*cornea_center));
                let g = to_screen.transform_vector(&FramedVector::<Wcs>::new(*visual_axis));
                let position = project_gaze_point(c.value(), g.value(), plane_z)?;
                Ok(GazePoint {
                    position,
                    frame: c.kind(),
                })
            }
            None => Ok(GazePoint {
                position: project_gaze_point(cornea_center, visual_axis, plane_z)?,
                frame: FrameKind::Wcs,
            }),
        }
    }
}

/// Estimate the gaze for one frame.
pub fn estimate_gaze(
    frame: &GlintPupilFrame,
    constants: &CalibrationConstants,
    config: &PipelineConfig,
) -> GazeResult<GazeEstimate> {
    GazeEstimator::new(constants.clone(), *config)?.estimate(frame)
}

/// Same as [`estimate_gaze`], returning only the point of regard.
pub fn estimate_gaze_point(
    frame: &GlintPupilFrame,
    constants: &CalibrationConstants,
    config: &PipelineConfig,
) -> GazeResult<GazePoint> {
    estimate_gaze(frame, constants, config).map(|e| e.gaze)
}

/// Estimate every frame; invalid constants fail every entry.
pub fn estimate_gaze_batch(
    frames: &[GlintPupilFrame],
    constants: &CalibrationConstants,
    config: &PipelineConfig,
) -> Vec<GazeResult<GazeEstimate>> {
    match GazeEstimator::new(constants.clone(), *config) {
        Ok(estimator) => estimator.estimate_batch(frames),
        Err(e) => frames.iter().map(|_| Err(e.clone())).collect(),
    }
}
