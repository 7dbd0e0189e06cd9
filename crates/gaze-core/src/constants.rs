//! Tracker geometry and subject eye parameters.
//!
//! [`CalibrationConstants`] is built once per tracker/subject calibration and
//! only read during per-frame processing. Deserialized or hand-built records
//! must pass [`CalibrationConstants::validate`] before use.

use serde::{Deserialize, Serialize};

use crate::{
    transform_rigid, CameraIntrinsics, EulerAnglesDeg, Framed, FramedPoint, GazeError, GazeResult,
    Pt2, Pt3, Real, RigidTransform, Scs, Vec3, Wcs,
};

fn default_camera_position() -> Pt3 {
    Pt3::origin()
}

fn default_n2() -> Real {
    1.0
}

/// Immutable per-calibration constants.
///
/// Lengths are centimeters, angles between the visual and optic axes are
/// radians, camera-to-screen angles are degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConstants {
    /// First light source in WCS (its glint is `glint_1`).
    pub light_1: Pt3,
    /// Second light source in WCS (its glint is `glint_2`).
    pub light_2: Pt3,
    /// Camera nodal point in WCS.
    #[serde(default = "default_camera_position")]
    pub camera_position: Pt3,
    pub camera: CameraIntrinsics,
    /// Radius of corneal curvature `R`.
    pub cornea_radius_cm: Real,
    /// Distance `K` between the pupil center and the center of corneal curvature.
    pub pupil_distance_cm: Real,
    /// Effective refractive index of cornea and aqueous humor.
    pub n1: Real,
    /// Refractive index of air.
    #[serde(default = "default_n2")]
    pub n2: Real,
    /// Horizontal visual/optic axis offset.
    pub alpha_rad: Real,
    /// Vertical visual/optic axis offset.
    pub beta_rad: Real,
    /// Screen plane `z = screen_z_cm` (in SCS when `camera_to_screen` is set).
    pub screen_z_cm: Real,
    /// Approximate camera-to-eye distance, seeds the cornea-center search.
    pub eye_distance_cm: Real,
    /// Rotation from WCS into SCS for a camera tilted against the screen.
    #[serde(default)]
    pub camera_to_screen: Option<EulerAnglesDeg>,
}

impl CalibrationConstants {
    /// Parse and validate constants from JSON.
    pub fn from_json_str(json: &str) -> GazeResult<Self> {
        let constants: Self =
            serde_json::from_str(json).map_err(|e| GazeError::config("json", e.to_string()))?;
        constants.validate()?;
        Ok(constants)
    }

    /// Check the physical invariants the pipeline relies on.
    pub fn validate(&self) -> GazeResult<()> {
        self.camera.validate()?;

        for (field, p) in [
            ("light_1", &self.light_1),
            ("light_2", &self.light_2),
            ("camera_position", &self.camera_position),
        ] {
            if !p.coords.iter().all(|c| c.is_finite()) {
                return Err(GazeError::config(field, "coordinates must be finite"));
            }
        }
        for (field, light) in [("light_1", &self.light_1), ("light_2", &self.light_2)] {
            if light == &self.camera_position {
                return Err(GazeError::config(
                    field,
                    "light coincides with the camera nodal point",
                ));
            }
        }

        let r = self.cornea_radius_cm;
        let k = self.pupil_distance_cm;
        if !(k > 0.0 && k.is_finite()) {
            return Err(GazeError::config(
                "pupil_distance_cm",
                format!("must be positive, got {k}"),
            ));
        }
        if !(r > k && r.is_finite()) {
            return Err(GazeError::config(
                "cornea_radius_cm",
                format!("must exceed pupil_distance_cm ({k}), got {r}"),
            ));
        }
        for (field, n) in [("n1", self.n1), ("n2", self.n2)] {
            if !(n > 0.0 && n.is_finite()) {
                return Err(GazeError::config(field, format!("must be positive, got {n}")));
            }
        }
        for (field, v) in [
            ("alpha_rad", self.alpha_rad),
            ("beta_rad", self.beta_rad),
            ("screen_z_cm", self.screen_z_cm),
        ] {
            if !v.is_finite() {
                return Err(GazeError::config(field, "must be finite"));
            }
        }
        if !(self.eye_distance_cm > 0.0 && self.eye_distance_cm.is_finite()) {
            return Err(GazeError::config(
                "eye_distance_cm",
                format!("must be positive, got {}", self.eye_distance_cm),
            ));
        }
        if let Some(angles) = &self.camera_to_screen {
            if !angles.is_finite() {
                return Err(GazeError::config("camera_to_screen", "angles must be finite"));
            }
        }
        Ok(())
    }

    /// Lift an image point into WCS: image plane in camera space, then
    /// shifted by the camera nodal point.
    pub fn lift_pixel(&self, px: &Pt2) -> FramedPoint<Wcs> {
        let on_plane = self.camera.image_to_camera(px);
        Framed::new(transform_rigid(
            &on_plane,
            0.0,
            0.0,
            0.0,
            &self.camera_position.coords,
        ))
    }

    /// Rotation-only transform from WCS into SCS, if the camera is tilted.
    pub fn screen_transform(&self) -> Option<RigidTransform<Wcs, Scs>> {
        self.camera_to_screen
            .as_ref()
            .map(|angles| RigidTransform::from_euler_deg(angles, Vec3::zeros()))
    }
}
