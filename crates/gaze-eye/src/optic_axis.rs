//! Optic axis from the pupil image and the cornea center.
//!
//! The camera sees the pupil through the cornea. The ray from the camera
//! through the pupil image enters the corneal sphere at the refraction point
//! `r`, bends according to Snell's law and continues inside the eye until it
//! reaches the pupil center `p`, located `K` from the cornea center `c`.
//! The optic axis is the unit vector from `c` towards `p`.

use gaze_core::{
    normalize_labeled, CalibrationConstants, GazeError, GazeResult, Pt3, Real, Surface, Vec3,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Optical parameters of the subject's cornea.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorneaModel {
    /// Radius of corneal curvature `R` (cm).
    pub radius_cm: Real,
    /// Distance `K` from the cornea center to the pupil center (cm).
    pub pupil_distance_cm: Real,
    /// Refractive index inside the cornea.
    pub n1: Real,
    /// Refractive index outside the cornea.
    pub n2: Real,
}

impl CorneaModel {
    pub fn from_constants(constants: &CalibrationConstants) -> Self {
        Self {
            radius_cm: constants.cornea_radius_cm,
            pupil_distance_cm: constants.pupil_distance_cm,
            n1: constants.n1,
            n2: constants.n2,
        }
    }

    /// Requires `0 < K < R` and positive refractive indices.
    pub fn validate(&self) -> GazeResult<()> {
        check_pupil_distance(self.radius_cm, self.pupil_distance_cm)?;
        for (field, n) in [("n1", self.n1), ("n2", self.n2)] {
            if !(n > 0.0 && n.is_finite()) {
                return Err(GazeError::InvalidConfiguration {
                    field,
                    reason: format!("must be positive, got {n}"),
                });
            }
        }
        Ok(())
    }
}

fn check_pupil_distance(radius: Real, pupil_distance: Real) -> GazeResult<()> {
    if !(pupil_distance > 0.0 && pupil_distance < radius) {
        return Err(GazeError::InvalidConfiguration {
            field: "pupil_distance_cm",
            reason: format!("must lie in (0, {radius}), got {pupil_distance}"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticAxisEstimate {
    /// Point `r` where the pupil ray crosses the corneal surface.
    pub refraction_point: Pt3,
    /// Unit direction `iota` of the ray inside the cornea.
    pub incident_dir: Vec3,
    /// Pupil center `p`.
    pub pupil_center: Pt3,
    /// Unit optic axis `omega = normalize(p - c)`.
    pub axis: Vec3,
}

/// Intersect the ray `o + k * (o - v)` with the corneal sphere.
///
/// `v` is the pupil image lifted into WCS. The root nearer to the camera is
/// taken, which is the camera-facing side of the cornea.
pub fn refraction_point(
    camera: &Pt3,
    pupil_image: &Pt3,
    cornea_center: &Pt3,
    radius: Real,
) -> GazeResult<Pt3> {
    let w = camera - pupil_image;
    let a = w.norm_squared();
    if a == 0.0 || !a.is_finite() {
        return Err(GazeError::GeometricDegeneracy {
            what: "camera to pupil image",
        });
    }
    let oc = camera - cornea_center;
    let b = w.dot(&oc);
    let k0 = oc.norm_squared() - radius * radius;

    let disc = b * b - a * k0;
    if disc < 0.0 {
        return Err(GazeError::NoIntersection {
            surface: Surface::Cornea,
        });
    }
    let kr = (-b - disc.sqrt()) / a;
    Ok(camera + w * kr)
}

/// Snell's law at the corneal surface, solved for the ray inside the eye.
///
/// `eta` is the outward unit normal at the refraction point, `zeta` the unit
/// vector from the refraction point towards the camera. Returns the unit
/// direction `iota` of the incident ray inside the cornea (index `n1`).
pub fn refract_into_cornea(eta: &Vec3, zeta: &Vec3, n1: Real, n2: Real) -> GazeResult<Vec3> {
    let ez = eta.dot(zeta);
    let ratio = n1 / n2;
    let radicand = ratio * ratio - 1.0 + ez * ez;
    if radicand < 0.0 || !radicand.is_finite() {
        return Err(GazeError::RefractionDomain { radicand });
    }
    let a = ez - radicand.sqrt();
    Ok((eta * a - zeta) * (n2 / n1))
}

/// Walk from the refraction point along `iota` until the distance to the
/// cornea center equals `K`.
///
/// The pupil lies inside the cornea, so `K < R` is required.
pub fn pupil_center(
    refraction_point: &Pt3,
    incident_dir: &Vec3,
    cornea_center: &Pt3,
    radius: Real,
    pupil_distance: Real,
) -> GazeResult<Pt3> {
    check_pupil_distance(radius, pupil_distance)?;
    let rc = refraction_point - cornea_center;
    let rci = rc.dot(incident_dir);
    let radicand = rci * rci - (radius * radius - pupil_distance * pupil_distance);
    if radicand < 0.0 {
        return Err(GazeError::NoIntersection {
            surface: Surface::Pupil,
        });
    }
    let kp = -rci - radicand.sqrt();
    Ok(refraction_point + incident_dir * kp)
}

/// Reconstruct the optic axis for one frame.
pub fn estimate_optic_axis(
    camera: &Pt3,
    pupil_image: &Pt3,
    cornea_center: &Pt3,
    model: &CorneaModel,
) -> GazeResult<OpticAxisEstimate> {
    model.validate()?;
    let r = refraction_point(camera, pupil_image, cornea_center, model.radius_cm)?;
    let eta = (r - cornea_center) / model.radius_cm;
    let zeta = normalize_labeled(&(camera - r), "refraction point to camera")?;
    let iota = refract_into_cornea(&eta, &zeta, model.n1, model.n2)?;
    let p = pupil_center(
        &r,
        &iota,
        cornea_center,
        model.radius_cm,
        model.pupil_distance_cm,
    )?;
    let axis = normalize_labeled(&(p - cornea_center), "optic axis")?;

    debug!("optic axis {:?} (pupil center {:?})", axis, p);

    Ok(OpticAxisEstimate {
        refraction_point: r,
        incident_dir: iota,
        pupil_center: p,
        axis,
    })
}
