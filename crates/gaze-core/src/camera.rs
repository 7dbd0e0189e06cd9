//! Pinhole lifting between the image (ICS) and camera space.
//!
//! The image plane sits behind the nodal point at `z = -f`. A pixel `(u, v)`
//! lifts to
//!
//! ```text
//! x = (u - cx) * sx
//! y = s * (v - cy) * sy      (s = +1 for `Direct`, -1 for `FlipY`)
//! z = -f
//! ```
//!
//! and a camera-space point `P` projects back through the nodal point onto
//! that plane (`P * (-f / P.z)`) before the inverse pixel mapping.

use serde::{Deserialize, Serialize};

use crate::{GazeError, GazeResult, Pt2, Pt3, Real};

/// Orientation of the image y axis relative to camera y.
///
/// `Direct` maps image rows (y down) onto camera y without a sign change.
/// Whether that matches the tracker's handedness is a calibration choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAxes {
    #[default]
    Direct,
    FlipY,
}

impl ImageAxes {
    fn y_sign(self) -> Real {
        match self {
            ImageAxes::Direct => 1.0,
            ImageAxes::FlipY => -1.0,
        }
    }
}

/// Camera intrinsics expressed in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Distance from the nodal point to the image plane (cm).
    pub focal_length_cm: Real,
    /// Physical pixel size `[x, y]` (cm per pixel).
    pub pixel_size_cm: [Real; 2],
    /// Principal point `[x, y]` (pixels).
    pub principal_point_px: [Real; 2],
    #[serde(default)]
    pub image_axes: ImageAxes,
}

impl CameraIntrinsics {
    pub fn new(
        focal_length_cm: Real,
        pixel_size_cm: [Real; 2],
        principal_point_px: [Real; 2],
    ) -> Self {
        Self {
            focal_length_cm,
            pixel_size_cm,
            principal_point_px,
            image_axes: ImageAxes::Direct,
        }
    }

    pub fn with_image_axes(mut self, image_axes: ImageAxes) -> Self {
        self.image_axes = image_axes;
        self
    }

    /// Lift a pixel onto the image plane in camera space.
    pub fn image_to_camera(&self, px: &Pt2) -> Pt3 {
        let mut p = project_image_to_camera(
            px.x,
            px.y,
            self.focal_length_cm,
            self.pixel_size_cm[0],
            self.pixel_size_cm[1],
            self.principal_point_px[0],
            self.principal_point_px[1],
        );
        p.y *= self.image_axes.y_sign();
        p
    }

    /// Point at `depth` (> 0, towards the subject) seen at pixel `px`.
    ///
    /// Uses the front-facing pinhole model (virtual image plane at `z = +f`),
    /// so image offsets keep their sign: `x = (u - cx) * sx * depth / f`.
    /// [`Self::camera_at_depth_to_image`] is its inverse.
    pub fn image_to_camera_at_depth(&self, px: &Pt2, depth: Real) -> GazeResult<Pt3> {
        if !(depth > 0.0 && depth.is_finite()) {
            return Err(GazeError::config(
                "depth",
                format!("must be positive, got {depth}"),
            ));
        }
        let on_plane = self.image_to_camera(px);
        let scale = depth / self.focal_length_cm;
        Ok(Pt3::new(on_plane.x * scale, on_plane.y * scale, depth))
    }

    /// Front-facing pinhole projection of a camera-space point to pixels.
    pub fn camera_at_depth_to_image(&self, p: &Pt3) -> GazeResult<Pt2> {
        if p.z == 0.0 || !p.z.is_finite() {
            return Err(GazeError::GeometricDegeneracy {
                what: "point on the camera plane",
            });
        }
        let scale = self.focal_length_cm / p.z;
        let [sx, sy] = self.pixel_size_cm;
        let [cx, cy] = self.principal_point_px;
        Ok(Pt2::new(
            cx + p.x * scale / sx,
            cy + self.image_axes.y_sign() * p.y * scale / sy,
        ))
    }

    /// Project a camera-space point through the nodal point back to pixels.
    ///
    /// Inverse of [`Self::image_to_camera`] for any point on the lifted ray.
    /// The image plane sits behind the nodal point here, so a point in front
    /// of the camera lands mirrored: `(12, 6, 12)` maps to `(150, 175)` for a
    /// 400x300 principal point, not to `(650, 425)` as
    /// [`Self::camera_at_depth_to_image`] gives.
    pub fn camera_to_image(&self, p: &Pt3) -> GazeResult<Pt2> {
        if p.z == 0.0 || !p.z.is_finite() {
            return Err(GazeError::GeometricDegeneracy {
                what: "point on the camera plane",
            });
        }
        let scale = -self.focal_length_cm / p.z;
        let [sx, sy] = self.pixel_size_cm;
        let [cx, cy] = self.principal_point_px;
        Ok(Pt2::new(
            cx + p.x * scale / sx,
            cy + self.image_axes.y_sign() * p.y * scale / sy,
        ))
    }

    pub fn validate(&self) -> GazeResult<()> {
        if !(self.focal_length_cm > 0.0 && self.focal_length_cm.is_finite()) {
            return Err(GazeError::config(
                "camera.focal_length_cm",
                format!("must be positive, got {}", self.focal_length_cm),
            ));
        }
        if !self.pixel_size_cm.iter().all(|s| *s > 0.0 && s.is_finite()) {
            return Err(GazeError::config(
                "camera.pixel_size_cm",
                format!("must be positive, got {:?}", self.pixel_size_cm),
            ));
        }
        if !self.principal_point_px.iter().all(|c| c.is_finite()) {
            return Err(GazeError::config("camera.principal_point_px", "must be finite"));
        }
        Ok(())
    }
}

/// Lift pixel `(px, py)` to camera space on the image plane `z = -focal_length`.
pub fn project_image_to_camera(
    px: Real,
    py: Real,
    focal_length: Real,
    pixel_size_x: Real,
    pixel_size_y: Real,
    principal_x: Real,
    principal_y: Real,
) -> Pt3 {
    Pt3::new(
        (px - principal_x) * pixel_size_x,
        (py - principal_y) * pixel_size_y,
        -focal_length,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intrinsics() -> CameraIntrinsics {
        CameraIntrinsics::new(1.2, [0.0048, 0.0048], [400.0, 300.0])
    }

    #[test]
    fn principal_point_lifts_to_optical_axis() {
        for size in [0.00048, 0.0048, 0.01] {
            let k = CameraIntrinsics::new(1.2, [size, size * 2.0], [400.0, 300.0]);
            let p = k.image_to_camera(&Pt2::new(400.0, 300.0));
            assert_eq!(p, Pt3::new(0.0, 0.0, -1.2));
        }
    }

    #[test]
    fn offset_pixel_scales_by_pixel_size() {
        let p = intrinsics().image_to_camera(&Pt2::new(650.0, 300.0));
        assert!((p.x - 1.2).abs() < 1e-12, "x = {}", p.x);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn lift_matches_reference_pupil() {
        let p = intrinsics().image_to_camera(&Pt2::new(340.0, 193.0));
        assert!((p - Pt3::new(-0.288, -0.5136, -1.2)).norm() < 1e-12, "got {p}");
    }

    #[test]
    fn flip_y_negates_camera_y() {
        let k = intrinsics().with_image_axes(ImageAxes::FlipY);
        let p = k.image_to_camera(&Pt2::new(340.0, 193.0));
        assert!((p - Pt3::new(-0.288, 0.5136, -1.2)).norm() < 1e-12, "got {p}");
    }

    #[test]
    fn image_camera_roundtrip() {
        for axes in [ImageAxes::Direct, ImageAxes::FlipY] {
            let k = CameraIntrinsics::new(1.2, [0.00048, 0.0005], [400.0, 300.0])
                .with_image_axes(axes);
            for (u, v) in [(0.5, 0.5), (123.25, 77.0), (400.0, 300.0), (799.0, 599.5)] {
                let px = Pt2::new(u, v);
                let back = k.camera_to_image(&k.image_to_camera(&px)).unwrap();
                assert!((back - px).norm() < 1e-9, "{axes:?}: {px} -> {back}");
            }
        }
    }

    const DEPTH_CASES: [((Real, Real), (Real, Real, Real)); 7] = [
        ((400.0, 300.0), (0.0, 0.0, 12.0)),
        ((400.0, 425.0), (0.0, 6.0, 12.0)),
        ((650.0, 425.0), (12.0, 6.0, 12.0)),
        ((150.0, 425.0), (-12.0, 6.0, 12.0)),
        ((150.0, 175.0), (-12.0, -6.0, 12.0)),
        ((0.0, 0.0), (-19.2, -14.4, 12.0)),
        ((800.0, 600.0), (19.2, 14.4, 12.0)),
    ];

    #[test]
    fn pixels_lift_to_points_at_depth() {
        let k = intrinsics();
        for ((u, v), (x, y, z)) in DEPTH_CASES {
            let p = k.image_to_camera_at_depth(&Pt2::new(u, v), 12.0).unwrap();
            let expected = Pt3::new(x, y, z);
            assert!((p - expected).norm() < 1e-9, "({u}, {v}): {p} != {expected}");
        }
    }

    #[test]
    fn points_at_depth_project_to_pixels() {
        let k = intrinsics();
        for ((u, v), (x, y, z)) in DEPTH_CASES {
            let px = k.camera_at_depth_to_image(&Pt3::new(x, y, z)).unwrap();
            let expected = Pt2::new(u, v);
            assert!((px - expected).norm() < 1e-9, "({x}, {y}, {z}): {px} != {expected}");
        }
    }

    #[test]
    fn rear_plane_projection_mirrors_points_in_front() {
        let px = intrinsics()
            .camera_to_image(&Pt3::new(12.0, 6.0, 12.0))
            .unwrap();
        assert!((px - Pt2::new(150.0, 175.0)).norm() < 1e-9, "{px}");
    }

    #[test]
    fn non_positive_depth_is_rejected() {
        assert!(intrinsics()
            .image_to_camera_at_depth(&Pt2::new(1.0, 2.0), 0.0)
            .is_err());
    }

    #[test]
    fn camera_plane_point_cannot_be_projected() {
        let err = intrinsics()
            .camera_to_image(&Pt3::new(1.0, 1.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, GazeError::GeometricDegeneracy { .. }));
    }

    #[test]
    fn validate_rejects_bad_intrinsics() {
        assert!(intrinsics().validate().is_ok());
        let mut k = intrinsics();
        k.focal_length_cm = 0.0;
        assert!(k.validate().is_err());
        let mut k = intrinsics();
        k.pixel_size_cm = [0.0048, -1.0];
        assert!(k.validate().is_err());
        let mut k = intrinsics();
        k.principal_point_px = [Real::NAN, 0.0];
        assert!(k.validate().is_err());
    }
}
