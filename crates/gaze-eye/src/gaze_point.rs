//! Intersection of the visual axis with the screen plane.

use gaze_core::{GazeError, GazeResult, Pt3, Real, Surface, Vec3};

/// Directions with `|g_z|` below this are treated as parallel to the screen.
pub const PARALLEL_EPS: Real = 1e-9;

/// Point where the ray `c + k * g` (`k >= 0`) meets the plane `z = plane_z`.
pub fn project_gaze_point(cornea_center: &Pt3, gaze_dir: &Vec3, plane_z: Real) -> GazeResult<Pt3> {
    if !(gaze_dir.z.abs() >= PARALLEL_EPS) {
        return Err(GazeError::NoIntersection {
            surface: Surface::Screen,
        });
    }
    let k = (plane_z - cornea_center.z) / gaze_dir.z;
    if k < 0.0 || !k.is_finite() {
        return Err(GazeError::NoIntersection {
            surface: Surface::Screen,
        });
    }
    let mut p = cornea_center + gaze_dir * k;
    p.z = plane_z;
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_gaze_point() {
        let c = Pt3::new(1.560_139_55, 2.504_355_59, 47.783_926_92);
        let g = Vec3::new(-0.296_225, -0.195_216, -0.934_955);
        let p = project_gaze_point(&c, &g, -20.0).unwrap();
        let expected = Pt3::new(-19.916_074_548, -11.648_739_562, -20.0);
        assert!((p - expected).norm() < 1e-8, "{p} != {expected}");
    }

    #[test]
    fn parallel_ray_misses_the_screen() {
        let c = Pt3::new(0.0, 0.0, 50.0);
        let err = project_gaze_point(&c, &Vec3::new(1.0, 0.0, 0.0), -20.0).unwrap_err();
        assert_eq!(
            err,
            GazeError::NoIntersection {
                surface: Surface::Screen
            }
        );
    }

    #[test]
    fn ray_pointing_away_misses_the_screen() {
        let c = Pt3::new(0.0, 0.0, 50.0);
        let err = project_gaze_point(&c, &Vec3::new(0.0, 0.0, 1.0), -20.0).unwrap_err();
        assert!(matches!(err, GazeError::NoIntersection { .. }));
    }

    #[test]
    fn plane_through_the_cornea_center() {
        let c = Pt3::new(1.0, 2.0, 3.0);
        let p = project_gaze_point(&c, &Vec3::new(0.3, 0.1, -0.9), 3.0).unwrap();
        assert_eq!(p, c);
    }
}
