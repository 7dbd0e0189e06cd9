//! Shared reference data for tests across the workspace.
//!
//! This module is public so that integration tests in other crates can use
//! the same fixtures, but it is not intended for production use.

use crate::{CalibrationConstants, CameraIntrinsics, Pt2, Pt3};

/// Reference remote tracker: lights 23 cm either side of the camera,
/// 1.2 cm focal length, 4.8 µm pixels, typical adult eye parameters.
pub fn reference_constants() -> CalibrationConstants {
    CalibrationConstants {
        light_1: Pt3::new(-23.0, 0.0, 0.0),
        light_2: Pt3::new(23.0, 0.0, 0.0),
        camera_position: Pt3::origin(),
        camera: CameraIntrinsics::new(1.2, [0.00048, 0.00048], [400.0, 300.0]),
        cornea_radius_cm: 0.78,
        pupil_distance_cm: 0.42,
        n1: 1.3375,
        n2: 1.0,
        alpha_rad: (-5.0_f64).to_radians(),
        beta_rad: 1.5_f64.to_radians(),
        screen_z_cm: -18.0,
        eye_distance_cm: 52.0,
        camera_to_screen: None,
    }
}

/// A recorded frame: glint of light 1, glint of light 2, pupil center (pixels).
#[derive(Debug, Clone, Copy)]
pub struct ReferenceFrame {
    pub glint_1: Pt2,
    pub glint_2: Pt2,
    pub pupil: Pt2,
}

/// Frames recorded while the subject fixated a 3x3 grid on the screen.
pub fn reference_frames() -> Vec<ReferenceFrame> {
    [
        [(332.0, 164.0), (313.0, 165.0), (323.0, 163.0)],
        [(333.0, 164.0), (314.0, 165.0), (324.0, 163.0)],
        [(324.5, 164.4), (305.6, 164.0), (305.3, 159.5)],
        [(327.45, 168.75), (309.05, 169.2), (322.9, 173.3)],
        [(322.711, 168.816), (304.579, 169.211), (310.421, 171.658)],
        [(317.78, 168.707), (299.561, 169.122), (300.463, 173.024)],
        [(330.5, 175.5), (311.0, 176.0), (320.0, 185.5)],
        [(321.722, 174.583), (303.389, 174.722), (310.278, 185.556)],
        [(317.2, 174.933), (298.933, 174.933), (302.967, 186.1)],
    ]
    .iter()
    .map(|[g1, g2, p]| ReferenceFrame {
        glint_1: Pt2::new(g1.0, g1.1),
        glint_2: Pt2::new(g2.0, g2.1),
        pupil: Pt2::new(p.0, p.1),
    })
    .collect()
}
