use gaze_core::test_utils::{reference_constants, reference_frames};
use gaze_core::{is_unit, EulerAnglesDeg, FrameKind, Pt2, Pt3};
use gaze_pipeline::{
    estimate_gaze, estimate_gaze_batch, estimate_gaze_point, GazeEstimator, GlintPupilFrame,
    PipelineConfig,
};

struct Expected {
    frame: GlintPupilFrame,
    cornea_center: Pt3,
    gaze_wcs: Pt3,
    gaze_scs: Pt3,
}

fn px(x: f64, y: f64) -> Pt2 {
    Pt2::new(x, y)
}

fn fixtures() -> Vec<Expected> {
    vec![
        Expected {
            frame: GlintPupilFrame::new(px(332.0, 164.0), px(313.0, 165.0), px(323.0, 163.0)),
            cornea_center: Pt3::new(1.452_757_765, 2.544_064_465, 46.938_460_675),
            gaze_wcs: Pt3::new(-7.228_510_444, 4.553_190_625, -18.0),
            gaze_scs: Pt3::new(-7.338_181_583, 7.153_303_347, -18.0),
        },
        Expected {
            frame: GlintPupilFrame::new(px(324.5, 164.4), px(305.6, 164.0), px(305.3, 159.5)),
            cornea_center: Pt3::new(1.598_074_566, 2.558_733_402, 47.104_812_568),
            gaze_wcs: Pt3::new(20.044_983_589, 13.386_622_595, -18.0),
            gaze_scs: Pt3::new(20.642_133_252, 16.401_872_712, -18.0),
        },
        Expected {
            frame: GlintPupilFrame::new(
                px(317.2, 174.933),
                px(298.933, 174.933),
                px(302.967, 186.1),
            ),
            cornea_center: Pt3::new(1.761_717_240, 2.400_294_170, 47.980_166_026),
            gaze_wcs: Pt3::new(8.649_072_061, -31.931_109_568, -18.0),
            gaze_scs: Pt3::new(8.229_758_989, -27.604_488_491, -18.0),
        },
    ]
}

#[test]
fn gaze_points_in_camera_frame() {
    let constants = reference_constants();
    let config = PipelineConfig::default();

    for (i, expected) in fixtures().iter().enumerate() {
        let est = estimate_gaze(&expected.frame, &constants, &config)
            .unwrap_or_else(|e| panic!("fixture {i}: {e}"));

        assert!(
            (est.cornea.center - expected.cornea_center).norm() < 1e-5,
            "fixture {i}: cornea center {} != {}",
            est.cornea.center,
            expected.cornea_center
        );
        assert!(is_unit(&est.optic_axis.axis), "fixture {i}");
        assert!(is_unit(&est.visual_axis), "fixture {i}");
        assert_eq!(est.gaze.frame, FrameKind::Wcs);
        assert!(
            (est.gaze.position - expected.gaze_wcs).norm() < 1e-3,
            "fixture {i}: gaze {} != {}",
            est.gaze.position,
            expected.gaze_wcs
        );
    }
}

#[test]
fn gaze_points_in_screen_frame_for_tilted_camera() {
    let mut constants = reference_constants();
    constants.camera_to_screen = Some(EulerAnglesDeg::new(8.0, 0.0, 0.0));
    let config = PipelineConfig::default();

    for (i, expected) in fixtures().iter().enumerate() {
        let p = estimate_gaze_point(&expected.frame, &constants, &config).unwrap();
        assert_eq!(p.frame, FrameKind::Scs);
        assert!(
            (p.position - expected.gaze_scs).norm() < 1e-3,
            "fixture {i}: gaze {} != {}",
            p.position,
            expected.gaze_scs
        );
    }
}

#[test]
fn zero_offsets_aim_the_visual_axis_along_the_optic_axis() {
    let mut constants = reference_constants();
    constants.alpha_rad = 0.0;
    constants.beta_rad = 0.0;
    let estimator = GazeEstimator::new(constants, PipelineConfig::default()).unwrap();

    for expected in fixtures() {
        let est = estimator.estimate(&expected.frame).unwrap();
        assert!((est.visual_axis - est.optic_axis.axis).norm() < 1e-12);
    }
}

#[test]
fn all_recorded_frames_land_near_the_screen_grid() {
    let frames: Vec<GlintPupilFrame> = reference_frames()
        .iter()
        .map(|f| GlintPupilFrame::new(f.glint_1, f.glint_2, f.pupil))
        .collect();

    let results = estimate_gaze_batch(&frames, &reference_constants(), &PipelineConfig::default());
    assert_eq!(results.len(), frames.len());
    for (i, r) in results.iter().enumerate() {
        let est = r.as_ref().unwrap_or_else(|e| panic!("frame {i}: {e}"));
        let p = est.gaze.position;
        assert!((p.z + 18.0).abs() < 1e-9, "frame {i}: {p}");
        assert!(p.x.abs() < 40.0 && p.y.abs() < 40.0, "frame {i}: {p}");
    }
}
