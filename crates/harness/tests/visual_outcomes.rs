//! Visual tester behavior over synthetic images: baseline seeding is an
//! explicit outcome, ratios are measured over the union canvas, and the
//! promotion path heals a mismatch.

use image::{Rgba, RgbaImage};

use tekqa_harness::visual::{VisualConfig, VisualOutcome, VisualTester};

fn tester(root: &std::path::Path) -> VisualTester {
    VisualTester::new(VisualConfig {
        baseline_dir: root.join("baselines"),
        actual_dir: root.join("screenshots"),
        diff_dir: root.join("diffs"),
        ..Default::default()
    })
    .unwrap()
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

fn save(t: &VisualTester, name: &str, img: &RgbaImage) {
    img.save(t.candidate_path(name)).unwrap();
}

#[test]
fn missing_baseline_is_created_and_reported_as_such() {
    let dir = tempfile::tempdir().unwrap();
    let t = tester(dir.path());
    save(&t, "header", &solid(40, 20, [10, 20, 30, 255]));

    match t.check("header", None).unwrap() {
        VisualOutcome::BaselineCreated { baseline_path } => {
            assert!(baseline_path.exists());
        }
        other => panic!("expected BaselineCreated, got {other:?}"),
    }

    // Second run compares against the freshly seeded baseline.
    match t.check("header", None).unwrap() {
        VisualOutcome::Match(diff) => {
            assert_eq!(diff.diff_pixels, 0);
            assert_eq!(diff.diff_ratio, 0.0);
            assert_eq!(diff.candidate_hash, diff.baseline_hash);
        }
        other => panic!("expected Match, got {other:?}"),
    }
}

#[test]
fn small_drift_within_the_ratio_passes() {
    let dir = tempfile::tempdir().unwrap();
    let t = tester(dir.path());

    // 100x100 baseline; candidate differs in a single 10-pixel row segment:
    // 10 / 10_000 = 0.1% < the 2% default.
    save(&t, "region", &solid(100, 100, [200, 200, 200, 255]));
    assert!(matches!(
        t.check("region", None).unwrap(),
        VisualOutcome::BaselineCreated { .. }
    ));

    let mut candidate = solid(100, 100, [200, 200, 200, 255]);
    for x in 0..10 {
        candidate.put_pixel(x, 0, Rgba([0, 0, 0, 255]));
    }
    save(&t, "region", &candidate);

    match t.check("region", None).unwrap() {
        VisualOutcome::Match(diff) => {
            assert_eq!(diff.diff_pixels, 10);
            assert!(diff.diff_ratio < 0.02);
            assert!(diff.diff_image_path.is_some(), "diff image still recorded");
        }
        other => panic!("expected Match, got {other:?}"),
    }
}

#[test]
fn large_drift_is_a_mismatch_with_a_diff_image() {
    let dir = tempfile::tempdir().unwrap();
    let t = tester(dir.path());

    save(&t, "banner", &solid(50, 50, [255, 255, 255, 255]));
    assert!(matches!(
        t.check("banner", None).unwrap(),
        VisualOutcome::BaselineCreated { .. }
    ));

    save(&t, "banner", &solid(50, 50, [0, 0, 0, 255]));
    match t.check("banner", None).unwrap() {
        VisualOutcome::Mismatch(diff) => {
            assert_eq!(diff.diff_pixels, 2_500);
            assert_eq!(diff.diff_ratio, 1.0);
            let diff_path = diff.diff_image_path.expect("diff image written");
            assert!(diff_path.exists());
        }
        other => panic!("expected Mismatch, got {other:?}"),
    }
}

#[test]
fn channel_noise_below_tolerance_is_not_a_diff() {
    let dir = tempfile::tempdir().unwrap();
    let t = tester(dir.path());

    save(&t, "noisy", &solid(10, 10, [100, 100, 100, 255]));
    assert!(matches!(
        t.check("noisy", None).unwrap(),
        VisualOutcome::BaselineCreated { .. }
    ));

    // Shift every channel by less than the per-channel tolerance.
    save(&t, "noisy", &solid(10, 10, [103, 98, 102, 255]));
    match t.check("noisy", None).unwrap() {
        VisualOutcome::Match(diff) => assert_eq!(diff.diff_pixels, 0),
        other => panic!("expected Match, got {other:?}"),
    }
}

#[test]
fn dimension_mismatch_counts_the_non_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let t = tester(dir.path());

    save(&t, "resized", &solid(10, 10, [50, 50, 50, 255]));
    assert!(matches!(
        t.check("resized", None).unwrap(),
        VisualOutcome::BaselineCreated { .. }
    ));

    // Same content, one extra column: 10 of 110 union pixels differ.
    save(&t, "resized", &solid(11, 10, [50, 50, 50, 255]));
    match t.check("resized", Some(0.0)).unwrap() {
        VisualOutcome::Mismatch(diff) => {
            assert_eq!(diff.total_pixels, 110);
            assert_eq!(diff.diff_pixels, 10);
        }
        other => panic!("expected Mismatch, got {other:?}"),
    }
}

#[test]
fn zero_ratio_override_fails_any_pixel_change() {
    let dir = tempfile::tempdir().unwrap();
    let t = tester(dir.path());

    save(&t, "strict", &solid(20, 20, [1, 2, 3, 255]));
    assert!(matches!(
        t.check("strict", None).unwrap(),
        VisualOutcome::BaselineCreated { .. }
    ));

    let mut candidate = solid(20, 20, [1, 2, 3, 255]);
    candidate.put_pixel(5, 5, Rgba([255, 0, 0, 255]));
    save(&t, "strict", &candidate);

    assert!(matches!(
        t.check("strict", Some(0.0)).unwrap(),
        VisualOutcome::Mismatch(_)
    ));
}

#[test]
fn update_baseline_heals_a_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let t = tester(dir.path());

    save(&t, "promoted", &solid(30, 30, [0, 128, 0, 255]));
    assert!(matches!(
        t.check("promoted", None).unwrap(),
        VisualOutcome::BaselineCreated { .. }
    ));

    save(&t, "promoted", &solid(30, 30, [128, 0, 0, 255]));
    assert!(matches!(
        t.check("promoted", None).unwrap(),
        VisualOutcome::Mismatch(_)
    ));

    t.update_baseline("promoted").unwrap();
    assert!(matches!(
        t.check("promoted", None).unwrap(),
        VisualOutcome::Match(_)
    ));
    assert_eq!(t.list_baselines().unwrap(), vec!["promoted".to_string()]);
}
