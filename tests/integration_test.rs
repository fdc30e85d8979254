//! Integration tests for the complete metric computation pipeline.

use std::collections::HashMap;

use coco_metric::evaluator::CocoMetric;
use coco_metric::loader::load_results_from_string;
use coco_metric::types::{ImageResults, MatchRecord};

fn create_record(
    matches: Vec<bool>,
    scores: Vec<f64>,
    num_gt: usize,
) -> MatchRecord {
    let num_dt = scores.len();
    MatchRecord {
        dt_matches: vec![matches],
        gt_matches: vec![vec![true; num_gt]],
        dt_scores: scores,
        dt_ignore: vec![vec![false; num_dt]],
        gt_ignore: vec![false; num_gt],
    }
}

fn single_threshold_engine(classes: Vec<&str>, max_detections: Vec<usize>) -> CocoMetric {
    CocoMetric::new(
        classes.into_iter().map(String::from).collect(),
        (0.5, 0.51, 0.05),
        vec![(0.5, 0.5, 0.05)],
        max_detections,
        true,
        false,
    )
    .unwrap()
}

fn image_with(cls: usize, record: MatchRecord) -> ImageResults {
    let mut image = HashMap::new();
    image.insert(cls, record);
    image
}

#[test]
fn test_perfect_two_class_scenario() {
    // class 0: 3 ground truths, 3 detections, all matching at IoU 0.5
    let engine = single_threshold_engine(vec!["vessel", "lesion"], vec![10]);
    let record = create_record(vec![true, true, true], vec![0.9, 0.8, 0.7], 3);
    let results = vec![image_with(0, record)];

    let (summary, curves) = engine.compute(&results).unwrap();
    assert!(curves.is_none());

    let ap = summary.get("vessel_AP_IoU_0.50_MaxDet_10").unwrap();
    assert!((ap.mean - 1.0).abs() < 1e-9);
    assert_eq!(ap.std, 0.0);

    let ar = summary.get("vessel_AR_IoU_0.50_MaxDet_10").unwrap();
    assert!((ar.mean - 1.0).abs() < 1e-12);

    // class 1 never appears: AP averages sentinels, AR reports the sentinel
    let ap_absent = summary.get("lesion_AP_IoU_0.50_MaxDet_10").unwrap();
    assert_eq!(ap_absent.mean, -1.0);
    let ar_absent = summary.get("lesion_AR_IoU_0.50_MaxDet_10").unwrap();
    assert_eq!((ar_absent.mean, ar_absent.std), (-1.0, -1.0));
}

#[test]
fn test_mixed_match_scenario() {
    // detections: match, miss, match against 3 ground truths
    let engine = single_threshold_engine(vec!["vessel"], vec![10]);
    let record = create_record(vec![true, false, true], vec![0.9, 0.8, 0.7], 3);
    let results = vec![image_with(0, record)];

    let (summary, _) = engine.compute(&results).unwrap();

    let ar = summary.get("vessel_AR_IoU_0.50_MaxDet_10").unwrap();
    assert!((ar.mean - 2.0 / 3.0).abs() < 1e-12);

    // precision curve: 1.0 for the 34 thresholds up to recall 1/3, 2/3 for
    // the 33 thresholds up to 2/3, zero-default beyond the achieved recall
    let ap = summary.get("vessel_AP_IoU_0.50_MaxDet_10").unwrap();
    let expected = (34.0 + 33.0 * (2.0 / 3.0)) / 101.0;
    assert!((ap.mean - expected).abs() < 1e-9);
}

#[test]
fn test_multi_image_averaging() {
    let engine = single_threshold_engine(vec!["vessel"], vec![10]);
    let results = vec![
        image_with(0, create_record(vec![true, true], vec![0.9, 0.8], 2)),
        image_with(0, create_record(vec![true, false], vec![0.7, 0.6], 2)),
    ];

    let (summary, _) = engine.compute(&results).unwrap();
    let ar = summary.get("vessel_AR_IoU_0.50_MaxDet_10").unwrap();
    assert!((ar.mean - 0.75).abs() < 1e-12);
    assert!((ar.std - 0.25).abs() < 1e-12);
}

#[test]
fn test_max_detection_caps() {
    // 5 matching detections, 5 ground truths, caps at 2 and 5
    let engine = single_threshold_engine(vec!["vessel"], vec![2, 5]);
    let record = create_record(
        vec![true; 5],
        vec![0.9, 0.8, 0.7, 0.6, 0.5],
        5,
    );
    let results = vec![image_with(0, record)];

    let (summary, _) = engine.compute(&results).unwrap();
    let ar_capped = summary.get("mAR_IoU_0.50_0.50_0.05_MaxDet_2").unwrap();
    assert!((ar_capped.mean - 0.4).abs() < 1e-12);
    let ar_full = summary.get("mAR_IoU_0.50_0.50_0.05_MaxDet_5").unwrap();
    assert!((ar_full.mean - 1.0).abs() < 1e-12);
}

#[test]
fn test_default_configuration_metric_names() {
    let engine = CocoMetric::with_defaults(vec!["vessel".to_string()]).unwrap();
    let record = MatchRecord {
        dt_matches: vec![vec![true]; engine.iou_thresholds().len()],
        gt_matches: vec![vec![true]; engine.iou_thresholds().len()],
        dt_scores: vec![0.9],
        dt_ignore: vec![vec![false]; engine.iou_thresholds().len()],
        gt_ignore: vec![false],
    };
    let results = vec![image_with(0, record)];

    let (summary, _) = engine.compute(&results).unwrap();

    for key in [
        "mAP_IoU_0.05_0.50_0.05_MaxDet_40",
        "mAP_IoU_0.50_0.95_0.05_MaxDet_40",
        "vessel_mAP_IoU_0.50_0.95_0.05_MaxDet_40",
        "AP_IoU_0.50_MaxDet_40",
        "AP_IoU_0.95_MaxDet_40",
        "mAR_IoU_0.05_0.50_0.05_MaxDet_40",
        "mAR_IoU_0.50_0.95_0.05_MaxDet_40",
        "AR_IoU_0.50_MaxDet_40",
        "vessel_AR_IoU_0.05_MaxDet_40",
    ] {
        assert!(summary.contains_key(key), "missing metric key {key}");
    }

    // 19 flat thresholds, 2 ranges, 1 cap, 1 class with per-class reporting:
    // AP entries 2*(2 + 19), AR entries likewise
    assert_eq!(summary.len(), 84);
}

#[test]
fn test_loader_to_compute_pipeline() {
    let json = r#"[
        {
            "0": {
                "dtMatches": [[true, true, true]],
                "gtMatches": [[true, true, true]],
                "dtScores": [0.9, 0.8, 0.7],
                "dtIgnore": [[false, false, false]],
                "gtIgnore": [false, false, false]
            }
        }
    ]"#;
    let results = load_results_from_string(json).unwrap();
    let engine = single_threshold_engine(vec!["vessel"], vec![10]);

    let (summary, _) = engine.compute(&results).unwrap();
    let ap = summary.get("AP_IoU_0.50_MaxDet_10").unwrap();
    assert!((ap.mean - 1.0).abs() < 1e-9);
}

#[test]
fn test_unsorted_scores_are_resorted() {
    // caller order is not score order; the engine re-sorts all three arrays
    let engine = single_threshold_engine(vec!["vessel"], vec![10]);
    let record = MatchRecord {
        dt_matches: vec![vec![false, true, true]],
        gt_matches: vec![vec![true, true, false]],
        dt_scores: vec![0.6, 0.9, 0.8],
        dt_ignore: vec![vec![false, false, false]],
        gt_ignore: vec![false, false],
    };
    let results = vec![image_with(0, record)];

    let (summary, _) = engine.compute(&results).unwrap();
    // sorted order is 0.9 (match), 0.8 (match), 0.6 (miss): recall 1.0 and a
    // clean precision head of 1.0
    let ar = summary.get("AR_IoU_0.50_MaxDet_10").unwrap();
    assert!((ar.mean - 1.0).abs() < 1e-12);
    let ap = summary.get("AP_IoU_0.50_MaxDet_10").unwrap();
    assert!((ap.mean - 1.0).abs() < 1e-9);
}
