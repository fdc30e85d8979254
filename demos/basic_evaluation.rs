//! Basic evaluation example demonstrating core functionality.

use std::collections::HashMap;

use coco_metric::{load_results_from_string, polars_utils::summary_to_dataframe, CocoMetric};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== COCO Metric Example ===\n");

    // Example 1: configure an engine with a single IoU threshold of 0.5
    println!("1. Engine configuration");
    let engine = CocoMetric::new(
        vec!["vessel".to_string(), "lesion".to_string()],
        (0.5, 0.51, 0.05),
        vec![(0.5, 0.5, 0.05)],
        vec![10],
        true,
        true,
    )?;
    println!("   IoU thresholds: {:?}", engine.iou_thresholds());
    println!("   Max detections: {:?}", engine.max_detections());
    println!();

    // Example 2: load match records produced by an external box matcher
    println!("2. Loading match records");
    let results_json = r#"[
        {
            "0": {
                "dtMatches": [[true, true, false]],
                "gtMatches": [[true, true, false]],
                "dtScores": [0.9, 0.8, 0.55],
                "dtIgnore": [[false, false, false]],
                "gtIgnore": [false, false, false]
            },
            "1": {
                "dtMatches": [[true]],
                "gtMatches": [[true]],
                "dtScores": [0.7],
                "dtIgnore": [[false]],
                "gtIgnore": [false]
            }
        }
    ]"#;
    let results = load_results_from_string(results_json)?;
    println!("   Loaded records for {} image(s)", results.len());
    println!();

    // Example 3: compute the summary
    println!("3. Metric summary");
    let (summary, _curves) = engine.compute(&results)?;
    for (name, value) in &summary {
        println!("   {name}: mean={:.4} std={:.4}", value.mean, value.std);
    }
    println!();

    // Example 4: tabular report via polars
    println!("4. DataFrame report");
    let df = summary_to_dataframe(&summary)?;
    println!("   {} rows x {} columns", df.height(), df.width());

    // Example 5: mixed results for a single class
    println!("\n5. Imperfect detections");
    let engine = CocoMetric::new(
        vec!["vessel".to_string()],
        (0.5, 0.51, 0.05),
        vec![(0.5, 0.5, 0.05)],
        vec![10],
        false,
        false,
    )?;
    let mut image = HashMap::new();
    image.insert(0, results[0][&0].clone());
    let (summary, _) = engine.compute(&[image])?;
    let ar = &summary["AR_IoU_0.50_MaxDet_10"];
    println!("   recall with one miss: {:.4}", ar.mean);

    Ok(())
}
