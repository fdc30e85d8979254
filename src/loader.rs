//! JSON loading utilities for match-record datasets.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::types::ImageResults;

/// Load a list of per-image match-record maps from a JSON file.
///
/// The expected layout is one object per image mapping class ids to match
/// records:
///
/// ```json
/// [
///   {
///     "0": {
///       "dtMatches": [[true, false]],
///       "gtMatches": [[true, false]],
///       "dtScores": [0.9, 0.4],
///       "dtIgnore": [[false, false]],
///       "gtIgnore": [false, false]
///     }
///   }
/// ]
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, the JSON cannot be parsed,
/// or any record is internally inconsistent.
pub fn load_results_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ImageResults>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let results: Vec<ImageResults> = serde_json::from_reader(reader)?;

    validate_results(&results)?;

    Ok(results)
}

/// Load a list of per-image match-record maps from a JSON string.
///
/// # Example
///
/// ```
/// use coco_metric::loader::load_results_from_string;
///
/// let json = r#"[{"0": {
///     "dtMatches": [[true]],
///     "gtMatches": [[true]],
///     "dtScores": [0.9],
///     "dtIgnore": [[false]],
///     "gtIgnore": [false]
/// }}]"#;
/// let results = load_results_from_string(json).unwrap();
/// assert_eq!(results.len(), 1);
/// ```
pub fn load_results_from_string(json: &str) -> Result<Vec<ImageResults>> {
    let results: Vec<ImageResults> = serde_json::from_str(json)?;

    validate_results(&results)?;

    Ok(results)
}

/// Check internal consistency of every record.
///
/// The IoU-threshold axis can only be checked against a configured engine,
/// so each record is validated against its own row count here; `compute`
/// re-checks against the engine's grid.
fn validate_results(results: &[ImageResults]) -> Result<()> {
    for image in results {
        for record in image.values() {
            record.validate(record.dt_matches.len())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_string() {
        let json = r#"[
            {
                "0": {
                    "dtMatches": [[true, false]],
                    "gtMatches": [[true, false, false]],
                    "dtScores": [0.9, 0.4],
                    "dtIgnore": [[false, false]],
                    "gtIgnore": [false, false, true]
                }
            },
            {}
        ]"#;
        let results = load_results_from_string(json).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0][&0].num_detections(), 2);
        assert!(results[1].is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        assert!(load_results_from_string("{ not json").is_err());
    }

    #[test]
    fn test_load_ragged_record() {
        let json = r#"[{"0": {
            "dtMatches": [[true, false]],
            "gtMatches": [[true]],
            "dtScores": [0.9],
            "dtIgnore": [[false]],
            "gtIgnore": [false]
        }}]"#;
        assert!(load_results_from_string(json).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_results_from_file("no/such/file.json").is_err());
    }
}
