use serde::Deserialize;

use crate::error::ClusterError;

/// Similarity threshold used when a config does not set one.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringConfig {
    pub name: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub mode: MatchingMode,
    #[serde(default)]
    pub parallel_scans: bool,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

// ---------------------------------------------------------------------------
// Matching mode
// ---------------------------------------------------------------------------

/// Which entity-resolution setting the candidate pairs come from.
///
/// Only `CleanClean` (two distinct collections, matches only across them)
/// can be clustered by the row-column heuristic. `Dirty` exists so callers
/// can describe a single-collection problem and get an explicit
/// [`ClusterError::Unsupported`] back instead of a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchingMode {
    CleanClean {
        left_entities: usize,
        right_entities: usize,
    },
    Dirty {
        entities: usize,
    },
}

impl MatchingMode {
    pub fn clean_clean(left_entities: usize, right_entities: usize) -> Self {
        Self::CleanClean {
            left_entities,
            right_entities,
        }
    }
}

impl std::fmt::Display for MatchingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CleanClean { .. } => write!(f, "clean_clean"),
            Self::Dirty { .. } => write!(f, "dirty"),
        }
    }
}

// ---------------------------------------------------------------------------
// Duplicate policy
// ---------------------------------------------------------------------------

/// What emission does when an accepted pair touches an id that an earlier
/// edge already consumed.
///
/// Both variants log and record the conflict. `Report` still inserts the
/// edge; `Reject` drops it.
///
/// One run never reuses an id, so conflicts only show up when the same
/// [`RowColumnClustering`](crate::RowColumnClustering) clusters again without
/// a reset. The policy is therefore an instance setting
/// (`with_duplicate_policy`), not a config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Report,
    Reject,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Report => write!(f, "report"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_file")]
    pub file: String,
    #[serde(default)]
    pub columns: ColumnMapping,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file: default_input_file(),
            columns: ColumnMapping::default(),
        }
    }
}

fn default_input_file() -> String {
    "pairs.csv".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_left_column")]
    pub left: String,
    #[serde(default = "default_right_column")]
    pub right: String,
    #[serde(default = "default_similarity_column")]
    pub similarity: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            left: default_left_column(),
            right: default_right_column(),
            similarity: default_similarity_column(),
        }
    }
}

fn default_left_column() -> String {
    "left_id".into()
}

fn default_right_column() -> String {
    "right_id".into()
}

fn default_similarity_column() -> String {
    "similarity".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

/// Threshold must be a finite value in [0, 1].
pub fn validate_threshold(threshold: f64) -> Result<(), ClusterError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ClusterError::ConfigValidation(format!(
            "threshold must be within [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

impl ClusteringConfig {
    pub fn from_toml(input: &str) -> Result<Self, ClusterError> {
        let config: ClusteringConfig =
            toml::from_str(input).map_err(|e| ClusterError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClusterError> {
        validate_threshold(self.threshold)?;

        match self.mode {
            MatchingMode::CleanClean {
                left_entities,
                right_entities,
            } => {
                if left_entities == 0 || right_entities == 0 {
                    return Err(ClusterError::ConfigValidation(format!(
                        "clean_clean mode needs both collections non-empty, got {left_entities} and {right_entities}"
                    )));
                }
            }
            // Dirty mode parses fine; the engine declines it at run time.
            MatchingMode::Dirty { .. } => {}
        }

        let col = &self.input.columns;
        let names = [("left", &col.left), ("right", &col.right), ("similarity", &col.similarity)];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(ClusterError::ConfigValidation(format!(
                    "input.columns.{field} must not be empty"
                )));
            }
        }
        if col.left == col.right || col.left == col.similarity || col.right == col.similarity {
            return Err(ClusterError::ConfigValidation(
                "input.columns must name three distinct columns".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Restaurants"
threshold = 0.4

[mode]
kind = "clean_clean"
left_entities = 3
right_entities = 4

[input]
file = "restaurants.csv"

[input.columns]
left = "id1"
right = "id2"
similarity = "score"
"#;

    #[test]
    fn parse_valid_clean_clean() {
        let config = ClusteringConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Restaurants");
        assert_eq!(config.threshold, 0.4);
        assert_eq!(config.mode, MatchingMode::clean_clean(3, 4));
        assert!(!config.parallel_scans);
        assert_eq!(config.input.file, "restaurants.csv");
        assert_eq!(config.input.columns.similarity, "score");
        assert!(config.output.json.is_none());
    }

    #[test]
    fn defaults_apply() {
        let input = r#"
name = "Minimal"

[mode]
kind = "clean_clean"
left_entities = 1
right_entities = 1
"#;
        let config = ClusteringConfig::from_toml(input).unwrap();
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.input.file, "pairs.csv");
        assert_eq!(config.input.columns.left, "left_id");
        assert_eq!(config.input.columns.right, "right_id");
        assert_eq!(config.input.columns.similarity, "similarity");
    }

    #[test]
    fn parse_parallel_scans() {
        let input = format!("parallel_scans = true\n{VALID}");
        let config = ClusteringConfig::from_toml(&input).unwrap();
        assert!(config.parallel_scans);
    }

    #[test]
    fn dirty_mode_parses() {
        let input = r#"
name = "Single source"

[mode]
kind = "dirty"
entities = 10
"#;
        let config = ClusteringConfig::from_toml(input).unwrap();
        assert_eq!(config.mode, MatchingMode::Dirty { entities: 10 });
        assert_eq!(config.mode.to_string(), "dirty");
    }

    #[test]
    fn reject_threshold_out_of_range() {
        let input = VALID.replace("threshold = 0.4", "threshold = 1.5");
        let err = ClusteringConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("threshold must be within [0, 1]"));
    }

    #[test]
    fn reject_empty_collection() {
        let input = VALID.replace("left_entities = 3", "left_entities = 0");
        let err = ClusteringConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ClusterError::ConfigValidation(_)));
    }

    #[test]
    fn reject_duplicate_column_names() {
        let input = VALID.replace("right = \"id2\"", "right = \"id1\"");
        let err = ClusteringConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn reject_unknown_mode() {
        let input = VALID.replace("kind = \"clean_clean\"", "kind = \"clean\"");
        let err = ClusteringConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ClusterError::ConfigParse(_)));
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(-0.1).is_err());
    }
}
