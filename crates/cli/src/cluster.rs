//! `rowcol run` / `rowcol validate` - config-driven clean-clean clustering.

use std::path::{Path, PathBuf};

use log::debug;
use rowcol_clustering::{ClusterError, ClusteringConfig};

use crate::exit_codes::{
    EXIT_CLUSTER_INVALID_CONFIG, EXIT_CLUSTER_RUNTIME, EXIT_CLUSTER_UNSUPPORTED, EXIT_ERROR,
};
use crate::CliError;

fn cluster_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Map an engine error onto the exit code registry.
fn engine_err(err: ClusterError) -> CliError {
    match err {
        ClusterError::ConfigParse(_)
        | ClusterError::ConfigValidation(_)
        | ClusterError::MatrixTooLarge { .. } => {
            cluster_err(EXIT_CLUSTER_INVALID_CONFIG, err.to_string())
        }
        ClusterError::Unsupported { .. } => cluster_err(EXIT_CLUSTER_UNSUPPORTED, err.to_string())
            .with_hint("row-column clustering needs [mode] kind = \"clean_clean\""),
        _ => cluster_err(EXIT_CLUSTER_RUNTIME, err.to_string()),
    }
}

fn load_config(config_path: &Path) -> Result<ClusteringConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| cluster_err(EXIT_CLUSTER_RUNTIME, format!("cannot read config: {e}")))?;
    ClusteringConfig::from_toml(&config_str).map_err(engine_err)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "{}: ok ({} mode, threshold {}, parallel scans {})",
        config.name, config.mode, config.threshold, config.parallel_scans
    );
    Ok(())
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    threshold: Option<f64>,
) -> Result<(), CliError> {
    let mut config = load_config(&config_path)?;
    if let Some(threshold) = threshold {
        config.threshold = threshold;
        config.validate().map_err(engine_err)?;
    }

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let csv_path = base_dir.join(&config.input.file);
    debug!("reading candidate pairs from {}", csv_path.display());
    let csv_data = std::fs::read_to_string(&csv_path).map_err(|e| {
        cluster_err(EXIT_CLUSTER_RUNTIME, format!("cannot read {}: {e}", csv_path.display()))
    })?;
    let pairs = rowcol_clustering::load_csv_pairs(&csv_data, &config.input).map_err(engine_err)?;

    let result = rowcol_clustering::run(&config, &pairs).map_err(engine_err)?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| cluster_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    let output_path = output_file.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    if let Some(ref path) = output_path {
        std::fs::write(path, &json_str)
            .map_err(|e| cluster_err(EXIT_CLUSTER_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{}: {} comparisons, {} edges, {} clusters, {} unmatched left, {} unmatched right",
        result.meta.config_name,
        s.input_comparisons,
        s.accepted_edges,
        s.clusters,
        s.unmatched_left,
        s.unmatched_right,
    );
    if let (Some(scan), Some(row), Some(col)) = (s.chosen_scan, s.row_scan_cost, s.column_scan_cost) {
        eprintln!("chosen: {scan} scan (row cost {row:.4}, column cost {col:.4})");
    }

    Ok(())
}
