use crate::config::InputConfig;
use crate::error::ClusterError;
use crate::model::CandidatePair;

/// Load candidate pairs from headed CSV using the configured column names.
///
/// Ids are non-negative integers local to their own collection; similarity
/// is parsed as `f64`. Range checks happen later, when the matrix is built.
pub fn load_csv_pairs(csv_data: &str, input: &InputConfig) -> Result<Vec<CandidatePair>, ClusterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ClusterError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = &input.columns;

    let idx = |name: &str| -> Result<usize, ClusterError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ClusterError::MissingColumn { column: name.into() })
    };

    let left_idx = idx(&col.left)?;
    let right_idx = idx(&col.right)?;
    let similarity_idx = idx(&col.similarity)?;

    let mut pairs = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| ClusterError::Io(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let left: usize = parse_field(&record, left_idx, &col.left, line)?;
        let right: usize = parse_field(&record, right_idx, &col.right, line)?;
        let similarity: f64 = parse_field(&record, similarity_idx, &col.similarity, line)?;

        pairs.push(CandidatePair::new(left, right, similarity));
    }

    Ok(pairs)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> Result<T, ClusterError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse().map_err(|_| ClusterError::FieldParse {
        line,
        column: column.into(),
        value: raw.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnMapping;

    fn input(left: &str, right: &str, similarity: &str) -> InputConfig {
        InputConfig {
            file: "pairs.csv".into(),
            columns: ColumnMapping {
                left: left.into(),
                right: right.into(),
                similarity: similarity.into(),
            },
        }
    }

    #[test]
    fn load_basic() {
        let csv = "\
left_id,right_id,similarity
0,0,0.9
0,1,0.1
1,1,0.8
";
        let pairs = load_csv_pairs(csv, &InputConfig::default()).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], CandidatePair::new(0, 0, 0.9));
        assert_eq!(pairs[2], CandidatePair::new(1, 1, 0.8));
    }

    #[test]
    fn load_with_mapped_columns_and_extra_fields() {
        let csv = "\
score,note,id2,id1
0.75, same street ,3,1
";
        let pairs = load_csv_pairs(csv, &input("id1", "id2", "score")).unwrap();
        assert_eq!(pairs, vec![CandidatePair::new(1, 3, 0.75)]);
    }

    #[test]
    fn header_only_is_empty() {
        let pairs = load_csv_pairs("left_id,right_id,similarity\n", &InputConfig::default()).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn missing_column_is_named() {
        let csv = "left_id,right_id,score\n0,0,0.9\n";
        let err = load_csv_pairs(csv, &InputConfig::default()).unwrap_err();
        assert_eq!(err, ClusterError::MissingColumn { column: "similarity".into() });
    }

    #[test]
    fn bad_id_reports_line_and_value() {
        let csv = "left_id,right_id,similarity\n0,0,0.9\n-1,0,0.5\n";
        let err = load_csv_pairs(csv, &InputConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ClusterError::FieldParse {
                line: 3,
                column: "left_id".into(),
                value: "-1".into(),
            }
        );
    }

    #[test]
    fn bad_similarity_is_rejected() {
        let csv = "left_id,right_id,similarity\n0,0,high\n";
        let err = load_csv_pairs(csv, &InputConfig::default()).unwrap_err();
        assert!(err.to_string().contains("cannot parse similarity 'high'"));
    }
}
