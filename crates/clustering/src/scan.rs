use crate::matrix::CostMatrix;
use crate::model::{Assignment, ScanKind};

/// Rows and columns already claimed during one scan.
///
/// Each scan builds its own; nothing outlives the call that created it.
#[derive(Debug)]
struct CoverageState {
    rows: Vec<bool>,
    columns: Vec<bool>,
}

impl CoverageState {
    fn new(size: usize) -> Self {
        Self {
            rows: vec![false; size],
            columns: vec![false; size],
        }
    }
}

/// Lowest-cost uncovered index among `costs`. Strict `<` keeps the first
/// (lowest) index on ties.
fn cheapest_uncovered(costs: impl Iterator<Item = f64>, covered: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, cost) in costs.enumerate() {
        if covered[idx] {
            continue;
        }
        match best {
            Some((_, min)) if cost >= min => {}
            _ => best = Some((idx, cost)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Greedy pass over rows: each row, in order, takes the cheapest column no
/// earlier row has taken.
///
/// A later row can be pushed into an expensive column because its best
/// option was already claimed.
pub fn scan_rows(matrix: &CostMatrix) -> Assignment {
    let n = matrix.size();
    let mut coverage = CoverageState::new(n);
    let mut columns = Vec::with_capacity(n);
    let mut total_cost = 0.0;

    for row in 0..n {
        // n rows and n columns: an uncovered column always remains.
        let Some(col) = cheapest_uncovered(matrix.row(row).iter().copied(), &coverage.columns) else {
            break;
        };
        coverage.rows[row] = true;
        coverage.columns[col] = true;
        total_cost += matrix.get(row, col);
        columns.push(col);
    }

    Assignment {
        kind: ScanKind::Row,
        columns,
        total_cost,
    }
}

/// Greedy pass over columns: each column, in order, takes the cheapest row no
/// earlier column has taken. Reported as row→column like [`scan_rows`].
pub fn scan_columns(matrix: &CostMatrix) -> Assignment {
    let n = matrix.size();
    let mut coverage = CoverageState::new(n);
    let mut columns = vec![0; n];
    let mut total_cost = 0.0;

    for col in 0..n {
        let costs = (0..n).map(|row| matrix.get(row, col));
        let Some(row) = cheapest_uncovered(costs, &coverage.rows) else {
            break;
        };
        coverage.rows[row] = true;
        coverage.columns[col] = true;
        total_cost += matrix.get(row, col);
        columns[row] = col;
    }

    Assignment {
        kind: ScanKind::Column,
        columns,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> CostMatrix {
        CostMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn row_scan_takes_diagonal_when_cheapest() {
        let m = matrix(vec![vec![0.1, 1.0], vec![1.0, 0.2]]);
        let a = scan_rows(&m);
        assert_eq!(a.kind, ScanKind::Row);
        assert_eq!(a.columns, vec![0, 1]);
        assert!((a.total_cost - 0.3).abs() < 1e-12);
    }

    #[test]
    fn column_scan_reports_row_to_column() {
        // Column 0 prefers row 1, column 1 is left with row 0.
        let m = matrix(vec![vec![0.5, 0.4], vec![0.1, 0.9]]);
        let a = scan_columns(&m);
        assert_eq!(a.kind, ScanKind::Column);
        assert_eq!(a.columns, vec![1, 0]);
        assert!((a.total_cost - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ties_pick_lowest_index() {
        let m = matrix(vec![vec![1.0; 3], vec![1.0; 3], vec![1.0; 3]]);
        assert_eq!(scan_rows(&m).columns, vec![0, 1, 2]);
        assert_eq!(scan_columns(&m).columns, vec![0, 1, 2]);
    }

    #[test]
    fn claimed_column_forces_later_row_into_worse_pick() {
        // Row 0 takes column 0 (0.1). Row 1 also wanted column 0 (0.2) and
        // is pushed to its next-best uncovered column.
        let m = matrix(vec![
            vec![0.1, 0.3, 1.0],
            vec![0.2, 0.9, 0.8],
            vec![1.0, 1.0, 0.5],
        ]);
        let a = scan_rows(&m);
        assert_eq!(a.columns, vec![0, 2, 1]);
        // 0.1 + 0.8 + 1.0: row 2 is left with column 1.
        assert!((a.total_cost - 1.9).abs() < 1e-12);
        // Exact optimum (0.3 + 0.2 + 0.5 = 1.0) is not found.
        assert!(a.total_cost > 1.0 + 1e-9);
    }

    #[test]
    fn empty_matrix_yields_empty_assignment() {
        let m = matrix(Vec::new());
        assert!(scan_rows(&m).columns.is_empty());
        assert!(scan_columns(&m).columns.is_empty());
        assert_eq!(scan_rows(&m).total_cost, 0.0);
    }

    #[test]
    fn cheapest_uncovered_skips_covered() {
        let costs = [0.1, 0.2, 0.3];
        assert_eq!(cheapest_uncovered(costs.iter().copied(), &[true, false, false]), Some(1));
        assert_eq!(cheapest_uncovered(costs.iter().copied(), &[true, true, true]), None);
    }
}
