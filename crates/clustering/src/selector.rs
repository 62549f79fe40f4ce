use crate::matrix::CostMatrix;
use crate::model::{Assignment, ScanKind};
use crate::scan::{scan_columns, scan_rows};

/// Both greedy passes over the same matrix, before one is chosen.
#[derive(Debug, Clone)]
pub struct ScanPair {
    pub row: Assignment,
    pub column: Assignment,
}

/// Run the row and column scans. With `parallel` set they run on the rayon
/// pool and are joined before returning.
pub fn run_scans(matrix: &CostMatrix, parallel: bool) -> ScanPair {
    let (row, column) = if parallel {
        rayon::join(|| scan_rows(matrix), || scan_columns(matrix))
    } else {
        (scan_rows(matrix), scan_columns(matrix))
    };
    ScanPair { row, column }
}

/// Outcome of comparing the two scans.
#[derive(Debug, Clone)]
pub struct Selection {
    pub chosen: Assignment,
    pub row_cost: f64,
    pub column_cost: f64,
}

impl Selection {
    pub fn kind(&self) -> ScanKind {
        self.chosen.kind
    }
}

/// Keep the cheaper mapping. Equal totals keep the row scan.
pub fn select(scans: ScanPair) -> Selection {
    let row_cost = scans.row.total_cost;
    let column_cost = scans.column.total_cost;
    let chosen = if column_cost < row_cost {
        scans.column
    } else {
        scans.row
    };
    Selection {
        chosen,
        row_cost,
        column_cost,
    }
}

/// Scan and select in one call.
pub fn solve(matrix: &CostMatrix, parallel: bool) -> Selection {
    select(run_scans(matrix, parallel))
}
