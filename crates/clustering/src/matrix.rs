use crate::error::ClusterError;
use crate::model::CandidatePair;

/// Cost of a cell with no acceptable candidate.
pub const MAX_COST: f64 = 1.0;

/// Dense N×N similarity values kept alongside the cost matrix so emission can
/// re-check the threshold against the untransformed score.
///
/// Only pairs strictly above the threshold are stored; every other cell,
/// padding included, reads as 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity at (row, col); 0.0 for any cell outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.size || col >= self.size {
            return 0.0;
        }
        self.cells[row * self.size + col]
    }
}

/// Square matrix of assignment costs, every entry in [0, 1].
///
/// Always square: unequal collections are padded with cost-1.0 dummies.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl CostMatrix {
    /// Build from explicit rows, rejecting ragged or non-square input and any
    /// value that is not a finite number in [0, 1].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ClusterError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ClusterError::MalformedMatrix {
                    row: r,
                    expected: size,
                    found: row.len(),
                });
            }
            for (c, value) in row.into_iter().enumerate() {
                check_unit(value, "cost", r, c)?;
                cells.push(value);
            }
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Cost at (row, col); [`MAX_COST`] for any cell outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.size || col >= self.size {
            return MAX_COST;
        }
        self.cells[row * self.size + col]
    }

    /// All costs of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.size()`.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// `1.0 - cost` for every cell. Recovers the retained similarity matrix
    /// up to floating-point rounding.
    pub fn negated(&self) -> SimilarityMatrix {
        SimilarityMatrix {
            size: self.size,
            cells: self.cells.iter().map(|c| MAX_COST - c).collect(),
        }
    }
}

fn check_unit(value: f64, what: &'static str, row: usize, col: usize) -> Result<(), ClusterError> {
    if !value.is_finite() {
        return Err(ClusterError::NonFinite { what, row, col });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ClusterError::SimilarityOutOfRange { row, col, value });
    }
    Ok(())
}

/// Cells in the padded `max(left, right)` square.
///
/// Fails when the cell count, its size in bytes, or the shared id space
/// `left + right` does not fit in `usize`.
pub fn dense_cell_count(left_entities: usize, right_entities: usize) -> Result<usize, ClusterError> {
    let too_large = || ClusterError::MatrixTooLarge {
        left: left_entities,
        right: right_entities,
    };
    left_entities.checked_add(right_entities).ok_or_else(too_large)?;
    let size = left_entities.max(right_entities);
    let cells = size.checked_mul(size).ok_or_else(too_large)?;
    if cells > isize::MAX as usize / std::mem::size_of::<f64>() {
        return Err(too_large());
    }
    Ok(cells)
}

/// Turn sparse scored pairs into the dense similarity and cost matrices.
///
/// Side length is `max(left_entities, right_entities)`. A pair writes
/// `1.0 - similarity` only when its similarity is strictly above
/// `threshold`; everything else keeps [`MAX_COST`]. If the same
/// (left, right) combination appears twice above the threshold, the later
/// pair wins. Pairs at or below the threshold are never written, so they
/// cannot clear an earlier accepted score.
///
/// Every pair is validated, including those below the threshold. Sizes
/// whose matrix cannot be addressed fail with
/// [`ClusterError::MatrixTooLarge`] before anything is allocated.
pub fn build_matrices(
    pairs: &[CandidatePair],
    threshold: f64,
    left_entities: usize,
    right_entities: usize,
) -> Result<(SimilarityMatrix, CostMatrix), ClusterError> {
    let size = left_entities.max(right_entities);
    let cells = dense_cell_count(left_entities, right_entities)?;
    let mut similarity = vec![0.0; cells];
    let mut cost = vec![MAX_COST; cells];

    for pair in pairs {
        if pair.left >= left_entities {
            return Err(ClusterError::EntityOutOfRange {
                side: "left",
                id: pair.left,
                size: left_entities,
            });
        }
        if pair.right >= right_entities {
            return Err(ClusterError::EntityOutOfRange {
                side: "right",
                id: pair.right,
                size: right_entities,
            });
        }
        check_unit(pair.similarity, "similarity", pair.left, pair.right)?;

        if threshold < pair.similarity {
            let idx = pair.left * size + pair.right;
            similarity[idx] = pair.similarity;
            cost[idx] = MAX_COST - pair.similarity;
        }
    }

    Ok((
        SimilarityMatrix {
            size,
            cells: similarity,
        },
        CostMatrix { size, cells: cost },
    ))
}
