//! # LU Decomposition
//!
//! Gaussian elimination on a row major copy of the basis matrix. Pivots are chosen with
//! Markowitz's rule among the values that pass a threshold test against the largest value in
//! their column.
use std::cmp::Ordering;
use std::mem;

use crate::algorithm::simplex::factorization::lower_upper::LUDecomposition;
use crate::algorithm::simplex::factorization::Singular;
use crate::data::linear_algebra::SparseTuple;

/// Values of at most this size are not considered as a pivot.
const ZERO_TOLERANCE: f64 = 1e-11;
/// Values of at most this size are dropped during elimination.
const DROP_TOLERANCE: f64 = 1e-14;

struct Pivot {
    row: usize,
    column: usize,
    value: f64,
}

impl LUDecomposition {
    /// Compute the factorization.
    ///
    /// # Arguments
    ///
    /// * `rows`: A row major representation of the basis columns, each row sorted by position.
    /// * `pivot_threshold`: A pivot should be at least this fraction of the largest absolute value
    /// in its column.
    pub fn rows(
        mut rows: Vec<Vec<SparseTuple<f64>>>,
        pivot_threshold: f64,
    ) -> Result<Self, Singular> {
        debug_assert!(rows.iter().all(|row| row.windows(2).all(|w| w[0].0 < w[1].0)));

        let m = rows.len();
        // May contain stale or duplicate row indices, cleaned when the column is searched.
        let mut column_rows = vec![Vec::new(); m];
        for (i, row) in rows.iter().enumerate() {
            for &(j, _) in row {
                column_rows[j].push(i);
            }
        }

        let mut row_done = vec![false; m];
        let mut column_done = vec![false; m];
        let mut pivots = Vec::with_capacity(m);
        let mut lower = Vec::with_capacity(m);
        let mut upper = Vec::with_capacity(m);
        let mut diagonal = Vec::with_capacity(m);

        for _ in 0..m {
            let pivot = choose_pivot(&rows, &mut column_rows, &row_done, &column_done, pivot_threshold);
            let Some(Pivot { row: r, column: c, value: pivot_value }) = pivot else {
                return Err(Singular {
                    rank: pivots.len(),
                    missing_positions: (0..m).filter(|&j| !column_done[j]).collect(),
                    missing_rows: (0..m).filter(|&i| !row_done[i]).collect(),
                });
            };
            row_done[r] = true;
            column_done[c] = true;

            let pivot_row = mem::take(&mut rows[r]).into_iter()
                .filter(|&(j, _)| j != c)
                .collect::<Vec<_>>();

            let mut ratios = Vec::new();
            for i in mem::take(&mut column_rows[c]) {
                if row_done[i] {
                    continue;
                }
                if let Ok(data_index) = rows[i].binary_search_by_key(&c, |&(j, _)| j) {
                    let ratio = rows[i].remove(data_index).1 / pivot_value;
                    subtract_multiple_of_row(&mut rows[i], i, ratio, &pivot_row, &mut column_rows);
                    ratios.push((i, ratio));
                }
            }

            pivots.push((r, c));
            lower.push(ratios);
            upper.push(pivot_row);
            diagonal.push(pivot_value);
        }

        Ok(Self { m, pivots, lower, upper, diagonal, updates: Vec::new() })
    }
}

/// Threshold Markowitz: minimize `(nnz(row) - 1) * (nnz(column) - 1)` over the values that are
/// at least `threshold` times the largest value in their column. Ties go to the larger value.
fn choose_pivot(
    rows: &[Vec<SparseTuple<f64>>],
    column_rows: &mut [Vec<usize>],
    row_done: &[bool],
    column_done: &[bool],
    threshold: f64,
) -> Option<Pivot> {
    let mut best: Option<(usize, Pivot)> = None;

    for (j, candidates) in column_rows.iter_mut().enumerate() {
        if column_done[j] {
            continue;
        }

        candidates.retain(|&i| !row_done[i]);
        candidates.sort_unstable();
        candidates.dedup();
        let entries = candidates.iter()
            .filter_map(|&i| {
                rows[i].binary_search_by_key(&j, |&(jj, _)| jj).ok().map(|p| (i, rows[i][p].1))
            })
            .collect::<Vec<_>>();
        *candidates = entries.iter().map(|&(i, _)| i).collect();

        let largest = entries.iter().map(|(_, v)| v.abs()).fold(0_f64, f64::max);
        if largest <= ZERO_TOLERANCE {
            continue;
        }

        for &(i, value) in &entries {
            if value.abs() < threshold * largest || value.abs() <= ZERO_TOLERANCE {
                continue;
            }

            let cost = (rows[i].len() - 1) * (entries.len() - 1);
            let better = match &best {
                None => true,
                Some((best_cost, best_pivot)) => {
                    cost < *best_cost || (cost == *best_cost && value.abs() > best_pivot.value.abs())
                }
            };
            if better {
                best = Some((cost, Pivot { row: i, column: j, value }));
            }
        }
    }

    best.map(|(_, pivot)| pivot)
}

/// `row <- row - ratio * pivot_row`, registering fill-in in `column_rows`.
fn subtract_multiple_of_row(
    row: &mut Vec<SparseTuple<f64>>,
    row_index: usize,
    ratio: f64,
    pivot_row: &[SparseTuple<f64>],
    column_rows: &mut [Vec<usize>],
) {
    let mut result = Vec::with_capacity(row.len() + pivot_row.len());

    let (mut a, mut b) = (0, 0);
    while a < row.len() && b < pivot_row.len() {
        let (ja, va) = row[a];
        let (jb, vb) = pivot_row[b];
        match ja.cmp(&jb) {
            Ordering::Less => {
                result.push((ja, va));
                a += 1;
            }
            Ordering::Equal => {
                let value = va - ratio * vb;
                if value.abs() > DROP_TOLERANCE {
                    result.push((ja, value));
                }
                a += 1;
                b += 1;
            }
            Ordering::Greater => {
                result.push((jb, -ratio * vb));
                column_rows[jb].push(row_index);
                b += 1;
            }
        }
    }
    result.extend_from_slice(&row[a..]);
    for &(jb, vb) in &pivot_row[b..] {
        result.push((jb, -ratio * vb));
        column_rows[jb].push(row_index);
    }

    *row = result;
}
