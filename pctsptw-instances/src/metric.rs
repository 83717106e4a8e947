//! Triangle-inequality checks and metric closure for square distance matrices.
use crate::InstanceError;

/// Returns true as soon as some `d[i][j] > d[i][k] + d[k][j]`. Sums saturate at the
/// `i64` bounds.
pub fn violates_triangle_inequality(distance_matrix: &[Vec<i64>]) -> bool {
    let n = distance_matrix.len();
    for i in 0..n {
        let di = &distance_matrix[i];
        for k in 0..n {
            let dik = di[k];
            let dk = &distance_matrix[k];
            for j in 0..n {
                if di[j] > dik.saturating_add(dk[j]) {
                    return true;
                }
            }
        }
    }
    false
}

/// All-pairs shortest paths (Floyd-Warshall) over a copy of `distance_matrix`.
///
/// With non-negative input the result satisfies the triangle inequality. A negative
/// diagonal entry after relaxing through `k` means a negative cycle; the closure stops
/// there instead of letting values run away. Path lengths saturate at the `i64` bounds.
pub fn metric_closure(distance_matrix: &[Vec<i64>]) -> Result<Vec<Vec<i64>>, InstanceError> {
    let n = distance_matrix.len();
    let mut d = distance_matrix.to_vec();
    for k in 0..n {
        let dk = d[k].clone();
        for i in 0..n {
            let dik = d[i][k];
            let di = &mut d[i];
            for j in 0..n {
                let alt = dik.saturating_add(dk[j]);
                if alt < di[j] {
                    di[j] = alt;
                }
            }
        }
        if let Some(node) = (0..n).find(|&i| d[i][i] < 0) {
            return Err(InstanceError::NegativeCycle { node });
        }
    }
    Ok(d)
}

/// Applies the closure when `enforce` is set or the matrix is not metric, otherwise
/// hands the matrix back untouched. The flag tells whether the closure ran.
pub fn ensure_metric(
    distance_matrix: Vec<Vec<i64>>,
    enforce: bool,
) -> Result<(Vec<Vec<i64>>, bool), InstanceError> {
    if enforce || violates_triangle_inequality(&distance_matrix) {
        Ok((metric_closure(&distance_matrix)?, true))
    } else {
        Ok((distance_matrix, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_row_k_is_stable_during_pass() {
        // Row k never changes while relaxing through k when d[k][k] >= 0,
        // so snapshotting it must not change the result.
        let d = vec![vec![0, 5, 1], vec![5, 0, 1], vec![1, 1, 0]];
        assert_eq!(
            metric_closure(&d).unwrap(),
            vec![vec![0, 2, 1], vec![2, 0, 1], vec![1, 1, 0]]
        );
    }

    #[test]
    fn test_huge_distances_saturate() {
        let d = vec![vec![0, i64::MAX], vec![i64::MAX, 0]];
        assert!(!violates_triangle_inequality(&d));
        assert_eq!(metric_closure(&d).unwrap(), d);

        let d = vec![
            vec![0, i64::MAX, 1],
            vec![i64::MAX, 0, 1],
            vec![1, 1, 0],
        ];
        assert!(violates_triangle_inequality(&d));
        assert_eq!(
            metric_closure(&d).unwrap(),
            vec![vec![0, 2, 1], vec![2, 0, 1], vec![1, 1, 0]]
        );
    }
}
