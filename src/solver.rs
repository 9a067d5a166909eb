//! Visiting-order solver: nearest-neighbor construction plus 2-opt.
//!
//! Sized for a day's worth of stops (a dozen or so), where trying every
//! start node is cheap and near-optimal orders matter more than scaling.
//! Fully deterministic; ties go to the lowest index scanned first.

/// Reversals must gain at least this much to be applied.
const IMPROVEMENT_EPSILON: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Permutation of matrix indices, in visiting order.
    pub order: Vec<usize>,
    /// Sum of consecutive directed edges (no return leg).
    pub total_cost: f64,
}

/// Solve an open visiting order over a square cost matrix.
pub fn solve(matrix: &[Vec<f64>], preferred_start: usize) -> Tour {
    let n = matrix.len();
    match n {
        0 => {
            return Tour {
                order: Vec::new(),
                total_cost: 0.0,
            };
        }
        1 => {
            return Tour {
                order: vec![0],
                total_cost: 0.0,
            };
        }
        2 => {
            return Tour {
                order: vec![0, 1],
                total_cost: matrix[0][1],
            };
        }
        _ => {}
    }

    let mut best_order = nearest_neighbor(matrix, preferred_start);
    let mut best_cost = route_cost(&best_order, matrix);
    for start in 0..n {
        let order = nearest_neighbor(matrix, start);
        let cost = route_cost(&order, matrix);
        if cost < best_cost {
            best_order = order;
            best_cost = cost;
        }
    }

    let improved = two_opt(best_order.clone(), matrix);
    let improved_cost = route_cost(&improved, matrix);
    if improved_cost < best_cost {
        Tour {
            order: improved,
            total_cost: improved_cost,
        }
    } else {
        Tour {
            order: best_order,
            total_cost: best_cost,
        }
    }
}

/// Greedy walk from `start`, always moving to the cheapest unvisited node.
/// A `start` past the last node is clamped to it.
pub fn nearest_neighbor(matrix: &[Vec<f64>], start: usize) -> Vec<usize> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }
    let start = start.min(n - 1);
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    visited[start] = true;
    order.push(start);

    let mut current = start;
    while order.len() < n {
        let mut nearest = None;
        let mut nearest_cost = f64::INFINITY;
        for (next, &cost) in matrix[current].iter().enumerate() {
            if !visited[next] && cost < nearest_cost {
                nearest = Some(next);
                nearest_cost = cost;
            }
        }

        // Only infinite or NaN costs remain: take the first unvisited node.
        let next = nearest.or_else(|| visited.iter().position(|v| !v));
        let Some(next) = next else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Total cost of walking `order` without returning to the start.
pub fn route_cost(order: &[usize], matrix: &[Vec<f64>]) -> f64 {
    order.windows(2).map(|pair| matrix[pair[0]][pair[1]]).sum()
}

/// 2-opt: reverse segments while any reversal improves the closed tour.
/// Position 0 stays pinned.
fn two_opt(mut route: Vec<usize>, matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = route.len();
    let mut improved = true;

    while improved {
        improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n {
                if two_opt_delta(&route, matrix, i, j) < -IMPROVEMENT_EPSILON {
                    route[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    route
}

fn two_opt_delta(route: &[usize], matrix: &[Vec<f64>], i: usize, j: usize) -> f64 {
    let a = route[i - 1];
    let b = route[i];
    let c = route[j];
    let d = route.get(j + 1).copied().unwrap_or(route[0]);

    matrix[a][c] + matrix[b][d] - matrix[a][b] - matrix[c][d]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_sizes() {
        assert_eq!(solve(&[], 0).order, Vec::<usize>::new());
        assert_eq!(solve(&[vec![0.0]], 0), Tour { order: vec![0], total_cost: 0.0 });

        let two = vec![vec![0.0, 42.0], vec![7.0, 0.0]];
        assert_eq!(solve(&two, 0), Tour { order: vec![0, 1], total_cost: 42.0 });
    }

    #[test]
    fn test_nearest_neighbor_tie_takes_lowest_index() {
        let matrix = vec![
            vec![0.0, 5.0, 5.0],
            vec![5.0, 0.0, 1.0],
            vec![5.0, 1.0, 0.0],
        ];
        assert_eq!(nearest_neighbor(&matrix, 0), vec![0, 1, 2]);
    }

    #[test]
    fn test_nearest_neighbor_clamps_start() {
        let matrix = vec![
            vec![0.0, 1.0, 4.0],
            vec![1.0, 0.0, 2.0],
            vec![4.0, 2.0, 0.0],
        ];
        assert_eq!(nearest_neighbor(&matrix, 7), vec![2, 1, 0]);
        assert!(nearest_neighbor(&[], 0).is_empty());
    }

    #[test]
    fn test_two_opt_uncrosses() {
        // Points on a line at 0, 1, 2, 3; start pinned at 0.
        let pos = [0.0_f64, 1.0, 2.0, 3.0];
        let matrix: Vec<Vec<f64>> = pos
            .iter()
            .map(|a| pos.iter().map(|b| (a - b).abs()).collect())
            .collect();

        let route = two_opt(vec![0, 2, 1, 3], &matrix);
        assert_eq!(route[0], 0);
        assert!(route_cost(&route, &matrix) <= route_cost(&[0, 2, 1, 3], &matrix));
    }

    #[test]
    fn test_route_cost_is_open_path() {
        let matrix = vec![
            vec![0.0, 1.0, 10.0],
            vec![1.0, 0.0, 2.0],
            vec![10.0, 2.0, 0.0],
        ];
        assert_eq!(route_cost(&[0, 1, 2], &matrix), 3.0);
    }
}
