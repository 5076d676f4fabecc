//! Exact phase-one simplex for LP feasibility.
//!
//! Decides whether `A x = b, x >= 0` has a solution using `BigRational`
//! arithmetic throughout, so no rounding can flip the answer. Bland's rule
//! picks entering and leaving variables, which rules out cycling.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// An equality-form feasibility problem `A x = b, x >= 0`.
#[derive(Clone, Debug)]
pub struct Feasibility {
    rows: Vec<Vec<BigRational>>,
    rhs: Vec<BigRational>,
    vars: usize,
}

impl Feasibility {
    /// Create a problem with `vars` variables and no constraints.
    pub fn new(vars: usize) -> Self {
        Self {
            rows: Vec::new(),
            rhs: Vec::new(),
            vars,
        }
    }

    /// Add the constraint `coeffs . x = rhs`.
    ///
    /// `coeffs` must have exactly `vars` entries.
    pub fn constraint(mut self, coeffs: &[i64], rhs: i64) -> Self {
        debug_assert_eq!(coeffs.len(), self.vars, "constraint width must match variable count");
        self.rows.push(coeffs.iter().map(|&c| ratio(c)).collect());
        self.rhs.push(ratio(rhs));
        self
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.rows.len()
    }

    /// Run phase one and report whether a feasible point exists.
    pub fn is_feasible(&self) -> bool {
        let m = self.rows.len();
        if m == 0 {
            return true;
        }

        // Columns: original variables, one artificial per row, then rhs.
        let width = self.vars + m + 1;
        let rhs_col = width - 1;
        let mut tableau: Vec<Vec<BigRational>> = Vec::with_capacity(m);

        for (i, (row, b)) in self.rows.iter().zip(&self.rhs).enumerate() {
            let flip = b.is_negative();
            let mut line = vec![BigRational::zero(); width];
            for (j, a) in row.iter().enumerate() {
                line[j] = if flip { -a.clone() } else { a.clone() };
            }
            line[self.vars + i] = BigRational::one();
            line[rhs_col] = if flip { -b.clone() } else { b.clone() };
            tableau.push(line);
        }

        // Objective: minimise the sum of artificials. `cost[j]` is the reduced
        // cost of column j and `-cost[rhs_col]` the current objective value.
        let mut cost = vec![BigRational::zero(); width];
        for line in &tableau {
            for j in 0..self.vars {
                cost[j] -= &line[j];
            }
            cost[rhs_col] -= &line[rhs_col];
        }

        let mut basis: Vec<usize> = (0..m).map(|i| self.vars + i).collect();

        loop {
            if cost[rhs_col].is_zero() {
                return true;
            }

            let Some(enter) = (0..rhs_col).find(|&j| cost[j].is_negative()) else {
                return false;
            };

            let mut leave: Option<(usize, BigRational)> = None;
            for (i, line) in tableau.iter().enumerate() {
                if !line[enter].is_positive() {
                    continue;
                }
                let step = &line[rhs_col] / &line[enter];
                let better = match &leave {
                    None => true,
                    Some((best_row, best)) => {
                        step < *best || (step == *best && basis[i] < basis[*best_row])
                    }
                };
                if better {
                    leave = Some((i, step));
                }
            }

            // Phase one is bounded below by zero, so an entering column
            // always has a positive entry.
            let Some((pivot_row, _)) = leave else {
                return false;
            };

            pivot(&mut tableau, &mut cost, pivot_row, enter);
            basis[pivot_row] = enter;
        }
    }
}

fn pivot(tableau: &mut [Vec<BigRational>], cost: &mut [BigRational], row: usize, col: usize) {
    let inv = tableau[row][col].recip();
    for v in tableau[row].iter_mut() {
        *v *= &inv;
    }

    let pivot_line = tableau[row].clone();
    for (i, line) in tableau.iter_mut().enumerate() {
        if i == row || line[col].is_zero() {
            continue;
        }
        let factor = line[col].clone();
        for (v, p) in line.iter_mut().zip(&pivot_line) {
            *v -= &factor * p;
        }
    }

    if !cost[col].is_zero() {
        let factor = cost[col].clone();
        for (v, p) in cost.iter_mut().zip(&pivot_line) {
            *v -= &factor * p;
        }
    }
}

fn ratio(v: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivially_feasible() {
        // x = 3
        assert!(Feasibility::new(1).constraint(&[1], 3).is_feasible());
    }

    #[test]
    fn test_negative_rhs_infeasible() {
        // x = -1 with x >= 0
        assert!(!Feasibility::new(1).constraint(&[1], -1).is_feasible());
    }

    #[test]
    fn test_negative_rhs_feasible_after_flip() {
        // -x = -2
        assert!(Feasibility::new(1).constraint(&[-1], -2).is_feasible());
    }

    #[test]
    fn test_convex_combination() {
        // a + b = 1, 2a + 0b = 1  ->  a = b = 1/2
        let lp = Feasibility::new(2)
            .constraint(&[1, 1], 1)
            .constraint(&[2, 0], 1);
        assert!(lp.is_feasible());
        assert_eq!(lp.constraint_count(), 2);
    }

    #[test]
    fn test_infeasible_system() {
        // a + b = 1, a + b = 2
        let lp = Feasibility::new(2)
            .constraint(&[1, 1], 1)
            .constraint(&[1, 1], 2);
        assert!(!lp.is_feasible());
    }

    #[test]
    fn test_degenerate_redundant_rows() {
        // Duplicate rows make the problem degenerate but still feasible.
        let lp = Feasibility::new(3)
            .constraint(&[1, 1, 1], 1)
            .constraint(&[1, 1, 1], 1)
            .constraint(&[0, 1, 0], 0);
        assert!(lp.is_feasible());
    }

    #[test]
    fn test_no_constraints() {
        assert!(Feasibility::new(4).is_feasible());
    }
}
