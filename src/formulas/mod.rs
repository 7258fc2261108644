//! CSEC formula sheet with closed-form solvers.
//!
//! Every formula can be rearranged for a subset of its variables, listed in
//! [`Formula::solvable_for`]. Angles are always taken and returned in degrees.

mod catalog;

pub use catalog::CATEGORIES;

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Variable {
    pub symbol: &'static str,
    pub name: &'static str,
}

/// Known variable values keyed by symbol.
pub struct Inputs<'a>(&'a HashMap<String, f64>);

impl Inputs<'_> {
    /// Missing values read as NaN so that a solver using them yields no result.
    fn get(&self, symbol: &str) -> f64 {
        self.0.get(symbol).copied().unwrap_or(f64::NAN)
    }
}

#[derive(Clone, Copy)]
pub enum Solver {
    Value(fn(&str, &Inputs<'_>) -> Option<f64>),
    Roots(fn(&Inputs<'_>) -> Option<(f64, f64)>),
}

#[derive(Serialize)]
pub struct Formula {
    pub id: &'static str,
    pub name: &'static str,
    pub equation: &'static str,
    pub variables: &'static [Variable],
    pub solvable_for: &'static [&'static str],
    #[serde(skip)]
    pub solver: Solver,
}

#[derive(Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub formulas: &'static [&'static Formula],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Solution {
    Value(f64),
    Roots { root1: f64, root2: f64 },
}

/// Looks a formula up by id across all categories.
#[must_use]
pub fn find(id: &str) -> Option<&'static Formula> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.formulas.iter().copied())
        .find(|f| f.id == id)
}

impl Formula {
    /// Solves for `target` given the other variables.
    ///
    /// Input problems (unknown target, missing or non-finite values) are
    /// `Error::BadRequest`. Inputs with no real, finite answer are
    /// `Error::Unsolvable`.
    pub fn solve(&self, target: &str, values: &HashMap<String, f64>) -> Result<Solution> {
        if !self.solvable_for.contains(&target) {
            return Err(Error::BadRequest(format!(
                "{} cannot be solved for '{target}'",
                self.name
            )));
        }

        for variable in self.variables.iter().filter(|v| v.symbol != target) {
            match values.get(variable.symbol) {
                Some(value) if value.is_finite() => {}
                Some(_) => {
                    return Err(Error::BadRequest(format!(
                        "Value for '{}' must be a finite number",
                        variable.symbol
                    )));
                }
                None => {
                    return Err(Error::BadRequest(format!(
                        "Missing value for '{}'",
                        variable.symbol
                    )));
                }
            }
        }

        let inputs = Inputs(values);
        let solution = match self.solver {
            Solver::Value(solve) => solve(target, &inputs)
                .filter(|v| v.is_finite())
                .map(Solution::Value),
            Solver::Roots(solve) => solve(&inputs)
                .filter(|(r1, r2)| r1.is_finite() && r2.is_finite())
                .map(|(root1, root2)| Solution::Roots { root1, root2 }),
        };

        solution.ok_or_else(|| {
            Error::Unsolvable(format!("no real solution for '{target}' with these values"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn value(solution: Solution) -> f64 {
        match solution {
            Solution::Value(v) => v,
            Solution::Roots { .. } => panic!("expected a single value"),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_every_formula_is_reachable_by_id() {
        for category in &CATEGORIES {
            assert!(!category.formulas.is_empty(), "{} is empty", category.id);
            for formula in category.formulas {
                assert_eq!(find(formula.id).unwrap().name, formula.name);
            }
        }
        assert!(find("perpetual_motion").is_none());
    }

    #[test]
    fn test_solvable_targets_are_declared_variables() {
        for category in &CATEGORIES {
            for formula in category.formulas {
                if let Solver::Value(_) = formula.solver {
                    for target in formula.solvable_for {
                        assert!(
                            formula.variables.iter().any(|v| v.symbol == *target),
                            "{} lists undeclared target {target}",
                            formula.id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_circle_area_both_ways() {
        let formula = find("circle_area").unwrap();

        let area = value(formula.solve("A", &values(&[("r", 2.0)])).unwrap());
        assert!(close(area, std::f64::consts::PI * 4.0));

        let radius = value(formula.solve("r", &values(&[("A", area)])).unwrap());
        assert!(close(radius, 2.0));
    }

    #[test]
    fn test_simple_interest_rearrangements() {
        let formula = find("simple_interest").unwrap();

        let si = formula
            .solve("SI", &values(&[("P", 1000.0), ("R", 5.0), ("T", 3.0)]))
            .unwrap();
        assert_eq!(si, Solution::Value(150.0));

        let t = formula
            .solve("T", &values(&[("SI", 150.0), ("P", 1000.0), ("R", 5.0)]))
            .unwrap();
        assert_eq!(t, Solution::Value(3.0));
    }

    #[test]
    fn test_angles_are_in_degrees() {
        let formula = find("sine").unwrap();
        let opposite = value(
            formula
                .solve("opposite", &values(&[("θ", 30.0), ("hypotenuse", 10.0)]))
                .unwrap(),
        );
        assert!(close(opposite, 5.0));

        let theta = value(
            formula
                .solve("θ", &values(&[("opposite", 5.0), ("hypotenuse", 10.0)]))
                .unwrap(),
        );
        assert!(close(theta, 30.0));
    }

    #[test]
    fn test_heron_and_pythagoras() {
        let heron = find("triangle_area_heron").unwrap();
        let area = heron
            .solve("A", &values(&[("a", 3.0), ("b", 4.0), ("c", 5.0)]))
            .unwrap();
        assert_eq!(area, Solution::Value(6.0));

        let pythagoras = find("pythagoras").unwrap();
        let hyp = pythagoras
            .solve("a", &values(&[("b", 3.0), ("c", 4.0)]))
            .unwrap();
        assert_eq!(hyp, Solution::Value(5.0));
    }

    #[test]
    fn test_quadratic_returns_both_roots() {
        let formula = find("quadratic_roots").unwrap();
        let roots = formula
            .solve("x", &values(&[("a", 1.0), ("b", -3.0), ("c", 2.0)]))
            .unwrap();
        assert_eq!(
            roots,
            Solution::Roots {
                root1: 2.0,
                root2: 1.0
            }
        );
    }

    #[test]
    fn test_negative_discriminant_is_unsolvable() {
        let formula = find("quadratic_roots").unwrap();
        let result = formula.solve("x", &values(&[("a", 1.0), ("b", 0.0), ("c", 1.0)]));
        assert!(matches!(result, Err(Error::Unsolvable(_))));
    }

    #[test]
    fn test_impossible_triangle_is_unsolvable() {
        // Leg longer than the hypotenuse.
        let formula = find("pythagoras").unwrap();
        let result = formula.solve("b", &values(&[("a", 3.0), ("c", 4.0)]));
        assert!(matches!(result, Err(Error::Unsolvable(_))));
    }

    #[test]
    fn test_division_by_zero_is_unsolvable() {
        let formula = find("prism_volume").unwrap();
        let result = formula.solve("h", &values(&[("V", 10.0), ("A", 0.0)]));
        assert!(matches!(result, Err(Error::Unsolvable(_))));
    }

    #[test]
    fn test_missing_input_is_bad_request() {
        let formula = find("cylinder_volume").unwrap();
        let result = formula.solve("V", &values(&[("r", 1.0)]));
        match result {
            Err(Error::BadRequest(message)) => assert!(message.contains("'h'")),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_input_is_bad_request() {
        let formula = find("cylinder_volume").unwrap();
        let result = formula.solve("V", &values(&[("r", f64::INFINITY), ("h", 1.0)]));
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_unsupported_target_is_bad_request() {
        // Heron's formula only rearranges for the area.
        let formula = find("triangle_area_heron").unwrap();
        let result = formula.solve("a", &values(&[("A", 6.0), ("b", 4.0), ("c", 5.0)]));
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_solution_serializes_flat() {
        assert_eq!(serde_json::to_string(&Solution::Value(2.5)).unwrap(), "2.5");
        assert_eq!(
            serde_json::to_string(&Solution::Roots {
                root1: 2.0,
                root2: 1.0
            })
            .unwrap(),
            r#"{"root1":2.0,"root2":1.0}"#
        );
    }
}
