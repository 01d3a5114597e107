//! 0-1 linear model definition.

use std::collections::HashMap;
use std::fmt;

/// Handle to a variable of a [`MipModel`].
///
/// Handles are dense indices into the model's variable list and are only
/// meaningful for the model that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in the model.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A binary decision variable.
#[derive(Debug, Clone)]
pub struct BinaryVar {
    /// Variable name (for diagnostics and backend export).
    pub name: String,
}

/// A linear expression `Σ coefficient · variable`.
///
/// Repeated variables are kept as separate terms; evaluation sums them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    /// (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of `vars` with unit coefficients.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    /// Adds `coefficient · var`.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Evaluates the expression for a dense assignment of values.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Comparison sense of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `lhs <= rhs`
    LessEq,
    /// `lhs >= rhs`
    GreaterEq,
    /// `lhs == rhs`
    Equal,
}

/// A linear constraint `expr (<=|>=|==) rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Constraint name (for diagnostics).
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Comparison sense.
    pub sense: Sense,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl Constraint {
    /// Whether the constraint holds for `values`, up to `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::LessEq => lhs <= self.rhs + tolerance,
            Sense::GreaterEq => lhs >= self.rhs - tolerance,
            Sense::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Objective function of the model.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize a linear expression.
    Minimize(LinearExpr),
    /// Maximize a linear expression.
    Maximize(LinearExpr),
}

impl Objective {
    /// The objective expression, regardless of direction.
    pub fn expr(&self) -> &LinearExpr {
        match self {
            Objective::Minimize(e) | Objective::Maximize(e) => e,
        }
    }
}

/// A 0-1 integer linear program.
///
/// Contains binary variables, linear constraints, an optional objective
/// and an optional start hint. The model is a plain value: backends
/// read it and never mutate it.
///
/// # Examples
///
/// ```
/// use u_assign::mip::{LinearExpr, MipModel, Objective};
///
/// let mut model = MipModel::new("example");
/// let a = model.add_binary("a");
/// let b = model.add_binary("b");
/// model.add_ge("at_least_one", LinearExpr::sum([a, b]), 1.0);
/// model.set_objective(Objective::Minimize(LinearExpr::sum([a, b])));
/// assert!(model.validate().is_ok());
/// assert_eq!(model.var_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MipModel {
    /// Model name.
    pub name: String,
    /// Binary variables, indexed by [`VarId`].
    pub vars: Vec<BinaryVar>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Objective function.
    pub objective: Option<Objective>,
    /// Start hint: suggested values for some variables.
    pub hint: HashMap<VarId, bool>,
}

impl MipModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            hint: HashMap::new(),
        }
    }

    /// Adds a binary variable and returns its handle.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.vars.push(BinaryVar { name: name.into() });
        VarId(self.vars.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add `expr <= rhs`.
    pub fn add_le(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Sense::LessEq, rhs);
    }

    /// Convenience: add `expr >= rhs`.
    pub fn add_ge(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Sense::GreaterEq, rhs);
    }

    /// Convenience: add `expr == rhs`.
    pub fn add_eq(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Sense::Equal, rhs);
    }

    fn push(&mut self, name: impl Into<String>, expr: LinearExpr, sense: Sense, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        });
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Suggests a start value for `var`.
    pub fn set_hint(&mut self, var: VarId, value: bool) {
        self.hint.insert(var, value);
    }

    /// Dense start values built from the hint, unhinted variables at 0.
    pub fn hint_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.vars.len()];
        for (&var, &value) in &self.hint {
            if let Some(slot) = values.get_mut(var.0) {
                *slot = if value { 1.0 } else { 0.0 };
            }
        }
        values
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all referenced variables exist and all numbers are finite.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.vars.len();
        let check_expr = |expr: &LinearExpr, owner: &str| -> Result<(), String> {
            for &(var, coefficient) in &expr.terms {
                if var.0 >= n {
                    return Err(format!("{owner}: undefined variable {var}"));
                }
                if !coefficient.is_finite() {
                    return Err(format!("{owner}: non-finite coefficient on {var}"));
                }
            }
            Ok(())
        };

        for constraint in &self.constraints {
            check_expr(&constraint.expr, &constraint.name)?;
            if !constraint.rhs.is_finite() {
                return Err(format!("{}: non-finite right-hand side", constraint.name));
            }
        }
        if let Some(objective) = &self.objective {
            check_expr(objective.expr(), "objective")?;
        }
        if let Some(var) = self.hint.keys().find(|v| v.0 >= n) {
            return Err(format!("hint: undefined variable {var}"));
        }
        Ok(())
    }

    /// Whether `values` satisfies every constraint, up to `tolerance`.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        self.constraints
            .iter()
            .all(|c| c.is_satisfied(values, tolerance))
    }

    /// Objective value of `values` (0 without an objective).
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .as_ref()
            .map_or(0.0, |o| o.expr().evaluate(values))
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
