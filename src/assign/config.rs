//! Assignment run configuration.

use crate::mip::SolverConfig;
use std::time::Duration;

/// Configuration for one assignment invocation.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_assign::assign::AssignConfig;
///
/// let config = AssignConfig::default()
///     .with_time_limit(Duration::from_secs(60))
///     .with_mip_gap(0.0)
///     .with_warm_start(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignConfig {
    /// Wall-clock budget for the solver.
    pub time_limit: Duration,

    /// Relative optimality gap accepted by the solver.
    pub mip_gap: f64,

    /// Whether to hand the round-robin start hint to the solver.
    pub warm_start: bool,

    /// Whether to verify the extracted assignment before accepting it.
    pub check_solution: bool,
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(300),
            mip_gap: 0.01,
            warm_start: true,
            check_solution: true,
        }
    }
}

impl AssignConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = gap;
        self
    }

    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    pub fn with_check_solution(mut self, enabled: bool) -> Self {
        self.check_solution = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit.is_zero() {
            return Err("time_limit must be positive".into());
        }
        if !(0.0..1.0).contains(&self.mip_gap) {
            return Err(format!("mip_gap must be in [0, 1), got {}", self.mip_gap));
        }
        Ok(())
    }

    /// Backend settings derived from this configuration.
    pub fn solver_config(&self) -> SolverConfig {
        let ms = i64::try_from(self.time_limit.as_millis()).unwrap_or(i64::MAX).max(1);
        SolverConfig::default()
            .with_time_limit_ms(ms)
            .with_mip_gap(self.mip_gap)
            .with_hint(self.warm_start)
    }
}
