//! Search configuration and budget control.

use std::time::Duration;

use crate::search::SearchError;

/// Resolved, unambiguous search budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBudget {
    /// Run exactly this many simulations.
    Simulations(u32),
    /// Run full iterations until this much wall-clock time has elapsed.
    /// At least one iteration always completes.
    TimeLimit(Duration),
}

/// Configuration for Monte Carlo Tree Search.
///
/// Exactly one of `max_simulations` and `time_limit` must be set; the engine
/// refuses an ambiguous or empty budget at construction time.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Maximum number of simulations per search.
    pub max_simulations: Option<u32>,

    /// Wall-clock limit per search, measured on a monotonic clock.
    pub time_limit: Option<Duration>,

    /// Exploration constant in the UCT formula. Higher values explore more,
    /// 0.0 is a pure-exploitation search.
    pub exploration: f64,
}

/// Default exploration constant (sqrt 2, the classic UCT choice).
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

impl Default for MctsConfig {
    fn default() -> Self {
        Self::simulations(1000)
    }
}

impl MctsConfig {
    /// Budget by simulation count.
    pub fn simulations(n: u32) -> Self {
        Self {
            max_simulations: Some(n),
            time_limit: None,
            exploration: DEFAULT_EXPLORATION,
        }
    }

    /// Budget by wall-clock time.
    pub fn timed(limit: Duration) -> Self {
        Self {
            max_simulations: None,
            time_limit: Some(limit),
            exploration: DEFAULT_EXPLORATION,
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self::simulations(100)
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Resolve the configured budget, rejecting zero or two budget modes.
    pub fn budget(&self) -> Result<SearchBudget, SearchError> {
        match (self.max_simulations, self.time_limit) {
            (Some(n), None) => Ok(SearchBudget::Simulations(n)),
            (None, Some(limit)) => Ok(SearchBudget::TimeLimit(limit)),
            _ => Err(SearchError::InvalidBudget),
        }
    }
}
