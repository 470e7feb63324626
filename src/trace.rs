//! Optimizer trace files.
//!
//! A trace is the optimizer's response object:
//!
//! ```json
//! {
//!   "best_solution": [0, 3, 1, 2],
//!   "best_cost": 812.4,
//!   "history": [ { "iter": 0, "current_solution": [0, 1, 2, 3] } ],
//!   "metadata": { "algorithm": "tabu" }
//! }
//! ```
//!
//! Everything except `history` and `metadata` stays on the best solution,
//! so extra fields such as `durations` remain readable there.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::VizResult;
use crate::snapshot::{BestSolution, History};

/// One loaded optimization run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    pub history: History,
    pub best: Option<BestSolution>,
    pub metadata: Value,
}

impl Trace {
    /// Parse a trace from JSON text.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a JSON object or `history` is not
    /// an array.
    pub fn from_json(json: &str) -> VizResult<Self> {
        let mut fields: Map<String, Value> = serde_json::from_str(json)?;

        let history = match fields.remove("history") {
            None | Some(Value::Null) => History::empty(),
            Some(raw) => serde_json::from_value(raw)?,
        };
        let metadata = fields.remove("metadata").unwrap_or(Value::Null);
        let best = match fields.get("best_solution") {
            None | Some(Value::Null) => None,
            Some(_) => Some(BestSolution::new(Value::Object(fields))),
        };

        tracing::debug!(
            steps = history.len(),
            has_best = best.is_some(),
            "trace parsed"
        );
        Ok(Self {
            history,
            best,
            metadata,
        })
    }

    /// Load a trace file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Name of the algorithm that produced the trace, if recorded.
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.metadata.get("algorithm").and_then(Value::as_str)
    }
}
