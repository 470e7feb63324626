//! Optimizer snapshots and the ordering normalizer.
//!
//! Snapshots arrive from different optimizer families with different field
//! names for the same thing: tabu search and annealing record a
//! `current_solution`, genetic search records `candidate_solution` and
//! `best_solution`. [`normalize`] is the only place that knows these names.
//! Everything downstream consumes a plain [`Ordering`].
//!
//! Snapshots are kept as raw JSON values so that an unexpected shape in one
//! field never prevents reading the others.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordering fields of a history snapshot, in priority order.
pub const SNAPSHOT_ORDERING_FIELDS: &[&str] =
    &["current_solution", "candidate_solution", "best_solution"];

/// Ordering fields of a best-solution object, in priority order. An
/// array-shaped best solution is tried after all of these.
pub const BEST_ORDERING_FIELDS: &[&str] = &[
    "path",
    "current_solution",
    "candidate_solution",
    "best_solution",
];

/// A sequence of node or task indices.
///
/// Entries are guaranteed to be non-negative integers, but may still lie
/// outside the valid index range of the problem instance. Renderers filter
/// those with [`Ordering::valid_indices`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ordering(Vec<usize>);

impl Ordering {
    /// Create an ordering from indices.
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Number of entries, including out-of-range ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ordering has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw indices.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Indices that address one of `n` elements, in order.
    pub fn valid_indices(&self, n: usize) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied().filter(move |&i| i < n)
    }

    /// Whether this is a permutation of `0..n`.
    #[must_use]
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.0.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &i in &self.0 {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

impl From<Vec<usize>> for Ordering {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Anything an ordering can be extracted from.
pub trait OrderingSource {
    /// The best available ordering, or `None` if none can be found.
    fn ordering(&self) -> Option<Ordering>;
}

/// Normalize an optional source into an ordering.
///
/// Accepts a snapshot, a best solution, or nothing. Never fails; missing or
/// malformed fields simply yield `None`.
pub fn normalize<S: OrderingSource + ?Sized>(source: Option<&S>) -> Option<Ordering> {
    source.and_then(OrderingSource::ordering)
}

/// Read the first field in `fields` that holds an array.
fn ordering_from_fields(value: &Value, fields: &[&str]) -> Option<Ordering> {
    fields
        .iter()
        .find_map(|field| value.get(*field).and_then(Value::as_array))
        .map(|entries| ordering_from_array(entries))
}

fn ordering_from_array(entries: &[Value]) -> Ordering {
    let mut indices = Vec::with_capacity(entries.len());
    for entry in entries {
        match index_of(entry) {
            Some(i) => indices.push(i),
            None => tracing::warn!(%entry, "dropping non-index ordering entry"),
        }
    }
    Ordering(indices)
}

fn index_of(entry: &Value) -> Option<usize> {
    if let Some(i) = entry.as_u64() {
        return usize::try_from(i).ok();
    }
    let f = entry.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 {
        Some(f as usize)
    } else {
        None
    }
}

fn number_array(value: Option<&Value>) -> Option<Vec<Option<f64>>> {
    value.and_then(Value::as_array).map(|entries| {
        entries
            .iter()
            .map(|v| v.as_f64().filter(|f| f.is_finite()))
            .collect()
    })
}

/// One recorded optimizer state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Value);

impl Snapshot {
    /// Wrap a raw snapshot value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw snapshot.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Iteration number, if recorded.
    #[must_use]
    pub fn iteration(&self) -> Option<u64> {
        self.0.get("iter").and_then(Value::as_u64)
    }

    /// Cost of the current solution, if recorded.
    #[must_use]
    pub fn current_cost(&self) -> Option<f64> {
        self.0.get("current_cost").and_then(Value::as_f64)
    }

    /// Best cost so far, if recorded.
    #[must_use]
    pub fn best_cost(&self) -> Option<f64> {
        self.0.get("best_cost").and_then(Value::as_f64)
    }

    /// Per-task durations and due dates (scheduling snapshots only).
    ///
    /// `durations` may be a plain array, or an object carrying
    /// `durations` and `due` arrays. Due dates may also sit at the top
    /// level as `due` or `due_dates`.
    #[must_use]
    pub fn task_data(&self) -> Option<TaskData> {
        task_data_of(&self.0)
    }
}

fn task_data_of(value: &Value) -> Option<TaskData> {
    let raw = value.get("durations")?;
    let (durations, nested_due) = match raw {
        Value::Array(_) => (number_array(Some(raw))?, None),
        Value::Object(_) => (
            number_array(raw.get("durations"))?,
            number_array(raw.get("due").or_else(|| raw.get("due_dates"))),
        ),
        _ => return None,
    };
    let due_dates = nested_due
        .or_else(|| number_array(value.get("due")))
        .or_else(|| number_array(value.get("due_dates")))
        .unwrap_or_default();
    Some(TaskData {
        durations,
        due_dates,
    })
}

impl OrderingSource for Snapshot {
    fn ordering(&self) -> Option<Ordering> {
        ordering_from_fields(&self.0, SNAPSHOT_ORDERING_FIELDS)
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Durations and due dates indexed by task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskData {
    durations: Vec<Option<f64>>,
    due_dates: Vec<Option<f64>>,
}

impl TaskData {
    /// Build from plain arrays.
    #[must_use]
    pub fn new(durations: Vec<f64>, due_dates: Vec<f64>) -> Self {
        Self {
            durations: durations.into_iter().map(Some).collect(),
            due_dates: due_dates.into_iter().map(Some).collect(),
        }
    }

    /// Duration of task `index`, if present and usable.
    #[must_use]
    pub fn duration(&self, index: usize) -> Option<f64> {
        self.durations
            .get(index)
            .copied()
            .flatten()
            .filter(|d| *d >= 0.0)
    }

    /// Due date of task `index`, if declared.
    #[must_use]
    pub fn due_date(&self, index: usize) -> Option<f64> {
        self.due_dates.get(index).copied().flatten()
    }

    /// Number of tasks with a duration slot.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.durations.len()
    }
}

/// The optimizer's final answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestSolution(Value);

impl BestSolution {
    /// Wrap a raw best-solution value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Best solution given only an ordering and its cost.
    #[must_use]
    pub fn from_ordering(ordering: &Ordering, cost: f64) -> Self {
        Self(serde_json::json!({
            "best_solution": ordering.as_slice(),
            "best_cost": cost,
        }))
    }

    /// The raw value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Scalar cost, read from `best_cost` then `cost`.
    #[must_use]
    pub fn cost(&self) -> Option<f64> {
        self.0
            .get("best_cost")
            .and_then(Value::as_f64)
            .or_else(|| self.0.get("cost").and_then(Value::as_f64))
    }

    /// Durations and due dates, when the best solution carries them.
    #[must_use]
    pub fn task_data(&self) -> Option<TaskData> {
        task_data_of(&self.0)
    }
}

impl OrderingSource for BestSolution {
    fn ordering(&self) -> Option<Ordering> {
        ordering_from_fields(&self.0, BEST_ORDERING_FIELDS)
            .or_else(|| self.0.as_array().map(|entries| ordering_from_array(entries)))
    }
}

impl From<Value> for BestSolution {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Ordered snapshots of one optimization run.
///
/// Cheap to clone; the snapshots are shared, never copied or mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Snapshot>", into = "Vec<Snapshot>")]
pub struct History(Arc<[Snapshot]>);

impl Default for History {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl History {
    /// Empty history.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Snapshot at `step`.
    #[must_use]
    pub fn get(&self, step: usize) -> Option<&Snapshot> {
        self.0.get(step)
    }

    /// First snapshot.
    #[must_use]
    pub fn first(&self) -> Option<&Snapshot> {
        self.0.first()
    }

    /// Last snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&Snapshot> {
        self.0.last()
    }

    /// Iterate snapshots in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.0.iter()
    }

    /// Whether two handles share the same snapshots.
    #[must_use]
    pub fn same_run(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<Snapshot>> for History {
    fn from(snapshots: Vec<Snapshot>) -> Self {
        Self(snapshots.into())
    }
}

impl From<History> for Vec<Snapshot> {
    fn from(history: History) -> Self {
        history.0.to_vec()
    }
}

impl FromIterator<Snapshot> for History {
    fn from_iter<I: IntoIterator<Item = Snapshot>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn entry() -> impl Strategy<Value = Value> {
        prop_oneof![
            (0u64..1000).prop_map(Value::from),
            (-1000i64..0).prop_map(Value::from),
            (-10.0f64..10.0).prop_map(Value::from),
            "[a-z]{0,4}".prop_map(Value::from),
            Just(Value::Null),
        ]
    }

    proptest! {
        /// Whatever the entries, normalization yields exactly the
        /// non-negative integers, in order.
        #[test]
        fn prop_normalize_keeps_only_indices(entries in proptest::collection::vec(entry(), 0..30)) {
            let expected: Vec<usize> = entries.iter().filter_map(index_of).collect();
            let snap = Snapshot::new(json!({ "candidate_solution": entries }));
            let ordering = normalize(Some(&snap));
            prop_assert_eq!(ordering.map(|o| o.as_slice().to_vec()), Some(expected));
        }

        /// Snapshots without any ordering field never produce one.
        #[test]
        fn prop_no_field_no_ordering(iter in 0u64..1000, cost in 0.0f64..1e6) {
            let snap = Snapshot::new(json!({ "iter": iter, "current_cost": cost }));
            prop_assert!(snap.ordering().is_none());
            prop_assert_eq!(snap.iteration(), Some(iter));
        }
    }
}
