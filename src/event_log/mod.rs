//! Event logs: the input format consumed by the Alpha miner and token-replay conformance.
//!
//! A [`Log`] maps an opaque case id to its [`Trace`]. The core only looks at each event's
//! [`Event::task`] field; the other fields just give the external readers in [`xes`] and
//! [`inline`] somewhere to put what they parse.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

/// Reads event logs from the XES XML format.
pub mod xes;

/// Reads event logs from an ad-hoc semicolon-delimited inline format.
pub mod inline;

/// A single recorded activity occurrence within a [`Trace`]. Equal, and hash identically, iff
/// their `task` names are equal.
#[derive(Debug, Clone)]
pub struct Event {
    /// The activity name. The only field the core looks at.
    pub task: String,
    /// Case id, if known (standalone loggers leave this `None`).
    pub case: Option<String>,
    /// When the event occurred.
    pub timestamp: Option<DateTime<Utc>>,
    /// Cost attributed to this event, if recorded.
    pub cost: Option<f64>,
    /// Resources (e.g. users/systems) associated with this event.
    pub resources: Vec<String>,
}

impl Event {
    /// Create a bare event with just a task name.
    pub fn new(task: String) -> Self {
        Self {
            task,
            case: None,
            timestamp: None,
            cost: None,
            resources: Vec::new(),
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.task == other.task
    }
}
impl Eq for Event {}
impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.task.hash(state);
    }
}

/// An ordered, non-empty sequence of [`Event`]s belonging to one case.
pub type Trace = Vec<Event>;

/// Mapping from an opaque case id to its [`Trace`]. Only the multiset of traces matters.
pub type Log = HashMap<String, Trace>;

/// Build a [`Log`] from `(case_id, [task, task, ...])` pairs, for tests and doctests.
pub fn log_from_tasks<I, C, T>(cases: I) -> Log
where
    I: IntoIterator<Item = (C, Vec<T>)>,
    C: Into<String>,
    T: Into<String>,
{
    cases
        .into_iter()
        .map(|(case, tasks)| {
            let trace = tasks.into_iter().map(|t| Event::new(t.into())).collect();
            (case.into(), trace)
        })
        .collect()
}
