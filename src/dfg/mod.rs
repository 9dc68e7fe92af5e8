//! Directly-follows graph: a lightweight auxiliary view of a log, independent of mining or replay.
//!
//! Not consumed by [`crate::alpha`] or [`crate::conformance`], shipped because every log-analysis
//! crate this one descends from ships a directly-follows view next to its Petri net code.

use std::collections::HashMap;

use crate::event_log::Log;

/// Directly-follows counts within each case: `task -> { successor -> count }`. Summed across the
/// whole log, not deduplicated by trace, so a repeated task contributes once per occurrence.
pub fn dependency_graph(log: &Log) -> HashMap<String, HashMap<String, u32>> {
    let mut dg: HashMap<String, HashMap<String, u32>> = HashMap::new();
    for trace in log.values() {
        let mut prev: Option<&str> = None;
        for event in trace {
            dg.entry(event.task.clone()).or_default();
            if let Some(prev_task) = prev {
                *dg.entry(prev_task.to_string())
                    .or_default()
                    .entry(event.task.clone())
                    .or_insert(0) += 1;
            }
            prev = Some(event.task.as_str());
        }
    }
    dg
}
