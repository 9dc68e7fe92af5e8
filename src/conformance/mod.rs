//! Token-based-replay conformance checking: how well does a log fit a mined (or hand-built)
//! workflow net?
//!
//! [`fitness_token_replay`] replays every distinct trace in a log against a [`PetriNet`], counting
//! tokens produced, consumed, missing (force-added so a transition could fire), and remaining,
//! then aggregates these counts across the whole log into a fitness value in `[0, 1]`.

use std::fmt;

use crate::event_log::{Event, Log, Trace};
use crate::petri_net::PetriNet;

/// A replay-time invariant was violated. Only happens against a net that isn't a sound workflow
/// net; a net produced by [`crate::alpha::mine`] never triggers this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The `(consumed > produced + missing) || (consumed < missing)` check broke during replay,
    /// or the post-replay balance `produced + missing - consumed == remaining` didn't hold.
    Violation,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Violation => write!(f, "token replay invariant violated"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// Per-distinct-trace bookkeeping accumulated during replay. Two traces share a `TraceProperties`
/// entry iff they're element-wise equal as sequences of [`Event`]; `occurrences` counts how many
/// cases in the log shared that sequence.
#[derive(Debug, Clone)]
pub struct TraceProperties {
    trace: Trace,
    occurrences: u64,
    missing: u64,
    consumed: u64,
    remaining: u64,
    produced: u64,
}

impl TraceProperties {
    fn new(trace: Trace) -> Self {
        Self {
            trace,
            occurrences: 1,
            missing: 0,
            consumed: 0,
            remaining: 0,
            produced: 0,
        }
    }

    /// The task-name sequence this entry was built from.
    pub fn trace(&self) -> &[Event] {
        &self.trace
    }

    /// Number of cases in the log whose trace equals [`Self::trace`].
    pub fn occurrences(&self) -> u64 {
        self.occurrences
    }

    /// Tokens force-added to make an unreplayable transition fire.
    pub fn missing(&self) -> u64 {
        self.missing
    }

    /// Tokens consumed across all firings during this trace's replay.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Tokens left on the net after the trace finished replaying.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Tokens produced across all firings during this trace's replay.
    pub fn produced(&self) -> u64 {
        self.produced
    }
}

impl PartialEq for TraceProperties {
    fn eq(&self, other: &Self) -> bool {
        self.trace == other.trace
    }
}
impl Eq for TraceProperties {}

/// Group `log` into one [`TraceProperties`] per distinct task-name sequence, counting
/// occurrences. Case-id order does not affect the result.
fn trace_properties_table(log: &Log) -> Vec<TraceProperties> {
    let mut table: Vec<TraceProperties> = Vec::new();
    for trace in log.values() {
        match table.iter_mut().find(|p| p.trace == *trace) {
            Some(existing) => existing.occurrences += 1,
            None => table.push(TraceProperties::new(trace.clone())),
        }
    }
    table
}

/// Replay one trace against `net`, from an empty marking, leaving the net empty again on return.
fn replay_one(net: &mut PetriNet, props: &mut TraceProperties) -> Result<(), ReplayError> {
    let mut p: i64 = 0;
    let mut c: i64 = 0;
    let mut m: i64 = 0;
    let mut r: i64 = 0;

    net.add_marking(0);
    p += 1;

    for event in &props.trace {
        let Some(t_id) = net.transition_name_to_id(&event.task) else {
            continue;
        };

        let dot_t = net.dot_t(t_id);
        let t_dot = net.t_dot(t_id);

        if !net.is_enabled(t_id) {
            for place in &dot_t {
                if net.get_tokens(*place) == 0 {
                    net.add_marking(*place);
                    m += 1;
                }
            }
        }

        net.fire_transition(t_id);
        c += dot_t.len() as i64;
        p += t_dot.len() as i64;

        if (c > p + m) || (c < m) {
            net.clear_tokens();
            return Err(ReplayError::Violation);
        }
    }

    let found = net.consume_end_place_token();
    c += 1;
    if !found {
        m += 1;
    }

    r += net.get_remaining_tokens() as i64;
    net.clear_tokens();

    props.missing = m as u64;
    props.consumed = c as u64;
    props.remaining = r as u64;
    props.produced = p as u64;

    if p + m - c != r {
        return Err(ReplayError::Violation);
    }
    Ok(())
}

/// Replay every distinct trace in `log` against `net`, returning the aggregate fitness in
/// `[0, 1]` (higher is better). `net`'s marking is reset between traces and left empty on return.
/// An event with no matching transition in `net` is skipped rather than erroring.
pub fn fitness_token_replay(log: &Log, net: &mut PetriNet) -> Result<f64, ReplayError> {
    let mut table = trace_properties_table(log);
    for props in &mut table {
        replay_one(net, props)?;
    }
    Ok(calculate_fitness(&table))
}

fn calculate_fitness(table: &[TraceProperties]) -> f64 {
    let mut nm: u64 = 0;
    let mut nc: u64 = 0;
    let mut nr: u64 = 0;
    let mut np: u64 = 0;
    for props in table {
        nm += props.occurrences * props.missing;
        nc += props.occurrences * props.consumed;
        nr += props.occurrences * props.remaining;
        np += props.occurrences * props.produced;
    }

    if nc == 0 || np == 0 {
        return 1.0;
    }

    0.5 * (1.0 - nm as f64 / nc as f64) + 0.5 * (1.0 - nr as f64 / np as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha;
    use crate::event_log::log_from_tasks;

    #[test]
    fn perfectly_fitting_log_scores_one() {
        let log = log_from_tasks([
            ("c1", vec!["A", "B", "C"]),
            ("c2", vec!["A", "B", "C"]),
        ]);
        let mut net = alpha::mine(&log);
        let fitness = fitness_token_replay(&log, &mut net).unwrap();
        assert!((fitness - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_log_scores_one_by_convention() {
        let log = Log::new();
        let mut net = PetriNet::new();
        let fitness = fitness_token_replay(&log, &mut net).unwrap();
        assert_eq!(fitness, 1.0);
    }

    #[test]
    fn net_marking_is_reset_between_traces() {
        let log = log_from_tasks([
            ("c1", vec!["A", "B"]),
            ("c2", vec!["A", "B"]),
            ("c3", vec!["A", "B"]),
        ]);
        let mut net = alpha::mine(&log);
        fitness_token_replay(&log, &mut net).unwrap();
        assert_eq!(net.get_remaining_tokens(), 0);
    }

    #[test]
    fn scenario_choice_construct_replays_with_full_fitness() {
        // record issue -> inspection -> intervention authorization -> one of three branches ->
        // issue completion.
        let log = log_from_tasks([
            (
                "c1",
                vec![
                    "record issue",
                    "inspection",
                    "intervention authorization",
                    "work mandate",
                    "work completion",
                    "issue completion",
                ],
            ),
            (
                "c2",
                vec![
                    "record issue",
                    "inspection",
                    "intervention authorization",
                    "no concession",
                    "issue completion",
                ],
            ),
            (
                "c3",
                vec![
                    "record issue",
                    "inspection",
                    "intervention authorization",
                    "action not required",
                    "issue completion",
                ],
            ),
        ]);
        let mut net = alpha::mine(&log);
        let fitness = fitness_token_replay(&log, &mut net).unwrap();
        assert!((fitness - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_deviating_trace_reduces_fitness() {
        let training = log_from_tasks([
            ("c1", vec!["A", "B", "C"]),
            ("c2", vec!["A", "B", "C"]),
        ]);
        let net_model = alpha::mine(&training);

        let observed = log_from_tasks([
            ("c1", vec!["A", "B", "C"]),
            ("c2", vec!["A", "C"]), // skips B
        ]);
        let mut net = net_model;
        let fitness = fitness_token_replay(&observed, &mut net).unwrap();
        assert!(fitness < 1.0);
    }

    #[test]
    fn trace_properties_groups_identical_sequences() {
        let log = log_from_tasks([
            ("c1", vec!["A", "B"]),
            ("c2", vec!["A", "B"]),
            ("c3", vec!["A", "C"]),
        ]);
        let table = trace_properties_table(&log);
        assert_eq!(table.len(), 2);
        let occurrences: Vec<u64> = {
            let mut v: Vec<u64> = table.iter().map(|p| p.occurrences()).collect();
            v.sort();
            v
        };
        assert_eq!(occurrences, vec![1, 2]);
    }
}
