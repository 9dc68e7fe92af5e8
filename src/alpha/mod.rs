//! The α-algorithm: derives a sound workflow [`PetriNet`] from the footprint of an event log.
//!
//! Classic α (van der Aalst, 2004) cannot recover short loops: if `a` directly follows `b` and
//! `b` directly follows `a`, neither is causal nor choice, so the pair contributes no place.
//! Known limitation, not a defect (α+/α++ are out of scope).
//!
//! Duplicate task labels and invisible transitions are not supported: every distinct task name
//! becomes exactly one transition.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use uuid::Uuid;

use crate::event_log::Log;
use crate::petri_net::{Endpoint, PetriNet};

/// Discover a workflow net from `log` via the α-algorithm. Empty net if `log` is empty.
pub fn mine(log: &Log) -> PetriNet {
    let log = omit_duplicate_traces(log);
    if log.is_empty() {
        return PetriNet::new();
    }

    let task_names = transition_names(&log);
    let mut net = PetriNet::new();
    let mut name_to_id: HashMap<&str, Uuid> = HashMap::new();
    for name in &task_names {
        let id = net.add_transition(Some(name.clone()), None);
        name_to_id.insert(name.as_str(), id);
    }

    let t_i = initial_task_names(&log);
    let t_o = final_task_names(&log);

    let direct_succession = direct_succession(&log);
    let causal = causal_relation(&direct_succession);
    let choice = choice_relation(&task_names, &direct_succession);

    let y_w = maximal_place_candidates(&task_names, &causal, &choice);

    let source = net.add_place(Some(0));
    let mut next_id = 1;
    let mut place_sets = vec![(source, HashSet::new(), t_i.clone())];

    for (a, b) in &y_w {
        let id = net.add_place(Some(next_id));
        next_id += 1;
        place_sets.push((id, a.clone(), b.clone()));
    }

    let sink = net.add_place(Some(next_id));
    place_sets.push((sink, t_o.clone(), HashSet::new()));

    for (place_id, a, b) in place_sets {
        let a_ids: HashSet<Uuid> = a.iter().filter_map(|n| name_to_id.get(n.as_str()).copied()).collect();
        let b_ids: HashSet<Uuid> = b.iter().filter_map(|n| name_to_id.get(n.as_str()).copied()).collect();
        for t_id in &a_ids {
            net.add_edge(Endpoint::Transition(*t_id), Endpoint::Place(place_id));
        }
        for t_id in &b_ids {
            net.add_edge(Endpoint::Place(place_id), Endpoint::Transition(*t_id));
        }
        net.set_place_sets(place_id, a_ids, b_ids);
    }

    net
}

fn omit_duplicate_traces(log: &Log) -> Log {
    let mut seen: HashSet<Vec<&str>> = HashSet::new();
    let mut kept = Log::new();
    let mut cases: Vec<&String> = log.keys().collect();
    cases.sort();
    for case in cases {
        let trace = &log[case];
        let sequence: Vec<&str> = trace.iter().map(|e| e.task.as_str()).collect();
        if seen.insert(sequence) {
            kept.insert(case.clone(), trace.clone());
        }
    }
    kept
}

fn transition_names(log: &Log) -> Vec<String> {
    let mut names: HashSet<String> = HashSet::new();
    for trace in log.values() {
        for event in trace {
            names.insert(event.task.clone());
        }
    }
    let mut names: Vec<String> = names.into_iter().collect();
    names.sort();
    names
}

fn initial_task_names(log: &Log) -> HashSet<String> {
    log.values()
        .filter_map(|trace| trace.first())
        .map(|e| e.task.clone())
        .collect()
}

fn final_task_names(log: &Log) -> HashSet<String> {
    log.values()
        .filter_map(|trace| trace.last())
        .map(|e| e.task.clone())
        .collect()
}

/// `a > b`: some trace contains `a` immediately followed by `b`.
fn direct_succession(log: &Log) -> HashSet<(String, String)> {
    let mut pairs = HashSet::new();
    for trace in log.values() {
        for window in trace.windows(2) {
            pairs.insert((window[0].task.clone(), window[1].task.clone()));
        }
    }
    pairs
}

/// `a -> b`: `a > b` and not `b > a`.
fn causal_relation(direct: &HashSet<(String, String)>) -> HashSet<(String, String)> {
    direct
        .iter()
        .filter(|(a, b)| !direct.contains(&(b.clone(), a.clone())))
        .cloned()
        .collect()
}

/// `a # b`: neither `a > b` nor `b > a`, including reflexive pairs.
fn choice_relation(
    names: &[String],
    direct: &HashSet<(String, String)>,
) -> HashSet<(String, String)> {
    let mut choices = HashSet::new();
    for a in names {
        for b in names {
            if direct.contains(&(a.clone(), b.clone())) || direct.contains(&(b.clone(), a.clone()))
            {
                continue;
            }
            choices.insert((a.clone(), b.clone()));
        }
    }
    choices
}

type NamedSubset = Vec<String>;

fn all_nonempty_subsets(names: &[String]) -> Vec<NamedSubset> {
    (1..=names.len())
        .flat_map(|k| names.iter().cloned().combinations(k))
        .collect()
}

fn is_candidate_pair(
    a: &[String],
    b: &[String],
    causal: &HashSet<(String, String)>,
    choice: &HashSet<(String, String)>,
) -> bool {
    for a1 in a {
        for a2 in a {
            if !choice.contains(&(a1.clone(), a2.clone())) {
                return false;
            }
        }
        for b1 in b {
            if !causal.contains(&(a1.clone(), b1.clone())) {
                return false;
            }
        }
    }
    for b1 in b {
        for b2 in b {
            if !choice.contains(&(b1.clone(), b2.clone())) {
                return false;
            }
        }
    }
    true
}

/// Computes `Y_W`: the maximal `(A,B)` candidate pairs, with every pair that is a subset of
/// another candidate pair removed.
fn maximal_place_candidates(
    names: &[String],
    causal: &HashSet<(String, String)>,
    choice: &HashSet<(String, String)>,
) -> Vec<(HashSet<String>, HashSet<String>)> {
    let subsets = all_nonempty_subsets(names);

    let mut x_w: Vec<(HashSet<String>, HashSet<String>)> = Vec::new();
    for a in &subsets {
        for b in &subsets {
            if is_candidate_pair(a, b, causal, choice) {
                let a_set: HashSet<String> = a.iter().cloned().collect();
                let b_set: HashSet<String> = b.iter().cloned().collect();
                x_w.push((a_set, b_set));
            }
        }
    }

    let mut y_w = Vec::new();
    for (i, (a, b)) in x_w.iter().enumerate() {
        let dominated = x_w.iter().enumerate().any(|(j, (a_prime, b_prime))| {
            i != j && a.is_subset(a_prime) && b.is_subset(b_prime) && (a != a_prime || b != b_prime)
        });
        if !dominated {
            y_w.push((a.clone(), b.clone()));
        }
    }
    y_w.sort_by_key(|(a, b)| {
        let mut a: Vec<&String> = a.iter().collect();
        let mut b: Vec<&String> = b.iter().collect();
        a.sort();
        b.sort();
        (a.into_iter().cloned().collect::<Vec<_>>(), b.into_iter().cloned().collect::<Vec<_>>())
    });
    y_w.dedup();
    y_w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::log_from_tasks;

    #[test]
    fn mines_a_simple_sequence() {
        let log = log_from_tasks([
            ("c1", vec!["A", "B", "C"]),
            ("c2", vec!["A", "B", "C"]),
        ]);
        let net = mine(&log);
        // source + one place between each pair + sink: A-B, B-C => 2 intermediate places.
        assert_eq!(net.places().count(), 4);
        assert_eq!(net.transitions().count(), 3);

        let a = net.transition_name_to_id("A").unwrap();
        let b = net.transition_name_to_id("B").unwrap();
        let c = net.transition_name_to_id("C").unwrap();
        assert!(!net.dot_t(a).is_empty());
        assert!(net.t_dot(a).iter().any(|p| net.dot_t(b).contains(p)));
        assert!(net.t_dot(b).iter().any(|p| net.dot_t(c).contains(p)));
    }

    #[test]
    fn duplicate_traces_collapse_to_one() {
        let log = log_from_tasks([
            ("c1", vec!["A", "B"]),
            ("c2", vec!["A", "B"]),
            ("c3", vec!["A", "B"]),
        ]);
        let net = mine(&log);
        assert_eq!(net.transitions().count(), 2);
        assert_eq!(net.places().count(), 3);
    }

    #[test]
    fn choice_construct_produces_a_shared_place() {
        let log = log_from_tasks([
            ("c1", vec!["A", "B", "D"]),
            ("c2", vec!["A", "C", "D"]),
        ]);
        let net = mine(&log);
        let a = net.transition_name_to_id("A").unwrap();
        let b = net.transition_name_to_id("B").unwrap();
        let c = net.transition_name_to_id("C").unwrap();
        let d = net.transition_name_to_id("D").unwrap();

        let a_out = net.t_dot(a);
        assert!(net.dot_t(b).is_subset(&a_out) || net.dot_t(b) == a_out);
        assert!(net.dot_t(c).is_subset(&a_out) || net.dot_t(c) == a_out);

        let d_in = net.dot_t(d);
        assert!(net.t_dot(b).is_subset(&d_in) || net.t_dot(b) == d_in);
        assert!(net.t_dot(c).is_subset(&d_in) || net.t_dot(c) == d_in);
    }

    #[test]
    fn empty_log_produces_empty_net() {
        let net = mine(&Log::new());
        assert_eq!(net.places().count(), 0);
        assert_eq!(net.transitions().count(), 0);
    }

    #[test]
    fn short_loops_are_not_recoverable() {
        // a > b and b > a: neither causal nor choice, so no candidate place links them. Only the
        // source (-> A) and sink (B ->) places are built.
        let log = log_from_tasks([("c1", vec!["A", "B", "A", "B"])]);
        let net = mine(&log);
        let a = net.transition_name_to_id("A").unwrap();
        let b = net.transition_name_to_id("B").unwrap();
        assert!(net.t_dot(a).is_empty());
        assert!(net.dot_t(b).is_empty());
        assert_eq!(net.places().count(), 2);
    }
}
