#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]
#![doc = include_str!("../README.md")]

/// Event logs and their external readers (XES, inline CSV-like format).
pub mod event_log;

/// The Petri net runtime: places, transitions, arcs, tokens.
pub mod petri_net;

/// The α-algorithm: discovers a workflow net from an event log.
pub mod alpha;

/// Token-based-replay conformance checking between a log and a net.
pub mod conformance;

/// Directly-follows graph, an auxiliary view of a log.
pub mod dfg;
