//! The Petri net runtime: places, transitions, flow arcs, tokens.
//!
//! Places and transitions never hold references to each other. [`PetriNet`] keeps them in
//! id-keyed arenas and records arcs as a flat set of `(Endpoint, Endpoint)` pairs;
//! `dot_t`/`t_dot`/`preset_of_place`/`postset_of_place` scan `self.arcs` instead of following
//! pointers.

mod petri_net_struct;

pub use petri_net_struct::{Endpoint, Place, PetriNet, Transition};
