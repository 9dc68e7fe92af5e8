use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A place in a [`PetriNet`]. Hashed/compared by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    id: u64,
    tokens: u64,
    /// Preset transitions, recorded by the Alpha miner (empty for the source place).
    pub a_set: HashSet<Uuid>,
    /// Postset transitions, recorded by the Alpha miner (empty for the sink place).
    pub b_set: HashSet<Uuid>,
}

impl Place {
    fn new(id: u64) -> Self {
        Self {
            id,
            tokens: 0,
            a_set: HashSet::new(),
            b_set: HashSet::new(),
        }
    }

    /// This place's id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Place {}
impl std::hash::Hash for Place {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A transition in a [`PetriNet`], labeled by a task name.
///
/// Identity is a fresh opaque [`Uuid`] minted at construction, so two transitions built from
/// equal-task events in separate calls are distinct values. Hashed/compared by id, not label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    id: Uuid,
    /// Task name this transition represents.
    pub label: Option<String>,
}

impl Transition {
    fn new(id: Uuid, label: Option<String>) -> Self {
        Self { id, label }
    }

    /// This transition's id.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Transition {}
impl std::hash::Hash for Transition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Tagged reference to a place or a transition, used as the source/target of an [`Arc`] so arcs
/// can't connect two places or two transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    /// A place, by id.
    Place(u64),
    /// A transition, by id.
    Transition(Uuid),
}

/// A directed arc between a place and a transition (or vice versa).
pub type Arc = (Endpoint, Endpoint);

/// A Petri net: places and transitions connected by arcs, with tokens held on the places.
///
/// Places and transitions live in id-keyed arenas rather than a graph of pointers; arcs are a
/// flat set of `(Endpoint, Endpoint)` pairs. Structural queries (`dot_t`, `t_dot`, ...) are
/// linear scans over `arcs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PetriNet {
    places: HashMap<u64, Place>,
    transitions: HashMap<Uuid, Transition>,
    arcs: HashSet<Arc>,
    next_place_id: u64,
}

impl PetriNet {
    /// Create an empty net.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places in this net.
    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    /// Transitions in this net.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values()
    }

    /// Arcs in this net.
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.iter()
    }

    /// Add a place (with an optional explicit id). Returns the place's id.
    pub fn add_place(&mut self, id: Option<u64>) -> u64 {
        let id = id.unwrap_or_else(|| {
            while self.places.contains_key(&self.next_place_id) {
                self.next_place_id += 1;
            }
            self.next_place_id
        });
        self.next_place_id = self.next_place_id.max(id + 1);
        self.places.insert(id, Place::new(id));
        id
    }

    /// Add a transition labeled `name` (with an optional explicit id). Returns the transition's id.
    pub fn add_transition(&mut self, name: Option<String>, id: Option<Uuid>) -> Uuid {
        let id = id.unwrap_or_else(Uuid::new_v4);
        self.transitions.insert(id, Transition::new(id, name));
        id
    }

    /// Add a directed arc between a place and a transition (or vice versa).
    pub fn add_edge(&mut self, source: Endpoint, target: Endpoint) {
        self.arcs.insert((source, target));
    }

    /// Record `place_id`'s preset `a` and postset `b`. No-op for an unknown place id.
    pub fn set_place_sets(&mut self, place_id: u64, a: HashSet<Uuid>, b: HashSet<Uuid>) {
        if let Some(place) = self.places.get_mut(&place_id) {
            place.a_set = a;
            place.b_set = b;
        }
    }

    /// Token count at `place_id`, or `0` for an unknown id.
    pub fn get_tokens(&self, place_id: u64) -> u64 {
        self.places.get(&place_id).map_or(0, |p| p.tokens)
    }

    /// Increment the token count at `place_id` by one. No-op for an unknown id.
    pub fn add_marking(&mut self, place_id: u64) {
        if let Some(place) = self.places.get_mut(&place_id) {
            place.tokens += 1;
        }
    }

    /// Set every place's token count to zero.
    pub fn clear_tokens(&mut self) {
        for place in self.places.values_mut() {
            place.tokens = 0;
        }
    }

    /// Sum of all places' token counts.
    pub fn get_remaining_tokens(&self) -> u64 {
        self.places.values().map(|p| p.tokens).sum()
    }

    /// First transition whose label equals `name`, or `None`. Unspecified which, if duplicates exist.
    pub fn transition_name_to_id(&self, name: &str) -> Option<Uuid> {
        self.transitions
            .values()
            .find(|t| t.label.as_deref() == Some(name))
            .map(|t| t.id)
    }

    /// Preset of transition `t_id`: place ids `p` such that `(p, t_id)` is an arc.
    pub fn dot_t(&self, t_id: Uuid) -> HashSet<u64> {
        self.arcs
            .iter()
            .filter_map(|(src, tgt)| match (src, tgt) {
                (Endpoint::Place(p), Endpoint::Transition(t)) if *t == t_id => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Postset of transition `t_id`: place ids `p` such that `(t_id, p)` is an arc.
    pub fn t_dot(&self, t_id: Uuid) -> HashSet<u64> {
        self.arcs
            .iter()
            .filter_map(|(src, tgt)| match (src, tgt) {
                (Endpoint::Transition(t), Endpoint::Place(p)) if *t == t_id => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Preset of place `p_id`: transition ids `t` such that `(t, p_id)` is an arc.
    pub fn preset_of_place(&self, p_id: u64) -> HashSet<Uuid> {
        self.arcs
            .iter()
            .filter_map(|(src, tgt)| match (src, tgt) {
                (Endpoint::Transition(t), Endpoint::Place(p)) if *p == p_id => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// Postset of place `p_id`: transition ids `t` such that `(p_id, t)` is an arc.
    pub fn postset_of_place(&self, p_id: u64) -> HashSet<Uuid> {
        self.arcs
            .iter()
            .filter_map(|(src, tgt)| match (src, tgt) {
                (Endpoint::Place(p), Endpoint::Transition(t)) if *p == p_id => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// True iff every place in `dot_t(t_id)` has a token. Empty preset is vacuously enabled.
    /// An unknown id is never enabled.
    pub fn is_enabled(&self, t_id: Uuid) -> bool {
        if !self.transitions.contains_key(&t_id) {
            return false;
        }
        self.dot_t(t_id).iter().all(|p| self.get_tokens(*p) > 0)
    }

    /// Fire `t_id`: no-op if disabled, else decrement each preset place and increment each
    /// postset place by one.
    pub fn fire_transition(&mut self, t_id: Uuid) {
        if !self.is_enabled(t_id) {
            return;
        }
        let preset = self.dot_t(t_id);
        let postset = self.t_dot(t_id);
        for p in preset {
            if let Some(place) = self.places.get_mut(&p) {
                place.tokens = place.tokens.saturating_sub(1);
            }
        }
        for p in postset {
            if let Some(place) = self.places.get_mut(&p) {
                place.tokens += 1;
            }
        }
    }

    /// All transitions enabled under the current marking, in unspecified order.
    pub fn get_enabled_transitions(&self) -> Vec<Uuid> {
        self.transitions
            .keys()
            .copied()
            .filter(|t| self.is_enabled(*t))
            .collect()
    }

    /// Decrement every sink place (empty postset) that has a token. Returns `true` iff any did.
    pub fn consume_end_place_token(&mut self) -> bool {
        let sinks: Vec<u64> = self
            .places
            .keys()
            .copied()
            .filter(|p| self.postset_of_place(*p).is_empty())
            .collect();
        let mut consumed = false;
        for p in sinks {
            if let Some(place) = self.places.get_mut(&p) {
                if place.tokens > 0 {
                    place.tokens -= 1;
                    consumed = true;
                }
            }
        }
        consumed
    }

    /// Serialize this net to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// Deserialize a net from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
