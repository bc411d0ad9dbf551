//! Composition: inlining a sub-automaton into a host graph.
//!
//! `merge_automaton(from, to, sub)` rewrites `sub` along the host edge
//! `(from, to)`: the sub's start state maps to `from`, every accept state
//! maps to `to`, the interior states are cloned as fresh Normal states, and
//! the transitions are re-emitted against the mapped endpoints with kind,
//! priority, and description preserved. Nested sub-kind transitions
//! recurse. Composition is structural only; the drivers give the merged
//! edges their meaning.

use rustc_hash::FxHashMap;

use super::graph::{Automaton, StateId, StateRole, TransitionKind};

impl Automaton {
    /// Inline `sub` between two existing host states, returning the ids of
    /// the newly created transitions. Afterwards the host's transition
    /// order is re-sorted by descending priority (stable, so insertion
    /// order survives within equal priority).
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` does not exist in the host.
    pub fn merge_automaton(&mut self, from: &StateId, to: &StateId, sub: &Automaton) -> Vec<u32> {
        assert!(
            self.has_state(from),
            "merge source {from} does not exist in host"
        );
        assert!(
            self.has_state(to),
            "merge destination {to} does not exist in host"
        );

        let mut mapping: FxHashMap<u32, StateId> = FxHashMap::default();
        mapping.insert(sub.start.id, from.clone());
        for accept in &sub.accepts {
            mapping.insert(*accept, to.clone());
        }

        // Clone interior states in id order so fresh ids and derived names
        // come out the same on every merge of the same sub.
        let mut interior: Vec<&super::graph::State> = sub
            .states
            .values()
            .filter(|s| !mapping.contains_key(&s.id.id))
            .collect();
        interior.sort_by_key(|s| s.id.id);
        for state in interior {
            let derived = match state.id.name() {
                Some(name) => format!("{}_from_{}", name, sub.name()),
                None => format!("state_{}_from_{}", state.id.id, sub.name()),
            };
            let new_id = self.add_state_with(&derived, &state.description, StateRole::Normal);
            mapping.insert(state.id.id, new_id);
        }

        let mut new_transitions = Vec::with_capacity(sub.transitions.len());
        for t in &sub.transitions {
            let mapped_from = mapping[&t.from.id].clone();
            let mapped_to = mapping[&t.to.id].clone();
            match &t.kind {
                TransitionKind::Class(class) => {
                    let id = self.add_transition_full(
                        &mapped_from,
                        &mapped_to,
                        class.clone(),
                        &t.description,
                        t.priority,
                    );
                    new_transitions.push(id);
                }
                TransitionKind::Epsilon => {
                    let id = self.add_epsilon_transition(&mapped_from, &mapped_to);
                    new_transitions.push(id);
                }
                TransitionKind::Sub(nested) => {
                    new_transitions.extend(self.merge_automaton(&mapped_from, &mapped_to, nested));
                }
            }
        }

        self.transitions
            .sort_by_key(|t| std::cmp::Reverse(t.priority));
        self.index_dirty = true;

        new_transitions
    }
}
