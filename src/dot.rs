//! GraphViz export.
//!
//! Renders the transition graph as DOT text for external visualization.
//! The start state is drawn as a filled double-circle in light blue,
//! accept states as filled double-circles in light green, and epsilon
//! edges are labeled with a lowercase epsilon.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::automaton::{Automaton, Transition, TransitionKind};

impl Automaton {
    /// The graph as GraphViz DOT text.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{}\" {{", self.name());
        out.push_str("    rankdir=LR;\n");
        out.push_str("    node [shape=circle];\n\n");

        for sid in self.states() {
            let state = self.state(&sid).expect("listed state exists");
            let is_start = self.start_state().is_valid() && *self.start_state() == sid;
            let is_accept = self.is_accept_state(&sid);

            let _ = write!(out, "    {} [", sid.value());
            if is_start || is_accept {
                out.push_str("shape=doublecircle, ");
            }
            if is_start {
                out.push_str("style=filled, fillcolor=lightblue, ");
            } else if is_accept {
                out.push_str("style=filled, fillcolor=lightgreen, ");
            }
            let _ = write!(out, "label=\"{sid}");
            if !state.description.is_empty() {
                let _ = write!(out, "\\n{}", state.description);
            }
            out.push_str("\"];\n");
        }

        out.push('\n');

        for t in self.transitions() {
            let label = edge_label(t);
            let _ = write!(
                out,
                "    {} -> {} [label=\"{}",
                t.from.value(),
                t.to.value(),
                label
            );
            if t.priority != Transition::PRIORITY_NORMAL {
                let _ = write!(out, "\\n[pri:{}]", t.priority);
            }
            out.push_str("\"];\n");
        }

        out.push_str("}\n");
        out
    }

    /// Write the DOT text to a file.
    pub fn export_dot(&self, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, self.to_dot())
    }
}

fn edge_label(t: &Transition) -> String {
    match &t.kind {
        TransitionKind::Class(class) => class.description().to_string(),
        TransitionKind::Epsilon => "\u{03B5}".to_string(),
        TransitionKind::Sub(sub) => format!("fsa:{}", sub.name()),
    }
}
