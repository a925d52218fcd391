//! Pause gates: withhold a settled chain's drain behind an explicit signal.
//!
//! A gate decouples "the upstream node has settled" from "downstream
//! handlers may run". The gate node stays pending until released, so
//! continuations registered on it (or anywhere downstream of it) queue up
//! normally even when the upstream parent settled long ago. The parent's
//! settlement is stashed in the gate until `resume`, at which point the
//! gate node adopts it and drains the held queue like any ordinary node.
//!
//! Release order is the only subtlety:
//!
//! - parent settles first, then `resume`: the stash is taken and the gate
//!   drains inside the `resume` call.
//! - `resume` first, then parent settles: the gate is marked released and
//!   behaves like an ordinary pending node; the parent's settlement flows
//!   straight through the moment it arrives.
//!
//! Releasing twice is idempotent. The [`GateHandle`] is type-erased so a
//! chain tail of any value type can carry its upstream gate's release
//! capability.

use crate::node::{self, Node, NodeRef, Reaction};
use crate::settlement::Settlement;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Gate bookkeeping, shared between the parent reaction and the handle.
struct GateState<T, E> {
    released: bool,
    held: Option<Settlement<T, E>>,
}

/// Type-erased release capability for one pause gate.
///
/// Cloned into every promise chained downstream of the gate, so `resume`
/// on a chain tail releases the nearest upstream gate.
#[derive(Clone)]
pub(crate) struct GateHandle {
    release: Rc<dyn Fn()>,
}

impl GateHandle {
    /// Releases the gate. Idempotent.
    pub(crate) fn release(&self) {
        (self.release)();
    }
}

impl fmt::Debug for GateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GateHandle")
    }
}

/// Inserts a gate below `parent`: returns the withheld gate node and its
/// release handle.
pub(crate) fn gate<T, E>(parent: &NodeRef<T, E>) -> (NodeRef<T, E>, GateHandle)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let gate_node = Node::pending();
    let state = Rc::new(RefCell::new(GateState {
        released: false,
        held: None,
    }));

    // Parent settlement flows into the gate: stash while withheld, pass
    // straight through once released.
    let reaction: Reaction<T, E> = {
        let state = Rc::clone(&state);
        let gate_node = Rc::clone(&gate_node);
        Box::new(move |outcome| {
            let release_now = {
                let mut gate = state.borrow_mut();
                if gate.released {
                    true
                } else {
                    tracing::trace!("gate withholding upstream settlement");
                    gate.held = Some(outcome.clone());
                    false
                }
            };
            if release_now {
                node::settle(&gate_node, outcome.clone());
            }
        })
    };
    node::register(parent, reaction);

    let release = {
        let gate_node = Rc::clone(&gate_node);
        move || {
            let held = {
                let mut gate = state.borrow_mut();
                if gate.released {
                    tracing::trace!("resume on released gate ignored");
                    return;
                }
                gate.released = true;
                gate.held.take()
            };
            tracing::debug!(settled_upstream = held.is_some(), "pause gate released");
            if let Some(outcome) = held {
                node::settle(&gate_node, outcome);
            }
        }
    };
    let handle = GateHandle {
        release: Rc::new(release),
    };
    (gate_node, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_withholds_settled_parent() {
        let parent: NodeRef<i32, &str> = Node::pending();
        node::settle(&parent, Settlement::Fulfilled(3));

        let (gated, handle) = gate(&parent);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        node::register(
            &gated,
            Box::new(move |outcome| {
                sink.borrow_mut().push(*outcome.value().expect("fulfilled"));
            }),
        );

        assert!(seen.borrow().is_empty());
        handle.release();
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn release_before_parent_settles_passes_straight_through() {
        let parent: NodeRef<i32, &str> = Node::pending();
        let (gated, handle) = gate(&parent);

        handle.release();
        assert_eq!(gated.borrow().state_name(), "pending");

        node::settle(&parent, Settlement::Rejected("boom"));
        assert_eq!(gated.borrow().state_name(), "rejected");
    }

    #[test]
    fn release_is_idempotent() {
        let parent: NodeRef<i32, &str> = Node::pending();
        node::settle(&parent, Settlement::Fulfilled(1));

        let (gated, handle) = gate(&parent);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        node::register(&gated, Box::new(move |_| *sink.borrow_mut() += 1));

        handle.release();
        handle.release();
        assert_eq!(*count.borrow(), 1);
    }
}
