//! Promise node internals: the settle-once state machine and drain engine.
//!
//! A node is the single settleable unit every chain is built from. It holds
//! the tri-state settlement, plus the FIFO list of continuation reactions
//! waiting on it. Two operations cover the whole lifecycle:
//!
//! - [`settle`]: transition `Pending -> Fulfilled/Rejected` exactly once,
//!   then drain every queued reaction synchronously, in registration order,
//!   before returning to the caller that triggered the settlement.
//! - [`register`]: queue a reaction on a pending node, or run it
//!   immediately (still synchronously, on the caller's stack) when the node
//!   has already settled.
//!
//! Draining is depth-first: each reaction settles its own child node, and
//! that child's entire downstream cascade completes before the next
//! reaction on this node starts. Stack depth therefore grows with chain
//! length; that is the documented cost of the synchronous contract, and
//! chains deep enough to threaten the stack belong in an evented system
//! instead.
//!
//! Reentrancy: the reaction list is taken out of the node before any
//! callback runs, so a callback may freely register on or settle the very
//! node that is mid-drain. Registration during a drain sees a settled node
//! and runs immediately; a second settlement attempt is a silent no-op.

use crate::settlement::Settlement;
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

/// A type-erased continuation: consumes the parent's settlement and is
/// responsible for settling exactly one downstream node.
pub(crate) type Reaction<T, E> = Box<dyn FnOnce(&Settlement<T, E>)>;

/// Shared handle to a node. Single-threaded by construction.
pub(crate) type NodeRef<T, E> = Rc<RefCell<Node<T, E>>>;

/// Settlement state. Monotonic: once non-pending, never changes again.
enum State<T, E> {
    Pending,
    Fulfilled(T),
    Rejected(E),
}

/// One settleable unit in a chain.
pub(crate) struct Node<T, E> {
    state: State<T, E>,
    reactions: Vec<Reaction<T, E>>,
}

impl<T, E> Node<T, E> {
    /// Creates a pending node with no continuations.
    pub(crate) fn pending() -> NodeRef<T, E> {
        Rc::new(RefCell::new(Self {
            state: State::Pending,
            reactions: Vec::new(),
        }))
    }

    /// Creates a node born settled (the `resolve`/`reject` factories).
    pub(crate) fn settled(outcome: Settlement<T, E>) -> NodeRef<T, E> {
        let state = match outcome {
            Settlement::Fulfilled(value) => State::Fulfilled(value),
            Settlement::Rejected(error) => State::Rejected(error),
        };
        Rc::new(RefCell::new(Self {
            state,
            reactions: Vec::new(),
        }))
    }

    /// State tag for diagnostics.
    pub(crate) const fn state_name(&self) -> &'static str {
        match self.state {
            State::Pending => "pending",
            State::Fulfilled(_) => "fulfilled",
            State::Rejected(_) => "rejected",
        }
    }

    /// Number of continuations still queued.
    pub(crate) fn queued(&self) -> usize {
        self.reactions.len()
    }
}

/// Settles a node and synchronously drains its continuation queue.
///
/// Settling an already-settled node is a silent no-op, so resolver code
/// that calls `resolve`/`reject` more than once gets first-call-wins
/// semantics without an error surface.
pub(crate) fn settle<T, E>(node: &NodeRef<T, E>, outcome: Settlement<T, E>)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let drained = {
        let mut inner = node.borrow_mut();
        if !matches!(inner.state, State::Pending) {
            tracing::trace!(state = inner.state_name(), "settle on settled node ignored");
            return;
        }
        inner.state = match &outcome {
            Settlement::Fulfilled(value) => State::Fulfilled(value.clone()),
            Settlement::Rejected(error) => State::Rejected(error.clone()),
        };
        mem::take(&mut inner.reactions)
        // borrow released here: reactions may re-enter this node
    };

    tracing::trace!(
        fulfilled = outcome.is_fulfilled(),
        reactions = drained.len(),
        "node settled; draining"
    );
    for reaction in drained {
        reaction(&outcome);
    }
}

/// Registers a reaction: queued while pending, run immediately once
/// settled.
pub(crate) fn register<T, E>(node: &NodeRef<T, E>, reaction: Reaction<T, E>)
where
    T: Clone,
    E: Clone,
{
    let outcome = {
        let mut inner = node.borrow_mut();
        match &inner.state {
            State::Pending => {
                inner.reactions.push(reaction);
                return;
            }
            State::Fulfilled(value) => Settlement::Fulfilled(value.clone()),
            State::Rejected(error) => Settlement::Rejected(error.clone()),
        }
    };
    reaction(&outcome);
}
