//! The promise handle and its chain operations.
//!
//! A [`Promise`] is a cloneable handle to one settle-once node. Every
//! chain operation (`then`, `then_else`, `catch`, `finally`,
//! `try_finally`, `pause`) creates exactly one new child node and one
//! continuation linking parent to child, and every handler runs
//! immediately and synchronously: on the registering caller's stack when
//! the parent has already settled, otherwise on the stack of whoever
//! eventually settles the root. There is no microtask queue and nothing
//! ever yields.
//!
//! Propagation follows the native model:
//!
//! - a rejection skips fulfillment-only handlers until it meets a
//!   rejection handler or a `finally`;
//! - a handled rejection does not re-propagate — the handler's [`Step`]
//!   settles the child;
//! - `finally` observes without altering what flows through it.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use synchromise::{Promise, Step};
//!
//! let greeting = Promise::<_, ()>::new(|root| root.resolve("x"))
//!     .then(|v| Step::Value(format!("{v}y")));
//!
//! let seen = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&seen);
//! greeting.then(move |v| {
//!     *sink.borrow_mut() = Some(v);
//!     Step::Value(())
//! });
//! // the handler already ran: there is no event loop to wait on
//! assert_eq!(*seen.borrow(), Some("xy".to_string()));
//! ```

use crate::deferred::Deferred;
use crate::error::NotPaused;
use crate::gate::{self, GateHandle};
use crate::node::{self, Node, NodeRef, Reaction};
use crate::settlement::{Settlement, Step};
use std::fmt;
use std::rc::Rc;

/// A synchronously-settling promise node.
///
/// `T` is the fulfillment value type, `E` the rejection error type; both
/// must be `Clone` because one node can feed several continuations. The
/// handle is `Clone` (shared ownership of the same node) and deliberately
/// not `Send`: execution is single-threaded by contract.
pub struct Promise<T, E> {
    node: NodeRef<T, E>,
    gate: Option<GateHandle>,
}

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a promise and runs `init` synchronously, before returning,
    /// with the root's settle capability.
    ///
    /// ```
    /// use synchromise::Promise;
    ///
    /// let p = Promise::<&str, ()>::new(|root| root.resolve("ready"));
    /// ```
    pub fn new(init: impl FnOnce(&Deferred<T, E>)) -> Self {
        let (promise, control) = Self::unresolved();
        init(&control);
        promise
    }

    /// Like [`new`](Self::new), but an `Err` from the initializer rejects
    /// a still-pending root. An initializer that settles the root first
    /// wins; the late `Err` is then ignored.
    pub fn try_new(init: impl FnOnce(&Deferred<T, E>) -> Result<(), E>) -> Self {
        let (promise, control) = Self::unresolved();
        if let Err(error) = init(&control) {
            control.reject(error);
        }
        promise
    }

    /// A promise born fulfilled.
    #[must_use]
    pub fn resolve(value: T) -> Self {
        Self {
            node: Node::settled(Settlement::Fulfilled(value)),
            gate: None,
        }
    }

    /// A promise born rejected.
    #[must_use]
    pub fn reject(error: E) -> Self {
        Self {
            node: Node::settled(Settlement::Rejected(error)),
            gate: None,
        }
    }

    /// A pending root plus the [`Deferred`] that settles it.
    ///
    /// The capability rides a separate handle rather than the chain tail:
    /// in a typed chain the tail's value type differs from the root's, so
    /// the producer/consumer split mirrors a oneshot channel instead.
    #[must_use]
    pub fn unresolved() -> (Self, Deferred<T, E>) {
        let node = Node::pending();
        let control = Deferred::new(Rc::clone(&node));
        (Self { node, gate: None }, control)
    }

    /// Registers a fulfillment handler; returns the child promise.
    ///
    /// If the parent is already fulfilled the handler runs before `then`
    /// returns. A rejected parent passes its error through untouched,
    /// skipping the handler.
    pub fn then<U, F>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Step<U, E> + 'static,
    {
        let child = Node::pending();
        let reaction: Reaction<T, E> = {
            let child = Rc::clone(&child);
            Box::new(move |outcome| match outcome {
                Settlement::Fulfilled(value) => {
                    settle_step(&child, on_fulfilled(value.clone()));
                }
                Settlement::Rejected(error) => {
                    node::settle(&child, Settlement::Rejected(error.clone()));
                }
            })
        };
        node::register(&self.node, reaction);
        Promise {
            node: child,
            gate: self.gate.clone(),
        }
    }

    /// The two-handler form of `then`.
    ///
    /// A rejected parent runs `on_rejected`, and the rejection is thereby
    /// handled: the child settles from the handler's [`Step`] rather than
    /// re-propagating the error.
    pub fn then_else<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Step<U, E> + 'static,
        R: FnOnce(E) -> Step<U, E> + 'static,
    {
        let child = Node::pending();
        let reaction: Reaction<T, E> = {
            let child = Rc::clone(&child);
            Box::new(move |outcome| {
                let step = match outcome {
                    Settlement::Fulfilled(value) => on_fulfilled(value.clone()),
                    Settlement::Rejected(error) => on_rejected(error.clone()),
                };
                settle_step(&child, step);
            })
        };
        node::register(&self.node, reaction);
        Promise {
            node: child,
            gate: self.gate.clone(),
        }
    }

    /// Registers a rejection handler; a fulfilled parent passes its value
    /// through untouched.
    pub fn catch<R>(&self, on_rejected: R) -> Self
    where
        R: FnOnce(E) -> Step<T, E> + 'static,
    {
        let child = Node::pending();
        let reaction: Reaction<T, E> = {
            let child = Rc::clone(&child);
            Box::new(move |outcome| match outcome {
                Settlement::Fulfilled(value) => {
                    node::settle(&child, Settlement::Fulfilled(value.clone()));
                }
                Settlement::Rejected(error) => {
                    settle_step(&child, on_rejected(error.clone()));
                }
            })
        };
        node::register(&self.node, reaction);
        Self {
            node: child,
            gate: self.gate.clone(),
        }
    }

    /// Runs `on_settled` once the parent settles, fulfilled or rejected;
    /// the child then adopts the parent's exact settlement.
    pub fn finally<F>(&self, on_settled: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let child = Node::pending();
        let reaction: Reaction<T, E> = {
            let child = Rc::clone(&child);
            Box::new(move |outcome| {
                on_settled();
                node::settle(&child, outcome.clone());
            })
        };
        node::register(&self.node, reaction);
        Self {
            node: child,
            gate: self.gate.clone(),
        }
    }

    /// Fallible [`finally`](Self::finally): an `Err` from the observer
    /// overrides the original settlement and rejects the child.
    pub fn try_finally<F>(&self, on_settled: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + 'static,
    {
        let child = Node::pending();
        let reaction: Reaction<T, E> = {
            let child = Rc::clone(&child);
            Box::new(move |outcome| match on_settled() {
                Ok(()) => node::settle(&child, outcome.clone()),
                Err(error) => node::settle(&child, Settlement::Rejected(error)),
            })
        };
        node::register(&self.node, reaction);
        Self {
            node: child,
            gate: self.gate.clone(),
        }
    }

    /// Suspends the chain at this point.
    ///
    /// Handlers registered on the returned promise (or its descendants)
    /// never run before [`resume`](Self::resume), even when this promise
    /// settled long ago. The upstream settlement is withheld at the gate
    /// and delivered on release.
    #[must_use]
    pub fn pause(&self) -> Self {
        let (gated, handle) = gate::gate(&self.node);
        Self {
            node: gated,
            gate: Some(handle),
        }
    }

    /// Releases the nearest upstream pause gate, idempotently.
    ///
    /// If the upstream settlement is already waiting at the gate, the held
    /// continuations drain inside this call; otherwise the gate opens and
    /// the settlement flows through the moment it arrives.
    ///
    /// # Errors
    ///
    /// [`NotPaused`] when no `pause` was inserted upstream of this
    /// promise: that is a programming error, not a chain outcome.
    pub fn resume(&self) -> Result<(), NotPaused> {
        match &self.gate {
            Some(handle) => {
                handle.release();
                Ok(())
            }
            None => Err(NotPaused),
        }
    }
}

/// Settles `child` from a handler's step: a value fulfills, an error
/// rejects, and an adopted promise forwards its eventual settlement into
/// `child` (flattening).
fn settle_step<T, E>(child: &NodeRef<T, E>, step: Step<T, E>)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    match step {
        Step::Value(value) => node::settle(child, Settlement::Fulfilled(value)),
        Step::Reject(error) => node::settle(child, Settlement::Rejected(error)),
        Step::Adopt(inner) => {
            let child = Rc::clone(child);
            node::register(
                &inner.node,
                Box::new(move |outcome| node::settle(&child, outcome.clone())),
            );
        }
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
            gate: self.gate.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.node.borrow();
        f.debug_struct("Promise")
            .field("state", &inner.state_name())
            .field("queued", &inner.queued())
            .field("gated", &self.gate.is_some())
            .finish()
    }
}
