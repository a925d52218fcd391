//! Deferred root control: settle a promise that was created without an
//! initializer.
//!
//! [`Deferred`] is the producer half of [`Promise::unresolved`], shaped
//! like a oneshot sender: the consumer holds the promise, the producer
//! holds the settle capability. Both `resolve` and `reject` take `&self`
//! and are first-call-wins; later calls are silent no-ops, preserving the
//! settle-once invariant against racy resolver code without surfacing an
//! error.
//!
//! [`Promise::unresolved`]: crate::Promise::unresolved

use crate::node::{self, NodeRef};
use crate::settlement::Settlement;
use std::fmt;
use std::rc::Rc;

/// Settle capability for one root promise.
///
/// Test scaffolding uses this to control timing precisely: register the
/// whole chain first, then settle the root and observe every handler run
/// synchronously inside the `resolve`/`reject` call.
pub struct Deferred<T, E> {
    node: NodeRef<T, E>,
}

impl<T, E> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(crate) fn new(node: NodeRef<T, E>) -> Self {
        Self { node }
    }

    /// Fulfills the root promise, draining its chain before returning.
    ///
    /// A no-op if the root has already settled.
    pub fn resolve(&self, value: T) {
        node::settle(&self.node, Settlement::Fulfilled(value));
    }

    /// Rejects the root promise, draining its chain before returning.
    ///
    /// A no-op if the root has already settled.
    pub fn reject(&self, error: E) {
        node::settle(&self.node, Settlement::Rejected(error));
    }
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("state", &self.node.borrow().state_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Promise;

    #[test]
    fn resolve_settles_the_root() {
        let (promise, control) = Promise::<i32, &str>::unresolved();
        control.resolve(9);
        assert!(format!("{promise:?}").contains("fulfilled"));
    }

    #[test]
    fn second_settlement_is_a_silent_no_op() {
        let (promise, control) = Promise::<i32, &str>::unresolved();
        control.resolve(1);
        control.resolve(2);
        control.reject("late");

        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&seen);
        promise.then(move |value| {
            sink.borrow_mut().push(value);
            crate::Step::Value(())
        });
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn cloned_controls_share_one_root() {
        let (promise, control) = Promise::<i32, &str>::unresolved();
        let other = control.clone();
        other.resolve(5);
        control.reject("ignored");
        assert!(format!("{promise:?}").contains("fulfilled"));
    }
}
