//! Combinators layered on the public chain operations.
//!
//! `all` and `race` are peripheral plumbing: they are built strictly from
//! [`Promise::unresolved`] and [`Promise::then_else`], never from node
//! internals, so they double as a worked example of composing the core
//! surface. Both settle synchronously the moment their deciding input
//! settles.

use crate::promise::Promise;
use crate::settlement::Step;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Waits for every input to fulfill, collecting values in input order.
///
/// The first rejection wins and rejects the result immediately; remaining
/// fulfillments are then ignored. An empty input fulfills at once with an
/// empty `Vec`.
///
/// ```
/// use synchromise::{all, Promise, Step};
///
/// let (late, control) = Promise::<i32, &str>::unresolved();
/// let joined = all(vec![Promise::resolve(1), late, Promise::resolve(3)]);
///
/// let seen = std::rc::Rc::new(std::cell::RefCell::new(None));
/// let sink = std::rc::Rc::clone(&seen);
/// joined.then(move |values| {
///     *sink.borrow_mut() = Some(values);
///     Step::Value(())
/// });
///
/// assert_eq!(*seen.borrow(), None);
/// control.resolve(2);
/// assert_eq!(*seen.borrow(), Some(vec![1, 2, 3]));
/// ```
pub fn all<T, E>(promises: Vec<Promise<T, E>>) -> Promise<Vec<T>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    if promises.is_empty() {
        return Promise::resolve(Vec::new());
    }

    let (joined, control) = Promise::unresolved();
    let remaining = Rc::new(Cell::new(promises.len()));
    let slots: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; promises.len()]));

    for (index, promise) in promises.iter().enumerate() {
        let fulfill = control.clone();
        let fail = control.clone();
        let slots = Rc::clone(&slots);
        let remaining = Rc::clone(&remaining);
        promise.then_else(
            move |value| {
                slots.borrow_mut()[index] = Some(value);
                remaining.set(remaining.get() - 1);
                if remaining.get() == 0 {
                    let values = slots
                        .borrow_mut()
                        .drain(..)
                        .map(|slot| slot.expect("all slots filled at completion"))
                        .collect();
                    fulfill.resolve(values);
                }
                Step::Value(())
            },
            move |error| {
                fail.reject(error);
                Step::Value(())
            },
        );
    }
    joined
}

/// Settles with the first input to settle, fulfilled or rejected.
///
/// Later settlements are silently ignored (settle-once). An empty input
/// stays pending forever, matching the native `race([])`.
pub fn race<T, E>(promises: Vec<Promise<T, E>>) -> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (winner, control) = Promise::unresolved();
    for promise in &promises {
        let fulfill = control.clone();
        let fail = control.clone();
        promise.then_else(
            move |value| {
                fulfill.resolve(value);
                Step::Value(())
            },
            move |error| {
                fail.reject(error);
                Step::Value(())
            },
        );
    }
    winner
}
