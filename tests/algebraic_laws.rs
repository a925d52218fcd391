//! Law-style properties of the chaining state machine.
//!
//! Each test states one law over whole families of chains rather than a
//! single scenario: identity, finally-transparency, deferred gating,
//! pause gating, and the rejection skip law.

use std::cell::RefCell;
use std::rc::Rc;
use synchromise::{NotPaused, Promise, Step};

#[test]
fn identity_law_then_with_identity_preserves_the_value() {
    for value in [0_i64, 1, -7, i64::MAX, i64::MIN] {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        Promise::<i64, &str>::resolve(value)
            .then(Step::Value)
            .then(move |v| {
                *sink.borrow_mut() = Some(v);
                Step::Value(())
            });
        assert_eq!(*seen.borrow(), Some(value));
    }
}

#[test]
fn finally_is_transparent_to_values_and_errors() {
    // Fulfilled side: value unchanged, observer invoked exactly once.
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    Promise::<i32, &str>::resolve(13)
        .finally(move || *counter.borrow_mut() += 1)
        .then(move |v| {
            *sink.borrow_mut() = Some(v);
            Step::Value(())
        });
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(*seen.borrow(), Some(13));

    // Rejected side: error unchanged, observer invoked exactly once.
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    Promise::<i32, &str>::reject("kept")
        .finally(move || *counter.borrow_mut() += 1)
        .catch(move |e| {
            *sink.borrow_mut() = Some(e);
            Step::Value(0)
        });
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(*seen.borrow(), Some("kept"));
}

#[test]
fn finally_behind_a_gate_fires_at_resume_time() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);

    let tail = Promise::<i32, &str>::resolve(1)
        .pause()
        .finally(move || *counter.borrow_mut() += 1);

    assert_eq!(*calls.borrow(), 0);
    tail.resume().expect("gate upstream");
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn deferred_root_gates_every_handler_until_settlement() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let (promise, control) = Promise::<i32, &str>::unresolved();

    for label in ["a", "b", "c"] {
        let sink = Rc::clone(&order);
        promise.then(move |_| {
            sink.borrow_mut().push(label);
            Step::Value(())
        });
    }
    let last = Rc::clone(&order);
    promise.finally(move || last.borrow_mut().push("finally"));

    assert!(order.borrow().is_empty());
    control.resolve(0);
    // All of them ran, in registration order, inside resolve().
    assert_eq!(*order.borrow(), vec!["a", "b", "c", "finally"]);
}

#[test]
fn gate_withholds_even_when_upstream_settled_first() {
    let ran = Rc::new(RefCell::new(false));
    let sink = Rc::clone(&ran);

    // Upstream settles before the gate is even created.
    let tail = Promise::<i32, &str>::resolve(5).pause().then(move |_| {
        *sink.borrow_mut() = true;
        Step::Value(())
    });

    assert!(!*ran.borrow());
    tail.resume().expect("gate upstream");
    assert!(*ran.borrow());
}

#[test]
fn rejection_skip_law() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let f = Rc::clone(&log);
    let g = Rc::clone(&log);
    let h = Rc::clone(&log);

    Promise::<i32, &str>::reject("original")
        .then(move |_| {
            f.borrow_mut().push("f".to_string());
            Step::Value(0)
        })
        .then(move |_| {
            g.borrow_mut().push("g".to_string());
            Step::Value(0)
        })
        .catch(move |error| {
            h.borrow_mut().push(format!("h: {error}"));
            Step::Value(0)
        });

    assert_eq!(*log.borrow(), vec!["h: original".to_string()]);
}

#[test]
fn handler_rejection_skips_intervening_thens() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let skipped = Rc::clone(&log);
    let caught = Rc::clone(&log);

    Promise::<i32, String>::resolve(1)
        .then(|_| Step::<i32, String>::Reject("boom".to_string()))
        .then(move |_| {
            skipped.borrow_mut().push("skipped".to_string());
            Step::Value(0)
        })
        .catch(move |error| {
            caught.borrow_mut().push(error);
            Step::Value(0)
        });

    assert_eq!(*log.borrow(), vec!["boom".to_string()]);
}

#[test]
fn handled_rejection_does_not_re_propagate() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&log);
    let second = Rc::clone(&log);

    Promise::<i32, &str>::reject("once")
        .catch(move |error| {
            first.borrow_mut().push(format!("first: {error}"));
            Step::Value(0)
        })
        .catch(move |error| {
            second.borrow_mut().push(format!("second: {error}"));
            Step::Value(0)
        });

    assert_eq!(*log.borrow(), vec!["first: once".to_string()]);
}

#[test]
fn resume_is_a_loud_error_without_a_gate() {
    let plain = Promise::<i32, &str>::resolve(1).then(Step::Value);
    assert_eq!(plain.resume(), Err(NotPaused));
}
