use std::rc::{Rc, Weak};

use zubridge_server::{HandlerMap, Store};
use zubridge_shared::{State, Value};

/// `{ counter: value }`
pub fn counter_store(value: i64) -> Rc<Store> {
    Store::new(State::object().with("counter", value))
}

pub fn counter_of(state: &State) -> i64 {
    state
        .get("counter")
        .and_then(State::as_i64)
        .unwrap_or_default()
}

/// `INCREMENT`, `DECREMENT` and `SET_COUNTER` handlers for `store`. The
/// store is held weakly so the handlers never keep it alive.
pub fn counter_handlers(store: &Rc<Store>) -> HandlerMap {
    let increment = Rc::downgrade(store);
    let decrement = Rc::downgrade(store);
    let set = Rc::downgrade(store);
    HandlerMap::new()
        .handler("INCREMENT", move |_| {
            add(&increment, 1);
            Ok(())
        })
        .handler("DECREMENT", move |_| {
            add(&decrement, -1);
            Ok(())
        })
        .handler("SET_COUNTER", move |payload: Option<Value>| {
            let value = payload
                .as_ref()
                .and_then(Value::as_i64)
                .ok_or("SET_COUNTER needs an integer payload")?;
            if let Some(store) = set.upgrade() {
                store.set_state(State::object().with("counter", value), false);
            }
            Ok(())
        })
}

fn add(store: &Weak<Store>, delta: i64) {
    if let Some(store) = store.upgrade() {
        store.update(
            |state| State::object().with("counter", counter_of(state) + delta),
            false,
        );
    }
}

/// A counter whose mutations live on the state itself, as callable members
/// `increment`, `decrement` and `reset`
pub fn method_store(value: i64) -> Rc<Store> {
    Store::create(|api| {
        let increment = api.clone();
        let decrement = api.clone();
        State::object()
            .with("counter", value)
            .with(
                "increment",
                State::callable(move |_| {
                    increment.update(
                        |state| State::object().with("counter", counter_of(state) + 1),
                        false,
                    );
                    Ok(())
                }),
            )
            .with(
                "decrement",
                State::callable(move |_| {
                    decrement.update(
                        |state| State::object().with("counter", counter_of(state) - 1),
                        false,
                    );
                    Ok(())
                }),
            )
            .with(
                "reset",
                State::callable(move |_| {
                    api.set_state(State::object().with("counter", 0i64), false);
                    Ok(())
                }),
            )
    })
}
