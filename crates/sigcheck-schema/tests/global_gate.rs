//! # Process-Wide Gate
//!
//! Kept in its own test binary: toggling the global flag would race with
//! guards checked concurrently by other tests.

use sigcheck_core::{Value, ValueType};
use sigcheck_schema::{global_checking, set_global_checking, Args, Bindings, Guard, Param, Signature};

#[test]
fn global_flag_gates_every_guard() {
    let signature = Signature::new().param(Param::new("n").schema(ValueType::Int));
    let guard = Guard::new("echo", signature, |b: &Bindings| {
        b.get("n").cloned().unwrap_or(Value::None)
    });

    assert!(global_checking());
    assert!(guard.call(Args::new().arg("x")).is_err());

    set_global_checking(false);
    assert_eq!(guard.call(Args::new().arg("x")).unwrap(), Value::from("x"));
    assert!(guard.is_checking());

    set_global_checking(true);
    assert!(guard.call(Args::new().arg("x")).is_err());
}
