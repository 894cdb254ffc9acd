//! # Value Model Properties
//!
//! Property tests over arbitrary nested values: every value is an instance
//! of its own concrete type and of `object`, and representations are stable.

use proptest::prelude::*;
use sigcheck_core::{Value, ValueType};

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z' ]{0,12}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Tuple),
            prop::collection::vec((inner.clone(), inner), 0..4).prop_map(Value::Dict),
        ]
    })
}

proptest! {
    #[test]
    fn value_is_instance_of_its_own_type(v in arb_value()) {
        prop_assert!(v.is_instance(&v.value_type()));
    }

    #[test]
    fn value_is_always_an_object(v in arb_value()) {
        prop_assert!(v.is_instance(&ValueType::Object));
    }

    #[test]
    fn type_name_matches_type_tag(v in arb_value()) {
        let ty = v.value_type();
        prop_assert_eq!(v.type_name(), ty.name());
    }

    #[test]
    fn repr_is_deterministic(v in arb_value()) {
        prop_assert_eq!(v.repr(), v.clone().repr());
    }
}

#[test]
fn bool_values_satisfy_int_but_ints_do_not_satisfy_bool() {
    assert!(Value::Bool(true).is_instance(&ValueType::Int));
    assert!(!Value::Int(1).is_instance(&ValueType::Bool));
}
