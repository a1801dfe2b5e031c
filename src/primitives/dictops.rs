// (C) 2020 Brandon Lewis
//
// Extended dict methods (spec §6.3). Backed by an insertion-ordered
// `Vec<(Value, Value)>` searched by value-equality rather than a hash map
// (see value.rs for why — `f64` keys have no total `Hash`).

use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;
use crate::value::{Dict, Value};

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("dict_keys", dict_keys);
    map.insert("dict_values", dict_values);
    map.insert("dict_items", dict_items);
    map.insert("dict_get", dict_get);
    map.insert("dict_set", dict_set);
    map.insert("dict_pop", dict_pop);
}

fn pop_dict(ev: &mut Evaluator, ctx: &str) -> Result<Dict> {
    match ev.pop(ctx)? {
        Value::Dict(d) => Ok(d),
        other => Err(ForgeError::invalid(format!(
            "{}: expected a dict, got {}",
            ctx,
            other.get_type()
        ))),
    }
}

fn dict_keys(ev: &mut Evaluator) -> Result<()> {
    let d = pop_dict(ev, "dict_keys")?;
    let keys = d.borrow().iter().map(|(k, _)| k.clone()).collect();
    ev.push(Value::list(keys));
    Ok(())
}

fn dict_values(ev: &mut Evaluator) -> Result<()> {
    let d = pop_dict(ev, "dict_values")?;
    let values = d.borrow().iter().map(|(_, v)| v.clone()).collect();
    ev.push(Value::list(values));
    Ok(())
}

fn dict_items(ev: &mut Evaluator) -> Result<()> {
    let d = pop_dict(ev, "dict_items")?;
    let items = d
        .borrow()
        .iter()
        .map(|(k, v)| Value::Tuple(std::rc::Rc::new(vec![k.clone(), v.clone()])))
        .collect();
    ev.push(Value::list(items));
    Ok(())
}

fn dict_get(ev: &mut Evaluator) -> Result<()> {
    let key = ev.pop("dict_get")?;
    let d = pop_dict(ev, "dict_get")?;
    let value = d
        .borrow()
        .iter()
        .find(|(k, _)| k.value_eq(&key))
        .map(|(_, v)| v.clone())
        .unwrap_or(Value::None);
    ev.push(value);
    Ok(())
}

fn dict_set(ev: &mut Evaluator) -> Result<()> {
    let value = ev.pop("dict_set")?;
    let key = ev.pop("dict_set")?;
    let d = pop_dict(ev, "dict_set")?;
    if !key.is_hashable() {
        return Err(ForgeError::invalid("dict_set: unhashable key"));
    }
    {
        let mut d_ref = d.borrow_mut();
        if let Some(slot) = d_ref.iter_mut().find(|(k, _)| k.value_eq(&key)) {
            slot.1 = value;
        } else {
            d_ref.push((key, value));
        }
    }
    ev.push(Value::Dict(d));
    Ok(())
}

fn dict_pop(ev: &mut Evaluator) -> Result<()> {
    let key = ev.pop("dict_pop")?;
    let d = pop_dict(ev, "dict_pop")?;
    let mut d_ref = d.borrow_mut();
    let pos = d_ref
        .iter()
        .position(|(k, _)| k.value_eq(&key))
        .ok_or_else(|| ForgeError::invalid("dict_pop: key not found"))?;
    let (_, value) = d_ref.remove(pos);
    drop(d_ref);
    ev.push(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str) -> Evaluator {
        let mut ev = Evaluator::new(64);
        ev.run(src).unwrap();
        ev
    }

    #[test]
    fn get_on_missing_key_is_none_not_an_error() {
        let ev = eval("\"a\" 1 1 dict \"z\" dict_get");
        assert_eq!(ev.stack, vec![Value::None]);
    }

    #[test]
    fn set_then_get_round_trips() {
        let ev = eval("0 dict \"k\" 1 dict_set \"k\" dict_get");
        assert_eq!(ev.stack, vec![Value::Int(1)]);
    }

    #[test]
    fn pop_on_missing_key_is_an_error() {
        let mut ev = Evaluator::new(64);
        assert!(ev.run("0 dict \"z\" dict_pop").is_err());
    }

    #[test]
    fn keys_reflect_construction_order_not_push_order() {
        // `dict` consumes its n pairs top-down, so the *last*-pushed pair
        // is inserted first — matches the reference exactly.
        let ev = eval("\"a\" 1 \"b\" 2 2 dict dict_keys");
        if let Value::List(l) = &ev.stack[0] {
            assert_eq!(l.borrow().clone(), vec![Value::str("b"), Value::str("a")]);
        } else {
            panic!("expected list");
        }
    }
}
