// (C) 2020 Brandon Lewis
//
// Type constructors and coercions: complex, list, tuple, set, frozenset,
// dict, bytes, bytearray, memoryview, range, bool/int/float/str, and the
// push_true/push_false/push_none singletons.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;
use crate::value::Value;

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("complex", complex);
    map.insert("list", list);
    map.insert("tuple", tuple);
    map.insert("set", set);
    map.insert("frozenset", frozenset);
    map.insert("dict", dict);
    map.insert("bytes", bytes);
    map.insert("bytearray", bytearray);
    map.insert("memoryview", memoryview);
    map.insert("range", range);
    map.insert("bool", coerce_bool);
    map.insert("int", coerce_int);
    map.insert("float", coerce_float);
    map.insert("str", coerce_str);
    map.insert("push_true", push_true);
    map.insert("push_false", push_false);
    map.insert("push_none", push_none);
}

fn complex(ev: &mut Evaluator) -> Result<()> {
    let imag = ev.pop("complex")?;
    let real = ev.pop("complex")?;
    let as_f64 = |v: Value| -> Result<f64> {
        match v {
            Value::Int(i) => Ok(i as f64),
            Value::Float(f) => Ok(f),
            other => Err(ForgeError::invalid(format!(
                "complex: expected a number, got {}",
                other.get_type()
            ))),
        }
    };
    ev.push(Value::Complex(as_f64(real)?, as_f64(imag)?));
    Ok(())
}

/// Pop `n` items and return them in original push order (items are popped
/// in reverse order off the stack, so the result is reversed back).
fn pop_n(ev: &mut Evaluator, ctx: &str) -> Result<Vec<Value>> {
    let n = ev.pop_int(ctx)?;
    if n < 0 {
        return Err(ForgeError::invalid(format!("{}: count must be non-negative", ctx)));
    }
    let mut items = Vec::with_capacity(n as usize);
    for _ in 0..n {
        items.push(ev.pop(ctx)?);
    }
    items.reverse();
    Ok(items)
}

fn list(ev: &mut Evaluator) -> Result<()> {
    let items = pop_n(ev, "list")?;
    ev.push(Value::list(items));
    Ok(())
}

fn tuple(ev: &mut Evaluator) -> Result<()> {
    let items = pop_n(ev, "tuple")?;
    ev.push(Value::Tuple(Rc::new(items)));
    Ok(())
}

fn set(ev: &mut Evaluator) -> Result<()> {
    let items = pop_n(ev, "set")?;
    let mut dedup: Vec<Value> = Vec::new();
    for item in items {
        if !item.is_hashable() {
            return Err(ForgeError::invalid("set: unhashable type"));
        }
        if !dedup.iter().any(|existing| existing.value_eq(&item)) {
            dedup.push(item);
        }
    }
    ev.push(Value::Set(Rc::new(std::cell::RefCell::new(dedup))));
    Ok(())
}

fn frozenset(ev: &mut Evaluator) -> Result<()> {
    let items = pop_n(ev, "frozenset")?;
    let mut dedup: Vec<Value> = Vec::new();
    for item in items {
        if !item.is_hashable() {
            return Err(ForgeError::invalid("frozenset: unhashable type"));
        }
        if !dedup.iter().any(|existing| existing.value_eq(&item)) {
            dedup.push(item);
        }
    }
    ev.push(Value::FrozenSet(Rc::new(dedup)));
    Ok(())
}

fn dict(ev: &mut Evaluator) -> Result<()> {
    let n = ev.pop_int("dict")?;
    if n < 0 {
        return Err(ForgeError::invalid("dict: count must be non-negative"));
    }
    let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(n as usize);
    for _ in 0..n {
        let value = ev.pop("dict")?;
        let key = ev.pop("dict")?;
        if !key.is_hashable() {
            return Err(ForgeError::invalid("dict: unhashable key"));
        }
        if let Some(slot) = pairs.iter_mut().find(|(k, _)| k.value_eq(&key)) {
            slot.1 = value;
        } else {
            pairs.push((key, value));
        }
    }
    ev.push(Value::Dict(Rc::new(std::cell::RefCell::new(pairs))));
    Ok(())
}

fn bytes(ev: &mut Evaluator) -> Result<()> {
    let items = pop_n(ev, "bytes")?;
    let bytes = items_to_bytes(items, "bytes")?;
    ev.push(Value::Bytes(Rc::new(bytes)));
    Ok(())
}

fn bytearray(ev: &mut Evaluator) -> Result<()> {
    let items = pop_n(ev, "bytearray")?;
    let bytes = items_to_bytes(items, "bytearray")?;
    ev.push(Value::ByteArray(Rc::new(std::cell::RefCell::new(bytes))));
    Ok(())
}

fn items_to_bytes(items: Vec<Value>, ctx: &str) -> Result<Vec<u8>> {
    items
        .into_iter()
        .map(|v| match v {
            Value::Int(i) if (0..=255).contains(&i) => Ok(i as u8),
            _ => Err(ForgeError::invalid(format!(
                "{}: expects integer values between 0 and 255",
                ctx
            ))),
        })
        .collect()
}

fn memoryview(ev: &mut Evaluator) -> Result<()> {
    let obj = ev.pop("memoryview")?;
    let bytes = match obj {
        Value::Bytes(b) => (*b).clone(),
        Value::ByteArray(b) => b.borrow().clone(),
        other => {
            return Err(ForgeError::invalid(format!(
                "memoryview: expected a bytes-like object, got {}",
                other.get_type()
            )))
        }
    };
    ev.push(Value::MemoryView(Rc::new(std::cell::RefCell::new(bytes))));
    Ok(())
}

fn range(ev: &mut Evaluator) -> Result<()> {
    let step = ev.pop_int("range")?;
    let stop = ev.pop_int("range")?;
    let start = ev.pop_int("range")?;
    ev.push(Value::Range(start, stop, step));
    Ok(())
}

fn coerce_bool(ev: &mut Evaluator) -> Result<()> {
    let v = ev.pop("bool")?;
    ev.push(Value::Bool(v.is_truthy()));
    Ok(())
}

fn coerce_int(ev: &mut Evaluator) -> Result<()> {
    let v = ev.pop("int")?;
    let result = match v {
        Value::Int(i) => i,
        Value::Float(f) => f as i64,
        Value::Bool(b) => b as i64,
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ForgeError::invalid(format!("int: invalid literal '{}'", s)))?,
        other => {
            return Err(ForgeError::invalid(format!(
                "int: cannot convert {} to int",
                other.get_type()
            )))
        }
    };
    ev.push(Value::Int(result));
    Ok(())
}

fn coerce_float(ev: &mut Evaluator) -> Result<()> {
    let v = ev.pop("float")?;
    let result = match v {
        Value::Int(i) => i as f64,
        Value::Float(f) => f,
        Value::Bool(b) => if b { 1.0 } else { 0.0 },
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ForgeError::invalid(format!("float: invalid literal '{}'", s)))?,
        other => {
            return Err(ForgeError::invalid(format!(
                "float: cannot convert {} to float",
                other.get_type()
            )))
        }
    };
    ev.push(Value::Float(result));
    Ok(())
}

fn coerce_str(ev: &mut Evaluator) -> Result<()> {
    let v = ev.pop("str")?;
    ev.push(Value::str(v.display()));
    Ok(())
}

fn push_true(ev: &mut Evaluator) -> Result<()> {
    ev.push(Value::Bool(true));
    Ok(())
}

fn push_false(ev: &mut Evaluator) -> Result<()> {
    ev.push(Value::Bool(false));
    Ok(())
}

fn push_none(ev: &mut Evaluator) -> Result<()> {
    ev.push(Value::None);
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
    fn list_pops_in_reverse_and_restores_push_order() {
        let ev = eval("1 2 3 3 list");
        if let Value::List(l) = &ev.stack[0] {
            assert_eq!(l.borrow().clone(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn list_len_round_trips_count() {
        let ev = eval("1 2 3 3 list list_len");
        assert_eq!(ev.stack, vec![Value::Int(3)]);
    }

    #[test]
    fn dict_packs_key_value_pairs() {
        let ev = eval("\"a\" 1 \"b\" 2 2 dict \"a\" dict_get");
        assert_eq!(ev.stack, vec![Value::Int(1)]);
    }

    #[test]
    fn set_collapses_duplicates() {
        let ev = eval("1 1 2 3 set");
        if let Value::Set(s) = &ev.stack[0] {
            assert_eq!(s.borrow().len(), 2);
        } else {
            panic!("expected set");
        }
    }

    #[test]
    fn set_rejects_unhashable_members() {
        let mut ev = Evaluator::new(64);
        assert!(ev.run("1 2 2 list 1 set").is_err());
    }

    #[test]
    fn coercions_round_trip() {
        assert_eq!(eval("\"42\" int").stack, vec![Value::Int(42)]);
        assert_eq!(eval("3 float").stack, vec![Value::Float(3.0)]);
        assert_eq!(eval("0 bool").stack, vec![Value::Bool(false)]);
        assert_eq!(eval("5 str").stack, vec![Value::str("5")]);
    }

    #[test]
    fn range_stores_the_triple() {
        assert_eq!(eval("0 5 1 range").stack, vec![Value::Range(0, 5, 1)]);
    }
}
