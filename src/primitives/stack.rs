// (C) 2020 Brandon Lewis
//
// Stack shuffling primitives: dup, swap, drop, over, rot.

use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("dup", dup);
    map.insert("swap", swap);
    map.insert("drop", drop_);
    map.insert("over", over);
    map.insert("rot", rot);
}

fn dup(ev: &mut Evaluator) -> Result<()> {
    let top = ev
        .stack
        .last()
        .cloned()
        .ok_or_else(|| ForgeError::underflow("dup: cannot duplicate an empty stack"))?;
    ev.push(top);
    Ok(())
}

fn swap(ev: &mut Evaluator) -> Result<()> {
    let len = ev.stack.len();
    if len < 2 {
        return Err(ForgeError::underflow("swap: requires at least two stack items"));
    }
    ev.stack.swap(len - 1, len - 2);
    Ok(())
}

fn drop_(ev: &mut Evaluator) -> Result<()> {
    ev.pop("drop").map(|_| ())
}

fn over(ev: &mut Evaluator) -> Result<()> {
    let len = ev.stack.len();
    if len < 2 {
        return Err(ForgeError::underflow("over: requires at least two stack items"));
    }
    let value = ev.stack[len - 2].clone();
    ev.push(value);
    Ok(())
}

fn rot(ev: &mut Evaluator) -> Result<()> {
    let len = ev.stack.len();
    if len < 3 {
        return Err(ForgeError::underflow("rot: requires at least three stack items"));
    }
    ev.stack.swap(len - 3, len - 2);
    ev.stack.swap(len - 2, len - 1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn ev_with(values: &[Value]) -> Evaluator {
        let mut ev = Evaluator::new(16);
        for v in values {
            ev.push(v.clone());
        }
        ev
    }

    #[test]
    fn dup_duplicates_top() {
        let mut ev = ev_with(&[Value::Int(1)]);
        dup(&mut ev).unwrap();
        assert_eq!(ev.stack, vec![Value::Int(1), Value::Int(1)]);
    }

    #[test]
    fn swap_exchanges_top_two() {
        let mut ev = ev_with(&[Value::Int(1), Value::Int(2)]);
        swap(&mut ev).unwrap();
        assert_eq!(ev.stack, vec![Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn drop_removes_top() {
        let mut ev = ev_with(&[Value::Int(1), Value::Int(2)]);
        drop_(&mut ev).unwrap();
        assert_eq!(ev.stack, vec![Value::Int(1)]);
    }

    #[test]
    fn over_copies_second_to_top() {
        let mut ev = ev_with(&[Value::Int(1), Value::Int(2)]);
        over(&mut ev).unwrap();
        assert_eq!(ev.stack, vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn rot_rotates_top_three() {
        let mut ev = ev_with(&[Value::Int(1), Value::Int(2), Value::Int(3)]);
        rot(&mut ev).unwrap();
        assert_eq!(ev.stack, vec![Value::Int(2), Value::Int(3), Value::Int(1)]);
    }

    #[test]
    fn underflow_on_small_stacks() {
        let mut ev = Evaluator::new(16);
        assert!(dup(&mut ev).is_err());
        assert!(swap(&mut ev_with(&[Value::Int(1)])).is_err());
        assert!(rot(&mut ev_with(&[Value::Int(1), Value::Int(2)])).is_err());
    }
}
