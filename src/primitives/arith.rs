// (C) 2020 Brandon Lewis
//
// Arithmetic and comparison primitives: add, sub, mul, div, mod, eq, gt, lt.
//
// `div`/`mod` always floor (round toward negative infinity), even when one
// or both operands are `Float` — the source uses Python's `//`/`%`
// unconditionally for these two, rather than switching to true division,
// so the floor behavior is preserved for every numeric combination rather
// than just `Int`/`Int`.

use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;
use crate::value::Value;

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("add", add);
    map.insert("sub", sub);
    map.insert("mul", mul);
    map.insert("div", div);
    map.insert("mod", module);
    map.insert("eq", eq);
    map.insert("gt", gt);
    map.insert("lt", lt);
}

enum Numeric {
    Int(i64),
    Float(f64),
}

fn as_numeric(v: &Value, ctx: &str) -> Result<Numeric> {
    match v {
        Value::Int(i) => Ok(Numeric::Int(*i)),
        Value::Float(f) => Ok(Numeric::Float(*f)),
        other => Err(ForgeError::invalid(format!(
            "{}: expected a number, got {}",
            ctx,
            other.get_type()
        ))),
    }
}

fn add(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("add")?;
    let a = ev.pop("add")?;
    let result = match (&a, &b) {
        (Value::Str(x), Value::Str(y)) => Value::str(format!("{}{}", x, y)),
        (Value::List(x), Value::List(y)) => {
            let mut items = x.borrow().clone();
            items.extend(y.borrow().iter().cloned());
            Value::list(items)
        }
        _ => numeric_binop(&a, &b, "add", |x, y| x + y, |x, y| x + y)?,
    };
    ev.push(result);
    Ok(())
}

fn sub(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("sub")?;
    let a = ev.pop("sub")?;
    ev.push(numeric_binop(&a, &b, "sub", |x, y| x - y, |x, y| x - y)?);
    Ok(())
}

fn mul(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("mul")?;
    let a = ev.pop("mul")?;
    ev.push(numeric_binop(&a, &b, "mul", |x, y| x * y, |x, y| x * y)?);
    Ok(())
}

fn numeric_binop(
    a: &Value,
    b: &Value,
    ctx: &str,
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
    match (as_numeric(a, ctx)?, as_numeric(b, ctx)?) {
        (Numeric::Int(x), Numeric::Int(y)) => Ok(Value::Int(int_op(x, y))),
        (Numeric::Int(x), Numeric::Float(y)) => Ok(Value::Float(float_op(x as f64, y))),
        (Numeric::Float(x), Numeric::Int(y)) => Ok(Value::Float(float_op(x, y as f64))),
        (Numeric::Float(x), Numeric::Float(y)) => Ok(Value::Float(float_op(x, y))),
    }
}

// Python's `//`/`%` round toward negative infinity regardless of the sign
// of the divisor; Rust's `/`/`%` truncate toward zero, and `div_euclid`
// only agrees with floor division when the divisor is positive. Compute
// floor division/modulo explicitly instead.
fn floor_div_i64(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn floor_mod_i64(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

fn div(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("div")?;
    let a = ev.pop("div")?;
    match (as_numeric(&a, "div")?, as_numeric(&b, "div")?) {
        (Numeric::Int(x), Numeric::Int(y)) => {
            if y == 0 {
                return Err(ForgeError::div_zero("div: division by zero"));
            }
            ev.push(Value::Int(floor_div_i64(x, y)));
        }
        (x, y) => {
            let (x, y) = (numeric_as_f64(x), numeric_as_f64(y));
            if y == 0.0 {
                return Err(ForgeError::div_zero("div: division by zero"));
            }
            ev.push(Value::Float((x / y).floor()));
        }
    }
    Ok(())
}

fn module(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("mod")?;
    let a = ev.pop("mod")?;
    match (as_numeric(&a, "mod")?, as_numeric(&b, "mod")?) {
        (Numeric::Int(x), Numeric::Int(y)) => {
            if y == 0 {
                return Err(ForgeError::div_zero("mod: division by zero"));
            }
            ev.push(Value::Int(floor_mod_i64(x, y)));
        }
        (x, y) => {
            let (x, y) = (numeric_as_f64(x), numeric_as_f64(y));
            if y == 0.0 {
                return Err(ForgeError::div_zero("mod: division by zero"));
            }
            ev.push(Value::Float(x - y * (x / y).floor()));
        }
    }
    Ok(())
}

fn numeric_as_f64(n: Numeric) -> f64 {
    match n {
        Numeric::Int(i) => i as f64,
        Numeric::Float(f) => f,
    }
}

fn eq(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("eq")?;
    let a = ev.pop("eq")?;
    ev.push(Value::Bool(a.value_eq(&b)));
    Ok(())
}

fn gt(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("gt")?;
    let a = ev.pop("gt")?;
    let ord = a
        .partial_cmp_numeric_or_text(&b)
        .ok_or_else(|| ForgeError::invalid("gt: operands are not comparable"))?;
    ev.push(Value::Bool(ord == std::cmp::Ordering::Greater));
    Ok(())
}

fn lt(ev: &mut Evaluator) -> Result<()> {
    let b = ev.pop("lt")?;
    let a = ev.pop("lt")?;
    let ord = a
        .partial_cmp_numeric_or_text(&b)
        .ok_or_else(|| ForgeError::invalid("lt: operands are not comparable"))?;
    ev.push(Value::Bool(ord == std::cmp::Ordering::Less));
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
    fn add_sub_mul_on_integers() {
        assert_eq!(eval("2 3 add").stack, vec![Value::Int(5)]);
        assert_eq!(eval("5 3 sub").stack, vec![Value::Int(2)]);
        assert_eq!(eval("4 3 mul").stack, vec![Value::Int(12)]);
    }

    #[test]
    fn add_concatenates_strings_and_lists() {
        assert_eq!(eval("\"a\" \"b\" add").stack, vec![Value::str("ab")]);
        let ev = eval("1 1 list 2 1 list add");
        if let Value::List(l) = &ev.stack[0] {
            assert_eq!(l.borrow().clone(), vec![Value::Int(1), Value::Int(2)]);
        } else {
            panic!("expected a list");
        }
    }

    #[test]
    fn div_and_mod_floor_toward_negative_infinity() {
        assert_eq!(eval("-7 2 div").stack, vec![Value::Int(-4)]);
        assert_eq!(eval("-7 2 mod").stack, vec![Value::Int(1)]);
    }

    #[test]
    fn div_by_zero_is_an_error() {
        assert!(Evaluator::new(16).run("1 0 div").is_err());
    }

    #[test]
    fn float_div_still_floors() {
        let ev = eval("7.0 2 div");
        assert_eq!(ev.stack, vec![Value::Float(3.0)]);
    }

    #[test]
    fn comparisons_match_natural_ordering() {
        assert_eq!(eval("1 2 lt").stack, vec![Value::Bool(true)]);
        assert_eq!(eval("2 1 gt").stack, vec![Value::Bool(true)]);
        assert_eq!(eval("1 1 eq").stack, vec![Value::Bool(true)]);
    }

    #[test]
    fn eq_is_false_not_an_error_across_incompatible_types() {
        assert_eq!(eval("1 \"1\" eq").stack, vec![Value::Bool(false)]);
    }
}
