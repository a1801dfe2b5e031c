// (C) 2020 Brandon Lewis
//
// Extended list methods (spec §6.3). All mutating ops push the same list
// object back onto the stack, observable through any other variable
// holding it — container sharing is `Rc<RefCell<_>>`, see value.rs.

use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;
use crate::value::{List, Value};

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("list_append", list_append);
    map.insert("list_pop", list_pop);
    map.insert("list_pop_at", list_pop_at);
    map.insert("list_insert", list_insert);
    map.insert("list_remove", list_remove);
    map.insert("list_extend", list_extend);
    map.insert("list_index", list_index);
    map.insert("list_count", list_count);
    map.insert("list_sort", list_sort);
    map.insert("list_reverse", list_reverse);
    map.insert("list_copy", list_copy);
    map.insert("list_clear", list_clear);
    map.insert("list_len", list_len);
    map.insert("list_get", list_get);
    map.insert("list_set", list_set);
    map.insert("list_slice", list_slice);
}

fn pop_list(ev: &mut Evaluator, ctx: &str) -> Result<List> {
    match ev.pop(ctx)? {
        Value::List(l) => Ok(l),
        other => Err(ForgeError::invalid(format!(
            "{}: expected a list, got {}",
            ctx,
            other.get_type()
        ))),
    }
}

/// Normalize a possibly-negative Python-style index against `len`. Returns
/// `None` if still out of range after normalizing.
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let idx = if index < 0 { index + len as i64 } else { index };
    if idx < 0 || idx as usize >= len {
        None
    } else {
        Some(idx as usize)
    }
}

fn list_append(ev: &mut Evaluator) -> Result<()> {
    let elem = ev.pop("list_append")?;
    let list = pop_list(ev, "list_append")?;
    list.borrow_mut().push(elem);
    ev.push(Value::List(list));
    Ok(())
}

fn list_pop(ev: &mut Evaluator) -> Result<()> {
    let list = pop_list(ev, "list_pop")?;
    let elem = list
        .borrow_mut()
        .pop()
        .ok_or_else(|| ForgeError::invalid("list_pop: list is empty"))?;
    ev.push(elem);
    Ok(())
}

fn list_pop_at(ev: &mut Evaluator) -> Result<()> {
    let index = ev.pop_int("list_pop_at")?;
    let list = pop_list(ev, "list_pop_at")?;
    let mut list_ref = list.borrow_mut();
    let idx = normalize_index(index, list_ref.len())
        .ok_or_else(|| ForgeError::invalid("list_pop_at: index out of range"))?;
    let elem = list_ref.remove(idx);
    drop(list_ref);
    ev.push(elem);
    Ok(())
}

fn list_insert(ev: &mut Evaluator) -> Result<()> {
    let elem = ev.pop("list_insert")?;
    let index = ev.pop_int("list_insert")?;
    let list = pop_list(ev, "list_insert")?;
    {
        let mut list_ref = list.borrow_mut();
        let len = list_ref.len();
        let idx = if index < 0 {
            (index + len as i64).max(0) as usize
        } else {
            index as usize
        }
        .min(len);
        list_ref.insert(idx, elem);
    }
    ev.push(Value::List(list));
    Ok(())
}

fn list_remove(ev: &mut Evaluator) -> Result<()> {
    let elem = ev.pop("list_remove")?;
    let list = pop_list(ev, "list_remove")?;
    {
        let mut list_ref = list.borrow_mut();
        let pos = list_ref
            .iter()
            .position(|v| v.value_eq(&elem))
            .ok_or_else(|| ForgeError::invalid("list_remove: element not found"))?;
        list_ref.remove(pos);
    }
    ev.push(Value::List(list));
    Ok(())
}

fn list_extend(ev: &mut Evaluator) -> Result<()> {
    let list2 = pop_list(ev, "list_extend")?;
    let list1 = pop_list(ev, "list_extend")?;
    let extra = list2.borrow().clone();
    list1.borrow_mut().extend(extra);
    ev.push(Value::List(list1));
    Ok(())
}

fn list_index(ev: &mut Evaluator) -> Result<()> {
    let elem = ev.pop("list_index")?;
    let list = pop_list(ev, "list_index")?;
    let pos = list
        .borrow()
        .iter()
        .position(|v| v.value_eq(&elem))
        .ok_or_else(|| ForgeError::invalid("list_index: element not found"))?;
    ev.push(Value::Int(pos as i64));
    Ok(())
}

fn list_count(ev: &mut Evaluator) -> Result<()> {
    let elem = ev.pop("list_count")?;
    let list = pop_list(ev, "list_count")?;
    let count = list.borrow().iter().filter(|v| v.value_eq(&elem)).count();
    ev.push(Value::Int(count as i64));
    Ok(())
}

fn list_sort(ev: &mut Evaluator) -> Result<()> {
    let list = pop_list(ev, "list_sort")?;
    {
        let mut list_ref = list.borrow_mut();
        let mut err = None;
        list_ref.sort_by(|a, b| match a.partial_cmp_numeric_or_text(b) {
            Some(ord) => ord,
            None => {
                err = Some(ForgeError::invalid("list_sort: elements are not comparable"));
                std::cmp::Ordering::Equal
            }
        });
        if let Some(e) = err {
            return Err(e);
        }
    }
    ev.push(Value::List(list));
    Ok(())
}

fn list_reverse(ev: &mut Evaluator) -> Result<()> {
    let list = pop_list(ev, "list_reverse")?;
    list.borrow_mut().reverse();
    ev.push(Value::List(list));
    Ok(())
}

fn list_copy(ev: &mut Evaluator) -> Result<()> {
    let list = pop_list(ev, "list_copy")?;
    let copy = list.borrow().clone();
    ev.push(Value::list(copy));
    Ok(())
}

fn list_clear(ev: &mut Evaluator) -> Result<()> {
    let list = pop_list(ev, "list_clear")?;
    list.borrow_mut().clear();
    ev.push(Value::List(list));
    Ok(())
}

fn list_len(ev: &mut Evaluator) -> Result<()> {
    let list = pop_list(ev, "list_len")?;
    let len = list.borrow().len();
    ev.push(Value::Int(len as i64));
    Ok(())
}

fn list_get(ev: &mut Evaluator) -> Result<()> {
    let index = ev.pop_int("list_get")?;
    let list = pop_list(ev, "list_get")?;
    let list_ref = list.borrow();
    let idx = normalize_index(index, list_ref.len())
        .ok_or_else(|| ForgeError::invalid("list_get: index out of range"))?;
    let elem = list_ref[idx].clone();
    drop(list_ref);
    ev.push(elem);
    Ok(())
}

fn list_set(ev: &mut Evaluator) -> Result<()> {
    let value = ev.pop("list_set")?;
    let index = ev.pop_int("list_set")?;
    let list = pop_list(ev, "list_set")?;
    {
        let mut list_ref = list.borrow_mut();
        let len = list_ref.len();
        let idx = normalize_index(index, len)
            .ok_or_else(|| ForgeError::invalid("list_set: index out of range"))?;
        list_ref[idx] = value;
    }
    ev.push(Value::List(list));
    Ok(())
}

fn list_slice(ev: &mut Evaluator) -> Result<()> {
    let end = ev.pop_int("list_slice")?;
    let start = ev.pop_int("list_slice")?;
    let list = pop_list(ev, "list_slice")?;
    let list_ref = list.borrow();
    let len = list_ref.len() as i64;
    let clamp = |i: i64| -> usize {
        let i = if i < 0 { (i + len).max(0) } else { i };
        i.min(len) as usize
    };
    let (s, e) = (clamp(start), clamp(end));
    let slice = if s < e { list_ref[s..e].to_vec() } else { Vec::new() };
    drop(list_ref);
    ev.push(Value::list(slice));
    Ok(())
}
