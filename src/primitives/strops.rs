// (C) 2020 Brandon Lewis
//
// Extended string methods (spec §6.3).

use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;
use crate::value::Value;

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("str_upper", str_upper);
    map.insert("str_lower", str_lower);
    map.insert("str_split", str_split);
    map.insert("str_split_on", str_split_on);
    map.insert("str_join", str_join);
    map.insert("str_replace", str_replace);
    map.insert("str_find", str_find);
    map.insert("str_strip", str_strip);
    map.insert("str_startswith", str_startswith);
    map.insert("str_endswith", str_endswith);
    map.insert("str_capitalize", str_capitalize);
    map.insert("str_isdigit", str_isdigit);
    map.insert("str_isalpha", str_isalpha);
}

fn str_upper(ev: &mut Evaluator) -> Result<()> {
    let s = ev.pop_str("str_upper")?;
    ev.push(Value::str(s.to_uppercase()));
    Ok(())
}

fn str_lower(ev: &mut Evaluator) -> Result<()> {
    let s = ev.pop_str("str_lower")?;
    ev.push(Value::str(s.to_lowercase()));
    Ok(())
}

fn str_split(ev: &mut Evaluator) -> Result<()> {
    let s = ev.pop_str("str_split")?;
    let items = s.split_whitespace().map(Value::str).collect();
    ev.push(Value::list(items));
    Ok(())
}

fn str_split_on(ev: &mut Evaluator) -> Result<()> {
    let sep = ev.pop_str("str_split_on")?;
    let s = ev.pop_str("str_split_on")?;
    let items = s.split(sep.as_str()).map(Value::str).collect();
    ev.push(Value::list(items));
    Ok(())
}

fn str_join(ev: &mut Evaluator) -> Result<()> {
    let sep = ev.pop_str("str_join")?;
    let list = ev.pop("str_join")?;
    let items = match list {
        Value::List(l) => l.borrow().clone(),
        other => {
            return Err(ForgeError::invalid(format!(
                "str_join: expected a list, got {}",
                other.get_type()
            )))
        }
    };
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Str(s) => parts.push((*s).clone()),
            other => {
                return Err(ForgeError::invalid(format!(
                    "str_join: expected a list of strings, got {}",
                    other.get_type()
                )))
            }
        }
    }
    ev.push(Value::str(parts.join(&*sep)));
    Ok(())
}

fn str_replace(ev: &mut Evaluator) -> Result<()> {
    let new = ev.pop_str("str_replace")?;
    let old = ev.pop_str("str_replace")?;
    let s = ev.pop_str("str_replace")?;
    ev.push(Value::str(s.replace(old.as_str(), new.as_str())));
    Ok(())
}

fn str_find(ev: &mut Evaluator) -> Result<()> {
    let sub = ev.pop_str("str_find")?;
    let s = ev.pop_str("str_find")?;
    let idx = s
        .find(sub.as_str())
        .map(|byte_idx| s[..byte_idx].chars().count() as i64)
        .unwrap_or(-1);
    ev.push(Value::Int(idx));
    Ok(())
}

fn str_strip(ev: &mut Evaluator) -> Result<()> {
    let s = ev.pop_str("str_strip")?;
    ev.push(Value::str(s.trim()));
    Ok(())
}

fn str_startswith(ev: &mut Evaluator) -> Result<()> {
    let prefix = ev.pop_str("str_startswith")?;
    let s = ev.pop_str("str_startswith")?;
    ev.push(Value::Bool(s.starts_with(prefix.as_str())));
    Ok(())
}

fn str_endswith(ev: &mut Evaluator) -> Result<()> {
    let suffix = ev.pop_str("str_endswith")?;
    let s = ev.pop_str("str_endswith")?;
    ev.push(Value::Bool(s.ends_with(suffix.as_str())));
    Ok(())
}

fn str_capitalize(ev: &mut Evaluator) -> Result<()> {
    let s = ev.pop_str("str_capitalize")?;
    let mut chars = s.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    };
    ev.push(Value::str(capitalized));
    Ok(())
}

fn str_isdigit(ev: &mut Evaluator) -> Result<()> {
    let s = ev.pop_str("str_isdigit")?;
    ev.push(Value::Bool(!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())));
    Ok(())
}

fn str_isalpha(ev: &mut Evaluator) -> Result<()> {
    let s = ev.pop_str("str_isalpha")?;
    ev.push(Value::Bool(!s.is_empty() && s.chars().all(|c| c.is_alphabetic())));
    Ok(())
}
