// (C) 2020 Brandon Lewis
//
// Variable table primitives: store, load.

use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("store", store);
    map.insert("load", load);
}

fn store(ev: &mut Evaluator) -> Result<()> {
    let name = ev.pop_str("store")?;
    let value = ev.pop("store")?;
    ev.variables.insert((*name).clone(), value);
    Ok(())
}

fn load(ev: &mut Evaluator) -> Result<()> {
    let name = ev.pop_str("load")?;
    let value = ev
        .variables
        .get(name.as_str())
        .cloned()
        .ok_or_else(|| ForgeError::invalid(format!("load: undefined variable '{}'", name)))?;
    ev.push(value);
    Ok(())
}
