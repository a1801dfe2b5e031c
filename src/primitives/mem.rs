// (C) 2020 Brandon Lewis
//
// Arena-backed memory primitives: alloc, free, write, read.

use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;
use crate::value::Value;

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("alloc", alloc);
    map.insert("free", free);
    map.insert("write", write);
    map.insert("read", read);
}

fn alloc(ev: &mut Evaluator) -> Result<()> {
    let n = ev.pop_int("alloc")?;
    if n <= 0 {
        return Err(ForgeError::memory("alloc: size must be positive"));
    }
    let ptr = ev.memory.malloc(n as usize)?;
    ev.push(Value::Int(ptr as i64));
    Ok(())
}

fn free(ev: &mut Evaluator) -> Result<()> {
    let ptr = ev.pop_int("free")?;
    ev.memory.free(ptr as usize)
}

fn write(ev: &mut Evaluator) -> Result<()> {
    let value = ev.pop_int("write")?;
    let ptr = ev.pop_int("write")?;
    if !(0..=255).contains(&value) {
        return Err(ForgeError::invalid("write: value must be between 0 and 255"));
    }
    ev.memory.write(ptr as usize, value as u8)
}

fn read(ev: &mut Evaluator) -> Result<()> {
    let ptr = ev.pop_int("read")?;
    let value = ev.memory.read(ptr as usize)?;
    ev.push(Value::Int(value as i64));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_write_read_free_round_trips() {
        let mut ev = Evaluator::new(64);
        ev.run("10 alloc dup 65 write read free").unwrap();
        assert_eq!(ev.stack, vec![Value::Int(65)]);
    }

    #[test]
    fn alloc_zero_or_negative_is_an_error() {
        let mut ev = Evaluator::new(64);
        assert!(ev.run("0 alloc").is_err());
        assert!(ev.run("-1 alloc").is_err());
    }

    #[test]
    fn write_out_of_range_value_is_invalid() {
        let mut ev = Evaluator::new(64);
        assert!(ev.run("1 alloc 300 over write").is_err());
    }

    #[test]
    fn free_of_unallocated_pointer_is_a_memory_error() {
        let mut ev = Evaluator::new(64);
        assert!(ev.run("0 free").is_err());
    }
}
