// (C) 2020 Brandon Lewis
//
// I/O primitives: print, input. Both block on the host process's
// stdout/stdin (spec §5 — no async, no buffering beyond the host's own).

use std::collections::HashMap;
use std::io::{self, BufRead};

use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::registry::PrimitiveFn;
use crate::value::Value;

pub fn register(map: &mut HashMap<&'static str, PrimitiveFn>) {
    map.insert("print", print_);
    map.insert("input", input);
}

fn print_(ev: &mut Evaluator) -> Result<()> {
    let value = ev.pop("print")?;
    println!("{}", value.display());
    Ok(())
}

fn input(ev: &mut Evaluator) -> Result<()> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).unwrap_or(0);
    let line = line.trim_end_matches(['\n', '\r']);

    let value = if let Ok(i) = line.parse::<i64>() {
        Value::Int(i)
    } else if let Ok(f) = line.parse::<f64>() {
        Value::Float(f)
    } else {
        Value::str(line)
    };
    ev.push(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_pops_and_does_not_fail_on_any_variant() {
        let mut ev = Evaluator::new(16);
        ev.push(Value::Int(5));
        print_(&mut ev).unwrap();
        assert!(ev.stack.is_empty());
    }
}
