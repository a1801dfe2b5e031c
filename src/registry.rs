// (C) 2020 Brandon Lewis
//
// Primitive registry: a name -> function-pointer table built once at
// interpreter construction, mirroring the source's `builtins` dict. Keeping
// this a flat `HashMap` rather than a trait-object dispatch hierarchy is
// the guidance spec.md's design notes call for directly.

use std::collections::HashMap;

use crate::error::Result;
use crate::evaluator::Evaluator;

pub type PrimitiveFn = fn(&mut Evaluator) -> Result<()>;

pub fn build() -> HashMap<&'static str, PrimitiveFn> {
    let mut map: HashMap<&'static str, PrimitiveFn> = HashMap::new();
    crate::primitives::stack::register(&mut map);
    crate::primitives::arith::register(&mut map);
    crate::primitives::io::register(&mut map);
    crate::primitives::vars::register(&mut map);
    crate::primitives::mem::register(&mut map);
    crate::primitives::ctor::register(&mut map);
    crate::primitives::strops::register(&mut map);
    crate::primitives::listops::register(&mut map);
    crate::primitives::dictops::register(&mut map);
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_no_duplicate_names_and_is_non_empty() {
        let map = build();
        assert!(map.len() > 60, "expected roughly the full §6.3 catalogue, got {}", map.len());
    }
}
