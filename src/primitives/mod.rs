// (C) 2020 Brandon Lewis
//
// The concrete primitive library (spec §6.3, component C7). Grouped by
// family the way the source groups its `cmd_*` handlers into commented
// sections ("Extended String Methods", "Extended List Methods", ...); each
// submodule exposes a single `register` function the registry calls once.

pub mod arith;
pub mod ctor;
pub mod dictops;
pub mod io;
pub mod listops;
pub mod mem;
pub mod stack;
pub mod strops;
pub mod vars;
