// (C) 2020 Brandon Lewis
//
// Byte-addressable memory arena: a fixed-size region with an explicit
// first-fit allocator. `allocations` and `free_list` always partition
// `[0, size)` exactly; `free_list` is kept sorted and fully coalesced after
// every `free`, same as the reference `MemoryManager`.

use crate::error::{ForgeError, Result};

#[derive(Debug)]
pub struct MemoryArena {
    mem: Vec<u8>,
    size: usize,
    free_list: Vec<(usize, usize)>,
    allocations: Vec<(usize, usize)>,
}

impl MemoryArena {
    pub fn new(size: usize) -> MemoryArena {
        MemoryArena {
            mem: vec![0u8; size],
            size,
            free_list: vec![(0, size)],
            allocations: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// First-fit allocation: the first free interval with enough room is
    /// shrunk from the front (or dropped entirely on an exact fit).
    pub fn malloc(&mut self, n: usize) -> Result<usize> {
        if n == 0 {
            return Err(ForgeError::memory("alloc: size must be > 0"));
        }
        let slot = self
            .free_list
            .iter()
            .position(|(_, len)| *len >= n)
            .ok_or_else(|| ForgeError::memory("alloc: out of memory"))?;

        let (start, len) = self.free_list[slot];
        if len == n {
            self.free_list.remove(slot);
        } else {
            self.free_list[slot] = (start + n, len - n);
        }
        self.allocations.push((start, n));
        log::trace!("arena: malloc({}) -> {}", n, start);
        Ok(start)
    }

    /// Release a live allocation back to the free list, coalescing any
    /// newly-adjacent intervals.
    pub fn free(&mut self, ptr: usize) -> Result<()> {
        let idx = self
            .allocations
            .iter()
            .position(|(start, _)| *start == ptr)
            .ok_or_else(|| ForgeError::memory(format!("free: invalid pointer {}", ptr)))?;
        let (start, len) = self.allocations.remove(idx);

        self.free_list.push((start, len));
        self.free_list.sort_by_key(|(start, _)| *start);

        let mut coalesced: Vec<(usize, usize)> = Vec::with_capacity(self.free_list.len());
        for (start, len) in self.free_list.drain(..) {
            match coalesced.last_mut() {
                Some((last_start, last_len)) if *last_start + *last_len == start => {
                    *last_len += len;
                }
                _ => coalesced.push((start, len)),
            }
        }
        self.free_list = coalesced;
        log::trace!("arena: free({})", ptr);
        Ok(())
    }

    /// Bounds-checked only against the arena, not against a live
    /// allocation — matches the reference's deliberately low-level stance.
    pub fn write(&mut self, ptr: usize, value: u8) -> Result<()> {
        if ptr >= self.size {
            return Err(ForgeError::memory(format!(
                "write: pointer {} out of bounds (size {})",
                ptr, self.size
            )));
        }
        self.mem[ptr] = value;
        Ok(())
    }

    pub fn read(&self, ptr: usize) -> Result<u8> {
        if ptr >= self.size {
            return Err(ForgeError::memory(format!(
                "read: pointer {} out of bounds (size {})",
                ptr, self.size
            )));
        }
        Ok(self.mem[ptr])
    }

    #[cfg(test)]
    fn free_list(&self) -> &[(usize, usize)] {
        &self.free_list
    }

    #[cfg(test)]
    fn allocations(&self) -> &[(usize, usize)] {
        &self.allocations
    }

    #[cfg(test)]
    fn check_partition_invariant(&self) {
        let mut intervals: Vec<(usize, usize)> =
            self.free_list.iter().chain(self.allocations.iter()).cloned().collect();
        intervals.sort_by_key(|(start, _)| *start);
        let mut cursor = 0usize;
        for (start, len) in intervals {
            assert_eq!(start, cursor, "arena partition has a gap or overlap at {}", start);
            cursor += len;
        }
        assert_eq!(cursor, self.size, "arena partition does not cover the full size");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn malloc_shrinks_the_chosen_interval() {
        let mut arena = MemoryArena::new(16);
        let p = arena.malloc(10).unwrap();
        assert_eq!(p, 0);
        assert_eq!(arena.free_list(), &[(10, 6)]);
    }

    #[test]
    fn free_reclaims_and_coalesces() {
        let mut arena = MemoryArena::new(16);
        let a = arena.malloc(5).unwrap();
        let b = arena.malloc(5).unwrap();
        arena.free(a).unwrap();
        arena.free(b).unwrap();
        assert_eq!(arena.free_list(), &[(0, 16)]);
    }

    #[test]
    fn freeing_in_reverse_order_still_coalesces_fully() {
        let mut arena = MemoryArena::new(8);
        let a = arena.malloc(5).unwrap();
        let b = arena.malloc(3).unwrap();
        arena.free(b).unwrap();
        arena.free(a).unwrap();
        assert_eq!(arena.free_list(), &[(0, 8)]);
        assert!(arena.allocations().is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut arena = MemoryArena::new(4);
        let p = arena.malloc(1).unwrap();
        arena.write(p, 65).unwrap();
        assert_eq!(arena.read(p).unwrap(), 65);
    }

    #[test]
    fn out_of_bounds_access_is_a_memory_error() {
        let arena = MemoryArena::new(4);
        assert!(arena.read(4).is_err());
    }

    #[test]
    fn alloc_exhaustion_fails() {
        let mut arena = MemoryArena::new(4);
        arena.malloc(4).unwrap();
        assert!(arena.malloc(1).is_err());
    }

    #[test]
    fn free_of_unknown_pointer_fails() {
        let mut arena = MemoryArena::new(4);
        assert!(arena.free(0).is_err());
    }

    #[test]
    fn write_does_not_require_a_live_allocation() {
        // Deliberate low-level stance (spec §4.4/§9): bounds-check only.
        let mut arena = MemoryArena::new(4);
        assert!(arena.write(2, 9).is_ok());
    }

    quickcheck! {
        fn partition_invariant_holds_after_random_alloc_free_sequences(ops: Vec<(bool, u8)>) -> TestResult {
            let mut arena = MemoryArena::new(64);
            let mut live: Vec<usize> = Vec::new();
            for (do_alloc, size) in ops {
                if do_alloc {
                    let n = (size as usize % 8) + 1;
                    if let Ok(p) = arena.malloc(n) {
                        live.push(p);
                    }
                } else if !live.is_empty() {
                    let p = live.remove(size as usize % live.len());
                    let _ = arena.free(p);
                }
            }
            arena.check_partition_invariant();
            TestResult::passed()
        }
    }
}
