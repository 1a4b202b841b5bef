//! Compacting clause arena with stable handles.
use {
    super::{clause::ClauseIF, Clause, ClauseRef},
    crate::types::*,
    std::ops::{Index, IndexMut},
};

/// Clause storage. Slot 0 holds a sentinel so that every valid
/// [`ClauseRef`](`crate::cdb::ClauseRef`) is non-zero. Logical deletion via
/// [`free`](`ClauseAllocator::free`) only marks the slot and accounts the
/// waste; the memory is reclaimed by relocating every live clause into a
/// fresh arena.
#[derive(Clone, Debug)]
pub struct ClauseAllocator {
    store: Vec<Clause>,
    /// the number of literal words ever allocated.
    size: usize,
    /// the number of literal words held by dead clauses.
    wasted: usize,
    /// maintain the abstraction signature of allocated clauses.
    pub extra_clause_field: bool,
}

impl Default for ClauseAllocator {
    fn default() -> ClauseAllocator {
        ClauseAllocator {
            store: vec![Clause::default()],
            size: 0,
            wasted: 0,
            extra_clause_field: false,
        }
    }
}

impl Index<ClauseRef> for ClauseAllocator {
    type Output = Clause;
    #[inline]
    fn index(&self, cr: ClauseRef) -> &Clause {
        &self.store[usize::from(cr)]
    }
}

impl IndexMut<ClauseRef> for ClauseAllocator {
    #[inline]
    fn index_mut(&mut self, cr: ClauseRef) -> &mut Clause {
        &mut self.store[usize::from(cr)]
    }
}

impl ClauseAllocator {
    /// return a fresh arena sized for the live clauses of this one,
    /// inheriting the extra-field switch.
    pub fn new_like(&self) -> ClauseAllocator {
        let mut store = Vec::with_capacity(self.store.len() + 1);
        store.push(Clause::default());
        ClauseAllocator {
            store,
            extra_clause_field: self.extra_clause_field,
            ..ClauseAllocator::default()
        }
    }
    /// allocate a clause and return its handle.
    pub fn alloc(&mut self, lits: &mut Vec<Lit>, learnt: bool) -> ClauseRef {
        debug_assert!(!lits.is_empty());
        let mut c = Clause {
            lits: std::mem::take(lits),
            ..Clause::default()
        };
        if learnt {
            c.turn_on(FlagClause::LEARNT);
        }
        if self.extra_clause_field {
            c.calc_abstraction();
        }
        self.size += c.lits.len();
        self.store.push(c);
        ClauseRef::from(self.store.len() - 1)
    }
    /// logically delete a clause; physical reclamation happens at relocation.
    pub fn free(&mut self, cr: ClauseRef) {
        let c = &mut self.store[usize::from(cr)];
        debug_assert!(!c.is_dead());
        c.turn_on(FlagClause::DEAD);
        self.wasted += c.lits.len();
    }
    /// move the clause behind `cr` into arena `to` and rewrite `cr` in place.
    /// A clause already moved by another holder is only re-pointed.
    pub fn reloc(&mut self, cr: &mut ClauseRef, to: &mut ClauseAllocator) {
        let c = &mut self.store[usize::from(*cr)];
        if c.moved_to != 0 {
            *cr = ClauseRef::from(c.moved_to as usize);
            return;
        }
        debug_assert!(!c.is_dead());
        let moved = Clause {
            lits: std::mem::take(&mut c.lits),
            flags: c.flags,
            abst: c.abst,
            moved_to: 0,
        };
        to.size += moved.lits.len();
        to.store.push(moved);
        let ncr = ClauseRef::from(to.store.len() - 1);
        c.moved_to = u32::from(ncr);
        *cr = ncr;
    }
    /// the number of literal words ever allocated in this arena.
    pub fn size(&self) -> usize {
        self.size
    }
    /// the number of literal words lost to dead clauses.
    pub fn wasted(&self) -> usize {
        self.wasted
    }
}
