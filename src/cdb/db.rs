use {
    super::{Clause, ClauseAllocator, ClauseDBIF, ClauseIF, ClauseRef, Watcher},
    crate::types::*,
    std::ops::{Index, IndexMut},
};

/// Clause database: the arena, the list of problem clauses, and the
/// watcher lists driving unit propagation.
#[derive(Clone, Debug)]
pub struct ClauseDB {
    /// clause arena
    pub(crate) ca: ClauseAllocator,
    /// handles of problem clauses; may contain dead entries until `clean_up`.
    pub(crate) clauses: Vec<ClauseRef>,
    /// watcher lists, indexed by watching literal.
    pub(crate) watch: Vec<Vec<Watcher>>,
    /// a number of clauses to emit out-of-memory exception
    soft_limit: usize,
    /// collect garbage when this fraction of the arena is wasted.
    garbage_frac: f64,

    //
    //## statistics
    //
    /// the number of live clauses.
    pub num_clause: usize,
    /// the number of live learnt clauses.
    pub num_learnt: usize,
}

impl Default for ClauseDB {
    fn default() -> ClauseDB {
        ClauseDB {
            ca: ClauseAllocator::default(),
            clauses: Vec::new(),
            watch: vec![Vec::new(), Vec::new()],
            soft_limit: 0, // 248_000_000
            garbage_frac: 0.20,
            num_clause: 0,
            num_learnt: 0,
        }
    }
}

impl Index<ClauseRef> for ClauseDB {
    type Output = Clause;
    #[inline]
    fn index(&self, cr: ClauseRef) -> &Clause {
        &self.ca[cr]
    }
}

impl IndexMut<ClauseRef> for ClauseDB {
    #[inline]
    fn index_mut(&mut self, cr: ClauseRef) -> &mut Clause {
        &mut self.ca[cr]
    }
}

impl Instantiate for ClauseDB {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> ClauseDB {
        let nv = cnf.num_of_variables;
        let nc = cnf.num_of_clauses;
        ClauseDB {
            clauses: Vec::with_capacity(1 + nc),
            watch: vec![Vec::new(); 2 * (nv + 1)],
            soft_limit: config.clause_limit,
            ..ClauseDB::default()
        }
    }
    fn handle(&mut self, e: SolverEvent) {
        if e == SolverEvent::NewVar {
            self.watch.push(Vec::new());
            self.watch.push(Vec::new());
        }
    }
}

impl ClauseDBIF for ClauseDB {
    fn len(&self) -> usize {
        self.clauses.len()
    }
    fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
    fn iter(&self) -> std::slice::Iter<'_, ClauseRef> {
        self.clauses.iter()
    }
    fn new_clause(&mut self, vec: &mut Vec<Lit>, learnt: bool) -> ClauseRef {
        debug_assert!(1 < vec.len());
        let cr = self.ca.alloc(vec, learnt);
        self.attach_clause(cr);
        self.clauses.push(cr);
        self.num_clause += 1;
        if learnt {
            self.num_learnt += 1;
        }
        cr
    }
    fn remove_clause(&mut self, cr: ClauseRef) {
        if self.ca[cr].is_dead() {
            return;
        }
        self.detach_clause(cr);
        let learnt = self.ca[cr].is(FlagClause::LEARNT);
        self.ca.free(cr);
        self.num_clause -= 1;
        if learnt {
            self.num_learnt -= 1;
        }
    }
    fn attach_clause(&mut self, cr: ClauseRef) {
        let (l0, l1) = {
            let c = &self.ca[cr];
            debug_assert!(1 < c.len());
            (c.lit0(), c.lit1())
        };
        self.watch[usize::from(!l0)].push(Watcher { blocker: l1, c: cr });
        self.watch[usize::from(!l1)].push(Watcher { blocker: l0, c: cr });
    }
    fn detach_clause(&mut self, cr: ClauseRef) {
        let (l0, l1) = {
            let c = &self.ca[cr];
            debug_assert!(1 < c.len());
            (c.lit0(), c.lit1())
        };
        self.watch[usize::from(!l0)].delete_unstable(|w| w.c == cr);
        self.watch[usize::from(!l1)].delete_unstable(|w| w.c == cr);
    }
    fn strengthen_clause(&mut self, cr: ClauseRef, l: Lit) {
        debug_assert!(!self.ca[cr].is_dead());
        debug_assert!(2 < self.ca[cr].len());
        self.detach_clause(cr);
        self.ca[cr].strengthen(l);
        self.attach_clause(cr);
    }
    fn release_watchers_of(&mut self, l: Lit) {
        let w = &mut self.watch[usize::from(l)];
        if w.is_empty() {
            w.shrink_to_fit();
        }
    }
    fn clean_up(&mut self) {
        let ClauseDB {
            ref ca,
            ref mut clauses,
            ..
        } = self;
        clauses.retain(|cr| !ca[*cr].is_dead());
    }
    fn should_collect_garbage(&self, force: bool) -> bool {
        let w = self.ca.wasted();
        0 < w && (force || (self.ca.size() as f64) * self.garbage_frac < w as f64)
    }
    fn reloc_all(&mut self, to: &mut ClauseAllocator) {
        let ClauseDB {
            ref mut ca,
            ref mut clauses,
            ref mut watch,
            ..
        } = self;
        for ws in watch.iter_mut() {
            for w in ws.iter_mut() {
                ca.reloc(&mut w.c, to);
            }
        }
        for cr in clauses.iter_mut() {
            ca.reloc(cr, to);
        }
    }
    fn rebuild_arena_with(&mut self, to: ClauseAllocator) {
        self.ca = to;
    }
    fn check_size(&self) -> Result<bool, SolverError> {
        if self.soft_limit == 0 {
            return Ok(true);
        }
        if self.num_clause <= self.soft_limit {
            Ok(self.num_clause <= self.soft_limit / 10 * 9)
        } else {
            Err(SolverError::OutOfMemory)
        }
    }
    fn validate(&self, model: &[Option<bool>], strict: bool) -> Option<ClauseRef> {
        for cr in self.clauses.iter() {
            let c = &self.ca[*cr];
            if c.is_dead() || (strict && c.is(FlagClause::LEARNT)) {
                continue;
            }
            let falsified = c.iter().all(|l| match model[l.vi()] {
                Some(x) => x != bool::from(*l),
                None => strict,
            });
            if falsified {
                return Some(*cr);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|i| Lit::from(*i)).collect::<Vec<_>>()
    }

    fn cdb(nv: usize) -> ClauseDB {
        ClauseDB::instantiate(
            &Config::default(),
            &CNFDescription {
                num_of_variables: nv,
                ..CNFDescription::default()
            },
        )
    }

    #[test]
    fn new_clause_attaches_two_watchers() {
        let mut db = cdb(3);
        let cr = db.new_clause(&mut lits(&[1, -2, 3]), false);
        let c = &db[cr];
        let l0 = c.lit0();
        let l1 = c.lit1();
        assert!(db.watch[usize::from(!l0)].iter().any(|w| w.c == cr));
        assert!(db.watch[usize::from(!l1)].iter().any(|w| w.c == cr));
        assert_eq!(db.num_clause, 1);
    }

    #[test]
    fn remove_clause_detaches_and_marks() {
        let mut db = cdb(3);
        let cr = db.new_clause(&mut lits(&[1, -2, 3]), false);
        db.remove_clause(cr);
        assert!(db[cr].is_dead());
        assert!(db.watch.iter().all(|ws| ws.iter().all(|w| w.c != cr)));
        assert_eq!(db.num_clause, 0);
        db.clean_up();
        assert!(db.clauses.is_empty());
    }

    #[test]
    fn strengthen_keeps_watch_invariant() {
        let mut db = cdb(4);
        let cr = db.new_clause(&mut lits(&[1, 2, 3, 4]), false);
        db.strengthen_clause(cr, Lit::from(3i32));
        assert_eq!(db[cr].len(), 3);
        let l0 = db[cr].lit0();
        let l1 = db[cr].lit1();
        assert!(db.watch[usize::from(!l0)].iter().any(|w| w.c == cr));
        assert!(db.watch[usize::from(!l1)].iter().any(|w| w.c == cr));
    }

    #[test]
    fn garbage_collection_round_trip() {
        let mut db = cdb(4);
        let c0 = db.new_clause(&mut lits(&[1, 2, 3]), false);
        let c1 = db.new_clause(&mut lits(&[-1, -2, 4]), false);
        db.remove_clause(c0);
        db.clean_up();
        assert!(db.should_collect_garbage(false));
        let mut to = db.ca.new_like();
        db.reloc_all(&mut to);
        db.rebuild_arena_with(to);
        assert_eq!(db.clauses.len(), 1);
        let moved = db.clauses[0];
        assert_ne!(moved, c1); // c0 preceded it in the old arena
        assert_eq!(Vec::<i32>::from(&db[moved]), vec![-1, -2, 4]);
        assert_eq!(db.ca.wasted(), 0);
    }
}
