//! Bounded variable elimination by clause distribution.
use {
    super::Eliminator,
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF, ClauseIF, ClauseRef},
        state::State,
        types::*,
    },
};

/// eliminate a var by replacing its clauses with their cross-product
/// resolvents, if that stays within the growth and length bounds.
/// Skipping an unprofitable candidate is a success, not a failure.
///
/// # Errors
///
/// if a resolvent (or its propagation) falsifies the formula.
pub fn eliminate_var(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &State,
    vi: VarId,
) -> MaybeInconsistent {
    debug_assert!(!asg.var(vi).is(FlagVar::ELIMINATED));
    debug_assert!(!asg.var(vi).is(FlagVar::FROZEN));
    if asg.assign(vi).is_some() {
        return Ok(());
    }
    elim.var[vi].clean(&cdb.ca);
    let pos = elim.var[vi].pos_occurs.clone();
    let neg = elim.var[vi].neg_occurs.clone();
    if elim.skip_var_elimination(cdb, &pos, &neg, vi) {
        return Ok(());
    }
    debug_assert!(pos.iter().all(|cr| !cdb[*cr].is_dead()));
    debug_assert!(neg.iter().all(|cr| !cdb[*cr].is_dead()));
    asg.handle(SolverEvent::Eliminate(vi));
    // store the smaller side so that the model extension can recover the var
    make_eliminated_clauses(&mut elim.elim_clauses, cdb, vi, &pos, &neg);
    // produce clauses in cross product:
    let mut resolvent: Vec<Lit> = Vec::new();
    for p in pos.iter() {
        for n in neg.iter() {
            if !elim.merge(cdb, *p, *n, vi, &mut resolvent) {
                continue;
            }
            // a unit resolvent earlier in the product may have asserted a
            // literal already; resolvents go through the same intake rules
            // as any other clause
            if resolvent.iter().any(|l| asg.assigned(*l) == Some(true)) {
                continue;
            }
            resolvent.retain(|l| asg.assigned(*l).is_none());
            match resolvent.len() {
                0 => {
                    return Err(SolverError::EmptyClause);
                }
                1 => {
                    asg.assign_at_root_level(resolvent[0])?;
                }
                _ => {
                    let cr = cdb.new_clause(&mut resolvent, false);
                    elim.add_cid_occur(asg, cr, &mut cdb[cr], true);
                }
            }
        }
    }
    for cr in pos.iter().chain(neg.iter()) {
        if cdb[*cr].is_dead() {
            continue;
        }
        elim.remove_cid_occur(asg, *cr, &mut cdb[*cr]);
        cdb.remove_clause(*cr);
    }
    elim.var[vi].clear();
    // give back the allocations of the watcher lists of a retired var:
    cdb.release_watchers_of(Lit::from((vi, true)));
    cdb.release_watchers_of(Lit::from((vi, false)));
    elim.backward_subsumption_check(asg, cdb, state)
}

impl Eliminator {
    /// returns `true` if the elimination must be skipped: the non-tautological
    /// resolvents would outgrow the replaced clauses by more than the grow
    /// limit, or one of them would pass the length limit.
    fn skip_var_elimination(
        &mut self,
        cdb: &ClauseDB,
        pos: &[ClauseRef],
        neg: &[ClauseRef],
        vi: VarId,
    ) -> bool {
        let clslen = pos.len() + neg.len();
        let limit = clslen + self.eliminate_grow_limit;
        let mut cnt = 0;
        for c_pos in pos {
            for c_neg in neg {
                if let Some(clause_size) = self.merge_size(cdb, *c_pos, *c_neg, vi) {
                    cnt += 1;
                    if limit < cnt
                        || (self.resolvent_length_limit != 0
                            && self.resolvent_length_limit < clause_size)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }
    /// build the resolvent of `cp` and `cq` on `vi` into `vec`.
    /// Returns `false` if it is a tautology (`vec` should not be used).
    fn merge(
        &mut self,
        cdb: &ClauseDB,
        cp: ClauseRef,
        cq: ClauseRef,
        vi: VarId,
        vec: &mut Vec<Lit>,
    ) -> bool {
        self.num_merges += 1;
        vec.clear();
        let pqb = &cdb[cp];
        let qpb = &cdb[cq];
        let ps_smallest = pqb.len() < qpb.len();
        let (pb, qb) = if ps_smallest { (pqb, qpb) } else { (qpb, pqb) };
        'next_literal: for l in qb.iter() {
            if l.vi() != vi {
                for j in pb.iter() {
                    if j.vi() == l.vi() {
                        if *j == !*l {
                            return false;
                        }
                        continue 'next_literal;
                    }
                }
                vec.push(*l);
            }
        }
        for l in pb.iter() {
            if l.vi() != vi {
                vec.push(*l);
            }
        }
        true
    }
    /// compute only the size of the resolvent of `cp` and `cq` on `vi`.
    /// Returns `None` if it is a tautology.
    fn merge_size(&mut self, cdb: &ClauseDB, cp: ClauseRef, cq: ClauseRef, vi: VarId) -> Option<usize> {
        self.num_merges += 1;
        let pqb = &cdb[cp];
        let qpb = &cdb[cq];
        let ps_smallest = pqb.len() < qpb.len();
        let (pb, qb) = if ps_smallest { (pqb, qpb) } else { (qpb, pqb) };
        let mut size = pb.len() - 1;
        'next_literal: for l in qb.iter() {
            if l.vi() != vi {
                for j in pb.iter() {
                    if j.vi() == l.vi() {
                        if *j == !*l {
                            return None;
                        }
                        continue 'next_literal;
                    }
                }
                size += 1;
            }
        }
        Some(size)
    }
}

fn make_eliminating_unit_clause(store: &mut Vec<u32>, x: Lit) {
    store.push(u32::from(x));
    store.push(1);
}

/// append `(lits of c, with the pivot moved to position 0, then |c|)`.
fn make_eliminated_clause(store: &mut Vec<u32>, cdb: &ClauseDB, vi: VarId, cr: ClauseRef) {
    let first = store.len();
    let c = &cdb[cr];
    debug_assert!(!c.is_empty());
    for l in c.iter() {
        store.push(u32::from(*l));
        if l.vi() == vi {
            let index = store.len() - 1;
            // swap so that the literal containing the pivot occurs first
            store.swap(index, first);
        }
    }
    debug_assert_eq!(Lit::from(store[first]).vi(), vi);
    store.push(c.len() as u32);
}

/// log the smaller side of the occurrences, then the witness literal of
/// the opposite polarity as a one-literal entry.
fn make_eliminated_clauses(
    store: &mut Vec<u32>,
    cdb: &ClauseDB,
    vi: VarId,
    pos: &[ClauseRef],
    neg: &[ClauseRef],
) {
    if neg.len() < pos.len() {
        for cr in neg {
            debug_assert!(!cdb[*cr].is_dead());
            make_eliminated_clause(store, cdb, vi, *cr);
        }
        make_eliminating_unit_clause(store, Lit::from((vi, true)));
    } else {
        for cr in pos {
            debug_assert!(!cdb[*cr].is_dead());
            make_eliminated_clause(store, cdb, vi, *cr);
        }
        make_eliminating_unit_clause(store, Lit::from((vi, false)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;

    fn refs(s: &Solver) -> Vec<ClauseRef> {
        s.cdb.iter().copied().collect::<Vec<_>>()
    }

    #[test]
    fn merge_produces_the_resolvent() {
        let mut s = Solver::try_from(vec![vec![1, 2, 3], vec![-1, 4]]).expect("valid CNF");
        let crs = refs(&s);
        let mut vec = Vec::new();
        assert!(s.elim.merge(&s.cdb, crs[0], crs[1], 1, &mut vec));
        vec.sort_unstable();
        let mut expect = vec![Lit::from(2i32), Lit::from(3i32), Lit::from(4i32)];
        expect.sort_unstable();
        assert_eq!(vec, expect);
        assert_eq!(s.elim.merge_size(&s.cdb, crs[0], crs[1], 1), Some(3));
    }

    #[test]
    fn merge_detects_tautology() {
        let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, -2]]).expect("valid CNF");
        let crs = refs(&s);
        let mut vec = Vec::new();
        assert!(!s.elim.merge(&s.cdb, crs[0], crs[1], 1, &mut vec));
        assert_eq!(s.elim.merge_size(&s.cdb, crs[0], crs[1], 1), None);
    }

    #[test]
    fn merge_removes_duplicate_literals() {
        let mut s = Solver::try_from(vec![vec![1, 2, 3], vec![-1, 2]]).expect("valid CNF");
        let crs = refs(&s);
        let mut vec = Vec::new();
        assert!(s.elim.merge(&s.cdb, crs[0], crs[1], 1, &mut vec));
        vec.sort_unstable();
        let mut expect = vec![Lit::from(2i32), Lit::from(3i32)];
        expect.sort_unstable();
        assert_eq!(vec, expect);
        assert_eq!(s.elim.merge_size(&s.cdb, crs[0], crs[1], 1), Some(2));
    }

    #[test]
    fn eliminate_var_distributes_clauses() {
        use crate::{processor::EliminateIF, solver::Solver};
        let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, 3]]).expect("valid CNF");
        {
            let Solver {
                ref mut asg,
                ref mut cdb,
                ref mut elim,
                ref mut state,
            } = s;
            elim.prepare(asg, cdb);
            eliminate_var(asg, cdb, elim, state, 1).expect("consistent");
            assert!(asg.var(1).is(FlagVar::ELIMINATED));
            // the stored side is the positive one, pivot first, then the
            // witness literal of the opposite polarity
            assert_eq!(
                elim.elim_clauses().to_vec(),
                vec![
                    u32::from(Lit::from(1i32)),
                    u32::from(Lit::from(2i32)),
                    2,
                    u32::from(Lit::from(-1i32)),
                    1,
                ]
            );
        }
        // the resolvent (2 v 3) replaced both clauses
        assert_eq!(s.clause_vectors(), vec![vec![2, 3]]);
    }

    #[test]
    fn growth_limit_blocks_elimination() {
        use crate::{processor::EliminateIF, solver::Solver};
        // three clauses with 1 and three with -1, on disjoint other vars:
        // nine resolvents against six originals
        let mut s = Solver::try_from(vec![
            vec![1, 2],
            vec![1, 3],
            vec![1, 4],
            vec![-1, 5],
            vec![-1, 6],
            vec![-1, 7],
        ])
        .expect("valid CNF");
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut elim,
            ref mut state,
        } = s;
        elim.prepare(asg, cdb);
        eliminate_var(asg, cdb, elim, state, 1).expect("consistent");
        assert!(!asg.var(1).is(FlagVar::ELIMINATED));
        assert_eq!(cdb.num_clause, 6);
        assert!(elim.elim_clauses().is_empty());
    }

    #[test]
    fn tautological_resolvents_leave_nothing() {
        use crate::{processor::EliminateIF, solver::Solver};
        let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, -2]]).expect("valid CNF");
        {
            let Solver {
                ref mut asg,
                ref mut cdb,
                ref mut elim,
                ref mut state,
            } = s;
            elim.prepare(asg, cdb);
            eliminate_var(asg, cdb, elim, state, 1).expect("consistent");
            assert!(asg.var(1).is(FlagVar::ELIMINATED));
        }
        assert!(s.clause_vectors().is_empty());
        // the log still carries the witness for var 1
        let log = s.elim.elim_clauses();
        assert_eq!(*log.last().expect("witness"), 1);
    }

    #[test]
    fn eliminated_clause_encoding_is_pivot_first() {
        let mut store: Vec<u32> = Vec::new();
        let s = Solver::try_from(vec![vec![1, 2, 3]]).expect("valid CNF");
        let crs = refs(&s);
        // pivot 2 sits in the middle of the stored clause and must be
        // swapped to the front of the record
        make_eliminated_clause(&mut store, &s.cdb, 2, crs[0]);
        assert_eq!(store.len(), 4);
        assert_eq!(Lit::from(store[0]), Lit::from(2i32));
        assert_eq!(store[3], 3);
        let mut rest = vec![Lit::from(store[1]), Lit::from(store[2])];
        rest.sort_unstable();
        assert_eq!(rest, vec![Lit::from(1i32), Lit::from(3i32)]);
    }
}
