//! Boolean constraint propagation at any decision level, with the classic
//! two-watched-literal scheme.
use {
    super::{AssignIF, AssignReason, AssignStack},
    crate::{
        cdb::{ClauseDB, ClauseIF, ClauseRef, Watcher},
        types::*,
    },
};

/// API for Boolean constraint propagation like [`propagate`](`crate::assign::PropagateIF::propagate`),
/// [`assign_at_root_level`](`crate::assign::PropagateIF::assign_at_root_level`), and so on.
pub trait PropagateIF {
    /// add an assignment at root level as a precondition.
    ///
    /// # Errors
    ///
    /// emit `SolverError::RootLevelConflict` if the negation is already asserted.
    fn assign_at_root_level(&mut self, l: Lit) -> MaybeInconsistent;
    /// unsafe enqueue (assign by implication); doesn't emit an exception.
    ///
    /// ## Warning
    /// Callers must assure the consistency after this assignment.
    fn assign_by_implication(&mut self, l: Lit, reason: AssignReason);
    /// unsafe assume (assign by decision); doesn't emit an exception.
    ///
    /// ## Caveat
    /// Callers have to assure the consistency after this assignment.
    fn assign_by_decision(&mut self, l: Lit);
    /// execute *backjump*.
    fn cancel_until(&mut self, lv: DecisionLevel);
    /// execute *boolean constraint propagation* or *unit propagation*.
    /// Returns the conflicting clause if a conflict was found.
    fn propagate(&mut self, cdb: &mut ClauseDB) -> Option<ClauseRef>;
}

impl PropagateIF for AssignStack {
    fn assign_at_root_level(&mut self, l: Lit) -> MaybeInconsistent {
        let vi = l.vi();
        debug_assert!(vi < self.var.len());
        debug_assert!(!self.var[vi].is(FlagVar::ELIMINATED));
        debug_assert_eq!(self.decision_level(), 0);
        match self.assigned(l) {
            None => {
                self.assign_by_implication(l, AssignReason::None);
                Ok(())
            }
            Some(true) => Ok(()),
            Some(false) => Err(SolverError::RootLevelConflict(l)),
        }
    }
    fn assign_by_implication(&mut self, l: Lit, reason: AssignReason) {
        debug_assert!(usize::from(l) != 0);
        debug_assert_eq!(self.assigned(l), None);
        let lv = self.decision_level();
        let vi = l.vi();
        let v = &mut self.var[vi];
        v.assign = Some(bool::from(l));
        v.level = lv;
        v.reason = reason;
        if lv == 0 {
            self.num_asserted_vars += 1;
        }
        self.trail.push(l);
    }
    fn assign_by_decision(&mut self, l: Lit) {
        debug_assert_eq!(self.assigned(l), None);
        self.trail_lim.push(self.trail.len());
        let lv = self.trail_lim.len() as DecisionLevel;
        let vi = l.vi();
        let v = &mut self.var[vi];
        v.assign = Some(bool::from(l));
        v.level = lv;
        v.reason = AssignReason::Decision(lv);
        self.trail.push(l);
    }
    fn cancel_until(&mut self, lv: DecisionLevel) {
        if self.decision_level() <= lv {
            return;
        }
        let lim = self.trail_lim[lv as usize];
        for i in (lim..self.trail.len()).rev() {
            let vi = self.trail[i].vi();
            let v = &mut self.var[vi];
            v.assign = None;
            v.reason = AssignReason::None;
            self.insert_var_order(vi);
        }
        self.trail.truncate(lim);
        self.trail_lim.truncate(lv as usize);
        self.q_head = self.trail.len();
    }
    fn propagate(&mut self, cdb: &mut ClauseDB) -> Option<ClauseRef> {
        while let Some(p) = self.trail.get(self.q_head).copied() {
            self.q_head += 1;
            self.num_propagation += 1;
            let false_lit = !p;
            let watch_index = usize::from(p);
            let mut i = 0;
            while i < cdb.watch[watch_index].len() {
                let Watcher { blocker, c: cr } = cdb.watch[watch_index][i];
                if self.assigned(blocker) == Some(true) {
                    i += 1;
                    continue;
                }
                // make sure the false literal is lits[1]
                let first = {
                    let c = &mut cdb.ca[cr];
                    debug_assert!(!c.is_dead());
                    if c.lit0() == false_lit {
                        c.swap_lits(0, 1);
                    }
                    debug_assert_eq!(c.lit1(), false_lit);
                    c.lit0()
                };
                if first != blocker && self.assigned(first) == Some(true) {
                    cdb.watch[watch_index][i].blocker = first;
                    i += 1;
                    continue;
                }
                // look for a new literal to watch
                let new_watch = {
                    let c = &cdb.ca[cr];
                    (2..c.len()).find(|k| self.assigned(c[*k]) != Some(false))
                };
                if let Some(k) = new_watch {
                    let other = {
                        let c = &mut cdb.ca[cr];
                        c.swap_lits(1, k);
                        c.lit1()
                    };
                    cdb.watch[usize::from(!other)].push(Watcher { blocker: first, c: cr });
                    cdb.watch[watch_index].swap_remove(i);
                    continue;
                }
                // the clause is unit or conflicting under the assignment
                cdb.watch[watch_index][i].blocker = first;
                match self.assigned(first) {
                    Some(false) => {
                        self.q_head = self.trail.len();
                        self.num_conflict += 1;
                        return Some(cr);
                    }
                    None => {
                        self.assign_by_implication(first, AssignReason::Implication(cr));
                    }
                    Some(true) => unreachable!("propagate"),
                }
                i += 1;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdb::ClauseDBIF;

    fn setup(nv: usize) -> (AssignStack, ClauseDB) {
        let cnf = CNFDescription {
            num_of_variables: nv,
            ..CNFDescription::default()
        };
        let config = Config::default();
        (
            AssignStack::instantiate(&config, &cnf),
            ClauseDB::instantiate(&config, &cnf),
        )
    }

    #[test]
    fn propagate_unit_chain() {
        let (mut asg, mut cdb) = setup(3);
        // (-1 v 2) and (-2 v 3)
        cdb.new_clause(&mut vec![Lit::from(-1i32), Lit::from(2i32)], false);
        cdb.new_clause(&mut vec![Lit::from(-2i32), Lit::from(3i32)], false);
        asg.assign_at_root_level(Lit::from(1i32)).expect("consistent");
        assert!(asg.propagate(&mut cdb).is_none());
        assert_eq!(asg.assigned(Lit::from(2i32)), Some(true));
        assert_eq!(asg.assigned(Lit::from(3i32)), Some(true));
        assert_eq!(asg.stack_len(), 3);
    }

    #[test]
    fn propagate_detects_conflict() {
        let (mut asg, mut cdb) = setup(2);
        // (-1 v 2) and (-1 v -2)
        cdb.new_clause(&mut vec![Lit::from(-1i32), Lit::from(2i32)], false);
        cdb.new_clause(&mut vec![Lit::from(-1i32), Lit::from(-2i32)], false);
        asg.assign_at_root_level(Lit::from(1i32)).expect("consistent");
        assert!(asg.propagate(&mut cdb).is_some());
    }

    #[test]
    fn cancel_until_unassigns() {
        let (mut asg, mut cdb) = setup(2);
        cdb.new_clause(&mut vec![Lit::from(-1i32), Lit::from(2i32)], false);
        asg.assign_by_decision(Lit::from(1i32));
        assert!(asg.propagate(&mut cdb).is_none());
        assert_eq!(asg.assigned(Lit::from(2i32)), Some(true));
        asg.cancel_until(0);
        assert_eq!(asg.assigned(Lit::from(1i32)), None);
        assert_eq!(asg.assigned(Lit::from(2i32)), None);
        assert_eq!(asg.stack_len(), 0);
    }
}
