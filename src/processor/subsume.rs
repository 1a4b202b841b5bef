//! Backward subsumption and self-subsuming resolution.
use {
    super::{EliminateIF, Eliminator},
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF, ClauseIF, ClauseRef, Subsume},
        state::{State, StateIF},
        types::*,
    },
};

impl Eliminator {
    /// drain the subsumption queue, interleaved with the trail literals past
    /// `bwdsub_assigns`, which act as unit subsumers through the scratch
    /// clause. Removes subsumed clauses and strengthens the others.
    ///
    /// # Errors
    ///
    /// if a strengthening-derived unit falsifies the formula.
    pub fn backward_subsumption_check(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        state: &State,
    ) -> MaybeInconsistent {
        debug_assert_eq!(asg.decision_level(), 0);
        while !self.clause_queue.is_empty() || self.bwdsub_assigns < asg.stack_len() {
            // Empty the queue and return immediately on user interrupt:
            if state.is_interrupted() {
                self.clear_clause_queue(cdb);
                self.bwdsub_assigns = asg.stack_len();
                break;
            }
            // Check top-level assignments by placing them in the queue
            // through the pre-allocated scratch clause:
            if self.clause_queue.is_empty() && self.bwdsub_assigns < asg.stack_len() {
                let l = asg.stack(self.bwdsub_assigns);
                self.bwdsub_assigns += 1;
                let cr = self.bwdsub_tmpunit.expect("scratch unit not allocated");
                cdb[cr].rewrite_unit(l);
                self.clause_queue.push_back(cr);
            }
            let Some(cr) = self.clause_queue.pop_front() else {
                break;
            };
            {
                let c = &mut cdb[cr];
                c.turn_off(FlagClause::ENQUEUED);
                if c.is_dead() {
                    continue;
                }
            }
            // If cr is subsumed by c', both are in the occurrence lists of
            // every var of cr, so scanning the sparsest var is enough.
            let best = {
                let c = &cdb[cr];
                debug_assert!(!c.is_empty());
                let mut b = c.lit0().vi();
                let mut best_len = self.var[b].len();
                for l in c.iter().skip(1) {
                    let len = self.var[l.vi()].len();
                    if len < best_len {
                        b = l.vi();
                        best_len = len;
                    }
                }
                b
            };
            if asg.var(best).is(FlagVar::ELIMINATED) {
                continue;
            }
            self.var[best].clean(&cdb.ca);
            let pos = self.var[best].pos_occurs.clone();
            let neg = self.var[best].neg_occurs.clone();
            for cs in pos.iter().chain(neg.iter()) {
                if *cs == cr {
                    continue;
                }
                if cdb[cr].is_dead() {
                    break;
                }
                {
                    let d = &cdb[*cs];
                    if d.is_dead() {
                        continue;
                    }
                    let lim = self.subsume_literal_limit;
                    if lim != 0 && lim <= d.len() {
                        continue;
                    }
                }
                self.try_subsume(asg, cdb, cr, *cs)?;
            }
        }
        if asg.remains() {
            if let Some(cc) = asg.propagate(cdb) {
                let l0 = cdb[cc].lit0();
                return Err(SolverError::RootLevelConflict(l0));
            }
        }
        Ok(())
    }
    /// test a single candidate against the subsumer `cr` and apply the result.
    pub fn try_subsume(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        cr: ClauseRef,
        cs: ClauseRef,
    ) -> MaybeInconsistent {
        match cdb[cr].subsumes(&cdb[cs]) {
            Subsume::Yes => {
                self.num_subsumed += 1;
                // if a removable clause subsumes a permanent one, the
                // subsumer must stay permanent.
                if !cdb[cs].is(FlagClause::LEARNT) {
                    cdb[cr].turn_off(FlagClause::LEARNT);
                }
                self.remove_cid_occur(asg, cs, &mut cdb[cs]);
                cdb.remove_clause(cs);
            }
            Subsume::Except(l) => {
                self.strengthen_clause(asg, cdb, cs, !l)?;
                self.enqueue_var(asg, l.vi(), true);
            }
            Subsume::No => (),
        }
        Ok(())
    }
    /// remove literal `l` from clause `cs`.
    /// - calls `enqueue_clause`
    /// - calls `enqueue_var`
    ///
    /// # Errors
    ///
    /// if the unit left by a binary clause falsifies the formula.
    fn strengthen_clause(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        cs: ClauseRef,
        l: Lit,
    ) -> MaybeInconsistent {
        debug_assert!(!cdb[cs].is_dead());
        debug_assert!(1 < cdb[cs].len());
        debug_assert_eq!(asg.decision_level(), 0);
        self.num_strengthened += 1;
        if cdb[cs].len() == 2 {
            // a binary drops to a unit, which leaves the clause database
            let c0 = {
                let c = &cdb[cs];
                if c.lit0() == l {
                    c.lit1()
                } else {
                    c.lit0()
                }
            };
            self.remove_cid_occur(asg, cs, &mut cdb[cs]);
            cdb.remove_clause(cs);
            asg.assign_at_root_level(c0)?;
            if asg.propagate(cdb).is_some() {
                return Err(SolverError::RootLevelConflict(c0));
            }
            Ok(())
        } else {
            cdb.strengthen_clause(cs, l);
            self.remove_lit_occur(asg, l, cs);
            self.enqueue_clause(cs, &mut cdb[cs]);
            Ok(())
        }
    }
}
