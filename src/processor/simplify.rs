//! The preprocessing driver: the fixpoint loop over the touched set, the
//! trail tail and the elimination heap, plus arena compaction and the
//! model-extension replay.
use {
    super::{eliminate::eliminate_var, EliminateIF, Eliminator, EliminatorMode},
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF, ClauseIF},
        state::{State, StateIF},
        types::*,
    },
};

/// one full pass of simplification, with a single cleanup exit.
pub(super) fn run(
    elim: &mut Eliminator,
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    turn_off: bool,
) -> MaybeInconsistent {
    debug_assert_eq!(asg.decision_level(), 0);
    // unit propagation to fixpoint before anything else
    if asg.remains() {
        if let Some(cc) = asg.propagate(cdb) {
            let l0 = cdb[cc].lit0();
            return Err(SolverError::RootLevelConflict(l0));
        }
    }
    if elim.mode == EliminatorMode::Disabled {
        // the database went back to the search engine; only the base-level
        // housekeeping remains
        if state.remove_satisfied {
            for i in 0..cdb.clauses.len() {
                let cr = cdb.clauses[i];
                if !cdb[cr].is_dead() && cdb[cr].is_satisfied_under(asg) {
                    cdb.remove_clause(cr);
                }
            }
            cdb.clean_up();
        }
        return Ok(());
    }
    let result = if cdb.num_clause <= elim.preprocess_clause_bound {
        if elim.mode == EliminatorMode::Dormant {
            elim.prepare(asg, cdb);
        }
        elim.eliminate_main(asg, cdb, state)
    } else {
        state.flush("too many clauses; skipping the preprocessing pass");
        Ok(())
    };
    elim.num_full_elimination += 1;
    // If no more simplification is needed, free all related data structures;
    // otherwise settle for the cheap cleanup.
    if turn_off {
        elim.shut_down(asg, cdb, state);
    } else {
        elim.stop(asg, cdb);
        cdb.clean_up();
        check_garbage(asg, cdb, elim, false);
    }
    state.progress(asg, cdb, elim);
    result.and(cdb.check_size().map(|_| ()))
}

impl Eliminator {
    /// the main loop: exhaust the touched set, the trail tail, and the
    /// elimination heap.
    fn eliminate_main(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        state: &mut State,
    ) -> MaybeInconsistent {
        debug_assert!(asg.decision_level() == 0);
        debug_assert!(self.mode == EliminatorMode::Running);
        while 0 < self.n_touched
            || self.bwdsub_assigns < asg.stack_len()
            || !self.var_queue.is_empty()
        {
            self.gather_touched_clauses(asg, cdb);
            if !self.clause_queue.is_empty() || self.bwdsub_assigns < asg.stack_len() {
                self.backward_subsumption_check(asg, cdb, state)?;
            }
            // empty the heap and finish the pass on user interrupt
            if state.is_interrupted() {
                self.clear_var_queue(asg);
                break;
            }
            while let Some(vi) = self.var_queue.select_var(&self.var, asg) {
                if state.is_interrupted() {
                    self.clear_var_queue(asg);
                    break;
                }
                asg.var_mut(vi).turn_off(FlagVar::ENQUEUED);
                let v = asg.var(vi);
                if v.is(FlagVar::ELIMINATED) || v.is(FlagVar::FROZEN) || asg.assign(vi).is_some()
                {
                    continue;
                }
                if self.enable {
                    eliminate_var(asg, cdb, self, state, vi)?;
                }
                check_garbage(asg, cdb, self, false);
            }
            debug_assert!(self.clause_queue.is_empty() || state.is_interrupted());
        }
        Ok(())
    }
    /// enqueue every clause of every touched var exactly once.
    fn gather_touched_clauses(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB) {
        if self.n_touched == 0 {
            return;
        }
        for vi in 1..=asg.num_vars() {
            if !asg.var(vi).is(FlagVar::TOUCHED) {
                continue;
            }
            asg.var_mut(vi).turn_off(FlagVar::TOUCHED);
            self.var[vi].clean(&cdb.ca);
            let pos = self.var[vi].pos_occurs.clone();
            let neg = self.var[vi].neg_occurs.clone();
            for cr in pos.iter().chain(neg.iter()) {
                self.enqueue_clause(*cr, &mut cdb[*cr]);
            }
        }
        self.n_touched = 0;
    }
    /// set the eliminator's mode to **dormant** and purge the occurrence
    /// lists; they are rebuilt from scratch by the next pass.
    fn stop(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB) {
        self.clear_clause_queue(cdb);
        self.clear_var_queue(asg);
        for i in 0..cdb.clauses.len() {
            let cr = cdb.clauses[i];
            cdb[cr].turn_off(FlagClause::OCCUR_LINKED);
        }
        for w in self.var[1..].iter_mut() {
            w.clear();
        }
        self.mode = EliminatorMode::Dormant;
    }
    /// permanent shutdown: release every preprocessor-only table, give the
    /// clause database back to the search engine and compact the arena.
    fn shut_down(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) {
        self.stop(asg, cdb);
        self.mode = EliminatorMode::Disabled;
        if let Some(cr) = self.bwdsub_tmpunit.take() {
            cdb.ca.free(cr);
        }
        self.var.clear();
        self.var.shrink_to_fit();
        self.var_queue = super::VarOccHeap::new(0);
        self.clause_queue.shrink_to_fit();
        state.remove_satisfied = true;
        cdb.ca.extra_clause_field = false;
        asg.rebuild_order_heap();
        cdb.clean_up();
        garbage_collect(asg, cdb, self);
    }
    /// relocate every handle held by the eliminator into arena `to`.
    pub(crate) fn reloc_all(
        &mut self,
        ca: &mut crate::cdb::ClauseAllocator,
        to: &mut crate::cdb::ClauseAllocator,
    ) {
        for w in self.var.iter_mut() {
            for list in [&mut w.pos_occurs, &mut w.neg_occurs] {
                list.retain(|cr| !ca[*cr].is_dead());
                for cr in list.iter_mut() {
                    ca.reloc(cr, to);
                }
            }
            w.clean(to);
        }
        self.clause_queue.retain(|cr| !ca[*cr].is_dead());
        for cr in self.clause_queue.iter_mut() {
            ca.reloc(cr, to);
        }
        if let Some(ref mut cr) = self.bwdsub_tmpunit {
            ca.reloc(cr, to);
        }
    }
}

/// collect the arena waste if it passed the threshold, visiting every
/// handle holder.
pub fn check_garbage(asg: &mut AssignStack, cdb: &mut ClauseDB, elim: &mut Eliminator, force: bool) {
    if cdb.should_collect_garbage(force) {
        garbage_collect(asg, cdb, elim);
    }
}

/// move every live clause into a fresh arena and rewrite all handles:
/// the clause list, the watcher lists, the occurrence lists, the
/// subsumption queue and the scratch unit clause.
pub fn garbage_collect(asg: &mut AssignStack, cdb: &mut ClauseDB, elim: &mut Eliminator) {
    cdb.clean_up();
    let mut to = cdb.ca.new_like();
    elim.reloc_all(&mut cdb.ca, &mut to);
    cdb.reloc_all(&mut to);
    cdb.rebuild_arena_with(to);
    // root-level reasons are no longer read by anyone; drop them instead
    // of keeping dangling handles alive
    asg.clear_root_reasons();
}

/// replay the log backwards; each record whose non-pivot literals are not
/// all false flips nothing, otherwise the pivot literal is made true.
pub(super) fn extend_model_impl(elim_clauses: &[u32], model: &mut Vec<Option<bool>>) {
    if elim_clauses.is_empty() {
        return;
    }
    let mut i = elim_clauses.len() - 1;
    loop {
        let width = elim_clauses[i] as usize;
        debug_assert!(0 < width);
        debug_assert!(width <= i);
        let base = i - width;
        let skip = elim_clauses[base + 1..i].iter().any(|&w| {
            let l = Lit::from(w);
            model[l.vi()].map_or(true, |b| b == bool::from(l))
        });
        if !skip {
            let x = Lit::from(elim_clauses[base]);
            model[x.vi()] = Some(bool::from(x));
        }
        if base == 0 {
            break;
        }
        i = base - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_model_sets_the_witness() {
        // eliminated var 1 with witness !1; pos side was [1, 2]
        let mut log: Vec<u32> = Vec::new();
        log.extend_from_slice(&[
            u32::from(Lit::from(1i32)),
            u32::from(Lit::from(2i32)),
            2,
            u32::from(Lit::from(-1i32)),
            1,
        ]);
        // model satisfying the reduced formula with var 2 true
        let mut model = vec![None, None, Some(true)];
        extend_model_impl(&log, &mut model);
        assert_eq!(model[1], Some(false));
        // with var 2 false the first record must flip the pivot back
        let mut model = vec![None, None, Some(false)];
        extend_model_impl(&log, &mut model);
        assert_eq!(model[1], Some(true));
    }

    #[test]
    fn extend_model_handles_lone_witness() {
        let mut log: Vec<u32> = Vec::new();
        log.extend_from_slice(&[u32::from(Lit::from(3i32)), 1]);
        let mut model = vec![None, Some(true), Some(false), None];
        extend_model_impl(&log, &mut model);
        assert_eq!(model[3], Some(true));
    }
}
