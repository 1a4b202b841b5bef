//! Module `processor` implements the simplification preprocessor:
//! clause subsumption, self-subsuming resolution, and bounded variable
//! elimination, together with the log which extends a model of the
//! simplified formula back to the original one.
//!
//! * private module `eliminate` provides var elimination
//! * private module `subsume` provides clause subsumption and strengthening
//! * private module `simplify` provides the driver loop and model extension
//!
//!# Example
//!
//!```
//! use simplr::{processor::EliminateIF, solver::Solver, types::*};
//! let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, 2, 3], vec![-2, 3]]).expect("valid CNF");
//! let Solver { ref mut asg, ref mut cdb, ref mut elim, ref mut state } = s;
//! elim.simplify(asg, cdb, state, false).expect("consistent");
//!```
/// var elimination
mod eliminate;
/// occurrence lists and var heap
mod heap;
/// the driver, cleanup, and model extension
mod simplify;
/// clause subsumption
mod subsume;

pub use self::{
    heap::{LitOccurs, VarOccHeap},
    simplify::{check_garbage, garbage_collect},
};

use {
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::{Clause, ClauseDB, ClauseIF, ClauseRef},
        state::State,
        types::*,
    },
    std::{
        collections::VecDeque,
        ops::{Index, IndexMut},
    },
};

/// API for the eliminator.
pub trait EliminateIF: Instantiate {
    /// check if the eliminator is running.
    fn is_running(&self) -> bool;
    /// start a pass: build the occurrence lists and fill both worklists
    /// from the live clause database. A no-op unless the eliminator is
    /// dormant.
    fn prepare(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB);
    /// run a pass of clause subsumption and variable elimination, then hand
    /// the arena back in a compact state. A `turn_off` pass is the last one:
    /// it releases all preprocessor-only tables.
    ///
    /// # Errors
    ///
    /// if the formula is found unsatisfiable.
    fn simplify(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        state: &mut State,
        turn_off: bool,
    ) -> MaybeInconsistent;
    /// enqueue a var into the eliminator's var queue, or re-heapify it
    /// after its occurrence counts changed in the direction of `upward`.
    fn enqueue_var(&mut self, asg: &mut AssignStack, vi: VarId, upward: bool);
    /// return the live occurrence counts of a var, by polarity.
    fn stats(&self, vi: VarId) -> (usize, usize);
    /// return the model-extension log.
    fn elim_clauses(&self) -> &[u32];
    /// extend a model of the simplified formula to the original one by
    /// replaying the log backwards.
    fn extend_model(&self, model: &mut Vec<Option<bool>>);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum EliminatorMode {
    /// permanently turned off; only unit propagation remains.
    Disabled,
    /// between passes; occurrence tables are empty.
    Dormant,
    /// inside a pass.
    Running,
}

/// Literal eliminator
#[derive(Clone, Debug)]
pub struct Eliminator {
    /// master switch for variable elimination; subsumption runs regardless.
    pub enable: bool,
    mode: EliminatorMode,
    var_queue: VarOccHeap,
    clause_queue: VecDeque<ClauseRef>,
    /// cursor into the trail; literals past it still work as unit subsumers.
    bwdsub_assigns: usize,
    /// pre-allocated scratch clause carrying trail literals into the queue.
    bwdsub_tmpunit: Option<ClauseRef>,
    /// the number of vars touched since the last gather.
    n_touched: usize,
    /// occurrence lists, indexed by var.
    var: Vec<LitOccurs>,
    /// the model-extension log; encoded clauses of eliminated vars.
    elim_clauses: Vec<u32>,
    /// Stop elimination if the increase of clauses is over this
    eliminate_grow_limit: usize,
    /// Stop elimination if a resolvent is longer than this (0 = no limit)
    resolvent_length_limit: usize,
    /// Skip subsumption against a clause having more lits than this (0 = no limit)
    subsume_literal_limit: usize,
    /// Skip the whole pass over databases with more clauses than this
    preprocess_clause_bound: usize,
    //
    //## statistics
    //
    pub num_subsumed: usize,
    pub num_strengthened: usize,
    pub num_merges: usize,
    pub num_full_elimination: usize,
}

impl Default for Eliminator {
    fn default() -> Eliminator {
        Eliminator {
            enable: true,
            mode: EliminatorMode::Dormant,
            var_queue: VarOccHeap::new(0),
            clause_queue: VecDeque::new(),
            bwdsub_assigns: 0,
            bwdsub_tmpunit: None,
            n_touched: 0,
            var: Vec::new(),
            elim_clauses: Vec::new(),
            eliminate_grow_limit: 0,
            resolvent_length_limit: 20,
            subsume_literal_limit: 1_000,
            preprocess_clause_bound: 4_800_000,
            num_subsumed: 0,
            num_strengthened: 0,
            num_merges: 0,
            num_full_elimination: 0,
        }
    }
}

impl Index<VarId> for Eliminator {
    type Output = LitOccurs;
    #[inline]
    fn index(&self, i: VarId) -> &Self::Output {
        &self.var[i]
    }
}

impl IndexMut<VarId> for Eliminator {
    #[inline]
    fn index_mut(&mut self, i: VarId) -> &mut Self::Output {
        &mut self.var[i]
    }
}

impl Index<Lit> for Eliminator {
    type Output = LitOccurs;
    #[inline]
    fn index(&self, l: Lit) -> &Self::Output {
        &self.var[l.vi()]
    }
}

impl IndexMut<Lit> for Eliminator {
    #[inline]
    fn index_mut(&mut self, l: Lit) -> &mut Self::Output {
        &mut self.var[l.vi()]
    }
}

impl Instantiate for Eliminator {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Eliminator {
        let nv = cnf.num_of_variables;
        Eliminator {
            enable: config.enable_eliminator,
            var_queue: VarOccHeap::new(nv),
            var: LitOccurs::new(nv),
            eliminate_grow_limit: config.elm_grw_lim,
            resolvent_length_limit: config.elm_rsl_lim,
            subsume_literal_limit: config.elm_sub_lim,
            preprocess_clause_bound: config.elm_cls_bnd,
            ..Eliminator::default()
        }
    }
    fn handle(&mut self, e: SolverEvent) {
        if e == SolverEvent::NewVar && self.mode != EliminatorMode::Disabled {
            self.var.push(LitOccurs::default());
            self.var_queue.expand();
        }
    }
}

impl Eliminator {
    /// register a clause to the occurrence lists of all its vars.
    pub fn add_cid_occur(
        &mut self,
        asg: &mut AssignStack,
        cr: ClauseRef,
        c: &mut Clause,
        enqueue: bool,
    ) {
        if self.mode != EliminatorMode::Running || c.is(FlagClause::OCCUR_LINKED) {
            return;
        }
        for l in c.iter() {
            let vi = l.vi();
            debug_assert!(!asg.var(vi).is(FlagVar::ELIMINATED));
            self.var[vi].push(bool::from(*l), cr);
            self.touch_var(asg, vi);
            self.enqueue_var(asg, vi, false);
        }
        c.turn_on(FlagClause::OCCUR_LINKED);
        if enqueue {
            self.enqueue_clause(cr, c);
        }
    }
    /// unlink a clause from the occurrence lists of all its vars; the
    /// lists themselves are compacted lazily.
    pub fn remove_cid_occur(&mut self, asg: &mut AssignStack, cr: ClauseRef, c: &mut Clause) {
        if self.mode != EliminatorMode::Running || !c.is(FlagClause::OCCUR_LINKED) {
            return;
        }
        debug_assert!(!c.is_dead());
        debug_assert!(usize::from(cr) != 0);
        c.turn_off(FlagClause::OCCUR_LINKED);
        for l in c.iter() {
            let vi = l.vi();
            if !asg.var(vi).is(FlagVar::ELIMINATED) {
                self.var[vi].smudge(bool::from(*l));
                self.enqueue_var(asg, vi, true);
            }
        }
    }
    /// remove a clause handle from one literal's occurrence list eagerly.
    pub fn remove_lit_occur(&mut self, asg: &mut AssignStack, l: Lit, cr: ClauseRef) {
        self.var[l.vi()].remove(bool::from(l), cr);
        self.enqueue_var(asg, l.vi(), true);
    }
    /// mark a var as mentioned by a new or modified clause.
    fn touch_var(&mut self, asg: &mut AssignStack, vi: VarId) {
        if !asg.var(vi).is(FlagVar::TOUCHED) {
            asg.var_mut(vi).turn_on(FlagVar::TOUCHED);
            self.n_touched += 1;
        }
    }

    //
    // clause queue operations
    //

    /// enqueue a clause into the eliminator's clause queue.
    pub fn enqueue_clause(&mut self, cr: ClauseRef, c: &mut Clause) {
        if self.mode != EliminatorMode::Running
            || c.is(FlagClause::ENQUEUED)
            || c.is_dead()
        {
            return;
        }
        self.clause_queue.push_back(cr);
        c.turn_on(FlagClause::ENQUEUED);
    }
    /// clear the eliminator's clause queue.
    pub(super) fn clear_clause_queue(&mut self, cdb: &mut ClauseDB) {
        for cr in self.clause_queue.drain(..) {
            cdb[cr].turn_off(FlagClause::ENQUEUED);
        }
    }

    //
    // var queue operations
    //

    /// clear the eliminator's var queue.
    pub(super) fn clear_var_queue(&mut self, asg: &mut AssignStack) {
        self.var_queue.clear(asg);
    }
}

impl EliminateIF for Eliminator {
    fn is_running(&self) -> bool {
        self.mode == EliminatorMode::Running
    }
    fn prepare(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB) {
        if self.mode != EliminatorMode::Dormant {
            return;
        }
        self.mode = EliminatorMode::Running;
        // the extra field must be on before the scratch clause is allocated
        cdb.ca.extra_clause_field = true;
        if self.bwdsub_tmpunit.is_none() {
            let mut scratch = vec![Lit::from((1, false))];
            self.bwdsub_tmpunit = Some(cdb.ca.alloc(&mut scratch, false));
        }
        for w in self.var[1..].iter_mut() {
            w.clear();
        }
        for i in 0..cdb.clauses.len() {
            let cr = cdb.clauses[i];
            if cdb[cr].is_dead() || cdb[cr].is(FlagClause::OCCUR_LINKED) {
                continue;
            }
            // clauses taken in while the extra field was off have no signature
            cdb[cr].calc_abstraction();
            self.add_cid_occur(asg, cr, &mut cdb[cr], true);
        }
        for vi in 1..=asg.num_vars() {
            let v = asg.var(vi);
            if v.is(FlagVar::ELIMINATED) || asg.assign(vi).is_some() {
                continue;
            }
            self.enqueue_var(asg, vi, true);
        }
    }
    fn enqueue_var(&mut self, asg: &mut AssignStack, vi: VarId, upward: bool) {
        if self.mode != EliminatorMode::Running {
            return;
        }
        if self.var_queue.contains(vi) {
            self.var_queue.insert(&self.var, vi, upward);
            return;
        }
        let v = asg.var(vi);
        if v.is(FlagVar::ELIMINATED) || v.is(FlagVar::FROZEN) || asg.assign(vi).is_some() {
            return;
        }
        asg.var_mut(vi).turn_on(FlagVar::ENQUEUED);
        self.var_queue.insert(&self.var, vi, upward);
    }
    fn stats(&self, vi: VarId) -> (usize, usize) {
        let w = &self.var[vi];
        (w.num_pos, w.num_neg)
    }
    fn elim_clauses(&self) -> &[u32] {
        &self.elim_clauses
    }
    fn extend_model(&self, model: &mut Vec<Option<bool>>) {
        simplify::extend_model_impl(&self.elim_clauses, model);
    }
    fn simplify(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        state: &mut State,
        turn_off: bool,
    ) -> MaybeInconsistent {
        simplify::run(self, asg, cdb, state, turn_off)
    }
}

/// consistency checker between the occurrence lists and the clause db,
/// for tests and debugging.
#[allow(dead_code)]
fn check_occurrences(cdb: &ClauseDB, elim: &Eliminator) -> bool {
    use crate::cdb::ClauseDBIF;
    for cr in cdb.iter() {
        let c = &cdb[*cr];
        if c.is_dead() {
            continue;
        }
        for l in c.iter() {
            let w = &elim[l.vi()];
            let list = if bool::from(*l) {
                &w.pos_occurs
            } else {
                &w.neg_occurs
            };
            if !list.contains(cr) {
                panic!("unregistered occurrence {cr} {c}");
            }
        }
    }
    true
}
