//! Module `solver` provides the top-level API: clause intake, the
//! preprocessing pass, and the solve contract around an external search
//! engine.
mod build;

use crate::{
    assign::{AssignIF, AssignStack, PropagateIF},
    cdb::{ClauseDB, ClauseDBIF, ClauseIF, ClauseRef},
    processor::{EliminateIF, Eliminator},
    state::State,
    types::*,
};

/// Normal results returned by Solver.
#[derive(Debug, Eq, PartialEq)]
pub enum Certificate {
    SAT(Vec<i32>),
    UNSAT,
}

/// The return type of solving.
/// This captures the following three cases:
/// * `Certificate::SAT` -- solved with a satisfiable assignment set,
/// * `Certificate::UNSAT` -- proved that it's an unsatisfiable problem, and
/// * `SolverError::*` -- caused by an internal error.
pub type SolverResult = Result<Certificate, SolverError>;

/// The search engine collaborating with the preprocessor: it receives the
/// simplified formula and reports its satisfiability. The engine must leave
/// a total assignment of the remaining vars on success.
pub trait SearchIF {
    /// search for a model of the simplified formula.
    ///
    /// # Errors
    ///
    /// if the search itself fails, e.g. by resource exhaustion.
    fn search(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        state: &mut State,
    ) -> Result<bool, SolverError>;
}

/// The simplifying solver, consisting of 4 sub modules.
/// ```
/// use crate::simplr::{solver::Solver, types::*};
///
/// let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, 2, 3]]).expect("valid CNF");
/// s.eliminate(false).expect("consistent");
/// assert!(s.state.ok);
/// ```
#[derive(Debug)]
pub struct Solver {
    /// assignment management
    pub asg: AssignStack,
    /// clause container
    pub cdb: ClauseDB,
    /// clause and variable elimination
    pub elim: Eliminator,
    /// misc data holder
    pub state: State,
}

impl Solver {
    /// make a new var and return its id.
    pub fn add_var(&mut self) -> VarId {
        self.asg.handle(SolverEvent::NewVar);
        self.cdb.handle(SolverEvent::NewVar);
        self.elim.handle(SolverEvent::NewVar);
        self.state.handle(SolverEvent::NewVar);
        self.asg.num_vars()
    }
    /// return `true` if the var was eliminated by the preprocessor.
    pub fn is_eliminated(&self, vi: VarId) -> bool {
        self.asg.var(vi).is(FlagVar::ELIMINATED)
    }
    /// forbid or re-allow elimination of a var. Assumption vars must be
    /// frozen for the duration of a search.
    pub fn set_frozen(&mut self, vi: VarId, frozen: bool) {
        if frozen {
            self.asg.var_mut(vi).turn_on(FlagVar::FROZEN);
        } else {
            self.asg.var_mut(vi).turn_off(FlagVar::FROZEN);
            let Solver { asg, elim, .. } = self;
            elim.enqueue_var(asg, vi, true);
        }
    }
    /// hold a literal as an assumption for the next search.
    pub fn add_assumption(&mut self, l: i32) {
        let lit = Lit::from(l);
        debug_assert!(!self.is_eliminated(lit.vi()), "assumption on an eliminated var");
        self.asg.assumptions.push(lit);
    }
    /// run the preprocessing pass. `turn_off` releases the preprocessor
    /// permanently afterwards.
    ///
    /// # Errors
    ///
    /// if the formula is found unsatisfiable; the failure is latched.
    pub fn eliminate(&mut self, turn_off: bool) -> MaybeInconsistent {
        if !self.state.ok {
            return Err(SolverError::Inconsistent);
        }
        let Solver {
            asg, cdb, elim, state, ..
        } = self;
        elim.simplify(asg, cdb, state, turn_off).map_err(|e| {
            state.ok = false;
            e
        })
    }
    /// replace every occurrence of var `vi` with the literal `x` (and its
    /// negation with `!x`), retiring `vi` from the formula. The caller owns
    /// the equivalence witness; nothing is added to the model-extension log.
    ///
    /// # Errors
    ///
    /// if a substituted clause falsifies the formula.
    pub fn substitute(&mut self, vi: VarId, x: Lit) -> MaybeInconsistent {
        if !self.state.ok {
            return Err(SolverError::Inconsistent);
        }
        debug_assert!(!self.asg.var(vi).is(FlagVar::FROZEN));
        debug_assert!(!self.asg.var(vi).is(FlagVar::ELIMINATED));
        debug_assert!(self.asg.assign(vi).is_none());
        debug_assert_ne!(x.vi(), vi);
        let targets = self
            .cdb
            .iter()
            .filter(|cr| {
                let c = &self.cdb[**cr];
                !c.is_dead() && c.iter().any(|l| l.vi() == vi)
            })
            .copied()
            .collect::<Vec<ClauseRef>>();
        self.asg.handle(SolverEvent::Eliminate(vi));
        for cr in targets {
            let mut vec = self.cdb[cr]
                .iter()
                .map(|l| {
                    if l.vi() == vi {
                        if bool::from(*l) {
                            x
                        } else {
                            !x
                        }
                    } else {
                        *l
                    }
                })
                .collect::<Vec<Lit>>();
            self.add_clause_(&mut vec)?;
            let Solver {
                asg, cdb, elim, ..
            } = self;
            elim.remove_cid_occur(asg, cr, &mut cdb[cr]);
            cdb.remove_clause(cr);
        }
        Ok(())
    }
    /// extend the search engine's assignment over the eliminated vars and
    /// store it as the current model.
    pub fn extend_model(&mut self) {
        let mut model = self.asg.assign_ref();
        self.elim.extend_model(&mut model);
        self.state.model = model;
    }
    /// the solve contract: freeze the assumption vars, run the
    /// preprocessing pass, hand the reduced formula to `engine`, and on a
    /// satisfiable outcome extend its model to the original formula.
    ///
    /// # Errors
    ///
    /// if the search engine fails.
    pub fn solve_with<S: SearchIF>(
        &mut self,
        engine: &mut S,
        do_simp: bool,
        turn_off_simp: bool,
    ) -> SolverResult {
        if !self.state.ok {
            return Ok(Certificate::UNSAT);
        }
        // assumptions must be temporarily frozen to run variable elimination
        let mut extra_frozen: Vec<VarId> = Vec::new();
        for l in self.asg.assumptions.clone() {
            let vi = l.vi();
            debug_assert!(!self.is_eliminated(vi), "assumption on an eliminated var");
            if !self.asg.var(vi).is(FlagVar::FROZEN) {
                self.set_frozen(vi, true);
                extra_frozen.push(vi);
            }
        }
        let mut falsified = false;
        if do_simp && self.eliminate(turn_off_simp).is_err() {
            falsified = true;
        }
        let result = if falsified {
            Ok(Certificate::UNSAT)
        } else {
            let Solver {
                asg, cdb, state, ..
            } = self;
            match engine.search(asg, cdb, state) {
                Ok(true) => {
                    self.extend_model();
                    self.asg.cancel_until(0);
                    debug_assert!(self.cdb.validate(&self.state.model, false).is_none());
                    Ok(Certificate::SAT(self.answer()))
                }
                Ok(false) => {
                    self.asg.cancel_until(0);
                    Ok(Certificate::UNSAT)
                }
                Err(e) => Err(e),
            }
        };
        // roll back the temporary freezes
        for vi in extra_frozen {
            self.set_frozen(vi, false);
        }
        result
    }
    /// the current model as a signed-integer assignment, 1-indexed.
    fn answer(&self) -> Vec<i32> {
        (1..=self.asg.num_vars())
            .map(|vi| {
                if self.state.model[vi] == Some(true) {
                    vi as i32
                } else {
                    -(vi as i32)
                }
            })
            .collect::<Vec<i32>>()
    }
    /// the live clauses as sorted signed-integer vectors, for inspection.
    pub fn clause_vectors(&self) -> Vec<Vec<i32>> {
        let mut out = self
            .cdb
            .iter()
            .filter(|cr| !self.cdb[**cr].is_dead())
            .map(|cr| {
                let mut v = Vec::<i32>::from(&self.cdb[*cr]);
                v.sort_unstable_by_key(|i| (i.abs(), *i < 0));
                v
            })
            .collect::<Vec<Vec<i32>>>();
        out.sort();
        out
    }
}
