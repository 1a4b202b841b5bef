//! Solver builder and clause intake.
use {
    super::Solver,
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF},
        processor::Eliminator,
        state::State,
        types::*,
    },
};

impl Default for Solver {
    fn default() -> Solver {
        Solver::instantiate(&Config::default(), &CNFDescription::default())
    }
}

impl Instantiate for Solver {
    /// ```
    /// use crate::{simplr::config::Config, simplr::types::*};
    /// use simplr::solver::Solver;
    /// let s = Solver::instantiate(&Config::default(), &CNFDescription::default());
    ///```
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Solver {
        let mut cdb = ClauseDB::instantiate(config, cnf);
        // the signature word must be maintained from the very first clause
        cdb.ca.extra_clause_field = true;
        Solver {
            asg: AssignStack::instantiate(config, cnf),
            cdb,
            elim: Eliminator::instantiate(config, cnf),
            state: State::instantiate(config, cnf),
        }
    }
}

impl TryFrom<Vec<Vec<i32>>> for Solver {
    type Error = SolverError;
    /// build a solver for a vec-represented CNF.
    ///
    /// # Example
    /// ```
    /// use crate::simplr::solver::Solver;
    ///
    /// let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, 2]]).expect("valid CNF");
    ///```
    fn try_from(vec: Vec<Vec<i32>>) -> Result<Self, Self::Error> {
        let cnf = CNFDescription::from(vec.as_slice());
        let mut s = Solver::instantiate(&Config::default(), &cnf);
        for c in vec.iter() {
            s.add_clause(c)?;
        }
        Ok(s)
    }
}

impl Solver {
    /// add a clause given as signed integers, growing the var table on
    /// demand.
    ///
    /// # Errors
    ///
    /// * `SolverError::InvalidLiteral` -- the clause contains a `0`.
    /// * otherwise the errors of [`add_clause_`](`Solver::add_clause_`).
    pub fn add_clause(&mut self, clause: &[i32]) -> MaybeInconsistent {
        if clause.iter().any(|l| *l == 0) {
            return Err(SolverError::InvalidLiteral);
        }
        for l in clause.iter() {
            while self.asg.num_vars() < l.unsigned_abs() as usize {
                self.add_var();
            }
        }
        let mut lits = clause.iter().map(|l| Lit::from(*l)).collect::<Vec<Lit>>();
        self.add_clause_(&mut lits)
    }
    /// the clause intake: sort, drop duplicate and falsified literals,
    /// recognize satisfied clauses and tautologies, assert units, and
    /// register the rest to the clause database (and, while the
    /// preprocessor is running, to its occurrence lists and queue).
    ///
    /// # Errors
    ///
    /// * `SolverError::EmptyClause` -- every literal was already falsified.
    /// * `SolverError::RootLevelConflict` -- a unit contradicted the trail.
    pub fn add_clause_(&mut self, lits: &mut Vec<Lit>) -> MaybeInconsistent {
        let Solver {
            asg,
            cdb,
            elim,
            state,
            ..
        } = self;
        if !state.ok {
            return Err(SolverError::Inconsistent);
        }
        debug_assert_eq!(asg.decision_level(), 0);
        debug_assert!(
            lits.iter().all(|l| !asg.var(l.vi()).is(FlagVar::ELIMINATED)),
            "clause over an eliminated var"
        );
        lits.sort_unstable();
        let mut j = 0;
        let mut l_: Option<Lit> = None; // last literal; [x, !x] means tautology.
        for i in 0..lits.len() {
            let li = lits[i];
            let sat = asg.assigned(li);
            if sat == Some(true) || Some(!li) == l_ {
                return Ok(());
            } else if sat != Some(false) && Some(li) != l_ {
                lits[j] = li;
                j += 1;
                l_ = Some(li);
            }
        }
        lits.truncate(j);
        match lits.len() {
            0 => {
                state.ok = false;
                Err(SolverError::EmptyClause)
            }
            1 => {
                let l0 = lits[0];
                if let Err(e) = asg.assign_at_root_level(l0) {
                    state.ok = false;
                    return Err(e);
                }
                if asg.propagate(cdb).is_some() {
                    state.ok = false;
                    return Err(SolverError::RootLevelConflict(l0));
                }
                Ok(())
            }
            _ => {
                let cr = cdb.new_clause(lits, false);
                elim.add_cid_occur(asg, cr, &mut cdb[cr], true);
                Ok(())
            }
        }
    }
}
