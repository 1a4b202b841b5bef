//! Module `types` provides various building blocks, including
//! some common traits.

/// methods on flags used in Var and Clause
pub mod flags;
/// methods on literals
pub mod lit;

pub use self::{flags::*, lit::*};

pub use crate::{assign::AssignReason, config::Config};

use {std::fmt, thiserror::Error};

/// 'Variable' identifier or 'variable' index, starting with one.
pub type VarId = usize;

/// Decision Level Representation.
pub type DecisionLevel = u32;

/// API for object instantiation based on `Config` and `CNFDescription`.
/// This is implemented by all the sub-modules of [`Solver`](`crate::solver::Solver`).
///
/// # Example
///
/// ```
/// use crate::{simplr::config::Config, simplr::types::*};
/// use simplr::{cdb::ClauseDB, solver::Solver};
/// let _ = ClauseDB::instantiate(&Config::default(), &CNFDescription::default());
/// let _ = Solver::instantiate(&Config::default(), &CNFDescription::default());
///```
pub trait Instantiate {
    /// make and return an object from `Config` and `CNFDescription`.
    fn instantiate(conf: &Config, cnf: &CNFDescription) -> Self;
    /// update by a solver event.
    fn handle(&mut self, _e: SolverEvent) {}
}

/// Events shared by the sub-modules.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverEvent {
    /// a new var was requested.
    NewVar,
    /// a var was eliminated.
    Eliminate(VarId),
}

/// API for O(n) deletion from a list, providing `delete_unstable`.
pub trait Delete<T> {
    /// *O(n)* item deletion protocol.
    fn delete_unstable<F>(&mut self, filter: F)
    where
        F: FnMut(&T) -> bool;
}

impl<T> Delete<T> for Vec<T> {
    fn delete_unstable<F>(&mut self, filter: F)
    where
        F: FnMut(&T) -> bool,
    {
        if let Some(i) = self.iter().position(filter) {
            self.swap_remove(i);
        }
    }
}

/// Internal errors.
/// Note: returning `Result<(), a-singleton>` is identical to returning `bool`.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SolverError {
    /// a given CNF contains an empty clause or derives one during intake
    #[error("empty clause")]
    EmptyClause,
    /// a clause contains a literal out of range; '0' is an example
    #[error("invalid literal")]
    InvalidLiteral,
    /// operation on a solver which already latched unsatisfiability
    #[error("solver is inconsistent")]
    Inconsistent,
    /// UNSAT with the literal which triggered the conflict
    #[error("conflict by {0} at the root level")]
    RootLevelConflict(Lit),
    /// clause database passed the soft limit
    #[error("out of memory")]
    OutOfMemory,
}

/// A Return type used by solver functions.
pub type MaybeInconsistent = Result<(), SolverError>;

/// CNF locator
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CNFIndicator {
    /// not specified
    #[default]
    Void,
    /// embedded directly
    LitVec(usize),
}

impl fmt::Display for CNFIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CNFIndicator::Void => write!(f, "(no CNF specified)"),
            CNFIndicator::LitVec(n) => write!(f, "a vec({n} clauses)"),
        }
    }
}

/// Data storage about a problem.
#[derive(Clone, Debug, Default)]
pub struct CNFDescription {
    pub num_of_variables: usize,
    pub num_of_clauses: usize,
    pub pathname: CNFIndicator,
}

impl fmt::Display for CNFDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let CNFDescription {
            num_of_variables: nv,
            num_of_clauses: nc,
            pathname: path,
        } = &self;
        write!(f, "CNF({nv}, {nc}, {path})")
    }
}

impl<V: AsRef<[i32]>> From<&[V]> for CNFDescription {
    fn from(vec: &[V]) -> Self {
        let num_of_variables = vec
            .iter()
            .map(|clause| clause.as_ref().iter().map(|l| l.abs()).max().unwrap_or(0))
            .max()
            .unwrap_or(0) as usize;
        CNFDescription {
            num_of_variables,
            num_of_clauses: vec.len(),
            pathname: CNFIndicator::LitVec(vec.len()),
        }
    }
}
