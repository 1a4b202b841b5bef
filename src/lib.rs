/*!
# simplr

A SAT simplification engine in the CDCL family: bounded variable
elimination by clause distribution, backward subsumption, and
self-subsuming resolution, over a compacting clause arena with stable
handles. Every eliminated variable is recorded in a model-extension log,
so a model of the reduced formula can be extended to the original one.

The search loop itself is not part of this crate; plug one in through
[`solver::SearchIF`].

```
use simplr::{solver::Solver, types::*};

let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, 3], vec![-2, 3]]).expect("valid CNF");
s.eliminate(false).expect("consistent");
assert!(s.state.ok);
```
*/
/// assignment management and unit propagation
pub mod assign;
/// clause arena and clause database
pub mod cdb;
/// solver configuration
pub mod config;
/// the simplification preprocessor
pub mod processor;
/// the top-level solver API
pub mod solver;
/// misc data holder
pub mod state;
/// plumbing layer
pub mod types;
