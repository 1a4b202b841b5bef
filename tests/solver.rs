//! End-to-end checks: preprocessing preserves satisfiability, and extended
//! models satisfy the original formula. Search is driven by a brute-force
//! engine, which this crate deliberately does not ship.
use simplr::{
    assign::{AssignIF, AssignStack, PropagateIF},
    cdb::ClauseDB,
    solver::{Certificate, SearchIF, Solver},
    state::State,
    types::*,
};

/// exhaustive DPLL over the decision vars; good enough for tiny formulas.
struct ExhaustiveSearch;

impl SearchIF for ExhaustiveSearch {
    fn search(
        &mut self,
        asg: &mut AssignStack,
        cdb: &mut ClauseDB,
        _state: &mut State,
    ) -> Result<bool, SolverError> {
        if asg.remains() && asg.propagate(cdb).is_some() {
            return Ok(false);
        }
        Ok(search(asg, cdb))
    }
}

fn search(asg: &mut AssignStack, cdb: &mut ClauseDB) -> bool {
    let Some(vi) = asg.select_decision_var() else {
        return true;
    };
    let lv = asg.decision_level();
    for phase in [true, false] {
        asg.assign_by_decision(Lit::from((vi, phase)));
        if asg.propagate(cdb).is_none() && search(asg, cdb) {
            return true;
        }
        asg.cancel_until(lv);
    }
    false
}

/// truth-table oracle over the original clause vectors.
fn satisfiable_by_enumeration(clauses: &[Vec<i32>], nv: usize) -> bool {
    debug_assert!(nv < 20);
    (0..1u32 << nv).any(|m| {
        clauses.iter().all(|c| {
            c.iter().any(|l| {
                let bit = (m >> (l.unsigned_abs() - 1)) & 1 == 1;
                bit == (0 < *l)
            })
        })
    })
}

fn model_satisfies(clauses: &[Vec<i32>], model: &[i32]) -> bool {
    clauses.iter().all(|c| {
        c.iter().any(|l| {
            let vi = l.unsigned_abs() as usize;
            model[vi - 1] == *l
        })
    })
}

fn num_vars_of(clauses: &[Vec<i32>]) -> usize {
    clauses
        .iter()
        .flat_map(|c| c.iter().map(|l| l.unsigned_abs() as usize))
        .max()
        .unwrap_or(0)
}

/// solve with preprocessing and cross-check the result against the oracle.
fn check_against_oracle(clauses: Vec<Vec<i32>>) {
    let nv = num_vars_of(&clauses);
    let expected = satisfiable_by_enumeration(&clauses, nv);
    let result = match Solver::try_from(clauses.clone()) {
        Ok(mut s) => s
            .solve_with(&mut ExhaustiveSearch, true, false)
            .expect("no internal error"),
        Err(_) => Certificate::UNSAT,
    };
    match result {
        Certificate::SAT(model) => {
            assert!(expected, "solver said SAT on an UNSAT formula: {clauses:?}");
            assert!(
                model_satisfies(&clauses, &model),
                "extended model {model:?} does not satisfy {clauses:?}"
            );
        }
        Certificate::UNSAT => {
            assert!(!expected, "solver said UNSAT on a SAT formula: {clauses:?}");
        }
    }
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Lcg {
        Lcg {
            state: seed.wrapping_mul(2862933555777941757).wrapping_add(3037000493),
        }
    }
    fn next(&mut self, bound: usize) -> usize {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 33) as usize) % bound
    }
}

fn random_formula(seed: u64, nv: usize, nc: usize) -> Vec<Vec<i32>> {
    let mut rng = Lcg::new(seed);
    let mut clauses = Vec::with_capacity(nc);
    for _ in 0..nc {
        let width = 1 + rng.next(3);
        let mut c: Vec<i32> = Vec::with_capacity(width);
        while c.len() < width {
            let v = 1 + rng.next(nv) as i32;
            let l = if rng.next(2) == 0 { v } else { -v };
            if !c.iter().any(|x| x.abs() == v) {
                c.push(l);
            }
        }
        clauses.push(c);
    }
    clauses
}

#[test]
fn hand_picked_formulas_round_trip() {
    for clauses in [
        vec![vec![1, 2], vec![-1, 3]],
        vec![vec![1, 2], vec![1, 2, 3]],
        vec![vec![1, 2], vec![-1, -2]],
        vec![vec![1, 2, 3], vec![-1, 2], vec![-2, 3, 4]],
        vec![vec![1], vec![-1, 2], vec![-2, 3]],
        vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]],
        vec![vec![1, 2, 3], vec![-1, -2], vec![-2, -3], vec![-1, -3], vec![2, 3]],
    ] {
        check_against_oracle(clauses);
    }
}

#[test]
fn random_formulas_round_trip() {
    for seed in 0..60 {
        let clauses = random_formula(seed, 3 + (seed as usize % 6), 4 + (seed as usize % 9));
        check_against_oracle(clauses);
    }
}

#[test]
fn random_formulas_round_trip_without_preprocessing_agree() {
    // the preprocessed result must agree with plain search on the same input
    for seed in 100..130 {
        let clauses = random_formula(seed, 4, 7);
        let plain = match Solver::try_from(clauses.clone()) {
            Ok(mut s) => matches!(
                s.solve_with(&mut ExhaustiveSearch, false, false)
                    .expect("no internal error"),
                Certificate::SAT(_)
            ),
            Err(_) => false,
        };
        let simplified = match Solver::try_from(clauses.clone()) {
            Ok(mut s) => matches!(
                s.solve_with(&mut ExhaustiveSearch, true, false)
                    .expect("no internal error"),
                Certificate::SAT(_)
            ),
            Err(_) => false,
        };
        assert_eq!(plain, simplified, "disagreement on {clauses:?}");
    }
}

#[test]
fn assumption_vars_are_frozen_through_solving() {
    let mut s = Solver::try_from(vec![vec![1, 2], vec![-1, 3]]).expect("valid CNF");
    s.add_assumption(1);
    let result = s
        .solve_with(&mut ExhaustiveSearch, true, false)
        .expect("no internal error");
    assert!(matches!(result, Certificate::SAT(_)));
    assert!(!s.is_eliminated(1));
    // the temporary freeze was rolled back
    assert!(!s.asg.var(1).is(FlagVar::FROZEN));
}

#[test]
fn solving_after_turn_off_still_works() {
    let mut s =
        Solver::try_from(vec![vec![1, 2, 3], vec![-1, 2], vec![-2, 3]]).expect("valid CNF");
    let result = s
        .solve_with(&mut ExhaustiveSearch, true, true)
        .expect("no internal error");
    assert!(matches!(result, Certificate::SAT(_)));
    // preprocessing is gone for good, but solving again is fine
    let again = s
        .solve_with(&mut ExhaustiveSearch, true, false)
        .expect("no internal error");
    assert!(matches!(again, Certificate::SAT(_)));
}
