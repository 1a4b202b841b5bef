//! Scenario tests for the simplification preprocessor.
use simplr::{
    assign::AssignIF,
    cdb::{ClauseDBIF, ClauseIF},
    config::Config,
    processor::EliminateIF,
    solver::Solver,
    state::StateIF,
    types::*,
};

fn build(clauses: &[Vec<i32>]) -> Solver {
    Solver::try_from(clauses.to_vec()).expect("valid CNF")
}

fn assignment_satisfies(clauses: &[Vec<i32>], model: &[Option<bool>]) -> bool {
    clauses.iter().all(|c| {
        c.iter().any(|l| {
            let vi = l.unsigned_abs() as usize;
            model[vi] == Some(0 < *l)
        })
    })
}

#[test]
fn subsumption_removes_the_wider_clause() {
    // (a v b) and (a v b v c)
    let mut s = build(&[vec![1, 2], vec![1, 2, 3]]);
    s.elim.enable = false;
    s.eliminate(false).expect("consistent");
    assert_eq!(s.clause_vectors(), vec![vec![1, 2]]);
    // nothing was eliminated, so model extension changes nothing
    assert!(s.elim.elim_clauses().is_empty());
    let mut model = vec![Some(true); 4];
    s.elim.extend_model(&mut model);
    assert_eq!(model, vec![Some(true); 4]);
}

#[test]
fn elimination_of_a_singleton_connector() {
    // (x v a) and (-x v b); x disappears, leaving the resolvent
    let mut s = build(&[vec![1, 2], vec![-1, 3]]);
    s.eliminate(false).expect("consistent");
    assert!(s.is_eliminated(1));
    // with the default settings the pure vars 2 and 3 go as well
    assert!(s.clause_vectors().is_empty());
    let mut model = s.asg.assign_ref();
    s.elim.extend_model(&mut model);
    assert!(assignment_satisfies(&[vec![1, 2], vec![-1, 3]], &model));
}

#[test]
fn tautological_resolvent_empties_the_formula() {
    // (x v a) and (-x v -a); the only resolvent is tautological
    let input = vec![vec![1, 2], vec![-1, -2]];
    let mut s = build(&input);
    s.eliminate(false).expect("consistent");
    assert!(s.clause_vectors().is_empty());
    assert!(s.state.ok);
    // the log must be able to rebuild values for both vars
    let mut model = s.asg.assign_ref();
    s.elim.extend_model(&mut model);
    assert!(assignment_satisfies(&input, &model));
}

#[test]
fn growth_limit_keeps_the_variable() {
    // three clauses with x and three with -x on disjoint vars;
    // nine resolvents would replace six clauses. The side vars are
    // frozen so that pure-literal elimination cannot empty the formula
    // around x first.
    let input = vec![
        vec![1, 2],
        vec![1, 3],
        vec![1, 4],
        vec![-1, 5],
        vec![-1, 6],
        vec![-1, 7],
    ];
    let mut s = build(&input);
    for vi in 2..=7 {
        s.set_frozen(vi, true);
    }
    s.eliminate(false).expect("consistent");
    assert!(!s.is_eliminated(1));
    assert_eq!(s.clause_vectors().len(), 6);
}

#[test]
fn strengthening_by_self_subsuming_resolution() {
    // (a v b v c) and (-a v b): the first drops a
    let mut s = build(&[vec![1, 2, 3], vec![-1, 2]]);
    s.elim.enable = false;
    s.eliminate(false).expect("consistent");
    let cls = s.clause_vectors();
    assert_eq!(cls, vec![vec![-1, 2], vec![2, 3]]);
    assert_eq!(s.elim.num_strengthened, 1);
}

#[test]
fn unit_propagation_during_strengthening_detects_unsat() {
    // (a v b), (-a v b), (-b) is unsatisfiable; the conflict surfaces
    // during clause intake or preprocessing, not during search
    assert!(Solver::try_from(vec![vec![1, 2], vec![-1, 2], vec![-2]]).is_err());
}

#[test]
fn trail_literals_subsume_satisfied_clauses() {
    // the asserted literal is fed back through the scratch unit clause
    // and removes both satisfied clauses
    let mut s = build(&[vec![1, 2, 3], vec![-2, 3, 4]]);
    s.add_clause(&[3]).expect("consistent");
    s.elim.enable = false;
    s.eliminate(false).expect("consistent");
    assert!(s.clause_vectors().is_empty());
    assert_eq!(s.elim.num_subsumed, 2);
}

#[test]
fn trail_literals_strengthen_clauses_holding_their_negation() {
    let mut s = build(&[vec![1, -3, 4]]);
    s.add_clause(&[3]).expect("consistent");
    s.elim.enable = false;
    s.eliminate(false).expect("consistent");
    assert_eq!(s.clause_vectors(), vec![vec![1, 4]]);
    assert_eq!(s.elim.num_strengthened, 1);
}

#[test]
fn resolvent_length_limit_blocks_every_elimination() {
    let input = vec![vec![1, 2], vec![-1, 3], vec![2, -3], vec![-2, 3]];
    let config = Config {
        elm_rsl_lim: 1,
        ..Config::default()
    };
    let cnf = CNFDescription::from(input.as_slice());
    let mut s = Solver::instantiate(&config, &cnf);
    for c in input.iter() {
        s.add_clause(c).expect("consistent");
    }
    s.eliminate(false).expect("consistent");
    assert_eq!(s.asg.num_eliminated_vars, 0);
    assert!(s.elim.elim_clauses().is_empty());
    assert_eq!(s.clause_vectors().len(), 4);
}

#[test]
fn disabled_eliminator_leaves_the_log_empty() {
    let mut s = build(&[vec![1, 2], vec![-1, 2, 3], vec![-3, 4]]);
    s.elim.enable = false;
    s.eliminate(false).expect("consistent");
    assert_eq!(s.asg.num_eliminated_vars, 0);
    assert!(s.elim.elim_clauses().is_empty());
}

#[test]
fn elimination_reaches_a_fixpoint() {
    let input = vec![
        vec![1, 2, 3],
        vec![-1, 4],
        vec![-2, -4],
        vec![3, 4, 5],
        vec![-5, 1, 2],
        vec![-3, -4],
    ];
    let mut s = build(&input);
    s.eliminate(false).expect("consistent");
    let first = s.clause_vectors();
    let eliminated = s.asg.num_eliminated_vars;
    s.eliminate(false).expect("consistent");
    assert_eq!(s.clause_vectors(), first);
    assert_eq!(s.asg.num_eliminated_vars, eliminated);
}

#[test]
fn no_live_clause_mentions_an_eliminated_var() {
    let input = vec![
        vec![1, 2, 3],
        vec![-1, 4],
        vec![-2, -4],
        vec![3, 4, 5],
        vec![-5, 1, 2],
    ];
    let mut s = build(&input);
    s.eliminate(false).expect("consistent");
    let eliminated = (1..=s.asg.num_vars())
        .filter(|vi| s.is_eliminated(*vi))
        .collect::<Vec<_>>();
    for cr in s.cdb.iter() {
        let c = &s.cdb[*cr];
        if c.is_dead() {
            continue;
        }
        assert!(c.iter().all(|l| !eliminated.contains(&l.vi())));
    }
}

#[test]
fn frozen_vars_survive() {
    let mut s = build(&[vec![1, 2], vec![-1, 3]]);
    s.set_frozen(1, true);
    s.eliminate(false).expect("consistent");
    assert!(!s.is_eliminated(1));
}

#[test]
fn interrupted_pass_is_sound_and_resumable() {
    let input = vec![
        vec![1, 2, 3],
        vec![-1, 4],
        vec![-2, -4],
        vec![3, 4, 5],
        vec![-5, 1, 2],
    ];
    let mut interrupted = build(&input);
    let handle = interrupted.state.interrupt_handle();
    handle.store(true, std::sync::atomic::Ordering::Release);
    interrupted.eliminate(false).expect("interrupt is not an error");
    assert!(interrupted.state.ok);
    // resume and compare against an uninterrupted run
    handle.store(false, std::sync::atomic::Ordering::Release);
    interrupted.eliminate(false).expect("consistent");
    let mut reference = build(&input);
    reference.eliminate(false).expect("consistent");
    assert_eq!(interrupted.clause_vectors(), reference.clause_vectors());
}

#[test]
fn second_pass_after_turn_off_is_a_no_op() {
    let mut s = build(&[vec![1, 2, 3], vec![-1, 2], vec![-2, 3, 4]]);
    s.eliminate(true).expect("consistent");
    let frozen_state = s.clause_vectors();
    s.eliminate(false).expect("consistent");
    assert_eq!(s.clause_vectors(), frozen_state);
    assert_eq!(s.elim.num_full_elimination, 1);
}
