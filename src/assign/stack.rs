//! main struct AssignStack
use {
    super::{AssignIF, AssignReason, Var, VarIdHeap},
    crate::types::*,
    std::{fmt, ops::Range, slice::Iter},
};

/// A record of assignment. It's called 'trail' in Glucose.
#[derive(Clone, Debug, Default)]
pub struct AssignStack {
    /// record of assignment
    pub(super) trail: Vec<Lit>,
    pub(super) trail_lim: Vec<usize>,
    /// the-number-of-assigned-and-propagated-vars + 1
    pub(super) q_head: usize,
    /// vars; index 0 is a sentinel
    pub(super) var: Vec<Var>,
    /// decision var ordering
    pub(super) var_order: VarIdHeap,
    /// lits the caller wants to hold during search
    pub assumptions: Vec<Lit>,

    //
    //## Statistics
    //
    /// the number of vars.
    pub num_vars: usize,
    /// the number of vars asserted at decision level zero.
    pub num_asserted_vars: usize,
    /// the number of eliminated vars.
    pub num_eliminated_vars: usize,
    pub num_propagation: usize,
    pub num_conflict: usize,
}

impl<'a> IntoIterator for &'a AssignStack {
    type Item = &'a Lit;
    type IntoIter = Iter<'a, Lit>;
    fn into_iter(self) -> Self::IntoIter {
        self.trail.iter()
    }
}

impl From<&AssignStack> for Vec<i32> {
    fn from(asg: &AssignStack) -> Vec<i32> {
        asg.trail.iter().map(|l| i32::from(*l)).collect::<Vec<_>>()
    }
}

impl fmt::Display for AssignStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.trail.iter().map(|l| i32::from(*l)).collect::<Vec<_>>();
        let len = self.decision_level();
        if 0 < len {
            write!(f, "ASG:: trail({}):{:?}, trail_lim: {:?}", v.len(), v, self.trail_lim)
        } else {
            write!(f, "ASG:: trail({}):{:?}", v.len(), v)
        }
    }
}

impl Instantiate for AssignStack {
    fn instantiate(_config: &Config, cnf: &CNFDescription) -> AssignStack {
        let nv = cnf.num_of_variables;
        AssignStack {
            trail: Vec::with_capacity(nv),
            var: Var::new_vars(nv),
            var_order: VarIdHeap::new(nv),
            num_vars: nv,
            ..AssignStack::default()
        }
    }
    fn handle(&mut self, e: SolverEvent) {
        match e {
            SolverEvent::NewVar => {
                self.num_vars += 1;
                self.var.push(Var::default());
                self.var_order.expand();
            }
            SolverEvent::Eliminate(vi) => {
                self.make_var_eliminated(vi);
            }
        }
    }
}

impl AssignIF for AssignStack {
    fn num_vars(&self) -> usize {
        self.num_vars
    }
    #[inline]
    fn var(&self, vi: VarId) -> &Var {
        &self.var[vi]
    }
    #[inline]
    fn var_mut(&mut self, vi: VarId) -> &mut Var {
        &mut self.var[vi]
    }
    #[inline]
    fn assign(&self, vi: VarId) -> Option<bool> {
        self.var[vi].assign
    }
    #[inline]
    fn assigned(&self, l: Lit) -> Option<bool> {
        match self.var[l.vi()].assign {
            Some(x) if !bool::from(l) => Some(!x),
            x => x,
        }
    }
    #[inline]
    fn level(&self, vi: VarId) -> DecisionLevel {
        self.var[vi].level
    }
    #[inline]
    fn reason(&self, vi: VarId) -> AssignReason {
        self.var[vi].reason
    }
    fn decision_level(&self) -> DecisionLevel {
        self.trail_lim.len() as DecisionLevel
    }
    fn stack(&self, i: usize) -> Lit {
        self.trail[i]
    }
    fn stack_range(&self, r: Range<usize>) -> &[Lit] {
        &self.trail[r]
    }
    fn stack_len(&self) -> usize {
        self.trail.len()
    }
    fn stack_iter(&self) -> Iter<'_, Lit> {
        self.trail.iter()
    }
    fn remains(&self) -> bool {
        self.q_head < self.trail.len()
    }
    fn assign_ref(&self) -> Vec<Option<bool>> {
        self.var.iter().map(|v| v.assign).collect::<Vec<_>>()
    }
    fn set_decision_var(&mut self, vi: VarId, b: bool) {
        if b {
            self.var[vi].turn_on(FlagVar::DECISION);
            self.insert_var_order(vi);
        } else {
            self.var[vi].turn_off(FlagVar::DECISION);
            self.var_order.remove(&self.var, vi);
        }
    }
    fn rebuild_order_heap(&mut self) {
        self.var_order.clear();
        for vi in 1..=self.num_vars {
            let v = &self.var[vi];
            if v.is(FlagVar::DECISION) && !v.is(FlagVar::ELIMINATED) && v.assign.is_none() {
                self.var_order.insert(&self.var, vi);
            }
        }
    }
    fn select_decision_var(&mut self) -> Option<VarId> {
        while let Some(vi) = self.var_order.pop(&self.var) {
            let v = &self.var[vi];
            if v.assign.is_none() && !v.is(FlagVar::ELIMINATED) && v.is(FlagVar::DECISION) {
                return Some(vi);
            }
        }
        None
    }
}

impl AssignStack {
    /// forget root-level implication reasons; called after arena compaction
    /// made their clause handles meaningless.
    pub(crate) fn clear_root_reasons(&mut self) {
        let AssignStack {
            ref trail,
            ref mut var,
            ..
        } = self;
        for l in trail.iter() {
            var[l.vi()].reason = AssignReason::None;
        }
    }
    /// push a var back to the decision-var heap.
    pub(super) fn insert_var_order(&mut self, vi: VarId) {
        let v = &self.var[vi];
        if v.is(FlagVar::DECISION) && !v.is(FlagVar::ELIMINATED) {
            self.var_order.insert(&self.var, vi);
        }
    }
    /// retire a var from the active formula.
    fn make_var_eliminated(&mut self, vi: VarId) {
        let v = &mut self.var[vi];
        debug_assert!(v.assign.is_none());
        debug_assert!(!v.is(FlagVar::ELIMINATED));
        v.turn_on(FlagVar::ELIMINATED);
        v.turn_off(FlagVar::DECISION);
        self.var_order.remove(&self.var, vi);
        self.num_eliminated_vars += 1;
    }
}
