//! Module `state` is a collection of internal data, misc flags and the
//! progress reporter.
use {
    crate::{
        assign::AssignStack,
        cdb::ClauseDB,
        processor::Eliminator,
        types::*,
    },
    std::{
        fmt,
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        time::Instant,
    },
};

/// API for state/statistics management, providing [`progress`](`crate::state::StateIF::progress`).
pub trait StateIF {
    /// return `true` if a watchdog or signal handler requested a break.
    fn is_interrupted(&self) -> bool;
    /// return a shared handle to the interrupt flag.
    fn interrupt_handle(&self) -> Arc<AtomicBool>;
    /// write a progress report line.
    fn progress(&mut self, asg: &AssignStack, cdb: &ClauseDB, elim: &Eliminator);
    /// write a header before progress reports.
    fn progress_header(&mut self);
    /// flush an one-shot message.
    fn flush<S: AsRef<str>>(&self, mes: S);
}

/// Data storage for the solver's internal state.
#[derive(Clone, Debug)]
pub struct State {
    /// solver configuration
    pub config: Config,
    /// sticky consistency flag; `false` is terminal.
    pub ok: bool,
    /// remove satisfied clauses in base-level simplification; off while
    /// the preprocessor owns the clause database.
    pub remove_satisfied: bool,
    /// the latest assignment found by search, extended over eliminated vars.
    pub model: Vec<Option<bool>>,
    /// asynchronous break request, shared with a signal handler or watchdog.
    interrupt: Arc<AtomicBool>,
    /// problem description
    pub target: CNFDescription,
    /// the instant the solver was built.
    pub start: Instant,
    progress_cnt: usize,
}

impl Default for State {
    fn default() -> State {
        State {
            config: Config::default(),
            ok: true,
            remove_satisfied: false,
            model: Vec::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
            target: CNFDescription::default(),
            start: Instant::now(),
            progress_cnt: 0,
        }
    }
}

impl Instantiate for State {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> State {
        State {
            config: config.clone(),
            model: vec![None; cnf.num_of_variables + 1],
            target: cnf.clone(),
            ..State::default()
        }
    }
    fn handle(&mut self, e: SolverEvent) {
        if e == SolverEvent::NewVar {
            self.model.push(None);
        }
    }
}

impl StateIF for State {
    fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Acquire)
    }
    fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }
    fn progress_header(&mut self) {
        if self.config.quiet_mode {
            return;
        }
        println!("c {}", self.target);
    }
    fn progress(&mut self, asg: &AssignStack, cdb: &ClauseDB, elim: &Eliminator) {
        if self.config.quiet_mode {
            return;
        }
        self.progress_cnt += 1;
        println!(
            "c #{:<5} {:>9.2}s | vars: {}, asserted: {}, eliminated: {} | clauses: {} | subsumed: {}, strengthened: {}",
            self.progress_cnt,
            self.start.elapsed().as_secs_f64(),
            asg.num_vars,
            asg.num_asserted_vars,
            asg.num_eliminated_vars,
            cdb.num_clause,
            elim.num_subsumed,
            elim.num_strengthened,
        );
    }
    fn flush<S: AsRef<str>>(&self, mes: S) {
        if !self.config.quiet_mode {
            println!("c {}", mes.as_ref());
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "State({}, ok: {}, elapsed: {:.2})",
            self.target,
            self.ok,
            self.start.elapsed().as_secs_f64(),
        )
    }
}
