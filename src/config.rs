/// Crate `config` provides the solver's configuration.
///
/// All fields can be set programmatically; there is no CLI layer.
#[derive(Clone, Debug)]
pub struct Config {
    //
    //## clause DB
    //
    /// Soft limit of #clauses (0 = no limit)
    pub clause_limit: usize,

    //
    //## eliminator
    //
    /// Pre/in-processor switch
    pub enable_eliminator: bool,

    /// Grow limit of #cls in var elim.
    pub elm_grw_lim: usize,

    /// Max #lit for a resolvent made by var elimination (0 = no limit)
    pub elm_rsl_lim: usize,

    /// Max #lit for clause subsumption candidates (0 = no limit)
    pub elm_sub_lim: usize,

    /// #cls above which the whole preprocessing pass is skipped
    pub elm_cls_bnd: usize,

    //
    //## I/O configuration
    //
    /// Disable any progress message
    pub quiet_mode: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            clause_limit: 0,
            enable_eliminator: true,
            elm_grw_lim: 0,
            elm_rsl_lim: 20,
            elm_sub_lim: 1_000,
            elm_cls_bnd: 4_800_000,
            quiet_mode: true,
        }
    }
}
