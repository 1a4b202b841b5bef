use bitflags::bitflags;

/// API for object properties.
pub trait FlagIF {
    type FlagType;
    /// return true if the flag in on.
    fn is(&self, flag: Self::FlagType) -> bool;
    /// set the flag.
    fn set(&mut self, f: Self::FlagType, b: bool);
    /// toggle the flag off.
    fn turn_off(&mut self, flag: Self::FlagType);
    /// toggle the flag on.
    fn turn_on(&mut self, flag: Self::FlagType);
}

bitflags! {
    /// Misc flags used by [`Clause`](`crate::cdb::Clause`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagClause: u8 {
        /// a clause is a generated clause and is removable.
        const LEARNT       = 0b0000_0001;
        /// a clause is logically deleted but still occupies its arena slot.
        const DEAD         = 0b0000_0010;
        /// a clause sits in the subsumption queue.
        const ENQUEUED     = 0b0000_0100;
        /// a clause is registered in vars' occurrence lists.
        const OCCUR_LINKED = 0b0000_1000;
    }
}

bitflags! {
    /// Misc flags used by [`Var`](`crate::assign::Var`).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagVar: u8 {
        /// a var is a candidate for the search heuristic.
        const DECISION   = 0b0000_0001;
        /// a var is eliminated and managed by the eliminator.
        const ELIMINATED = 0b0000_0010;
        /// a var is enqueued in the eliminator's var queue.
        const ENQUEUED   = 0b0000_0100;
        /// a var must not be eliminated; assumption vars and caller locks.
        const FROZEN     = 0b0000_1000;
        /// a clause on the var was added or modified since the last gather.
        const TOUCHED    = 0b0001_0000;
    }
}
