use {
    crate::types::VarId,
    std::{fmt, ops::Not},
};

/// Literal encoded on `u32` as:
///
/// - the literal corresponding to a negative occurrence of variable `n` is `2 * n` and
/// - that for the positive one is `2 * n + 1`.
///
/// Variables start at one; the values `0` and `1` are never valid literals.
///
/// # Examples
///
/// ```
/// use simplr::types::*;
/// assert_eq!(2u32, Lit::from(-1i32).into());
/// assert_eq!(3u32, Lit::from( 1i32).into());
/// assert_eq!(4u32, Lit::from(-2i32).into());
/// assert_eq!(5u32, Lit::from( 2i32).into());
/// assert_eq!( 1i32, Lit::from( 1i32).into());
/// assert_eq!(-2i32, Lit::from(-2i32).into());
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Lit {
    ordinal: u32,
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}L", i32::from(self))
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}L", i32::from(self))
    }
}

/// convert literals to `[i32]` (for debug).
pub fn i32s(v: &[Lit]) -> Vec<i32> {
    v.iter().map(|l| i32::from(*l)).collect::<Vec<_>>()
}

impl From<(VarId, bool)> for Lit {
    #[inline]
    fn from((vi, positive): (VarId, bool)) -> Self {
        Lit {
            ordinal: ((vi as u32) << 1) | (positive as u32),
        }
    }
}

impl From<u32> for Lit {
    #[inline]
    fn from(l: u32) -> Self {
        Lit { ordinal: l }
    }
}

impl From<i32> for Lit {
    #[inline]
    fn from(x: i32) -> Self {
        Lit {
            ordinal: (if x < 0 { -2 * x } else { 2 * x + 1 }) as u32,
        }
    }
}

impl From<Lit> for bool {
    /// - negative Lit (= even u32) => false
    /// - positive Lit (= odd u32)  => true
    #[inline]
    fn from(l: Lit) -> bool {
        (l.ordinal & 1) != 0
    }
}

impl From<Lit> for u32 {
    #[inline]
    fn from(l: Lit) -> u32 {
        l.ordinal
    }
}

impl From<Lit> for usize {
    #[inline]
    fn from(l: Lit) -> usize {
        l.ordinal as usize
    }
}

impl From<Lit> for i32 {
    #[inline]
    fn from(l: Lit) -> i32 {
        if l.ordinal % 2 == 0 {
            -((l.ordinal >> 1) as i32)
        } else {
            (l.ordinal >> 1) as i32
        }
    }
}

impl From<&Lit> for i32 {
    #[inline]
    fn from(l: &Lit) -> i32 {
        i32::from(*l)
    }
}

impl Not for Lit {
    type Output = Lit;
    #[inline]
    fn not(self) -> Self {
        Lit {
            ordinal: self.ordinal ^ 1,
        }
    }
}

/// # Examples
///
/// ```
/// use simplr::types::*;
/// assert_eq!(Lit::from(1i32), Lit::from((1 as VarId, true)));
/// assert_eq!(1, Lit::from((1 as VarId, true)).vi());
/// assert_eq!(2, Lit::from((2 as VarId, false)).vi());
/// assert_eq!(Lit::from( 1i32), !Lit::from(-1i32));
/// assert_eq!(Lit::from(-2i32), !Lit::from( 2i32));
/// ```
impl Lit {
    /// convert to `VarId`.
    #[inline]
    pub fn vi(self) -> VarId {
        (self.ordinal >> 1) as VarId
    }
}
