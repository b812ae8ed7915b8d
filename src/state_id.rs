use std::fmt;

use crate::error::{Error, Result};

/// The identifier of a state in a compiled [`Regex`](crate::Regex).
///
/// A state identifier is a plain value. It can be copied freely and used as
/// a cursor into the automaton from as many places at once as needed. The
/// only meaningful way to obtain one is from
/// [`Regex::start`](crate::Regex::start) or
/// [`Regex::accept`](crate::Regex::accept).
///
/// Every automaton shares a single dead state identifier, [`StateID::DEAD`].
/// Once a search reaches it, no further input can produce a match.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct StateID(u32);

impl StateID {
    /// The identifier of the dead state. It is never a match state and every
    /// transition out of it leads back to it.
    pub const DEAD: StateID = StateID(u32::MAX);

    /// The largest number of live states an automaton may have. The dead
    /// state is not counted.
    pub const LIMIT: usize = u32::MAX as usize;

    /// The identifier of the start state of every automaton.
    pub(crate) const START: StateID = StateID(0);

    /// Create the identifier of the state at the given index in a DFA's
    /// table. The index must have been produced by `next_state_id`.
    pub(crate) fn from_index(index: usize) -> StateID {
        debug_assert!(index < StateID::LIMIT);
        StateID(index as u32)
    }

    /// Returns true if and only if this is the dead state.
    #[inline]
    pub fn is_dead(self) -> bool {
        self == StateID::DEAD
    }

    /// Returns this identifier as a `usize`, suitable for indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns this identifier as a `u32`.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StateID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_dead() {
            write!(f, "StateID(DEAD)")
        } else {
            write!(f, "StateID({})", self.0)
        }
    }
}

/// Allocate the identifier for a fresh state given the number of live
/// states that already exist. If the new identifier would collide with the
/// dead state, then an error is returned.
pub(crate) fn next_state_id(len: usize) -> Result<StateID> {
    if len >= StateID::LIMIT {
        return Err(Error::too_many_states(StateID::LIMIT));
    }
    Ok(StateID(len as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_is_distinct_from_start() {
        assert!(StateID::DEAD.is_dead());
        assert!(!StateID::START.is_dead());
        assert_eq!(0, StateID::START.as_usize());
    }

    #[test]
    fn allocation_stops_before_dead() {
        assert_eq!(StateID(5), next_state_id(5).unwrap());
        let last = next_state_id(StateID::LIMIT - 1).unwrap();
        assert!(!last.is_dead());
        assert!(next_state_id(StateID::LIMIT).is_err());
    }
}
