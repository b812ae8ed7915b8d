use std::fmt;
use std::iter;
use std::mem;

use crate::error::Result;
use crate::state_id::{next_state_id, StateID};
use crate::util::DebugByte;

/// The number of transitions out of every state: one per byte value.
pub const ALPHABET_LEN: usize = 256;

/// A dense, fully materialized DFA.
///
/// Every state has exactly `ALPHABET_LEN` transitions stored in one
/// contiguous row-major table, so a transition is a single index
/// computation. The dead state is not stored in the table. It is represented
/// by [`StateID::DEAD`], and lookups on any identifier that is not a row of
/// the table yield the dead state.
#[derive(Clone)]
pub struct DFA {
    /// The transition table. The transitions of state `id` are at
    /// `trans[id * ALPHABET_LEN..(id + 1) * ALPHABET_LEN]`.
    trans: Vec<StateID>,
    /// The set of states that are match states.
    matches: StateSet,
    /// The number of states in this DFA, not counting the dead state.
    len: usize,
    /// Whether the start state can never reach a match state. The start
    /// state keeps its row in this case, but every transition out of it
    /// leads to the dead state.
    dead_start: bool,
}

impl DFA {
    /// Create a DFA without any states.
    pub(crate) fn empty() -> DFA {
        DFA {
            trans: vec![],
            matches: StateSet::default(),
            len: 0,
            dead_start: false,
        }
    }

    /// Add a new state whose transitions all lead to the dead state, and
    /// return its identifier. Identifiers are allocated sequentially.
    pub(crate) fn add_empty_state(&mut self) -> Result<StateID> {
        let id = next_state_id(self.len)?;
        self.trans.extend(iter::repeat(StateID::DEAD).take(ALPHABET_LEN));
        self.len += 1;
        Ok(id)
    }

    pub(crate) fn set_transition(
        &mut self,
        from: StateID,
        byte: u8,
        to: StateID,
    ) {
        self.trans[from.as_usize() * ALPHABET_LEN + byte as usize] = to;
    }

    pub(crate) fn set_match_state(&mut self, id: StateID) {
        self.matches.insert(id);
    }

    pub(crate) fn set_dead_start(&mut self) {
        self.dead_start = true;
    }

    /// The start state. It is always the first state discovered during
    /// determinization.
    #[inline]
    pub fn start_state(&self) -> StateID {
        StateID::START
    }

    /// Return the state reached from `id` after consuming `byte`.
    #[inline]
    pub fn next_state(&self, id: StateID, byte: u8) -> StateID {
        if id.as_usize() >= self.len {
            return StateID::DEAD;
        }
        self.trans[id.as_usize() * ALPHABET_LEN + byte as usize]
    }

    /// Returns true if and only if `id` is a match state.
    #[inline]
    pub fn is_match_state(&self, id: StateID) -> bool {
        self.matches.contains(id)
    }

    /// Returns true if and only if no input leads from `id` to a match
    /// state. This is the dead state itself, and the start state of a DFA
    /// whose language is empty.
    #[inline]
    pub fn is_dead_state(&self, id: StateID) -> bool {
        id.is_dead() || (self.dead_start && id == StateID::START)
    }

    /// The number of states in this DFA, not counting the dead state.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if this DFA has no states at all. A DFA produced by
    /// determinization always has at least a start state.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The heap memory, in bytes, used by this DFA.
    pub fn memory_usage(&self) -> usize {
        self.trans.len() * mem::size_of::<StateID>()
            + self.matches.memory_usage()
    }

    /// Iterate over the transitions of `id` as `(start, end, next)` triples,
    /// where consecutive bytes that lead to the same state are merged.
    fn ranges(&self, id: StateID) -> Vec<(u8, u8, StateID)> {
        let row = &self.trans
            [id.as_usize() * ALPHABET_LEN..(id.as_usize() + 1) * ALPHABET_LEN];
        let mut ranges: Vec<(u8, u8, StateID)> = vec![];
        for (b, &next) in row.iter().enumerate() {
            let b = b as u8;
            if let Some(last) = ranges.last_mut() {
                if last.2 == next {
                    last.1 = b;
                    continue;
                }
            }
            ranges.push((b, b, next));
        }
        ranges
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "DFA(")?;
        for i in 0..self.len {
            let id = StateID::from_index(i);
            let start = if id == self.start_state() { '>' } else { ' ' };
            let matched = if self.is_match_state(id) { '*' } else { ' ' };
            write!(f, "{}{}{:06}: ", start, matched, i)?;
            let mut first = true;
            for (lo, hi, next) in self.ranges(id) {
                if next.is_dead() {
                    continue;
                }
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                if lo == hi {
                    write!(f, "{:?} => {}", DebugByte(lo), next.as_u32())?;
                } else {
                    write!(
                        f,
                        "{:?}-{:?} => {}",
                        DebugByte(lo),
                        DebugByte(hi),
                        next.as_u32(),
                    )?;
                }
            }
            writeln!(f)?;
        }
        write!(f, ")")
    }
}

/// A bitset of state identifiers.
#[derive(Clone, Debug, Default)]
struct StateSet {
    bits: Vec<u64>,
}

impl StateSet {
    fn insert(&mut self, id: StateID) {
        let (word, bit) = (id.as_usize() / 64, id.as_usize() % 64);
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        self.bits[word] |= 1 << bit;
    }

    fn contains(&self, id: StateID) -> bool {
        let (word, bit) = (id.as_usize() / 64, id.as_usize() % 64);
        match self.bits.get(word) {
            Some(&bits) => bits & (1 << bit) != 0,
            None => false,
        }
    }

    fn memory_usage(&self) -> usize {
        self.bits.len() * mem::size_of::<u64>()
    }
}
