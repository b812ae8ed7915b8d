use std::mem;
use std::rc::Rc;

use crate::dfa::DFA;
use crate::error::{Error, Result};
use crate::fnv;
use crate::nfa::{self, NFA};
use crate::sparse_set::SparseSet;
use crate::state_id::StateID;

/// Converts an NFA into a dense DFA by the subset construction.
///
/// DFA states are discovered in breadth first order, starting with the
/// epsilon closure of the NFA's start state. The start state therefore
/// always receives the identifier `0`. A set of NFA states from which no
/// byte can be consumed and which does not contain the match state is never
/// materialized. Transitions into it point at [`StateID::DEAD`] instead.
///
/// Once every state is built, states from which no match state can be
/// reached are removed and transitions into them are redirected to
/// [`StateID::DEAD`]. The start state survives with identifier `0` even
/// then, but the DFA reports it as dead.
pub struct Determinizer<'a> {
    /// The NFA we're converting into a DFA.
    nfa: &'a NFA,
    /// The DFA we're building.
    dfa: DFA,
    /// The frontier of every DFA state built so far, indexed by the DFA
    /// state's identifier.
    builder_states: Vec<Rc<Frontier>>,
    /// A cache of DFA states that already exist, keyed by their frontier.
    cache: fnv::HashMap<Rc<Frontier>, StateID>,
    /// A stack of NFA states to visit, for depth first visiting.
    stack: Vec<nfa::StateID>,
    /// Scratch space for storing an ordered sequence of NFA states, for
    /// amortizing allocation.
    scratch_nfa_states: Vec<nfa::StateID>,
    /// The maximum number of bytes the DFA and its frontiers may use.
    size_limit: Option<usize>,
    /// The heap used by the frontiers in `builder_states`.
    frontier_memory: usize,
}

/// The canonical key of a DFA state: the sorted set of byte-consuming NFA
/// states reachable at some point of a search, plus whether the match state
/// is reachable. Epsilon states are left out since they never affect which
/// states are reachable after the next byte.
#[derive(Debug, Eq, Hash, PartialEq)]
struct Frontier {
    is_match: bool,
    nfa_states: Vec<nfa::StateID>,
}

impl Frontier {
    fn is_dead(&self) -> bool {
        !self.is_match && self.nfa_states.is_empty()
    }

    fn memory_usage(&self) -> usize {
        mem::size_of::<Frontier>()
            + self.nfa_states.len() * mem::size_of::<nfa::StateID>()
    }
}

impl<'a> Determinizer<'a> {
    /// Create a new determinizer for the given NFA without a size limit.
    pub fn new(nfa: &'a NFA) -> Determinizer<'a> {
        Determinizer {
            nfa,
            dfa: DFA::empty(),
            builder_states: vec![],
            cache: fnv::HashMap::default(),
            stack: vec![],
            scratch_nfa_states: vec![],
            size_limit: None,
            frontier_memory: 0,
        }
    }

    /// Set a limit, in bytes, on the heap used during determinization. This
    /// counts the DFA's transition table along with the NFA state sets that
    /// define each DFA state.
    pub fn size_limit(mut self, bytes: Option<usize>) -> Determinizer<'a> {
        self.size_limit = bytes;
        self
    }

    /// Build the DFA.
    pub fn build(mut self) -> Result<DFA> {
        let mut sparse = self.new_sparse_set();
        self.add_start(&mut sparse)?;
        let mut next = 0;
        while next < self.builder_states.len() {
            let dfa_id = StateID::from_index(next);
            next += 1;
            for b in 0..=255 {
                let next_dfa_id = self.cached_state(dfa_id, b, &mut sparse)?;
                self.dfa.set_transition(dfa_id, b, next_dfa_id);
            }
        }
        let dfa = prune(self.dfa)?;
        debug!(
            "determinized NFA with {} states into DFA with {} states \
             using {} bytes",
            self.nfa.len(),
            dfa.len(),
            dfa.memory_usage()
        );
        Ok(dfa)
    }

    /// Return the DFA state reached from `dfa_id` on `b`, creating it if it
    /// doesn't exist yet.
    fn cached_state(
        &mut self,
        dfa_id: StateID,
        b: u8,
        sparse: &mut SparseSet,
    ) -> Result<StateID> {
        self.next(dfa_id, b, sparse);
        let state = self.new_state(sparse);
        if state.is_dead() {
            self.scratch_nfa_states = state.nfa_states;
            return Ok(StateID::DEAD);
        }
        if let Some(&cached_id) = self.cache.get(&state) {
            // Reuse the allocation of the state we no longer need.
            self.scratch_nfa_states = state.nfa_states;
            return Ok(cached_id);
        }
        self.add_state(state)
    }

    /// Compute the epsilon closure of every NFA state reachable from the
    /// frontier of `dfa_id` by consuming `b`.
    fn next(
        &mut self,
        dfa_id: StateID,
        b: u8,
        next_nfa_states: &mut SparseSet,
    ) {
        next_nfa_states.clear();
        let current = Rc::clone(&self.builder_states[dfa_id.as_usize()]);
        for &nfa_id in &current.nfa_states {
            match *self.nfa.state(nfa_id) {
                nfa::State::Range { start, end, next } => {
                    if start <= b && b <= end {
                        self.epsilon_closure(next, next_nfa_states);
                    }
                }
                nfa::State::Empty { .. }
                | nfa::State::Union { .. }
                | nfa::State::Match => {}
            }
        }
    }

    fn epsilon_closure(&mut self, start: nfa::StateID, set: &mut SparseSet) {
        if !self.nfa.state(start).is_epsilon() {
            set.insert(start);
            return;
        }

        self.stack.push(start);
        while let Some(mut id) = self.stack.pop() {
            loop {
                if !set.insert(id) {
                    break;
                }
                match *self.nfa.state(id) {
                    nfa::State::Empty { next } => {
                        id = next;
                    }
                    nfa::State::Union { ref alternates } => {
                        id = match alternates.get(0) {
                            None => break,
                            Some(&id) => id,
                        };
                        self.stack.extend(alternates[1..].iter().rev());
                    }
                    nfa::State::Range { .. } | nfa::State::Match => break,
                }
            }
        }
    }

    /// Add the start state. It is added even when its frontier is dead, so
    /// that every DFA has a start state with identifier `0`.
    fn add_start(&mut self, sparse: &mut SparseSet) -> Result<StateID> {
        sparse.clear();
        self.epsilon_closure(self.nfa.start(), sparse);
        let state = self.new_state(sparse);
        let id = self.add_state(state)?;
        debug_assert_eq!(StateID::START, id);
        Ok(id)
    }

    fn add_state(&mut self, state: Frontier) -> Result<StateID> {
        let id = self.dfa.add_empty_state()?;
        if state.is_match {
            self.dfa.set_match_state(id);
        }
        trace!("DFA state {:?} <- {:?}", id, state);
        self.frontier_memory += state.memory_usage();
        let rstate = Rc::new(state);
        self.builder_states.push(Rc::clone(&rstate));
        self.cache.insert(rstate, id);
        self.check_size_limit()?;
        Ok(id)
    }

    /// Build the canonical frontier of the given set of NFA states.
    fn new_state(&mut self, set: &SparseSet) -> Frontier {
        let mut state = Frontier {
            is_match: false,
            nfa_states: mem::replace(&mut self.scratch_nfa_states, vec![]),
        };
        state.nfa_states.clear();

        for &id in set {
            match *self.nfa.state(id) {
                nfa::State::Range { .. } => {
                    state.nfa_states.push(id);
                }
                nfa::State::Match => {
                    state.is_match = true;
                }
                nfa::State::Empty { .. } | nfa::State::Union { .. } => {}
            }
        }
        state.nfa_states.sort_unstable();
        state
    }

    fn check_size_limit(&self) -> Result<()> {
        if let Some(limit) = self.size_limit {
            if self.dfa.memory_usage() + self.frontier_memory > limit {
                return Err(Error::too_big(limit));
            }
        }
        Ok(())
    }

    fn new_sparse_set(&self) -> SparseSet {
        SparseSet::new(self.nfa.len())
    }
}

/// Drop every state that cannot reach a match state, keeping the start
/// state and the relative order of the states that remain.
fn prune(dfa: DFA) -> Result<DFA> {
    let live = live_states(&dfa);
    if live.iter().all(|&is_live| is_live) {
        return Ok(dfa);
    }

    let mut remap = vec![StateID::DEAD; dfa.len()];
    let mut pruned = DFA::empty();
    for (i, &is_live) in live.iter().enumerate() {
        if is_live || i == StateID::START.as_usize() {
            remap[i] = pruned.add_empty_state()?;
        }
    }
    for (i, &is_live) in live.iter().enumerate() {
        if !is_live {
            continue;
        }
        let (old, new) = (StateID::from_index(i), remap[i]);
        if dfa.is_match_state(old) {
            pruned.set_match_state(new);
        }
        for b in 0..=255 {
            let next = dfa.next_state(old, b);
            if !next.is_dead() && live[next.as_usize()] {
                pruned.set_transition(new, b, remap[next.as_usize()]);
            }
        }
    }
    if !live[StateID::START.as_usize()] {
        pruned.set_dead_start();
    }
    trace!("pruned DFA from {} to {} states", dfa.len(), pruned.len());
    Ok(pruned)
}

/// Mark every state from which some match state is reachable, by walking
/// the transitions backwards from the match states.
fn live_states(dfa: &DFA) -> Vec<bool> {
    let mut incoming: Vec<Vec<usize>> = vec![vec![]; dfa.len()];
    for i in 0..dfa.len() {
        for b in 0..=255 {
            let next = dfa.next_state(StateID::from_index(i), b);
            if next.is_dead() {
                continue;
            }
            let preds = &mut incoming[next.as_usize()];
            if preds.last() != Some(&i) {
                preds.push(i);
            }
        }
    }

    let mut live = vec![false; dfa.len()];
    let mut stack = vec![];
    for (i, is_live) in live.iter_mut().enumerate() {
        if dfa.is_match_state(StateID::from_index(i)) {
            *is_live = true;
            stack.push(i);
        }
    }
    while let Some(i) = stack.pop() {
        for &pred in &incoming[i] {
            if !live[pred] {
                live[pred] = true;
                stack.push(pred);
            }
        }
    }
    live
}
