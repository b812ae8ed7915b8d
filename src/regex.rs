use std::fmt;

use crate::determinize::Determinizer;
use crate::dfa::DFA;
use crate::error::Result;
use crate::nfa::Compiler;
use crate::parse::{Parser, DEFAULT_NEST_LIMIT};
use crate::state_id::StateID;

/// The default limit, in bytes, on the heap used by each of the NFA and the
/// DFA during compilation.
const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A regular expression compiled to a deterministic finite automaton.
///
/// A `Regex` answers whether an entire byte string matches. Rather than
/// searching a haystack, callers drive the automaton one byte at a time:
/// begin at [`start`](Regex::start), feed bytes with
/// [`accept`](Regex::accept) and ask [`is_match`](Regex::is_match) or
/// [`can_match`](Regex::can_match) of the current state. Since states are
/// plain `Copy` values, any number of walks can share one `Regex`, which
/// makes it a natural fit for pruning a traversal of a trie or an FST.
///
/// Every query is a constant time table lookup and none of them can fail.
///
/// # Example
///
/// ```
/// use regex_automaton::Regex;
///
/// # fn example() -> Result<(), regex_automaton::Error> {
/// let re = Regex::new("(?i)mArTy")?;
/// let mut state = re.start();
/// for &b in b"marty" {
///     state = re.accept(state, b);
/// }
/// assert!(re.is_match(state));
///
/// let state = re.accept(re.start(), b'x');
/// assert!(!re.can_match(state));
/// # Ok(()) }; example().unwrap()
/// ```
#[derive(Clone)]
pub struct Regex {
    pattern: String,
    dfa: DFA,
}

impl Regex {
    /// Compile the given pattern using the default configuration.
    ///
    /// To set resource limits, use [`Regex::builder`].
    pub fn new(pattern: &str) -> Result<Regex> {
        Builder::new().build(pattern)
    }

    /// Return a builder for configuring the compilation of a `Regex`.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// The start state. This is the state before any input is consumed.
    #[inline]
    pub fn start(&self) -> StateID {
        self.dfa.start_state()
    }

    /// Return the state reached by consuming `byte` in `state`.
    ///
    /// The dead state, and any identifier that did not come from this
    /// automaton, always leads to the dead state.
    #[inline]
    pub fn accept(&self, state: StateID, byte: u8) -> StateID {
        self.dfa.next_state(state, byte)
    }

    /// Returns true if and only if the input consumed to reach `state`
    /// matches this regex.
    #[inline]
    pub fn is_match(&self, state: StateID) -> bool {
        self.dfa.is_match_state(state)
    }

    /// Returns true if and only if some continuation of the input consumed
    /// to reach `state`, possibly the empty one, matches this regex.
    ///
    /// Once this returns false, it returns false for every state reachable
    /// from `state`.
    #[inline]
    pub fn can_match(&self, state: StateID) -> bool {
        !self.dfa.is_dead_state(state)
    }

    /// Returns true if and only if all of `bytes` matches this regex.
    ///
    /// This stops as soon as the dead state is reached.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_automaton::Regex;
    ///
    /// # fn example() -> Result<(), regex_automaton::Error> {
    /// let re = Regex::new("a+|b+")?;
    /// assert!(re.matches(b"aaa"));
    /// assert!(!re.matches(b"aab"));
    /// # Ok(()) }; example().unwrap()
    /// ```
    pub fn matches(&self, bytes: &[u8]) -> bool {
        let mut state = self.start();
        for &b in bytes {
            state = self.accept(state, b);
            if !self.can_match(state) {
                return false;
            }
        }
        self.is_match(state)
    }

    /// The pattern this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The number of states in the underlying DFA, not counting the dead
    /// state.
    pub fn state_len(&self) -> usize {
        self.dfa.len()
    }

    /// The heap memory, in bytes, used by the underlying DFA.
    pub fn memory_usage(&self) -> usize {
        self.dfa.memory_usage()
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Regex({:?})", self.pattern)?;
        write!(f, "{:?}", self.dfa)
    }
}

/// A builder for compiling a [`Regex`] with custom resource limits.
///
/// Matching behavior is configured inline in the pattern, e.g., with the
/// `(?i)` flag. The builder only bounds the resources used by compilation.
#[derive(Clone, Debug)]
pub struct Builder {
    size_limit: Option<usize>,
    nest_limit: u32,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

impl Builder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Builder {
        Builder {
            size_limit: Some(DEFAULT_SIZE_LIMIT),
            nest_limit: DEFAULT_NEST_LIMIT,
        }
    }

    /// Compile the given pattern.
    pub fn build(&self, pattern: &str) -> Result<Regex> {
        let ast = Parser::new().nest_limit(self.nest_limit).parse(pattern)?;
        let nfa = Compiler::new().size_limit(self.size_limit).compile(&ast)?;
        let dfa =
            Determinizer::new(&nfa).size_limit(self.size_limit).build()?;
        Ok(Regex { pattern: pattern.to_string(), dfa })
    }

    /// Set a limit, in bytes, on the heap that each of the NFA and the DFA
    /// may use while compiling. Exceeding it causes compilation to fail
    /// with [`ErrorKind::TooBig`](crate::ErrorKind::TooBig).
    ///
    /// The default is 10 MiB. `None` disables the limit.
    pub fn size_limit(&mut self, bytes: Option<usize>) -> &mut Builder {
        self.size_limit = bytes;
        self
    }

    /// Set the maximum depth of nested groups.
    ///
    /// This guards against stack overflow on malicious patterns. The default
    /// is 250.
    pub fn nest_limit(&mut self, limit: u32) -> &mut Builder {
        self.nest_limit = limit;
        self
    }
}
