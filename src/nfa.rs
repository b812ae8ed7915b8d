/*!
A Thompson NFA over bytes, compiled from a syntax tree.

Every state consumes at most one byte. Multi-byte UTF-8 encodings become
chains of [`State::Range`] states, and character classes become alternations
of such chains. Epsilon transitions come in two forms: [`State::Empty`] with
a single successor and [`State::Union`] with any number of them.
*/

use std::cell::{Cell, RefCell};
use std::fmt;
use std::iter;
use std::mem;

use regex_syntax::utf8::Utf8Sequences;

use crate::ast::{self, Ast};
use crate::class::ClassSet;
use crate::error::{Error, Result};
use crate::util::DebugByte;

/// The identifier of a state in an NFA. It is an index into the NFA's list
/// of states.
pub type StateID = usize;

/// A compiled NFA with exactly one start state and exactly one match state.
#[derive(Clone)]
pub struct NFA {
    states: Vec<State>,
    start: StateID,
    matching: StateID,
}

/// A single NFA state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum State {
    /// An epsilon transition to exactly one state.
    Empty { next: StateID },
    /// A transition on any byte in `start..=end`.
    Range { start: u8, end: u8, next: StateID },
    /// Epsilon transitions to each of the given states. A union without any
    /// alternates can never be left, which is how an empty class is
    /// represented.
    Union { alternates: Vec<StateID> },
    /// The accepting state.
    Match,
}

impl State {
    /// Returns true if this state only has epsilon transitions.
    pub fn is_epsilon(&self) -> bool {
        match *self {
            State::Range { .. } | State::Match => false,
            State::Empty { .. } | State::Union { .. } => true,
        }
    }

    fn memory_usage(&self) -> usize {
        match *self {
            State::Union { ref alternates } => {
                alternates.len() * mem::size_of::<StateID>()
            }
            _ => 0,
        }
    }
}

impl NFA {
    /// Compile a syntax tree into an NFA using the default configuration.
    pub fn new(ast: &Ast) -> Result<NFA> {
        Compiler::new().compile(ast)
    }

    /// The start state.
    pub fn start(&self) -> StateID {
        self.start
    }

    /// The one and only match state.
    pub fn match_state(&self) -> StateID {
        self.matching
    }

    /// Return the state with the given identifier.
    ///
    /// This panics if the identifier does not refer to a state in this NFA.
    pub fn state(&self, id: StateID) -> &State {
        &self.states[id]
    }

    /// All states in this NFA, indexed by their identifiers.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The number of states in this NFA.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if this NFA has no states. A compiled NFA always has at
    /// least a start state and a match state, so this is always false.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The approximate heap memory, in bytes, used by this NFA.
    pub fn memory_usage(&self) -> usize {
        self.states.len() * mem::size_of::<State>()
            + self.states.iter().map(|s| s.memory_usage()).sum::<usize>()
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            let marker = if id == self.start { '>' } else { ' ' };
            write!(f, "{}{:06}: ", marker, id)?;
            match *state {
                State::Empty { next } => writeln!(f, "-> {}", next)?,
                State::Range { start, end, next } if start == end => {
                    writeln!(f, "{:?} => {}", DebugByte(start), next)?
                }
                State::Range { start, end, next } => writeln!(
                    f,
                    "{:?}-{:?} => {}",
                    DebugByte(start),
                    DebugByte(end),
                    next,
                )?,
                State::Union { ref alternates } => {
                    let alts: Vec<String> =
                        alternates.iter().map(|id| id.to_string()).collect();
                    writeln!(f, "alt({})", alts.join(", "))?
                }
                State::Match => writeln!(f, "MATCH")?,
            }
        }
        Ok(())
    }
}

/// A compiler from syntax trees to NFAs.
#[derive(Clone, Debug)]
pub struct Compiler {
    size_limit: Option<usize>,
}

impl Default for Compiler {
    fn default() -> Compiler {
        Compiler::new()
    }
}

impl Compiler {
    /// Create a new compiler without a size limit.
    pub fn new() -> Compiler {
        Compiler { size_limit: None }
    }

    /// Set a limit, in bytes, on the heap used by the NFA. If compilation
    /// would exceed it, then compilation fails.
    pub fn size_limit(&mut self, bytes: Option<usize>) -> &mut Compiler {
        self.size_limit = bytes;
        self
    }

    /// Compile the given syntax tree into an NFA.
    pub fn compile(&self, ast: &Ast) -> Result<NFA> {
        let c = CompilerI {
            states: RefCell::new(vec![]),
            memory: Cell::new(0),
            size_limit: self.size_limit,
        };
        let start = c.add_empty()?;
        let compiled = c.compile(ast)?;
        let matching = c.add(State::Match)?;
        c.patch(start, compiled.start)?;
        c.patch(compiled.end, matching)?;
        let nfa = NFA { states: c.states.into_inner(), start, matching };
        debug!(
            "compiled NFA with {} states using {} bytes",
            nfa.len(),
            nfa.memory_usage()
        );
        Ok(nfa)
    }
}

/// A fragment of an NFA under construction, with one entry and one exit.
#[derive(Debug)]
struct ThompsonRef {
    start: StateID,
    end: StateID,
}

/// The state of a single compilation. States live behind a `RefCell` so that
/// fragments can be compiled lazily from iterators that borrow the compiler.
#[derive(Debug)]
struct CompilerI {
    states: RefCell<Vec<State>>,
    memory: Cell<usize>,
    size_limit: Option<usize>,
}

impl CompilerI {
    fn compile(&self, ast: &Ast) -> Result<ThompsonRef> {
        match *ast {
            Ast::Literal(ref lit) => self.compile_literal(lit),
            Ast::AnyByte => self.compile_range(0x00, 0xFF),
            Ast::Class(ref cls) => {
                self.compile_class(&cls.set.resolve(cls.negated, cls.fold))
            }
            Ast::Concat(ref asts) => {
                self.compile_concat(asts.iter().map(|a| self.compile(a)))
            }
            Ast::Alternate(ref asts) => {
                self.compile_alternation(asts.iter().map(|a| self.compile(a)))
            }
            Ast::Repeat(ref rep) => self.compile_repetition(rep),
            // Folding has already been applied to the leaves.
            Ast::Group(ref ast) | Ast::CaseFold { ref ast, .. } => {
                self.compile(ast)
            }
        }
    }

    fn compile_concat<I>(&self, mut it: I) -> Result<ThompsonRef>
    where
        I: Iterator<Item = Result<ThompsonRef>>,
    {
        let ThompsonRef { start, mut end } = match it.next() {
            Some(result) => result?,
            None => return self.compile_empty(),
        };
        for result in it {
            let compiled = result?;
            self.patch(end, compiled.start)?;
            end = compiled.end;
        }
        Ok(ThompsonRef { start, end })
    }

    /// Compile a union of branches. If there are no branches, then the
    /// result is a fragment that can never be traversed.
    fn compile_alternation<I>(&self, it: I) -> Result<ThompsonRef>
    where
        I: Iterator<Item = Result<ThompsonRef>>,
    {
        let union = self.add_union()?;
        let mut alternate_ends = vec![];
        for result in it {
            let compiled = result?;
            self.patch(union, compiled.start)?;
            alternate_ends.push(compiled.end);
        }

        let empty = self.add_empty()?;
        for id in alternate_ends {
            self.patch(id, empty)?;
        }
        Ok(ThompsonRef { start: union, end: empty })
    }

    fn compile_repetition(
        &self,
        rep: &ast::Repetition,
    ) -> Result<ThompsonRef> {
        match rep.max {
            _ if rep.is_optional() => self.compile_zero_or_one(&rep.ast),
            None => self.compile_at_least(&rep.ast, rep.min),
            Some(max) => self.compile_bounded(&rep.ast, rep.min, max),
        }
    }

    fn compile_bounded(
        &self,
        ast: &Ast,
        min: u32,
        max: u32,
    ) -> Result<ThompsonRef> {
        let prefix = self.compile_exactly(ast, min)?;
        if min == max {
            return Ok(prefix);
        }

        let suffix = self.compile_concat(
            (min..max).map(|_| self.compile_zero_or_one(ast)),
        )?;
        self.patch(prefix.end, suffix.start)?;
        Ok(ThompsonRef { start: prefix.start, end: suffix.end })
    }

    fn compile_at_least(&self, ast: &Ast, n: u32) -> Result<ThompsonRef> {
        if n == 0 {
            let union = self.add_union()?;
            let compiled = self.compile(ast)?;
            self.patch(union, compiled.start)?;
            self.patch(compiled.end, union)?;
            Ok(ThompsonRef { start: union, end: union })
        } else if n == 1 {
            let compiled = self.compile(ast)?;
            let union = self.add_union()?;
            self.patch(compiled.end, union)?;
            self.patch(union, compiled.start)?;
            Ok(ThompsonRef { start: compiled.start, end: union })
        } else {
            let prefix = self.compile_exactly(ast, n - 1)?;
            let last = self.compile(ast)?;
            let union = self.add_union()?;
            self.patch(prefix.end, last.start)?;
            self.patch(last.end, union)?;
            self.patch(union, last.start)?;
            Ok(ThompsonRef { start: prefix.start, end: union })
        }
    }

    fn compile_zero_or_one(&self, ast: &Ast) -> Result<ThompsonRef> {
        let union = self.add_union()?;
        let compiled = self.compile(ast)?;
        let empty = self.add_empty()?;
        self.patch(union, compiled.start)?;
        self.patch(union, empty)?;
        self.patch(compiled.end, empty)?;
        Ok(ThompsonRef { start: union, end: empty })
    }

    fn compile_exactly(&self, ast: &Ast, n: u32) -> Result<ThompsonRef> {
        let it = iter::repeat(()).take(n as usize).map(|_| self.compile(ast));
        self.compile_concat(it)
    }

    fn compile_literal(&self, lit: &ast::Literal) -> Result<ThompsonRef> {
        if !lit.fold {
            return self.compile_char(lit.c);
        }
        let set = ClassSet::singleton(lit.c).resolve(false, true);
        match set.single() {
            // Nothing to fold, e.g., a digit.
            Some(c) => self.compile_char(c),
            None => self.compile_class(&set),
        }
    }

    fn compile_char(&self, c: char) -> Result<ThompsonRef> {
        let mut buf = [0; 4];
        let it = c
            .encode_utf8(&mut buf)
            .as_bytes()
            .iter()
            .map(|&b| self.compile_range(b, b));
        self.compile_concat(it)
    }

    /// Compile the given set of scalar values. Folding and negation must
    /// already have been applied.
    fn compile_class(&self, set: &ClassSet) -> Result<ThompsonRef> {
        let it = set
            .ranges()
            .flat_map(|(start, end)| Utf8Sequences::new(start, end))
            .map(|seq| {
                let it = seq
                    .as_slice()
                    .iter()
                    .map(|rng| self.compile_range(rng.start, rng.end));
                self.compile_concat(it)
            });
        self.compile_alternation(it)
    }

    fn compile_range(&self, start: u8, end: u8) -> Result<ThompsonRef> {
        let id = self.add(State::Range { start, end, next: 0 })?;
        Ok(ThompsonRef { start: id, end: id })
    }

    fn compile_empty(&self) -> Result<ThompsonRef> {
        let id = self.add_empty()?;
        Ok(ThompsonRef { start: id, end: id })
    }

    /// Add a transition from `from` to `to`. For a union, this appends a new
    /// alternate.
    fn patch(&self, from: StateID, to: StateID) -> Result<()> {
        match self.states.borrow_mut()[from] {
            State::Empty { ref mut next } => {
                *next = to;
            }
            State::Range { ref mut next, .. } => {
                *next = to;
            }
            State::Union { ref mut alternates } => {
                alternates.push(to);
                self.grow(mem::size_of::<StateID>())?;
            }
            State::Match => {}
        }
        Ok(())
    }

    fn add_empty(&self) -> Result<StateID> {
        self.add(State::Empty { next: 0 })
    }

    fn add_union(&self) -> Result<StateID> {
        self.add(State::Union { alternates: vec![] })
    }

    fn add(&self, state: State) -> Result<StateID> {
        self.grow(mem::size_of::<State>())?;
        let mut states = self.states.borrow_mut();
        let id = states.len();
        states.push(state);
        Ok(id)
    }

    /// Account for `bytes` more heap usage and fail if that exceeds the
    /// size limit.
    fn grow(&self, bytes: usize) -> Result<()> {
        let memory = self.memory.get() + bytes;
        self.memory.set(memory);
        match self.size_limit {
            Some(limit) if memory > limit => Err(Error::too_big(limit)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parse::parse;

    fn nfa(pattern: &str) -> NFA {
        NFA::new(&parse(pattern).unwrap()).unwrap()
    }

    #[test]
    fn literal() {
        let nfa = nfa("a");
        assert_eq!(
            nfa.states(),
            &[
                State::Empty { next: 1 },
                State::Range { start: b'a', end: b'a', next: 2 },
                State::Match,
            ]
        );
        assert_eq!(0, nfa.start());
        assert_eq!(2, nfa.match_state());
    }

    #[test]
    fn multi_byte_literal_is_a_chain() {
        let nfa = nfa("☃");
        let ranges: Vec<u8> = nfa
            .states()
            .iter()
            .filter_map(|s| match *s {
                State::Range { start, .. } => Some(start),
                _ => None,
            })
            .collect();
        assert_eq!("☃".as_bytes(), &ranges[..]);
    }

    #[test]
    fn folded_literal_is_a_class() {
        let nfa = nfa("(?i)a");
        let mut ranges: Vec<(u8, u8)> = nfa
            .states()
            .iter()
            .filter_map(|s| match *s {
                State::Range { start, end, .. } => Some((start, end)),
                _ => None,
            })
            .collect();
        ranges.sort();
        assert_eq!(vec![(b'A', b'A'), (b'a', b'a')], ranges);
    }

    #[test]
    fn folded_digit_is_a_literal() {
        assert_eq!(nfa("1").states(), nfa("(?i)1").states());
    }

    #[test]
    fn any_byte() {
        let nfa = nfa(".");
        assert_eq!(
            nfa.state(1),
            &State::Range { start: 0x00, end: 0xFF, next: 2 }
        );
    }

    #[test]
    fn empty_class_has_no_way_out() {
        let nfa = nfa(r"[^\x00-\x{10FFFF}]");
        assert!(nfa
            .states()
            .iter()
            .all(|s| !matches!(*s, State::Range { .. })));
    }

    #[test]
    fn size_limit() {
        let ast = parse("(a{1000}){1000}").unwrap();
        let err = Compiler::new().size_limit(Some(1 << 20)).compile(&ast);
        match err.unwrap_err().kind() {
            ErrorKind::TooBig { limit } => assert_eq!(1 << 20, *limit),
            kind => panic!("unexpected error kind: {:?}", kind),
        }
    }

    #[test]
    fn debug_output() {
        let out = format!("{:?}", nfa("a|b"));
        assert!(out.contains(">000000: -> "));
        assert!(out.contains("MATCH"));
        assert!(out.contains("alt("));
    }
}
