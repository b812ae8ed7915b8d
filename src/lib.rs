/*!
This crate compiles regular expressions into deterministic finite automata
that are driven one byte at a time.

A compiled [`Regex`] does not search a haystack. Instead, it exposes its
automaton directly: callers begin at [`Regex::start`], feed bytes with
[`Regex::accept`] and ask of any state whether the bytes consumed so far
match ([`Regex::is_match`]) or whether any continuation still could
([`Regex::can_match`]). This is precisely the interface needed to prune a
walk over a sorted key space, such as a trie or a finite state transducer.
A regex matches only when it matches the *entire* input.

# Example

```
use regex_automaton::Regex;

# fn example() -> Result<(), regex_automaton::Error> {
let re = Regex::new("(?i)[d-f]*(?-i:m)wow")?;
assert!(re.matches(b"DeFmwow"));
assert!(!re.matches(b"DeFMwow"));

// Walking the automaton by hand gives the same answers, and reveals when
// no further input can help.
let mut state = re.start();
for &b in b"dM" {
    state = re.accept(state, b);
}
assert!(!re.can_match(state));
# Ok(()) }; example().unwrap()
```

# Syntax

Patterns support literals, `.` (any byte), bracketed classes with ranges and
negation, the Perl classes `\d`, `\w` and `\s` (and their negations), ASCII
POSIX classes such as `[[:alpha:]]` and `[[:^digit:]]` inside brackets, groups,
alternation, the repetition operators `*`, `+`, `?` and `{m,n}`, and the
case insensitive flag `i` in the forms `(?i)`, `(?-i)`, `(?i:...)` and
`(?-i:...)`. Literals and classes denote Unicode scalar values, which are
matched by their UTF-8 encodings. When a negated class is case insensitive,
it is case folded before it is negated, so `(?i)[^x]` matches neither `x`
nor `X`.

Anchors, word boundaries, lazy repetition and capture semantics are not
supported, since a regex here always describes its entire input.

# Crate features

* **transducer** - Implements `fst::Automaton` for [`Regex`], so that it can
  be used to search `fst::Set` and `fst::Map` values.
* **logging** - Emits diagnostics about compilation through the `log` crate.
*/

#[cfg(not(any(
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("regex-automaton currently not supported on non-{32,64}");

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::parse::{ParseError, ParseErrorKind};
pub use crate::regex::{Builder, Regex};
pub use crate::state_id::StateID;

#[macro_use]
mod macros;

pub mod ast;
pub mod class;
pub mod dfa;
pub mod determinize;
mod error;
mod fnv;
pub mod nfa;
pub mod parse;
mod regex;
mod sparse_set;
mod state_id;
#[cfg(feature = "transducer")]
mod transducer;
mod util;
