/*!
A recursive descent parser for the supported regular expression syntax.

The parser never holds flag state of its own. The case insensitivity that is
active at any point is passed down explicitly to each parsing routine, and a
routine that can change it (a concatenation containing `(?i)` or `(?-i)`)
hands the updated value back to its caller. Restoring the outer scope at the
end of a group is then just a matter of discarding the value the group
returned.
*/

use std::error;
use std::fmt;

use crate::ast::{self, Ast};
use crate::class::{ClassSet, Perl, Posix};

type Result<T> = std::result::Result<T, ParseError>;

/// The largest bound permitted in a counted repetition such as `a{5,10}`.
const REPETITION_LIMIT: u32 = 1000;

/// The default limit on how deeply groups may be nested.
pub(crate) const DEFAULT_NEST_LIMIT: u32 = 250;

/// Parse the given pattern into a syntax tree using the default
/// configuration.
pub fn parse(pattern: &str) -> Result<Ast> {
    Parser::new().parse(pattern)
}

/// A parser for regular expressions.
///
/// The only configuration is a limit on how deeply groups may nest, which
/// bounds the stack usage of both parsing and compilation.
#[derive(Clone, Debug)]
pub struct Parser {
    nest_limit: u32,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

impl Parser {
    /// Create a new parser with the default configuration.
    pub fn new() -> Parser {
        Parser { nest_limit: DEFAULT_NEST_LIMIT }
    }

    /// Set the nesting limit for groups. A pattern that nests groups more
    /// deeply than this is rejected.
    ///
    /// The default is `250`.
    pub fn nest_limit(&mut self, limit: u32) -> &mut Parser {
        self.nest_limit = limit;
        self
    }

    /// Parse the given pattern into a syntax tree.
    pub fn parse(&self, pattern: &str) -> Result<Ast> {
        ParserI { pattern, pos: 0, nest_limit: self.nest_limit }.parse()
    }
}

/// The span of a parse error, as byte offsets into the pattern. `end` is
/// exclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    /// The offset of the first byte of the span.
    pub start: usize,
    /// The offset one past the last byte of the span.
    pub end: usize,
}

impl Span {
    fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }
}

/// An error that occurred while parsing a pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    pattern: String,
    span: Span,
}

/// The kind of a parse error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// A `(` without a matching `)`.
    GroupUnclosed,
    /// A `)` without a matching `(`.
    GroupUnopened,
    /// A `[` without a matching `]`.
    ClassUnclosed,
    /// A class range whose end is less than its start, e.g., `[z-a]`.
    ClassRangeInvalid,
    /// A class range with a Perl class as one of its bounds, e.g., `[a-\d]`.
    ClassRangeLiteral,
    /// A POSIX class with an unknown name, e.g., `[[:greek:]]`.
    ClassPosixUnrecognized,
    /// A `\` at the end of the pattern.
    EscapeUnexpectedEof,
    /// An escape sequence that is not recognized, e.g., `\q`.
    EscapeUnrecognized,
    /// A `\x` escape that is malformed or that names an invalid scalar
    /// value.
    EscapeHexInvalid,
    /// A flag other than `i`.
    FlagUnrecognized,
    /// A flag that appears more than once in the same flag group.
    FlagDuplicate,
    /// A flag group with more than one `-`.
    FlagRepeatedNegation,
    /// A `-` in a flag group that is not followed by any flag.
    FlagDanglingNegation,
    /// A flag group without any flags, i.e., `(?)`.
    FlagsEmpty,
    /// The pattern ended inside a flag group.
    FlagUnexpectedEof,
    /// A repetition operator with nothing to repeat.
    RepetitionMissing,
    /// A repetition operator applied directly to another repetition.
    RepetitionNested,
    /// A lazy repetition operator such as `*?`. Laziness only changes where
    /// a match ends, which is meaningless when matching whole inputs.
    RepetitionLazy,
    /// A counted repetition whose minimum exceeds its maximum, or with a
    /// bound that exceeds the repetition limit.
    RepetitionCountInvalid,
    /// A counted repetition that is not closed or is otherwise malformed.
    RepetitionCountUnclosed,
    /// An alternation with an empty branch, e.g., `a|` or `a||b`.
    AlternationEmpty,
    /// A look-around assertion (`^`, `$`, `\A`, `\z`, `\b` or `\B`). Every
    /// pattern is already matched against the entire input.
    UnsupportedLook,
    /// Groups are nested more deeply than the configured limit.
    NestLimitExceeded(u32),
}

impl ParseError {
    /// Return the kind of this error.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Return the pattern that failed to parse.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Return the span of the pattern at which the error occurred.
    pub fn span(&self) -> Span {
        self.span
    }
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pad = self.pattern[..self.span.start].chars().count();
        let width =
            self.pattern[self.span.start..self.span.end].chars().count();
        writeln!(f, "regex parse error:")?;
        writeln!(f, "    {}", self.pattern)?;
        writeln!(f, "    {}{}", " ".repeat(pad), "^".repeat(width.max(1)))?;
        write!(f, "error: {}", self.kind)
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ParseErrorKind::*;
        match *self {
            GroupUnclosed => write!(f, "unclosed group"),
            GroupUnopened => write!(f, "unopened group"),
            ClassUnclosed => write!(f, "unclosed character class"),
            ClassRangeInvalid => write!(
                f,
                "invalid character class range, \
                 the start must be <= the end"
            ),
            ClassRangeLiteral => {
                write!(f, "invalid range boundary, must be a literal")
            }
            ClassPosixUnrecognized => {
                write!(f, "unrecognized POSIX character class")
            }
            EscapeUnexpectedEof => {
                write!(f, "incomplete escape sequence, reached end of pattern")
            }
            EscapeUnrecognized => write!(f, "unrecognized escape sequence"),
            EscapeHexInvalid => {
                write!(f, "invalid hexadecimal escape sequence")
            }
            FlagUnrecognized => {
                write!(f, "unrecognized flag, only 'i' is supported")
            }
            FlagDuplicate => write!(f, "duplicate flag"),
            FlagRepeatedNegation => {
                write!(f, "flag negation operator repeated")
            }
            FlagDanglingNegation => {
                write!(f, "flag negation operator is not followed by a flag")
            }
            FlagsEmpty => write!(f, "empty flag group"),
            FlagUnexpectedEof => write!(
                f,
                "expected flag but got end of pattern, \
                 missing closing ')' or ':'"
            ),
            RepetitionMissing => {
                write!(f, "repetition operator missing expression")
            }
            RepetitionNested => {
                write!(f, "repetition operator applied to a repetition")
            }
            RepetitionLazy => {
                write!(f, "lazy repetition operators are not supported")
            }
            RepetitionCountInvalid => write!(
                f,
                "invalid repetition count, the minimum must be <= the \
                 maximum and both must be <= {}",
                REPETITION_LIMIT,
            ),
            RepetitionCountUnclosed => {
                write!(f, "unclosed or malformed counted repetition")
            }
            AlternationEmpty => write!(f, "empty alternation branch"),
            UnsupportedLook => write!(
                f,
                "look-around assertions (^, $, \\A, \\z, \\b and \\B) \
                 are not supported"
            ),
            NestLimitExceeded(limit) => write!(
                f,
                "exceeds the nesting limit of {} for groups",
                limit,
            ),
        }
    }
}

/// What the most recent item of a concatenation was. Repetition operators
/// are only valid directly after an atom.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Last {
    Nothing,
    Atom,
    Repetition,
    Directive,
}

/// The result of parsing something that starts with `(`.
enum GroupKind {
    /// A complete group that becomes part of the tree.
    Ast(Ast),
    /// A flag directive such as `(?i)`, which yields the folding state for
    /// the remainder of the enclosing group.
    Directive(bool),
}

/// The result of parsing an escape sequence.
enum Escape {
    Literal(char),
    Perl { kind: Perl, negated: bool },
}

/// The parser proper. It only holds the input and the cursor.
struct ParserI<'p> {
    pattern: &'p str,
    pos: usize,
    nest_limit: u32,
}

impl<'p> ParserI<'p> {
    fn parse(&mut self) -> Result<Ast> {
        let (ast, _) = self.parse_alternation(false, 0)?;
        match self.char() {
            None => Ok(ast),
            // The only thing that stops an alternation other than the end
            // of the pattern is a closing paren.
            Some(_) => Err(
                self.error(self.span_char(), ParseErrorKind::GroupUnopened)
            ),
        }
    }

    /// Parse one or more branches separated by `|`. Parsing stops at the
    /// end of the pattern or at an unconsumed `)`.
    ///
    /// Returns the folding state in effect at the end, since a directive in
    /// one branch carries over into the following branches.
    fn parse_alternation(
        &mut self,
        mut fold: bool,
        depth: u32,
    ) -> Result<(Ast, bool)> {
        let mut branches = vec![];
        loop {
            let start = self.pos;
            let (branch, next_fold) = self.parse_concat(fold, depth)?;
            fold = next_fold;
            let empty = start == self.pos;
            match self.char() {
                Some('|') => {
                    if empty {
                        return Err(self.error(
                            self.span_char(),
                            ParseErrorKind::AlternationEmpty,
                        ));
                    }
                    branches.push(branch);
                    self.bump();
                }
                _ => {
                    if empty && !branches.is_empty() {
                        return Err(self.error(
                            Span::new(start - 1, start),
                            ParseErrorKind::AlternationEmpty,
                        ));
                    }
                    branches.push(branch);
                    break;
                }
            }
        }
        Ok((Ast::alternate(branches), fold))
    }

    /// Parse a sequence of atoms, repetitions and flag directives. Parsing
    /// stops at the end of the pattern or at an unconsumed `|` or `)`.
    fn parse_concat(
        &mut self,
        mut fold: bool,
        depth: u32,
    ) -> Result<(Ast, bool)> {
        let mut asts = vec![];
        let mut last = Last::Nothing;
        while let Some(c) = self.char() {
            match c {
                '|' | ')' => break,
                '?' | '*' | '+' | '{' => {
                    self.parse_repetition(&mut asts, last)?;
                    last = Last::Repetition;
                    continue;
                }
                '(' => match self.parse_group(fold, depth)? {
                    GroupKind::Ast(ast) => asts.push(ast),
                    GroupKind::Directive(next_fold) => {
                        fold = next_fold;
                        last = Last::Directive;
                        continue;
                    }
                },
                '[' => asts.push(self.parse_class(fold)?),
                '.' => {
                    self.bump();
                    asts.push(Ast::AnyByte);
                }
                '\\' => {
                    let ast = match self.parse_escape()? {
                        Escape::Literal(c) => {
                            Ast::Literal(ast::Literal { c, fold })
                        }
                        Escape::Perl { kind, negated } => {
                            Ast::Class(ast::Class {
                                set: ClassSet::perl(kind),
                                negated,
                                fold,
                            })
                        }
                    };
                    asts.push(ast);
                }
                '^' | '$' => {
                    return Err(self.error(
                        self.span_char(),
                        ParseErrorKind::UnsupportedLook,
                    ));
                }
                c => {
                    self.bump();
                    asts.push(Ast::Literal(ast::Literal { c, fold }));
                }
            }
            last = Last::Atom;
        }
        Ok((Ast::concat(asts), fold))
    }

    /// Parse a repetition operator at the current position and apply it to
    /// the last atom in `asts`.
    fn parse_repetition(
        &mut self,
        asts: &mut Vec<Ast>,
        last: Last,
    ) -> Result<()> {
        let start = self.pos;
        match last {
            Last::Atom => {}
            Last::Repetition if self.char() == Some('?') => {
                return Err(self.error(
                    self.span_char(),
                    ParseErrorKind::RepetitionLazy,
                ));
            }
            Last::Repetition => {
                return Err(self.error(
                    self.span_char(),
                    ParseErrorKind::RepetitionNested,
                ));
            }
            Last::Nothing | Last::Directive => {
                return Err(self.error(
                    self.span_char(),
                    ParseErrorKind::RepetitionMissing,
                ));
            }
        }
        let (min, max) = match self.char() {
            Some('?') => {
                self.bump();
                (0, Some(1))
            }
            Some('*') => {
                self.bump();
                (0, None)
            }
            Some('+') => {
                self.bump();
                (1, None)
            }
            _ => self.parse_counted_repetition()?,
        };
        let ast = match asts.pop() {
            Some(ast) => ast,
            None => {
                return Err(self.error(
                    Span::new(start, self.pos),
                    ParseErrorKind::RepetitionMissing,
                ))
            }
        };
        let ast = Box::new(ast);
        asts.push(Ast::Repeat(ast::Repetition { min, max, ast }));
        Ok(())
    }

    /// Parse `{m}`, `{m,}` or `{m,n}`. The cursor must be at the `{`.
    fn parse_counted_repetition(&mut self) -> Result<(u32, Option<u32>)> {
        let start = self.pos;
        self.bump();
        let min = match self.parse_decimal() {
            Some(min) => min,
            None => {
                return Err(self.error(
                    Span::new(start, self.pos),
                    ParseErrorKind::RepetitionCountUnclosed,
                ))
            }
        };
        let max = if self.char() == Some(',') {
            self.bump();
            self.parse_decimal()
        } else {
            Some(min)
        };
        if self.char() != Some('}') {
            return Err(self.error(
                Span::new(start, self.pos),
                ParseErrorKind::RepetitionCountUnclosed,
            ));
        }
        self.bump();
        let span = Span::new(start, self.pos);
        if min > REPETITION_LIMIT {
            return Err(
                self.error(span, ParseErrorKind::RepetitionCountInvalid)
            );
        }
        if let Some(max) = max {
            if max > REPETITION_LIMIT || min > max {
                return Err(
                    self.error(span, ParseErrorKind::RepetitionCountInvalid)
                );
            }
        }
        Ok((min, max))
    }

    /// Parse a decimal number, if one is at the current position. Values
    /// too big for a `u32` saturate, which always trips the repetition
    /// limit.
    fn parse_decimal(&mut self) -> Option<u32> {
        let mut n: Option<u32> = None;
        while let Some(d) = self.char().and_then(|c| c.to_digit(10)) {
            let acc = n.unwrap_or(0);
            n = Some(acc.saturating_mul(10).saturating_add(d));
            self.bump();
        }
        n
    }

    /// Parse anything that starts with `(`: a group, a scoped flag group or
    /// a flag directive.
    fn parse_group(&mut self, fold: bool, depth: u32) -> Result<GroupKind> {
        let open = self.span_char();
        if depth >= self.nest_limit {
            return Err(self.error(
                open,
                ParseErrorKind::NestLimitExceeded(self.nest_limit),
            ));
        }
        self.bump();
        let mut scoped = None;
        if self.char() == Some('?') {
            self.bump();
            let (flag, is_directive) = self.parse_flags()?;
            if is_directive {
                return Ok(GroupKind::Directive(flag.unwrap_or(fold)));
            }
            scoped = flag;
        }
        let inner_fold = scoped.unwrap_or(fold);
        // Whatever folding state the group ends in is discarded here, which
        // restores the outer scope.
        let (ast, _) = self.parse_alternation(inner_fold, depth + 1)?;
        if self.char() != Some(')') {
            return Err(self.error(open, ParseErrorKind::GroupUnclosed));
        }
        self.bump();
        let ast = match scoped {
            Some(enabled) => Ast::CaseFold { enabled, ast: Box::new(ast) },
            None => Ast::Group(Box::new(ast)),
        };
        Ok(GroupKind::Ast(ast))
    }

    /// Parse the flags of a flag group. The cursor must be just past the
    /// `(?`. On success the cursor is just past the terminating `:` or `)`.
    ///
    /// Returns the value of the `i` flag if it was mentioned, and whether the
    /// group was a directive (terminated by `)`) rather than a scoped group
    /// (terminated by `:`).
    fn parse_flags(&mut self) -> Result<(Option<bool>, bool)> {
        let start = self.pos;
        let mut fold = None;
        let mut negation: Option<Span> = None;
        let mut flag_after_negation = false;
        loop {
            let c = match self.char() {
                Some(c) => c,
                None => {
                    return Err(self.error(
                        Span::new(start, self.pos),
                        ParseErrorKind::FlagUnexpectedEof,
                    ))
                }
            };
            match c {
                ':' | ')' => break,
                'i' => {
                    if fold.is_some() {
                        return Err(self.error(
                            self.span_char(),
                            ParseErrorKind::FlagDuplicate,
                        ));
                    }
                    fold = Some(negation.is_none());
                    flag_after_negation = negation.is_some();
                }
                '-' => {
                    if negation.is_some() {
                        return Err(self.error(
                            self.span_char(),
                            ParseErrorKind::FlagRepeatedNegation,
                        ));
                    }
                    negation = Some(self.span_char());
                }
                _ => {
                    return Err(self.error(
                        self.span_char(),
                        ParseErrorKind::FlagUnrecognized,
                    ))
                }
            }
            self.bump();
        }
        if let Some(span) = negation {
            if !flag_after_negation {
                return Err(
                    self.error(span, ParseErrorKind::FlagDanglingNegation)
                );
            }
        }
        let is_directive = self.char() == Some(')');
        if is_directive && fold.is_none() {
            return Err(self.error(
                Span::new(start - 2, self.pos + 1),
                ParseErrorKind::FlagsEmpty,
            ));
        }
        self.bump();
        Ok((fold, is_directive))
    }

    /// Parse a bracketed character class. The cursor must be at the `[`.
    fn parse_class(&mut self, fold: bool) -> Result<Ast> {
        let open = self.span_char();
        self.bump();
        let negated = if self.char() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let mut set = ClassSet::empty();
        let mut first = true;
        loop {
            match self.char() {
                None => {
                    return Err(self.error(open, ParseErrorKind::ClassUnclosed))
                }
                Some(']') if !first => {
                    self.bump();
                    break;
                }
                Some(_) => {}
            }
            first = false;
            if let Some(posix) = self.maybe_parse_posix()? {
                set.union(&posix);
                continue;
            }
            let start = self.pos;
            let lo = match self.parse_class_item()? {
                Escape::Literal(c) => c,
                Escape::Perl { kind, negated } => {
                    set.union(&ClassSet::perl(kind).resolve(negated, false));
                    continue;
                }
            };
            // A '-' is a range operator only when something other than the
            // closing bracket follows it.
            let is_range = self.char() == Some('-')
                && !matches!(self.peek(), None | Some(']'));
            if !is_range {
                set.push(lo, lo);
                continue;
            }
            self.bump();
            let hi = match self.parse_class_item()? {
                Escape::Literal(c) => c,
                Escape::Perl { .. } => {
                    return Err(self.error(
                        Span::new(start, self.pos),
                        ParseErrorKind::ClassRangeLiteral,
                    ))
                }
            };
            if hi < lo {
                return Err(self.error(
                    Span::new(start, self.pos),
                    ParseErrorKind::ClassRangeInvalid,
                ));
            }
            set.push(lo, hi);
        }
        Ok(Ast::Class(ast::Class { set, negated, fold }))
    }

    /// Parse an ASCII POSIX class such as `[:alpha:]` or `[:^digit:]` if
    /// one starts at the current position. Anything that merely starts with
    /// `[` but is not shaped like a POSIX class is left alone, in which case
    /// the `[` is an ordinary class member.
    fn maybe_parse_posix(&mut self) -> Result<Option<ClassSet>> {
        if self.char() != Some('[') || self.peek() != Some(':') {
            return Ok(None);
        }
        let start = self.pos;
        let mut rest = &self.pattern[start + 2..];
        let negated = rest.starts_with('^');
        if negated {
            rest = &rest[1..];
        }
        let name_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if name_len == 0 || !rest[name_len..].starts_with(":]") {
            return Ok(None);
        }
        let end = start + 2 + negated as usize + name_len + 2;
        let kind = match Posix::from_name(&rest[..name_len]) {
            Some(kind) => kind,
            None => {
                return Err(self.error(
                    Span::new(start, end),
                    ParseErrorKind::ClassPosixUnrecognized,
                ))
            }
        };
        self.pos = end;
        Ok(Some(ClassSet::posix(kind).resolve(negated, false)))
    }

    /// Parse a single member of a bracketed class: either a literal or an
    /// escape.
    fn parse_class_item(&mut self) -> Result<Escape> {
        match self.char() {
            Some('\\') => self.parse_escape(),
            Some(c) => {
                self.bump();
                Ok(Escape::Literal(c))
            }
            None => Err(self.error(
                Span::new(self.pos, self.pos),
                ParseErrorKind::ClassUnclosed,
            )),
        }
    }

    /// Parse an escape sequence. The cursor must be at the `\`.
    fn parse_escape(&mut self) -> Result<Escape> {
        let start = self.pos;
        self.bump();
        let c = match self.char() {
            Some(c) => c,
            None => {
                return Err(self.error(
                    Span::new(start, self.pos),
                    ParseErrorKind::EscapeUnexpectedEof,
                ))
            }
        };
        self.bump();
        fn perl(kind: Perl, negated: bool) -> Result<Escape> {
            Ok(Escape::Perl { kind, negated })
        }
        match c {
            'n' => Ok(Escape::Literal('\n')),
            't' => Ok(Escape::Literal('\t')),
            'r' => Ok(Escape::Literal('\r')),
            'f' => Ok(Escape::Literal('\x0C')),
            'v' => Ok(Escape::Literal('\x0B')),
            'a' => Ok(Escape::Literal('\x07')),
            'x' => self.parse_hex(start).map(Escape::Literal),
            'd' => perl(Perl::Digit, false),
            'D' => perl(Perl::Digit, true),
            'w' => perl(Perl::Word, false),
            'W' => perl(Perl::Word, true),
            's' => perl(Perl::Space, false),
            'S' => perl(Perl::Space, true),
            'A' | 'z' | 'b' | 'B' => Err(self.error(
                Span::new(start, self.pos),
                ParseErrorKind::UnsupportedLook,
            )),
            c if c.is_ascii_punctuation() => Ok(Escape::Literal(c)),
            _ => Err(self.error(
                Span::new(start, self.pos),
                ParseErrorKind::EscapeUnrecognized,
            )),
        }
    }

    /// Parse the digits of `\xNN` or `\x{N...}`. The cursor must be just
    /// past the `x`. `start` is the offset of the `\`.
    fn parse_hex(&mut self, start: usize) -> Result<char> {
        let braced = self.char() == Some('{');
        if braced {
            self.bump();
        }
        let mut digits = String::new();
        loop {
            match self.char() {
                None => {
                    return Err(self.error(
                        Span::new(start, self.pos),
                        ParseErrorKind::EscapeUnexpectedEof,
                    ))
                }
                Some('}') if braced => {
                    self.bump();
                    break;
                }
                Some(c) if c.is_ascii_hexdigit() && digits.len() < 8 => {
                    digits.push(c);
                    self.bump();
                    if !braced && digits.len() == 2 {
                        break;
                    }
                }
                Some(_) => {
                    return Err(self.error(
                        Span::new(start, self.pos),
                        ParseErrorKind::EscapeHexInvalid,
                    ))
                }
            }
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                self.error(
                    Span::new(start, self.pos),
                    ParseErrorKind::EscapeHexInvalid,
                )
            })
    }

    fn char(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    fn peek(&self) -> Option<char> {
        let mut it = self.pattern[self.pos..].chars();
        it.next();
        it.next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.char() {
            self.pos += c.len_utf8();
        }
    }

    /// The span of the character at the current position, or an empty span
    /// at the end of the pattern.
    fn span_char(&self) -> Span {
        let len = self.char().map_or(0, |c| c.len_utf8());
        Span::new(self.pos, self.pos + len)
    }

    fn error(&self, span: Span, kind: ParseErrorKind) -> ParseError {
        ParseError { kind, pattern: self.pattern.to_string(), span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Class, Literal, Repetition};

    fn lit(c: char) -> Ast {
        Ast::Literal(Literal { c, fold: false })
    }

    fn ilit(c: char) -> Ast {
        Ast::Literal(Literal { c, fold: true })
    }

    fn class(ranges: &[(char, char)], negated: bool, fold: bool) -> Ast {
        let set = ClassSet::new(ranges.iter().cloned());
        Ast::Class(Class { set, negated, fold })
    }

    fn rep(ast: Ast, min: u32, max: Option<u32>) -> Ast {
        Ast::Repeat(Repetition { min, max, ast: Box::new(ast) })
    }

    fn kind(pattern: &str) -> ParseErrorKind {
        parse(pattern).unwrap_err().kind().clone()
    }

    #[test]
    fn empty() {
        assert_eq!(Ast::empty(), parse("").unwrap());
        assert_eq!(Ast::Group(Box::new(Ast::empty())), parse("()").unwrap());
    }

    #[test]
    fn literals_and_concat() {
        assert_eq!(lit('a'), parse("a").unwrap());
        assert_eq!(
            Ast::Concat(vec![lit('w'), lit('a'), lit('t'), Ast::AnyByte]),
            parse("wat.").unwrap()
        );
        assert_eq!(lit('☃'), parse("☃").unwrap());
    }

    #[test]
    fn escapes() {
        assert_eq!(lit('*'), parse(r"\*").unwrap());
        assert_eq!(lit('\n'), parse(r"\n").unwrap());
        assert_eq!(lit('a'), parse(r"\x61").unwrap());
        assert_eq!(lit('☃'), parse(r"\x{2603}").unwrap());
        assert_eq!(class(&[('0', '9')], true, false), parse(r"\D").unwrap());
    }

    #[test]
    fn alternation_and_repetition() {
        assert_eq!(
            Ast::Alternate(vec![
                rep(lit('a'), 1, None),
                rep(lit('b'), 1, None),
            ]),
            parse("a+|b+").unwrap()
        );
        assert_eq!(
            Ast::Concat(vec![
                rep(class(&[('a', 'z')], false, false), 0, Some(1)),
                rep(class(&[('1', '9')], false, false), 0, None),
            ]),
            parse("[a-z]?[1-9]*").unwrap()
        );
        assert_eq!(rep(lit('a'), 2, Some(5)), parse("a{2,5}").unwrap());
        assert_eq!(rep(lit('a'), 2, None), parse("a{2,}").unwrap());
        assert_eq!(rep(lit('a'), 3, Some(3)), parse("a{3}").unwrap());
    }

    #[test]
    fn classes() {
        assert_eq!(
            class(&[(']', ']'), ('a', 'a')], false, false),
            parse("[]a]").unwrap()
        );
        assert_eq!(
            class(&[('-', '-'), ('a', 'a')], true, false),
            parse("[^-a]").unwrap()
        );
        assert_eq!(
            class(&[('-', '-'), ('a', 'a')], false, false),
            parse("[a-]").unwrap()
        );
        assert_eq!(
            class(&[('0', '9'), ('x', 'x')], false, false),
            parse(r"[\dx]").unwrap()
        );
    }

    #[test]
    fn posix_classes() {
        assert_eq!(
            class(&[('A', 'Z'), ('a', 'z')], false, false),
            parse("[[:alpha:]]").unwrap()
        );
        let not_digit = [('\0', '/'), (':', '\u{10FFFF}')];
        assert_eq!(
            class(&not_digit, false, false),
            parse("[[:^digit:]_]").unwrap()
        );
        // Not shaped like a POSIX class, so the brackets are literals.
        assert_eq!(
            class(&[(':', ':'), ('[', '['), ('a', 'a')], false, false),
            parse("[[:a]").unwrap()
        );
    }

    #[test]
    fn fold_directive() {
        assert_eq!(
            Ast::Concat(vec![lit('a'), ilit('b'), ilit('c')]),
            parse("a(?i)bc").unwrap()
        );
        // A directive carries over into later branches of the same group.
        assert_eq!(
            Ast::Alternate(vec![ilit('a'), ilit('b')]),
            parse("(?i)a|b").unwrap()
        );
    }

    #[test]
    fn fold_scoped_group() {
        let got = parse("(?i)[d-f]*(?-i:m)wow").unwrap();
        let expected = Ast::Concat(vec![
            rep(class(&[('d', 'f')], false, true), 0, None),
            Ast::CaseFold { enabled: false, ast: Box::new(lit('m')) },
            ilit('w'),
            ilit('o'),
            ilit('w'),
        ]);
        assert_eq!(expected, got);
    }

    #[test]
    fn fold_directive_does_not_escape_group() {
        let got = parse("(a(?i)b)c").unwrap();
        let expected = Ast::Concat(vec![
            Ast::Group(Box::new(Ast::Concat(vec![lit('a'), ilit('b')]))),
            lit('c'),
        ]);
        assert_eq!(expected, got);
    }

    #[test]
    fn fold_disable_directive() {
        assert_eq!(
            Ast::Concat(vec![ilit('a'), lit('b')]),
            parse("(?i)a(?-i)b").unwrap()
        );
    }

    #[test]
    fn errors() {
        use self::ParseErrorKind::*;

        assert_eq!(GroupUnclosed, kind("(a"));
        assert_eq!(GroupUnopened, kind("a)"));
        assert_eq!(ClassUnclosed, kind("[a"));
        assert_eq!(ClassUnclosed, kind("[]"));
        assert_eq!(ClassRangeInvalid, kind("[z-a]"));
        assert_eq!(ClassRangeLiteral, kind(r"[a-\d]"));
        assert_eq!(ClassPosixUnrecognized, kind("[[:greek:]]"));
        assert_eq!(EscapeUnexpectedEof, kind("a\\"));
        assert_eq!(EscapeUnrecognized, kind(r"\q"));
        assert_eq!(EscapeUnrecognized, kind(r"\1"));
        assert_eq!(EscapeHexInvalid, kind(r"\xZZ"));
        assert_eq!(EscapeHexInvalid, kind(r"\x{D800}"));
        assert_eq!(FlagUnrecognized, kind("(?s)"));
        assert_eq!(FlagDuplicate, kind("(?ii)"));
        assert_eq!(FlagDuplicate, kind("(?i-i)"));
        assert_eq!(FlagRepeatedNegation, kind("(?--i)"));
        assert_eq!(FlagDanglingNegation, kind("(?i-)"));
        assert_eq!(FlagDanglingNegation, kind("(?-:a)"));
        assert_eq!(FlagsEmpty, kind("(?)"));
        assert_eq!(FlagUnexpectedEof, kind("(?i"));
        assert_eq!(RepetitionMissing, kind("*"));
        assert_eq!(RepetitionMissing, kind("a|+"));
        assert_eq!(RepetitionMissing, kind("(?i)*"));
        assert_eq!(RepetitionNested, kind("a**"));
        assert_eq!(RepetitionLazy, kind("a*?"));
        assert_eq!(RepetitionCountInvalid, kind("a{5,3}"));
        assert_eq!(RepetitionCountInvalid, kind("a{1001}"));
        assert_eq!(RepetitionCountUnclosed, kind("a{2"));
        assert_eq!(RepetitionCountUnclosed, kind("a{,2}"));
        assert_eq!(AlternationEmpty, kind("a|"));
        assert_eq!(AlternationEmpty, kind("|a"));
        assert_eq!(AlternationEmpty, kind("a||b"));
        assert_eq!(AlternationEmpty, kind("(|a)"));
        assert_eq!(UnsupportedLook, kind("^a"));
        assert_eq!(UnsupportedLook, kind("a$"));
        assert_eq!(UnsupportedLook, kind(r"\bfoo"));
    }

    #[test]
    fn nest_limit() {
        let mut parser = Parser::new();
        parser.nest_limit(2);
        assert!(parser.parse("((a))").is_ok());
        let err = parser.parse("(((a)))").unwrap_err();
        assert_eq!(&ParseErrorKind::NestLimitExceeded(2), err.kind());
        assert_eq!(Span { start: 2, end: 3 }, err.span());
    }

    #[test]
    fn error_display() {
        let err = parse("(?i)[z-a]").unwrap_err();
        assert_eq!(Span { start: 5, end: 8 }, err.span());
        let expected = "\
regex parse error:
    (?i)[z-a]
         ^^^
error: invalid character class range, the start must be <= the end";
        assert_eq!(expected, err.to_string());
    }
}
