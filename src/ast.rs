/*!
The abstract syntax tree produced by the [parser](crate::parse).

The tree is a direct image of the pattern's structure. Case insensitivity is
resolved while parsing: every leaf that can be affected by it (a
[`Literal`] or a [`Class`]) records whether folding is active at its
position, so later stages never need to track flag scopes themselves.
*/

use crate::class::ClassSet;

/// A single node in the syntax tree of a regular expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ast {
    /// A single Unicode scalar value, matched as its UTF-8 encoding.
    Literal(Literal),
    /// The `.` wildcard, which matches any single byte.
    AnyByte,
    /// A bracketed class such as `[a-z]` or a Perl class such as `\d`.
    Class(Class),
    /// A sequence of nodes matched one after the other. The empty
    /// concatenation matches only the empty string.
    Concat(Vec<Ast>),
    /// A set of at least two branches, any one of which may match.
    Alternate(Vec<Ast>),
    /// A repetition of a sub-expression.
    Repeat(Repetition),
    /// A group, `(...)` or `(?:...)`. Groups never capture.
    Group(Box<Ast>),
    /// A group with a scoped flag, `(?i:...)` or `(?-i:...)`. The flag has
    /// already been applied to the leaves of `ast`.
    CaseFold {
        /// Whether case insensitive matching is enabled inside the group.
        enabled: bool,
        /// The contents of the group.
        ast: Box<Ast>,
    },
}

/// A literal scalar value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Literal {
    /// The scalar value.
    pub c: char,
    /// Whether this literal matches case insensitively.
    pub fold: bool,
}

/// A character class.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Class {
    /// The members of the class as written, before folding or negation.
    pub set: ClassSet,
    /// Whether the class is negated, e.g., `[^a]` or `\D`.
    pub negated: bool,
    /// Whether this class matches case insensitively.
    pub fold: bool,
}

/// A repetition operator applied to a sub-expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repetition {
    /// The minimum number of times the sub-expression must match.
    pub min: u32,
    /// The maximum number of times the sub-expression may match, or `None`
    /// if there is no upper bound.
    pub max: Option<u32>,
    /// The sub-expression being repeated.
    pub ast: Box<Ast>,
}

impl Ast {
    /// An expression that matches only the empty string.
    pub fn empty() -> Ast {
        Ast::Concat(vec![])
    }

    /// Build a concatenation, unwrapping it if it has exactly one element.
    pub(crate) fn concat(mut asts: Vec<Ast>) -> Ast {
        match asts.pop() {
            Some(ast) if asts.is_empty() => ast,
            Some(ast) => {
                asts.push(ast);
                Ast::Concat(asts)
            }
            None => Ast::Concat(asts),
        }
    }

    /// Build an alternation, unwrapping it if it has exactly one branch.
    pub(crate) fn alternate(mut asts: Vec<Ast>) -> Ast {
        match asts.pop() {
            Some(ast) if asts.is_empty() => ast,
            Some(ast) => {
                asts.push(ast);
                Ast::Alternate(asts)
            }
            None => Ast::Alternate(asts),
        }
    }

    /// Returns true if and only if this expression can match the empty
    /// string.
    pub fn is_nullable(&self) -> bool {
        match *self {
            Ast::Literal(_) | Ast::AnyByte => false,
            // An empty class matches nothing, not even the empty string.
            Ast::Class(_) => false,
            Ast::Concat(ref asts) => asts.iter().all(|a| a.is_nullable()),
            Ast::Alternate(ref asts) => asts.iter().any(|a| a.is_nullable()),
            Ast::Repeat(ref rep) => rep.min == 0 || rep.ast.is_nullable(),
            Ast::Group(ref ast) | Ast::CaseFold { ref ast, .. } => {
                ast.is_nullable()
            }
        }
    }
}

impl Repetition {
    /// Returns true if this is `?`.
    pub fn is_optional(&self) -> bool {
        self.min == 0 && self.max == Some(1)
    }
}
