use std::error;
use std::fmt;
use std::result;

use crate::parse::ParseError;

pub type Result<T> = result::Result<T, Error>;

/// An error that occurred while compiling a regular expression.
///
/// Once a regular expression compiles successfully, no operation on the
/// resulting automaton can fail. All errors are therefore reported here,
/// before any matching begins.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred.
#[derive(Clone, Debug)]
pub enum ErrorKind {
    /// An error that occurred while parsing a regular expression. Note that
    /// this error may be printed over multiple lines, and is generally
    /// intended to be end user readable on its own.
    Syntax(ParseError),
    /// An error that occurred because the NFA or the DFA built from a
    /// pattern needed more heap than the configured size limit permits.
    TooBig {
        /// The configured limit, in bytes.
        limit: usize,
    },
    /// An error that occurred because determinization produced more states
    /// than can be represented by a [`StateID`](crate::StateID).
    TooManyStates {
        /// The maximum number of states.
        limit: usize,
    },
}

impl Error {
    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// If this error was caused by a malformed pattern, then return the
    /// underlying parse error.
    pub fn syntax_error(&self) -> Option<&ParseError> {
        match self.kind {
            ErrorKind::Syntax(ref err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn syntax(err: ParseError) -> Error {
        Error { kind: ErrorKind::Syntax(err) }
    }

    pub(crate) fn too_big(limit: usize) -> Error {
        Error { kind: ErrorKind::TooBig { limit } }
    }

    pub(crate) fn too_many_states(limit: usize) -> Error {
        Error { kind: ErrorKind::TooManyStates { limit } }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::syntax(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.kind {
            ErrorKind::Syntax(ref err) => Some(err),
            ErrorKind::TooBig { .. } | ErrorKind::TooManyStates { .. } => {
                None
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::Syntax(ref err) => fmt::Display::fmt(err, f),
            ErrorKind::TooBig { limit } => write!(
                f,
                "compiled regex exceeds size limit of {} bytes",
                limit,
            ),
            ErrorKind::TooManyStates { limit } => write!(
                f,
                "attempted to create a DFA with more than {} states",
                limit,
            ),
        }
    }
}
