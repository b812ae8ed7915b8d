use std::fmt;

use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};

use crate::util::DebugChar;

/// A set of Unicode scalar values.
///
/// The set is always in canonical form: its ranges are sorted, pairwise
/// disjoint and never adjacent. Canonicalization happens on every mutation,
/// so negation and case folding always operate on a normalized range list.
#[derive(Clone, Eq, PartialEq)]
pub struct ClassSet {
    set: ClassUnicode,
}

/// One of the ASCII Perl character classes: `\d`, `\w` or `\s`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Perl {
    /// `[0-9]`
    Digit,
    /// `[0-9A-Za-z_]`
    Word,
    /// `[\t\n\v\f\r ]`
    Space,
}

/// One of the ASCII POSIX character classes, e.g., `[:alpha:]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Posix {
    /// `[0-9A-Za-z]`
    Alnum,
    /// `[A-Za-z]`
    Alpha,
    /// `[\x00-\x7F]`
    Ascii,
    /// `[\t ]`
    Blank,
    /// `[\x00-\x1F\x7F]`
    Cntrl,
    /// `[0-9]`
    Digit,
    /// `[!-~]`
    Graph,
    /// `[a-z]`
    Lower,
    /// `[ -~]`
    Print,
    /// ``[!-/:-@\[-`{-~]``
    Punct,
    /// `[\t\n\v\f\r ]`
    Space,
    /// `[A-Z]`
    Upper,
    /// `[0-9A-Za-z_]`
    Word,
    /// `[0-9A-Fa-f]`
    Xdigit,
}

impl Posix {
    /// Look up a POSIX class by the name written between `[:` and `:]`.
    pub fn from_name(name: &str) -> Option<Posix> {
        Some(match name {
            "alnum" => Posix::Alnum,
            "alpha" => Posix::Alpha,
            "ascii" => Posix::Ascii,
            "blank" => Posix::Blank,
            "cntrl" => Posix::Cntrl,
            "digit" => Posix::Digit,
            "graph" => Posix::Graph,
            "lower" => Posix::Lower,
            "print" => Posix::Print,
            "punct" => Posix::Punct,
            "space" => Posix::Space,
            "upper" => Posix::Upper,
            "word" => Posix::Word,
            "xdigit" => Posix::Xdigit,
            _ => return None,
        })
    }
}

impl ClassSet {
    /// Create a set that contains nothing.
    pub fn empty() -> ClassSet {
        ClassSet { set: ClassUnicode::empty() }
    }

    /// Create a set from an arbitrary sequence of inclusive ranges. The
    /// ranges may overlap and may appear in any order, and a range may have
    /// its bounds swapped.
    pub fn new<I>(ranges: I) -> ClassSet
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let it = ranges
            .into_iter()
            .map(|(start, end)| ClassUnicodeRange::new(start, end));
        ClassSet { set: ClassUnicode::new(it) }
    }

    /// Create a set containing exactly one scalar value.
    pub fn singleton(c: char) -> ClassSet {
        ClassSet::new(Some((c, c)))
    }

    /// Create the set corresponding to the given Perl class.
    pub fn perl(kind: Perl) -> ClassSet {
        match kind {
            Perl::Digit => ClassSet::new(vec![('0', '9')]),
            Perl::Word => ClassSet::new(vec![
                ('0', '9'),
                ('A', 'Z'),
                ('_', '_'),
                ('a', 'z'),
            ]),
            Perl::Space => ClassSet::new(vec![('\t', '\r'), (' ', ' ')]),
        }
    }

    /// Create the set corresponding to the given POSIX class.
    pub fn posix(kind: Posix) -> ClassSet {
        let ranges: &[(char, char)] = match kind {
            Posix::Alnum => &[('0', '9'), ('A', 'Z'), ('a', 'z')],
            Posix::Alpha => &[('A', 'Z'), ('a', 'z')],
            Posix::Ascii => &[('\x00', '\x7F')],
            Posix::Blank => &[('\t', '\t'), (' ', ' ')],
            Posix::Cntrl => &[('\x00', '\x1F'), ('\x7F', '\x7F')],
            Posix::Digit => &[('0', '9')],
            Posix::Graph => &[('!', '~')],
            Posix::Lower => &[('a', 'z')],
            Posix::Print => &[(' ', '~')],
            Posix::Punct => {
                &[('!', '/'), (':', '@'), ('[', '`'), ('{', '~')]
            }
            Posix::Space => return ClassSet::perl(Perl::Space),
            Posix::Upper => &[('A', 'Z')],
            Posix::Word => return ClassSet::perl(Perl::Word),
            Posix::Xdigit => &[('0', '9'), ('A', 'F'), ('a', 'f')],
        };
        ClassSet::new(ranges.iter().cloned())
    }

    /// Add the inclusive range `start..=end` to this set.
    pub fn push(&mut self, start: char, end: char) {
        self.set.push(ClassUnicodeRange::new(start, end));
    }

    /// Add every member of `other` to this set.
    pub fn union(&mut self, other: &ClassSet) {
        self.set.union(&other.set);
    }

    /// Replace this set with its complement over all Unicode scalar values.
    pub fn negate(&mut self) {
        self.set.negate();
    }

    /// Expand this set such that it is closed under Unicode simple case
    /// folding. That is, for every member, all of its simple case
    /// equivalents are added.
    pub fn case_fold(&mut self) {
        self.set.case_fold_simple();
    }

    /// Compute the set of scalar values actually matched by a class with
    /// this membership, taking folding and negation into account.
    ///
    /// Folding always happens before negation. Folding a negated set would
    /// re-introduce the case variants of the excluded members: `(?i)[^x]`
    /// would then match `x` via `X`.
    pub fn resolve(&self, negated: bool, fold: bool) -> ClassSet {
        let mut set = self.clone();
        if fold {
            set.case_fold();
        }
        if negated {
            set.negate();
        }
        set
    }

    /// Returns true if and only if this set contains no scalar values.
    pub fn is_empty(&self) -> bool {
        self.set.ranges().is_empty()
    }

    /// Returns true if and only if the given scalar value is in this set.
    pub fn contains(&self, c: char) -> bool {
        use std::cmp::Ordering;

        self.set
            .ranges()
            .binary_search_by(|r| {
                if r.end() < c {
                    Ordering::Less
                } else if r.start() > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    /// If this set contains exactly one scalar value, then return it.
    pub fn single(&self) -> Option<char> {
        match self.set.ranges() {
            [r] if r.start() == r.end() => Some(r.start()),
            _ => None,
        }
    }

    /// Iterate over the canonical ranges of this set in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.set.iter().map(|r| (r.start(), r.end()))
    }
}

impl fmt::Debug for ClassSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut list = f.debug_list();
        for (start, end) in self.ranges() {
            if start == end {
                list.entry(&DebugChar(start));
            } else {
                list.entry(&(DebugChar(start)..=DebugChar(end)));
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(set: &ClassSet) -> Vec<(char, char)> {
        set.ranges().collect()
    }

    #[test]
    fn normalized_on_construction() {
        let set = ClassSet::new(vec![('x', 'z'), ('a', 'c'), ('b', 'f')]);
        assert_eq!(vec![('a', 'f'), ('x', 'z')], ranges(&set));

        let set = ClassSet::new(vec![('a', 'b'), ('c', 'd')]);
        assert_eq!(vec![('a', 'd')], ranges(&set));
    }

    #[test]
    fn fold_ascii() {
        let mut set = ClassSet::new(vec![('d', 'f')]);
        set.case_fold();
        assert_eq!(vec![('D', 'F'), ('d', 'f')], ranges(&set));
    }

    #[test]
    fn fold_then_negate_excludes_both_cases() {
        let set = ClassSet::singleton('x').resolve(true, true);
        assert!(!set.contains('x'));
        assert!(!set.contains('X'));
        assert!(set.contains('a'));
        assert!(set.contains('A'));
        assert!(set.contains('\u{10FFFF}'));
    }

    #[test]
    fn negate_then_fold_would_be_wrong() {
        // This is the order that must never be used. It is here to show why.
        let mut set = ClassSet::singleton('x');
        set.negate();
        set.case_fold();
        assert!(set.contains('x'));
    }

    #[test]
    fn negate_everything_is_empty() {
        let all = ClassSet::new(vec![('\0', '\u{10FFFF}')]);
        let set = all.resolve(true, false);
        assert!(set.is_empty());
    }

    #[test]
    fn single() {
        assert_eq!(Some('a'), ClassSet::singleton('a').single());
        assert_eq!(None, ClassSet::new(vec![('a', 'b')]).single());
        assert_eq!(None, ClassSet::empty().single());
    }

    #[test]
    fn posix_names() {
        assert_eq!(Some(Posix::Xdigit), Posix::from_name("xdigit"));
        assert_eq!(None, Posix::from_name("Alpha"));
        let punct = ClassSet::posix(Posix::Punct);
        for c in "!/:@[`{~".chars() {
            assert!(punct.contains(c), "{:?}", c);
        }
        assert!(!punct.contains('a'));
        assert!(!punct.contains('0'));
    }

    #[test]
    fn perl_space() {
        let set = ClassSet::perl(Perl::Space);
        for c in "\t\n\x0B\x0C\r ".chars() {
            assert!(set.contains(c), "{:?}", c);
        }
        assert!(!set.contains('a'));
    }
}
