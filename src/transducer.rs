use crate::regex::Regex;
use crate::state_id::StateID;

impl fst::Automaton for Regex {
    type State = StateID;

    #[inline]
    fn start(&self) -> StateID {
        Regex::start(self)
    }

    #[inline]
    fn is_match(&self, state: &StateID) -> bool {
        Regex::is_match(self, *state)
    }

    #[inline]
    fn accept(&self, state: &StateID, byte: u8) -> StateID {
        Regex::accept(self, *state, byte)
    }

    #[inline]
    fn can_match(&self, state: &StateID) -> bool {
        Regex::can_match(self, *state)
    }
}

#[cfg(test)]
mod tests {
    use bstr::BString;
    use fst::{Automaton, IntoStreamer, Set, Streamer};

    use crate::Regex;

    fn search<A: Automaton, D: AsRef<[u8]>>(
        set: &Set<D>,
        aut: A,
    ) -> Vec<BString> {
        let mut stream = set.search(aut).into_stream();

        let mut results = vec![];
        while let Some(key) = stream.next() {
            results.push(BString::from(key));
        }
        results
    }

    #[test]
    fn whole_keys_only() {
        let set =
            Set::from_iter(&["a", "bar", "baz", "wat", "xba", "xbax", "z"])
                .unwrap();
        let re = Regex::new("ba.*").unwrap();
        let got = search(&set, &re);
        assert_eq!(got, vec!["bar", "baz"]);
    }

    #[test]
    fn case_insensitive() {
        let set = Set::from_iter(&["MARTY", "Marty", "marty", "martyr"])
            .unwrap();
        let re = Regex::new("(?i)marty").unwrap();
        let got = search(&set, &re);
        assert_eq!(got, vec!["MARTY", "Marty", "marty"]);
    }

    #[test]
    fn empty_pattern_matches_empty_key() {
        let set = Set::from_iter(&["", "a"]).unwrap();
        let re = Regex::new("").unwrap();
        let got = search(&set, &re);
        assert_eq!(got, vec![""]);
    }

    #[test]
    fn alternation_of_runs() {
        let set =
            Set::from_iter(&["aaa", "aab", "ab", "b", "bbb"]).unwrap();
        let re = Regex::new("a+|b+").unwrap();
        let got = search(&set, &re);
        assert_eq!(got, vec!["aaa", "b", "bbb"]);
    }
}
