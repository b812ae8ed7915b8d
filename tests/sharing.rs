use std::sync::Arc;
use std::thread;

use regex_automaton::{Regex, StateID};

const INPUTS: &[&[u8]] =
    &[b"DeeFmWoW", b"DeeFMWoW", b"aaaa", b"abab", b"bbb", b""];

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn regex_is_send_and_sync() {
    assert_send_sync::<Regex>();
    assert_send_sync::<StateID>();
}

#[test]
fn concurrent_walks_agree() {
    let re = Arc::new(Regex::new("(?i)[d-f]*(?-i:m)wow|a+|b+").unwrap());
    let expected: Vec<bool> = INPUTS.iter().map(|i| re.matches(i)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let re = Arc::clone(&re);
            thread::spawn(move || {
                INPUTS.iter().map(|i| re.matches(i)).collect::<Vec<bool>>()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(expected, handle.join().unwrap());
    }
}

#[test]
fn interleaved_cursors_are_independent() {
    let re = Regex::new("ab|ac").unwrap();
    let mut s1 = re.start();
    let mut s2 = re.start();
    s1 = re.accept(s1, b'a');
    s2 = re.accept(s2, b'a');
    s1 = re.accept(s1, b'b');
    assert!(re.is_match(s1));
    assert!(!re.is_match(s2));
    s2 = re.accept(s2, b'c');
    assert!(re.is_match(s2));
}
