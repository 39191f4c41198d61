// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Alphabet registry
//!
//! Symbols are numbered 1, 2, 3, ... in order of first occurrence.
//! Index 0 is reserved for epsilon (a transition that doesn't consume input).
//!
//! An alphabet belongs to one compilation: the parser appends to it, all later
//! stages only read it.
//!

use std::{
    collections::{hash_map::Entry, HashMap},
    fmt::Display,
};

/// Symbol index of epsilon transitions
pub const EPSILON: usize = 0;

///
/// Map from symbols to dense indices
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    // symbols[i] = symbol of index i+1
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Create an empty alphabet
    pub fn new() -> Self {
        Alphabet {
            symbols: Vec::new(),
            index: HashMap::new(),
        }
    }

    ///
    /// Get the index of symbol c
    /// - if c has been seen before, return its existing index
    /// - otherwise append c and return the new index
    ///
    pub fn register(&mut self, c: char) -> usize {
        match self.index.entry(c) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(e) => {
                self.symbols.push(c);
                let i = self.symbols.len();
                e.insert(i);
                i
            }
        }
    }

    /// Index of c if it's been registered
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    ///
    /// Index of a registered symbol
    ///
    /// # Panics
    ///
    /// If c has not been registered.
    ///
    pub fn index(&self, c: char) -> usize {
        self.index[&c]
    }

    ///
    /// Symbol of index i
    ///
    /// # Panics
    ///
    /// If i is [EPSILON] or larger than the number of symbols.
    ///
    pub fn symbol(&self, i: usize) -> char {
        assert!(i != EPSILON, "epsilon has no symbol");
        self.symbols[i - 1]
    }

    /// Number of symbols, not counting epsilon
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check whether no symbol has been registered
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All pairs (index, symbol) in index order
    pub fn symbols(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.symbols.iter().enumerate().map(|(i, &c)| (i + 1, c))
    }

    ///
    /// Convert a string to a sequence of symbol indices
    /// - return None if the string contains an unknown symbol
    ///
    pub fn encode(&self, s: &str) -> Option<Vec<usize>> {
        s.chars().map(|c| self.index_of(c)).collect()
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.symbols() {
            write!(f, " {c}:{i}")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_occurrence_order() {
        let mut alphabet = Alphabet::new();
        assert!(alphabet.is_empty());
        assert_eq!(alphabet.register('b'), 1);
        assert_eq!(alphabet.register('a'), 2);
        assert_eq!(alphabet.register('b'), 1);
        assert_eq!(alphabet.register('c'), 3);
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.symbol(2), 'a');
        assert_eq!(alphabet.index_of('c'), Some(3));
        assert_eq!(alphabet.index_of('z'), None);
        assert_eq!(alphabet.to_string(), "{ b:1 a:2 c:3 }");
    }

    #[test]
    fn test_deterministic() {
        let build = || {
            let mut a = Alphabet::new();
            for c in "abracadabra".chars() {
                a.register(c);
            }
            a
        };
        let a1 = build();
        let a2 = build();
        assert_eq!(a1, a2);
        let v: Vec<_> = a1.symbols().collect();
        assert_eq!(v, vec![(1, 'a'), (2, 'b'), (3, 'r'), (4, 'c'), (5, 'd')]);
    }

    #[test]
    fn test_encode() {
        let mut alphabet = Alphabet::new();
        alphabet.register('x');
        alphabet.register('y');
        assert_eq!(alphabet.encode("xyyx"), Some(vec![1, 2, 2, 1]));
        assert_eq!(alphabet.encode(""), Some(vec![]));
        assert_eq!(alphabet.encode("xz"), None);
    }

    #[test]
    #[should_panic]
    fn test_epsilon_has_no_symbol() {
        let mut alphabet = Alphabet::new();
        alphabet.register('a');
        alphabet.symbol(EPSILON);
    }
}
