// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Subset construction: convert an [Nfa] to a [Dfa]
//!
//! Each DFA state is the epsilon-closure of a set of NFA states. Sets are
//! compared by content: a set that's been seen before maps to the same DFA
//! state.
//!

use std::fmt::Display;

use crate::{
    alphabet::EPSILON,
    automata::{Dfa, DfaBuilder},
    bfs_queues::BfsQueue,
    nfa::{Nfa, StateId},
};

const WORD_BITS: usize = 64;

///
/// Set of NFA states
/// - fixed capacity (the number of NFA states)
/// - equality and hashing depend only on the elements
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateSet {
    words: Box<[u64]>,
}

impl StateSet {
    /// Empty set for states [0 .. n-1]
    pub fn new(n: usize) -> Self {
        let num_words = (n + WORD_BITS - 1) / WORD_BITS;
        StateSet {
            words: vec![0; num_words].into_boxed_slice(),
        }
    }

    /// Check whether s is in the set
    pub fn contains(&self, s: StateId) -> bool {
        self.words[s / WORD_BITS] & (1u64 << (s % WORD_BITS)) != 0
    }

    ///
    /// Add s to the set
    /// - return true if s was not already present
    ///
    pub fn insert(&mut self, s: StateId) -> bool {
        let w = &mut self.words[s / WORD_BITS];
        let mask = 1u64 << (s % WORD_BITS);
        let new = *w & mask == 0;
        *w |= mask;
        new
    }

    /// Check whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Elements in increasing order
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            (0..WORD_BITS)
                .filter(move |b| w & (1u64 << b) != 0)
                .map(move |b| i * WORD_BITS + b)
        })
    }
}

impl Display for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for s in self.iter() {
            write!(f, " {s}")?;
        }
        write!(f, " }}")
    }
}

///
/// Add to set all the states reachable from it by epsilon transitions
///
/// States are marked when first reached so cycles of epsilon transitions
/// are visited once.
///
pub fn epsilon_closure(nfa: &Nfa, set: &mut StateSet) {
    let mut stack: Vec<StateId> = set.iter().collect();
    while let Some(s) = stack.pop() {
        for t in nfa.successors(s, EPSILON) {
            if set.insert(t) {
                stack.push(t);
            }
        }
    }
}

///
/// Epsilon-closure of the states reachable from set by one transition
/// labeled with symbol
///
pub fn move_set(nfa: &Nfa, set: &StateSet, symbol: usize) -> StateSet {
    let mut result = StateSet::new(nfa.num_states());
    for s in set.iter() {
        for t in nfa.successors(s, symbol) {
            result.insert(t);
        }
    }
    epsilon_closure(nfa, &mut result);
    result
}

///
/// Subset construction
/// - num_symbols = number of non-epsilon symbols (symbols are 1 ..= num_symbols)
/// - state 0 of the result is the closure of the NFA's initial state
/// - states are numbered in the order they're discovered (breadth-first)
/// - an empty move is a dead transition
///
pub fn determinize(nfa: &Nfa, num_symbols: usize) -> Dfa {
    let initial = nfa.initial_set();
    let mut builder = DfaBuilder::new(num_symbols, &initial);
    let mut queue = BfsQueue::new();
    queue.push(initial);
    while let Some(subset) = queue.pop() {
        if nfa.is_accepting(&subset) {
            builder.mark_accepting(&subset);
        }
        for symbol in 1..=num_symbols {
            let next = move_set(nfa, &subset, symbol);
            if !next.is_empty() {
                builder.add_transition(&subset, symbol, &next);
                queue.push(next);
            }
        }
    }
    log::debug!(
        "subset construction: {} NFA states -> {} DFA states",
        nfa.num_states(),
        queue.num_seen()
    );
    builder.build()
}
