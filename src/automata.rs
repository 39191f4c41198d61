// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Deterministic finite-state automata
//!
//! States are indexed by an integer from 0 to N-1 where N is the number of states.
//! State 0 is the initial state.
//!
//! Symbols are the indices 1 to M of an [Alphabet] (index 0 is epsilon and
//! never labels a DFA transition). A state has at most one successor per symbol.
//! A missing successor is a *dead* transition: the input is rejected.
//!
//! Function [minimized](Dfa::minimized) computes the minimal automaton for the
//! same language. The minimal automaton is numbered canonically: breadth-first
//! from the initial state, exploring successors in symbol order. Two automata
//! for the same language then minimize to identical [Dfa] values.
//!

use std::{collections::HashMap, fmt::Display, hash::Hash};

use crate::{
    alphabet::Alphabet,
    bfs_queues::BfsQueue,
    minimizer::{refine_by_passes, Minimizer},
    partitions::Partition,
};

///
/// Minimization algorithm
///
/// Both compute the same partition of states.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Hopcroft's splitter-based refinement
    #[default]
    Hopcroft,
    /// Repeated refinement passes over the alphabet until nothing changes
    Moore,
}

///
/// Deterministic finite state automaton
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    // number of symbols (excluding epsilon)
    num_symbols: usize,
    // number of accepting states
    num_accepting_states: usize,
    // array of states
    states: Box<[State]>,
}

///
/// State of an automaton
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    // index of this state
    id: usize,
    is_accepting: bool,
    // successor[i] = successor via symbol i+1 or None for a dead transition
    successor: Box<[Option<usize>]>,
}

///
/// Iterator to list the transitions from a state
/// - transitions are given as pairs (symbol, successor state), in symbol order
/// - dead transitions are skipped
///
#[derive(Debug)]
pub struct EdgeIterator<'a> {
    state_array: &'a [State],
    state: &'a State,
    index: usize,
}

///
/// Iterator to enumerate the accepting states of an automaton
///
#[derive(Debug)]
pub struct AcceptingStateIterator<'a> {
    state_array: &'a [State],
    index: usize,
}

///
/// Listing of an automaton using symbols instead of symbol indices
///
/// Each state is printed as `State i:` (1-based), followed by `Accepting` if
/// it's an accepting state, then one `Move(i, symbol) = j` line per transition.
///
#[derive(Debug)]
pub struct DfaDump<'a> {
    dfa: &'a Dfa,
    alphabet: &'a Alphabet,
}

//
// Remap structure for automata minimization
// 1) equivalent states are mapped to the same new id
// 2) for every new id, one old state is taken as representative
// - for every old state i: new_id[i] = new id for i, or None if i is dropped
//   (either unreachable or equivalent to a dead transition)
// - for every new state j: old_id[j] = id of the representative of j
//
#[derive(Debug)]
struct StateMapping {
    new_id: Vec<Option<usize>>,
    old_id: Vec<usize>,
}

impl StateMapping {
    //
    // Build a mapping from a partition of the states of dfa plus one sink state
    // - the sink is the extra element of index dfa.num_states()
    // - blocks are numbered breadth-first from the initial state's block
    // - the sink's block is removed: transitions to it become dead
    //
    // If the initial state is in the sink's block, the language is empty and
    // the sink's block is kept as state 0.
    //
    fn canonical(dfa: &Dfa, p: &Partition) -> Self {
        let sink = dfa.num_states() as u32;
        let block_of = |s: usize| p.block_id(s as u32) as usize;
        let dead = p.block_id(sink) as usize;
        let dead = if block_of(0) == dead { None } else { Some(dead) };

        let mut block_to_new: Vec<Option<usize>> = vec![None; p.num_blocks() as usize];
        let mut old_id = Vec::with_capacity(p.index() as usize);
        let mut queue = BfsQueue::new();

        block_to_new[block_of(0)] = Some(0);
        old_id.push(0);
        queue.push(0);
        while let Some(s) = queue.pop() {
            for next in dfa.states[s].successor.iter().flatten() {
                let b = block_of(*next);
                if Some(b) != dead && block_to_new[b].is_none() {
                    block_to_new[b] = Some(old_id.len());
                    old_id.push(*next);
                    queue.push(*next);
                }
            }
        }

        let new_id = (0..dfa.num_states())
            .map(|s| {
                let b = block_of(s);
                if Some(b) == dead {
                    None
                } else {
                    block_to_new[b]
                }
            })
            .collect();
        StateMapping { new_id, old_id }
    }

    // Number of new states
    fn num_new_states(&self) -> usize {
        self.old_id.len()
    }

    // Check whether old id is representative of its class
    fn is_class_rep(&self, id: usize) -> bool {
        self.new_id[id].is_some_and(|j| self.old_id[j] == id)
    }
}

impl Dfa {
    /// Get the initial state
    pub fn initial_state(&self) -> &State {
        &self.states[0]
    }

    /// Get a state from its id
    /// panics if the id is out of range
    pub fn state(&self, id: usize) -> &State {
        &self.states[id]
    }

    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of symbols (not counting epsilon)
    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    /// Number of accepting states
    pub fn num_accepting_states(&self) -> usize {
        self.num_accepting_states
    }

    ///
    /// Successor of a state via a symbol
    /// - return None for a dead transition or a symbol outside [1 .. num_symbols]
    ///
    pub fn next(&self, s: &State, symbol: usize) -> Option<&State> {
        s.successor(symbol).map(|i| &self.states[i])
    }

    /// Iterator to go through the states
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Iterator to list the transitions of a state as pairs (symbol, successor)
    pub fn edges<'a>(&'a self, s: &'a State) -> EdgeIterator<'a> {
        EdgeIterator {
            state_array: &self.states,
            state: s,
            index: 0,
        }
    }

    /// Iterator to list the accepting states
    pub fn accepting_states(&self) -> AcceptingStateIterator<'_> {
        AcceptingStateIterator {
            state_array: &self.states,
            index: 0,
        }
    }

    /// Check whether a sequence of symbols is accepted
    pub fn accepts(&self, input: &[usize]) -> bool {
        let mut s = self.initial_state();
        for &symbol in input {
            match self.next(s, symbol) {
                Some(next) => s = next,
                None => return false,
            }
        }
        s.is_accepting
    }

    ///
    /// Check whether a string is accepted
    /// - characters that are not in the alphabet are rejected
    ///
    pub fn matches(&self, alphabet: &Alphabet, input: &str) -> bool {
        match alphabet.encode(input) {
            Some(symbols) => self.accepts(&symbols),
            None => false,
        }
    }

    /// Listing of this automaton with symbols from alphabet
    pub fn dump<'a>(&'a self, alphabet: &'a Alphabet) -> DfaDump<'a> {
        DfaDump {
            dfa: self,
            alphabet,
        }
    }

    /// Apply a remapping and return the new automaton
    fn remap_states(&self, remap: &StateMapping) -> Dfa {
        let num_new_states = remap.num_new_states();
        let mut new_states = Vec::with_capacity(num_new_states);
        let mut num_accepting_states = 0;
        for (i, &old_id) in remap.old_id.iter().enumerate() {
            debug_assert!(remap.is_class_rep(old_id));
            let s = &self.states[old_id];
            let successor = s
                .successor
                .iter()
                .map(|&next| next.and_then(|j| remap.new_id[j]))
                .collect();
            if s.is_accepting {
                num_accepting_states += 1;
            }
            new_states.push(State {
                id: i,
                is_accepting: s.is_accepting,
                successor,
            });
        }
        Dfa {
            num_symbols: self.num_symbols,
            num_accepting_states,
            states: new_states.into(),
        }
    }

    ///
    /// Compute the minimal automaton
    ///
    /// The transition function is made total by adding a non-accepting sink
    /// state: every dead transition goes to the sink. States that end up
    /// equivalent to the sink are removed, and so are unreachable states.
    ///
    pub fn minimized(&self, strategy: Strategy) -> Dfa {
        let sink = self.num_states() as u32;
        let num_symbols = self.num_symbols as u32;
        let delta = |s: u32, c: u32| {
            if s == sink {
                sink
            } else {
                self.states[s as usize].successor[c as usize].map_or(sink, |j| j as u32)
            }
        };
        let is_final = |s: u32| s != sink && self.states[s as usize].is_accepting;

        let remap = match strategy {
            Strategy::Hopcroft => {
                let mut minimizer = Minimizer::new(sink + 1, num_symbols, delta, is_final);
                StateMapping::canonical(self, minimizer.refine())
            }
            Strategy::Moore => {
                let p = refine_by_passes(sink + 1, num_symbols, delta, is_final);
                StateMapping::canonical(self, &p)
            }
        };
        let result = self.remap_states(&remap);
        log::debug!(
            "minimization ({strategy:?}): {} states -> {} states",
            self.num_states(),
            result.num_states()
        );
        result
    }
}

impl State {
    /// State id
    pub fn id(&self) -> usize {
        self.id
    }

    /// Check whether a state is accepting
    pub fn is_accepting(&self) -> bool {
        self.is_accepting
    }

    /// Id of the successor via symbol, if any
    pub fn successor(&self, symbol: usize) -> Option<usize> {
        symbol
            .checked_sub(1)
            .and_then(|i| self.successor.get(i))
            .copied()
            .flatten()
    }

    /// Number of transitions, not including dead transitions
    pub fn num_successors(&self) -> usize {
        self.successor.iter().filter(|x| x.is_some()).count()
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.id)
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn plural(n: usize) -> &'static str {
            if n == 1 {
                ""
            } else {
                "s"
            }
        }

        writeln!(f, "{} state{}", self.num_states(), plural(self.num_states()))?;
        writeln!(f, "initial state: {}", self.initial_state())?;
        write!(f, "accepting state{}:", plural(self.num_accepting_states))?;
        for s in self.accepting_states() {
            write!(f, " {s}")?;
        }
        writeln!(f)?;
        writeln!(f, "transitions:")?;
        for s in self.states() {
            for (c, d) in self.edges(s) {
                writeln!(f, "  \u{03B4}({s}, {c}) = {d}")?;
            }
        }
        Ok(())
    }
}

impl Display for DfaDump<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for s in self.dfa.states() {
            let i = s.id + 1;
            write!(f, "State {i}:")?;
            if s.is_accepting {
                write!(f, " Accepting")?;
            }
            writeln!(f)?;
            for (c, d) in self.dfa.edges(s) {
                writeln!(
                    f,
                    "\tMove({i}, {}) = {}",
                    self.alphabet.symbol(c),
                    d.id + 1
                )?;
            }
        }
        Ok(())
    }
}

impl<'a> Iterator for EdgeIterator<'a> {
    type Item = (usize, &'a State);

    fn next(&mut self) -> Option<Self::Item> {
        let successors = &self.state.successor;
        while self.index < successors.len() {
            let i = self.index;
            self.index += 1;
            if let Some(next_id) = successors[i] {
                return Some((i + 1, &self.state_array[next_id]));
            }
        }
        None
    }
}

impl<'a> Iterator for AcceptingStateIterator<'a> {
    type Item = &'a State;

    fn next(&mut self) -> Option<Self::Item> {
        let mut i = self.index;
        let a = self.state_array;
        while i < a.len() {
            if a[i].is_accepting {
                self.index = i + 1;
                return Some(&a[i]);
            }
            i += 1;
        }
        self.index = i;
        None
    }
}

#[derive(Debug)]
struct StateInConstruction {
    is_accepting: bool,
    transitions: Vec<(usize, usize)>,
}

impl StateInConstruction {
    fn new() -> StateInConstruction {
        StateInConstruction {
            is_accepting: false,
            transitions: Vec::new(),
        }
    }

    // successor array indexed by symbol - 1
    fn make_successor(&self, num_symbols: usize) -> Box<[Option<usize>]> {
        let mut result = vec![None; num_symbols];
        for &(symbol, next) in &self.transitions {
            let slot = &mut result[symbol - 1];
            assert!(
                slot.is_none_or(|x| x == next),
                "non-deterministic transitions on symbol {symbol}"
            );
            *slot = Some(next);
        }
        result.into()
    }
}

///
/// Automaton builder
///
/// States are identified by arbitrary keys of type T. They are numbered
/// in the order in which they're first mentioned. The state passed to
/// [new](Self::new) is the initial state.
///
#[derive(Debug)]
pub struct DfaBuilder<T> {
    num_symbols: usize,
    id_map: HashMap<T, usize>,
    states: Vec<StateInConstruction>,
}

impl<T: Eq + Hash + Clone> DfaBuilder<T> {
    fn get_state_id(&mut self, state: &T) -> usize {
        match self.id_map.get(state) {
            Some(i) => *i,
            None => {
                let i = self.states.len();
                self.states.push(StateInConstruction::new());
                self.id_map.insert(state.clone(), i);
                i
            }
        }
    }

    ///
    /// Create a new builder
    ///
    /// - num_symbols = size of the alphabet (symbols are 1 ..= num_symbols)
    /// - initial_state = initial state for the resulting automaton
    ///
    pub fn new(num_symbols: usize, initial_state: &T) -> Self {
        let mut new = DfaBuilder {
            num_symbols,
            id_map: HashMap::new(),
            states: Vec::new(),
        };
        new.get_state_id(initial_state);
        new
    }

    ///
    /// Mark an accepting state
    ///
    pub fn mark_accepting(&mut self, state: &T) -> &mut Self {
        let i = self.get_state_id(state);
        self.states[i].is_accepting = true;
        self
    }

    ///
    /// Add a transition
    ///
    pub fn add_transition(&mut self, state: &T, symbol: usize, next: &T) -> &mut Self {
        debug_assert!(symbol >= 1 && symbol <= self.num_symbols);
        let i = self.get_state_id(state);
        let j = self.get_state_id(next);
        self.states[i].transitions.push((symbol, j));
        self
    }

    ///
    /// Construct the automaton
    ///
    /// # Panics
    ///
    /// If a state has two transitions with the same symbol and different targets.
    ///
    pub fn build(&self) -> Dfa {
        let mut num_accepting_states = 0;
        let mut state_array = Vec::with_capacity(self.states.len());
        for (i, s) in self.states.iter().enumerate() {
            if s.is_accepting {
                num_accepting_states += 1;
            }
            state_array.push(State {
                id: i,
                is_accepting: s.is_accepting,
                successor: s.make_successor(self.num_symbols),
            });
        }
        Dfa {
            num_symbols: self.num_symbols,
            num_accepting_states,
            states: state_array.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    //
    // Test automaton over a, b, c (symbols 1, 2, 3):
    // 4 states, state 0 is initial, state 3 is the only accepting state
    // missing transitions are dead
    //
    //   0 --a--> 0
    //   0 --b--> 1
    //   0 --c--> 2
    //   1 --a--> 3
    //   1 --c--> 2
    //   2 --b--> 3
    //   2 --c--> 3
    //   3 --a--> 0
    //   3 --b--> 1
    //   3 --c--> 3
    //
    fn graph() -> Vec<(u32, usize, u32)> {
        vec![
            (0, 1, 0),
            (0, 2, 1),
            (0, 3, 2),
            (1, 1, 3),
            (1, 3, 2),
            (2, 2, 3),
            (2, 3, 3),
            (3, 1, 0),
            (3, 2, 1),
            (3, 3, 3),
        ]
    }

    fn alphabet(symbols: &str) -> Alphabet {
        let mut a = Alphabet::new();
        for c in symbols.chars() {
            a.register(c);
        }
        a
    }

    fn check_automaton(automaton: &Dfa) {
        assert_eq!(automaton.num_states(), 4);
        assert_eq!(automaton.initial_state().id(), 0);
        assert_eq!(automaton.num_accepting_states(), 1);

        let s0 = automaton.state(0);
        assert_eq!(automaton.next(s0, 1).unwrap().id(), 0);
        assert_eq!(automaton.next(s0, 2).unwrap().id(), 1);
        assert_eq!(automaton.next(s0, 3).unwrap().id(), 2);
        assert!(!s0.is_accepting());

        let s1 = automaton.state(1);
        assert_eq!(automaton.next(s1, 1).unwrap().id(), 3);
        assert!(automaton.next(s1, 2).is_none());
        assert_eq!(automaton.next(s1, 3).unwrap().id(), 2);

        let s2 = automaton.state(2);
        assert!(automaton.next(s2, 1).is_none());
        assert_eq!(automaton.next(s2, 2).unwrap().id(), 3);
        assert_eq!(automaton.next(s2, 3).unwrap().id(), 3);

        let s3 = automaton.state(3);
        assert!(s3.is_accepting());
        assert_eq!(s3.num_successors(), 3);
        assert!(automaton.next(s3, 0).is_none());
        assert!(automaton.next(s3, 4).is_none());
    }

    #[test]
    fn test_builder() {
        let mut builder = DfaBuilder::new(3, &0);
        for (source, label, dest) in &graph() {
            builder.add_transition(source, *label, dest);
        }
        builder.mark_accepting(&3);
        let automaton = builder.build();
        println!("{automaton}");
        check_automaton(&automaton);

        let edges: Vec<_> = automaton
            .edges(automaton.state(1))
            .map(|(c, s)| (c, s.id()))
            .collect();
        assert_eq!(edges, vec![(1, 3), (3, 2)]);

        assert!(automaton.accepts(&[2, 1]));
        assert!(automaton.accepts(&[1, 3, 3]));
        assert!(!automaton.accepts(&[2, 2]));
        assert!(!automaton.accepts(&[]));

        let abc = alphabet("abc");
        assert!(automaton.matches(&abc, "ba"));
        assert!(!automaton.matches(&abc, "bx"));
    }

    #[test]
    fn test_keys_are_numbered_in_order() {
        let mut builder = DfaBuilder::new(1, &"start");
        builder
            .add_transition(&"start", 1, &"middle")
            .add_transition(&"middle", 1, &"end")
            .mark_accepting(&"end");
        let dfa = builder.build();
        assert_eq!(dfa.num_states(), 3);
        assert!(dfa.state(2).is_accepting());
        assert!(dfa.accepts(&[1, 1]));
    }

    #[test]
    #[should_panic]
    fn test_non_deterministic() {
        let mut builder = DfaBuilder::new(1, &0);
        builder.add_transition(&0, 1, &1).add_transition(&0, 1, &2);
        builder.build();
    }

    #[test]
    fn test_dump() {
        let mut builder = DfaBuilder::new(2, &0);
        builder
            .add_transition(&0, 1, &1)
            .add_transition(&1, 2, &1)
            .mark_accepting(&1);
        let dfa = builder.build();
        let a = alphabet("xy");
        assert_eq!(
            dfa.dump(&a).to_string(),
            "State 1:\n\tMove(1, x) = 2\nState 2: Accepting\n\tMove(2, y) = 2\n"
        );
    }

    #[test]
    fn test_remove_unreachable() {
        let mut builder = DfaBuilder::new(3, &0);
        for (source, label, dest) in &graph() {
            builder.add_transition(source, *label, dest);
        }
        builder.mark_accepting(&3);

        // unreachable states
        builder.add_transition(&5, 3, &6);
        builder.add_transition(&6, 2, &5);
        builder.mark_accepting(&6);

        let automaton = builder.build();
        assert_eq!(automaton.num_states(), 6);

        let minimal = automaton.minimized(Strategy::Hopcroft);
        println!("{minimal}");
        check_automaton(&minimal);
    }

    #[test]
    fn test_minimizer() {
        for strategy in [Strategy::Hopcroft, Strategy::Moore] {
            let builder = &mut DfaBuilder::new(3, &0);

            // language abc(a*)
            builder.add_transition(&0, 1, &1);
            builder.add_transition(&1, 2, &2);
            builder.add_transition(&2, 3, &3);

            // states 3, 4, 5 are equivalent
            builder.add_transition(&3, 1, &4);
            builder.mark_accepting(&3);
            builder.add_transition(&4, 1, &5);
            builder.mark_accepting(&4);
            builder.add_transition(&5, 1, &3);
            builder.mark_accepting(&5);

            let automaton = builder.build();
            let minimal = automaton.minimized(strategy);
            println!("{strategy:?}\n{minimal}");

            assert_eq!(minimal.num_states(), 4);
            assert_eq!(minimal.num_accepting_states(), 1);
            let s3 = minimal.state(3);
            assert!(s3.is_accepting());
            assert_eq!(s3.successor(1), Some(3));
            assert!(minimal.accepts(&[1, 2, 3, 1, 1, 1, 1]));
            assert!(!minimal.accepts(&[1, 2, 3, 2]));
        }
    }

    #[test]
    fn test_states_equivalent_to_dead() {
        // a | b b*: states 2 and 3 can't reach an accepting state
        let mut builder = DfaBuilder::new(2, &0);
        builder
            .add_transition(&0, 1, &1)
            .add_transition(&0, 2, &2)
            .add_transition(&2, 2, &3)
            .add_transition(&3, 2, &2)
            .mark_accepting(&1);
        let dfa = builder.build();
        for strategy in [Strategy::Hopcroft, Strategy::Moore] {
            let minimal = dfa.minimized(strategy);
            assert_eq!(minimal.num_states(), 2);
            assert!(minimal.initial_state().successor(2).is_none());
            assert!(minimal.accepts(&[1]));
            assert!(!minimal.accepts(&[2]));
        }
    }

    #[test]
    fn test_canonical_numbering() {
        // same language (a b*), states listed in different orders
        let mut b1 = DfaBuilder::new(2, &0);
        b1.add_transition(&0, 1, &1)
            .add_transition(&1, 2, &2)
            .add_transition(&2, 2, &1)
            .mark_accepting(&1)
            .mark_accepting(&2);
        let mut b2 = DfaBuilder::new(2, &"init");
        b2.add_transition(&"z", 2, &"z")
            .add_transition(&"init", 1, &"z")
            .mark_accepting(&"z");

        let m1 = b1.build().minimized(Strategy::Moore);
        let m2 = b2.build().minimized(Strategy::Hopcroft);
        assert_eq!(m1, m2);
        assert_eq!(m1.num_states(), 2);
    }

    #[test]
    fn test_idempotent() {
        let mut builder = DfaBuilder::new(3, &0);
        for (source, label, dest) in &graph() {
            builder.add_transition(source, *label, dest);
        }
        builder.mark_accepting(&3);
        let once = builder.build().minimized(Strategy::Hopcroft);
        let twice = once.minimized(Strategy::Hopcroft);
        assert_eq!(once, twice);
        assert_eq!(once.minimized(Strategy::Moore), twice);
    }
}
