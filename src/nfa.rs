// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Nondeterministic finite-state automata (Thompson construction)
//!
//! An NFA is built bottom-up from [Fragment]s. A fragment owns an array of
//! states and has at most one *dangling exit*: a pair (state, symbol) for a
//! transition whose target is not known yet. The combinators consume their
//! operands and splice their state arrays into the result, so a state is
//! owned by exactly one fragment at any time.
//!
//! All references between states are indices into the owning array. When a
//! fragment is appended to another one, its indices are shifted by the
//! length of the receiving array.
//!
//! The initial state of a non-empty fragment is always state 0.
//!

use std::fmt::Display;

use crate::{
    alphabet::EPSILON,
    determinizer::{epsilon_closure, move_set, StateSet},
    parser::Ast,
};

/// Index of a state in an NFA
pub type StateId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    symbol: usize,
    target: StateId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NfaState {
    transitions: Vec<Transition>,
}

// Transition from state with a known label but no target yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Exit {
    state: StateId,
    symbol: usize,
}

impl Exit {
    fn shift(self, offset: usize) -> Exit {
        Exit {
            state: self.state + offset,
            symbol: self.symbol,
        }
    }
}

///
/// Partially constructed NFA
///
/// A fragment with no exit is the empty fragment. It's the identity for
/// [concatenate](Fragment::concatenate) and [alternate](Fragment::alternate).
///
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    states: Vec<NfaState>,
    exit: Option<Exit>,
}

impl Fragment {
    /// The empty fragment
    pub fn empty() -> Self {
        Fragment {
            states: Vec::new(),
            exit: None,
        }
    }

    /// Check whether this is the empty fragment
    pub fn is_empty(&self) -> bool {
        self.exit.is_none()
    }

    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    // add a fresh state and return its index
    fn add_state(&mut self) -> StateId {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    fn attach(&mut self, from: StateId, symbol: usize, target: StateId) {
        self.states[from].transitions.push(Transition { symbol, target });
    }

    // wire a dangling exit to target
    fn connect(&mut self, exit: Exit, target: StateId) {
        self.attach(exit.state, exit.symbol, target);
    }

    //
    // Move all states of other at the end of self.states
    // - return the offset added to other's indices
    // - other's exit is dropped: the caller must get it first
    //
    fn append(&mut self, other: Fragment) -> usize {
        let offset = self.states.len();
        self.states.reserve(other.states.len());
        for mut s in other.states {
            for t in s.transitions.iter_mut() {
                t.target += offset;
            }
            self.states.push(s);
        }
        offset
    }

    ///
    /// Single state whose exit is labeled by symbol
    ///
    pub fn atom(symbol: usize) -> Self {
        debug_assert!(symbol != EPSILON);
        Fragment {
            states: vec![NfaState::default()],
            exit: Some(Exit { state: 0, symbol }),
        }
    }

    ///
    /// Concatenation: a's exit goes to b's initial state
    ///
    pub fn concatenate(a: Fragment, b: Fragment) -> Self {
        let (a_exit, b_exit) = match (a.exit, b.exit) {
            (_, None) => return a,
            (None, _) => return b,
            (Some(x), Some(y)) => (x, y),
        };
        let mut result = a;
        let offset = result.append(b);
        result.connect(a_exit, offset);
        result.exit = Some(b_exit.shift(offset));
        result
    }

    ///
    /// Alternation
    /// - a new split state has epsilon transitions to a's and b's initial states
    /// - both exits go to a new join state
    /// - the exit of the result is an epsilon transition from join
    ///
    pub fn alternate(a: Fragment, b: Fragment) -> Self {
        let (a_exit, b_exit) = match (a.exit, b.exit) {
            (_, None) => return a,
            (None, _) => return b,
            (Some(x), Some(y)) => (x, y),
        };
        let mut result = Fragment::empty();
        let split = result.add_state();
        let a_offset = result.append(a);
        let b_offset = result.append(b);
        let join = result.add_state();
        result.attach(split, EPSILON, a_offset);
        result.attach(split, EPSILON, b_offset);
        result.connect(a_exit.shift(a_offset), join);
        result.connect(b_exit.shift(b_offset), join);
        result.exit = Some(Exit {
            state: join,
            symbol: EPSILON,
        });
        result
    }

    ///
    /// Kleene star
    /// - a new hub state is both the initial state and the exit
    /// - hub has an epsilon transition to a's initial state
    /// - a's exit goes back to hub
    ///
    pub fn star(a: Fragment) -> Self {
        let a_exit = match a.exit {
            None => return a,
            Some(x) => x,
        };
        let mut result = Fragment::empty();
        let hub = result.add_state();
        let offset = result.append(a);
        result.attach(hub, EPSILON, offset);
        result.connect(a_exit.shift(offset), hub);
        result.exit = Some(Exit {
            state: hub,
            symbol: EPSILON,
        });
        result
    }

    ///
    /// One or more repetitions
    /// - a new entry state has an epsilon transition to a's initial state
    /// - a's exit goes to a new loop state
    /// - the loop state has an epsilon transition back to entry and is the exit
    ///
    pub fn plus(a: Fragment) -> Self {
        let a_exit = match a.exit {
            None => return a,
            Some(x) => x,
        };
        let mut result = Fragment::empty();
        let entry = result.add_state();
        let offset = result.append(a);
        let back = result.add_state();
        result.attach(entry, EPSILON, offset);
        result.connect(a_exit.shift(offset), back);
        result.attach(back, EPSILON, entry);
        result.exit = Some(Exit {
            state: back,
            symbol: EPSILON,
        });
        result
    }

    ///
    /// Complete the construction: add an accepting state and
    /// wire the exit to it.
    ///
    /// # Panics
    ///
    /// If the fragment is empty.
    ///
    pub fn finalize(self) -> Nfa {
        let exit = match self.exit {
            Some(x) => x,
            None => panic!("cannot finalize the empty fragment"),
        };
        let mut result = self;
        let accepting = result.add_state();
        result.connect(exit, accepting);
        Nfa {
            states: result.states.into_boxed_slice(),
            accepting,
        }
    }

    ///
    /// Fragment for a syntax tree
    /// - alphabet_index maps a literal to its symbol index
    ///
    pub fn from_ast<F>(ast: &Ast, alphabet_index: &F) -> Self
    where
        F: Fn(char) -> usize,
    {
        // post-order walk with an explicit stack: trees can be as deep as
        // the pattern is long
        enum Step<'a> {
            Visit(&'a Ast),
            Concat,
            Alternate,
            Star,
        }

        fn operand(done: &mut Vec<Fragment>) -> Fragment {
            match done.pop() {
                Some(f) => f,
                None => unreachable!("missing operand in syntax tree walk"),
            }
        }

        let mut todo = vec![Step::Visit(ast)];
        let mut done: Vec<Fragment> = Vec::new();
        while let Some(step) = todo.pop() {
            match step {
                Step::Visit(Ast::Literal(c)) => done.push(Fragment::atom(alphabet_index(*c))),
                Step::Visit(Ast::Concat(l, r)) => {
                    todo.extend([Step::Concat, Step::Visit(r), Step::Visit(l)])
                }
                Step::Visit(Ast::Alternate(l, r)) => {
                    todo.extend([Step::Alternate, Step::Visit(r), Step::Visit(l)])
                }
                Step::Visit(Ast::Star(r)) => todo.extend([Step::Star, Step::Visit(r)]),
                Step::Concat => {
                    let b = operand(&mut done);
                    let a = operand(&mut done);
                    done.push(Fragment::concatenate(a, b));
                }
                Step::Alternate => {
                    let b = operand(&mut done);
                    let a = operand(&mut done);
                    done.push(Fragment::alternate(a, b));
                }
                Step::Star => {
                    let a = operand(&mut done);
                    done.push(Fragment::star(a));
                }
            }
        }
        operand(&mut done)
    }
}

///
/// Finalized NFA
/// - state 0 is the initial state
/// - exactly one state is accepting
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    states: Box<[NfaState]>,
    accepting: StateId,
}

impl Nfa {
    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Initial state
    pub fn initial_state(&self) -> StateId {
        0
    }

    /// The accepting state
    pub fn accepting_state(&self) -> StateId {
        self.accepting
    }

    /// Targets of all transitions from s labeled by symbol
    pub fn successors(&self, s: StateId, symbol: usize) -> impl Iterator<Item = StateId> + '_ {
        self.states[s]
            .transitions
            .iter()
            .filter(move |t| t.symbol == symbol)
            .map(|t| t.target)
    }

    /// Check whether a set of states contains the accepting state
    pub fn is_accepting(&self, set: &StateSet) -> bool {
        set.contains(self.accepting)
    }

    /// Epsilon-closure of the initial state
    pub fn initial_set(&self) -> StateSet {
        let mut set = StateSet::new(self.num_states());
        set.insert(self.initial_state());
        epsilon_closure(self, &mut set);
        set
    }

    ///
    /// Check whether the NFA accepts a sequence of symbol indices
    ///
    /// This simulates the NFA directly on sets of states.
    ///
    pub fn accepts(&self, input: &[usize]) -> bool {
        let mut current = self.initial_set();
        for &symbol in input {
            current = move_set(self, &current, symbol);
            if current.is_empty() {
                return false;
            }
        }
        self.is_accepting(&current)
    }
}

impl Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} states", self.num_states())?;
        writeln!(f, "accepting state: n{}", self.accepting)?;
        for (i, s) in self.states.iter().enumerate() {
            for t in &s.transitions {
                if t.symbol == EPSILON {
                    writeln!(f, "  n{i} --\u{03B5}--> n{}", t.target)?;
                } else {
                    writeln!(f, "  n{i} --{}--> n{}", t.symbol, t.target)?;
                }
            }
        }
        Ok(())
    }
}
