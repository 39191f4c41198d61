// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! State equivalence for deterministic automata
//!
//! Two algorithms compute the coarsest partition of the states such that
//! equivalent states agree on acceptance and move to equivalent states on
//! every symbol:
//! - [Minimizer] implements Hopcroft's algorithm
//! - [refine_by_passes] implements Moore's algorithm: refinement passes over
//!   the whole alphabet until a pass changes nothing
//!
//! Both take the automaton as a total transition function on integers:
//! states are [0 .. N-1] and symbols are [0 .. M-1].
//!

use std::fmt::Display;

use crate::{
    fast_sets::FastSet,
    partitions::{BasePartition, Partition},
};

//
// The automaton is defined by
// - a finite set of states S
// - an alphabet A
// - a transition function delta: S x A -> S
// - a set of accepting states F
//
// Refinement
// ----------
// - maintain a partition of S into disjoint blocks
// - initially, there are two blocks: F and S-F
// - refine the partition until:
//     for any pair of blocks (B, D) and any symbol c,
//     either delta(D, c) is included in B
//     or delta(D, c) and B are disjoint
//   where delta(D, c) is { delta(s, c) | s in D }.
// - if B, c, and D violate this condition, split D into
//       D1 = { s in D | delta(s, c) is in B }
//       D2 = { s in D | delta(s, c) is not in B }
//
// Hopcroft's algorithm
// --------------------
// Maintain a set of pairs (B, c) called splitters.
// - initially: all pairs (B, c) where B is the smaller of F and S-F.
//
// Refinement step:
// - pick a splitter (B, c)
// - let pred(B, c) = { s in S | delta(s, c) is in B }
// - for each block D that intersects pred(B, c):
//      D1 = { s in D | delta(s, c) in B }
//      D2 = { s in D | delta(s, c) not in B }
//   D1 is non-empty by construction. If D2 is non-empty:
//   1) replace D with D1 and D2 in the partition
//   2) for every symbol a:
//      - if (D, a) is a splitter, replace it with (D1, a) and (D2, a)
//      - otherwise add (D', a) where D' is the smaller of D1 and D2
//
// Stop when there are no splitters left.
//
// Data structures
// ----------------
// - main_partition is the partition of [0 .. N-1]
// - for every symbol c, pred_classes[c] is another partition of [0 .. N-1]:
//   each block of pred_classes[c] is pred(B, c) for a block B of the main partition.
// - for every block B of the main partition, we keep all triples (B, c, cid)
//   where cid is the id of the block pred(B, c) in pred_classes[c] and cid is
//   not empty.
// - each triple has an active flag: the splitter set is the set of active triples
//

#[derive(Debug, Clone, PartialEq, Eq)]
struct Splitter {
    block: u32,  // block id for B in the main partition,
    symbol: u32, // symbol c
    class: u32,  // block id for pred(B, c) in pred_classes[c]
    active: bool,
}

impl Display for Splitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = if self.active { "active" } else { "inactive" };
        write!(
            f,
            "pred(block {}, symbol {}) = class {} ({flag})",
            self.block, self.symbol, self.class
        )
    }
}

#[derive(Debug, Clone)]
struct SplitterItem {
    symbol: u32,
    class: u32,
    active: bool,
}

impl SplitterItem {
    fn to_splitter(&self, block: u32) -> Splitter {
        Splitter {
            block,
            symbol: self.symbol,
            class: self.class,
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SymbolClassPair {
    symbol: u32,
    class: u32,
}

//
// Splitters of one block
// - pairs for active splitters come first: list[0 .. num_active-1]
// - pairs for inactive splitters are in list[num_active ..]
//
#[derive(Debug, Clone, Default)]
struct SplitterList {
    num_active: usize,
    list: Vec<SymbolClassPair>,
}

impl SplitterList {
    fn add(&mut self, symbol: u32, class: u32, active: bool) {
        let i = self.list.len();
        self.list.push(SymbolClassPair { symbol, class });
        if active {
            self.list.swap(self.num_active, i);
            self.num_active += 1;
        }
    }

    fn pick_active(&mut self) -> SymbolClassPair {
        debug_assert!(self.num_active > 0);
        self.num_active -= 1;
        self.list[self.num_active]
    }

    fn has_active_items(&self) -> bool {
        self.num_active > 0
    }

    fn items(&self) -> impl Iterator<Item = SplitterItem> + '_ {
        self.list.iter().enumerate().map(|(i, pair)| SplitterItem {
            symbol: pair.symbol,
            class: pair.class,
            active: i < self.num_active,
        })
    }
}

// For every block b: list[b] = splitters for b
// active_block = block of the last picked splitter
#[derive(Debug, Clone)]
struct SplitterSet {
    list: Vec<SplitterList>,
    active_block: usize,
}

impl SplitterSet {
    fn new() -> SplitterSet {
        SplitterSet {
            list: Vec::with_capacity(8),
            active_block: 0,
        }
    }

    fn take_list(&mut self, b: u32) -> SplitterList {
        self.list
            .get_mut(b as usize)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    fn add_splitter(&mut self, s: &Splitter) {
        let b = s.block as usize;
        if self.list.len() <= b {
            self.list.resize_with(b + 1, Default::default);
        }
        self.list[b].add(s.symbol, s.class, s.active)
    }

    // Find a block with an active splitter, starting with the last one used.
    fn find_active_block(&mut self) -> Option<usize> {
        let b = self.active_block;
        if self.list.get(b).is_some_and(|l| l.has_active_items()) {
            return Some(b);
        }
        let b = self.list.iter().position(|l| l.has_active_items())?;
        self.active_block = b;
        Some(b)
    }

    // Pick an active splitter and make it inactive
    fn pick_splitter(&mut self) -> Option<Splitter> {
        let b = self.find_active_block()?;
        let pair = self.list[b].pick_active();
        Some(Splitter {
            block: b as u32,
            symbol: pair.symbol,
            class: pair.class,
            active: false,
        })
    }

    fn iter(&self) -> impl Iterator<Item = &SplitterList> {
        self.list.iter()
    }
}

///
/// Hopcroft's partition refinement
///
/// - delta(s, c) is the successor of state s via symbol c. It must be defined
///   for all states in [0 .. num_states-1] and symbols in [0 .. num_symbols-1].
/// - is_final(s) is true if s is an accepting state.
///
#[derive(Debug, Clone)]
pub struct Minimizer<D, F> {
    // Automaton
    num_states: u32,
    num_symbols: u32,
    delta: D,
    is_final: F,
    // Partitions
    main_partition: Partition,
    pred_classes: Box<[BasePartition]>,
    // Splitters
    splitters: SplitterSet,
}

impl<D, F> Display for Minimizer<D, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Minimizer: {} states, {} symbols",
            self.num_states, self.num_symbols
        )?;
        writeln!(f, "main partition")?;
        write!(f, "{}", self.main_partition)?;
        writeln!(f, "splitters")?;
        for (i, l) in self.splitters.iter().enumerate() {
            for s in l.items() {
                writeln!(f, "  {}", s.to_splitter(i as u32))?;
            }
        }
        Ok(())
    }
}

impl<D, F> Minimizer<D, F>
where
    D: Fn(u32, u32) -> u32,
    F: Fn(u32) -> bool,
{
    //
    // Update the splitter lists after block i was split into (i, j)
    //
    fn update_splitters_after_refinement(&mut self, i: u32, j: u32) {
        let main = &self.main_partition;
        let delta = &self.delta;

        let old_splitters = self.splitters.take_list(i);
        for s in old_splitters.items() {
            // pred(i, c) is not empty
            debug_assert!(s.class != 0);
            let c = s.symbol;

            // split pred(old block i, c) into pred(i, c) and pred(j, c)
            let p = &mut self.pred_classes[c as usize];
            let (class1, class2) =
                p.refine_block(s.class, |x| main.block_id(delta(x, c)) == i);

            // both new splitters are active if s is active,
            // otherwise only the smaller one is
            let (active1, active2) = if s.active {
                (true, true)
            } else if p.smaller_block(class1, class2) {
                (true, false)
            } else {
                (false, true)
            };

            if class1 != 0 {
                self.splitters.add_splitter(&Splitter {
                    block: i,
                    symbol: c,
                    class: class1,
                    active: active1,
                });
            }
            if class2 != 0 {
                self.splitters.add_splitter(&Splitter {
                    block: j,
                    symbol: c,
                    class: class2,
                    active: active2,
                });
            }
        }
    }

    //
    // Split the main partition into accepting and non-accepting states
    //
    fn init_main_partition(&mut self) {
        debug_assert_eq!(self.main_partition.num_blocks(), 2);
        // if all states are accepting or none is, there's nothing to refine
        let (i, j) = self.main_partition.refine_block(1, &self.is_final);
        if i != 0 && j != 0 {
            // i = accepting states, j = non-accepting states
            self.update_splitters_after_refinement(i, j);
        }
    }

    //
    // Collect the non-singleton blocks that intersect pred(s.block, s.symbol)
    //
    fn collect_refinement_candidates(&self, s: &Splitter, set: &mut FastSet) {
        set.reset();
        let p = &self.pred_classes[s.symbol as usize];
        for x in p.block_elements(s.class) {
            let b = self.main_partition.block_id(x);
            if self.main_partition.block_size(b) > 1 {
                set.insert(b)
            }
        }
    }

    //
    // Split block b with splitter s, and update the splitters if b changes.
    //
    // If b == s.block, this modifies s.block, so s.block must be
    // refined last.
    //
    fn refine_block_with_splitter(&mut self, s: &Splitter, b: u32) {
        let delta = &self.delta;
        let (i, j) = self
            .main_partition
            .refine_block_with_fun(b, |x| delta(x, s.symbol), s.block);
        debug_assert!(i != 0);
        if j != 0 {
            debug_assert_eq!(i, b);
            self.update_splitters_after_refinement(i, j)
        }
    }

    fn refine_with_splitter(&mut self, s: &Splitter, set: &mut FastSet) {
        self.collect_refinement_candidates(s, set);
        let self_refine = set.contains(s.block);
        if self_refine {
            set.remove(s.block);
        }
        let candidates: Vec<u32> = set.iter().collect();
        for b in candidates {
            self.refine_block_with_splitter(s, b)
        }
        if self_refine {
            self.refine_block_with_splitter(s, s.block)
        }
    }

    ///
    /// Create a minimizer
    /// - the initial partition separates accepting and non-accepting states
    ///
    pub fn new(num_states: u32, num_symbols: u32, delta: D, is_final: F) -> Self {
        let pred_classes = (0..num_symbols)
            .map(|_| BasePartition::new(num_states))
            .collect();
        let mut splitters = SplitterSet::new();
        if num_states > 0 {
            for c in 0..num_symbols {
                splitters.add_splitter(&Splitter {
                    block: 1,
                    symbol: c,
                    class: 1,
                    active: false,
                });
            }
        }
        let mut m = Minimizer {
            num_states,
            num_symbols,
            delta,
            is_final,
            main_partition: Partition::new(num_states),
            pred_classes,
            splitters,
        };
        if num_states > 0 {
            m.init_main_partition();
        }
        m
    }

    ///
    /// Refine the partition until fix point
    /// - return the result: block i of the partition is a class of equivalent states
    ///
    pub fn refine(&mut self) -> &Partition {
        log::trace!("{self}");
        let set = &mut FastSet::new(self.num_states + 1);
        let mut rounds = 0;
        while self.main_partition.index() < self.num_states {
            match self.splitters.pick_splitter() {
                Some(s) => {
                    rounds += 1;
                    log::trace!("round {rounds}: {s}");
                    self.refine_with_splitter(&s, set);
                }
                None => break,
            }
        }
        log::trace!(
            "Hopcroft: {} classes after {rounds} rounds\n{}",
            self.main_partition.index(),
            self.main_partition
        );
        &self.main_partition
    }
}

///
/// Moore's partition refinement
///
/// Same inputs as [Minimizer::new]. Each pass splits every block according to
/// the block reached by each symbol. Refinement stops after a pass that doesn't
/// split anything.
///
pub fn refine_by_passes<D, F>(num_states: u32, num_symbols: u32, delta: D, is_final: F) -> Partition
where
    D: Fn(u32, u32) -> u32,
    F: Fn(u32) -> bool,
{
    let mut p = Partition::new(num_states);
    if num_states == 0 {
        return p;
    }
    p.refine_block(1, &is_final);
    let mut pass = 0;
    loop {
        pass += 1;
        let before = p.index();
        for c in 0..num_symbols {
            // blocks created in this loop are visited too
            let mut b = 1;
            while b < p.num_blocks() {
                let target = p.block_id(delta(p.pick_element(b), c));
                p.refine_block_with_fun(b, |x| delta(x, c), target);
                b += 1;
            }
        }
        log::trace!("Moore: pass {pass}, {} classes", p.index());
        if p.index() == before {
            return p;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // classes of the partition as sorted lists, sorted by first element
    fn classes(p: &Partition) -> Vec<Vec<u32>> {
        let mut result: Vec<Vec<u32>> = (1..p.num_blocks())
            .map(|b| {
                let mut v: Vec<_> = p.block_elements(b).collect();
                v.sort_unstable();
                v
            })
            .collect();
        result.sort();
        result
    }

    fn both(
        num_states: u32,
        num_symbols: u32,
        delta: impl Fn(u32, u32) -> u32 + Copy,
        is_final: impl Fn(u32) -> bool + Copy,
    ) -> Vec<Vec<u32>> {
        let mut m = Minimizer::new(num_states, num_symbols, delta, is_final);
        let hopcroft = classes(m.refine());
        let moore = classes(&refine_by_passes(num_states, num_symbols, delta, is_final));
        assert_eq!(hopcroft, moore);
        hopcroft
    }

    #[test]
    fn test_counter_mod_six() {
        // states count symbols mod 6, accepting iff count is 0 mod 3
        let delta = |s: u32, _c: u32| (s + 1) % 6;
        let is_final = |s: u32| s % 3 == 0;
        let result = both(6, 1, delta, is_final);
        println!("{result:?}");
        assert_eq!(result, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn test_textbook() {
        // (a|b)*abb from the subset construction, plus sink 5
        // states A=0 B=1 C=2 D=3 E=4, symbols a=0 b=1
        let table: [[u32; 2]; 6] = [[1, 2], [1, 3], [1, 2], [1, 4], [1, 2], [5, 5]];
        let delta = |s: u32, c: u32| table[s as usize][c as usize];
        let is_final = |s: u32| s == 4;
        let result = both(6, 2, delta, is_final);
        assert_eq!(result, vec![vec![0, 2], vec![1], vec![3], vec![4], vec![5]]);
    }

    #[test]
    fn test_no_accepting_state() {
        let delta = |s: u32, c: u32| (s + c) % 4;
        let result = both(4, 2, delta, |_| false);
        assert_eq!(result, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_all_distinct() {
        // a chain: 0 -> 1 -> 2 -> 3 -> 3, only 3 is accepting
        let delta = |s: u32, _c: u32| (s + 1).min(3);
        let result = both(4, 1, delta, |s| s == 3);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_no_symbols() {
        let result = both(3, 0, |s, _| s, |s| s == 1);
        assert_eq!(result, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn test_display() {
        let delta = |s: u32, _c: u32| (s + 1) % 3;
        let m = Minimizer::new(3, 1, delta, |s| s == 0);
        let text = m.to_string();
        println!("{text}");
        assert!(text.starts_with("Minimizer: 3 states, 1 symbols"));
    }
}
