// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Partitions of a set of states [0 .. N-1]
//!
//! Minimization starts from a coarse partition of the states and splits blocks
//! until all states in a block are equivalent.
//!

use std::{fmt::Display, ops::Range};

// Representation:
// - elements is a permutation of [0 .. N-1]
// - every block is a contiguous range in elements
// - block 0 is the empty block. It's used as the "no block" answer when
//   a refinement leaves one side empty.
// - all other blocks are non-empty
//
// Splitting a block reorders its range in place and shrinks it. The removed
// part becomes a new block at the end of the block list, so existing block
// ids never change.

///
/// Partition without element-to-block map
///
#[derive(Debug, Clone)]
pub struct BasePartition {
    elements: Box<[u32]>,
    blocks: Vec<Range<usize>>,
}

///
/// Partition that also maps every element to its block id
///
#[derive(Debug, Clone)]
pub struct Partition {
    base: BasePartition,
    block_of: Box<[u32]>,
}

impl BasePartition {
    ///
    /// Partition of [0 .. n-1] with a single block (id 1)
    /// - if n == 0, there's only the empty block
    ///
    pub fn new(n: u32) -> Self {
        let mut blocks = vec![0..0];
        if n > 0 {
            blocks.push(0..n as usize);
        }
        BasePartition {
            elements: (0..n).collect(),
            blocks,
        }
    }

    /// Number of blocks, including the empty block
    pub fn num_blocks(&self) -> u32 {
        self.blocks.len() as u32
    }

    /// Number of non-empty blocks
    pub fn index(&self) -> u32 {
        self.num_blocks() - 1
    }

    /// Size of block i
    pub fn block_size(&self, i: u32) -> u32 {
        self.blocks[i as usize].len() as u32
    }

    /// Check whether block i is no larger than block j
    pub fn smaller_block(&self, i: u32, j: u32) -> bool {
        self.block_size(i) <= self.block_size(j)
    }

    /// Elements of block i
    pub fn block_elements(&self, i: u32) -> impl Iterator<Item = u32> + '_ {
        self.elements[self.blocks[i as usize].clone()].iter().copied()
    }

    ///
    /// Some element of block i
    /// - i must not be 0
    ///
    pub fn pick_element(&self, i: u32) -> u32 {
        assert!(i > 0, "the empty block has no element");
        self.elements[self.blocks[i as usize].start]
    }

    ///
    /// Split block i according to predicate p
    ///
    /// Elements that satisfy p stay in block i. The others move to a new block.
    /// The result is the pair (id of the p-part, id of the other part):
    /// - (i, j) with j a new block if both parts are non-empty
    /// - (i, 0) if all elements satisfy p
    /// - (0, i) if none does
    ///
    pub fn refine_block<P>(&mut self, i: u32, p: P) -> (u32, u32)
    where
        P: Fn(u32) -> bool,
    {
        let range = self.blocks[i as usize].clone();
        let slice = &mut self.elements[range.clone()];
        let mut k = 0;
        for x in 0..slice.len() {
            if p(slice[x]) {
                slice.swap(k, x);
                k += 1;
            }
        }
        if k == 0 {
            (0, i)
        } else if k == slice.len() {
            (i, 0)
        } else {
            let split = range.start + k;
            self.blocks[i as usize].end = split;
            self.blocks.push(split..range.end);
            (i, self.num_blocks() - 1)
        }
    }
}

impl Partition {
    /// Partition of [0 .. n-1] with a single block (id 1)
    pub fn new(n: u32) -> Self {
        Partition {
            base: BasePartition::new(n),
            block_of: vec![1; n as usize].into(),
        }
    }

    /// Number of blocks, including the empty block
    pub fn num_blocks(&self) -> u32 {
        self.base.num_blocks()
    }

    /// Number of non-empty blocks
    pub fn index(&self) -> u32 {
        self.base.index()
    }

    /// Size of block i
    pub fn block_size(&self, i: u32) -> u32 {
        self.base.block_size(i)
    }

    /// Elements of block i
    pub fn block_elements(&self, i: u32) -> impl Iterator<Item = u32> + '_ {
        self.base.block_elements(i)
    }

    /// Some element of block i (i must not be 0)
    pub fn pick_element(&self, i: u32) -> u32 {
        self.base.pick_element(i)
    }

    /// Id of the block that contains x
    pub fn block_id(&self, x: u32) -> u32 {
        self.block_of[x as usize]
    }

    // after a split: record the new block of the moved elements
    fn relabel(&mut self, split: (u32, u32)) -> (u32, u32) {
        let (b1, b2) = split;
        if b1 != 0 && b2 != 0 {
            for x in self.base.block_elements(b2) {
                self.block_of[x as usize] = b2;
            }
        }
        split
    }

    ///
    /// Split block i according to predicate p
    ///
    /// Same result as [BasePartition::refine_block].
    ///
    pub fn refine_block<P>(&mut self, i: u32, p: P) -> (u32, u32)
    where
        P: Fn(u32) -> bool,
    {
        let split = self.base.refine_block(i, p);
        self.relabel(split)
    }

    ///
    /// Split block i into the elements x such that f(x) is in block b and the others
    ///
    /// Block membership is read before the split, so i == b is allowed. The result
    /// is as in [BasePartition::refine_block].
    ///
    pub fn refine_block_with_fun<F>(&mut self, i: u32, f: F, b: u32) -> (u32, u32)
    where
        F: Fn(u32) -> u32,
    {
        let block_of = &self.block_of;
        let split = self.base.refine_block(i, |x| block_of[f(x) as usize] == b);
        self.relabel(split)
    }
}

impl Display for BasePartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 1..self.num_blocks() {
            write!(f, "block[{i}]:")?;
            for x in self.block_elements(i) {
                write!(f, " {x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 1..self.num_blocks() {
            let elements: Vec<String> = self.block_elements(i).map(|x| x.to_string()).collect();
            writeln!(f, "block[{i}]: {}", elements.join(" "))?;
        }
        Ok(())
    }
}
