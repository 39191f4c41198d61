// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Sparse sets of block ids
//!
//! The minimizer collects the blocks touched by a splitter, once per splitter.
//! A sparse set can be cleared in constant time so the same set is reused.
//!

use std::fmt::Display;

///
/// Set of integers in [0 .. N-1] with constant-time insert, remove, and reset
///
// x is in the set iff index[x] < len and dense[index[x]] == x
#[derive(Debug)]
pub struct FastSet {
    len: u32,
    index: Box<[u32]>,
    dense: Box<[u32]>,
}

impl FastSet {
    /// Empty set for elements in [0 .. n-1]
    pub fn new(n: u32) -> Self {
        FastSet {
            len: 0,
            index: vec![0; n as usize].into(),
            dense: vec![0; n as usize].into(),
        }
    }

    /// Check whether x is in the set
    pub fn contains(&self, x: u32) -> bool {
        let i = self.index[x as usize];
        i < self.len && self.dense[i as usize] == x
    }

    /// Add x to the set
    pub fn insert(&mut self, x: u32) {
        if !self.contains(x) {
            self.index[x as usize] = self.len;
            self.dense[self.len as usize] = x;
            self.len += 1;
        }
    }

    /// Remove x from the set
    pub fn remove(&mut self, x: u32) {
        if self.contains(x) {
            // move the last element into x's slot
            let i = self.index[x as usize];
            self.len -= 1;
            let last = self.dense[self.len as usize];
            self.dense[i as usize] = last;
            self.index[last as usize] = i;
        }
    }

    /// Remove all elements
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Elements in insertion order (until the first removal)
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.dense[..self.len as usize].iter().copied()
    }
}

impl Display for FastSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for x in self.iter() {
            write!(f, " {x}")?;
        }
        write!(f, " }}")
    }
}
