// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Work queue for breadth-first state discovery
//!

use std::{
    collections::{HashSet, VecDeque},
    hash::Hash,
};

///
/// Queue that remembers everything ever pushed
/// - push adds an element at the back unless it's been pushed before
/// - pop takes the element at the front
///
/// Subset construction uses it with sets of NFA states, and canonical
/// renumbering with DFA state ids.
///
#[derive(Debug)]
pub struct BfsQueue<T> {
    queue: VecDeque<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> BfsQueue<T> {
    /// Empty queue
    pub fn new() -> Self {
        BfsQueue {
            queue: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    ///
    /// Add element at the back of the queue if it's new
    /// - return true if element was never pushed before
    ///
    pub fn push(&mut self, element: T) -> bool {
        if self.seen.insert(element.clone()) {
            self.queue.push_back(element);
            true
        } else {
            false
        }
    }

    /// Remove the element at the front
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// Number of distinct elements pushed so far
    pub fn num_seen(&self) -> usize {
        self.seen.len()
    }
}

impl<T: Eq + Hash + Clone> Default for BfsQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
