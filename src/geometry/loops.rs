// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Collection of undirected closed loops
//!
//! A loop has neither a start element nor a direction, so `[A B C D]`,
//! `[C D A B]` and `[C B A D]` all describe the same loop and are stored once.

/// Set of cyclic sequences, unique up to rotation and reversal
#[derive(Debug, Clone)]
pub struct UniqueLoopCollection<T> {
    loops: Vec<Vec<T>>,
}

impl<T: PartialEq + Clone> UniqueLoopCollection<T> {
    pub fn new() -> Self {
        Self { loops: Vec::new() }
    }

    /// Store `sequence` unless an equal loop is already present.
    /// Returns true when the loop was added.
    pub fn add_loop(&mut self, sequence: &[T]) -> bool {
        if self.contains(sequence) {
            return false;
        }
        self.loops.push(sequence.to_vec());
        true
    }

    pub fn contains(&self, sequence: &[T]) -> bool {
        self.loops.iter().any(|stored| equal_loops(stored, sequence))
    }

    pub fn loops(&self) -> &[Vec<T>] {
        &self.loops
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.loops.iter().map(|l| l.as_slice())
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn clear(&mut self) {
        self.loops.clear();
    }
}

impl<T: PartialEq + Clone> Default for UniqueLoopCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Loop equality: `b` is a rotation of `a`, or a rotation of `a` reversed.
///
/// All `2 * len` alignments are checked.
pub fn equal_loops<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    let n = a.len();
    if n != b.len() {
        return false;
    }
    if n == 0 {
        return true;
    }

    (0..n).any(|shift| {
        let forward = (0..n).all(|i| a[(i + shift) % n] == b[i]);
        // a reversed then rotated by `shift`
        let backward = (0..n).all(|i| a[(shift + n - i) % n] == b[i]);
        forward || backward
    })
}
