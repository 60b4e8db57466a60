// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The seam selector and extractor.
//!
//! Picks a minimum-cost column on the bottom row of the cost field --
//! uniformly at random among ties, via an injected `SeamRng` -- and walks
//! the parent table back up to the top row to materialize the seam. This
//! randomness is deliberate: breaking top-row ties deterministically makes
//! seams bunch up on flat regions, which then biases subsequent frames
//! through the temporal term and produces a visible "zipper" artifact.

use crate::cost::{CostField, ParentTable};

/// An injected source of randomness, so tests can supply a deterministic
/// stub instead of a real generator. `choice(n)` must return a value in
/// `[0, n)`.
pub trait SeamRng {
    /// Return a uniformly random index in `[0, n)`.
    fn choice(&mut self, n: usize) -> usize;
}

/// Production `SeamRng` backed by `rand`.
pub struct SystemRng(rand::rngs::StdRng);

impl SystemRng {
    /// A generator seeded from the OS entropy source.
    pub fn new() -> Self {
        use rand::SeedableRng;
        SystemRng(rand::rngs::StdRng::from_entropy())
    }

    /// A generator seeded explicitly, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        SystemRng(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl SeamRng for SystemRng {
    fn choice(&mut self, n: usize) -> usize {
        use rand::Rng;
        self.0.gen_range(0..n)
    }
}

/// Given a cost field and parent table, choose a seam: a minimum-cost
/// bottom-row column, broken uniformly at random among ties, then
/// backtracked to a full length-H column sequence.
pub fn select_and_extract(
    cost: &CostField,
    parents: &ParentTable,
    rng: &mut dyn SeamRng,
) -> Vec<u32> {
    let (width, height) = (cost.width, cost.height);
    let bottom = height - 1;

    let min_cost = (0..width).map(|x| cost[(x, bottom)]).min().expect("frame has zero width");
    let ties: Vec<u32> = (0..width).filter(|&x| cost[(x, bottom)] == min_cost).collect();

    let mut col = if ties.len() == 1 {
        ties[0]
    } else {
        ties[rng.choice(ties.len())]
    };

    let mut seam = vec![0u32; height as usize];
    seam[bottom as usize] = col;
    for y in (1..height).rev() {
        let offset = parents[(col, y)] as i32;
        col = (col as i32 + offset) as u32;
        seam[(y - 1) as usize] = col;
    }
    seam
}

/// A stub generator that always returns a fixed index (or cycles through a
/// fixed sequence), for deterministic tests.
#[cfg(any(test, feature = "testkit"))]
pub struct StubRng {
    sequence: Vec<usize>,
    pos: usize,
}

#[cfg(any(test, feature = "testkit"))]
impl StubRng {
    /// Always resolve `choice` to `index % n`.
    pub fn always(index: usize) -> Self {
        StubRng { sequence: vec![index], pos: 0 }
    }

    /// Cycle through `sequence`, each entry taken modulo the `n` passed to
    /// that call.
    pub fn sequence(sequence: Vec<usize>) -> Self {
        StubRng { sequence, pos: 0 }
    }
}

#[cfg(any(test, feature = "testkit"))]
impl SeamRng for StubRng {
    fn choice(&mut self, n: usize) -> usize {
        let raw = self.sequence[self.pos % self.sequence.len()];
        self.pos += 1;
        raw % n
    }
}
