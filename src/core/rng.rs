//! RNG module - double 7-bag piece generation
//!
//! Each refill appends two full shuffled 7-piece permutations, so every shape
//! appears exactly once per 7 draws and the worst-case wait between repeats
//! of a shape is bounded by 12 draws.
//!
//! The LCG keeps piece sequences deterministic per seed for testing.

use std::collections::VecDeque;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Piece queue backed by the double 7-bag randomizer
#[derive(Debug, Clone)]
pub struct BagQueue {
    queue: VecDeque<PieceKind>,
    rng: SimpleRng,
}

impl BagQueue {
    /// Create a new queue with the given seed, pre-filled with two bags
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            queue: VecDeque::with_capacity(16),
            rng: SimpleRng::new(seed),
        };
        queue.top_up();
        queue
    }

    /// Append two freshly shuffled bags whenever fewer than 7 shapes remain
    fn top_up(&mut self) {
        if self.queue.len() >= 7 {
            return;
        }
        for _ in 0..2 {
            let mut bag = PieceKind::ALL;
            self.rng.shuffle(&mut bag);
            self.queue.extend(bag);
        }
    }

    /// Draw the next shape from the queue
    pub fn draw(&mut self) -> PieceKind {
        self.top_up();
        self.queue.pop_front().expect("queue topped up above")
    }

    /// Read-only peek at the next `n` queued shapes
    pub fn peek(&self, n: usize) -> Vec<PieceKind> {
        self.queue.iter().take(n).copied().collect()
    }

    /// Discard all queued shapes; the next draw reshuffles
    pub fn reset(&mut self) {
        self.queue.clear();
    }
}
