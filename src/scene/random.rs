//! Reproducible random stream for scene population.
//!
//! The populated scene depends on the exact sequence of numbers drawn, so the
//! generator algorithm is part of the scene's contract rather than whatever
//! the platform happens to provide.

/// The two kinds of draws the populator makes.
pub trait SceneRng {
    /// Uniform-ish integer in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Float in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
}

/// The classic C runtime linear congruential generator (`srand`/`rand`).
///
/// `rand()` yields 15-bit values (`0..=RAND_MAX`) taken from the high word of
/// a 32-bit state.
#[derive(Clone, Debug)]
pub struct CrtRand {
    state: u32,
}

impl CrtRand {
    pub const RAND_MAX: u32 = 0x7fff;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// One `rand()` step.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(214013).wrapping_add(2531011);
        (self.state >> 16) & Self::RAND_MAX
    }
}

impl SceneRng for CrtRand {
    fn next_index(&mut self, bound: usize) -> usize {
        self.next_raw() as usize % bound
    }

    fn next_unit(&mut self) -> f32 {
        self.next_raw() as f32 / (Self::RAND_MAX + 1) as f32
    }
}
