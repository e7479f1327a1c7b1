// quic-mutator-fuzzing/src/mutators/mod.rs
//! Mutators that drive declarative mutation lists against hello messages

pub mod handshake;

pub use handshake::HandshakeMutator;

/// Trait for mutating fuzzable inputs in place
pub trait Mutator<T> {
    /// Mutate the given input
    fn mutate(&self, input: &mut T);

    /// Apply multiple mutations to the input
    fn mutate_multiple(&self, input: &mut T, count: usize) {
        for _ in 0..count {
            self.mutate(input);
        }
    }
}
