// quic-mutator-fuzzing/src/generators/mod.rs
//! Input generators for fuzzing the mutation validator and engine

pub mod hello;
pub mod mutation_list;

pub use hello::{ClientHelloGenerator, ServerHelloGenerator};
pub use mutation_list::{Corruption, GeneratedCase, MutationListGenerator};

use arbitrary::Unstructured;
use rand::Rng;

/// Generator trait for creating fuzzable inputs
pub trait Generator<T> {
    /// Generate a new random instance of T
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> T;

    /// Generate a set of new random instances of T
    fn generate_set<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<T> {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

/// Trait for generators that build inputs from raw fuzzer bytes
pub trait BytesGenerator<T> {
    fn from_unstructured(&self, u: &mut Unstructured<'_>) -> arbitrary::Result<T>;

    /// Generate a value from raw bytes
    fn from_bytes(&self, data: &[u8]) -> arbitrary::Result<T> {
        self.from_unstructured(&mut Unstructured::new(data))
    }
}

/// Random bytes rendered as a lowercase hex string
pub fn hex_bytes<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    hex::encode(bytes)
}
