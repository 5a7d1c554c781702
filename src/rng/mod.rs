//! Deterministic string-keyed random sequences

mod sequence;

pub use sequence::SeededSequence;
