//! Short hash generation.
//!
//! The registry treats hashes as opaque strings; anything implementing
//! [`HashGenerator`] can be plugged into the use cases.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Default number of characters in a generated hash.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Source of short hashes for new records.
#[cfg_attr(test, mockall::automock)]
pub trait HashGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random `[A-Za-z0-9]` hash generator backed by the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomHashGenerator {
    length: usize,
}

impl RandomHashGenerator {
    /// Creates a generator producing hashes of `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomHashGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_LENGTH)
    }
}

impl HashGenerator for RandomHashGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_has_correct_length() {
        let hash = RandomHashGenerator::default().generate();
        assert_eq!(hash.len(), DEFAULT_HASH_LENGTH);
    }

    #[test]
    fn test_generate_custom_length() {
        let hash = RandomHashGenerator::new(10).generate();
        assert_eq!(hash.len(), 10);
    }

    #[test]
    fn test_generate_alphanumeric_only() {
        let generator = RandomHashGenerator::default();
        for _ in 0..100 {
            assert!(generator.generate().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_produces_unique_hashes() {
        let generator = RandomHashGenerator::default();
        let hashes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();

        assert_eq!(hashes.len(), 1000);
    }
}
