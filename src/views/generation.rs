//! Latest-wins guard for overlapping fetches
//!
//! Each view owns one counter. Starting a fetch takes a token; when the
//! response arrives, the token is only honored if no newer fetch has begun
//! since. Out-of-order responses for stale inputs are discarded instead of
//! overwriting newer state.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Generation {
    counter: AtomicU64,
}

/// Token identifying one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationToken(u64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new fetch, invalidating all earlier tokens.
    pub fn begin(&self) -> GenerationToken {
        GenerationToken(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a response carrying this token still matches current input.
    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.counter.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_fetch_invalidates_older_tokens() {
        let generation = Generation::new();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn tokens_are_not_interchangeable_across_counters() {
        let a = Generation::new();
        let b = Generation::new();
        let token = a.begin();
        a.begin();
        // Stale against its own counter even though b is at that count.
        b.begin();
        assert!(!a.is_current(token));
    }
}
