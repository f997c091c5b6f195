use std::collections::HashMap;
use std::hash::Hash;

/// Request number within one scope; later requests carry larger values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Per-scope request counters. A response is applied only while its
/// generation is still the latest issued for its scope.
#[derive(Debug)]
pub struct GenerationCounter<S> {
    latest: HashMap<S, u64>,
}

impl<S> Default for GenerationCounter<S> {
    fn default() -> Self {
        Self { latest: HashMap::new() }
    }
}

impl<S: Eq + Hash> GenerationCounter<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, scope: S) -> Generation {
        let next = self.latest.entry(scope).or_insert(0);
        *next += 1;
        Generation(*next)
    }

    pub fn is_current(&self, scope: &S, generation: Generation) -> bool {
        self.latest.get(scope).copied() == Some(generation.0)
    }
}
