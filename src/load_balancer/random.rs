//! Random load balancing strategy.

use rand::Rng;

use crate::load_balancer::{backend::Backend, LoadBalancer};

/// Uniform random selector. Holds no state.
#[derive(Debug, Default)]
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for Random {
    fn next_server(&self, backends: &[Backend]) -> Option<Backend> {
        if backends.is_empty() {
            return None;
        }

        let index = rand::thread_rng().gen_range(0..backends.len());
        backends.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_stays_in_set() {
        let lb = Random::new();
        let backends: Vec<_> = ["a:1", "b:2", "c:3"]
            .iter()
            .map(|n| Backend::parse(n).unwrap())
            .collect();

        let mut hits = [0usize; 3];
        for _ in 0..300 {
            let picked = lb.next_server(&backends).unwrap();
            let pos = backends.iter().position(|b| *b == picked).unwrap();
            hits[pos] += 1;
        }
        assert!(hits.iter().all(|&h| h > 0), "every backend should be picked: {hits:?}");
    }

    #[test]
    fn test_random_empty() {
        assert!(Random::new().next_server(&[]).is_none());
    }
}
