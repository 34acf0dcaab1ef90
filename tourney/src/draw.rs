//! Random draws for group allocation, bracket seeding and coin-flip tie-breaks.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::models::{Side, TeamId};

/// Source of randomness for the engine
///
/// Production uses an OS-seeded [`DrawRandomizer`]; tests inject a seeded one or
/// [`OrderedDraw`] to get exact layouts.
pub trait DrawSource: Send {
    /// Shuffle teams in place
    fn shuffle(&mut self, teams: &mut [TeamId]);

    /// Pick a side for an unbreakable tie
    fn coin_flip(&mut self) -> Side;
}

/// Draw randomizer backed by a seedable RNG
pub struct DrawRandomizer {
    rng: StdRng,
}

impl DrawRandomizer {
    /// Create a randomizer seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a reproducible randomizer
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is configured, OS-seeded otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }
}

impl Default for DrawRandomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSource for DrawRandomizer {
    fn shuffle(&mut self, teams: &mut [TeamId]) {
        teams.shuffle(&mut self.rng);
    }

    fn coin_flip(&mut self) -> Side {
        if self.rng.random_bool(0.5) {
            Side::Team1
        } else {
            Side::Team2
        }
    }
}

/// Draw that keeps the given order and always picks the same side
#[derive(Debug, Clone, Copy)]
pub struct OrderedDraw {
    coin: Side,
}

impl OrderedDraw {
    pub fn new(coin: Side) -> Self {
        Self { coin }
    }
}

impl Default for OrderedDraw {
    fn default() -> Self {
        Self::new(Side::Team1)
    }
}

impl DrawSource for OrderedDraw {
    fn shuffle(&mut self, _teams: &mut [TeamId]) {}

    fn coin_flip(&mut self) -> Side {
        self.coin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_draws_repeat() {
        let mut a = DrawRandomizer::seeded(42);
        let mut b = DrawRandomizer::seeded(42);

        let mut teams_a: Vec<TeamId> = (1..=12).collect();
        let mut teams_b = teams_a.clone();
        a.shuffle(&mut teams_a);
        b.shuffle(&mut teams_b);

        assert_eq!(teams_a, teams_b);
        assert_eq!(a.coin_flip(), b.coin_flip());
    }

    #[test]
    fn test_shuffle_keeps_every_team() {
        let mut draw = DrawRandomizer::new();
        let mut teams: Vec<TeamId> = (1..=20).collect();
        draw.shuffle(&mut teams);

        let mut sorted = teams.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_ordered_draw() {
        let mut draw = OrderedDraw::new(Side::Team2);
        let mut teams = vec![5, 3, 9];
        draw.shuffle(&mut teams);
        assert_eq!(teams, vec![5, 3, 9]);
        assert_eq!(draw.coin_flip(), Side::Team2);
    }
}
