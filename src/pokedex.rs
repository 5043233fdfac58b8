//! Catch game and the session roster of caught pokemon
//!
//! The chance of catching a pokemon falls as its base experience rises. The
//! roster only lives for the current session.

use chrono::{DateTime, Local};
use rand::Rng;

use crate::api::Pokemon;

/// Base experience at which a pokemon can no longer be caught
pub const MAX_BASE_EXPERIENCE: u32 = 700;

/// Probability threshold a roll must reach to catch a pokemon
///
/// Scales linearly from 0.0 (always caught) to 1.0 at
/// [`MAX_BASE_EXPERIENCE`]. Pokemon without a base experience are treated as 0.
pub fn catch_threshold(base_experience: Option<u32>) -> f64 {
    let exp = f64::from(base_experience.unwrap_or(0));
    (exp / f64::from(MAX_BASE_EXPERIENCE)).clamp(0.0, 1.0)
}

/// Outcome of a single throw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchAttempt {
    /// Value the roll had to reach
    pub threshold: f64,
    /// The roll, in `[0, 1)`
    pub roll: f64,
}

impl CatchAttempt {
    /// Rolls against the pokemon's threshold
    pub fn roll<R: Rng>(pokemon: &Pokemon, rng: &mut R) -> Self {
        Self::with_roll(pokemon, rng.gen::<f64>())
    }

    /// Builds an attempt from a known roll
    pub fn with_roll(pokemon: &Pokemon, roll: f64) -> Self {
        Self {
            threshold: catch_threshold(pokemon.base_experience),
            roll,
        }
    }

    pub fn caught(&self) -> bool {
        self.roll >= self.threshold
    }
}

/// A pokemon in the roster with the time it was caught
#[derive(Debug, Clone)]
pub struct CaughtPokemon {
    pub pokemon: Pokemon,
    pub caught_at: DateTime<Local>,
}

/// Pokemon caught during this session, in catch order
#[derive(Debug, Default)]
pub struct Pokedex {
    caught: Vec<CaughtPokemon>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a catch, replacing an earlier record of the same pokemon
    pub fn insert(&mut self, pokemon: Pokemon) {
        let entry = CaughtPokemon {
            pokemon,
            caught_at: Local::now(),
        };
        match self
            .caught
            .iter_mut()
            .find(|c| c.pokemon.name == entry.pokemon.name)
        {
            Some(existing) => *existing = entry,
            None => self.caught.push(entry),
        }
    }

    /// Looks up a caught pokemon by name
    pub fn get(&self, name: &str) -> Option<&CaughtPokemon> {
        self.caught.iter().find(|c| c.pokemon.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaughtPokemon> {
        self.caught.iter()
    }

    pub fn len(&self) -> usize {
        self.caught.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caught.is_empty()
    }
}
