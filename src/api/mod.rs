//! PokeAPI response models and client
//!
//! This module contains the data types decoded from PokeAPI responses and the
//! caching HTTP client that fetches them.

pub mod client;

pub use client::{ApiError, PokeApiClient, DEFAULT_BASE_URL};

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A name/URL pair as returned throughout PokeAPI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name, e.g. "canalave-city"
    pub name: String,
    /// Absolute URL of the resource
    #[serde(default)]
    pub url: String,
}

/// One page of the `/location` listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationPage {
    /// Total number of locations
    #[serde(default)]
    pub count: u32,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    /// Locations on this page
    pub results: Vec<NamedResource>,
}

/// A location area and the pokemon that can be encountered there
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationArea {
    pub name: String,
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// A pokemon species as returned by `/pokemon/{name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Experience gained for defeating this pokemon; null for some forms
    pub base_experience: Option<u32>,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonType {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

impl Pokemon {
    /// Renders the details shown by the `inspect` command
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Name: {}", self.name);
        let _ = writeln!(out, "Id: {}", self.id);
        let _ = writeln!(out, "Height: {}", self.height);
        let _ = writeln!(out, "Weight: {}", self.weight);

        out.push_str("Stats:\n");
        for stat in &self.stats {
            let _ = writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat);
        }

        out.push_str("Types:\n");
        for t in &self.types {
            let _ = writeln!(out, "  - {}", t.kind.name);
        }

        out
    }
}
