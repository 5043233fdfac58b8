//! Pokedex commands and session state
//!
//! This module holds the command table and the `Session` that executes
//! commands against the API client and the roster, writing output to any
//! `std::io::Write`.

use std::io::Write;

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiError, LocationPage, PokeApiClient};
use crate::pokedex::{CatchAttempt, Pokedex};

/// Commands understood by the REPL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
}

impl Command {
    /// Parses a command name
    ///
    /// Returns `None` if the input doesn't match any command.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Command> {
        COMMANDS
            .iter()
            .find(|spec| spec.name == s.trim())
            .map(|spec| spec.command)
    }
}

/// Name, usage and help text of a command
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub command: Command,
}

/// Static table of all commands, in the order `help` lists them
pub static COMMANDS: [CommandSpec; 8] = [
    CommandSpec {
        name: "help",
        usage: "help",
        description: "Displays a help message",
        command: Command::Help,
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        description: "Exit the Pokedex",
        command: Command::Exit,
    },
    CommandSpec {
        name: "map",
        usage: "map",
        description: "Displays the next page of locations",
        command: Command::Map,
    },
    CommandSpec {
        name: "mapb",
        usage: "mapb",
        description: "Displays the previous page of locations",
        command: Command::MapBack,
    },
    CommandSpec {
        name: "explore",
        usage: "explore <location_area>",
        description: "Lists the pokemon found in a location area",
        command: Command::Explore,
    },
    CommandSpec {
        name: "catch",
        usage: "catch <pokemon>",
        description: "Attempt to catch a pokemon",
        command: Command::Catch,
    },
    CommandSpec {
        name: "inspect",
        usage: "inspect [pokemon]",
        description: "Shows details of a caught pokemon",
        command: Command::Inspect,
    },
    CommandSpec {
        name: "pokedex",
        usage: "pokedex",
        description: "Lists all the pokemon you've caught",
        command: Command::Pokedex,
    },
];

/// Errors that can occur while executing a command
#[derive(Debug, Error)]
pub enum CommandError {
    /// The first word is not a known command
    #[error("Unknown command: '{0}'. Type 'help' to list commands")]
    UnknownCommand(String),

    /// A required argument was not given
    #[error("{0}")]
    MissingArgument(&'static str),

    /// The API request behind the command failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing command output failed
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether the REPL should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Lower-cases a line of input and splits it into words
pub fn clean_input(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_lowercase).collect()
}

/// State of one interactive session
#[derive(Debug)]
pub struct Session {
    client: PokeApiClient,
    pokedex: Pokedex,
    page_size: usize,
    /// Offset of the last location page shown, if any
    page_offset: Option<usize>,
}

impl Session {
    /// Creates a session showing `page_size` locations per map page
    pub fn new(client: PokeApiClient, page_size: usize) -> Self {
        Self {
            client,
            pokedex: Pokedex::new(),
            page_size: page_size.max(1),
            page_offset: None,
        }
    }

    pub fn client(&self) -> &PokeApiClient {
        &self.client
    }

    pub fn pokedex(&self) -> &Pokedex {
        &self.pokedex
    }

    /// Executes a cleaned line of input
    ///
    /// # Arguments
    /// * `words` - Output of [`clean_input`]; the first word names the command
    /// * `out` - Where command output is written
    ///
    /// # Returns
    /// * `Ok(Flow)` - Whether the REPL should continue
    /// * `Err(CommandError)` - If the command is unknown, misses an argument or fails
    pub async fn execute<W: Write>(
        &mut self,
        words: &[String],
        out: &mut W,
    ) -> Result<Flow, CommandError> {
        let Some((name, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let command =
            Command::from_str(name).ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;
        let arg = args.first().map(String::as_str);
        debug!(?command, arg, "executing command");

        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Map => self.map_next(out).await?,
            Command::MapBack => self.map_back(out).await?,
            Command::Explore => {
                let area = arg.ok_or(CommandError::MissingArgument("Provide a location to explore"))?;
                self.explore(area, out).await?;
            }
            Command::Catch => {
                let name = arg.ok_or(CommandError::MissingArgument("Provide a pokemon to catch"))?;
                self.catch(name, out).await?;
            }
            Command::Inspect => self.inspect(arg, out)?,
            Command::Pokedex => self.list_pokedex(out)?,
        }

        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for spec in &COMMANDS {
            writeln!(out, "{}: {}", spec.usage, spec.description)?;
        }
        Ok(())
    }

    async fn map_next<W: Write>(&mut self, out: &mut W) -> Result<(), CommandError> {
        let offset = match self.page_offset {
            Some(current) => current + self.page_size,
            None => 0,
        };

        let page = self.client.location_page(self.page_size, offset).await?;
        if page.results.is_empty() {
            writeln!(out, "You're on the last page")?;
            return Ok(());
        }

        write_page(&page, out)?;
        self.page_offset = Some(offset);
        Ok(())
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<(), CommandError> {
        let offset = match self.page_offset {
            Some(current) if current > 0 => current.saturating_sub(self.page_size),
            _ => {
                writeln!(out, "You're on the first page")?;
                return Ok(());
            }
        };

        let page = self.client.location_page(self.page_size, offset).await?;
        write_page(&page, out)?;
        self.page_offset = Some(offset);
        Ok(())
    }

    async fn explore<W: Write>(&self, area: &str, out: &mut W) -> Result<(), CommandError> {
        writeln!(out, "Exploring {}...", area)?;
        let location = self.client.location_area(area).await?;

        if location.pokemon_encounters.is_empty() {
            writeln!(out, "No pokemon found here")?;
            return Ok(());
        }

        writeln!(out, "Found Pokemon:")?;
        for encounter in &location.pokemon_encounters {
            writeln!(out, " - {}", encounter.pokemon.name)?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<(), CommandError> {
        let pokemon = self.client.pokemon(name).await?;
        writeln!(out, "Throwing a Pokeball at {}...", pokemon.name)?;

        let attempt = CatchAttempt::roll(&pokemon, &mut rand::thread_rng());
        debug!(
            base_experience = ?pokemon.base_experience,
            threshold = attempt.threshold,
            roll = attempt.roll,
            "catch attempt"
        );

        if attempt.caught() {
            writeln!(out, "{} was caught!", pokemon.name)?;
            writeln!(out, "You may now inspect it with the inspect command.")?;
            self.pokedex.insert(pokemon);
        } else {
            writeln!(out, "{} escaped!", pokemon.name)?;
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: Option<&str>, out: &mut W) -> Result<(), CommandError> {
        let Some(name) = name else {
            writeln!(out, "You have {} pokemon in your pokedex", self.pokedex.len())?;
            return Ok(());
        };

        match self.pokedex.get(name) {
            Some(caught) => {
                write!(out, "{}", caught.pokemon.describe())?;
                writeln!(out, "Caught at: {}", caught.caught_at.format("%Y-%m-%d %H:%M:%S"))?;
            }
            None => writeln!(out, "You haven't caught that pokemon yet!")?,
        }
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        if self.pokedex.is_empty() {
            writeln!(out, "You haven't caught any pokemon yet!")?;
            return Ok(());
        }

        writeln!(out, "Your Pokedex:")?;
        for caught in self.pokedex.iter() {
            writeln!(out, " - {}", caught.pokemon.name)?;
        }
        Ok(())
    }

    /// Shuts down the client's cache sweeper
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

fn write_page<W: Write>(page: &LocationPage, out: &mut W) -> std::io::Result<()> {
    for location in &page.results {
        writeln!(out, "{}", location.name)?;
    }
    Ok(())
}
