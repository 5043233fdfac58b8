//! Read-eval-print loop
//!
//! Reads lines asynchronously, executes them against a [`Session`], and writes
//! the prompt and command output to the given writer.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::commands::{clean_input, CommandError, Flow, Session};

/// Prompt printed before each line of input
pub const PROMPT: &str = "Pokedex > ";

/// Runs the REPL until `exit` or end of input
///
/// Command errors are printed and the loop continues. Only failures to read
/// input or write output end the loop with an error.
pub async fn run<R, W>(session: &mut Session, input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let words = clean_input(&line);
        if words.is_empty() {
            continue;
        }

        match session.execute(&words, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(CommandError::Io(e)) => return Err(e),
            Err(e @ CommandError::MissingArgument(_)) => writeln!(out, "{}", e)?,
            Err(e) => {
                warn!(error = %e, "command failed");
                writeln!(out, "Error: {}", e)?;
            }
        }
    }

    Ok(())
}
