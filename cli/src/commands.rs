// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text commands accepted by the CLI and their execution

use anyhow::{anyhow, bail, Result};
use chessgrid_core::{MatchContext, Position};

use crate::render::render_board;

/// A parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Interact with the cell at a position
    Select(Position),
    /// Print the neighbors of a cell
    Neighbors(Position),
    /// Hand the turn to the other team
    Turn,
    /// Print the board
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  select <row> <col>     interact with a cell
  neighbors <row> <col>  list the neighbors of a cell
  turn                   pass the turn to the other team
  show                   print the board
  help                   show this text
  quit                   leave";

/// Parse one input line; blank lines and `#` comments yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let word = parts.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = parts.collect();

    let cmd = match word.as_str() {
        "select" | "s" => Command::Select(parse_position(&args)?),
        "neighbors" | "n" => Command::Neighbors(parse_position(&args)?),
        "turn" | "t" => Command::Turn,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command: {}", other),
    };
    Ok(Some(cmd))
}

fn parse_position(args: &[&str]) -> Result<Position> {
    match args {
        [row, col] => {
            let row = row
                .parse::<u8>()
                .map_err(|_| anyhow!("Invalid row: {}", row))?;
            let col = col
                .parse::<u8>()
                .map_err(|_| anyhow!("Invalid column: {}", col))?;
            Ok(Position::new(row, col))
        }
        _ => bail!("Expected <row> <col>"),
    }
}

/// Run a command against the match and return the text to print
pub fn execute(ctx: &mut MatchContext, cmd: Command) -> Result<String> {
    let out = match cmd {
        Command::Select(pos) => {
            let movement = ctx.interact_at(pos)?;
            let held = ctx
                .previously_selected()
                .and_then(|id| ctx.cell(id).ok())
                .map(|c| c.position().to_string())
                .unwrap_or_else(|| "nothing".to_string());
            match movement {
                Some(m) => format!("{} -> {} (holding {})", pos, m, held),
                None => format!("{} -> not processed", pos),
            }
        }
        Command::Neighbors(pos) => {
            let cell = ctx.cell_at(pos)?.id();
            let positions: Vec<String> = ctx
                .neighbors(cell)?
                .into_iter()
                .filter_map(|n| ctx.cell(n).ok())
                .map(|c| c.position().to_string())
                .collect();
            format!("{}: {}", pos, positions.join(" "))
        }
        Command::Turn => format!("{} to move", ctx.advance_turn()),
        Command::Show => render_board(ctx),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(out)
}
