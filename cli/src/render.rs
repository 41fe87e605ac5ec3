// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use chessgrid_core::MatchContext;

/// Render the board as ASCII art
///
/// Pieces use their letter (uppercase white, lowercase black), empty cells a
/// dot. A selected cell is wrapped in brackets.
pub fn render_board(ctx: &MatchContext) -> String {
    let world = ctx.world();
    let dims = ctx.dimensions();
    let mut output = String::new();

    output.push_str(&column_labels(dims.width()));

    for row in world.board().rows() {
        let index = row.first().map(|c| c.position().row).unwrap_or_default();
        output.push_str(&format!("{:2} ", index));

        for cell in row {
            let symbol = world
                .directory()
                .occupant_of(world.board(), cell.id())
                .map(|e| e.kind.symbol(e.team))
                .unwrap_or('.');

            if cell.is_selected() {
                output.push_str(&format!("[{}]", symbol));
            } else {
                output.push_str(&format!(" {} ", symbol));
            }
        }

        output.push_str(&format!(" {}", index));
        output.push('\n');
    }

    output.push_str(&column_labels(dims.width()));
    output
}

fn column_labels(width: u8) -> String {
    let mut line = String::from("   ");
    for col in 0..width {
        line.push_str(&format!(" {} ", column_char(col)));
    }
    line.push('\n');
    line
}

/// Column label, `a` for the first column; wraps after `z`
fn column_char(col: u8) -> char {
    (b'a' + col % 26) as char
}
