// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Terminal emulator background colour control.
//!
//! The background is changed with OSC (Operating System Command) escape
//! sequences: OSC 11 sets it and OSC 111 restores the user's own colour.
//! Terminals without OSC support ignore the sequences.

use std::io::{self, Write};

fn write_set_bg(out: &mut impl Write, hex_color: &str) -> io::Result<()> {
    write!(out, "\x1b]11;{}\x07", hex_color)?;
    out.flush()
}

fn write_reset_bg(out: &mut impl Write) -> io::Result<()> {
    write!(out, "\x1b]111\x07")?;
    out.flush()
}

/// Sets the terminal background to `hex_color` (for example `"#1e1e1e"`).
///
/// Without this the area outside the drawn widgets keeps the terminal's own
/// colour, leaving a thin outline around the interface.
pub(crate) fn set_terminal_bg(hex_color: &str) -> io::Result<()> {
    write_set_bg(&mut io::stdout(), hex_color)
}

/// Resets the terminal background to the user's configured colour.
pub(crate) fn reset_terminal_bg() -> io::Result<()> {
    write_reset_bg(&mut io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_osc_sequences() {
        let mut out = Vec::new();

        write_set_bg(&mut out, "#281432").unwrap();
        write_reset_bg(&mut out).unwrap();

        assert_eq!(out, b"\x1b]11;#281432\x07\x1b]111\x07");
    }
}
