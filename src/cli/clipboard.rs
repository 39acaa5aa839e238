//! Clipboard writes through the terminal (OSC 52)

use std::io::{self, IsTerminal, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Escape sequence asking the terminal to place `text` on the system clipboard
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Copy `text` to the clipboard, fire-and-forget
///
/// On a terminal the OSC 52 sequence is emitted; terminals that do not support it
/// ignore it silently. When stdout is redirected the text is written as a plain
/// line instead, so it can be piped into a clipboard tool.
pub fn copy(text: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if stdout.is_terminal() {
        out.write_all(osc52_sequence(text).as_bytes())?;
    } else {
        writeln!(out, "{}", text)?;
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("sk_abc"), "\x1b]52;c;c2tfYWJj\x07");
    }
}
