//! Output generator
//!
//! Usage: msgkit-tester genout <LINES> <WIDTH>

use std::io::{self, BufWriter, Write};

use clap::Args;

use super::CommandResult;

const FILLER: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Args)]
pub struct GenoutArgs {
    /// Number of lines to print
    pub lines: usize,

    /// Characters per line, excluding the newline
    pub width: usize,
}

pub fn execute(args: GenoutArgs) -> CommandResult {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for number in 1..=args.lines {
        writeln!(out, "{}", numbered_line(number, args.width))?;
    }
    out.flush()?;
    Ok(())
}

/// `00001 abcd...` cut or padded to exactly `width` characters
fn numbered_line(number: usize, width: usize) -> String {
    let mut line = format!("{:05} ", number);
    let mut filler = FILLER.iter().cycle();
    while line.len() < width {
        if let Some(&b) = filler.next() {
            line.push(b as char);
        }
    }
    line.truncate(width);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_line() {
        assert_eq!(numbered_line(1, 10), "00001 abcd");
        assert_eq!(numbered_line(42, 3), "000");
        assert_eq!(numbered_line(7, 72).len(), 72);
        assert_eq!(numbered_line(7, 0), "");
    }
}
