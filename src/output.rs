//! Terminal rendering helpers.

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Write a response body exactly as received, then a newline
pub fn write_raw<W: Write + ?Sized>(out: &mut W, body: &[u8]) -> io::Result<()> {
    out.write_all(body)?;
    out.write_all(b"\n")
}

pub fn heading(s: &str) -> String {
    s.yellow().to_string()
}

pub fn success(s: &str) -> String {
    s.green().to_string()
}

pub fn failure(s: &str) -> String {
    s.red().to_string()
}
