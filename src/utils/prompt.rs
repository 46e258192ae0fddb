//! Interactive stdin/stdout prompts.

use std::io::{self, BufRead, Write};

/// Print a prompt label and read one trimmed line from stdin.
pub fn prompt(label: &str) -> io::Result<String> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", label)?;
    out.flush()?;

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
