//! Interactive prompts on a line-oriented reader/writer pair.
//!
//! The binary wires these to stdin/stdout; tests use in-memory buffers.
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::io::LoadError;

/// Wordlist picked up from the working directory when present.
pub const DEFAULT_WORDLIST: &str = "cracked.txt";

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("input closed while waiting for: {0}")]
    EndOfInput(String),
    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `msg` and read one trimmed line. End of input is an error.
    pub fn ask(&mut self, msg: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", msg)?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(PromptError::EndOfInput(msg.trim().to_string()));
        }
        Ok(buf.trim().to_string())
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

/// Ask for a path and hand it to `load` until it succeeds. Every load error
/// is logged and the user is asked again, with no retry limit. Only closed
/// or failing input ends the loop.
pub fn ask_until_loaded<R, W, T, F>(
    prompter: &mut Prompter<R, W>,
    msg: &str,
    mut load: F,
) -> anyhow::Result<(PathBuf, T)>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Path) -> Result<T, LoadError>,
{
    loop {
        let answer = prompter.ask(msg)?;
        if answer.is_empty() {
            error!("Please enter a valid file path");
            continue;
        }
        let path = PathBuf::from(answer);
        match load(&path) {
            Ok(v) => return Ok((path, v)),
            Err(e) => error!("{:#}; please enter a valid file path", anyhow::Error::from(e)),
        }
    }
}

/// Use `explicit` if given, else `cracked.txt` from `dir` if it exists, else
/// ask.
pub fn resolve_wordlist<R: BufRead, W: Write>(
    explicit: Option<PathBuf>,
    dir: &Path,
    prompter: &mut Prompter<R, W>,
) -> Result<PathBuf, PromptError> {
    if let Some(p) = explicit {
        return Ok(p);
    }
    let default = dir.join(DEFAULT_WORDLIST);
    if default.is_file() {
        let shown = std::path::absolute(&default).unwrap_or_else(|_| default.clone());
        info!("{} found at {}", DEFAULT_WORDLIST, shown.display());
        return Ok(default);
    }
    loop {
        let answer = prompter.ask("Word list file: ")?;
        if !answer.is_empty() {
            return Ok(PathBuf::from(answer));
        }
    }
}

/// Names of the entries in `dir`, sorted.
pub fn list_dir(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
