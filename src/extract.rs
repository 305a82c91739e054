//! Hash column extraction: writes the hash half of each credential to the
//! intermediate file handed to the cracker.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::credential::Credential;

/// Default name of the intermediate hash file.
pub const DEFAULT_HASHES_FILE: &str = "parsed_hashes.txt";

/// Truncate `path` and write one hash per line, newline-terminated.
pub fn write_hashes<P: AsRef<Path>>(creds: &[Credential], path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for c in creds {
        writeln!(w, "{}", c.hash)?;
    }
    w.flush()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(creds.len())
}
