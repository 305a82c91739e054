//! Engine: runs the linear pipeline. Credentials are loaded, their hashes
//! written out for the cracker, the cracker is run, and its output is joined
//! back onto the usernames.
//!
//! Typical usage:
//!
//! ```no_run
//! use hashjoin::engine::{Engine, EngineConfig};
//! # fn main() -> anyhow::Result<()> {
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.load_credentials_from_path("dump.txt")?;
//! engine.crack("cracked.txt")?;
//! for row in engine.join() {
//!     println!("{} | {}", row.username, row.password);
//! }
//! # Ok(())
//! # }
//! ```
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::credential::{Credential, parse_credential_lines};
use crate::extract::{DEFAULT_HASHES_FILE, write_hashes};
use crate::hashcat::{CrackStatus, DEFAULT_OUTFILE, Hashcat};
use crate::io::{DEFAULT_MMAP_THRESHOLD_BYTES, LoadError, iter_lines_auto, load_lines};
use crate::pot::{ResultMap, parse_pot_contents};

/// Shown in place of a password when the hash was not recovered.
pub const NOT_FOUND: &str = "Not found in table";

/// One output row: a username and its plaintext or [`NOT_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(skip)]
    pub cracked: bool,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub hashcat: Hashcat,
    pub hashes_file: PathBuf,
    pub outfile: PathBuf,
    pub mmap_threshold_bytes: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hashcat: Hashcat::default(),
            hashes_file: PathBuf::from(DEFAULT_HASHES_FILE),
            outfile: PathBuf::from(DEFAULT_OUTFILE),
            mmap_threshold_bytes: DEFAULT_MMAP_THRESHOLD_BYTES,
        }
    }
}

#[derive(Debug, Default)]
pub struct Engine {
    pub config: EngineConfig,
    pub credentials: Vec<Credential>,
    pub results: ResultMap,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            credentials: Vec::new(),
            results: ResultMap::new(),
        }
    }

    /// Load inputs already in-memory. Intended for tests and small programmatic
    /// integrations.
    pub fn load_from_strings(&mut self, credentials: &str, pot: &str) {
        let lines: Vec<&str> = credentials.lines().collect();
        self.load_credentials(&lines);
        self.results = parse_pot_contents(pot);
    }

    pub fn load_credentials<S: AsRef<str>>(&mut self, lines: &[S]) {
        let (creds, skipped) = parse_credential_lines(lines);
        if skipped > 0 {
            debug!("skipped {} line(s) without ':'", skipped);
        }
        self.credentials = creds;
    }

    /// Load the credential file. Missing files come back as
    /// [`LoadError::NotFound`] so the caller can decide whether to ask again.
    pub fn load_credentials_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let lines = load_lines(&path, self.config.mmap_threshold_bytes)?;
        info!(
            "loaded {} line(s) from {}",
            lines.len(),
            path.as_ref().display()
        );
        self.load_credentials(&lines);
        Ok(())
    }

    /// Write the hash column, run the cracker and read its outfile back.
    pub fn crack<P: AsRef<Path>>(&mut self, wordlist: P) -> Result<CrackStatus> {
        let n = write_hashes(&self.credentials, &self.config.hashes_file)?;
        info!(
            "wrote {} hash(es) to {}",
            n,
            self.config.hashes_file.display()
        );
        let status = self
            .config
            .hashcat
            .run(
                &self.config.hashes_file,
                wordlist.as_ref(),
                &self.config.outfile,
            )
            .context("external cracker invocation failed")?;
        self.load_results()?;
        Ok(status)
    }

    /// Rebuild the result map from the outfile.
    pub fn load_results(&mut self) -> Result<()> {
        let outfile = &self.config.outfile;
        let iter = iter_lines_auto(outfile, self.config.mmap_threshold_bytes)
            .with_context(|| format!("open {}", outfile.display()))?;
        let mut results = ResultMap::new();
        let mut malformed = 0usize;
        for line in iter {
            let line = line.with_context(|| format!("read {}", outfile.display()))?;
            if !results.insert_line(&line) && !line.trim().is_empty() {
                malformed += 1;
            }
        }
        if malformed > 0 {
            debug!("{}: {} malformed line(s)", outfile.display(), malformed);
        }
        info!("{} cracked hash(es) in {}", results.len(), outfile.display());
        self.results = results;
        Ok(())
    }

    /// Pair each credential with its plaintext, in input order. Never fails:
    /// unknown hashes get [`NOT_FOUND`].
    pub fn join(&self) -> Vec<Row> {
        join(&self.credentials, &self.results)
    }
}

pub fn join(credentials: &[Credential], results: &ResultMap) -> Vec<Row> {
    credentials
        .iter()
        .map(|c| match results.get(&c.hash) {
            Some(pw) => Row {
                username: c.username.clone(),
                password: pw.to_string(),
                cracked: true,
            },
            None => Row {
                username: c.username.clone(),
                password: NOT_FOUND.to_string(),
                cracked: false,
            },
        })
        .collect()
}
