//! Credential records parsed from `username:hash` dump lines.
//!
//! A line is split on its first `:`; everything after it is the hash, so salted
//! formats such as `user:hash:salt` keep the full `hash:salt` value. Lines
//! without a colon are not credentials and are skipped by
//! [`parse_credential_lines`].

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("malformed credential line (no ':'): {0}")]
    MalformedLine(String),
}

/// A single `username:hash` pair, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub hash: String,
}

impl Credential {
    pub fn new(username: &str, hash: &str) -> Self {
        Self {
            username: username.to_string(),
            hash: hash.to_string(),
        }
    }
}

pub fn parse_credential_line(line: &str) -> Result<Credential, CredentialError> {
    match line.split_once(':') {
        Some((username, hash)) => Ok(Credential::new(username, hash)),
        None => Err(CredentialError::MalformedLine(line.to_string())),
    }
}

/// Parse every line that carries a colon, preserving order. Returns the
/// credentials and the number of non-blank lines that were skipped.
pub fn parse_credential_lines<S: AsRef<str>>(lines: &[S]) -> (Vec<Credential>, usize) {
    let mut creds = Vec::with_capacity(lines.len());
    let mut skipped = 0;
    for line in lines {
        let trimmed = line.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_credential_line(trimmed) {
            Ok(c) => creds.push(c),
            Err(_) => skipped += 1,
        }
    }
    (creds, skipped)
}
