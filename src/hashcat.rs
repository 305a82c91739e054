//! Blocking invocation of the external cracker.
//!
//! The command line is fixed:
//! `<program> -m <mode> <hashes> <wordlist> -o <outfile> --potfile-disable`.
//! The outfile is truncated before the process starts so a previous run's
//! results can never be read back as this run's. The call blocks until the
//! process exits; there is no timeout.
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info, warn};

pub const DEFAULT_PROGRAM: &str = "hashcat";
/// hashcat mode 0: raw MD5.
pub const DEFAULT_MODE: u32 = 0;
pub const DEFAULT_OUTFILE: &str = "outfile.txt";

/// hashcat exit code when the wordlist was exhausted before every hash cracked.
const EXIT_EXHAUSTED: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CrackerError {
    #[error("failed to truncate {}", path.display())]
    Truncate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start {}", program.to_string_lossy())]
    Spawn {
        program: OsString,
        #[source]
        source: io::Error,
    },
    #[error("{} exited with status {code}: {}", program.to_string_lossy(), stderr.trim())]
    Failed {
        program: OsString,
        code: i32,
        stderr: String,
    },
    #[error("{} was terminated by a signal", program.to_string_lossy())]
    Terminated { program: OsString },
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrackStatus {
    /// Every hash was recovered.
    Cracked,
    /// The wordlist ran out; the outfile holds whatever was recovered.
    Exhausted,
}

/// Classify a process exit code. `None` means the process did not exit
/// normally.
pub fn classify_exit(code: Option<i32>) -> Option<CrackStatus> {
    match code {
        Some(0) => Some(CrackStatus::Cracked),
        Some(EXIT_EXHAUSTED) => Some(CrackStatus::Exhausted),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Hashcat {
    program: OsString,
    mode: u32,
}

impl Default for Hashcat {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Hashcat {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            mode: DEFAULT_MODE,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Arguments passed after the program name.
    pub fn args(&self, hashes: &Path, wordlist: &Path, outfile: &Path) -> Vec<OsString> {
        vec![
            "-m".into(),
            self.mode.to_string().into(),
            hashes.into(),
            wordlist.into(),
            "-o".into(),
            outfile.into(),
            "--potfile-disable".into(),
        ]
    }

    /// Truncate `outfile`, then run the cracker to completion. stdout is
    /// passed through to the terminal; stderr is captured and returned in
    /// the error on failure.
    pub fn run(
        &self,
        hashes: &Path,
        wordlist: &Path,
        outfile: &Path,
    ) -> Result<CrackStatus, CrackerError> {
        File::create(outfile).map_err(|source| CrackerError::Truncate {
            path: outfile.to_path_buf(),
            source,
        })?;

        let args = self.args(hashes, wordlist, outfile);
        debug!(
            "running {} {}",
            self.program.to_string_lossy(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CrackerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let code = output.status.code();
        match classify_exit(code) {
            Some(status) => {
                if !stderr.trim().is_empty() {
                    warn!("{}: {}", self.program.to_string_lossy(), stderr.trim());
                }
                info!("{} finished: {:?}", self.program.to_string_lossy(), status);
                Ok(status)
            }
            None => match code {
                Some(code) => Err(CrackerError::Failed {
                    program: self.program.clone(),
                    code,
                    stderr,
                }),
                None => Err(CrackerError::Terminated {
                    program: self.program.clone(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builds_fixed_command_line() {
        let hc = Hashcat::default();
        let args = hc.args(
            Path::new("parsed_hashes.txt"),
            Path::new("cracked.txt"),
            Path::new("outfile.txt"),
        );
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-m",
                "0",
                "parsed_hashes.txt",
                "cracked.txt",
                "-o",
                "outfile.txt",
                "--potfile-disable"
            ]
        );
        assert_eq!(hc.program(), "hashcat");
    }

    #[test]
    fn mode_is_configurable() {
        let hc = Hashcat::new("hc").with_mode(1000);
        let args = hc.args(Path::new("h"), Path::new("w"), Path::new("o"));
        assert_eq!(args[1], "1000");
    }

    #[test]
    fn exit_codes_zero_and_one_are_success() {
        assert_eq!(classify_exit(Some(0)), Some(CrackStatus::Cracked));
        assert_eq!(classify_exit(Some(1)), Some(CrackStatus::Exhausted));
        assert_eq!(classify_exit(Some(255)), None);
        assert_eq!(classify_exit(Some(-1)), None);
        assert_eq!(classify_exit(None), None);
    }

    #[test]
    fn missing_program_is_spawn_error_and_outfile_is_truncated() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(DEFAULT_OUTFILE);
        std::fs::write(&out, "stale:result\n").unwrap();
        let hc = Hashcat::new(dir.path().join("no-such-cracker"));
        let err = hc
            .run(&dir.path().join("h"), &dir.path().join("w"), &out)
            .unwrap_err();
        assert!(matches!(err, CrackerError::Spawn { .. }));
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
    }

    #[test]
    fn error_chain_names_cause_once() {
        let err = CrackerError::Spawn {
            program: "hashcat".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such binary"),
        };
        let shown = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(shown, "failed to start hashcat: no such binary");
    }
}
