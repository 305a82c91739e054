//! Export helpers for writing results to CSV and plain text files.
//!
//! - `save_results_csv` writes every row as `Username,Password`, including
//!   the not-found marker.
//! - `save_user_pass_txt` writes `username:cleartext` for cracked rows only.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::Writer;

use crate::engine::Row;

pub fn save_results_csv<P: AsRef<Path>>(rows: &[Row], path: P) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_user_pass_txt<P: AsRef<Path>>(rows: &[Row], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    for r in rows.iter().filter(|r| r.cracked) {
        writeln!(f, "{}:{}", r.username, r.password)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, NOT_FOUND};
    use tempfile::tempdir;

    #[test]
    fn writes_csv_and_txt() {
        let mut e = Engine::default();
        e.load_from_strings("A:aaaa\nB:bbbb\nC:aaaa", "aaaa:pw,1");
        let rows = e.join();
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("results.csv");
        let txt_path = dir.path().join("userpass.txt");
        save_results_csv(&rows, &csv_path).unwrap();
        save_user_pass_txt(&rows, &txt_path).unwrap();
        let csv_content = std::fs::read_to_string(csv_path).unwrap();
        let txt_content = std::fs::read_to_string(txt_path).unwrap();
        assert!(csv_content.starts_with("Username,Password\n"));
        assert!(csv_content.contains("A,\"pw,1\""));
        assert!(csv_content.contains(&format!("B,{}", NOT_FOUND)));
        assert_eq!(txt_content, "A:pw,1\nC:pw,1\n");
    }
}
