//! Human-readable report rendering for terminal output.
//!
//! Renders the joined rows as a boxed two-column table titled
//! "Cracked Passwords", followed by a cracked count.
use colored::*;

use crate::engine::Row;

pub const TABLE_TITLE: &str = "Cracked Passwords";
const HEADERS: [&str; 2] = ["Username", "Password"];

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    format!("{}{}", s, " ".repeat(w.saturating_sub(width(s))))
}

fn rule(left: char, mid: char, right: char, fill: &str, widths: [usize; 2]) -> String {
    format!(
        "{}{}{}{}{}\n",
        left,
        fill.repeat(widths[0] + 2),
        mid,
        fill.repeat(widths[1] + 2),
        right
    )
}

/// Render the table. With `color` off the output is plain text.
pub fn render_table(rows: &[Row], color: bool) -> String {
    let mut widths = [width(HEADERS[0]), width(HEADERS[1])];
    for r in rows {
        widths[0] = widths[0].max(width(&r.username));
        widths[1] = widths[1].max(width(&r.password));
    }

    let mut out = String::new();
    let title = if color {
        TABLE_TITLE.bold().italic().to_string()
    } else {
        TABLE_TITLE.to_string()
    };
    out.push_str(&title);
    out.push('\n');

    out.push_str(&rule('┏', '┳', '┓', "━", widths));
    let head: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| {
            let cell = pad(h, w);
            if color {
                cell.bold().to_string()
            } else {
                cell
            }
        })
        .collect();
    out.push_str(&format!("┃ {} ┃ {} ┃\n", head[0], head[1]));
    out.push_str(&rule('┡', '╇', '┩', "━", widths));

    for r in rows {
        let user = pad(&r.username, widths[0]);
        let pass = pad(&r.password, widths[1]);
        let pass = match (color, r.cracked) {
            (false, _) => pass,
            (true, true) => pass.green().to_string(),
            (true, false) => pass.dimmed().to_string(),
        };
        out.push_str(&format!("│ {} │ {} │\n", user, pass));
    }
    out.push_str(&rule('└', '┴', '┘', "─", widths));
    out
}

pub fn render_summary(rows: &[Row]) -> String {
    let cracked = rows.iter().filter(|r| r.cracked).count();
    format!("Cracked {}/{}", cracked, rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, NOT_FOUND};

    fn rows() -> Vec<Row> {
        let mut e = Engine::default();
        e.load_from_strings(
            "alice:5f4dcc3b5aa765d61d8327deb882cf99\nbob:e10adc3949ba59abbe56e057f20f883e",
            "5f4dcc3b5aa765d61d8327deb882cf99:password\n",
        );
        e.join()
    }

    #[test]
    fn snapshot_table() {
        let s = render_table(&rows(), false);
        insta::assert_snapshot!(s);
    }

    #[test]
    fn rows_line_up_with_headers() {
        let s = render_table(&rows(), false);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], TABLE_TITLE);
        let w = width(lines[1]);
        assert!(lines[1..].iter().all(|l| width(l) == w));
        assert!(s.contains("│ alice    │ password           │"));
        assert!(s.contains(&format!("│ bob      │ {} │", NOT_FOUND)));
    }

    #[test]
    fn empty_table_still_has_headers() {
        let s = render_table(&[], false);
        assert!(s.contains("┃ Username ┃ Password ┃"));
        assert_eq!(render_summary(&[]), "Cracked 0/0");
    }

    #[test]
    fn summary_counts_cracked_rows() {
        assert_eq!(render_summary(&rows()), "Cracked 1/2");
    }
}
