//! Parsing of the cracker's `hash:plaintext` output and the hash → plaintext
//! lookup built from it.
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum PotError {
	#[error("malformed pot line: {0}")]
	MalformedLine(String),
}

pub fn parse_pot_line(line: &str) -> Result<(String, String), PotError> {
	// hash:password, only first ':' splits; allow empty password
	if let Some((hash, rest)) = line.split_once(':') {
		Ok((hash.trim().to_string(), decode_plaintext(rest)))
	} else {
		Err(PotError::MalformedLine(line.to_string()))
	}
}

/// hashcat writes plaintexts containing separators or non-printable bytes as
/// `$HEX[..]`. Decode them when the bytes are valid UTF-8.
pub fn decode_plaintext(raw: &str) -> String {
	raw.strip_prefix("$HEX[")
		.and_then(|s| s.strip_suffix(']'))
		.and_then(|h| hex::decode(h).ok())
		.and_then(|bytes| String::from_utf8(bytes).ok())
		.unwrap_or_else(|| raw.to_string())
}

/// Hash → plaintext mapping that remembers first-insertion order.
///
/// Inserting a hash that is already present overwrites its plaintext in
/// place: the last write wins, the original position is kept. hashcat can
/// emit the same hash more than once and callers rely on the later line.
#[derive(Debug, Default, Clone)]
pub struct ResultMap {
	entries: Vec<(String, String)>,
	index: HashMap<String, usize>,
}

impl ResultMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or overwrite. Returns the previous plaintext, if any.
	pub fn insert(&mut self, hash: String, plaintext: String) -> Option<String> {
		match self.index.get(&hash) {
			Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, plaintext)),
			None => {
				self.index.insert(hash.clone(), self.entries.len());
				self.entries.push((hash, plaintext));
				None
			}
		}
	}

	pub fn get(&self, hash: &str) -> Option<&str> {
		self.index.get(hash).map(|&i| self.entries[i].1.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(h, p)| (h.as_str(), p.as_str()))
	}

	/// Fold one output line in; blank and malformed lines are ignored and
	/// reported as `false`.
	pub fn insert_line(&mut self, line: &str) -> bool {
		let line = line.trim();
		if line.is_empty() {
			return false;
		}
		match parse_pot_line(line) {
			Ok((h, p)) => {
				self.insert(h, p);
				true
			}
			Err(_) => false,
		}
	}
}

pub fn parse_pot_contents(contents: &str) -> ResultMap {
	let mut map = ResultMap::new();
	for line in contents.lines() {
		map.insert_line(line);
	}
	map
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_password_with_colons() {
		let (h, p) = parse_pot_line("abcdef:pa:ss:wd").unwrap();
		assert_eq!(h, "abcdef");
		assert_eq!(p, "pa:ss:wd");
	}

	#[test]
	fn ignores_malformed_and_blank_lines() {
		let map = parse_pot_contents("\nno_colon\n123:abc\n");
		assert_eq!(map.len(), 1);
		assert_eq!(map.get("123").unwrap(), "abc");
	}

	#[test]
	fn duplicate_hash_keeps_last_plaintext_and_first_position() {
		let map = parse_pot_contents("aa:first\nbb:other\naa:second\naa:third\n");
		assert_eq!(map.len(), 2);
		assert_eq!(map.get("aa"), Some("third"));
		let order: Vec<_> = map.iter().map(|(h, _)| h).collect();
		assert_eq!(order, vec!["aa", "bb"]);
	}

	#[test]
	fn insert_reports_previous_value() {
		let mut map = ResultMap::new();
		assert_eq!(map.insert("h".into(), "x".into()), None);
		assert_eq!(map.insert("h".into(), "y".into()), Some("x".to_string()));
		assert_eq!(map.get("h"), Some("y"));
	}

	#[test]
	fn decodes_hex_plaintexts() {
		let (_, p) = parse_pot_line("abc:$HEX[70613a7373]").unwrap();
		assert_eq!(p, "pa:ss");
		// not valid hex, shown verbatim
		assert_eq!(decode_plaintext("$HEX[zz]"), "$HEX[zz]");
		// not valid UTF-8, shown verbatim
		assert_eq!(decode_plaintext("$HEX[ff]"), "$HEX[ff]");
	}
}
