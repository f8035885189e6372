//! Position maps: generated coordinates back to source coordinates.
//!
//! Serializes to the Source Map V3 JSON format (base64 VLQ `mappings`).

use serde_json::json;

/// A single mapping entry. Lines are 0-based here; columns are 0-based everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub source_index: u32,
    pub original_line: u32,
    pub original_column: u32,
    pub name_index: Option<u32>,
}

/// Accumulates mappings for one generated file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    pub file: Option<String>,
    sources: Vec<String>,
    names: Vec<String>,
    mappings: Vec<Mapping>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `source`, registering it on first use.
    pub fn add_source(&mut self, source: &str) -> u32 {
        intern(&mut self.sources, source)
    }

    pub fn add_name(&mut self, name: &str) -> u32 {
        intern(&mut self.names, name)
    }

    pub fn add_mapping(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Encode the `mappings` field: `;` between generated lines, `,` between segments, every
    /// field relative to the previous segment (the column resets on each line).
    pub fn encode_mappings(&self) -> String {
        let mut sorted: Vec<&Mapping> = self.mappings.iter().collect();
        sorted.sort_by_key(|m| (m.generated_line, m.generated_column));

        let mut out = String::new();
        let mut line = 0;
        let mut prev_col = 0i64;
        let mut prev_source = 0i64;
        let mut prev_orig_line = 0i64;
        let mut prev_orig_col = 0i64;
        let mut prev_name = 0i64;
        let mut first_in_line = true;

        for m in sorted {
            while line < m.generated_line {
                out.push(';');
                line += 1;
                prev_col = 0;
                first_in_line = true;
            }
            if !first_in_line {
                out.push(',');
            }
            first_in_line = false;

            encode_vlq(&mut out, i64::from(m.generated_column) - prev_col);
            encode_vlq(&mut out, i64::from(m.source_index) - prev_source);
            encode_vlq(&mut out, i64::from(m.original_line) - prev_orig_line);
            encode_vlq(&mut out, i64::from(m.original_column) - prev_orig_col);
            prev_col = i64::from(m.generated_column);
            prev_source = i64::from(m.source_index);
            prev_orig_line = i64::from(m.original_line);
            prev_orig_col = i64::from(m.original_column);
            if let Some(name) = m.name_index {
                encode_vlq(&mut out, i64::from(name) - prev_name);
                prev_name = i64::from(name);
            }
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut value = json!({
            "version": 3,
            "sources": self.sources,
            "names": self.names,
            "mappings": self.encode_mappings(),
        });
        if let Some(file) = &self.file {
            value["file"] = json!(file);
        }
        value
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

fn intern(table: &mut Vec<String>, value: &str) -> u32 {
    let idx = table.iter().position(|v| v == value).unwrap_or_else(|| {
        table.push(value.to_string());
        table.len() - 1
    });
    idx as u32
}

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Append `value` as a base64 VLQ: sign in the lowest bit, 5 data bits per digit.
fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = (if value < 0 { ((-value) << 1) | 1 } else { value << 1 }) as u64;
    loop {
        let mut digit = (vlq & 0b11111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000;
        }
        out.push(char::from(BASE64[digit]));
        if vlq == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(&mut out, value);
        out
    }

    fn mapping(line: u32, col: u32, orig_line: u32, orig_col: u32) -> Mapping {
        Mapping {
            generated_line: line,
            generated_column: col,
            source_index: 0,
            original_line: orig_line,
            original_column: orig_col,
            name_index: None,
        }
    }

    #[test]
    fn test_vlq_digits() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(15), "e");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(-16), "hB");
    }

    #[test]
    fn test_mappings_are_relative() {
        let mut map = PositionMap::new();
        map.add_source("a.pyj");
        map.add_mapping(mapping(0, 0, 0, 0));
        map.add_mapping(mapping(0, 4, 0, 2));
        map.add_mapping(mapping(2, 1, 3, 0));
        assert_eq!(map.encode_mappings(), "AAAA,IAAE;;CAGF");
    }

    #[test]
    fn test_sources_and_names_are_interned() {
        let mut map = PositionMap::new();
        assert_eq!(map.add_source("a.pyj"), 0);
        assert_eq!(map.add_source("b.pyj"), 1);
        assert_eq!(map.add_source("a.pyj"), 0);
        assert_eq!(map.add_name("x"), 0);
        assert_eq!(map.add_name("x"), 0);
        assert_eq!(map.names(), ["x"]);
    }

    #[test]
    fn test_json_shape() {
        let mut map = PositionMap::new();
        map.file = Some("out.js".into());
        map.add_source("a.pyj");
        map.add_mapping(mapping(0, 0, 0, 0));
        let json = map.to_json();
        assert_eq!(json["version"], 3);
        assert_eq!(json["sources"][0], "a.pyj");
        assert_eq!(json["mappings"], "AAAA");
        assert_eq!(json["file"], "out.js");
    }
}
