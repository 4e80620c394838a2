//! Logical symbol to provider identifier mapping, plus file parsers.
//!
//! Dashboards ask for instruments by a short logical name (`NIFTY50`, `KOTAK`);
//! the quote provider knows them under its own ticker (`^NSEI`,
//! `KOTAKBANK.NS`). `SymbolMap` holds that translation. A symbol missing from
//! the map is never an error: it resolves to `<symbol><suffix>` using the
//! fallback `Exchange`.
//!
//! Two line-oriented file formats are supported:
//! - symbol map overrides, one `LOGICAL = PROVIDER` pair per line;
//! - symbol lists, separated by commas, spaces, or new lines.
//!
//! In both formats blank lines and lines starting with `#` are ignored.
use std::collections::HashMap;
use std::io::BufRead;

use crate::error::RelayError;
use crate::exchange::Exchange;

/// Built-in mapping loaded at process start.
pub const BUILTIN_SYMBOLS: &[(&str, &str)] = &[
    ("NIFTY50", "^NSEI"),
    ("SENSEX", "^BSESN"),
    ("ELCID", "ELCIDIN.BO"),
    ("NIPPON", "NAM-INDIA.NS"),
    ("ORCHID", "ORCHPHARMA.NS"),
    ("KOTAK", "KOTAKBANK.NS"),
    ("ZEEL", "ZEEL.NS"),
    ("JIOFIN", "JIOFIN.NS"),
    ("RVNL", "RVNL.NS"),
    ("IRFC", "IRFC.NS"),
    ("ZOMATO", "ZOMATO.NS"),
    ("TRENT", "TRENT.NS"),
    ("TATAELXSI", "TATAELXSI.NS"),
];

/// Immutable translation table from logical symbols to provider identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolMap {
    entries: HashMap<String, String>,
    fallback: Exchange,
}

impl SymbolMap {
    /// Create a map holding the built-in table.
    pub fn new(fallback: Exchange) -> Self {
        Self::empty(fallback).with_entries(
            BUILTIN_SYMBOLS
                .iter()
                .map(|(logical, provider)| (logical.to_string(), provider.to_string())),
        )
    }

    /// Create a map with no entries; every symbol takes the fallback branch.
    pub fn empty(fallback: Exchange) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    /// Add or override entries.
    pub fn with_entries<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.entries.extend(entries);
        self
    }

    /// Merge `LOGICAL = PROVIDER` lines read from `reader` over the current
    /// entries. Returns the number of entries read.
    pub fn extend_from_file<R: BufRead>(&mut self, reader: R) -> Result<usize, RelayError> {
        let mut count = 0;

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(RelayError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            let (logical, provider) = trimmed_line.split_once('=').ok_or_else(|| {
                RelayError::ParseSymbolFile(format!(
                    "line {}: expected `LOGICAL = PROVIDER`, got `{}`",
                    index + 1,
                    trimmed_line
                ))
            })?;
            let (logical, provider) = (logical.trim(), provider.trim());
            if logical.is_empty() || provider.is_empty() {
                return Err(RelayError::ParseSymbolFile(format!(
                    "line {}: empty symbol in `{}`",
                    index + 1,
                    trimmed_line
                )));
            }

            self.entries.insert(logical.to_string(), provider.to_string());
            count += 1;
        }
        Ok(count)
    }

    /// Provider identifier for `symbol`, falling back to the exchange suffix
    /// on a lookup miss.
    pub fn resolve(&self, symbol: &str) -> String {
        match self.entries.get(symbol) {
            Some(identifier) => identifier.clone(),
            None => format!("{}{}", symbol, self.fallback.suffix()),
        }
    }

    /// Exchange used for unmapped symbols.
    pub fn fallback(&self) -> Exchange {
        self.fallback
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no explicit entries exist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SymbolMap {
    fn default() -> Self {
        Self::new(Exchange::default())
    }
}

/// Parse a list of logical symbols separated by commas, spaces, or new lines.
///
/// Order and duplicates are preserved; the relay accepts both.
pub fn parse_symbol_list<R: BufRead>(reader: R) -> Result<Vec<String>, RelayError> {
    let mut symbols = Vec::new();

    for line_result in reader.lines() {
        let line = line_result.map_err(RelayError::Io)?;
        let trimmed_line = line.trim();
        if trimmed_line.starts_with('#') {
            continue;
        }
        symbols.extend(
            trimmed_line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("NIFTY50", "^NSEI")]
    #[case("SENSEX", "^BSESN")]
    #[case("KOTAK", "KOTAKBANK.NS")]
    #[case("ELCID", "ELCIDIN.BO")]
    #[case("TATAELXSI", "TATAELXSI.NS")]
    fn test_mapped_symbols(#[case] symbol: &str, #[case] identifier: &str) {
        assert_eq!(SymbolMap::default().resolve(symbol), identifier);
    }

    #[rstest]
    #[case("UNKNOWNX", "UNKNOWNX.NS")]
    #[case("RELIANCE", "RELIANCE.NS")]
    #[case("nifty50", "nifty50.NS")]
    #[case("", ".NS")]
    fn test_unmapped_symbols_take_suffix(#[case] symbol: &str, #[case] identifier: &str) {
        assert_eq!(SymbolMap::default().resolve(symbol), identifier);
    }

    #[test]
    fn test_fallback_follows_exchange() {
        let map = SymbolMap::new(Exchange::Bse);
        assert_eq!(map.resolve("UNKNOWNX"), "UNKNOWNX.BO");
        assert_eq!(map.resolve("NIFTY50"), "^NSEI");
    }

    #[test]
    fn test_builtin_table_is_loaded() {
        let map = SymbolMap::default();
        assert_eq!(map.len(), BUILTIN_SYMBOLS.len());
        assert!(SymbolMap::empty(Exchange::Nse).is_empty());
    }

    #[test]
    fn test_extend_from_file_overrides_builtin() {
        let file = "# overrides\n\nKOTAK = KOTAKBANK.BO\nHDFC=HDFCBANK.NS\n";
        let mut map = SymbolMap::default();

        let count = map.extend_from_file(Cursor::new(file)).unwrap();

        assert_eq!(count, 2);
        assert_eq!(map.resolve("KOTAK"), "KOTAKBANK.BO");
        assert_eq!(map.resolve("HDFC"), "HDFCBANK.NS");
        assert_eq!(map.resolve("NIFTY50"), "^NSEI");
    }

    #[rstest]
    #[case("KOTAK KOTAKBANK.NS\n")]
    #[case("KOTAK =\n")]
    #[case(" = KOTAKBANK.NS\n")]
    fn test_extend_from_file_rejects_malformed_lines(#[case] file: &str) {
        let mut map = SymbolMap::default();
        let err = map.extend_from_file(Cursor::new(file)).unwrap_err();
        assert!(matches!(err, RelayError::ParseSymbolFile(msg) if msg.starts_with("line 1")));
    }

    #[test]
    fn test_parse_symbol_list_mixed_separators() {
        let file = "NIFTY50, SENSEX\n# watchlist\nKOTAK\tZEEL\n\nKOTAK\n";
        let symbols = parse_symbol_list(Cursor::new(file)).unwrap();
        assert_eq!(symbols, vec!["NIFTY50", "SENSEX", "KOTAK", "ZEEL", "KOTAK"]);
    }

    #[test]
    fn test_parse_symbol_list_empty() {
        assert!(parse_symbol_list(Cursor::new("")).unwrap().is_empty());
    }
}
