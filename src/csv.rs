//! CSV token list parsing
//!
//! Some token sources ship as schema-less CSV exports rather than token-list
//! JSON. The format is modest: a header row naming the columns, then one row
//! per token, cells optionally wrapped in double quotes so that commas inside
//! names survive.

use anyhow::{bail, Result};

use crate::sources::RawToken;

/// Fallback used when a decimals cell does not parse as an integer.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Sentinel some exports use for a missing logo URI.
const NULL_SENTINEL: &str = "NULL";

/// Split one CSV line into cells, honoring double quotes so that commas
/// inside quoted cells are not treated as separators. Surrounding quotes are
/// stripped from the returned cells.
pub fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    cells.push(current);
    cells
}

/// Column layout discovered from the header row.
struct Columns {
    address: usize,
    name: usize,
    symbol: usize,
    decimals: usize,
    logo_uri: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |wanted: &[&str]| {
            header
                .iter()
                .position(|cell| wanted.iter().any(|w| cell.trim().eq_ignore_ascii_case(w)))
        };

        let address = find(&["address", "token address", "tokenaddress"]);
        let name = find(&["name"]);
        let symbol = find(&["symbol"]);
        let decimals = find(&["decimals"]);
        let logo_uri = find(&["logouri", "logo_uri", "logo"]);

        match (address, name, symbol, decimals) {
            (Some(address), Some(name), Some(symbol), Some(decimals)) => Ok(Self {
                address,
                name,
                symbol,
                decimals,
                logo_uri,
            }),
            _ => bail!("CSV header is missing a required column (address, name, symbol, decimals)"),
        }
    }
}

/// Parse a CSV document into raw token records.
///
/// The first line is the header; rows missing a required cell are skipped
/// silently, as are blank lines. Non-numeric decimals fall back to
/// [`DEFAULT_DECIMALS`], and a logo cell equal to `"NULL"` is normalized to
/// absent.
///
/// # Errors
///
/// Returns an error when the document is empty or the header lacks one of
/// the required columns.
pub fn parse_tokens(text: &str) -> Result<Vec<RawToken>> {
    let mut lines = text.lines();
    let header = match lines.next() {
        Some(line) => split_line(line),
        None => bail!("CSV document is empty"),
    };
    let columns = Columns::from_header(&header)?;

    let mut tokens = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_line(line);

        let required = [columns.address, columns.name, columns.symbol, columns.decimals];
        if required.iter().any(|&idx| idx >= cells.len()) {
            continue;
        }

        let address = cells[columns.address].trim().to_string();
        if address.is_empty() {
            continue;
        }

        let decimals = cells[columns.decimals]
            .trim()
            .parse::<u32>()
            .unwrap_or(DEFAULT_DECIMALS);

        let logo_uri = columns
            .logo_uri
            .and_then(|idx| cells.get(idx))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty() && *cell != NULL_SENTINEL)
            .map(|cell| cell.to_string());

        tokens.push(RawToken {
            address,
            chain_id: None,
            name: cells[columns.name].trim().to_string(),
            symbol: cells[columns.symbol].trim().to_string(),
            decimals: Some(decimals),
            logo_uri,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_plain() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_line_quoted_comma() {
        assert_eq!(
            split_line(r#"0x1,"USD Coin, Bridged",USDC"#),
            vec!["0x1", "USD Coin, Bridged", "USDC"]
        );
    }

    #[test]
    fn test_split_line_empty_cells() {
        assert_eq!(split_line("a,,c,"), vec!["a", "", "c", ""]);
    }

    #[test]
    fn test_parse_tokens_basic() {
        let csv = "address,name,symbol,decimals,logoURI\n\
                   0xabc,Alpha,ALF,6,https://img/alpha.png\n\
                   0xdef,Beta,BET,9,NULL\n";
        let tokens = parse_tokens(csv).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].address, "0xabc");
        assert_eq!(tokens[0].symbol, "ALF");
        assert_eq!(tokens[0].decimals, Some(6));
        assert_eq!(tokens[0].logo_uri.as_deref(), Some("https://img/alpha.png"));
        // NULL sentinel normalized to absent
        assert_eq!(tokens[1].logo_uri, None);
    }

    #[test]
    fn test_parse_tokens_decimals_fallback() {
        let csv = "address,name,symbol,decimals\n0xabc,Alpha,ALF,N/A\n";
        let tokens = parse_tokens(csv).unwrap();
        assert_eq!(tokens[0].decimals, Some(DEFAULT_DECIMALS));
    }

    #[test]
    fn test_parse_tokens_skips_blank_lines_and_short_rows() {
        let csv = "address,name,symbol,decimals\n\
                   \n\
                   0xabc,Alpha\n\
                   0xdef,Beta,BET,9\n";
        let tokens = parse_tokens(csv).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].address, "0xdef");
    }

    #[test]
    fn test_parse_tokens_skips_empty_address() {
        let csv = "address,name,symbol,decimals\n,Alpha,ALF,6\n";
        let tokens = parse_tokens(csv).unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_parse_tokens_header_case_insensitive_and_reordered() {
        let csv = "Symbol,Decimals,Address,Name\nALF,6,0xabc,Alpha\n";
        let tokens = parse_tokens(csv).unwrap();
        assert_eq!(tokens[0].address, "0xabc");
        assert_eq!(tokens[0].name, "Alpha");
        assert_eq!(tokens[0].symbol, "ALF");
    }

    #[test]
    fn test_parse_tokens_quoted_header_and_cells() {
        let csv = "\"address\",\"name\",\"symbol\",\"decimals\"\n\
                   \"0xabc\",\"Alpha, the first\",\"ALF\",\"6\"\n";
        let tokens = parse_tokens(csv).unwrap();
        assert_eq!(tokens[0].name, "Alpha, the first");
        assert_eq!(tokens[0].decimals, Some(6));
    }

    #[test]
    fn test_parse_tokens_missing_required_column() {
        let csv = "address,name,decimals\n0xabc,Alpha,6\n";
        assert!(parse_tokens(csv).is_err());
    }

    #[test]
    fn test_parse_tokens_empty_document() {
        assert!(parse_tokens("").is_err());
    }
}
