//! Rubric criteria parsing
//!
//! A rubric CSV holds one evaluation question per row in its first column.
//! The header row is skipped and rows with an empty first cell are dropped.

use crate::error::{DocqaError, Result};

/// Parse rubric criteria from raw CSV text
///
/// Rows after the header contribute their first cell; blank-first-cell rows
/// are dropped. Quoted first cells may contain commas, with `""` as the
/// escaped quote.
///
/// # Errors
///
/// Returns error if the text is empty, contains no data rows, or a quoted
/// cell is unterminated.
///
/// # Examples
///
/// ```
/// use docqa::rubric::parse_criteria;
///
/// let criteria = parse_criteria("criterion,weight\nA,1\n,2\nB,3").unwrap();
/// assert_eq!(criteria, vec!["A", "B"]);
/// ```
pub fn parse_criteria(csv_text: &str) -> Result<Vec<String>> {
    if csv_text.trim().is_empty() {
        return Err(DocqaError::CsvParse("rubric file is empty".to_string()).into());
    }

    let mut rows = csv_text.lines();
    // First row is always a header
    let _header = rows.next();

    let mut criteria = Vec::new();
    for (line_no, row) in rows.enumerate() {
        let row = row.trim_end_matches('\r');
        let cell = first_cell(row).map_err(|message| {
            DocqaError::CsvParse(format!("row {}: {}", line_no + 2, message))
        })?;
        if !cell.is_empty() {
            criteria.push(cell);
        }
    }

    if criteria.is_empty() {
        return Err(DocqaError::CsvParse("rubric contains no criteria".to_string()).into());
    }

    tracing::debug!("Parsed {} rubric criteria", criteria.len());
    Ok(criteria)
}

/// Extract the first CSV cell of a row
fn first_cell(row: &str) -> std::result::Result<String, String> {
    if !row.starts_with('"') {
        return Ok(row.split(',').next().unwrap_or("").trim().to_string());
    }

    let mut cell = String::new();
    let mut chars = row[1..].chars().peekable();
    loop {
        match chars.next() {
            Some('"') => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    return Ok(cell);
                }
            }
            Some(c) => cell.push(c),
            None => return Err("unterminated quoted cell".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_header_and_blank_rows() {
        let criteria = parse_criteria("header\nA,1\n,2\nB,3").unwrap();
        assert_eq!(criteria, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_single_column() {
        let criteria = parse_criteria("criterion\nIs liability capped?\n").unwrap();
        assert_eq!(criteria, vec!["Is liability capped?"]);
    }

    #[test]
    fn test_parse_quoted_cell_with_comma() {
        let csv = "criterion,weight\n\"Is liability limited, and what is the cap?\",5\n";
        let criteria = parse_criteria(csv).unwrap();
        assert_eq!(criteria, vec!["Is liability limited, and what is the cap?"]);
    }

    #[test]
    fn test_parse_escaped_quote() {
        let csv = "criterion\n\"Does \"\"confidential\"\" cover data?\"\n";
        let criteria = parse_criteria(csv).unwrap();
        assert_eq!(criteria, vec!["Does \"confidential\" cover data?"]);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let criteria = parse_criteria("header\r\nA,1\r\nB,2\r\n").unwrap();
        assert_eq!(criteria, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_empty_input_is_error() {
        assert!(parse_criteria("").is_err());
        assert!(parse_criteria("   \n").is_err());
    }

    #[test]
    fn test_parse_header_only_is_error() {
        assert!(parse_criteria("criterion,weight\n").is_err());
    }

    #[test]
    fn test_parse_unterminated_quote_is_error() {
        let err = parse_criteria("header\n\"unterminated,1\n").unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }
}
