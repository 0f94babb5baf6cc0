//! Delimiter detection and row tokenization for uploaded CSV text.
//!
//! Field CSVs arrive from spreadsheets exported with either comma or
//! semicolon separators, often with stray blank lines and quoted cells.
//! This module turns the raw text into a [`ParsedTable`] without making
//! any assumptions about column counts: data rows are kept exactly as
//! tokenized, even when shorter or longer than the header line.

// ── Types ────────────────────────────────────────────────────────────

/// A tokenized CSV upload: header line plus data rows, in file order.
///
/// Rows are NOT padded or truncated to the header width. Consumers must
/// treat an out-of-range cell index as an absent value.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    /// The separator chosen by [`detect_separator`].
    pub separator: char,
    /// Trimmed, unquoted header cells from line 0.
    pub headers: Vec<String>,
    /// Trimmed, unquoted data cells from every subsequent non-empty line.
    pub rows: Vec<Vec<String>>,
}

/// Errors produced while tokenizing an upload.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The upload contained no usable lines after blank-line filtering.
    #[error("no usable lines in uploaded file")]
    EmptyInput,
}

// ── Separator detection ──────────────────────────────────────────────

/// Choose the field separator by inspecting the first non-empty line.
///
/// Semicolon wins only when it strictly outnumbers commas; a tie falls
/// back to comma, which also covers single-column files.
pub fn detect_separator(text: &str) -> char {
    let first_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();

    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

// ── Tokenization ─────────────────────────────────────────────────────

/// Tokenize the full upload into a [`ParsedTable`].
///
/// Lines that are empty after trimming are discarded before the header
/// split, so a trailing newline or blank separator lines never produce
/// phantom rows. Each cell is trimmed and stripped of one pair of
/// enclosing double quotes; escaped quotes inside a cell are left as-is.
pub fn parse_table(text: &str) -> Result<ParsedTable, ParseError> {
    let separator = detect_separator(text);

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or(ParseError::EmptyInput)?;
    let headers = split_line(header_line, separator);

    let rows: Vec<Vec<String>> = lines.map(|line| split_line(line, separator)).collect();

    Ok(ParsedTable {
        separator,
        headers,
        rows,
    })
}

/// Split one line on the separator, trimming and unquoting each cell.
fn split_line(line: &str, separator: char) -> Vec<String> {
    line.split(separator).map(clean_cell).collect()
}

/// Trim a raw cell and strip one pair of enclosing double quotes.
fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- detect_separator tests --

    #[test]
    fn semicolon_majority_selects_semicolon() {
        assert_eq!(detect_separator("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn comma_majority_selects_comma() {
        assert_eq!(detect_separator("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn tie_falls_back_to_comma() {
        assert_eq!(detect_separator("a,b;c\n"), ',');
    }

    #[test]
    fn no_separator_falls_back_to_comma() {
        assert_eq!(detect_separator("single-column"), ',');
    }

    #[test]
    fn detection_skips_leading_blank_lines() {
        assert_eq!(detect_separator("\n\n  \na;b;c"), ';');
    }

    #[test]
    fn mixed_line_counts_only_first_line() {
        // Later lines full of semicolons must not override line 0.
        assert_eq!(detect_separator("a,b\n1;2;3;4;5"), ',');
    }

    // -- parse_table tests --

    #[test]
    fn headers_come_from_line_zero() {
        let table = parse_table("nome,lat,lon\nFazenda A,-23.1,-51.2").unwrap();
        assert_eq!(table.separator, ',');
        assert_eq!(table.headers, vec!["nome", "lat", "lon"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0], vec!["Fazenda A", "-23.1", "-51.2"]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let table = parse_table("a,b\n\n1,2\n   \n3,4\n").unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn short_rows_are_kept_untouched() {
        let table = parse_table("a,b,c\n1,2").unwrap();
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows[0].len(), 2);
        assert!(table.rows[0].get(2).is_none());
    }

    #[test]
    fn long_rows_are_kept_untouched() {
        let table = parse_table("a,b\n1,2,3,4").unwrap();
        assert_eq!(table.rows[0].len(), 4);
    }

    #[test]
    fn cells_are_trimmed_and_unquoted() {
        let table = parse_table("\"nome\" ,  lat \nx, \" -23.1 \"").unwrap();
        assert_eq!(table.headers, vec!["nome", "lat"]);
        assert_eq!(table.rows[0], vec!["x", "-23.1"]);
    }

    #[test]
    fn inner_quotes_are_not_unescaped() {
        let table = parse_table("a\nsitio \"\"bom\"\" retiro").unwrap();
        assert_eq!(table.rows[0][0], "sitio \"\"bom\"\" retiro");
    }

    #[test]
    fn lone_quote_is_left_alone() {
        // A single leading quote has no matching pair to strip.
        let table = parse_table("a\n\"unterminated").unwrap();
        assert_eq!(table.rows[0][0], "\"unterminated");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_table(""), Err(ParseError::EmptyInput)));
        assert!(matches!(parse_table("\n  \n\n"), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn header_only_file_has_zero_rows() {
        let table = parse_table("nome,lat,lon\n").unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn semicolon_file_round_trip() {
        let table = parse_table("nome;cidade\nSitio Alegre;Ibaiti").unwrap();
        assert_eq!(table.separator, ';');
        assert_eq!(table.rows[0], vec!["Sitio Alegre", "Ibaiti"]);
    }
}
