// ABOUTME: Artifact wire format shared by the export writer and import reader
// ABOUTME: Statement framing, header layout, splitting, and classification

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;

/// Every statement in the artifact ends with exactly this two-byte sequence.
///
/// The import side splits on the same sequence, so a serialized text literal
/// containing a literal `";\n"` would corrupt splitting. That is an accepted
/// limitation of the format, kept for compatibility with existing artifacts
/// rather than silently re-framed. See DESIGN.md.
pub const STATEMENT_TERMINATOR: &str = ";\n";

/// Line-comment marker; comment lines are skipped on replay.
pub const COMMENT_PREFIX: &str = "--";

/// Comment line separating the schema section from the data section.
pub const DATA_SEPARATOR: &str = "-- DATA";

/// Product label on the artifact's first header line.
pub const PRODUCT_LABEL: &str = "dw-cloud-migrate warehouse export";

/// Rough classification of a split fragment, driving the two-pass replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateSchema,
    CreateTable,
    Insert,
    Other,
}

/// Classify one trimmed statement fragment by its leading keywords.
pub fn classify(stmt: &str) -> StatementKind {
    let upper = stmt.to_uppercase();
    if upper.starts_with("INSERT") {
        StatementKind::Insert
    } else if upper.contains("CREATE SCHEMA") {
        StatementKind::CreateSchema
    } else if upper.contains("CREATE TABLE") {
        StatementKind::CreateTable
    } else {
        StatementKind::Other
    }
}

/// Split artifact text into replayable statements.
///
/// Partitions on the exact [`STATEMENT_TERMINATOR`] sequence, trims each
/// fragment, and drops blanks and comment-only fragments. Comment lines share
/// a fragment with the statement that follows them (the `-- DATA` separator
/// precedes the first insert), so leading comment lines are stripped from a
/// fragment rather than discarding the statement glued to them. Returned
/// slices borrow from the input and no longer carry their terminator.
pub fn split_statements(content: &str) -> Vec<&str> {
    content
        .split(STATEMENT_TERMINATOR)
        .filter_map(|fragment| {
            let mut rest = fragment.trim();
            while rest.starts_with(COMMENT_PREFIX) {
                match rest.find('\n') {
                    Some(eol) => rest = rest[eol + 1..].trim_start(),
                    None => return None,
                }
            }
            if rest.is_empty() {
                None
            } else {
                Some(rest)
            }
        })
        .collect()
}

/// Write the artifact header: product label, generation timestamp, and the
/// schema-creation statement.
pub fn write_header(w: &mut impl Write, schema: &str) -> Result<()> {
    let generated = Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.f");
    writeln!(w, "-- {}", PRODUCT_LABEL).context("Failed to write artifact header")?;
    writeln!(w, "-- Generated: {}\n", generated).context("Failed to write artifact header")?;
    writeln!(w, "CREATE SCHEMA IF NOT EXISTS {}{}", schema, STATEMENT_TERMINATOR)
        .context("Failed to write schema statement")?;
    Ok(())
}

/// Write the comment line that separates the schema section from row data.
pub fn write_data_separator(w: &mut impl Write) -> Result<()> {
    writeln!(w, "\n{}\n", DATA_SEPARATOR).context("Failed to write data separator")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drops_comments_and_blanks() {
        let content = "-- header\n-- Generated: now\n\nCREATE SCHEMA IF NOT EXISTS dw;\n\n\
                       CREATE TABLE IF NOT EXISTS dw.t (\n  id integer\n);\n\n\
                       -- DATA\n\nINSERT INTO dw.t (id) VALUES (1);\n";
        let stmts = split_statements(content);
        assert_eq!(stmts.len(), 3);
        assert!(stmts[0].starts_with("CREATE SCHEMA"));
        assert!(stmts[1].starts_with("CREATE TABLE"));
        assert!(stmts[2].starts_with("INSERT"));
    }

    #[test]
    fn split_requires_terminator_and_newline_together() {
        // A bare semicolon mid-line is not a statement boundary
        let content = "INSERT INTO dw.t (v) VALUES ('a;b');\nINSERT INTO dw.t (v) VALUES (2);\n";
        let stmts = split_statements(content);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "INSERT INTO dw.t (v) VALUES ('a;b')");
    }

    #[test]
    fn classify_by_leading_keyword() {
        assert_eq!(
            classify("INSERT INTO dw.t (id) VALUES (1)"),
            StatementKind::Insert
        );
        assert_eq!(
            classify("CREATE TABLE IF NOT EXISTS dw.t (\n  id integer\n)"),
            StatementKind::CreateTable
        );
        assert_eq!(
            classify("CREATE SCHEMA IF NOT EXISTS dw"),
            StatementKind::CreateSchema
        );
        assert_eq!(classify("VACUUM"), StatementKind::Other);
    }

    #[test]
    fn insert_prefix_wins_over_embedded_create_text() {
        // Row data mentioning CREATE TABLE must still replay as an insert
        let stmt = "INSERT INTO dw.t (v) VALUES ('CREATE TABLE notes')";
        assert_eq!(classify(stmt), StatementKind::Insert);
    }

    #[test]
    fn header_layout() {
        let mut buf = Vec::new();
        write_header(&mut buf, "dw").unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), format!("-- {}", PRODUCT_LABEL));
        assert!(lines.next().unwrap().starts_with("-- Generated: "));
        assert!(text.contains("CREATE SCHEMA IF NOT EXISTS dw;\n"));
    }

    #[test]
    fn statements_glued_to_comment_lines_survive() {
        // The schema statement shares a fragment with the header comments,
        // and the first insert shares one with the -- DATA separator; both
        // must survive splitting or the replay would lose them.
        let mut buf = Vec::new();
        write_header(&mut buf, "dw").unwrap();
        write_data_separator(&mut buf).unwrap();
        buf.extend_from_slice(b"INSERT INTO dw.t (id) VALUES (1);\n");
        let text = String::from_utf8(buf).unwrap();
        let stmts = split_statements(&text);
        assert_eq!(
            stmts,
            vec![
                "CREATE SCHEMA IF NOT EXISTS dw",
                "INSERT INTO dw.t (id) VALUES (1)"
            ]
        );
    }

    #[test]
    fn comment_only_fragments_are_dropped() {
        let text = "-- just a note;\n-- another\n\n;\n";
        assert!(split_statements(text).is_empty());
    }
}
