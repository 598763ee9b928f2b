//! SQL statement splitting for multi-statement scripts and seed files.

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Split a SQL payload into individually executable statements.
///
/// Statements are parsed with the generic dialect; when parsing fails
/// (dialect-specific DDL, vendor extensions) the payload is split on
/// semicolons instead, dropping empty fragments.
pub fn split_statements(sql: &str) -> Vec<String> {
    let dialect = GenericDialect {};

    match Parser::parse_sql(&dialect, sql) {
        Ok(parsed) => parsed
            .into_iter()
            .map(|statement| format!("{};", statement))
            .collect(),
        Err(e) => {
            tracing::warn!("SQL parsing failed, using naive semicolon splitting: {}", e);
            sql.split(';')
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .map(|fragment| format!("{};", fragment))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_adjacent_statements() {
        let statements = split_statements("INSERT INTO a VALUES (1);INSERT INTO b VALUES (2);");
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("INSERT INTO a"));
        assert!(statements[1].starts_with("INSERT INTO b"));
    }

    #[test]
    fn single_statement_without_terminator() {
        let statements = split_statements("SELECT 1");
        assert_eq!(statements.len(), 1);
        assert!(statements[0].ends_with(';'));
    }

    #[test]
    fn empty_input_yields_no_statements() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("   \n  ").is_empty());
    }

    #[test]
    fn unparsable_input_falls_back_to_semicolon_splitting() {
        let statements = split_statements("definitely not sql; neither is this");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "definitely not sql;");
        assert_eq!(statements[1], "neither is this;");
    }

    #[test]
    fn fallback_drops_empty_fragments() {
        let statements = split_statements("definitely not sql;;  ;neither is this;");
        assert_eq!(statements.len(), 2);
    }
}
