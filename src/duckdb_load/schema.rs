use duckdb::types::Value;
use duckdb::Connection;

use crate::csv_load::Record;
use crate::duckdb_load::filters::{WIN_COLUMN, YEAR_COLUMN};
use crate::error::{LoadError, Result};

pub const YEAR_FILM_COLUMN: &str = "year_film";
pub const CEREMONY_COLUMN: &str = "ceremony";

// Column types the loader knows how to bind. Anything else is treated as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Double,
    Boolean,
    Text,
}

impl ColumnType {
    // Type of a source column when the table is first created. Only the
    // award's numeric and flag fields are typed, everything else stays text
    pub fn for_column(name: &str) -> ColumnType {
        match name {
            YEAR_COLUMN | YEAR_FILM_COLUMN | CEREMONY_COLUMN => ColumnType::Integer,
            WIN_COLUMN => ColumnType::Boolean,
            _ => ColumnType::Text,
        }
    }

    // Map a DuckDB data_type name from information_schema back onto a ColumnType
    pub fn from_sql_type(data_type: &str) -> ColumnType {
        let upper = data_type.to_ascii_uppercase();
        match upper.as_str() {
            "BIGINT" | "INTEGER" | "SMALLINT" | "TINYINT" | "HUGEINT" | "UBIGINT"
            | "UINTEGER" | "USMALLINT" | "UTINYINT" => ColumnType::Integer,
            "DOUBLE" | "FLOAT" | "REAL" => ColumnType::Double,
            "BOOLEAN" => ColumnType::Boolean,
            _ if upper.starts_with("DECIMAL") => ColumnType::Double,
            _ => ColumnType::Text,
        }
    }

    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Text => "VARCHAR",
        }
    }

    /// The value stored in place of a missing cell.
    ///
    /// NULLs never compare equal under a UNIQUE constraint, so missing cells are
    /// written as zero in the column's own type to keep duplicates detectable.
    pub fn sentinel(self) -> Value {
        match self {
            ColumnType::Integer => Value::BigInt(0),
            ColumnType::Double => Value::Double(0.0),
            ColumnType::Boolean => Value::Boolean(false),
            ColumnType::Text => Value::Text("0".to_string()),
        }
    }

    // Convert a raw cell, substituting the sentinel for missing values
    pub fn to_value(self, column: &str, cell: Option<&str>) -> Result<Value> {
        let Some(raw) = cell else {
            return Ok(self.sentinel());
        };

        let invalid = |expected: &'static str| LoadError::InvalidValue {
            column: column.to_string(),
            value: raw.to_string(),
            expected,
        };

        match self {
            ColumnType::Integer => parse_integer(raw)
                .map(Value::BigInt)
                .ok_or_else(|| invalid("integer")),
            ColumnType::Double => parse_double(raw)
                .map(Value::Double)
                .ok_or_else(|| invalid("number")),
            ColumnType::Boolean => parse_bool(raw)
                .map(Value::Boolean)
                .ok_or_else(|| invalid("boolean")),
            ColumnType::Text => Ok(Value::Text(raw.to_string())),
        }
    }
}

pub(crate) fn parse_integer(cell: &str) -> Option<i64> {
    lexical_core::parse::<i64>(cell.trim().as_bytes()).ok()
}

pub(crate) fn parse_double(cell: &str) -> Option<f64> {
    lexical_core::parse::<f64>(cell.trim().as_bytes())
        .ok()
        .filter(|v| v.is_finite())
}

// Accepts the pandas-style True/False as well as 1/0
pub(crate) fn parse_bool(cell: &str) -> Option<bool> {
    let cell = cell.trim();
    if cell.eq_ignore_ascii_case("true") || cell == "1" {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") || cell == "0" {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column layout of the destination table, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    table_name: String,
    columns: Vec<(String, ColumnType)>,
}

impl TableSchema {
    pub fn new(table_name: &str, columns: Vec<(String, ColumnType)>) -> Self {
        Self {
            table_name: table_name.to_string(),
            columns,
        }
    }

    // Layout for a new table, taken from the source header alone
    pub fn from_headers(table_name: &str, headers: &[String]) -> Self {
        let columns = headers
            .iter()
            .map(|name| (name.clone(), ColumnType::for_column(name)))
            .collect();
        Self::new(table_name, columns)
    }

    // Read the schema of an existing table, None if the table is absent
    pub fn load(conn: &Connection, table_name: &str) -> Result<Option<Self>> {
        let query = "
        SELECT column_name, data_type
        FROM information_schema.columns
        WHERE table_name = ?
        ORDER BY ordinal_position";

        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([table_name])?;
        let mut columns = Vec::new();

        while let Some(row) = rows.next()? {
            let column_name: String = row.get(0)?;
            let data_type: String = row.get(1)?;
            columns.push((column_name, ColumnType::from_sql_type(&data_type)));
        }

        if columns.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self::new(table_name, columns)))
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[(String, ColumnType)] {
        &self.columns
    }

    pub fn quoted_table(&self) -> String {
        quote_ident(&self.table_name)
    }

    pub fn quoted_columns(&self) -> String {
        self.columns
            .iter()
            .map(|(name, _)| quote_ident(name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // The whole row is the natural key
    pub fn create_table_sql(&self) -> String {
        let definitions = self
            .columns
            .iter()
            .map(|(name, column_type)| format!("{} {}", quote_ident(name), column_type.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({}, UNIQUE ({}));",
            self.quoted_table(),
            definitions,
            self.quoted_columns()
        )
    }

    /// Lay out records in table column order, converting and normalizing every cell.
    ///
    /// Table columns the source does not carry are filled with their sentinel.
    pub fn prepare_rows(&self, headers: &[String], records: &[&Record]) -> Result<Vec<Vec<Value>>> {
        if let Some(unknown) = headers
            .iter()
            .find(|h| !self.columns.iter().any(|(name, _)| name == *h))
        {
            return Err(LoadError::UnknownColumn {
                column: unknown.clone(),
                table: self.table_name.clone(),
            });
        }

        let source_positions = self
            .columns
            .iter()
            .map(|(name, _)| headers.iter().position(|h| h == name))
            .collect::<Vec<_>>();

        records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .zip(&source_positions)
                    .map(|((name, column_type), &position)| {
                        let cell = position.and_then(|idx| record.get(idx));
                        column_type.to_value(name, cell)
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[&str]) -> Record {
        Record::new(
            cells
                .iter()
                .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                .collect(),
        )
    }

    #[test]
    fn test_column_types_follow_header_names() {
        let headers = ["year_film", "year_award", "ceremony", "category", "nominee", "film", "win"]
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
        let schema = TableSchema::from_headers("gg_awards", &headers);
        let types = schema.columns().iter().map(|(_, t)| *t).collect::<Vec<_>>();
        assert_eq!(
            types,
            vec![
                ColumnType::Integer,
                ColumnType::Integer,
                ColumnType::Integer,
                ColumnType::Text,
                ColumnType::Text,
                ColumnType::Text,
                ColumnType::Boolean,
            ]
        );
    }

    #[test]
    fn test_numeric_looking_titles_stay_text() {
        assert_eq!(ColumnType::for_column("film"), ColumnType::Text);
        assert_eq!(
            ColumnType::for_column("film").to_value("film", Some("1917")).unwrap(),
            Value::Text("1917".to_string())
        );
    }

    #[test]
    fn test_sentinel_per_type() {
        assert_eq!(ColumnType::Integer.to_value("c", None).unwrap(), Value::BigInt(0));
        assert_eq!(ColumnType::Double.to_value("c", None).unwrap(), Value::Double(0.0));
        assert_eq!(ColumnType::Boolean.to_value("c", None).unwrap(), Value::Boolean(false));
        assert_eq!(
            ColumnType::Text.to_value("c", None).unwrap(),
            Value::Text("0".to_string())
        );
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let err = ColumnType::Integer.to_value("year_award", Some("soon")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { ref column, expected: "integer", .. } if column == "year_award"
        ));
    }

    #[test]
    fn test_create_table_sql_has_full_row_unique_constraint() {
        let schema = TableSchema::new(
            "gg_awards",
            vec![
                ("year_award".to_string(), ColumnType::Integer),
                ("win".to_string(), ColumnType::Boolean),
            ],
        );
        assert_eq!(
            schema.create_table_sql(),
            "CREATE TABLE IF NOT EXISTS \"gg_awards\" (\"year_award\" BIGINT, \"win\" BOOLEAN, UNIQUE (\"year_award\", \"win\"));"
        );
    }

    #[test]
    fn test_prepare_rows_reorders_and_fills_sentinels() {
        let schema = TableSchema::new(
            "gg_awards",
            vec![
                ("year_award".to_string(), ColumnType::Integer),
                ("film".to_string(), ColumnType::Text),
                ("win".to_string(), ColumnType::Boolean),
            ],
        );
        let headers = vec!["win".to_string(), "year_award".to_string()];
        let r = record(&["True", "1995"]);
        let rows = schema.prepare_rows(&headers, &[&r]).unwrap();
        assert_eq!(
            rows,
            vec![vec![
                Value::BigInt(1995),
                Value::Text("0".to_string()),
                Value::Boolean(true)
            ]]
        );
    }

    #[test]
    fn test_prepare_rows_rejects_unknown_column() {
        let schema = TableSchema::new("gg_awards", vec![("win".to_string(), ColumnType::Boolean)]);
        let headers = vec!["win".to_string(), "nominee".to_string()];
        let r = record(&["True", "Someone"]);
        let err = schema.prepare_rows(&headers, &[&r]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownColumn { ref column, .. } if column == "nominee"));
    }
}
