//! Tabular command output
//!
//! A [`Table`] is the structured form of one command's output: an ordered
//! set of unique column names plus rows of equal arity. Tables are
//! read-only inputs to the diff engine; nothing here mutates them after
//! construction.

use crate::error::{Error, Result};
use crate::value::Value;

/// One command's output as a table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, enforcing the shape invariants.
    ///
    /// Column names must be unique and every row must have exactly one
    /// cell per column. Violations are format errors: the snapshot file
    /// that produced them cannot be compared.
    pub fn new(header: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Table> {
        for (i, name) in header.iter().enumerate() {
            if header[..i].contains(name) {
                return Err(Error::Format(format!("duplicate column name: {}", name)));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(Error::Format(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    header.len()
                )));
            }
        }
        Ok(Table { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.header.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c == name)
    }

    /// Two tables are comparable only when their headers are identical:
    /// same names, same order.
    pub fn same_schema(&self, other: &Table) -> bool {
        self.header == other.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Value> {
        cells.iter().map(|c| Value::Text(c.to_string())).collect()
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn accepts_well_formed_rows() {
        let t = Table::new(
            header(&["NETWORK", "MASK"]),
            vec![row(&["10.0.0.0", "24"]), row(&["10.1.0.0", "16"])],
        )
        .unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.column_index("MASK"), Some(1));
        assert_eq!(t.column_index("NEXT_HOP"), None);
    }

    #[test]
    fn rejects_arity_mismatch() {
        let err = Table::new(
            header(&["NETWORK", "MASK"]),
            vec![row(&["10.0.0.0", "24"]), row(&["10.1.0.0"])],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Table::new(header(&["NETWORK", "NETWORK"]), vec![]).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn schema_comparison_is_order_sensitive() {
        let a = Table::new(header(&["A", "B"]), vec![]).unwrap();
        let b = Table::new(header(&["B", "A"]), vec![]).unwrap();
        let c = Table::new(header(&["A", "B"]), vec![]).unwrap();
        assert!(!a.same_schema(&b));
        assert!(a.same_schema(&c));
    }
}
