//! Grouping/aggregation — collapse duplicate-keyed rows into one entry
//!
//! Device output routinely repeats a logical entry across several rows: an
//! ECMP route appears once per next hop, a neighbor once per address
//! family. Before two snapshots can be joined, each side is normalized so
//! that every grouping-key tuple occurs exactly once, with the non-key
//! columns aggregated into sets of distinct values. Both snapshots must go
//! through the same normalization or the join would compare unlike shapes.

use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::{Field, Value, ValueSet};
use std::collections::HashMap;

/// A table normalized for joining
///
/// Ephemeral: exists only for the duration of one comparison. Grouping
/// columns hold single values, all other columns hold value sets. Entry
/// order follows the first occurrence of each key in the source table.
#[derive(Debug, Clone)]
pub struct GroupedTable {
    header: Vec<String>,
    key_columns: Vec<String>,
    rows: Vec<GroupedRow>,
}

/// One aggregated entry, cells aligned to the grouped table's header
#[derive(Debug, Clone)]
pub struct GroupedRow {
    fields: Vec<Field>,
}

impl GroupedRow {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl GroupedTable {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn rows(&self) -> &[GroupedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c == name)
    }
}

/// Group a table by the given columns.
///
/// Rows sharing the same tuple of values at the grouping columns are
/// merged into one entry; every non-key column becomes the set of
/// distinct values observed across the partition. With no grouping
/// columns the rows pass through unchanged as single-row groups.
pub fn group(table: &Table, grouping: &[String]) -> Result<GroupedTable> {
    let header = table.header().to_vec();

    if grouping.is_empty() {
        let rows = table
            .rows()
            .iter()
            .map(|row| GroupedRow {
                fields: row.iter().cloned().map(Field::One).collect(),
            })
            .collect();
        return Ok(GroupedTable {
            header,
            key_columns: Vec::new(),
            rows,
        });
    }

    let key_indices: Vec<usize> = grouping
        .iter()
        .map(|name| {
            table
                .column_index(name)
                .ok_or_else(|| Error::Other(format!("unknown grouping column: {}", name)))
        })
        .collect::<Result<_>>()?;

    let mut is_key = vec![false; header.len()];
    for &i in &key_indices {
        is_key[i] = true;
    }

    let mut positions: HashMap<Vec<Value>, usize> = HashMap::new();
    let mut rows: Vec<GroupedRow> = Vec::new();

    for row in table.rows() {
        let key: Vec<Value> = key_indices.iter().map(|&i| row[i].clone()).collect();
        match positions.get(&key) {
            Some(&at) => {
                for (i, cell) in row.iter().enumerate() {
                    if is_key[i] {
                        continue;
                    }
                    if let Field::Many(set) = &mut rows[at].fields[i] {
                        set.insert(cell.clone());
                    }
                }
            }
            None => {
                positions.insert(key, rows.len());
                let fields = row
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        if is_key[i] {
                            Field::One(cell.clone())
                        } else {
                            Field::Many(ValueSet::singleton(cell.clone()))
                        }
                    })
                    .collect();
                rows.push(GroupedRow { fields });
            }
        }
    }

    log::debug!(
        "grouped {} rows into {} entries by {:?}",
        table.n_rows(),
        rows.len(),
        grouping
    );

    Ok(GroupedTable {
        header,
        key_columns: grouping.to_vec(),
        rows,
    })
}
