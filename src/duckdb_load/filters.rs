use crate::csv_load::{Batch, Record};
use crate::duckdb_load::schema::{parse_bool, parse_integer};
use crate::error::{LoadError, Result};

pub const WIN_COLUMN: &str = "win";
pub const YEAR_COLUMN: &str = "year_award";

/// Row filters applied to every batch before it is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchFilters {
    pub year: Option<i64>,
    pub winners_only: bool,
}

impl BatchFilters {
    // Keep the records that pass every active filter, in batch order
    pub fn select<'a>(&self, batch: &'a Batch) -> Result<Vec<&'a Record>> {
        let win_index = if self.winners_only {
            Some(required_column(batch, WIN_COLUMN)?)
        } else {
            None
        };
        let year_filter = match self.year {
            Some(year) => Some((required_column(batch, YEAR_COLUMN)?, year)),
            None => None,
        };

        let kept = batch
            .records()
            .iter()
            .filter(|record| match win_index {
                // A missing win flag counts as a loss
                Some(idx) => record.get(idx).and_then(parse_bool).unwrap_or(false),
                None => true,
            })
            .filter(|record| match year_filter {
                Some((idx, year)) => record.get(idx).and_then(parse_integer) == Some(year),
                None => true,
            })
            .collect();

        Ok(kept)
    }
}

fn required_column(batch: &Batch, name: &str) -> Result<usize> {
    batch
        .column_index(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}
