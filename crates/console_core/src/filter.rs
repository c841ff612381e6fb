//! Case-insensitive substring search over a kind's search fields.

use shared::domain::Record;

pub fn matches(record: &Record, fields: &[&str], query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .any(|field| record.field_text(field).to_lowercase().contains(&needle))
}

/// Keeps snapshot order. Accepts either a slice of records or a previous
/// result, so filters compose.
pub fn filter<'a, I>(records: I, fields: &[&str], query: &str) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| matches(record, fields, query))
        .collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
