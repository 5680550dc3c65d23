//! Column projection for the sample table

use super::sample::SampleRecord;

/// Maximum number of columns shown in the sample table
pub const MAX_COLUMNS: usize = 8;

/// Derive the visible columns from the first record of a batch
///
/// Keys keep the record's natural order and are truncated to
/// [`MAX_COLUMNS`]. No record yields no columns.
pub fn project(first: Option<&SampleRecord>) -> Vec<String> {
    match first {
        Some(record) => record.keys().take(MAX_COLUMNS).map(str::to_string).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::FieldValue;

    fn record_with(n: usize) -> SampleRecord {
        SampleRecord::new(
            (0..n)
                .map(|i| (format!("f{}", n - i), FieldValue::from(i as i64)))
                .collect(),
        )
    }

    #[test]
    fn test_project_empty() {
        assert!(project(None).is_empty());
        assert!(project(Some(&SampleRecord::default())).is_empty());
    }

    #[test]
    fn test_project_length_is_bounded() {
        for n in [1, 3, 8, 9, 20] {
            let record = record_with(n);
            assert_eq!(project(Some(&record)).len(), n.min(MAX_COLUMNS));
        }
    }

    #[test]
    fn test_project_keeps_natural_order() {
        let record = record_with(10);
        let columns = project(Some(&record));
        assert_eq!(columns.first().map(String::as_str), Some("f10"));
        assert_eq!(columns.last().map(String::as_str), Some("f3"));
    }

    #[test]
    fn test_project_is_deterministic() {
        let record = record_with(12);
        assert_eq!(project(Some(&record)), project(Some(&record)));
    }
}
