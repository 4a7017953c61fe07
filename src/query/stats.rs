//! Catalog statistics snapshot

use crate::core::record::Record;
use crate::core::schema::Schema;
use crate::query::aggregate::{average, count_by, numeric_range, sum, ValueCounts, ValueRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which fields feed the statistics snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Numeric field to total and average
    pub total_field: Option<String>,
    /// List fields to count distinct values over
    pub distinct_fields: Vec<String>,
    /// Numeric field to report a min/max range for
    pub range_field: Option<String>,
}

/// Read-only summary of a record collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    /// Distinct value count per configured list field
    pub distinct: BTreeMap<String, usize>,
    pub range: Option<ValueRange<f64>>,
    /// Records per status value; empty when the schema has no status field
    pub by_status: ValueCounts,
}

/// Compute the statistics snapshot for `records`
pub fn compute_stats<R: AsRef<Record>>(records: &[R], schema: &Schema, config: &StatsConfig) -> CatalogStats {
    let (total, avg) = match config.total_field.as_deref() {
        Some(field) => (sum(records, field), average(records, field)),
        None => (0.0, 0.0),
    };

    let distinct = config
        .distinct_fields
        .iter()
        .map(|field| (field.clone(), count_by(records, field).distinct()))
        .collect();

    let by_status = schema
        .status_field
        .as_deref()
        .map(|field| count_by(records, field))
        .unwrap_or_default();

    CatalogStats {
        count: records.len(),
        total,
        average: avg,
        distinct,
        range: config.range_field.as_deref().and_then(|f| numeric_range(records, f)),
        by_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::FieldValue;
    use pretty_assertions::assert_eq;

    fn config() -> StatsConfig {
        StatsConfig {
            total_field: Some("words".into()),
            distinct_fields: vec!["authors".into()],
            range_field: Some("year".into()),
        }
    }

    #[test]
    fn test_compute_stats() {
        let records = vec![
            Record::new("a", "a.md")
                .with_field("words", 1000.0)
                .with_field("year", 1928.0)
                .with_field("status", "done")
                .with_field("authors", FieldValue::list(["Lovecraft", "Bishop"])),
            Record::new("b", "b.md")
                .with_field("words", 3000.0)
                .with_field("year", 1935.0)
                .with_field("status", "done")
                .with_field("authors", FieldValue::list(["Lovecraft"])),
            Record::new("c", "c.md").with_field("status", "todo"),
        ];
        let schema = Schema::default().with_status_field("status");
        let stats = compute_stats(&records, &schema, &config());

        assert_eq!(stats.count, 3);
        assert_eq!(stats.total, 4000.0);
        assert_eq!(stats.average, 2000.0);
        assert_eq!(stats.distinct.get("authors"), Some(&2));
        assert_eq!(
            stats.range,
            Some(ValueRange {
                min: 1928.0,
                max: 1935.0
            })
        );
        assert_eq!(stats.by_status.get("done"), Some(2));
        assert_eq!(stats.by_status.get("todo"), Some(1));
        assert_eq!(stats.by_status.absent, 0);
    }

    #[test]
    fn test_empty_collection() {
        let records: Vec<Record> = Vec::new();
        let stats = compute_stats(&records, &Schema::default(), &config());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.total, 0.0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.distinct.get("authors"), Some(&0));
        assert_eq!(stats.range, None);
        assert!(stats.by_status.is_empty());
    }
}
