//! Query engine over record collections
//!
//! All primitives are pure: they take `&[R]` where `R` is a [`Record`] or a
//! borrowed `&Record`, and return a new collection or mapping. Inputs are
//! never mutated, so one collection can feed any number of queries.
//!
//! [`Record`]: crate::core::Record

pub mod aggregate;
pub mod filter;
pub mod group;
pub mod sort;
pub mod stats;

pub use aggregate::{average, count_by, date_range, most_common, numeric_range, sum, ValueCounts, ValueRange};
pub use filter::{
    filter_all, filter_by, filter_date_range, filter_equals, filter_includes, filter_number_range, FilterClause,
    FilterOp,
};
pub use group::{
    flatten_groups, group_by_field, group_by_keys, group_by_list_field, group_by_month, group_by_status,
    group_by_year, Group, GroupKey,
};
pub use sort::{compare_values, sort_by_field, sort_by_fields, SortDirection, SortSpec};
pub use stats::{compute_stats, CatalogStats, StatsConfig};
