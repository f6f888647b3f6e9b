use chrono::NaiveDate;

use super::model::{DeputyTable, Metric, PostTable};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// A dropdown selection: either the "all" sentinel or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => value == Some(wanted.as_str()),
        }
    }

    pub fn label<'a>(&'a self, all_label: &'a str) -> &'a str {
        match self {
            Choice::All => all_label,
            Choice::Only(v) => v,
        }
    }
}

/// Deputy filters. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub state: Choice,
    pub party: Choice,
    /// Case-insensitive substring; empty disables the filter.
    pub name_substring: String,
}

/// Post filters: network plus an optional inclusive date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub network: Choice,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of deputies passing every active filter, in table order.
pub fn filtered_indices(table: &DeputyTable, criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.name_substring.to_lowercase();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            criteria.state.matches(row.state.as_deref())
                && criteria.party.matches(row.party.as_deref())
                && (needle.is_empty()
                    || row
                        .name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of posts passing the network and date filters.
///
/// A post without a parsed date never matches an active date range.
pub fn filtered_post_indices(table: &PostTable, filter: &PostFilter) -> Vec<usize> {
    let ranged = filter.from.is_some() || filter.to.is_some();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, post)| {
            if !filter.network.matches(post.network.as_deref()) {
                return false;
            }
            if !ranged {
                return true;
            }
            let Some(day) = post.date.map(|d| d.date()) else {
                return false;
            };
            filter.from.map_or(true, |from| day >= from) && filter.to.map_or(true, |to| day <= to)
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Stable descending selection of the `n` largest keys; ties keep the
/// incoming order.
fn largest_by(rows: &[usize], n: usize, key: impl Fn(usize) -> u64) -> Vec<usize> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|&a, &b| key(b).cmp(&key(a)));
    ranked.truncate(n);
    ranked
}

/// Top `n` deputies among `rows` by `metric`.
pub fn top_n(table: &DeputyTable, rows: &[usize], metric: Metric, n: usize) -> Vec<usize> {
    largest_by(rows, n, |i| table.rows[i].metric(metric))
}

/// Top `n` posts among `rows` by total engagement.
pub fn top_posts(table: &PostTable, rows: &[usize], n: usize) -> Vec<usize> {
    largest_by(rows, n, |i| table.rows[i].total_engagement)
}
