use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Metric – one of the three engagement columns
// ---------------------------------------------------------------------------

/// An engagement metric attributed to a deputy's social-media presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Followers,
    Likes,
    Views,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Followers, Metric::Likes, Metric::Views];

    /// Canonical CSV header for this metric.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Followers => "seguidores_twitter",
            Metric::Likes => "curtidas_instagram",
            Metric::Views => "visualizacoes_tiktok",
        }
    }

    /// Headers accepted on input besides the canonical one.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Metric::Followers => &["follower_count", "seguidores"],
            Metric::Likes => &["like_count", "curtidas"],
            Metric::Views => &["view_count", "visualizacoes"],
        }
    }

    pub fn platform(self) -> &'static str {
        match self {
            Metric::Followers => "Twitter",
            Metric::Likes => "Instagram",
            Metric::Views => "TikTok",
        }
    }

    /// Axis / chart caption, e.g. "Seguidores no Twitter".
    pub fn caption(self) -> &'static str {
        match self {
            Metric::Followers => "Seguidores no Twitter",
            Metric::Likes => "Curtidas no Instagram",
            Metric::Views => "Visualizações no TikTok",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// DeputyRecord – one row of the normalized table
// ---------------------------------------------------------------------------

/// A deputy with the three engagement metrics already coerced.
///
/// Serializes with the canonical headers so the export writer can hand the
/// record straight to `csv::Writer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeputyRecord {
    #[serde(rename = "nome_deputado")]
    pub name: Option<String>,
    #[serde(rename = "partido")]
    pub party: Option<String>,
    #[serde(rename = "uf")]
    pub state: Option<String>,
    #[serde(rename = "seguidores_twitter")]
    pub follower_count: u64,
    #[serde(rename = "curtidas_instagram")]
    pub like_count: u64,
    #[serde(rename = "visualizacoes_tiktok")]
    pub view_count: u64,
}

impl DeputyRecord {
    pub fn metric(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Followers => self.follower_count,
            Metric::Likes => self.like_count,
            Metric::Views => self.view_count,
        }
    }

    pub fn set_metric(&mut self, metric: Metric, value: u64) {
        match metric {
            Metric::Followers => self.follower_count = value,
            Metric::Likes => self.like_count = value,
            Metric::Views => self.view_count = value,
        }
    }

    /// Name for display; missing names render as an empty string.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// DeputyTable – the complete normalized table
// ---------------------------------------------------------------------------

/// All deputies of one load, with the dropdown domains pre-computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeputyTable {
    pub rows: Vec<DeputyRecord>,
    /// Distinct non-missing states, sorted.
    pub states: BTreeSet<String>,
    /// Distinct non-missing parties, sorted.
    pub parties: BTreeSet<String>,
}

impl DeputyTable {
    pub fn from_rows(rows: Vec<DeputyRecord>) -> Self {
        let states = rows.iter().filter_map(|r| r.state.clone()).collect();
        let parties = rows.iter().filter_map(|r| r.party.clone()).collect();
        DeputyTable {
            rows,
            states,
            parties,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// One row of the semicolon-separated engagement-post export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRecord {
    /// `None` when the source date could not be parsed.
    pub date: Option<NaiveDateTime>,
    pub network: Option<String>,
    pub parliamentarian: Option<String>,
    pub total_engagement: u64,
    /// "Top 50 posts" column, passed through untouched.
    pub rank: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTable {
    pub rows: Vec<PostRecord>,
    /// Distinct non-missing network names, sorted.
    pub networks: BTreeSet<String>,
}

impl PostTable {
    pub fn from_rows(rows: Vec<PostRecord>) -> Self {
        let networks = rows.iter().filter_map(|r| r.network.clone()).collect();
        PostTable { rows, networks }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Group digits in thousands with commas: `1234567` → `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
