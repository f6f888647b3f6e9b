use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{DeputyRecord, DeputyTable, Metric, PostRecord, PostTable};
use super::source::Source;

pub const DEPUTY_DELIMITER: u8 = b',';
pub const POST_DELIMITER: u8 = b';';

const NAME_COLUMNS: &[&str] = &["nome_deputado", "nome", "Parlamentar", "name"];
const PARTY_COLUMNS: &[&str] = &["partido", "siglaPartido", "party"];
const STATE_COLUMNS: &[&str] = &["uf", "siglaUf", "state"];

const POST_DATE: &str = "Date";
const POST_NETWORK: &str = "Top 5 values of Network.keyword";
const POST_AUTHOR: &str = "Parlamentar";
const POST_ENGAGEMENT: &str = "Engajamento total";
const POST_RANK: &str = "Top 50 posts";
const POST_MESSAGE: &str = "Message";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The source could not be read at all. Single bad cells never produce one
/// of these: they are coerced to a default instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
    #[error("malformed CSV in {source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },
    #[error("{source_name} is empty")]
    Empty { source_name: String },
    #[error("{source_name} has no '{column}' column")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },
}

/// Result of a lenient load: a table (empty on failure) plus the reason it
/// is empty, if any. Callers treat an empty table as "no data available".
#[derive(Debug, Default)]
pub struct Loaded<T> {
    pub table: T,
    pub error: Option<LoadError>,
}

impl<T: Default> From<Result<T, LoadError>> for Loaded<T> {
    fn from(result: Result<T, LoadError>) -> Self {
        match result {
            Ok(table) => Loaded { table, error: None },
            Err(error) => Loaded {
                table: T::default(),
                error: Some(error),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Coerce a raw cell into a non-negative count. Empty, non-numeric,
/// non-finite and negative values become 0; fractions are truncated.
pub fn coerce_count(raw: &str) -> u64 {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u64>() {
        return n;
    }
    match s.parse::<f64>() {
        // `as` saturates at u64::MAX
        Ok(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

fn text(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Parse a post timestamp; unrecognised input yields `None`.
pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        // Kibana CSV export
        "%b %d, %Y @ %H:%M:%S%.f",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

struct Header {
    names: Vec<String>,
}

impl Header {
    fn read<R: std::io::Read>(
        reader: &mut csv::Reader<R>,
        source: &Source,
    ) -> Result<Self, LoadError> {
        let record = reader.headers().map_err(|error| LoadError::Csv {
            source_name: source.to_string(),
            error,
        })?;
        let names: Vec<String> = record
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        if names.iter().all(|n| n.is_empty()) {
            return Err(LoadError::Empty {
                source_name: source.to_string(),
            });
        }
        Ok(Header { names })
    }

    /// Index of the first candidate present; earlier candidates win.
    fn find(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|c| self.names.iter().position(|n| n == c))
    }

    fn find_metric(&self, metric: Metric) -> Option<usize> {
        self.find(&[metric.column()])
            .or_else(|| self.find(metric.aliases()))
    }
}

fn csv_reader<'a>(
    source: &'a Source,
    delimiter: u8,
) -> Result<csv::Reader<Box<dyn std::io::Read + 'a>>, LoadError> {
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(source.open()?))
}

// ---------------------------------------------------------------------------
// Deputies
// ---------------------------------------------------------------------------

/// Load and normalize a deputies table. Absent metric columns are filled
/// with 0, as are unparseable cells.
pub fn load_deputies(source: &Source) -> Result<DeputyTable, LoadError> {
    let rows = read_deputy_rows(source)?;
    log::info!("Loaded {} deputies from {source}", rows.len());
    Ok(DeputyTable::from_rows(rows))
}

/// Load deputies and left-join them with an engagement table on the name.
/// Metrics of the result come from the engagement side only.
pub fn load_joined(deputies: &Source, engagement: &Source) -> Result<DeputyTable, LoadError> {
    let left = read_deputy_rows(deputies)?;
    let right = read_deputy_rows(engagement)?;
    let rows = left_join(left, &right);
    log::info!(
        "Joined {deputies} with {engagement}: {} rows ({} engagement rows)",
        rows.len(),
        right.len()
    );
    Ok(DeputyTable::from_rows(rows))
}

fn read_deputy_rows(source: &Source) -> Result<Vec<DeputyRecord>, LoadError> {
    let mut reader = csv_reader(source, DEPUTY_DELIMITER)?;
    let header = Header::read(&mut reader, source)?;

    let name_idx = header.find(NAME_COLUMNS);
    let party_idx = header.find(PARTY_COLUMNS);
    let state_idx = header.find(STATE_COLUMNS);
    let metric_idx = Metric::ALL.map(|m| (m, header.find_metric(m)));

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|error| LoadError::Csv {
            source_name: source.to_string(),
            error,
        })?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i));

        let mut row = DeputyRecord {
            name: text(cell(name_idx)),
            party: text(cell(party_idx)),
            state: text(cell(state_idx)),
            ..Default::default()
        };
        for (metric, idx) in metric_idx {
            row.set_metric(metric, cell(idx).map(coerce_count).unwrap_or(0));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Left outer join on the trimmed name. Every deputy is kept; a deputy with
/// several engagement matches is repeated once per match.
pub fn left_join(deputies: Vec<DeputyRecord>, engagement: &[DeputyRecord]) -> Vec<DeputyRecord> {
    let mut by_name: HashMap<&str, Vec<&DeputyRecord>> = HashMap::new();
    for row in engagement {
        if let Some(name) = row.name.as_deref() {
            by_name.entry(name).or_default().push(row);
        }
    }

    let mut out = Vec::with_capacity(deputies.len());
    for deputy in deputies {
        let matches = deputy
            .name
            .as_deref()
            .and_then(|n| by_name.get(n))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if matches.is_empty() {
            let mut row = deputy;
            for metric in Metric::ALL {
                row.set_metric(metric, 0);
            }
            out.push(row);
            continue;
        }
        for m in matches {
            let mut row = deputy.clone();
            for metric in Metric::ALL {
                row.set_metric(metric, m.metric(metric));
            }
            out.push(row);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Load the semicolon-separated posts export. Only the parliamentarian
/// column is mandatory.
pub fn load_posts(source: &Source) -> Result<PostTable, LoadError> {
    let mut reader = csv_reader(source, POST_DELIMITER)?;
    let header = Header::read(&mut reader, source)?;

    let author_idx = header
        .find(&[POST_AUTHOR])
        .ok_or_else(|| LoadError::MissingColumn {
            source_name: source.to_string(),
            column: POST_AUTHOR,
        })?;
    let date_idx = header.find(&[POST_DATE]);
    let network_idx = header.find(&[POST_NETWORK]);
    let engagement_idx = header.find(&[POST_ENGAGEMENT]);
    let rank_idx = header.find(&[POST_RANK]);
    let message_idx = header.find(&[POST_MESSAGE]);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|error| LoadError::Csv {
            source_name: source.to_string(),
            error,
        })?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i));

        rows.push(PostRecord {
            date: cell(date_idx).and_then(parse_post_date),
            network: text(cell(network_idx)),
            parliamentarian: text(record.get(author_idx)),
            total_engagement: cell(engagement_idx).map(coerce_count).unwrap_or(0),
            rank: cell(rank_idx).unwrap_or_default().to_string(),
            message: cell(message_idx).unwrap_or_default().to_string(),
        });
    }
    log::info!("Loaded {} posts from {source}", rows.len());
    Ok(PostTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::Upload;
    use chrono::{Datelike, Timelike};

    fn upload(body: &str) -> Source {
        Source::Upload(Upload::new("test.csv", body.as_bytes().to_vec()))
    }

    #[test]
    fn coerce_count_defaults_to_zero() {
        assert_eq!(coerce_count("100"), 100);
        assert_eq!(coerce_count(" 42 "), 42);
        assert_eq!(coerce_count("12.9"), 12);
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count("-5"), 0);
        assert_eq!(coerce_count("NaN"), 0);
        assert_eq!(coerce_count("inf"), 0);
    }

    #[test]
    fn missing_metric_columns_are_zero_filled() {
        let src = upload("nome_deputado,partido,uf\nAna,PT,SP\nBeto,PL,RJ\n");
        let table = load_deputies(&src).unwrap();
        assert_eq!(table.len(), 2);
        for row in &table.rows {
            for metric in Metric::ALL {
                assert_eq!(row.metric(metric), 0);
            }
        }
    }

    #[test]
    fn scenario_followers_normalized() {
        let src = upload(
            "nome_deputado,partido,uf,seguidores_twitter\nA,PT,SP,100\nB,PL,RJ,0\nC,PSOL,MG,\n",
        );
        let table = load_deputies(&src).unwrap();
        let followers: Vec<u64> = table.rows.iter().map(|r| r.follower_count).collect();
        assert_eq!(followers, [100, 0, 0]);
    }

    #[test]
    fn aliases_and_bom_are_accepted() {
        let src = upload("\u{feff}nome,siglaPartido,siglaUf,follower_count\nAna,PT,SP,7\n");
        let table = load_deputies(&src).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.name.as_deref(), Some("Ana"));
        assert_eq!(row.party.as_deref(), Some("PT"));
        assert_eq!(row.state.as_deref(), Some("SP"));
        assert_eq!(row.follower_count, 7);
    }

    #[test]
    fn short_rows_and_blank_text_become_missing() {
        let src = upload("nome_deputado,partido,uf,curtidas_instagram\n  ,PT\n");
        let table = load_deputies(&src).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.name, None);
        assert_eq!(row.state, None);
        assert_eq!(row.like_count, 0);
    }

    #[test]
    fn empty_source_is_an_error() {
        assert!(matches!(
            load_deputies(&upload("")),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn loaded_turns_errors_into_empty_tables() {
        let loaded: Loaded<DeputyTable> =
            load_deputies(&Source::File("/no/such/file.csv".into())).into();
        assert!(loaded.table.is_empty());
        let msg = loaded.error.unwrap().to_string();
        assert!(msg.contains("/no/such/file.csv"), "{msg}");
    }

    #[test]
    fn left_join_keeps_every_deputy() {
        let deputies = upload("nome_deputado,partido,uf\nAna,PT,SP\nBeto,PL,RJ\nCaio,MDB,BA\n");
        let engagement = upload(
            "nome_deputado,seguidores_twitter,curtidas_instagram,visualizacoes_tiktok\n\
             Ana,10,20,30\nCaio,1,2,3\nCaio,4,5,6\nZeca,9,9,9\n",
        );
        let table = load_joined(&deputies, &engagement).unwrap();

        assert_eq!(table.len(), 4);
        let names: Vec<&str> = table.rows.iter().map(|r| r.display_name()).collect();
        assert_eq!(names, ["Ana", "Beto", "Caio", "Caio"]);

        let beto = &table.rows[1];
        assert_eq!((beto.follower_count, beto.like_count, beto.view_count), (0, 0, 0));
        assert_eq!(beto.party.as_deref(), Some("PL"));

        assert_eq!(table.rows[0].view_count, 30);
        assert_eq!(table.rows[3].follower_count, 4);
    }

    #[test]
    fn join_ignores_left_metrics() {
        let left = vec![DeputyRecord {
            name: Some("Ana".into()),
            follower_count: 500,
            ..Default::default()
        }];
        let right = vec![DeputyRecord {
            name: Some("Ana".into()),
            follower_count: 7,
            ..Default::default()
        }];
        assert_eq!(left_join(left.clone(), &right)[0].follower_count, 7);
        assert_eq!(left_join(left, &[])[0].follower_count, 0);
    }

    #[test]
    fn posts_parse_with_semicolons() {
        let src = upload(
            "Date;Top 5 values of Network.keyword;Parlamentar;Engajamento total;Top 50 posts;Message\n\
             2023-03-01 10:00:00;Instagram;Ana;1500;1;Olá\n\
             ontem;Twitter;Beto;muito;2;Oi\n",
        );
        let table = load_posts(&src).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.total_engagement, 1500);
        assert_eq!(first.network.as_deref(), Some("Instagram"));
        assert_eq!(first.message, "Olá");
        assert!(first.date.is_some());

        let second = &table.rows[1];
        assert_eq!(second.date, None);
        assert_eq!(second.total_engagement, 0);
        assert_eq!(table.networks.iter().collect::<Vec<_>>(), ["Instagram", "Twitter"]);
    }

    #[test]
    fn posts_require_parliamentarian_column() {
        let src = upload("Date;Message\n2023-01-01;x\n");
        assert!(matches!(
            load_posts(&src),
            Err(LoadError::MissingColumn { column: "Parlamentar", .. })
        ));
    }

    #[test]
    fn post_date_formats() {
        let kibana = parse_post_date("Jan 15, 2023 @ 14:22:01.000").unwrap();
        assert_eq!((kibana.year(), kibana.month(), kibana.day()), (2023, 1, 15));
        assert_eq!(kibana.hour(), 14);

        let br = parse_post_date("05/02/2024").unwrap();
        assert_eq!((br.day(), br.month()), (5, 2));

        assert!(parse_post_date("2024-02-05T08:30:00-03:00").is_some());
        assert!(parse_post_date("2024-02-05").is_some());
        assert_eq!(parse_post_date(""), None);
        assert_eq!(parse_post_date("31/31/2024"), None);
    }
}
