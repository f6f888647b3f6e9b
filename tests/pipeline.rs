// tests/pipeline.rs
//
// Load → filter → rank → export over real files, without the UI.
//
use std::fs;
use std::path::PathBuf;

use deputy_viewer::data::cache::TableCache;
use deputy_viewer::data::export::to_csv_bytes;
use deputy_viewer::data::filter::{filtered_indices, top_n, Choice, FilterCriteria};
use deputy_viewer::data::loader::{load_deputies, load_joined, Loaded};
use deputy_viewer::data::model::{DeputyTable, Metric};
use deputy_viewer::data::source::{Source, Upload};

fn tmp(name: &str, body: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("{}_{name}", std::process::id()));
    fs::write(&p, body).unwrap();
    p
}

const DEPUTIES: &str = "\
nome_deputado,partido,uf,seguidores_twitter,curtidas_instagram,visualizacoes_tiktok
Ana Silva,PT,SP,1200,50,n/a
Bruno Costa,PL,RJ,800,,900
Carla Souza,PSOL,SP,,70,10
Diego Lima,PL,SP,3000,5,1
Elisa Santos,MDB,BA,20,20,20
";

#[test]
fn export_of_sp_filter_contains_only_sp_rows() {
    let path = tmp("deputy_viewer_pipeline_sp.csv", DEPUTIES);
    let table = load_deputies(&Source::File(path)).unwrap();

    let criteria = FilterCriteria {
        state: Choice::Only("SP".into()),
        ..Default::default()
    };
    let rows = filtered_indices(&table, &criteria);
    let out = String::from_utf8(to_csv_bytes(&table, &rows).unwrap()).unwrap();

    let mut reader = csv::Reader::from_reader(out.as_bytes());
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        [
            "nome_deputado",
            "partido",
            "uf",
            "seguidores_twitter",
            "curtidas_instagram",
            "visualizacoes_tiktok"
        ]
    );
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| &r[2] == "SP"));

    let names: Vec<&str> = records.iter().map(|r| r.get(0).unwrap()).collect();
    assert_eq!(names, ["Ana Silva", "Carla Souza", "Diego Lima"]);
    // "n/a" and blank cells were coerced on the way in
    assert_eq!(&records[0][5], "0");
    assert_eq!(&records[1][3], "0");
}

#[test]
fn ranking_after_filtering() {
    let path = tmp("deputy_viewer_pipeline_rank.csv", DEPUTIES);
    let table = load_deputies(&Source::File(path)).unwrap();

    let pl = FilterCriteria {
        party: Choice::Only("PL".into()),
        ..Default::default()
    };
    let rows = filtered_indices(&table, &pl);
    let top = top_n(&table, &rows, Metric::Views, 1);
    assert_eq!(table.rows[top[0]].display_name(), "Bruno Costa");

    let nobody = FilterCriteria {
        name_substring: "zzz".into(),
        ..Default::default()
    };
    let empty = filtered_indices(&table, &nobody);
    assert!(empty.is_empty());
    assert!(top_n(&table, &empty, Metric::Followers, 10).is_empty());
}

#[test]
fn joined_files_keep_every_deputy() {
    let deputies = tmp(
        "deputy_viewer_pipeline_left.csv",
        "nome_deputado,partido,uf\nAna Silva,PT,SP\nBruno Costa,PL,RJ\n",
    );
    let engagement = tmp(
        "deputy_viewer_pipeline_right.csv",
        "nome_deputado,seguidores_twitter\nAna Silva,77\n",
    );
    let table = load_joined(&Source::File(deputies), &Source::File(engagement)).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].follower_count, 77);
    assert_eq!(table.rows[1].follower_count, 0);
}

#[test]
fn cached_and_fresh_loads_agree() {
    let src = Source::Upload(Upload::new("up.csv", DEPUTIES.as_bytes().to_vec()));
    let mut cache: TableCache<DeputyTable> = TableCache::default();

    let cached = cache.get_or_load(src.key(), || load_deputies(&src)).unwrap();
    let again = cache.get_or_load(src.key(), || load_deputies(&src)).unwrap();
    let fresh = load_deputies(&src).unwrap();

    assert_eq!(*cached, fresh);
    assert!(std::sync::Arc::ptr_eq(&cached, &again));
}

#[test]
fn unreadable_source_is_empty_with_message() {
    let loaded: Loaded<DeputyTable> =
        load_deputies(&Source::File("/nope/engajamentodeputados.csv".into())).into();
    assert!(loaded.table.is_empty());
    assert!(loaded.error.is_some());
}
