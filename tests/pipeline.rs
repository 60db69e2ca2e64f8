use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use catalog_explorer::data::loader::load_file;
use catalog_explorer::data::model::{MOVIE, TV_SHOW};
use catalog_explorer::{
    run_query, Bounds, CatalogSource, FilterCriteria, Selection, SortKey, SummaryLimits,
    TitleRecord,
};

const CATALOG: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description
s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries,\"As her father nears the end of his life, a filmmaker stages his death.\"
s2,TV Show,Blood & Water,,\"Ama Qamata, Khosi Ngema\",South Africa,\"September 24, 2021\",2021,TV-MA,2 Seasons,\"International TV Shows, TV Dramas, TV Mysteries\",Two teens discover they may be sisters.
s3,TV Show,Ganglands,Julien Leclercq,Sami Bouajila,,\"September 24, 2021\",2021,TV-MA,1 Season,\"Crime TV Shows, International TV Shows, TV Action & Adventure\",A protector of a family fights back.
s4,Movie,Sankofa,Haile Gerima,Kofi Ghanaba,\"United States, Ghana, Burkina Faso\",\"September 24, 2021\",1993,TV-MA,125 min,\"Dramas, Independent Movies, International Movies\",An American model is transported back in time.
s5,Movie,The Starling,Theodore Melfi,Melissa McCarthy,United States,\"September 24, 2021\",2021,PG-13,104 min,\"Comedies, Dramas\",A woman adjusting to life after a loss.
s6,Movie,Short Cut,,,India,someday,2019,,89 min,Comedies,Too short for the filter.
s7,Movie,Epic Night,,,India,\"March 1, 2017\",2019,R,151 min,\"Action & Adventure, Comedies\",Too long for the filter.
s8,TV Show,Kota Factory,,,India,\"December 24, 2019\",2019,TV-MA,2 Seasons,\"International TV Shows, TV Comedies\",Students prepare for exams.
";

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// The exported field subset, for comparing records across a round trip.
fn fields(rec: &TitleRecord) -> Vec<Option<String>> {
    vec![
        rec.show_id.clone(),
        rec.kind.clone(),
        rec.title.clone(),
        rec.director.clone(),
        rec.cast.clone(),
        rec.country.clone(),
        rec.date_added_raw.clone(),
        rec.release_year.map(|y| y.to_string()),
        rec.rating.clone(),
        rec.duration.clone(),
        rec.listed_in.clone(),
        rec.description.clone(),
    ]
}

fn load(path: &Path) -> catalog_explorer::TitleStore {
    load_file(path).unwrap()
}

#[test]
fn filter_then_export_round_trips() {
    let dir = TempDir::new().unwrap();
    let mut source = CatalogSource::new(write(&dir, "catalog.csv", CATALOG.as_bytes()), 1000);
    let store = source.store().unwrap();

    let criteria = FilterCriteria {
        types: Selection::only([MOVIE, TV_SHOW]),
        year_range: Some(Bounds::new(2019, 2021)),
        sort: SortKey::TitleAsc,
        ..Default::default()
    };
    let outcome = run_query(&store, &criteria, &SummaryLimits::default()).unwrap();
    assert_eq!(outcome.view.len(), 6);

    let exported = dir.path().join("filtered.csv");
    outcome.view.export(&exported).unwrap();
    let reloaded = load(&exported);

    let original: Vec<_> = outcome.view.iter().map(fields).collect();
    let round_trip: Vec<_> = reloaded.records().iter().map(fields).collect();
    assert_eq!(original, round_trip);
}

#[test]
fn duration_filter_keeps_only_movies_in_window() {
    let dir = TempDir::new().unwrap();
    let store = load(&write(&dir, "catalog.csv", CATALOG.as_bytes()));

    let criteria = FilterCriteria {
        duration_range: Some(Bounds::new(90, 150)),
        ..Default::default()
    };
    let outcome = run_query(&store, &criteria, &SummaryLimits::default()).unwrap();
    let titles: Vec<&str> = outcome
        .view
        .iter()
        .filter_map(|r| r.title.as_deref())
        .collect();

    assert_eq!(titles, vec!["The Starling", "Dick Johnson Is Dead", "Sankofa"]);
    assert!(outcome.view.iter().all(|r| r.is_movie()));
}

#[test]
fn summary_over_whole_catalog() {
    let dir = TempDir::new().unwrap();
    let store = load(&write(&dir, "catalog.csv", CATALOG.as_bytes()));
    let outcome = run_query(&store, &FilterCriteria::default(), &SummaryLimits::default()).unwrap();
    let summary = &outcome.summary;

    assert_eq!(summary.total_count, 8);
    assert_eq!(summary.movie_count, 5);
    assert_eq!(summary.tv_show_count, 3);
    // "someday" is not a date.
    assert_eq!(summary.count_by_year.values().sum::<usize>(), 7);
    // Tied at 3; the show genre is met first in release-year order.
    assert_eq!(summary.top_genres[0].key, "International TV Shows");
    assert_eq!(summary.top_genres[0].count, 3);
    assert_eq!(summary.top_genres[1].key, "Comedies");
    assert_eq!(summary.top_genres[1].count, 3);
    assert_eq!(summary.top_countries[0].key, "India");
    assert_eq!(summary.top_countries[0].count, 3);
    assert!(summary
        .top_countries
        .iter()
        .any(|c| c.key == "United States, Ghana, Burkina Faso" && c.count == 1));
    assert_eq!(summary.preview[0].title, "Blood & Water");
}

#[test]
fn latin1_catalog_loads() {
    let dir = TempDir::new().unwrap();
    let mut bytes = b"type,title,date_added,release_year,rating,duration,listed_in,country,description\nMovie,Am".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"lie,2020-01-01,2001,R,122 min,Romantic Movies,France,Paris\n");
    let store = load(&write(&dir, "latin1.csv", &bytes));

    assert_eq!(store.records()[0].title.as_deref(), Some("Amélie"));
    let search = FilterCriteria {
        title_query: Some("AMÉLIE".to_string()),
        ..Default::default()
    };
    assert_eq!(run_query(&store, &search, &SummaryLimits::default()).unwrap().view.len(), 1);
}

#[test]
fn json_and_csv_agree() {
    let dir = TempDir::new().unwrap();
    let json = r#"[
        {"show_id": "s1", "type": "Movie", "title": "Dick Johnson Is Dead", "director": "Kirsten Johnson",
         "cast": null, "country": "United States", "date_added": "September 25, 2021", "release_year": 2020,
         "rating": "PG-13", "duration": "90 min", "listed_in": "Documentaries",
         "description": "As her father nears the end of his life, a filmmaker stages his death."}
    ]"#;
    let from_json = load(&write(&dir, "catalog.json", json.as_bytes()));
    let from_csv = load(&write(&dir, "catalog.csv", CATALOG.as_bytes()));

    assert_eq!(fields(&from_json.records()[0]), fields(&from_csv.records()[0]));
}

#[test]
fn parquet_catalog_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.parquet");

    let text = |values: Vec<Option<&str>>| -> ArrayRef { Arc::new(StringArray::from(values)) };
    let schema = Arc::new(Schema::new(vec![
        Field::new("type", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("date_added", DataType::Utf8, true),
        Field::new("release_year", DataType::Int64, false),
        Field::new("rating", DataType::Utf8, true),
        Field::new("duration", DataType::Utf8, true),
        Field::new("listed_in", DataType::Utf8, true),
        Field::new("country", DataType::Utf8, true),
        Field::new("description", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(vec![Some(MOVIE), Some(TV_SHOW)]),
            text(vec![Some("Sankofa"), None]),
            text(vec![Some("September 24, 2021"), None]),
            Arc::new(Int64Array::from(vec![1993, 2021])) as ArrayRef,
            text(vec![Some("TV-MA"), None]),
            text(vec![Some("125 min"), Some("1 Season")]),
            text(vec![Some("Dramas, Independent Movies"), Some("Docuseries")]),
            text(vec![Some("United States, Ghana"), None]),
            text(vec![Some("Time travel."), None]),
        ],
    )
    .unwrap();
    let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let store = load(&path);
    assert_eq!(store.len(), 2);
    let sankofa = &store.records()[0];
    assert_eq!(sankofa.release_year, Some(1993));
    assert_eq!(sankofa.year_added(), Some(2021));
    assert_eq!(sankofa.duration_minutes(), Some(125));
    let show = &store.records()[1];
    assert_eq!(show.title, None);
    assert_eq!(show.year_added(), None);

    // A missing title never matches a search.
    let search = FilterCriteria {
        title_query: Some("a".to_string()),
        ..Default::default()
    };
    let outcome = run_query(&store, &search, &SummaryLimits::default()).unwrap();
    assert_eq!(outcome.view.indices(), &[0]);
}
