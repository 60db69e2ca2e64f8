//! Small hand-built catalogs shared by the unit tests.

use super::model::{RawTitle, TitleStore, MOVIE, TV_SHOW};

fn text(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

pub fn raw(kind: &str, title: &str, date: &str, duration: &str) -> RawTitle {
    RawTitle {
        kind: text(kind),
        title: text(title),
        date_added: text(date),
        release_year: Some("2020".to_string()),
        duration: text(duration),
        ..Default::default()
    }
}

#[allow(clippy::too_many_arguments)]
pub fn row(
    kind: &str,
    title: &str,
    date: &str,
    release_year: i32,
    rating: &str,
    duration: &str,
    listed_in: &str,
    country: &str,
) -> RawTitle {
    RawTitle {
        show_id: Some(format!("s-{title}")),
        kind: text(kind),
        title: text(title),
        country: text(country),
        date_added: text(date),
        release_year: Some(release_year.to_string()),
        rating: text(rating),
        duration: text(duration),
        listed_in: text(listed_in),
        description: text(&format!("About {title}")),
        ..Default::default()
    }
}

/// Eight titles covering every filter edge: a null date, a null rating,
/// a null country, a show, release-year ties and duration boundaries.
pub fn sample_store() -> TitleStore {
    TitleStore::from_raw(vec![
        row(MOVIE, "Zodiac Nights", "September 25, 2021", 2019, "PG-13", "90 min", "Dramas, Thrillers", "United States"),
        row(TV_SHOW, "Blood & Water", "September 24, 2021", 2021, "TV-MA", "2 Seasons", "International TV Shows, TV Dramas", "South Africa"),
        row(MOVIE, "apple Pie", "2019-03-01", 2019, "PG", "89 min", "Comedies", "United States, India"),
        row(MOVIE, "Midnight Run", "not a date", 2015, "R", "150 min", "Dramas, Comedies", "India"),
        row(TV_SHOW, "Kota Factory", "December 24, 2019", 2021, "", "1 Season", "International TV Shows, TV Comedies", "India"),
        row(MOVIE, "Long Haul", "January 1, 2016", 2017, "R", "151 min", "Dramas", ""),
        row(MOVIE, "Brief", "July 4, 2018", 2019, "PG", "", "Documentaries", "United States"),
        row(MOVIE, "Apple Core", "May 5, 2020", 2010, "TV-MA", "120 min", "Dramas,", "United States"),
    ])
}
