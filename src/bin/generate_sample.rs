use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const GENRES: [&str; 8] = [
    "Dramas",
    "Comedies",
    "Documentaries",
    "Action & Adventure",
    "International Movies",
    "Thrillers",
    "Romantic Movies",
    "Independent Movies",
];

const SHOW_GENRES: [&str; 5] = [
    "TV Dramas",
    "TV Comedies",
    "International TV Shows",
    "Docuseries",
    "Crime TV Shows",
];

const COUNTRIES: [&str; 7] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "United States, India",
    "France, Belgium",
];

const RATINGS: [&str; 7] = ["TV-MA", "TV-14", "TV-PG", "R", "PG-13", "PG", "TV-Y7"];

const WORDS: [&str; 12] = [
    "Midnight", "River", "Secret", "Glass", "Kingdom", "Summer", "Last", "Iron", "Garden",
    "Echo", "Paper", "Crown",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    /// `true` with probability `1 / n`.
    fn one_in(&mut self, n: u64) -> bool {
        self.below(n) == 0
    }
}

/// One generated catalog row, columns in catalog order.
struct SampleTitle {
    show_id: String,
    kind: &'static str,
    title: String,
    country: Option<&'static str>,
    date_added: Option<String>,
    release_year: i64,
    rating: Option<&'static str>,
    duration: String,
    listed_in: String,
    description: String,
}

fn generate_title(i: usize, rng: &mut SimpleRng) -> SampleTitle {
    let is_movie = !rng.one_in(3);
    let title = format!("{} {}", rng.pick(&WORDS), rng.pick(&WORDS));
    let release_year = 1990 + rng.below(32) as i64;

    let added_year = 2008 + rng.below(14);
    let date_added = if rng.one_in(40) {
        None
    } else {
        let month = rng.pick(&MONTHS);
        let day = 1 + rng.below(28);
        Some(format!("{month} {day}, {added_year}"))
    };

    let pool: &[&str] = if is_movie { &GENRES } else { &SHOW_GENRES };
    let first = rng.pick(pool);
    let second = rng.pick(pool);
    let listed_in = if first == second {
        first.to_string()
    } else {
        format!("{first}, {second}")
    };

    let duration = if is_movie {
        format!("{} min", 60 + rng.below(120))
    } else {
        match 1 + rng.below(6) {
            1 => "1 Season".to_string(),
            n => format!("{n} Seasons"),
        }
    };

    SampleTitle {
        show_id: format!("s{}", i + 1),
        kind: if is_movie { "Movie" } else { "TV Show" },
        description: format!("A generated story about {}.", title.to_lowercase()),
        title,
        country: (!rng.one_in(10)).then(|| rng.pick(&COUNTRIES)),
        date_added,
        release_year,
        rating: (!rng.one_in(50)).then(|| rng.pick(&RATINGS)),
        duration,
        listed_in,
    }
}

fn main() {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let titles: Vec<SampleTitle> = (0..500).map(|i| generate_title(i, &mut rng)).collect();

    // Build Arrow arrays
    let strings = |f: &dyn Fn(&SampleTitle) -> Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(titles.iter().map(f).collect::<Vec<_>>()))
    };
    let none = |_: &SampleTitle| None::<String>;

    let schema = Arc::new(Schema::new(vec![
        Field::new("show_id", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("director", DataType::Utf8, true),
        Field::new("cast", DataType::Utf8, true),
        Field::new("country", DataType::Utf8, true),
        Field::new("date_added", DataType::Utf8, true),
        Field::new("release_year", DataType::Int64, false),
        Field::new("rating", DataType::Utf8, true),
        Field::new("duration", DataType::Utf8, true),
        Field::new("listed_in", DataType::Utf8, true),
        Field::new("description", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(&|t| Some(t.show_id.clone())),
            strings(&|t| Some(t.kind.to_string())),
            strings(&|t| Some(t.title.clone())),
            strings(&none),
            strings(&none),
            strings(&|t| t.country.map(str::to_string)),
            strings(&|t| t.date_added.clone()),
            Arc::new(Int64Array::from(
                titles.iter().map(|t| t.release_year).collect::<Vec<_>>(),
            )) as ArrayRef,
            strings(&|t| t.rating.map(str::to_string)),
            strings(&|t| Some(t.duration.clone())),
            strings(&|t| Some(t.listed_in.clone())),
            strings(&|t| Some(t.description.clone())),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_titles.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // Same rows as CSV, via the loader/export round trip
    let store = catalog_explorer::data::loader::load_file(std::path::Path::new(output_path))
        .expect("Failed to reload generated parquet");
    let csv_path = "sample_titles.csv";
    catalog_explorer::data::export::export_file(std::path::Path::new(csv_path), store.records())
        .expect("Failed to write CSV");

    println!(
        "Wrote {} titles to {output_path} and {csv_path}",
        titles.len()
    );
}
