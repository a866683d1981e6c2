//! CSV dataset discovery and decoding.
//!
//! Candidate files are tried in order. A missing candidate is skipped; an
//! existing one is decoded with each [`TextEncoding`] in turn and the first
//! successful decode wins.

use std::path::{Path, PathBuf};

use crate::records::RawRestaurantRow;
use crate::LoadError;

/// Candidate dataset file names, in priority order.
pub const DEFAULT_DATASET_FILES: &[&str] = &["dataset.csv", "zomato.csv"];

/// Text encodings attempted for each candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Decodes every byte sequence, so it always ends the attempt order.
    Latin1,
}

impl TextEncoding {
    /// Attempt order used by [`load_csv_dataset`].
    pub const ALL: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

    /// Decode `bytes`, returning `None` if they are not valid in this encoding.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let text = std::str::from_utf8(bytes).ok()?;
                Some(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Latin1 => write!(f, "latin1"),
        }
    }
}

/// A decoded dataset together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub path: PathBuf,
    pub encoding: TextEncoding,
    pub rows: Vec<RawRestaurantRow>,
}

/// Load the first readable candidate from `dir`.
///
/// # Errors
///
/// Returns [`LoadError::NoDataset`] when no candidate exists or none decodes
/// under any encoding, [`LoadError::Io`] when an existing file cannot be read,
/// and [`LoadError::Csv`] when the decoded text is not well-formed CSV.
pub fn load_csv_dataset<S: AsRef<str>>(
    dir: &Path,
    candidates: &[S],
) -> Result<LoadedDataset, LoadError> {
    let mut attempted = Vec::with_capacity(candidates.len());

    for name in candidates {
        let path = dir.join(name.as_ref());
        attempted.push(path.clone());
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "dataset candidate not found");
            continue;
        }

        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        for encoding in TextEncoding::ALL {
            let Some(text) = encoding.decode(&bytes) else {
                tracing::debug!(path = %path.display(), %encoding, "dataset did not decode");
                continue;
            };
            let rows = parse_rows(&text).map_err(|source| LoadError::Csv {
                path: path.clone(),
                source,
            })?;
            tracing::info!(
                path = %path.display(),
                %encoding,
                rows = rows.len(),
                "loaded restaurant dataset"
            );
            return Ok(LoadedDataset {
                path,
                encoding,
                rows,
            });
        }
    }

    Err(LoadError::NoDataset { attempted })
}

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    rating: Option<usize>,
    city: Option<usize>,
    cost: Option<usize>,
    cuisine: Option<usize>,
    address: Option<usize>,
    link: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut columns = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let slot = match header.trim().to_ascii_lowercase().as_str() {
                "id" => &mut columns.id,
                "name" => &mut columns.name,
                "rating" => &mut columns.rating,
                "city" => &mut columns.city,
                "cost" => &mut columns.cost,
                "cuisine" => &mut columns.cuisine,
                "address" => &mut columns.address,
                "link" => &mut columns.link,
                _ => continue,
            };
            // First occurrence wins on duplicate headers.
            slot.get_or_insert(idx);
        }
        columns
    }
}

fn parse_rows(text: &str) -> Result<Vec<RawRestaurantRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let columns = Columns::from_headers(reader.headers()?);

    let cell = |record: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    };

    reader
        .records()
        .map(|record| {
            let record = record?;
            Ok(RawRestaurantRow {
                id: cell(&record, columns.id),
                name: cell(&record, columns.name),
                rating: cell(&record, columns.rating),
                city: cell(&record, columns.city),
                cost: cell(&record, columns.cost),
                cuisine: cell(&record, columns.cuisine),
                address: cell(&record, columns.address),
                link: cell(&record, columns.link),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const HEADER: &str = "id,name,rating,city,cost,cuisine,address,link\n";

    #[test]
    fn loads_first_existing_candidate() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("zomato.csv"),
            format!("{HEADER}1,Cafe Z,4.1,Pune,400,Cafe,FC Road,https://z.example\n"),
        )
        .expect("write");

        let loaded = load_csv_dataset(dir.path(), DEFAULT_DATASET_FILES).expect("load");
        assert_eq!(loaded.path, dir.path().join("zomato.csv"));
        assert_eq!(loaded.encoding, TextEncoding::Utf8);
        assert_eq!(loaded.rows.len(), 1);
        assert_eq!(loaded.rows[0].name.as_deref(), Some("Cafe Z"));
    }

    #[test]
    fn earlier_candidate_takes_priority() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("dataset.csv"),
            format!("{HEADER}1,First,4.0,Delhi,300,Chaat,CP,\n"),
        )
        .expect("write");
        fs::write(
            dir.path().join("zomato.csv"),
            format!("{HEADER}1,Second,4.0,Delhi,300,Chaat,CP,\n"),
        )
        .expect("write");

        let loaded = load_csv_dataset(dir.path(), DEFAULT_DATASET_FILES).expect("load");
        assert_eq!(loaded.rows[0].name.as_deref(), Some("First"));
    }

    #[test]
    fn falls_back_to_latin1_for_invalid_utf8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut bytes = HEADER.as_bytes().to_vec();
        // "Caf\xe9" is Latin-1 for "Café" and invalid as UTF-8.
        bytes.extend_from_slice(b"1,Caf\xe9 Mocha,4.3,Mumbai,700,Cafe,Bandra,\n");
        fs::write(dir.path().join("dataset.csv"), bytes).expect("write");

        let loaded = load_csv_dataset(dir.path(), DEFAULT_DATASET_FILES).expect("load");
        assert_eq!(loaded.encoding, TextEncoding::Latin1);
        assert_eq!(loaded.rows[0].name.as_deref(), Some("Café Mocha"));
    }

    #[test]
    fn missing_candidates_fail_with_attempted_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_csv_dataset(dir.path(), DEFAULT_DATASET_FILES).unwrap_err();
        match err {
            LoadError::NoDataset { attempted } => {
                assert_eq!(
                    attempted,
                    vec![dir.path().join("dataset.csv"), dir.path().join("zomato.csv")]
                );
            }
            other => panic!("expected NoDataset, got {other:?}"),
        }
    }

    #[test]
    fn headers_are_matched_case_insensitively_and_missing_columns_are_empty() {
        let rows = parse_rows(" Name ,RATING,City,Cost\nDosa Hut,3.8,Chennai,150\n").expect("parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name.as_deref(), Some("Dosa Hut"));
        assert_eq!(rows[0].rating.as_deref(), Some("3.8"));
        assert!(rows[0].id.is_none());
        assert!(rows[0].link.is_none());
    }

    #[test]
    fn short_rows_are_tolerated() {
        let rows = parse_rows("name,rating,city,cost\nOnly Name\n").expect("parse");
        assert_eq!(rows[0].name.as_deref(), Some("Only Name"));
        assert!(rows[0].rating.is_none());
    }

    #[test]
    fn quoted_composite_city_labels_survive() {
        let rows = parse_rows("name,rating,city,cost\nBiryani Bowl,4.4,\"Governorpet,Vijayawada\",350\n")
            .expect("parse");
        assert_eq!(rows[0].city.as_deref(), Some("Governorpet,Vijayawada"));
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let text = TextEncoding::Utf8
            .decode(b"\xef\xbb\xbfname\n")
            .expect("decode");
        assert_eq!(text, "name\n");
    }

    #[test]
    fn latin1_decodes_every_byte() {
        let bytes: Vec<u8> = (0..=u8::MAX).collect();
        let text = TextEncoding::Latin1.decode(&bytes).expect("latin1 is total");
        assert_eq!(text.chars().count(), 256);
        assert_eq!(text.chars().nth(0x93), Some('\u{93}'));
    }

    #[test]
    fn encoding_display_names() {
        let names: Vec<String> = TextEncoding::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["utf-8", "latin1"]);
    }
}
