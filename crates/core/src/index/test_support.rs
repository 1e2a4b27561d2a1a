//! Fixture notebook shared by the index unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::db::IndexDb;
use super::types::NoteMetadata;

pub(crate) fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub(crate) fn note(
    path: &str,
    title: &str,
    body: &str,
    checksum: &str,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
) -> NoteMetadata {
    NoteMetadata {
        path: path.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        word_count: u32::try_from(body.split_whitespace().count()).unwrap(),
        checksum: checksum.to_string(),
        created,
        modified,
    }
}

pub(crate) fn fixture_notes() -> Vec<NoteMetadata> {
    vec![
        note(
            "log/2021-01-03.md",
            "January 3, 2021",
            "A daily note",
            "qwfpgj",
            utc(2020, 11, 22, 16, 27, 45),
            utc(2020, 11, 22, 16, 27, 45),
        ),
        note(
            "log/2021-01-04.md",
            "January 4, 2021",
            "A second daily note",
            "arstde",
            utc(2020, 11, 29, 8, 20, 18),
            utc(2020, 11, 29, 8, 20, 18),
        ),
        note(
            "index.md",
            "Index",
            "Index of the Zettelkasten",
            "iaefhv",
            utc(2019, 12, 4, 11, 59, 11),
            utc(2019, 12, 4, 12, 17, 21),
        ),
        note(
            "f39c8.md",
            "An interesting note",
            "Is this interesting?",
            "irkwyc",
            utc(2020, 1, 19, 10, 58, 41),
            utc(2020, 1, 20, 8, 52, 42),
        ),
        note(
            "ref/test/b.md",
            "A nested note",
            "This one is in a sub sub directory",
            "yvwbae",
            utc(2019, 11, 20, 20, 32, 56),
            utc(2019, 11, 20, 20, 34, 6),
        ),
        note(
            "ref/test/a.md",
            "Another nested note",
            "It shall appear before b.md",
            "iecywst",
            utc(2019, 11, 20, 20, 32, 56),
            utc(2019, 11, 20, 20, 34, 6),
        ),
        note(
            "log/2021-02-04.md",
            "February 4, 2021",
            "A third daily note",
            "earkte",
            utc(2020, 11, 29, 8, 20, 18),
            utc(2020, 11, 10, 8, 20, 18),
        ),
    ]
}

/// In-memory index loaded with [`fixture_notes`].
pub(crate) fn fixture_db() -> IndexDb {
    let db = IndexDb::open_in_memory().unwrap();
    for note in fixture_notes() {
        db.notes().add(&note).unwrap();
    }
    db
}
