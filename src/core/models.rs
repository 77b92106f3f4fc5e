use serde::Deserialize;

/// Placeholder the exporter writes when it cannot find a definition.
pub const MISSING_DEFINITION: &str = "NO DEFINITION FOUND";
/// Placeholder the exporter writes when it cannot find a reading.
pub const MISSING_READING: &str = "NO READING FOUND";

#[derive(Debug, Clone, Deserialize)]
pub struct WordRecord {
    pub word: String,           // Surface form, unique key within a run
    pub reading: String,        // Reading in kana
    pub definition: String,     // English gloss
    pub sample: String,         // Sentence the word was looked up in
    pub part_of_speech: String, // Comma-separated tag list, possibly empty
}

impl WordRecord {
    /// Records carrying an exporter placeholder are never submitted remotely.
    pub fn has_sentinel_fields(&self) -> bool {
        self.definition == MISSING_DEFINITION || self.reading == MISSING_READING
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Book {
    pub title: String,
    pub words: Vec<WordRecord>,
}
