//! Reads the word-source export: an ordered list of books, each an ordered
//! list of word records.

use std::{
    fs,
    path::Path,
};

use serde::Deserialize;

use crate::core::{
    Book,
    OkurigoError,
};

#[derive(Debug, Deserialize)]
struct WordSourceFile {
    #[serde(default)]
    books: Vec<Book>,
}

pub fn load_books(path: &Path) -> Result<Vec<Book>, OkurigoError> {
    let json = fs::read_to_string(path)
        .map_err(|_| OkurigoError::FailedToLoadFile(path.display().to_string()))?;
    let source: WordSourceFile = serde_json::from_str(&json)?;
    Ok(source.books)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kindle_data.json");
        fs::write(
            &path,
            r#"{
                "books": [
                    {
                        "title": "N3 Vocab",
                        "words": [
                            {
                                "word": "鼻歌",
                                "reading": "はなうた",
                                "definition": "humming, crooning",
                                "sample": "えっと。。。鼻歌ね。。",
                                "part_of_speech": "noun"
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let books = load_books(&path).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "N3 Vocab");
        assert_eq!(books[0].words[0].word, "鼻歌");
        assert_eq!(books[0].words[0].part_of_speech, "noun");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_books(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn empty_object_means_no_books() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kindle_data.json");
        fs::write(&path, "{}").unwrap();

        assert!(load_books(&path).unwrap().is_empty());
    }
}
