//! Durable run state: which words are already on the service, where each
//! book's current course left off, and what failed during the last run.

use std::{
    fs,
    io::Write,
    path::Path,
};

use serde::{
    Deserialize,
    Serialize,
};
use tempfile::NamedTempFile;

use crate::core::OkurigoError;

/// Per-book position in the course sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCursor {
    pub title: String,
    pub cur_course_id: String, // Empty until the course exists remotely
    pub number: u32,           // Suffix distinguishing rollover courses
    pub items: u32,            // Items committed to the current course
}

impl CourseCursor {
    pub fn new(title: &str) -> Self {
        Self { title: title.to_string(), cur_course_id: String::new(), number: 0, items: 0 }
    }

    /// Display name of the course segment currently being filled.
    pub fn course_name(&self) -> String {
        format!("{} {}", self.title, self.number)
    }
}

/// A word whose flashcard was not created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub course: String,
    pub course_id: String,
    pub word: String,
}

/// A word whose flashcard exists but whose sample sentence was not attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFailure {
    pub course: String,
    pub course_id: String,
    pub word: String,
    pub word_id: String,
    pub sentence: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub courses: Vec<CourseCursor>,
    #[serde(rename = "not-added", default)]
    pub not_added: Vec<ItemFailure>,
    #[serde(rename = "no-sample", default)]
    pub no_sample: Vec<SampleFailure>,
}

impl Checkpoint {
    /// A missing file is a first run, not an error. A file that exists but
    /// does not parse is fatal: resuming from state we cannot account for
    /// would re-submit words.
    pub fn load(path: &Path) -> Result<Self, OkurigoError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| {
            OkurigoError::MalformedCheckpoint(format!("{}: {}", path.display(), e))
        })
    }

    /// Replaces the persisted state atomically: the JSON is written to a
    /// temp file in the target directory and persisted over the destination.
    /// Called at most once per run, as the last action before exit.
    pub fn save(&self, path: &Path) -> Result<(), OkurigoError> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(self)?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(path).map_err(|e| OkurigoError::Io(Box::new(e.error)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_checkpoint() -> Checkpoint {
        Checkpoint {
            added: vec!["猫".to_string(), "犬".to_string()],
            courses: vec![CourseCursor {
                title: "N3 Vocab".to_string(),
                cur_course_id: "12345".to_string(),
                number: 1,
                items: 42,
            }],
            not_added: vec![ItemFailure {
                course: "N3 Vocab 1".to_string(),
                course_id: "12345".to_string(),
                word: "鳥".to_string(),
            }],
            no_sample: vec![SampleFailure {
                course: "N3 Vocab 1".to_string(),
                course_id: "12345".to_string(),
                word: "魚".to_string(),
                word_id: "987".to_string(),
                sentence: "魚を食べる".to_string(),
            }],
        }
    }

    #[test]
    fn missing_file_yields_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = Checkpoint::load(&dir.path().join("nope.json")).unwrap();

        assert!(checkpoint.added.is_empty());
        assert!(checkpoint.courses.is_empty());
        assert!(checkpoint.not_added.is_empty());
        assert!(checkpoint.no_sample.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prior_results.json");

        let original = sample_checkpoint();
        original.save(&path).unwrap();
        let loaded = Checkpoint::load(&path).unwrap();

        assert_eq!(loaded.added, original.added);
        assert_eq!(loaded.courses, original.courses);
        assert_eq!(loaded.not_added, original.not_added);
        assert_eq!(loaded.no_sample, original.no_sample);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prior_results.json");
        fs::write(&path, "{\"added\": \"not a list\"}").unwrap();

        match Checkpoint::load(&path) {
            Err(OkurigoError::MalformedCheckpoint(_)) => {}
            other => panic!("expected MalformedCheckpoint, got {:?}", other),
        }
    }

    #[test]
    fn serialized_keys_match_the_file_schema() {
        let json = serde_json::to_string(&sample_checkpoint()).unwrap();

        assert!(json.contains("\"not-added\""));
        assert!(json.contains("\"no-sample\""));
        assert!(json.contains("\"cur_course_id\""));
    }

    #[test]
    fn save_overwrites_prior_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prior_results.json");

        sample_checkpoint().save(&path).unwrap();
        let replacement = Checkpoint { added: vec!["蛙".to_string()], ..Default::default() };
        replacement.save(&path).unwrap();

        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded.added, vec!["蛙".to_string()]);
        assert!(loaded.courses.is_empty());
    }

    #[test]
    fn absent_lists_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prior_results.json");
        fs::write(&path, "{\"added\": [\"猫\"]}").unwrap();

        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded.added, vec!["猫".to_string()]);
        assert!(loaded.courses.is_empty());
    }
}
