use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::Deserialize;

use crate::core::OkurigoError;

/// Run configuration: the session material captured from a logged-in browser
/// plus the word source to upload. Lives in a JSON file next to the
/// checkpoint so a run can be repeated without retyping anything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub cookies: String,
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub word_source: PathBuf,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, OkurigoError> {
        let json = fs::read_to_string(path)
            .map_err(|_| OkurigoError::FailedToLoadFile(path.display().to_string()))?;
        let config: RunConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), OkurigoError> {
        if self.cookies.trim().is_empty() || self.csrf_token.trim().is_empty() {
            return Err(OkurigoError::MissingConfig(
                "cookies and csrf_token are required to upload data".to_string(),
            ));
        }
        if self.word_source.as_os_str().is_empty() {
            return Err(OkurigoError::MissingConfig(
                "word_source must point at an export file".to_string(),
            ));
        }
        Ok(())
    }
}
