//! Client for the course service's custom-course endpoints. The API is the
//! one the web app itself uses: form-encoded POSTs authenticated by the
//! browser session cookie and CSRF token, so the requests carry the same
//! header profile a browser would send.

use std::time::Duration;

use regex::Regex;
use reqwest::{
    header::{
        HeaderMap,
        HeaderValue,
        ACCEPT,
        ACCEPT_LANGUAGE,
        COOKIE,
        ORIGIN,
        REFERER,
    },
    Client,
};
use serde::{
    Deserialize,
    Deserializer,
};

use crate::{
    core::{
        OkurigoError,
        WordRecord,
    },
    engine::{
        CourseClient,
        ItemOutcome,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://iknow.jp";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:86.0) Gecko/20100101 Firefox/86.0";

pub struct IknowClient {
    http: Client,
    base_url: String,
    course_id_pattern: Regex,
}

impl IknowClient {
    pub fn new(base_url: &str, cookies: &str, csrf_token: &str) -> Result<Self, OkurigoError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(REFERER, header_value(&format!("{}/home", base_url))?);
        headers.insert(ORIGIN, header_value(&base_url)?);
        headers.insert(COOKIE, header_value(cookies)?);
        headers.insert("X-CSRF-Token", header_value(csrf_token)?);
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let http = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| OkurigoError::Custom(format!("HTTP client build failed: {e}")))?;

        Ok(Self { http, base_url, course_id_pattern: Regex::new(r"/custom/courses/(\d+)")? })
    }
}

fn header_value(value: &str) -> Result<HeaderValue, OkurigoError> {
    HeaderValue::from_str(value)
        .map_err(|e| OkurigoError::Custom(format!("invalid header value: {e}")))
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

// The service emits item ids as numbers in some responses and strings in
// others; accept both.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdValue {
        Number(u64),
        Text(String),
    }

    Ok(match IdValue::deserialize(deserializer)? {
        IdValue::Number(n) => n.to_string(),
        IdValue::Text(s) => s,
    })
}

impl CourseClient for IknowClient {
    async fn create_course(&self, title: &str, number: u32) -> Result<String, OkurigoError> {
        let name = format!("{} {}", title, number);
        let url = format!("{}/custom/courses", self.base_url);
        let form = [
            ("utf8", "✓"),
            ("goal[name]", name.as_str()),
            ("language", "ja"),
            ("translation_language", "en"),
            ("goal[icon_image_url]", ""),
            ("commit", "Create"),
        ];

        let response = self.http.post(&url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(OkurigoError::BadStatus(response.status(), url));
        }

        // The endpoint answers with a jQuery snippet redirecting to the new
        // course; the id only appears inside that path.
        let body = response.text().await?;
        self.course_id_pattern
            .captures(&body)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string())
            .ok_or_else(|| {
                OkurigoError::Custom(format!("no course id in the creation response for '{name}'"))
            })
    }

    async fn create_item(
        &self,
        course_id: &str,
        word: &WordRecord,
        pos_code: &str,
    ) -> Result<ItemOutcome, OkurigoError> {
        let url = format!("{}/custom/courses/{}/items", self.base_url, course_id);
        let form = [
            ("item[cue][text]", word.word.as_str()),
            ("item[cue][language]", "ja"),
            ("item[cue][transliteration]", word.reading.as_str()),
            ("item[cue][part_of_speech]", pos_code),
            ("item[response][text]", word.definition.as_str()),
            ("item[response][language]", "en"),
        ];

        let response = self.http.post(&url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(OkurigoError::BadStatus(response.status(), url));
        }

        // A success status with a body we cannot decode is ambiguous: the
        // item may exist remotely, so it is reported as unconfirmed rather
        // than failed.
        match response.json::<ItemResponse>().await {
            Ok(item) => Ok(ItemOutcome::Created { item_id: item.id }),
            Err(_) => Ok(ItemOutcome::Unconfirmed),
        }
    }

    async fn attach_sample(
        &self,
        course_id: &str,
        item_id: &str,
        sentence: &str,
        transliteration: &str,
        translation: &str,
    ) -> Result<(), OkurigoError> {
        let url = format!(
            "{}/custom/courses/{}/items/{}/sentences",
            self.base_url, course_id, item_id
        );
        let form = [
            ("utf8", "✓"),
            ("sentence_package[sentence][text]", sentence),
            ("sentence_package[sentence][transliteration]", transliteration),
            ("sentence_package[sentence][language]", "ja"),
            ("sentence_package[translation][text]", translation),
            ("sentence_package[translation][language]", "en"),
            ("sentence_package[sound][url]", ""),
            ("sentence_package[image_url]", ""),
            ("commit", "Add"),
        ];

        let response = self.http.post(&url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(OkurigoError::BadStatus(response.status(), url));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_accepts_numbers_and_strings() {
        let from_number: ItemResponse = serde_json::from_str(r#"{"id": 987654}"#).unwrap();
        assert_eq!(from_number.id, "987654");

        let from_string: ItemResponse = serde_json::from_str(r#"{"id": "987654"}"#).unwrap();
        assert_eq!(from_string.id, "987654");
    }

    #[test]
    fn course_id_is_extracted_from_a_redirect_snippet() {
        let pattern = Regex::new(r"/custom/courses/(\d+)").unwrap();
        let body = r#"Turbolinks.visit("https://iknow.jp/custom/courses/709119", ...)"#;

        let id = pattern.captures(body).and_then(|c| c.get(1)).unwrap().as_str();
        assert_eq!(id, "709119");
    }

    #[test]
    fn extra_response_fields_are_ignored() {
        let parsed: ItemResponse =
            serde_json::from_str(r#"{"id": 42, "cue": {"text": "鼻歌"}}"#).unwrap();
        assert_eq!(parsed.id, "42");
    }
}
