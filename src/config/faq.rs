use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use crate::i18n::Lang;

#[derive(Debug, Error)]
pub enum FaqError {
    #[error("FAQ file IO error: {0}")] Io(#[from] std::io::Error),
    #[error("FAQ JSON parsing error: {0}")] Json(#[from] serde_json::Error),
    #[error("Invalid FAQ table: {0}")] Invalid(String),
}

/// One static question/answer unit, keyed by trigger keywords. The `question`
/// and `answer` maps are keyed by language tag.
#[derive(Deserialize, Debug, Clone)]
pub struct FaqEntry {
    pub keywords: Vec<String>,
    pub question: HashMap<String, String>,
    pub answer: HashMap<String, String>,
}

impl FaqEntry {
    /// The entry's answer for `lang`, falling back to any other non-empty
    /// language rather than dropping a matched entry. Blank values never
    /// produce an empty answer.
    pub fn answer_for(&self, lang: Lang) -> Option<&str> {
        pick_localized(&self.answer, lang)
    }

    pub fn question_for(&self, lang: Lang) -> Option<&str> {
        pick_localized(&self.question, lang)
    }
}

fn pick_localized(texts: &HashMap<String, String>, lang: Lang) -> Option<&str> {
    texts
        .get(lang.as_str())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| texts.values().find(|s| !s.trim().is_empty()))
        .map(|s| s.as_str())
}

/// The FAQ table. Declaration order is match priority: the first entry with a
/// matching keyword wins, regardless of how many keywords other entries match.
#[derive(Deserialize, Debug, Clone)]
pub struct FaqConfig {
    pub entries: Vec<FaqEntry>,
    #[serde(skip)]
    pub last_loaded: Option<SystemTime>,
}

impl FaqConfig {
    fn validate(&self) -> Result<(), FaqError> {
        if self.entries.is_empty() {
            return Err(FaqError::Invalid("FAQ table has no entries".to_string()));
        }
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(
                    FaqError::Invalid(format!("entry {} has no usable keywords", index))
                );
            }
            if entry.answer.values().all(|a| a.trim().is_empty()) {
                return Err(FaqError::Invalid(format!("entry {} has no answer text", index)));
            }
        }
        Ok(())
    }
}

pub fn load_faq(path: &str) -> Result<Arc<FaqConfig>, FaqError> {
    let file_content = fs::read_to_string(path)?;
    let mut config: FaqConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    config.last_loaded = Some(SystemTime::now());
    info!("Loaded {} FAQ entries from {}", config.entries.len(), path);
    Ok(Arc::new(config))
}

pub fn reload_faq_if_changed<P: AsRef<Path>>(
    path: P,
    current_config: &Arc<FaqConfig>
) -> Result<Option<Arc<FaqConfig>>, FaqError> {
    let metadata = fs::metadata(&path)?;

    if let Ok(modified) = metadata.modified() {
        match current_config.last_loaded {
            Some(last_loaded) if modified <= last_loaded => {
                return Ok(None);
            }
            _ => {
                info!("FAQ file changed, reloading...");
                let path_str = path
                    .as_ref()
                    .to_str()
                    .ok_or_else(|| FaqError::Invalid("non-UTF8 FAQ path".to_string()))?;
                return Ok(Some(load_faq(path_str)?));
            }
        }
    }
    Ok(None)
}

/// Scans the query against the table and returns the answer of the first
/// entry whose keyword is a substring of the lower-cased query. Pure and
/// deterministic; `None` means no entry matched.
pub fn find_answer<'a>(query: &str, config: &'a FaqConfig, lang: Lang) -> Option<&'a str> {
    let normalized = query.to_lowercase();
    for entry in &config.entries {
        for keyword in &entry.keywords {
            if normalized.contains(&keyword.to_lowercase()) {
                return entry.answer_for(lang);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FaqConfig {
        serde_json
            ::from_str(
                r#"{
                "entries": [
                    {
                        "keywords": ["harga", "price"],
                        "question": {"id": "Berapa harga sewa mobil?", "en": "What are the prices?"},
                        "answer": {"id": "Daftar harga sewa.", "en": "The price list."}
                    },
                    {
                        "keywords": ["sewa", "rent"],
                        "question": {"id": "Bagaimana cara booking?", "en": "How to book?"},
                        "answer": {"id": "Cara booking.", "en": "How to book."}
                    }
                ]
            }"#
            )
            .unwrap()
    }

    #[test]
    fn matches_keyword_case_insensitively() {
        let config = table();
        assert_eq!(find_answer("Berapa HARGA mobilnya?", &config, Lang::Id), Some("Daftar harga sewa."));
        assert_eq!(find_answer("what is the PRICE", &config, Lang::En), Some("The price list."));
    }

    #[test]
    fn matches_keyword_at_any_position() {
        let config = table();
        assert_eq!(find_answer("price", &config, Lang::En), Some("The price list."));
        assert_eq!(find_answer("tell me the price please", &config, Lang::En), Some("The price list."));
    }

    #[test]
    fn first_declared_entry_wins() {
        // "berapa harga sewa mobil" matches both entries; declaration order
        // decides, not match count.
        let config = table();
        assert_eq!(find_answer("berapa harga sewa mobil", &config, Lang::Id), Some("Daftar harga sewa."));
    }

    #[test]
    fn unmatched_query_returns_none() {
        let config = table();
        assert_eq!(find_answer("xyz123 unrelated", &config, Lang::Id), None);
        assert_eq!(find_answer("", &config, Lang::En), None);
    }

    #[test]
    fn answer_falls_back_to_another_language() {
        let config: FaqConfig = serde_json
            ::from_str(
                r#"{
                "entries": [
                    {
                        "keywords": ["driver"],
                        "question": {"id": "Apakah termasuk driver?"},
                        "answer": {"id": "Sudah termasuk driver."}
                    }
                ]
            }"#
            )
            .unwrap();
        assert_eq!(find_answer("is a driver included", &config, Lang::En), Some("Sudah termasuk driver."));
    }

    #[test]
    fn blank_answer_value_falls_through_to_another_language() {
        let config: FaqConfig = serde_json
            ::from_str(
                r#"{
                "entries": [
                    {
                        "keywords": ["driver"],
                        "question": {"id": "Apakah termasuk driver?", "en": "Is driver included?"},
                        "answer": {"id": "", "en": "Yes, driver included."}
                    }
                ]
            }"#
            )
            .unwrap();
        let answer = find_answer("apakah ada driver", &config, Lang::Id);
        assert_eq!(answer, Some("Yes, driver included."));
    }

    #[test]
    fn bundled_table_answers_the_price_question() {
        let config = load_faq("json/faq.json").unwrap();
        let answer = find_answer("berapa harga sewa mobil", &config, Lang::Id).unwrap();
        assert!(answer.starts_with("Harga sewa mobil kami bervariasi"));
    }

    #[test]
    fn rejects_empty_table() {
        let config: Result<FaqConfig, _> = serde_json::from_str(r#"{"entries": []}"#);
        assert!(config.unwrap().validate().is_err());
    }
}
