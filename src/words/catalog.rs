//! Word pack sources. The embedded catalog ships one JSON pack per CEFR
//! level; the remote catalog (network feature) layers a fetch-with-disk-cache
//! on top and falls back to the embedded packs on any failure.

use std::fs;
use std::path::PathBuf;

use rust_embed::Embed;

use crate::engine::dda::CefrLevel;
use crate::words::{Word, WordSource, WordSourceError};

#[derive(Embed)]
#[folder = "assets/words/"]
struct WordPackAssets;

pub struct EmbeddedCatalog;

impl EmbeddedCatalog {
    fn load_pack(level: CefrLevel) -> Result<Vec<Word>, WordSourceError> {
        let filename = format!("{}.json", level.code());
        let file = WordPackAssets::get(&filename)
            .ok_or_else(|| WordSourceError::MissingPack(level.label().to_string()))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|e| WordSourceError::Fetch(e.to_string()))?;
        parse_pack(content, level)
    }
}

impl WordSource for EmbeddedCatalog {
    fn fetch_words(&mut self, level: CefrLevel, limit: usize) -> Result<Vec<Word>, WordSourceError> {
        let mut words = Self::load_pack(level)?;
        words.truncate(limit);
        Ok(words)
    }
}

fn parse_pack(content: &str, level: CefrLevel) -> Result<Vec<Word>, WordSourceError> {
    let mut words: Vec<Word> = serde_json::from_str(content)?;
    for word in &mut words {
        // Packs may omit the level tag; stamp it so scoring can key off it.
        if word.level.is_none() {
            word.level = Some(level.code().to_string());
        }
    }
    Ok(words)
}

/// On-disk cache for downloaded packs, keyed by file name.
pub struct DiskCache {
    base_dir: PathBuf,
}

impl DiskCache {
    pub fn new(subdir: &str) -> Option<Self> {
        let base = dirs::data_dir()?.join("wordrush").join(subdir);
        fs::create_dir_all(&base).ok()?;
        Some(Self { base_dir: base })
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_base_dir(base_dir: PathBuf) -> Option<Self> {
        fs::create_dir_all(&base_dir).ok()?;
        Some(Self { base_dir })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::read_to_string(path).ok()
    }

    pub fn put(&self, key: &str, content: &str) -> bool {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::write(path, content).is_ok()
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?;
    let response = client.get(url).send().ok()?;
    if response.status().is_success() {
        response.text().ok()
    } else {
        None
    }
}

#[cfg(not(feature = "network"))]
fn fetch_url(_url: &str) -> Option<String> {
    None
}

/// Fetches packs from `{base_url}/{level}.json`, caching successful bodies
/// on disk. Network or parse failures degrade to the cached copy, then the
/// embedded pack — a session never starts empty because a server was down.
pub struct RemoteCatalog {
    base_url: String,
    cache: Option<DiskCache>,
}

impl RemoteCatalog {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: DiskCache::new("packs"),
        }
    }
}

impl WordSource for RemoteCatalog {
    fn fetch_words(&mut self, level: CefrLevel, limit: usize) -> Result<Vec<Word>, WordSourceError> {
        let key = format!("{}.json", level.code());
        let url = format!("{}/{}", self.base_url, key);

        if let Some(body) = fetch_url(&url) {
            if let Ok(mut words) = parse_pack(&body, level) {
                if let Some(ref cache) = self.cache {
                    cache.put(&key, &body);
                }
                words.truncate(limit);
                return Ok(words);
            }
        }

        if let Some(body) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            if let Ok(mut words) = parse_pack(&body, level) {
                words.truncate(limit);
                return Ok(words);
            }
        }

        EmbeddedCatalog.fetch_words(level, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_an_embedded_pack() {
        let mut catalog = EmbeddedCatalog;
        for level in CefrLevel::ALL {
            let words = catalog.fetch_words(level, usize::MAX).unwrap();
            assert!(
                words.len() >= 20,
                "{} pack too small: {}",
                level.label(),
                words.len()
            );
            for word in &words {
                assert!(!word.word.is_empty());
                assert!(!word.meaning.is_empty());
                assert_eq!(word.cefr_level(), Some(level));
            }
        }
    }

    #[test]
    fn fetch_respects_limit() {
        let mut catalog = EmbeddedCatalog;
        let words = catalog.fetch_words(CefrLevel::A1, 5).unwrap();
        assert_eq!(words.len(), 5);
    }

    #[test]
    fn parse_pack_stamps_missing_levels() {
        let json = r#"[{"word":"ox","meaning":"a draft bovine"}]"#;
        let words = parse_pack(json, CefrLevel::B2).unwrap();
        assert_eq!(words[0].level.as_deref(), Some("b2"));
    }

    #[test]
    fn parse_pack_rejects_garbage() {
        assert!(parse_pack("not json", CefrLevel::A1).is_err());
    }

    #[test]
    fn disk_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::with_base_dir(dir.path().join("packs")).unwrap();
        assert!(cache.get("a1.json").is_none());
        assert!(cache.put("a1.json", "[]"));
        assert_eq!(cache.get("a1.json").as_deref(), Some("[]"));
        // Path separators are sanitized out of keys.
        assert!(cache.put("../escape", "x"));
        assert!(cache.get(".._escape").is_some());
    }
}
