//! Voice - Voice catalog entries

use serde::{Deserialize, Serialize};

/// A synthesis voice offered by the voice provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Voice catalog as returned by the list-voices endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceCatalog {
    #[serde(default)]
    pub voices: Vec<Voice>,
}

impl VoiceCatalog {
    /// Find a voice by id or (case-insensitive) name
    pub fn find(&self, key: &str) -> Option<&Voice> {
        self.voices
            .iter()
            .find(|v| v.voice_id == key || v.name.eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_ignores_extra_fields() {
        let catalog: VoiceCatalog = serde_json::from_value(json!({
            "voices": [
                { "voice_id": "abc", "name": "Rachel", "category": "premade", "labels": {} },
                { "voice_id": "def", "name": "Clyde" }
            ]
        }))
        .unwrap();

        assert_eq!(catalog.voices.len(), 2);
        assert_eq!(catalog.find("rachel").unwrap().voice_id, "abc");
        assert_eq!(catalog.find("def").unwrap().name, "Clyde");
        assert!(catalog.find("nobody").is_none());
    }
}
