//! Saving the editor contents as a new paste.
//!
//! The backend is reached through [`PasteStore`]; this module only decides
//! what to send and where the page goes afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// How many fresh ids are tried before giving up.
pub const MAX_ID_ATTEMPTS: usize = 100;

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Please enter some code before saving.")]
    EmptyCode,
    #[error("failed to generate a unique paste id after {0} attempts")]
    IdExhausted(usize),
    #[error("paste store error: {0}")]
    Store(String),
}

/// Body of the save call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub id: String,
    pub code: String,
}

impl SaveRequest {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The paste backend.
pub trait PasteStore {
    /// Ids already taken.
    fn existing_ids(&mut self) -> Result<Vec<String>, PasteError>;
    fn save(&mut self, request: &SaveRequest) -> Result<(), PasteError>;
}

/// Page a saved paste lives at.
pub fn paste_path(id: &str) -> String {
    format!("/toadbin/{id}")
}

/// Draws ids from `generate` until one is not in `existing`.
pub fn generate_unique_id<F>(existing: &[String], mut generate: F) -> Result<String, PasteError>
where
    F: FnMut() -> String,
{
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generate();
        if !existing.contains(&id) {
            return Ok(id);
        }
    }
    Err(PasteError::IdExhausted(MAX_ID_ATTEMPTS))
}

/// Random v4 UUID in its hyphenated lowercase form.
pub fn random_id() -> String {
    Uuid::new_v4().to_string()
}

/// Validates the code and assigns it a fresh id.
pub fn prepare_save(code: &str, existing: &[String]) -> Result<SaveRequest, PasteError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(PasteError::EmptyCode);
    }
    let id = generate_unique_id(existing, random_id)?;
    Ok(SaveRequest {
        id,
        code: code.to_string(),
    })
}

/// Runs the whole save flow and returns the page to navigate to.
///
/// A failing id lookup is not fatal; it only means collisions go unchecked.
pub fn save_paste(store: &mut dyn PasteStore, code: &str) -> Result<String, PasteError> {
    if code.trim().is_empty() {
        return Err(PasteError::EmptyCode);
    }
    let existing = store.existing_ids().unwrap_or_else(|e| {
        log::warn!("Error fetching existing ids: {}", e);
        Vec::new()
    });
    let request = prepare_save(code, &existing)?;
    store.save(&request)?;
    log::info!("Saved paste {}", request.id);
    Ok(paste_path(&request.id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory backend.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub ids: Vec<String>,
        pub saved: Vec<SaveRequest>,
        pub fail_ids: bool,
        pub fail_save: bool,
    }

    impl PasteStore for MemoryStore {
        fn existing_ids(&mut self) -> Result<Vec<String>, PasteError> {
            if self.fail_ids {
                return Err(PasteError::Store("ids unavailable".to_string()));
            }
            Ok(self.ids.clone())
        }

        fn save(&mut self, request: &SaveRequest) -> Result<(), PasteError> {
            if self.fail_save {
                return Err(PasteError::Store("Failed to save code".to_string()));
            }
            self.ids.push(request.id.clone());
            self.saved.push(request.clone());
            Ok(())
        }
    }

    #[test]
    fn test_empty_code_rejected() {
        let err = prepare_save("  \n\t ", &[]).unwrap_err();
        assert!(matches!(err, PasteError::EmptyCode));
        assert_eq!(err.to_string(), "Please enter some code before saving.");
    }

    #[test]
    fn test_unique_id_skips_collisions() {
        let existing = vec!["a".to_string(), "b".to_string()];
        let mut candidates = vec!["c", "b", "a"];
        let id = generate_unique_id(&existing, || candidates.pop().unwrap_or("z").to_string());
        assert_eq!(id.unwrap(), "c");
    }

    #[test]
    fn test_unique_id_gives_up() {
        let existing = vec!["same".to_string()];
        let mut calls = 0;
        let result = generate_unique_id(&existing, || {
            calls += 1;
            "same".to_string()
        });
        assert!(matches!(result, Err(PasteError::IdExhausted(MAX_ID_ATTEMPTS))));
        assert_eq!(calls, MAX_ID_ATTEMPTS);
    }

    #[test]
    fn test_random_id_shape() {
        let id = random_id();
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().nth(14), Some('4'));
    }

    #[test]
    fn test_request_json() {
        let request = SaveRequest {
            id: "abc".to_string(),
            code: "print(1)".to_string(),
        };
        assert_eq!(request.to_json().unwrap(), r#"{"id":"abc","code":"print(1)"}"#);
    }

    #[test]
    fn test_save_paste_trims_and_redirects() {
        let mut store = MemoryStore::default();
        let path = save_paste(&mut store, "\n  x = 1  \n").unwrap();
        assert_eq!(store.saved.len(), 1);
        assert_eq!(store.saved[0].code, "x = 1");
        assert_eq!(path, paste_path(&store.saved[0].id));
    }

    #[test]
    fn test_save_paste_tolerates_id_lookup_failure() {
        let mut store = MemoryStore {
            fail_ids: true,
            ..Default::default()
        };
        assert!(save_paste(&mut store, "code").is_ok());
    }

    #[test]
    fn test_save_paste_store_failure() {
        let mut store = MemoryStore {
            fail_save: true,
            ..Default::default()
        };
        let err = save_paste(&mut store, "code").unwrap_err();
        assert!(matches!(err, PasteError::Store(_)));
    }
}
