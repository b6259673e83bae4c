use std::sync::{PoisonError, RwLock};

/// The single mutable slot holding the current session credential.
///
/// Owned by one dispatcher instance, never a process-wide global, so
/// independent clients (and tests) cannot share credentials. Concurrent
/// writers race by design: the last response to complete wins.
#[derive(Debug, Default)]
pub struct SessionState {
    credential: RwLock<Option<String>>,
}

impl SessionState {
    pub fn credential(&self) -> Option<String> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store(&self, credential: String) {
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
    }

    /// Masked partial value safe for display; the raw credential is never
    /// exposed through this.
    pub fn masked(&self) -> Option<String> {
        self.credential().map(|c| mask(&c))
    }
}

fn mask(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_credential() {
        let session = SessionState::default();
        assert_eq!(session.credential(), None);
        assert_eq!(session.masked(), None);
    }

    #[test]
    fn last_write_wins() {
        let session = SessionState::default();
        session.store("abc".to_string());
        session.store("def".to_string());
        assert_eq!(session.credential(), Some("def".to_string()));
    }

    #[test]
    fn masked_keeps_only_the_tail() {
        let session = SessionState::default();
        session.store("secret-token-0001".to_string());
        assert_eq!(session.masked(), Some("****0001".to_string()));
    }

    #[test]
    fn short_credentials_mask_entirely() {
        let session = SessionState::default();
        session.store("abc".to_string());
        assert_eq!(session.masked(), Some("****".to_string()));
    }
}
