use std::collections::HashSet;
use std::path::Path;

/// In-memory set of sanctioned addresses, loaded once at startup from a
/// plain newline-delimited text file. Membership short-circuits the whole
/// analysis pipeline to the maximum score.
pub struct SanctionSet {
    addresses: HashSet<String>,
}

impl SanctionSet {
    pub fn empty() -> Self {
        Self {
            addresses: HashSet::new(),
        }
    }

    /// Load the list from disk. One address per line, blank lines ignored,
    /// surrounding whitespace trimmed. A missing file is tolerated as an
    /// empty set with a warning, never a fatal error.
    pub fn load(path: &str) -> Self {
        if !Path::new(path).exists() {
            tracing::warn!(path, "Sanctions list not found, continuing with empty set");
            return Self::empty();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let addresses: HashSet<String> = content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect();
                tracing::info!(path, count = addresses.len(), "Loaded sanctions list");
                Self { addresses }
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Failed to read sanctions list, continuing with empty set");
                Self::empty()
            }
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
