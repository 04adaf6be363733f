//! Candidate secrets for the weak-secret search

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{JoseError, Result};

/// Known weak JWT secrets, one per line
const SEEDS: &str = include_str!("../../data/weak_secrets.txt");

const SYMBOL_SUFFIXES: &[&str] = &[
    "!", "!!", "?", "#", "$", "@", "*", ".", "_", "-", "123", "1234", "12345", "123456", "123!",
    "@123", "#1", "!1",
];

static BUILTIN: LazyLock<Wordlist> = LazyLock::new(|| {
    let wordlist = Wordlist::from_secrets(builtin_candidates());
    debug!(candidates = wordlist.len(), "expanded builtin wordlist");
    wordlist
});

fn seeds() -> impl Iterator<Item = &'static str> {
    SEEDS.lines().filter(|line| !line.is_empty())
}

/// As written, capitalized and upper case
fn case_forms(seed: &str) -> [String; 3] {
    let mut chars = seed.chars();
    let capitalized = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
    [seed.to_owned(), capitalized, seed.to_uppercase()]
}

/// `0`..`99`, `00`..`09`, years 1970..=2030, then symbol suffixes
fn suffixes() -> impl Iterator<Item = String> {
    (0..100)
        .map(|n: u32| n.to_string())
        .chain((0..10).map(|n: u32| format!("0{n}")))
        .chain((1970..=2030).map(|year: u32| year.to_string()))
        .chain(SYMBOL_SUFFIXES.iter().map(|suffix| (*suffix).to_owned()))
}

/// Seeds, then their case forms, then every case form with every suffix
fn builtin_candidates() -> impl Iterator<Item = String> {
    let plain = seeds().map(str::to_owned);
    let cased = seeds().flat_map(case_forms);
    let suffixed = seeds().flat_map(|seed| {
        case_forms(seed)
            .into_iter()
            .flat_map(|base| suffixes().map(move |suffix| format!("{base}{suffix}")))
    });
    plain.chain(cased).chain(suffixed)
}

/// Wordlist composition for a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Start from the builtin list of known weak secrets and their variants
    pub include_builtin: bool,
    /// Secrets tried after the builtin list
    pub extra_secrets: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            extra_secrets: Vec::new(),
        }
    }
}

/// Ordered list of candidate secrets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Wordlist {
    secrets: Vec<String>,
}

impl Wordlist {
    /// Known weak secrets followed by their case and suffix variants
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// One candidate per line; a trailing line break does not add an empty candidate
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        Self::from_secrets(text.lines())
    }

    /// Candidates in the given order, duplicates dropped
    pub fn from_secrets<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let secrets = secrets
            .into_iter()
            .map(Into::into)
            .filter(|secret: &String| seen.insert(secret.clone()))
            .collect();
        Self { secrets }
    }

    /// Read a wordlist file with one candidate per line
    ///
    /// Lines are taken verbatim apart from the line break, so a secret with
    /// leading or trailing spaces stays as written.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            JoseError::precondition(format!("cannot read wordlist {}: {e}", path.display()))
        })?;
        Ok(Self::from_lines(&text))
    }

    /// Builtin list (when enabled) followed by the extra secrets
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        let builtin = config
            .include_builtin
            .then(|| BUILTIN.iter().map(str::to_owned))
            .into_iter()
            .flatten();
        Self::from_secrets(builtin.chain(config.extra_secrets.iter().cloned()))
    }

    /// Number of candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether there are no candidates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Candidates in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.secrets.iter().map(String::as_str)
    }
}
