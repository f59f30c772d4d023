use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

/// Ordered key codes dispatched when a semantic label is recognized.
///
/// May be empty for no-op commands (recognized but emitting nothing).
pub type KeySequence = Vec<u16>;

/// Two entries tried to bind the same semantic label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("duplicate semantic label `{0}`")]
pub struct DuplicateSemantic(pub String);

/// A semantic label was queried that was never compiled into the table.
///
/// Always a host/integration bug: the recognizer can only report labels
/// that came out of the same compilation that produced the table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("semantic label `{0}` is not in the key table")]
pub struct LookupMiss(pub String);

/// Flat lookup table from recognized semantic label to key sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    entries: HashMap<String, KeySequence>,
}

impl KeyTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of semantic labels in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `semantic` is bound in the table.
    #[must_use]
    pub fn contains(&self, semantic: &str) -> bool {
        self.entries.contains_key(semantic)
    }

    /// Key sequence for `semantic`, if bound.
    #[must_use]
    pub fn get(&self, semantic: &str) -> Option<&[u16]> {
        self.entries.get(semantic).map(Vec::as_slice)
    }

    /// Key sequence for a recognized `semantic`.
    ///
    /// # Errors
    /// Returns [`LookupMiss`] if the label is absent. That is a caller bug,
    /// since recognized labels must come from the compilation that built
    /// this table.
    pub fn lookup(&self, semantic: &str) -> Result<&[u16], LookupMiss> {
        self.get(semantic)
            .ok_or_else(|| LookupMiss(semantic.to_owned()))
    }

    /// Bind `semantic` to `keys`.
    ///
    /// # Errors
    /// Returns [`DuplicateSemantic`] if the label is already bound; the
    /// existing binding is left untouched.
    pub fn insert(
        &mut self,
        semantic: impl Into<String>,
        keys: KeySequence,
    ) -> Result<(), DuplicateSemantic> {
        match self.entries.entry(semantic.into()) {
            Entry::Occupied(slot) => Err(DuplicateSemantic(slot.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(keys);
                Ok(())
            }
        }
    }

    /// Move every binding of `other` into this table.
    ///
    /// # Errors
    /// Returns [`DuplicateSemantic`] on the first label both tables bind.
    pub fn merge(&mut self, other: Self) -> Result<(), DuplicateSemantic> {
        for (semantic, keys) in other.entries {
            self.insert(semantic, keys)?;
        }
        Ok(())
    }

    /// Iterate bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u16])> {
        self.entries
            .iter()
            .map(|(semantic, keys)| (semantic.as_str(), keys.as_slice()))
    }
}

/// Collects pairs without duplicate screening; later pairs replace earlier
/// ones. Callers must guarantee label uniqueness up front (the compiler
/// does so by rejecting duplicates when entries are declared).
impl FromIterator<(String, KeySequence)> for KeyTable {
    fn from_iter<I: IntoIterator<Item = (String, KeySequence)>>(pairs: I) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }
}
