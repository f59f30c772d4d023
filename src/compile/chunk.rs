use crate::grammar::GrammarNode;
use crate::keymap::KeyTable;
use thiserror::Error;
use tracing::debug;

/// Errors rejected while declaring a chunk.
///
/// All of these are configuration mistakes surfaced at the mutation that
/// introduces them, so a chunk that accepts a declaration is always
/// compilable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChunkError {
    /// Entry declared without a semantic label.
    #[error("entry semantic label must not be empty")]
    EmptySemantic,

    /// Entry declared with no spoken phrases; it could never match.
    #[error("entry `{semantic}` has no phrase alternates")]
    EmptyAlternates {
        /// Label of the rejected entry.
        semantic: String,
    },

    /// The chunk already defines this semantic label.
    #[error("duplicate semantic label `{semantic}` in chunk `{chunk}`")]
    DuplicateSemantic {
        /// Name of the chunk that rejected the entry.
        chunk: String,
        /// Label of the rejected entry.
        semantic: String,
    },

    /// Repeat bound below the fixed lower bound of 1.
    #[error("max_repeat must be at least 1, got {value}")]
    InvalidMaxRepeat {
        /// The rejected value.
        value: u32,
    },
}

/// One recognizable alternative within a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandChunkEntry {
    semantic: String,
    alternates: Vec<String>,
    keys: Vec<u16>,
}

impl CommandChunkEntry {
    /// Semantic label the engine reports when this entry matches.
    #[must_use]
    pub fn semantic(&self) -> &str {
        &self.semantic
    }

    /// Spoken-word phrases that all resolve to this entry's semantic.
    #[must_use]
    pub fn alternates(&self) -> &[String] {
        &self.alternates
    }

    /// Key codes dispatched when this entry is recognized.
    #[must_use]
    pub fn keys(&self) -> &[u16] {
        &self.keys
    }
}

/// Result of compiling one chunk: the grammar subtree and the semantic →
/// key-sequence table it contributes to its command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledChunk {
    /// Grammar subtree for the recognition engine.
    pub node: GrammarNode,
    /// This chunk's key bindings.
    pub keys: KeyTable,
}

/// A reusable grammar fragment: one recognizable slot of a voice command.
///
/// Created empty with a name and populated one entry at a time via
/// [`add`](Self::add). The compiled grammar subtree is derived state: it is
/// memoized and recomputed lazily whenever `entries`, `max_repeat`,
/// `prefixes`, or `affixes` change. The name is not a compile input.
#[derive(Debug, Clone)]
pub struct CommandChunk {
    name: String,
    max_repeat: u32,
    prefixes: Option<Vec<String>>,
    affixes: Option<Vec<String>>,
    entries: Vec<CommandChunkEntry>,
    /// Memoized compile result; `None` while dirty.
    compiled: Option<CompiledChunk>,
}

impl CommandChunk {
    /// New chunk with no entries, no prefixes/affixes, and `max_repeat = 1`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_repeat: 1,
            prefixes: None,
            affixes: None,
            entries: Vec::new(),
            compiled: None,
        }
    }

    /// Chunk identifier. Not required to be unique across chunks.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the chunk. Does not invalidate the compiled subtree, since
    /// the name is not part of the grammar.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Upper bound on consecutive repetitions of this chunk's choice.
    #[must_use]
    pub const fn max_repeat(&self) -> u32 {
        self.max_repeat
    }

    /// Set the repeat upper bound. The lower bound is fixed at 1.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidMaxRepeat`] for a bound below 1; the
    /// previous value is kept.
    pub fn set_max_repeat(&mut self, max_repeat: u32) -> Result<(), ChunkError> {
        if max_repeat < 1 {
            return Err(ChunkError::InvalidMaxRepeat { value: max_repeat });
        }
        self.max_repeat = max_repeat;
        self.invalidate();
        Ok(())
    }

    /// Optional phrases that may precede the entry choice.
    #[must_use]
    pub fn prefixes(&self) -> Option<&[String]> {
        self.prefixes.as_deref()
    }

    /// Replace the optional prefix phrases. `None` (or an empty list)
    /// generates no prefix slot.
    pub fn set_prefixes(&mut self, prefixes: Option<Vec<String>>) {
        self.prefixes = prefixes;
        self.invalidate();
    }

    /// Optional phrases that may follow the entry choice.
    #[must_use]
    pub fn affixes(&self) -> Option<&[String]> {
        self.affixes.as_deref()
    }

    /// Replace the optional affix phrases. `None` (or an empty list)
    /// generates no affix slot.
    pub fn set_affixes(&mut self, affixes: Option<Vec<String>>) {
        self.affixes = affixes;
        self.invalidate();
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CommandChunkEntry] {
        &self.entries
    }

    /// Append one entry.
    ///
    /// # Errors
    /// Rejects an empty `semantic`, an empty `alternates` list (a phrase set
    /// that can never match is a configuration error, not a silent no-op),
    /// and a `semantic` this chunk already defines. `keys` may be empty for
    /// a no-op entry. On error the chunk is unchanged.
    pub fn add(
        &mut self,
        semantic: impl Into<String>,
        alternates: Vec<String>,
        keys: Vec<u16>,
    ) -> Result<(), ChunkError> {
        let semantic = semantic.into();
        if semantic.is_empty() {
            return Err(ChunkError::EmptySemantic);
        }
        if alternates.is_empty() {
            return Err(ChunkError::EmptyAlternates { semantic });
        }
        if self.entries.iter().any(|entry| entry.semantic == semantic) {
            return Err(ChunkError::DuplicateSemantic {
                chunk: self.name.clone(),
                semantic,
            });
        }

        self.entries.push(CommandChunkEntry {
            semantic,
            alternates,
            keys,
        });
        self.invalidate();
        Ok(())
    }

    /// Compile the current declared fields into a fresh grammar subtree and
    /// key table.
    ///
    /// Pure: compiling the same field values always produces structurally
    /// identical output, and a shared chunk is never mutated by a compile.
    /// Declaration-time validation makes this infallible.
    #[must_use]
    pub fn compile(&self) -> CompiledChunk {
        debug!(
            chunk = %self.name,
            entries = self.entries.len(),
            max_repeat = self.max_repeat,
            "compiling chunk"
        );

        let mut children = Vec::new();

        // An unconfigured chunk is a bare repeat container: no choice, and
        // no prefix/affix slots either.
        if !self.entries.is_empty() {
            if let Some(prefixes) = self.prefixes.as_deref() {
                if !prefixes.is_empty() {
                    children.push(GrammarNode::optional(GrammarNode::phrases(
                        prefixes.to_vec(),
                    )));
                }
            }

            let alternatives = self
                .entries
                .iter()
                .map(|entry| {
                    GrammarNode::tagged_phrases(entry.alternates.clone(), entry.semantic.clone())
                })
                .collect();
            children.push(GrammarNode::choice(alternatives));

            if let Some(affixes) = self.affixes.as_deref() {
                if !affixes.is_empty() {
                    children.push(GrammarNode::optional(GrammarNode::phrases(
                        affixes.to_vec(),
                    )));
                }
            }
        }

        // Uniqueness was enforced at add time, so collecting cannot drop
        // a binding.
        let keys = self
            .entries
            .iter()
            .map(|entry| (entry.semantic.clone(), entry.keys.clone()))
            .collect();

        CompiledChunk {
            node: GrammarNode::repeat(1, self.max_repeat, children),
            keys,
        }
    }

    /// Memoized compile result, recomputed only if a compile input changed
    /// since the last call.
    pub fn compiled(&mut self) -> &CompiledChunk {
        let current = match self.compiled.take() {
            Some(cached) => cached,
            None => self.compile(),
        };
        self.compiled.insert(current)
    }

    /// The cached compile result, if no compile input changed since the
    /// last [`compiled`](Self::compiled) call.
    #[must_use]
    pub const fn cached(&self) -> Option<&CompiledChunk> {
        self.compiled.as_ref()
    }

    fn invalidate(&mut self) {
        self.compiled = None;
    }
}
