use crate::compile::chunk::{ChunkError, CommandChunk};
use crate::grammar::GrammarNode;
use crate::keymap::{DuplicateSemantic, KeyTable};
use thiserror::Error;
use tracing::info;

/// Errors from declaring or compiling a command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Command declared with no chunks; at least a trigger is required.
    #[error("command must contain at least one chunk")]
    NoChunks,

    /// Two chunks of one command bind the same semantic label. The
    /// recognized-semantic lookup is keyed globally per command, so this is
    /// a configuration error, never a silent overwrite.
    #[error("duplicate semantic label `{semantic}` across chunks of one command")]
    DuplicateSemantic {
        /// The colliding label.
        semantic: String,
    },

    /// A chunk declaration inside the command was invalid.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// Result of compiling a command: one grammar subtree and the merged key
/// table across all of its chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCommand {
    /// Sequence group over the per-chunk subtrees, in chunk order.
    pub node: GrammarNode,
    /// Union of every chunk's key bindings.
    pub keys: KeyTable,
}

/// An ordered composition of chunks forming one invocable voice command.
///
/// The first chunk is the trigger; further chunks are additional slots that
/// must match in order. Chunks are owned by value, so attaching one takes a
/// snapshot; mutating the original afterwards cannot retroactively change
/// this command.
#[derive(Debug, Clone)]
pub struct Command {
    chunks: Vec<CommandChunk>,
}

impl Command {
    /// Command consisting of a single trigger chunk.
    #[must_use]
    pub fn new(trigger: CommandChunk) -> Self {
        Self {
            chunks: vec![trigger],
        }
    }

    /// Shorthand: build the trigger chunk from one entry.
    ///
    /// The chunk is named after the semantic label.
    ///
    /// # Errors
    /// Same declaration rules as [`CommandChunk::add`].
    pub fn with_trigger(
        semantic: &str,
        alternates: Vec<String>,
        keys: Vec<u16>,
    ) -> Result<Self, ChunkError> {
        let mut trigger = CommandChunk::new(semantic);
        trigger.add(semantic, alternates, keys)?;
        Ok(Self::new(trigger))
    }

    /// Command over an explicit chunk list.
    ///
    /// # Errors
    /// Returns [`CommandError::NoChunks`] for an empty list.
    pub fn try_from_chunks(chunks: Vec<CommandChunk>) -> Result<Self, CommandError> {
        if chunks.is_empty() {
            return Err(CommandError::NoChunks);
        }
        Ok(Self { chunks })
    }

    /// Append a chunk after the existing ones.
    pub fn push(&mut self, chunk: CommandChunk) {
        self.chunks.push(chunk);
    }

    /// Chunks in match order.
    #[must_use]
    pub fn chunks(&self) -> &[CommandChunk] {
        &self.chunks
    }

    /// Compile every chunk in order and merge the results.
    ///
    /// The grammar subtree is the ordered concatenation of the chunk
    /// subtrees (a full match requires chunk 1, then chunk 2, and so on).
    /// Pure and idempotent: the command and its chunks are not mutated, and
    /// the result is built fresh on every call.
    ///
    /// # Errors
    /// Returns [`CommandError::DuplicateSemantic`] if two chunks bind the
    /// same label.
    pub fn compile(&self) -> Result<CompiledCommand, CommandError> {
        let mut keys = KeyTable::new();
        let mut children = Vec::with_capacity(self.chunks.len());

        for chunk in &self.chunks {
            let part = chunk.compile();
            keys.merge(part.keys)
                .map_err(|DuplicateSemantic(semantic)| CommandError::DuplicateSemantic {
                    semantic,
                })?;
            children.push(part.node);
        }

        info!(
            chunks = self.chunks.len(),
            semantics = keys.len(),
            "command compiled"
        );

        Ok(CompiledCommand {
            node: GrammarNode::sequence(children),
            keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(phrases: &[&str]) -> Vec<String> {
        phrases.iter().map(|phrase| (*phrase).to_owned()).collect()
    }

    fn move_chunk() -> CommandChunk {
        let mut chunk = CommandChunk::new("Move");
        chunk
            .add("up", words(&["up", "north"]), vec![0x26])
            .unwrap();
        chunk
            .add("down", words(&["down", "south"]), vec![0x28])
            .unwrap();
        chunk
    }

    #[test]
    fn test_with_trigger_builds_single_entry_chunk() {
        let command = Command::with_trigger("navigate", words(&["go"]), vec![0x0D]).unwrap();
        assert_eq!(command.chunks().len(), 1);
        assert_eq!(command.chunks()[0].name(), "navigate");
        assert_eq!(command.chunks()[0].entries().len(), 1);
    }

    #[test]
    fn test_with_trigger_rejects_bad_entry() {
        let err = Command::with_trigger("navigate", Vec::new(), vec![0x0D]).unwrap_err();
        assert_eq!(
            err,
            ChunkError::EmptyAlternates {
                semantic: "navigate".to_owned()
            }
        );
    }

    #[test]
    fn test_try_from_chunks_rejects_empty() {
        let err = Command::try_from_chunks(Vec::new()).unwrap_err();
        assert_eq!(err, CommandError::NoChunks);
    }

    #[test]
    fn test_compile_concatenates_chunk_subtrees_in_order() {
        let mut command = Command::with_trigger("navigate", words(&["go"]), Vec::new()).unwrap();
        command.push(move_chunk());

        let compiled = command.compile().unwrap();
        let GrammarNode::Repeat { min, max, children } = &compiled.node else {
            panic!("expected sequence group");
        };
        assert_eq!((*min, *max), (1, 1));
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], command.chunks()[0].compile().node);
        assert_eq!(children[1], command.chunks()[1].compile().node);
    }

    #[test]
    fn test_compile_merges_key_tables() {
        let mut command = Command::with_trigger("navigate", words(&["go"]), Vec::new()).unwrap();
        command.push(move_chunk());

        let compiled = command.compile().unwrap();
        assert_eq!(compiled.keys.len(), 3);
        assert!(compiled.keys.contains("navigate"));
        assert_eq!(compiled.keys.get("up"), Some(&[0x26_u16] as &[u16]));
        assert_eq!(compiled.keys.get("down"), Some(&[0x28_u16] as &[u16]));
    }

    #[test]
    fn test_cross_chunk_duplicate_semantic_fails_compile() {
        let mut first = CommandChunk::new("First");
        first.add("go", words(&["go"]), vec![0x0D]).unwrap();
        let mut second = CommandChunk::new("Second");
        second.add("go", words(&["advance"]), vec![0x20]).unwrap();

        let mut command = Command::new(first);
        command.push(second);

        let err = command.compile().unwrap_err();
        assert_eq!(
            err,
            CommandError::DuplicateSemantic {
                semantic: "go".to_owned()
            }
        );
    }

    #[test]
    fn test_failed_compile_leaves_command_usable() {
        let mut command = Command::new(move_chunk());
        command.push(move_chunk());
        assert!(command.compile().is_err());

        // Dropping the colliding chunk makes the same object compile.
        let trimmed = Command::new(command.chunks()[0].clone());
        let compiled = trimmed.compile().unwrap();
        assert_eq!(compiled.keys.len(), 2);
    }

    #[test]
    fn test_compile_is_idempotent() {
        let mut command = Command::with_trigger("navigate", words(&["go"]), Vec::new()).unwrap();
        command.push(move_chunk());

        let first = command.compile().unwrap();
        let second = command.compile().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_entry_chunk_contributes_no_keys() {
        let mut command = Command::with_trigger("navigate", words(&["go"]), Vec::new()).unwrap();
        command.push(CommandChunk::new("Unconfigured"));

        let compiled = command.compile().unwrap();
        assert_eq!(compiled.keys.len(), 1);

        let GrammarNode::Repeat { children, .. } = &compiled.node else {
            panic!("expected sequence group");
        };
        assert_eq!(children[1], GrammarNode::repeat(1, 1, Vec::new()));
    }

    #[test]
    fn test_snapshot_semantics_for_attached_chunks() {
        let chunk = move_chunk();
        let command = Command::new(chunk.clone());

        // Mutating the original after attach does not affect the command.
        let mut original = chunk;
        original.add("left", words(&["left"]), vec![0x25]).unwrap();

        let compiled = command.compile().unwrap();
        assert!(!compiled.keys.contains("left"));
    }
}
