/// Chunk declaration and per-chunk compilation
pub mod chunk;
/// Multi-chunk command composition
pub mod command;

pub use chunk::{ChunkError, CommandChunk, CommandChunkEntry, CompiledChunk};
pub use command::{Command, CommandError, CompiledCommand};
