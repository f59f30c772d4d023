//! Voice Grammar - voice-command grammar compiler
//!
//! Compiles declarative voice-command definitions into a constrained
//! grammar tree for a speech-recognition engine, plus the inverse lookup
//! from each recognized semantic label to the key sequence it triggers.

/// Chunk and command compilation
pub mod compile;
/// Declarative command definitions (TOML)
pub mod config;
/// Grammar tree handed to the recognition engine
pub mod grammar;
/// Semantic label → key sequence lookup
pub mod keymap;
/// Telemetry and compile logging
pub mod telemetry;
