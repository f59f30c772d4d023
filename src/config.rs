use crate::compile::{Command, CommandChunk};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Source of validated command declarations (enables testing via mocking)
#[cfg_attr(test, mockall::automock)]
pub trait CommandSource {
    /// Produce the declared commands, validated into core types.
    ///
    /// # Errors
    /// Returns an error when any declaration violates the core rules
    /// (empty command, bad repeat bound, entry without phrases, ...).
    fn commands(&self) -> Result<Vec<Command>>;
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GrammarConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandDef>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub log_path: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: "~/.voice-grammar/compile.log".to_owned(),
        }
    }
}

/// On-disk declaration of one voice command: its chunks, in match order.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CommandDef {
    #[serde(default, rename = "chunk")]
    pub chunks: Vec<ChunkDef>,
}

/// On-disk declaration of one chunk. Round-trips every field losslessly.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChunkDef {
    pub name: String,
    #[serde(default = "default_max_repeat")]
    pub max_repeat: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affixes: Option<Vec<String>>,
    #[serde(default, rename = "entry")]
    pub entries: Vec<EntryDef>,
}

/// On-disk declaration of one entry. `keys` is required (an empty list is a
/// deliberate no-op; an absent list is a mistake).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EntryDef {
    pub semantic: String,
    pub alternates: Vec<String>,
    pub keys: Vec<u16>,
}

const fn default_max_repeat() -> u32 {
    1
}

impl TryFrom<&ChunkDef> for CommandChunk {
    type Error = crate::compile::ChunkError;

    fn try_from(def: &ChunkDef) -> Result<Self, Self::Error> {
        let mut chunk = Self::new(def.name.clone());
        chunk.set_max_repeat(def.max_repeat)?;
        chunk.set_prefixes(def.prefixes.clone());
        chunk.set_affixes(def.affixes.clone());
        for entry in &def.entries {
            chunk.add(
                entry.semantic.clone(),
                entry.alternates.clone(),
                entry.keys.clone(),
            )?;
        }
        Ok(chunk)
    }
}

impl TryFrom<&CommandDef> for Command {
    type Error = crate::compile::CommandError;

    fn try_from(def: &CommandDef) -> Result<Self, Self::Error> {
        let chunks = def
            .chunks
            .iter()
            .map(CommandChunk::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_chunks(chunks)
    }
}

impl CommandSource for GrammarConfig {
    fn commands(&self) -> Result<Vec<Command>> {
        self.commands
            .iter()
            .enumerate()
            .map(|(index, def)| {
                Command::try_from(def).with_context(|| format!("invalid command #{index}"))
            })
            .collect()
    }
}

impl GrammarConfig {
    /// Load config from ~/.voice-grammar.toml, writing a default on first run
    ///
    /// # Errors
    /// Returns error if the file cannot be read, created, or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default(&config_path).context("failed to create default config")?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents).context("failed to parse config TOML")?;

        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".voice-grammar.toml"))
    }

    fn create_default(path: &Path) -> Result<()> {
        let default_config = r#"[telemetry]
enabled = false
log_path = "~/.voice-grammar/compile.log"

# One [[command]] block per voice command; its chunks must match in order.
[[command]]

[[command.chunk]]
name = "navigate"

[[command.chunk.entry]]
semantic = "navigate"
alternates = ["go", "head"]
keys = []

[[command.chunk]]
name = "direction"
max_repeat = 2
affixes = ["now"]

[[command.chunk.entry]]
semantic = "up"
alternates = ["up", "north"]
keys = [0x26]

[[command.chunk.entry]]
semantic = "down"
alternates = ["down", "south"]
keys = [0x28]

[[command.chunk.entry]]
semantic = "left"
alternates = ["left", "west"]
keys = [0x25]

[[command.chunk.entry]]
semantic = "right"
alternates = ["right", "east"]
keys = [0x27]
"#;
        fs::write(path, default_config).context("failed to write default config")?;
        Ok(())
    }
}
