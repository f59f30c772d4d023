use anyhow::{Context, Result};
use std::path::Path;
use voice_grammar::config::{CommandSource, GrammarConfig};
use voice_grammar::telemetry;

fn main() -> Result<()> {
    // Load declarations; an explicit path wins over ~/.voice-grammar.toml
    let config = match std::env::args().nth(1) {
        Some(path) => GrammarConfig::load_from(Path::new(&path))?,
        None => GrammarConfig::load()?,
    };
    println!("✓ Config loaded ({} commands)", config.commands.len());

    telemetry::init(&config.telemetry)?;
    tracing::info!("voice-grammar starting");

    let commands = config.commands().context("invalid command declarations")?;

    for (index, command) in commands.iter().enumerate() {
        let compiled = command
            .compile()
            .with_context(|| format!("failed to compile command #{index}"))?;

        println!("\ncommand #{index}: {}", compiled.node);

        let mut rows: Vec<_> = compiled.keys.iter().collect();
        rows.sort();
        for (semantic, keys) in rows {
            println!("  {semantic} -> {keys:02X?}");
        }
    }

    tracing::info!(commands = commands.len(), "all commands compiled");

    Ok(())
}
