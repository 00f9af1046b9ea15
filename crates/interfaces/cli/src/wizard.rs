//! First-run config questions.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::Result;
use notekeeper_config::AppConfig;

/// Loads the config at `path`, creating it on first run.  The questions are
/// only asked on an interactive terminal; otherwise defaults are written.
pub fn load_or_create(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        return AppConfig::load_from(path);
    }

    let mut config = AppConfig::load_from(path)?;
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        ask(&mut config)?;
    }
    config.save_to(path)?;
    println!("created config file {}", path.display());
    Ok(config)
}

pub fn init_config(path: &Path, accept_defaults: bool) -> Result<AppConfig> {
    let mut config = AppConfig::load_from(path)?;
    if !accept_defaults {
        ask(&mut config)?;
    }
    config.save_to(path)?;
    Ok(config)
}

fn ask(config: &mut AppConfig) -> Result<()> {
    println!("A new config file will be created. Please answer 3 questions.");
    config.paths.base = prompt(
        "Full path to the base file (with file name)",
        &config.base_path().display().to_string(),
    )?;
    config.paths.interface = prompt(
        "Path to the new note file",
        &config.interface_path().display().to_string(),
    )?;
    config.editor.command = prompt(
        "Shell command to open your text editor",
        &config.editor.command,
    )?;
    Ok(())
}

fn prompt(label: &str, default_value: &str) -> Result<String> {
    print!("{} [{}]: ", label, default_value);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(answer_or_default(&line, default_value))
}

fn answer_or_default(line: &str, default_value: &str) -> String {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return default_value.to_string();
    }
    trimmed.to_string()
}
