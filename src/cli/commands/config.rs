use anyhow::Result;

use crate::Config;

/// Print the effective configuration with source attribution
pub fn execute_config_command(config: &Config) -> Result<()> {
    println!("{}", render(config));
    Ok(())
}

fn render(config: &Config) -> String {
    let mut out = String::new();
    match &config.config_path {
        Some(path) => out.push_str(&format!("Config file: {}\n", path.display())),
        None => out.push_str("Config file: (none found, using defaults and flags)\n"),
    }

    out.push_str("\nEffective configuration:\n");
    for (key, (value, source)) in config.effective_config() {
        out.push_str(&format!("  {key} = {value} (from {source})\n"));
    }
    out
}
