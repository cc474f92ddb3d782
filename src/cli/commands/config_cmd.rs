//! config command - Show or create the configuration file

use std::path::Path;

use super::Context;
use crate::core::config::Config;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Print the effective configuration as TOML.
///
/// Every key is shown with its resolved value, including defaults the file
/// leaves unset.
pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    match config.loaded_from() {
        Some(path) => output::log(format!("loaded from {}", path.display()), ctx.verbosity),
        None => output::log("no config file found, using defaults", ctx.verbosity),
    }

    let mut effective = Config::defaults_file();
    effective.prefix = Some(config.prefix().to_string());
    effective.max_message_length = Some(config.max_message_length());
    effective.aliases = Some(config.aliases());
    effective.bot_name = Some(config.bot_name().to_string());
    effective.public_chat_id = config.public_chat_id().map(str::to_string);
    effective.default_group = Some(config.default_group());
    effective.purge_days = Some(config.purge_days());
    if let Some(files) = effective.files.as_mut() {
        files.masterkeys = Some(config.masterkeys_path().display().to_string());
        files.blockedkeys = Some(config.blockedkeys_path().display().to_string());
        files.help_file = Some(config.help_file_path().display().to_string());
        files.chat_ids_file = Some(config.chat_ids_path().display().to_string());
    }

    let text = toml::to_string_pretty(&effective).context("Failed to serialize config")?;
    print!("{}", text);
    Ok(())
}

/// Write a config file populated with the defaults.
pub fn init(ctx: &Context, path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path().context("Failed to locate config directory")?,
    };
    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::write_atomic(&path, &Config::defaults_file()).context("Failed to write config")?;
    output::print(format!("Wrote {}", path.display()), ctx.verbosity);
    Ok(())
}
