//! commands command - List the registered commands

use super::Context;
use crate::handlers::builtin_registry;
use crate::interp::{CommandEntry, Handler};
use crate::ui::output;
use anyhow::Result;

/// Render the command table in registry order.
///
/// Privileged commands are marked with `*`.
pub fn render(entries: &[CommandEntry<Handler>], prefix: char) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let marker = if entry.requires_privilege { '*' } else { ' ' };
        out.push_str(&format!(
            "{} {:<width$}  {}{}\n",
            marker,
            entry.name,
            prefix,
            entry.usage,
            width = width
        ));
    }
    out
}

/// Print the command table.
pub fn commands(ctx: &Context) -> Result<()> {
    let registry = builtin_registry();
    print!("{}", render(registry.entries(), ctx.config.prefix()));
    output::print("\n* requires a master key", ctx.verbosity);
    Ok(())
}
