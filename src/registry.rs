//! Module registry: which module owns which top-level command.

use log::warn;
use serenity::builder::CreateApplicationCommand;
use std::collections::HashSet;

/// Insertion-ordered mapping from module name to the command names it owns.
///
/// Built once while the bot defines its commands. Lookups return the first
/// module that claims a name, so registration order decides ownership when two
/// modules claim the same command.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<(String, HashSet<String>)>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `commands` to `module`, creating the module on first use.
    pub fn register<I, S>(&mut self, module: &str, commands: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = match self.modules.iter().position(|(name, _)| name == module) {
            Some(index) => index,
            None => {
                self.modules.push((module.to_string(), HashSet::new()));
                self.modules.len() - 1
            }
        };
        self.modules[index].1.extend(commands.into_iter().map(Into::into));
        self
    }

    /// Registers the names of serenity command builders under `module`.
    pub fn register_builders(&mut self, module: &str, commands: &[CreateApplicationCommand]) -> &mut Self {
        let names: Vec<String> = commands
            .iter()
            .filter_map(|cmd| {
                let name = cmd.0.get("name").and_then(|v| v.as_str()).map(str::to_string);
                if name.is_none() {
                    warn!("Skipping unnamed command builder in module {}", module);
                }
                name
            })
            .collect();
        self.register(module, names)
    }

    /// Module owning the top-level command `command`.
    pub fn module_for(&self, command: &str) -> Option<&str> {
        self.modules
            .iter()
            .find(|(_, commands)| commands.contains(command))
            .map(|(name, _)| name.as_str())
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|(name, _)| name.as_str())
    }
}
