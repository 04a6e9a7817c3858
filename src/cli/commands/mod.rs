pub mod expense;
pub mod payment;
pub mod system;

use std::collections::{HashMap, HashSet};

use crate::cli::registry::CommandRegistry;
use crate::errors::CliError;

/// Builds the full command table in help-listing order.
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in system::init_definitions()
        .into_iter()
        .chain(expense::definitions())
        .chain(payment::definitions())
        .chain(system::export_definitions())
    {
        registry.register(entry);
    }
    registry
}

/// Hand-parsed command tokens: positionals, `--flag value` pairs, and bare
/// switches named up front by each command.
#[derive(Debug)]
pub struct CommandArgs {
    positionals: Vec<String>,
    flags: HashMap<String, String>,
    switches: HashSet<String>,
}

impl CommandArgs {
    pub fn parse(args: &[&str], switch_names: &[&str]) -> Result<Self, CliError> {
        let mut positionals = Vec::new();
        let mut flags = HashMap::new();
        let mut switches = HashSet::new();
        let mut index = 0;
        while index < args.len() {
            let token = args[index];
            if let Some(name) = token.strip_prefix("--") {
                if switch_names.contains(&name) {
                    switches.insert(name.to_string());
                } else {
                    index += 1;
                    let value = args.get(index).ok_or_else(|| {
                        CliError::InvalidArguments(format!("--{name} requires a value"))
                    })?;
                    flags.insert(name.to_string(), value.to_string());
                }
            } else {
                positionals.push(token.to_string());
            }
            index += 1;
        }
        Ok(Self {
            positionals,
            flags,
            switches,
        })
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    pub fn positional_count(&self) -> usize {
        self.positionals.len()
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    pub fn flag_owned(&self, name: &str) -> Option<String> {
        self.flags.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.switches.contains(name)
    }
}

pub(crate) fn usage_error(usage: &str) -> CliError {
    CliError::InvalidArguments(format!("usage: billbook {usage}"))
}
