//! `name=value` assignments from the command line.

use tracing::info;

use crate::definition::StoreDefinition;
use crate::error::{StoreError, StoreResult};
use crate::store::DataStore;

/// Applies `name=value` arguments to a store, resolving names through a definition.
#[derive(Debug, Clone, Copy)]
pub struct CommandLineArgs<'a> {
    definition: &'a dyn StoreDefinition,
}

impl<'a> CommandLineArgs<'a> {
    /// Parser over the keys of `definition`.
    pub fn new(definition: &'a dyn StoreDefinition) -> Self {
        Self { definition }
    }

    /// Parses each argument and stores its value.
    ///
    /// The argument is split at the first `=`, so values may contain further
    /// `=` signs and spaces. Arguments without `=`, unknown names, keys without
    /// a codec and values the codec rejects are logged and skipped. An empty
    /// name is an error. Returns how many assignments were applied.
    pub fn apply<I, S>(&self, store: &mut DataStore, args: I) -> StoreResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut applied = 0;
        for arg in args {
            let arg = arg.as_ref();
            let Some((name, text)) = arg.split_once('=') else {
                info!(argument = arg, "ignoring argument without '='");
                continue;
            };
            if name.is_empty() {
                return Err(StoreError::EmptyArgumentKey {
                    argument: arg.to_string(),
                });
            }
            let Ok(key) = self.definition.get_key(name) else {
                info!(key = name, "ignoring unknown option");
                continue;
            };
            if !key.has_codec() {
                info!(key = name, "ignoring option without a string codec");
                continue;
            }
            match key.decode_raw(text) {
                Ok(value) => {
                    store.set_raw(&key, value)?;
                    applied += 1;
                }
                Err(err) => info!(key = name, error = %err, "ignoring option with invalid value"),
            }
        }
        Ok(applied)
    }

    /// Usage text listing every option.
    pub fn help(&self) -> String {
        let options: String = self
            .definition
            .keys()
            .iter()
            .map(|key| match key.label() {
                Some(label) => format!(" - {key} : {label}\n"),
                None => format!(" - {key}\n"),
            })
            .collect();
        format!("Use: <OPTION>=<VALUE>\n\nAvailable options:\n{options}")
    }
}
