use std::io::Write;

use clap::Subcommand;
use tracing::info;

use fsstore::{json_to_value, value_to_json, Error, IoOperation, KeyValueStorage, Result};

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List every key in the namespace
    Keys,
    /// Print the value stored under a key as JSON
    Get { key: String },
    /// Store a JSON value under a key
    Set { key: String, json: String },
    /// Delete a key and prune empty directories
    Delete { key: String },
    /// Print whether a key exists
    Has { key: String },
    /// Delete every key in the namespace
    Purge,
}

/// Runs `command` against `storage`, writing its output to `out`.
pub fn execute(command: &Command, storage: &KeyValueStorage, out: &mut impl Write) -> Result<()> {
    let stdout = |error: std::io::Error| Error::io(IoOperation::Write, "<stdout>", error);

    match command {
        Command::Keys => {
            for key in storage.keys()? {
                writeln!(out, "{key}").map_err(stdout)?;
            }
        }
        Command::Get { key } => {
            let value = storage.get(key)?;
            let json = serde_json::to_string_pretty(&value_to_json(&value))
                .map_err(|e| Error::serialization("json", e.to_string()))?;
            writeln!(out, "{json}").map_err(stdout)?;
        }
        Command::Set { key, json } => {
            let parsed: serde_json::Value = serde_json::from_str(json)
                .map_err(|e| Error::serialization("json", e.to_string()))?;
            storage.set(key, json_to_value(parsed))?;
            info!(key = %key, "stored value");
        }
        Command::Delete { key } => storage.delete(key)?,
        Command::Has { key } => {
            writeln!(out, "{}", storage.has(key)?).map_err(stdout)?;
        }
        Command::Purge => {
            storage.purge()?;
            info!(path = %storage.storage().path().display(), "purged namespace");
        }
    }

    Ok(())
}
