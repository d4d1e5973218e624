// ABOUTME: KEY=VALUE parsing and container environment editing.
// ABOUTME: Produces the edited variable list plus a per-key change report.

use crate::error::{Error, Result};
use aws_sdk_ecs::types::KeyValuePair;

/// What happened to one requested variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvChange {
    Unchanged { key: String, value: String },
    Updated { key: String, old: String, new: String },
    Added { key: String, value: String },
}

/// Parse `KEY=VALUE` arguments. The value may itself contain `=`.
pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
                _ => Err(Error::validation(format!("Not a valid pair: {pair}"))),
            }
        })
        .collect()
}

/// Apply `pairs` to `current`. Existing keys keep their position; new keys
/// are appended in request order.
pub fn apply_pairs(
    current: &[KeyValuePair],
    pairs: &[(String, String)],
) -> (Vec<KeyValuePair>, Vec<EnvChange>) {
    let mut environment = current.to_vec();
    let mut changes = Vec::with_capacity(pairs.len());

    for (key, value) in pairs {
        match environment
            .iter_mut()
            .find(|kv| kv.name() == Some(key.as_str()))
        {
            Some(existing) if existing.value() == Some(value.as_str()) => {
                changes.push(EnvChange::Unchanged {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
            Some(existing) => {
                changes.push(EnvChange::Updated {
                    key: key.clone(),
                    old: existing.value().unwrap_or_default().to_string(),
                    new: value.clone(),
                });
                existing.value = Some(value.clone());
            }
            None => {
                changes.push(EnvChange::Added {
                    key: key.clone(),
                    value: value.clone(),
                });
                environment.push(KeyValuePair::builder().name(key).value(value).build());
            }
        }
    }

    (environment, changes)
}

/// True when any change would alter the environment.
pub fn has_changes(changes: &[EnvChange]) -> bool {
    changes
        .iter()
        .any(|c| !matches!(c, EnvChange::Unchanged { .. }))
}
