// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts service groups as space-separated strings or YAML lists.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;

pub fn deserialize_groups_option<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, NonEmpty<String>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<HashMap<String, GroupEntry>> = Option::deserialize(deserializer)?;
    let Some(entries) = opt else {
        return Ok(None);
    };

    entries
        .into_iter()
        .map(|(name, entry)| {
            let services = entry.into_services();
            NonEmpty::from_vec(services)
                .map(|services| (name.clone(), services))
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("service group '{name}' cannot be empty"))
                })
        })
        .collect::<Result<HashMap<_, _>, _>>()
        .map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupEntry {
    Simple(String),
    List(Vec<String>),
}

impl GroupEntry {
    fn into_services(self) -> Vec<String> {
        match self {
            GroupEntry::Simple(s) => s.split_whitespace().map(str::to_string).collect(),
            GroupEntry::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}
