/// Wire models for the SPR admin API status endpoints
///
/// Every entity here is a transient snapshot: each successful fetch
/// replaces the previous value wholesale, no merging or diffing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::utils::{nice_name, ContainerState};

/// Snapshot returned by `GET /info/uptime`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UptimeInfo {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub uptime: String,
    #[serde(default)]
    pub users: String,
    #[serde(default)]
    pub load_1m: String,
    #[serde(default)]
    pub load_5m: String,
    #[serde(default)]
    pub load_15m: String,
}

impl UptimeInfo {
    /// Display value for a raw key; unknown keys render empty
    pub fn get(&self, key: &str) -> &str {
        match key {
            "time" => &self.time,
            "uptime" => &self.uptime,
            "users" => &self.users,
            "load_1m" => &self.load_1m,
            "load_5m" => &self.load_5m,
            "load_15m" => &self.load_15m,
            _ => "",
        }
    }
}

/// Filesystem bind between host and container. The `Type` tag is kept
/// for a future column but not currently displayed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MountInfo {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub mode: String,
    #[serde(rename = "Type", default)]
    pub mount_type: String,
}

/// One entry of the `GET /info/docker` container list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    #[serde(default)]
    pub id: String,
    /// Normalized at the serde boundary: the wire sends `Names` as a bare
    /// string or a sequence, downstream code only ever sees a sequence.
    #[serde(default, deserialize_with = "names_as_vec")]
    pub names: Vec<String>,
    #[serde(default)]
    pub image: String,
    /// Raw backend state string ("running", "exited", ...)
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub mounts: Vec<MountInfo>,
}

impl ContainerSummary {
    /// Canonical display name (first name, leading `/` stripped)
    pub fn display_name(&self) -> String {
        nice_name(&self.names)
    }

    pub fn lifecycle(&self) -> ContainerState {
        ContainerState::from(self.state.as_str())
    }
}

fn names_as_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NameOrNames {
        One(String),
        Many(Vec<String>),
    }

    Ok(match NameOrNames::deserialize(deserializer)? {
        NameOrNames::One(name) => vec![name],
        NameOrNames::Many(names) => names,
    })
}

/// Unwrap a scalar endpoint response. `/info/hostname` and `/version`
/// return either a bare JSON string or an object wrapping it, e.g.
/// `{"hostname": "router1"}`.
pub fn unwrap_scalar(value: &Value, key: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| map.values().find_map(|v| v.as_str().map(str::to_string)))
            .unwrap_or_default(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
