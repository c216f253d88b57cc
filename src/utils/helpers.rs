/// Helper utilities for the SPR status dashboard

use ratatui::style::Color;

/// Turn a raw uptime key into a display label: capitalize the first
/// letter, replace the first underscore with a space, and expand a
/// trailing `m` to ` min` (`load_1m` -> "Load 1 min").
pub fn nice_key(key: &str) -> String {
    let mut label = key.replacen('_', " ", 1);
    if label.ends_with('m') {
        label.truncate(label.len() - 1);
        label.push_str(" min");
    }

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => label,
    }
}

/// Canonical display name for a container: first of its names with one
/// leading `/` stripped. Containers with no names display as "".
pub fn nice_name(names: &[String]) -> String {
    names
        .first()
        .map(|name| name.strip_prefix('/').unwrap_or(name).to_string())
        .unwrap_or_default()
}

/// Route to the admin UI logs view for a (normalized) container name
pub fn logs_route(container_name: &str) -> String {
    format!("/admin/logs/{}", container_name)
}

/// Truncate string with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Container lifecycle state as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Unknown,
}

impl From<&str> for ContainerState {
    fn from(state: &str) -> Self {
        match state.to_lowercase().as_str() {
            "running" => ContainerState::Running,
            "exited" => ContainerState::Exited,
            _ => ContainerState::Unknown,
        }
    }
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }

    /// Badge color for terminal display. Total over every backend state
    /// string: running is success, exited is warning, anything else muted.
    pub fn tone(&self) -> Color {
        match self {
            ContainerState::Running => Color::Green,
            ContainerState::Exited => Color::Yellow,
            ContainerState::Unknown => Color::DarkGray,
        }
    }
}
