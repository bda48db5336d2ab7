//! Celebration effects fired when a task lands in the Completed column.

use std::io::{self, Write};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::types::Task;

/// Where the completion celebration goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CelebrationBackend {
    /// No effect
    None,
    /// Terminal bell only
    Bell,
    /// Desktop notification only (via notify-rust)
    System,
    /// Bell and desktop notification
    #[default]
    Both,
}

impl CelebrationBackend {
    pub fn from_settings_value(s: &str) -> Option<Self> {
        Self::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bell => "bell",
            Self::System => "system",
            Self::Both => "both",
        }
    }
}

impl FromStr for CelebrationBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "bell" => Ok(Self::Bell),
            "system" => Ok(Self::System),
            "both" => Ok(Self::Both),
            _ => Err(()),
        }
    }
}

/// Fire-and-forget: failures are logged and swallowed, and the task
/// collection is never touched.
pub fn celebrate_completion(task: &Task, backend: CelebrationBackend) {
    let (ring, notify) = backend_targets(backend);
    if !ring && !notify {
        debug!(task_id = %task.id, "celebration skipped (backend is none)");
        return;
    }

    let message = format!("✔ Task completed | {}", task.content);

    if ring {
        ring_terminal_bell();
    }

    if notify {
        send_system_notification(task, &message);
    }
}

fn backend_targets(backend: CelebrationBackend) -> (bool, bool) {
    match backend {
        CelebrationBackend::None => (false, false),
        CelebrationBackend::Bell => (true, false),
        CelebrationBackend::System => (false, true),
        CelebrationBackend::Both => (true, true),
    }
}

fn ring_terminal_bell() {
    let mut stderr = io::stderr();
    let _ = stderr.write_all(b"\x07");
    let _ = stderr.flush();
}

fn send_system_notification(task: &Task, message: &str) {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        let result = notify_rust::Notification::new()
            .summary("Cyber Tasker")
            .body(message)
            .icon("dialog-information")
            .show();

        match result {
            Ok(_) => debug!(task_id = %task.id, "celebration notification sent"),
            Err(err) => warn!(error = %err, "failed to send celebration notification"),
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = message;
        debug!(task_id = %task.id, "system notifications not supported on this OS");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_supported_values() {
        assert_eq!(
            CelebrationBackend::from_settings_value("bell"),
            Some(CelebrationBackend::Bell)
        );
        assert_eq!(
            CelebrationBackend::from_settings_value("SYSTEM"),
            Some(CelebrationBackend::System)
        );
        assert_eq!(
            CelebrationBackend::from_settings_value(" both "),
            Some(CelebrationBackend::Both)
        );
        assert_eq!(
            CelebrationBackend::from_settings_value("none"),
            Some(CelebrationBackend::None)
        );
        assert_eq!(CelebrationBackend::from_settings_value("confetti"), None);
    }

    #[test]
    fn backend_as_str_roundtrip() {
        for backend in [
            CelebrationBackend::None,
            CelebrationBackend::Bell,
            CelebrationBackend::System,
            CelebrationBackend::Both,
        ] {
            assert_eq!(
                CelebrationBackend::from_settings_value(backend.as_str()),
                Some(backend)
            );
        }
    }

    #[test]
    fn backend_targets_match_variants() {
        assert_eq!(backend_targets(CelebrationBackend::None), (false, false));
        assert_eq!(backend_targets(CelebrationBackend::Bell), (true, false));
        assert_eq!(backend_targets(CelebrationBackend::System), (false, true));
        assert_eq!(backend_targets(CelebrationBackend::Both), (true, true));
    }

    #[test]
    fn default_backend_is_both() {
        assert_eq!(CelebrationBackend::default(), CelebrationBackend::Both);
    }
}
