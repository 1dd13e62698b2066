// src/view/status.rs
use crate::health::{CheckState, ServiceSnapshot};

pub const CONNECTED: &str = "✅ Connected";
pub const UNHEALTHY: &str = "⚠️ Unhealthy";
pub const FAILED: &str = "❌ Failed";
pub const CHECKING: &str = "⏳ Checking...";

pub fn status_indicator(state: &CheckState) -> &'static str {
    match state {
        CheckState::Checking => CHECKING,
        CheckState::Reported(status) if status.is_healthy() => CONNECTED,
        CheckState::Reported(_) => UNHEALTHY,
        CheckState::Failed(_) => FAILED,
    }
}

/// Literal status text: the reported value, `Unknown` when the field was
/// absent, `Error` when the call itself failed.
pub fn status_label(state: &CheckState) -> &str {
    match state {
        CheckState::Checking => "checking",
        CheckState::Reported(status) => status.status.as_deref().unwrap_or("Unknown"),
        CheckState::Failed(_) => "Error",
    }
}

pub fn render_service(snapshot: &ServiceSnapshot, details: bool) -> String {
    let mut out = format!(
        "{}: {} ({})",
        capitalize(snapshot.name),
        status_indicator(&snapshot.state),
        status_label(&snapshot.state)
    );

    if details {
        match &snapshot.state {
            CheckState::Reported(status) => {
                if let Some(database) = &status.database {
                    out.push_str(&format!("\n    database: {}", database));
                }
                if let Some(message) = &status.message {
                    out.push_str(&format!("\n    message: {}", message));
                }
            }
            CheckState::Failed(error) => out.push_str(&format!("\n    error: {}", error)),
            CheckState::Checking => {}
        }
        if let Some(at) = snapshot.checked_at {
            out.push_str(&format!("\n    checked: {}", at.format("%H:%M:%S")));
        }
    }
    out
}

pub fn render_statuses(snapshots: &[ServiceSnapshot], details: bool) -> String {
    snapshots
        .iter()
        .map(|s| render_service(s, details))
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Endpoint, HealthStatus};

    fn snapshot(name: &'static str, state: CheckState) -> ServiceSnapshot {
        ServiceSnapshot {
            name,
            endpoint: Endpoint::Health,
            state,
            checked_at: None,
        }
    }

    #[test]
    fn test_labels() {
        let healthy = CheckState::Reported(HealthStatus::healthy("backend"));
        assert_eq!(status_indicator(&healthy), CONNECTED);
        assert_eq!(status_label(&healthy), "healthy");

        let missing = CheckState::Reported(HealthStatus::default());
        assert_eq!(status_indicator(&missing), UNHEALTHY);
        assert_eq!(status_label(&missing), "Unknown");

        let connected = CheckState::Reported(HealthStatus {
            status: Some("connected".into()),
            ..Default::default()
        });
        assert_eq!(status_indicator(&connected), UNHEALTHY);
        assert_eq!(status_label(&connected), "connected");

        let failed = CheckState::Failed("connection refused".into());
        assert_eq!(status_indicator(&failed), FAILED);
        assert_eq!(status_label(&failed), "Error");
    }

    #[test]
    fn test_render_details() {
        let db = snapshot(
            "database",
            CheckState::Reported(HealthStatus {
                status: Some("error".into()),
                database: Some("postgres".into()),
                message: Some("too many connections".into()),
                ..Default::default()
            }),
        );

        assert_eq!(render_service(&db, false), "Database: ⚠️ Unhealthy (error)");
        let detailed = render_service(&db, true);
        assert!(detailed.contains("database: postgres"));
        assert!(detailed.contains("message: too many connections"));
    }
}
