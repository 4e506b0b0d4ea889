use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};
use tokio::time::Duration;

/// Which view owns the monitoring loop; the live monitor refreshes faster
/// than the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorView {
    Dashboard,
    LiveMonitor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorCadence {
    pub dashboard_interval_ms: u64,
    pub live_interval_ms: u64,
}

impl Default for MonitorCadence {
    fn default() -> Self {
        Self {
            dashboard_interval_ms: 5000,
            live_interval_ms: 3000,
        }
    }
}

impl MonitorCadence {
    pub fn interval(&self, view: MonitorView) -> Duration {
        match view {
            MonitorView::Dashboard => Duration::from_millis(self.dashboard_interval_ms),
            MonitorView::LiveMonitor => Duration::from_millis(self.live_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    cadence: MonitorCadence,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn cadence(&self) -> MonitorCadence {
        self.data.read().unwrap().cadence.clone()
    }

    pub fn update_cadence(&self, cadence: MonitorCadence) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.cadence = cadence;
            self.persist(&guard)?;
        }
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cadence_matches_views() {
        let cadence = MonitorCadence::default();
        assert_eq!(
            cadence.interval(MonitorView::Dashboard),
            Duration::from_millis(5000)
        );
        assert_eq!(
            cadence.interval(MonitorView::LiveMonitor),
            Duration::from_millis(3000)
        );
    }

    #[test]
    fn cadence_survives_persist_and_reload() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).expect("create store");
        store
            .update_cadence(MonitorCadence {
                dashboard_interval_ms: 8000,
                live_interval_ms: 2000,
            })
            .expect("update cadence");

        let reopened = SettingsStore::new(path).expect("reopen store");
        let cadence = reopened.cadence();
        assert_eq!(cadence.dashboard_interval_ms, 8000);
        assert_eq!(cadence.live_interval_ms, 2000);
    }
}
