#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use omada_monitor::credentials::CredentialStore;
use omada_monitor::models::CredentialRecord;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Isolated storage directory plus a replayable client snapshot
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    /// Storage directory passed via --config-dir
    pub fn store_dir(&self) -> PathBuf {
        self.temp_dir.path().join("store")
    }

    pub fn clients_path(&self) -> PathBuf {
        self.temp_dir.path().join("clients.json")
    }

    pub fn write_clients(&self, payload: &Value) {
        fs::write(self.clients_path(), payload.to_string()).expect("write client snapshot");
    }

    /// Saves a login pointing at the replay snapshot
    pub fn save_replay_login(&self) {
        let base_url = format!("file://{}", self.clients_path().display());
        self.save_login(&CredentialRecord::new("admin", "s3cret-pass", base_url, "Default", false));
    }

    pub fn save_login(&self, record: &CredentialRecord) {
        let store = CredentialStore::new(self.store_dir());
        store.ensure_ready().expect("storage ready");
        store.save(record).expect("credentials saved");
    }

    pub fn write_config(&self, toml: &str) {
        fs::create_dir_all(self.store_dir()).expect("store dir");
        fs::write(self.store_dir().join("config.toml"), toml).expect("write config");
    }

    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo_bin_cmd!("omada-monitor");
        cmd.env_remove("OMADA_MONITOR_HOME")
            .arg("--config-dir")
            .arg(self.store_dir())
            .arg("--no-prompt");
        cmd
    }
}

/// Three clients: wireless, wired and one with missing fields
pub fn sample_clients() -> Value {
    json!({
        "result": {
            "data": [
                {
                    "name": "laptop",
                    "ip": "192.168.0.20",
                    "active": true,
                    "connectDevType": "ap",
                    "ssid": "HomeNet",
                    "apName": "Hallway AP",
                    "activity": 1500,
                    "trafficDown": 1048576,
                    "trafficUp": 2048,
                    "uptime": 3725
                },
                {
                    "name": "nas",
                    "ip": "192.168.0.3",
                    "active": true,
                    "connectDevType": "switch",
                    "networkName": "LAN",
                    "switchName": "Core",
                    "port": 4,
                    "activity": 0,
                    "trafficDown": 5000000000u64,
                    "trafficUp": 5,
                    "uptime": 90061
                },
                {
                    "name": "ghost",
                    "active": false
                }
            ]
        }
    })
}

pub fn file_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).expect("metadata").permissions().mode() & 0o777
}
