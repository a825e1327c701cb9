//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use ipmi_sidecar::{reload_gate, ConfigTransactionManager, ReloadError, ReloadGate, UpdateConfigCmd};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Config file content present before every test.
pub const TEMPLATE_YAML: &str = r#"modules:
  default:
    user: "template_user"
    pass: "template_pw"
    driver: "LAN"
    privilege: "admin"
    timeout: 5000
    collectors:
    - ipmi
"#;

pub const UPDATE_YAML: &str = r#"
modules:
  default:
    user: "default_user"
    pass: "example_pw"
    driver: "LAN_2_0"
    privilege: "user"
    timeout: 10000
    collectors:
    - bmc
    - ipmi
    - chassis
    exclude_sensor_ids:
    - 2
    - 29
    - 32
    - 50
    - 52
    - 55
"#;

pub const BAD_YAML: &str = r#"
modules:
  default:
    blah blah
    user: "default_user"
    pass: "example_pw"
    driver: "LAN_2_0"
    privilege: "user"
    timeout: 10000
"#;

pub struct Fixture {
    pub dir: TempDir,
    pub config_file: PathBuf,
    pub manager: Arc<ConfigTransactionManager>,
}

impl Fixture {
    pub fn read_file(&self) -> Vec<u8> {
        fs::read(&self.config_file).unwrap()
    }
}

/// Temp dir with `ipmi.yml` holding `TEMPLATE_YAML` and an unbound manager over it.
pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config_file = dir.path().join("ipmi.yml");
    fs::write(&config_file, TEMPLATE_YAML).unwrap();
    let manager = Arc::new(ConfigTransactionManager::new(&config_file));
    Fixture {
        dir,
        config_file,
        manager,
    }
}

pub fn update_cmd(zone_id: &str) -> UpdateConfigCmd {
    UpdateConfigCmd {
        zone_id: zone_id.to_string(),
        yaml: UPDATE_YAML.to_string(),
    }
}

/// A gate whose collaborator answers the first request with `outcome`.
///
/// The handle yields whether a request arrived at all.
pub fn answer_once(outcome: Result<(), ReloadError>) -> (ReloadGate, JoinHandle<bool>) {
    let (gate, mut requests) = reload_gate();
    let handle = tokio::spawn(async move {
        match requests.recv().await {
            Some(request) => {
                request.respond(outcome);
                true
            }
            None => false,
        }
    });
    (gate, handle)
}

/// A gate whose collaborator accepts every request until all gates drop.
pub fn accept_all() -> (ReloadGate, JoinHandle<usize>) {
    let (gate, mut requests) = reload_gate();
    let handle = tokio::spawn(async move {
        let mut served = 0;
        while let Some(request) = requests.recv().await {
            request.succeed();
            served += 1;
        }
        served
    });
    (gate, handle)
}
