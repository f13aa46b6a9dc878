//! JSON shapes returned by the controller for everything but scenes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "sectionID", default)]
    pub section_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// A physical or virtual device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(rename = "roomID", default)]
    pub room_id: i64,
    #[serde(rename = "parentId", default)]
    pub parent_id: i64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Device-specific properties, kept verbatim.
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl Device {
    /// Whether the device advertises `interface`, e.g. `zwaveCentralScene`.
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVariable {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub enum_values: Vec<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub modified: i64,
}

/// `/settings/info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hc2Info {
    pub serial_number: String,
    pub hc_name: String,
    pub mac: String,
    pub soft_version: String,
    pub beta: bool,
    pub zwave_version: String,
    pub zwave_region: String,
    pub server_status: i64,
}

/// `/settings/network`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hc2Network {
    pub dhcp: bool,
    pub ip: String,
    pub mask: String,
    pub gateway: String,
    pub dns: String,
    pub remote_access: bool,
    pub remote_access_support: i64,
}

/// `/loginStatus`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginStatus {
    pub status: bool,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub username: String,
    #[serde(rename = "type")]
    pub user_type: String,
}

/// Human-readable description of the controller and the logged-in user.
///
/// `login` carries the raw response body when the login was refused.
pub fn render_connection_summary(
    info: &Hc2Info,
    network: &Hc2Network,
    login: Result<&LoginStatus, &str>,
    indent: usize,
) -> String {
    let ind = " ".repeat(indent);
    let mut out = String::from("Successful connected to ...\n");
    out.push_str(&format!("{ind}Name         : {}\n", info.hc_name));
    out.push_str(&format!("{ind}Serial       : {}\n", info.serial_number));
    out.push_str(&format!("{ind}IP           : {}\n", network.ip));
    out.push_str(&format!("{ind}Version      : {}\n", info.soft_version));
    out.push_str(&format!("{ind}ZWaveVersion : {}\n", info.zwave_version));
    out.push('\n');

    match login {
        Ok(status) => {
            out.push_str("and logged in as:\n");
            out.push_str(&format!("{ind}User:         {}\n", status.username));
            out.push_str(&format!("{ind}Type:         {}\n", status.user_type));
        }
        Err(body) => {
            out.push_str("couldn't log in with resp:\n");
            out.push_str(body);
        }
    }
    out
}
