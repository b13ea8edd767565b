//! Decoding of submitted HTML forms into credentials.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::payload::{AuthType, WifiCredentials};

pub const DEFAULT_AUTH: &str = "WPA";
pub const DOWNLOAD_FILENAME: &str = "wifi_qr.png";

/// Body of `POST /generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub auth: Option<String>,
    /// Checkbox: present (with any value) means hidden.
    #[serde(default)]
    pub hidden: Option<String>,
}

impl GenerateForm {
    /// Returns `None` when the SSID is blank after trimming.
    pub fn into_credentials(self) -> Option<WifiCredentials> {
        let ssid = self.ssid.trim();
        if ssid.is_empty() {
            return None;
        }

        let auth = self
            .auth
            .as_deref()
            .unwrap_or(DEFAULT_AUTH)
            .to_uppercase();

        Some(WifiCredentials {
            ssid: ssid.to_string(),
            password: self.password.trim().to_string(),
            auth: AuthType::from(auth.as_str()),
            hidden: checkbox_checked(self.hidden.as_deref()),
        })
    }
}

/// Body of `POST /download`.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub payload: String,
}

pub fn checkbox_checked(value: Option<&str>) -> bool {
    value.is_some()
}

/// Suggested filename for a freshly generated code,
/// e.g. `wifi_qr_Home_20240131235959.png`.
pub fn download_filename(ssid: &str, now: DateTime<Utc>) -> String {
    format!("wifi_qr_{}_{}.png", ssid, now.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form(ssid: &str, password: &str, auth: Option<&str>, hidden: Option<&str>) -> GenerateForm {
        GenerateForm {
            ssid: ssid.to_string(),
            password: password.to_string(),
            auth: auth.map(String::from),
            hidden: hidden.map(String::from),
        }
    }

    #[test]
    fn blank_ssid_is_rejected() {
        assert!(form("", "pw", None, None).into_credentials().is_none());
        assert!(form("   \t", "pw", None, None).into_credentials().is_none());
    }

    #[test]
    fn fields_are_trimmed_and_auth_defaults_to_wpa() {
        let creds = form("  Home ", " secret ", None, None).into_credentials().unwrap();
        assert_eq!(creds.ssid, "Home");
        assert_eq!(creds.password, "secret");
        assert_eq!(creds.auth, AuthType::Wpa);
        assert!(!creds.hidden);
    }

    #[test]
    fn auth_is_uppercased() {
        let creds = form("Lab", "pw", Some("wep"), None).into_credentials().unwrap();
        assert_eq!(creds.auth, AuthType::Wep);

        let creds = form("Lab", "pw", Some("sae"), None).into_credentials().unwrap();
        assert_eq!(creds.auth, AuthType::Other("SAE".to_string()));
        assert_eq!(creds.payload(), "WIFI:T:SAE;S:Lab;P:pw;H:false;;");

        let creds = form("Lab", "", Some("nopass"), None).into_credentials().unwrap();
        assert_eq!(creds.payload(), "WIFI:T:nopass;S:Lab;;");
    }

    #[test]
    fn hidden_checkbox_presence_means_true() {
        assert!(checkbox_checked(Some("on")));
        assert!(checkbox_checked(Some("")));
        assert!(!checkbox_checked(None));

        let creds = form("Lab", "pw", None, Some("on")).into_credentials().unwrap();
        assert!(creds.hidden);
    }

    #[test]
    fn filename_uses_utc_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 5).unwrap();
        assert_eq!(download_filename("Home", now), "wifi_qr_Home_20240131235905.png");
    }
}
