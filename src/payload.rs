//! WiFi credential payload formatting.
//!
//! Builds the `WIFI:` text that phone cameras recognise as a "join network"
//! code. The grammar is:
//!
//! ```text
//! WIFI:T:<WPA|WEP|nopass>;S:<ssid>;P:<password>;H:<true|false>;;
//! ```
//!
//! Open networks (`nopass`) carry only the type and SSID fields.
//!
//! # Escaping
//!
//! Only the double-quote character is escaped (as `\"`). Semicolons and
//! backslashes are written through unchanged, so an SSID containing `;` can
//! be misread by some scanners. Existing codes depend on this output, keep it.
//!
//! # Example
//!
//! ```
//! use wifi_qr::payload::{format_payload, AuthType};
//!
//! let payload = format_payload("Home", "secret", &AuthType::Wpa, false);
//! assert_eq!(payload, "WIFI:T:WPA;S:Home;P:secret;H:false;;");
//! ```

use std::fmt;

/// Authentication type written into the `T:` field.
///
/// Unknown values are not rejected; they are kept as [`AuthType::Other`] and
/// written to the payload verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthType {
    #[default]
    Wpa,
    Wep,
    NoPass,
    Other(String),
}

impl AuthType {
    pub fn is_open(&self) -> bool {
        matches!(self, AuthType::NoPass)
    }
}

impl From<&str> for AuthType {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("nopass") {
            AuthType::NoPass
        } else if value.eq_ignore_ascii_case("WPA") {
            AuthType::Wpa
        } else if value.eq_ignore_ascii_case("WEP") {
            AuthType::Wep
        } else {
            AuthType::Other(value.to_string())
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::Wpa => f.write_str("WPA"),
            AuthType::Wep => f.write_str("WEP"),
            AuthType::NoPass => f.write_str("nopass"),
            AuthType::Other(raw) => f.write_str(raw),
        }
    }
}

/// Credentials for a single network, as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    /// Network name. Callers reject empty SSIDs before building a payload.
    pub ssid: String,

    /// Passphrase. Empty for open networks.
    pub password: String,

    pub auth: AuthType,

    /// Whether the network does not broadcast its SSID.
    pub hidden: bool,
}

impl WifiCredentials {
    pub fn payload(&self) -> String {
        format_payload(&self.ssid, &self.password, &self.auth, self.hidden)
    }
}

/// Formats the `WIFI:` payload for the given credentials.
///
/// Pure function: the same inputs always produce the same string.
pub fn format_payload(ssid: &str, password: &str, auth: &AuthType, hidden: bool) -> String {
    let ssid = escape_field(ssid);

    if auth.is_open() {
        return format!("WIFI:T:nopass;S:{};;", ssid);
    }

    let password = escape_field(password);
    let hidden = if hidden { "true" } else { "false" };
    format!("WIFI:T:{};S:{};P:{};H:{};;", auth, ssid, password, hidden)
}

/// Prefixes every `"` with a backslash. No other character is touched.
pub fn escape_field(value: &str) -> String {
    value.replace('"', "\\\"")
}
