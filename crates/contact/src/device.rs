//! Device and ICE server records

use serde::{Deserialize, Serialize};

/// A device a contact is signed in from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device name (e.g. 'Chrome', 'iPhone')
    pub name: String,

    /// Platform description
    pub platform: String,

    /// Remote address, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Remote port, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Device {
    pub fn new(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            address: None,
            port: None,
        }
    }

    /// Builder: set remote endpoint
    pub fn with_endpoint(mut self, address: impl Into<String>, port: u16) -> Self {
        self.address = Some(address.into());
        self.port = Some(port);
        self
    }

    /// Two records describe the same device when name and platform match
    pub fn same_device(&self, other: &Device) -> bool {
        self.name == other.name && self.platform == other.platform
    }
}

/// STUN/TURN server handed to clients for media traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServer {
    pub url: String,
    pub username: String,
    pub credential: String,
}

impl IceServer {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            credential: credential.into(),
        }
    }

    /// Whether this is a TURN relay rather than a plain STUN server
    pub fn is_turn(&self) -> bool {
        self.url.starts_with("turn:") || self.url.starts_with("turns:")
    }
}

shared::impl_serde_jsonable!(Device, IceServer);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{FromJson, Jsonable};

    #[test]
    fn test_device_serialization() {
        let device = Device::new("Chrome", "Web/Linux");
        assert_eq!(device.to_json(), json!({"name": "Chrome", "platform": "Web/Linux"}));

        let device = device.with_endpoint("10.0.0.8", 7000);
        let json = device.to_json();
        assert_eq!(json["address"], "10.0.0.8");
        assert_eq!(json["port"], 7000);
        assert_eq!(Device::from_json(&json).unwrap(), device);
    }

    #[test]
    fn test_device_missing_platform() {
        let err = Device::from_json(&json!({"name": "iPhone"})).unwrap_err();
        assert_eq!(err.field(), Some("platform"));
    }

    #[test]
    fn test_same_device() {
        let a = Device::new("Chrome", "Web");
        let b = Device::new("Chrome", "Web").with_endpoint("1.2.3.4", 80);
        assert!(a.same_device(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_ice_server_round_trip() {
        let server = IceServer::new("turn:52.83.195.35:3478", "cube", "cube887");
        assert!(server.is_turn());

        let json = server.to_json();
        assert_eq!(
            json,
            json!({"url": "turn:52.83.195.35:3478", "username": "cube", "credential": "cube887"})
        );
        assert_eq!(server.to_compact_json(), json);
        assert_eq!(IceServer::from_json(&json).unwrap(), server);
    }

    #[test]
    fn test_stun_is_not_turn() {
        let server = IceServer::new("stun:stun.l.google.com:19302", "", "");
        assert!(!server.is_turn());
    }
}
