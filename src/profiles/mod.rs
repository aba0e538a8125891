//! Decrypted configuration bundle
//!
//! The decryptor hands out plain JSON text. This module is the consumer on
//! the other side: it reads the bundle into typed profiles, summarizes and
//! validates them, and merges partial updates field by field.

pub mod models;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{NetNodeError, NetNodeResult};

pub use models::{ClashProfile, SingboxProfile, V2RayProfile};

/// Client flavour of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    V2Ray,
    Clash,
    SingBox,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2Ray => write!(f, "v2ray"),
            Self::Clash => write!(f, "clash"),
            Self::SingBox => write!(f, "sing-box"),
        }
    }
}

/// The full decrypted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v2ray: Option<V2RayProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clash: Option<ClashProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singbox: Option<SingboxProfile>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One line of a profile listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub kind: ProfileKind,
    pub name: Option<String>,
    pub server: Option<String>,
    pub port: Option<u16>,
    pub transport: Option<String>,
    pub id: Option<String>,
}

/// A problem found by [`ProfileBundle::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileIssue {
    pub kind: ProfileKind,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ProfileIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.kind, self.field, self.message)
    }
}

impl ProfileBundle {
    /// Parse decrypted text
    pub fn from_json(text: &str) -> NetNodeResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| NetNodeError::Profile(format!("Decrypted text is not JSON: {}", e)))?;
        if !value.is_object() {
            return Err(NetNodeError::Profile(
                "Decrypted document must be a JSON object".into(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| NetNodeError::Profile(format!("Invalid profile bundle: {}", e)))
    }

    /// Serialize back to JSON text
    pub fn to_json(&self, pretty: bool) -> NetNodeResult<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }

    /// True when no known profile section is present
    pub fn is_empty(&self) -> bool {
        self.v2ray.is_none() && self.clash.is_none() && self.singbox.is_none()
    }

    /// One summary per present profile
    pub fn summaries(&self) -> Vec<ProfileSummary> {
        let mut out = Vec::new();
        if let Some(ref p) = self.v2ray {
            out.push(ProfileSummary {
                kind: ProfileKind::V2Ray,
                name: p.ps.clone(),
                server: p.add.clone(),
                port: p.port,
                transport: p.net.clone(),
                id: p.id.clone(),
            });
        }
        if let Some(ref p) = self.clash {
            out.push(ProfileSummary {
                kind: ProfileKind::Clash,
                name: p.name.clone(),
                server: p.server.clone(),
                port: p.port,
                transport: p.network.clone(),
                id: p.uuid.clone(),
            });
        }
        if let Some(ref p) = self.singbox {
            out.push(ProfileSummary {
                kind: ProfileKind::SingBox,
                name: p.tag.clone(),
                server: p.server.clone(),
                port: p.server_port,
                transport: p.network.clone(),
                id: p.uuid.clone(),
            });
        }
        out
    }

    /// Check each profile for an address, a usable port and a well-formed UUID
    pub fn validate(&self) -> Vec<ProfileIssue> {
        let mut issues = Vec::new();
        if self.is_empty() {
            return issues;
        }

        for summary in self.summaries() {
            let (server_field, port_field, id_field) = match summary.kind {
                ProfileKind::V2Ray => ("add", "port", "id"),
                ProfileKind::Clash => ("server", "port", "uuid"),
                ProfileKind::SingBox => ("server", "server_port", "uuid"),
            };
            let issue = |field: &'static str, message: &str| ProfileIssue {
                kind: summary.kind,
                field,
                message: message.to_string(),
            };

            match summary.server.as_deref().map(str::trim) {
                None | Some("") => issues.push(issue(server_field, "server address is missing")),
                Some(_) => {}
            }
            match summary.port {
                None => issues.push(issue(port_field, "port is missing")),
                Some(0) => issues.push(issue(port_field, "port must not be 0")),
                Some(_) => {}
            }
            if let Some(ref id) = summary.id {
                if Uuid::parse_str(id).is_err() {
                    issues.push(issue(id_field, "not a valid UUID"));
                }
            }
        }
        issues
    }

    /// Apply a partial update
    ///
    /// Sections present in `patch` are merged field by field into the
    /// existing ones; absent sections are left alone.
    pub fn merge(&mut self, patch: ProfileBundle) {
        if let Some(update) = patch.v2ray {
            match self.v2ray {
                Some(ref mut existing) => existing.merge(update),
                None => self.v2ray = Some(update),
            }
        }
        if let Some(update) = patch.clash {
            match self.clash {
                Some(ref mut existing) => existing.merge(update),
                None => self.clash = Some(update),
            }
        }
        if let Some(update) = patch.singbox {
            match self.singbox {
                Some(ref mut existing) => existing.merge(update),
                None => self.singbox = Some(update),
            }
        }
        self.extra.extend(patch.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "v2ray": {"ps": "hk-01", "add": "example.com", "port": 443,
                  "id": "b831381d-6324-4d53-ad4f-8cda48b30811", "net": "ws"},
        "clash": {"name": "hk-01", "type": "vmess", "server": "example.com", "port": 443,
                  "uuid": "b831381d-6324-4d53-ad4f-8cda48b30811", "network": "ws", "udp": true},
        "singbox": {"type": "vmess", "tag": "proxy", "server": "example.com", "server_port": 443,
                    "uuid": "b831381d-6324-4d53-ad4f-8cda48b30811", "network": "ws"},
        "updated": "2024-01-01"
    }"#;

    #[test]
    fn test_from_json() {
        let bundle = ProfileBundle::from_json(BUNDLE).unwrap();
        assert!(!bundle.is_empty());
        assert_eq!(bundle.clash.as_ref().and_then(|c| c.udp), Some(true));
        assert_eq!(bundle.extra.get("updated"), Some(&Value::from("2024-01-01")));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(ProfileBundle::from_json("[1,2]").is_err());
        assert!(ProfileBundle::from_json("not json").is_err());
    }

    #[test]
    fn test_minimal_bundle() {
        let bundle =
            ProfileBundle::from_json(r#"{"v2ray":{"add":"example.com","port":443}}"#).unwrap();
        let summaries = bundle.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].kind, ProfileKind::V2Ray);
        assert_eq!(summaries[0].server.as_deref(), Some("example.com"));
        assert_eq!(summaries[0].port, Some(443));
        assert!(bundle.validate().is_empty());
    }

    #[test]
    fn test_summaries_order() {
        let bundle = ProfileBundle::from_json(BUNDLE).unwrap();
        let kinds: Vec<ProfileKind> = bundle.summaries().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ProfileKind::V2Ray, ProfileKind::Clash, ProfileKind::SingBox]);
    }

    #[test]
    fn test_validate_reports_issues() {
        let bundle = ProfileBundle::from_json(
            r#"{"clash":{"server":"","port":0,"uuid":"nope"},"singbox":{"server":"a.example"}}"#,
        )
        .unwrap();
        let issues: Vec<String> = bundle.validate().iter().map(ToString::to_string).collect();
        assert_eq!(
            issues,
            vec![
                "clash.server: server address is missing",
                "clash.port: port must not be 0",
                "clash.uuid: not a valid UUID",
                "sing-box.server_port: port is missing",
            ]
        );
    }

    #[test]
    fn test_merge_sections() {
        let mut bundle = ProfileBundle::from_json(BUNDLE).unwrap();
        let patch = ProfileBundle::from_json(
            r#"{"v2ray":{"add":"backup.example.com"},"clash":{"port":8443}}"#,
        )
        .unwrap();
        bundle.merge(patch);

        let v2ray = bundle.v2ray.as_ref().unwrap();
        assert_eq!(v2ray.add.as_deref(), Some("backup.example.com"));
        assert_eq!(v2ray.port, Some(443));
        assert_eq!(bundle.clash.as_ref().unwrap().port, Some(8443));
        assert!(bundle.singbox.is_some());
    }

    #[test]
    fn test_merge_fills_missing_section() {
        let mut bundle = ProfileBundle::default();
        bundle.merge(ProfileBundle::from_json(r#"{"singbox":{"server":"x.example"}}"#).unwrap());
        assert_eq!(
            bundle.singbox.and_then(|s| s.server).as_deref(),
            Some("x.example")
        );
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields() {
        let bundle = ProfileBundle::from_json(BUNDLE).unwrap();
        let text = bundle.to_json(false).unwrap();
        let again = ProfileBundle::from_json(&text).unwrap();
        assert_eq!(bundle, again);
    }
}
