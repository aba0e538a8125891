//! Proxy profile models
//!
//! One struct per client flavour found in the decrypted bundle. Every field
//! is optional because producers omit what a given transport does not use;
//! fields this crate does not know about are kept in `extra` so a
//! decrypt/merge/export cycle never drops data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Replace `dst` when `src` carries a value
fn overwrite<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() {
        *dst = src;
    }
}

/// VMess-style profile as consumed by V2Ray clients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V2RayProfile {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<String>,
    /// Server address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// User UUID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Alter ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aid: Option<u32>,
    /// Security / cipher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scy: Option<String>,
    /// Transport network (tcp, ws, grpc, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
    /// Header type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub header_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpn: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl V2RayProfile {
    /// Overwrite fields that are set in `patch`
    pub fn merge(&mut self, patch: V2RayProfile) {
        overwrite(&mut self.ps, patch.ps);
        overwrite(&mut self.add, patch.add);
        overwrite(&mut self.port, patch.port);
        overwrite(&mut self.id, patch.id);
        overwrite(&mut self.aid, patch.aid);
        overwrite(&mut self.scy, patch.scy);
        overwrite(&mut self.net, patch.net);
        overwrite(&mut self.header_type, patch.header_type);
        overwrite(&mut self.host, patch.host);
        overwrite(&mut self.path, patch.path);
        overwrite(&mut self.tls, patch.tls);
        overwrite(&mut self.sni, patch.sni);
        overwrite(&mut self.alpn, patch.alpn);
        self.extra.extend(patch.extra);
    }
}

/// Proxy entry as written in a Clash configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClashProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Protocol (vmess, vless, trojan, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_cert_verify: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_path: Option<String>,
    #[serde(rename = "ws_headers_Host", skip_serializing_if = "Option::is_none")]
    pub ws_headers_host: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClashProfile {
    /// Overwrite fields that are set in `patch`
    pub fn merge(&mut self, patch: ClashProfile) {
        overwrite(&mut self.name, patch.name);
        overwrite(&mut self.protocol, patch.protocol);
        overwrite(&mut self.server, patch.server);
        overwrite(&mut self.port, patch.port);
        overwrite(&mut self.uuid, patch.uuid);
        overwrite(&mut self.cipher, patch.cipher);
        overwrite(&mut self.udp, patch.udp);
        overwrite(&mut self.tls, patch.tls);
        overwrite(&mut self.skip_cert_verify, patch.skip_cert_verify);
        overwrite(&mut self.network, patch.network);
        overwrite(&mut self.ws_path, patch.ws_path);
        overwrite(&mut self.ws_headers_host, patch.ws_headers_host);
        self.extra.extend(patch.extra);
    }
}

/// Outbound entry as written in a sing-box configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingboxProfile {
    /// Outbound type (vmess, vless, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub outbound_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(rename = "alterId", skip_serializing_if = "Option::is_none")]
    pub alter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_over_tcp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_path: Option<String>,
    #[serde(rename = "ws_headers_Host", skip_serializing_if = "Option::is_none")]
    pub ws_headers_host: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SingboxProfile {
    /// Overwrite fields that are set in `patch`
    pub fn merge(&mut self, patch: SingboxProfile) {
        overwrite(&mut self.outbound_type, patch.outbound_type);
        overwrite(&mut self.tag, patch.tag);
        overwrite(&mut self.server, patch.server);
        overwrite(&mut self.server_port, patch.server_port);
        overwrite(&mut self.uuid, patch.uuid);
        overwrite(&mut self.security, patch.security);
        overwrite(&mut self.alter_id, patch.alter_id);
        overwrite(&mut self.network, patch.network);
        overwrite(&mut self.tls, patch.tls);
        overwrite(&mut self.udp_over_tcp, patch.udp_over_tcp);
        overwrite(&mut self.ws_path, patch.ws_path);
        overwrite(&mut self.ws_headers_host, patch.ws_headers_host);
        self.extra.extend(patch.extra);
    }
}
