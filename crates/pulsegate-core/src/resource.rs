//! Process-wide resource descriptor attached to every exported snapshot.

use serde::Serialize;
use uuid::Uuid;

/// Identity of the reporting process.
///
/// Built once at startup; the instance id is a fresh UUIDv4 per process so
/// restarts are distinguishable downstream even when name and version match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    #[serde(rename = "service.name")]
    service_name: String,
    #[serde(rename = "service.version")]
    service_version: String,
    #[serde(rename = "service.instance.id")]
    instance_id: String,
}

impl Resource {
    /// Build the descriptor, generating the per-process instance id.
    pub fn new(service_name: &str, service_version: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            service_version: service_version.to_string(),
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Logical service name.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Service version string.
    pub fn service_version(&self) -> &str {
        &self.service_version
    }

    /// Unique id of this process instance.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}
