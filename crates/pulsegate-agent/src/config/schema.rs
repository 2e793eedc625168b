use std::time::Duration;

use serde::Deserialize;

use pulsegate_core::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub http: HttpSection,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.service.validate()?;
        self.exporter.validate()?; // Verify the scope of value

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: 1,
            service: ServiceSection::default(),
            exporter: ExporterSection::default(),
            http: HttpSection::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    #[serde(default = "default_service_name")]
    pub name: String,

    #[serde(default = "default_service_version")]
    pub version: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            version: default_service_version(),
        }
    }
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("service.name must not be empty".into()));
        }
        Ok(())
    }
}

fn default_service_name() -> String {
    "pulsegate-demo".into()
}
fn default_service_version() -> String {
    "1.0.0".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,

    #[serde(default = "default_forced_drain_timeout_ms")]
    pub forced_drain_timeout_ms: u64,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            interval_ms: default_interval_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            drain_timeout_ms: default_drain_timeout_ms(),
            forced_drain_timeout_ms: default_forced_drain_timeout_ms(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("exporter.endpoint must not be empty".into()));
        }
        if !(100..=60000).contains(&self.interval_ms) {
            return Err(Error::Config(
                "exporter.interval_ms must be between 100 and 60000".into(),
            ));
        }
        if !(100..=60000).contains(&self.connect_timeout_ms) {
            return Err(Error::Config(
                "exporter.connect_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(100..=120000).contains(&self.drain_timeout_ms) {
            return Err(Error::Config(
                "exporter.drain_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        if self.forced_drain_timeout_ms < 100
            || self.forced_drain_timeout_ms > self.drain_timeout_ms
        {
            return Err(Error::Config(
                "exporter.forced_drain_timeout_ms must be between 100 and drain_timeout_ms".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    pub fn forced_drain_timeout(&self) -> Duration {
        Duration::from_millis(self.forced_drain_timeout_ms)
    }
}

fn default_endpoint() -> String {
    "collector.default.svc.cluster.local:4317".into()
}
fn default_interval_ms() -> u64 {
    2000
}
fn default_connect_timeout_ms() -> u64 {
    5000
}
fn default_drain_timeout_ms() -> u64 {
    20000
}
fn default_forced_drain_timeout_ms() -> u64 {
    1000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
