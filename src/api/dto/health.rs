//! Health check payload.

use serde::Serialize;

/// Overall service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// State of one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: StorageProbe,
}

/// Result of pinging the mapping store.
#[derive(Debug, Serialize)]
pub struct StorageProbe {
    pub status: ProbeStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StorageProbe {
    pub fn ok() -> Self {
        Self {
            status: ProbeStatus::Ok,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            status: ProbeStatus::Error,
            error: Some(error.to_string()),
        }
    }
}

impl HealthResponse {
    /// Builds the response; the service is healthy iff every storage check passed.
    pub fn from_checks(checks: HealthChecks) -> Self {
        let status = match checks.database.status {
            ProbeStatus::Ok => ServiceStatus::Healthy,
            ProbeStatus::Error => ServiceStatus::Degraded,
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}
