//! ESG scoring and remediation recommendations for energy projects, plus the
//! environmental-justice context that feeds into them.

pub mod assessment;
pub mod config;
pub mod error;
pub mod spatial;
pub mod telemetry;
