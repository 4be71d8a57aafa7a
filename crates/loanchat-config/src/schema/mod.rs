//! Configuration schema types for loanchat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod approval;
mod download;
mod server;
mod system;
mod upload;

pub use approval::*;
pub use download::*;
pub use server::*;
pub use system::*;
pub use upload::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Every option has a default; only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanchatConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub approval: ApprovalConfig,
    pub download: DownloadConfig,
    pub logging: LoggingConfig,
}
