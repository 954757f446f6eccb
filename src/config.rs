use std::path::PathBuf;

/// File locations for the persisted database mirror and the audit log.
///
/// Hosts embedding the engine pass their own paths; the defaults are
/// relative to the process working directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// JSON file mirroring the full in-memory state after every mutation.
    pub data_file: PathBuf,
    /// Append-only plain-text log of `[timestamp] MESSAGE` lines.
    pub audit_file: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("relite.json"),
            audit_file: PathBuf::from("relite-audit.log"),
        }
    }
}

impl EngineConfig {
    /// Places both files under the given directory, keeping the default
    /// file names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            data_file: dir.join("relite.json"),
            audit_file: dir.join("relite-audit.log"),
        }
    }
}
