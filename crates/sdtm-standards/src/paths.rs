//! Standards directory path resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "CDISC_STANDARDS_DIR";

const DEFAULT_SDTMIG_VERSION: &str = "v3_4";
const DEFAULT_CT_VERSION: &str = "2024-03-29";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. the explicit override
/// 2. `CDISC_STANDARDS_DIR` environment variable
/// 3. `standards/` under the current directory
pub fn standards_root(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from("standards")
}

/// File locations inside a standards root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardsPaths {
    pub datasets: PathBuf,
    pub variables: PathBuf,
    /// A CT CSV file or a directory of them.
    pub ct: PathBuf,
}

impl StandardsPaths {
    /// Default SDTMIG v3.4 and SDTM CT 2024-03-29 layout.
    pub fn from_root(root: &Path) -> Self {
        let ig = root.join("sdtmig").join(DEFAULT_SDTMIG_VERSION);
        Self {
            datasets: ig.join("Datasets.csv"),
            variables: ig.join("Variables.csv"),
            ct: root.join("ct").join(DEFAULT_CT_VERSION),
        }
    }
}
