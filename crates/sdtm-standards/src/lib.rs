#![deny(unsafe_code)]

pub mod csv_utils;
pub mod ct_loader;
pub mod error;
pub mod loaders;
pub mod paths;
pub mod registry;

pub use crate::ct_loader::{load_ct_registry, parse_synonyms};
pub use crate::error::{Result, StandardsError};
pub use crate::loaders::{load_domain_registry, load_domains, load_standards};
pub use crate::paths::{STANDARDS_ENV_VAR, StandardsPaths, standards_root};
pub use crate::registry::{DomainRegistry, TerminologyRegistry};
