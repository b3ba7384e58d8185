mod checksum;
mod config;
mod result;
mod spec;

pub use checksum::Checksum;
pub use config::InstallerConfig;
pub use result::{InstallError, InstallResult};
pub use spec::PackageSpec;
