use std::fmt;

use anyhow::{anyhow, Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Identity of one install request. The version is always an exact version;
/// ranges are rejected at parse time so repeated installs resolve identically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: Version,
}

impl PackageSpec {
    pub fn new(name: &str, version: &str) -> Result<Self> {
        validate_package_name(name)?;
        let version = Version::parse(version).with_context(|| {
            format!("'{version}' is not an exact version; ranges are not supported")
        })?;
        Ok(Self {
            name: name.to_string(),
            version,
        })
    }

    /// Parse a `name@version` spec string. Scoped names (`@scope/name@1.2.3`)
    /// are supported; the version separator is the last `@`.
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        let Some(at) = trimmed.rfind('@').filter(|&at| at > 0) else {
            return Err(anyhow!(
                "invalid package spec '{trimmed}': expected name@version"
            ));
        };
        Self::new(&trimmed[..at], &trimmed[at + 1..])
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("package name must not be empty"));
    }
    if name.len() > 214 {
        return Err(anyhow!("package name '{name}' exceeds 214 characters"));
    }

    let bare = match name.strip_prefix('@') {
        Some(scoped) => {
            let mut parts = scoped.splitn(2, '/');
            let scope = parts.next().unwrap_or_default();
            let Some(rest) = parts.next() else {
                return Err(anyhow!(
                    "scoped package name '{name}' must look like @scope/name"
                ));
            };
            validate_name_segment(name, scope)?;
            rest
        }
        None => name,
    };
    validate_name_segment(name, bare)
}

fn validate_name_segment(full: &str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(anyhow!("package name '{full}' has an empty segment"));
    }
    if segment.starts_with('.') || segment.starts_with('_') {
        return Err(anyhow!(
            "package name '{full}' must not start with '.' or '_'"
        ));
    }
    for ch in segment.chars() {
        let ok = ch.is_ascii_lowercase()
            || ch.is_ascii_digit()
            || matches!(ch, '-' | '_' | '.');
        if !ok {
            return Err(anyhow!(
                "package name '{full}' contains invalid character '{ch}'"
            ));
        }
    }
    Ok(())
}
