use std::fmt;

/// Build metadata baked in by `build.rs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub package_version: &'static str,
    pub version: &'static str,
    pub build_profile: &'static str,
    pub build_timestamp: &'static str,
    pub target: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            package_version: env!("CARGO_PKG_VERSION"),
            version: env!("REPO_VERSION"),
            build_profile: env!("BUILD_PROFILE"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
            target: env!("BUILD_TARGET"),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "provision {} ({}, {} build for {}, built {})",
            self.package_version, self.version, self.build_profile, self.target, self.build_timestamp
        )
    }
}
