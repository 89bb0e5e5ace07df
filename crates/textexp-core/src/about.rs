//! Build metadata (tool name, version, optional commit/branch).

use std::fmt;

/// Read-only build identity, fixed at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct About {
    pub tool: String,
    pub version: String,
    pub commit: String,
    pub branch: String,
}

impl About {
    pub fn new(tool: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            version: version.into(),
            commit: String::new(),
            branch: String::new(),
        }
    }

    pub fn with_build(mut self, commit: impl Into<String>, branch: impl Into<String>) -> Self {
        self.commit = commit.into();
        self.branch = branch.into();
        self
    }

    /// Identity as stamped by the build: commit/branch come from
    /// `TEXTEXP_COMMIT` / `TEXTEXP_BRANCH` at compile time, empty when unset.
    pub fn from_build() -> Self {
        Self::new("Text Exporter", env!("CARGO_PKG_VERSION")).with_build(
            option_env!("TEXTEXP_COMMIT").unwrap_or_default(),
            option_env!("TEXTEXP_BRANCH").unwrap_or_default(),
        )
    }

    /// `Text Exporter v0.3.0`
    pub fn banner(&self) -> String {
        format!("{} v{}", self.tool, self.version)
    }
}

/// Version line printed by `--version`.
impl fmt::Display for About {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.commit.is_empty() {
            write!(f, "{} v{}", self.tool, self.version)
        } else {
            write!(
                f,
                "{} v{} (commit:{} branch:{})",
                self.tool, self.version, self.commit, self.branch
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_without_commit() {
        let about = About::new("Text Exporter", "0.3.0");
        assert_eq!(about.to_string(), "Text Exporter v0.3.0");
        assert_eq!(about.banner(), "Text Exporter v0.3.0");
    }

    #[test]
    fn version_line_with_commit() {
        let about = About::new("Text Exporter", "0.3.0").with_build("1a2b3c4", "main");
        assert_eq!(
            about.to_string(),
            "Text Exporter v0.3.0 (commit:1a2b3c4 branch:main)"
        );
    }

    #[test]
    fn build_identity_uses_package_version() {
        let about = About::from_build();
        assert_eq!(about.tool, "Text Exporter");
        assert_eq!(about.version, env!("CARGO_PKG_VERSION"));
    }
}
