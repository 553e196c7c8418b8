use std::path::Path;

use serde::Deserialize;

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Built-in defaults
// ---------------------------------------------------------------------------

/// Badge slug fragment → exam code. Order matters: the first fragment found
/// in a slug wins.
const BUILTIN_BADGES: &[(&str, &str)] = &[
    ("microsoft-certified-azure-fundamentals", "AZ-900"),
    ("microsoft-certified-azure-administrator-associate", "AZ-104"),
    ("microsoft-certified-azure-solutions-architect-expert", "AZ-305"),
    ("microsoft-certified-azure-developer-associate", "AZ-204"),
    ("microsoft-certified-azure-security-engineer-associate", "AZ-500"),
    ("microsoft-certified-azure-ai-fundamentals", "AI-900"),
    ("microsoft-certified-azure-data-fundamentals", "DP-900"),
    ("microsoft-certified-power-platform-fundamentals", "PL-900"),
    ("microsoft-365-certified-fundamentals", "MS-900"),
    ("microsoft-certified-security-compliance-and-identity-fundamentals", "SC-900"),
    ("microsoft-certified-devops-engineer-expert", "AZ-400"),
    ("microsoft-certified-identity-and-access-administrator-associate", "SC-300"),
    ("github-copilot", "GH-300"),
];

pub const DEFAULT_FALLBACK_PREFIX: &str = "Badge: ";
pub const DEFAULT_VENDOR_KEYWORDS: &[&str] = &["microsoft", "github"];

// ---------------------------------------------------------------------------
// Badge map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BadgeMapping {
    pub fragment: String,
    pub code: String,
}

/// Read-only lookup table used by [`crate::matcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeMap {
    pub entries: Vec<BadgeMapping>,
    pub fallback_prefix: String,
    /// Lowercased title substrings that qualify an unmapped badge for a
    /// fallback tag.
    pub vendor_keywords: Vec<String>,
}

/// On-disk form. Every field is optional; omitted fields keep the built-in
/// values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BadgeMapFile {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    fallback_prefix: Option<String>,
    #[serde(default)]
    vendor_keywords: Option<Vec<String>>,
    #[serde(default, rename = "badge")]
    badges: Vec<BadgeMapping>,
}

impl Default for BadgeMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BadgeMap {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_BADGES
                .iter()
                .map(|(fragment, code)| BadgeMapping {
                    fragment: fragment.to_string(),
                    code: code.to_string(),
                })
                .collect(),
            fallback_prefix: DEFAULT_FALLBACK_PREFIX.to_string(),
            vendor_keywords: DEFAULT_VENDOR_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Parse an override table and layer it over the built-in one.
    ///
    /// Override entries are consulted before built-in entries. With
    /// `replace = true` the built-in entries are dropped.
    pub fn from_toml(input: &str) -> Result<Self, SyncError> {
        let file: BadgeMapFile =
            toml::from_str(input).map_err(|e| SyncError::Config(e.to_string()))?;

        let mut map = Self::builtin();
        if file.replace {
            map.entries.clear();
        }
        let mut entries = file.badges;
        entries.extend(map.entries);
        map.entries = entries;

        if let Some(prefix) = file.fallback_prefix {
            map.fallback_prefix = prefix;
        }
        if let Some(keywords) = file.vendor_keywords {
            map.vendor_keywords = keywords;
        }
        map.normalize();
        map.validate()?;
        Ok(map)
    }

    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&content).map_err(|e| match e {
            SyncError::Config(msg) => SyncError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.fragment.trim().is_empty() {
                return Err(SyncError::Config(format!("badge #{}: empty fragment", idx + 1)));
            }
            if entry.code.trim().is_empty() {
                return Err(SyncError::Config(format!(
                    "badge '{}': empty code",
                    entry.fragment
                )));
            }
        }
        if self.vendor_keywords.iter().any(|k| k.is_empty()) {
            return Err(SyncError::Config("vendor_keywords contains an empty string".into()));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.fragment = entry.fragment.trim().to_lowercase();
            entry.code = entry.code.trim().to_string();
        }
        for keyword in &mut self.vendor_keywords {
            *keyword = keyword.trim().to_lowercase();
        }
    }
}
