//! Badge slug → exam code resolution.

use crate::config::BadgeMap;

/// Outcome of resolving one badge against a [`BadgeMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeMatch {
    /// A table entry matched; carries the exam code.
    Exact(String),
    /// No entry matched but the title names a known vendor; carries the
    /// descriptive tag.
    Fallback(String),
    /// Not recognizably part of the certification domain.
    Unmapped,
}

impl BadgeMap {
    /// Resolve a badge slug (and its display title) to an exam code.
    ///
    /// Table entries are tried in order as case-insensitive substrings of
    /// the slug. The fallback tag keeps the slug as given.
    pub fn resolve(&self, slug: &str, title: &str) -> BadgeMatch {
        let slug_lower = slug.to_lowercase();
        if !slug_lower.is_empty() {
            if let Some(entry) = self
                .entries
                .iter()
                .find(|e| slug_lower.contains(e.fragment.as_str()))
            {
                return BadgeMatch::Exact(entry.code.clone());
            }
        }

        let title_lower = title.to_lowercase();
        if self
            .vendor_keywords
            .iter()
            .any(|k| title_lower.contains(k.as_str()))
        {
            return BadgeMatch::Fallback(format!("{}{}", self.fallback_prefix, slug));
        }

        BadgeMatch::Unmapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_case_insensitive() {
        let map = BadgeMap::builtin();
        assert_eq!(
            map.resolve("Microsoft-Certified-Azure-Fundamentals", "Azure Fundamentals"),
            BadgeMatch::Exact("AZ-900".into())
        );
    }

    #[test]
    fn substring_of_longer_slug_matches() {
        let map = BadgeMap::builtin();
        assert_eq!(
            map.resolve("badge-microsoft-certified-devops-engineer-expert-2024", ""),
            BadgeMatch::Exact("AZ-400".into())
        );
    }

    #[test]
    fn first_entry_wins() {
        let map = BadgeMap::from_toml(
            r#"
replace = true
[[badge]]
fragment = "azure"
code = "FIRST"
[[badge]]
fragment = "azure-fundamentals"
code = "SECOND"
"#,
        )
        .unwrap();
        assert_eq!(
            map.resolve("azure-fundamentals", ""),
            BadgeMatch::Exact("FIRST".into())
        );
    }

    #[test]
    fn vendor_title_gets_fallback_tag() {
        let map = BadgeMap::builtin();
        assert_eq!(
            map.resolve("some-other-badge", "Microsoft Certified: Fabric Analytics Engineer"),
            BadgeMatch::Fallback("Badge: some-other-badge".into())
        );
        assert_eq!(
            map.resolve("actions", "GitHub Actions"),
            BadgeMatch::Fallback("Badge: actions".into())
        );
    }

    #[test]
    fn unrelated_badge_is_unmapped() {
        let map = BadgeMap::builtin();
        assert_eq!(
            map.resolve("aws-certified-cloud-practitioner", "AWS Certified Cloud Practitioner"),
            BadgeMatch::Unmapped
        );
    }

    #[test]
    fn empty_slug_never_matches_table() {
        let map = BadgeMap::builtin();
        assert_eq!(map.resolve("", "Something"), BadgeMatch::Unmapped);
        assert_eq!(
            map.resolve("", "Microsoft Thing"),
            BadgeMatch::Fallback("Badge: ".into())
        );
    }

    #[test]
    fn resolution_is_independent_of_call_order() {
        let map = BadgeMap::builtin();
        let slugs = ["github-copilot", "nope", "microsoft-365-certified-fundamentals"];
        let forward: Vec<_> = slugs.iter().map(|s| map.resolve(s, "Microsoft")).collect();
        let backward: Vec<_> = slugs.iter().rev().map(|s| map.resolve(s, "Microsoft")).collect();
        assert_eq!(forward, backward.into_iter().rev().collect::<Vec<_>>());
    }
}
