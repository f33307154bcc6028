//! API allow-list evaluation.
//!
//! Same check the panel runs: plain string equality, no trimming, no
//! canonicalization, no CIDR.

use std::fmt;

/// `API_ALLOWED_IP` value that turns the check off.
pub const ALLOW_ALL: &str = "allow-all";

/// Truthiness as the panel's checks see a string: not empty and not `"0"`.
pub fn truthy(value: &[u8]) -> bool {
    !value.is_empty() && value != b"0"
}

/// Allow-list as the panel builds it before matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    /// Split on commas, drop falsy entries, then append the empty string.
    ///
    /// The trailing `""` means an empty detected IP always matches.
    pub fn parse(setting: &str) -> Self {
        let mut entries: Vec<String> = setting
            .split(',')
            .filter(|entry| truthy(entry.as_bytes()))
            .map(str::to_string)
            .collect();
        entries.push(String::new());
        Self { entries }
    }

    /// Byte-wise equality against each entry.
    pub fn contains(&self, ip: &[u8]) -> bool {
        self.entries.iter().any(|entry| entry.as_bytes() == ip)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{entry}'")?;
        }
        Ok(())
    }
}

/// Outcome of the allow-list check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Setting is the sentinel; no list was built.
    AllowAll,
    Allowed(AllowList),
    NotAllowed(AllowList),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Verdict::NotAllowed(_))
    }
}

/// Run the panel's check for `detected` against the raw setting.
pub fn evaluate(detected: &[u8], setting: &str) -> Verdict {
    if setting == ALLOW_ALL {
        return Verdict::AllowAll;
    }

    let list = AllowList::parse(setting);
    if list.contains(detected) {
        Verdict::Allowed(list)
    } else {
        Verdict::NotAllowed(list)
    }
}

/// Membership in the raw comma split, with no filtering and no implicit
/// empty entry. This is the stricter test the remediation hint uses.
pub fn listed_verbatim(setting: &str, ip: &[u8]) -> bool {
    setting.split(',').any(|entry| entry.as_bytes() == ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ip_always_allowed() {
        let verdict = evaluate(b"", "1.2.3.4,5.6.7.8");
        assert!(verdict.is_allowed());
        assert!(matches!(verdict, Verdict::Allowed(_)));
    }

    #[test]
    fn test_allow_all_skips_parsing() {
        assert_eq!(evaluate(b"203.0.113.5", ALLOW_ALL), Verdict::AllowAll);
        assert_eq!(evaluate(b"not-an-ip", ALLOW_ALL), Verdict::AllowAll);
    }

    #[test]
    fn test_sentinel_must_match_exactly() {
        let verdict = evaluate(b"203.0.113.5", "allow-all ");
        assert!(!verdict.is_allowed());
    }

    #[test]
    fn test_exact_string_membership() {
        assert!(evaluate(b"1.2.3.4", "1.2.3.4,5.6.7.8").is_allowed());
        assert!(evaluate(b"5.6.7.8", "1.2.3.4,5.6.7.8").is_allowed());
        // no trimming
        assert!(!evaluate(b"5.6.7.8", "1.2.3.4, 5.6.7.8").is_allowed());
        // no canonicalization
        assert!(!evaluate(b"2001:db8::1", "2001:DB8::1").is_allowed());
        assert!(!evaluate(b"::ffff:1.2.3.4", "1.2.3.4").is_allowed());
    }

    #[test]
    fn test_parse_drops_falsy_entries() {
        let list = AllowList::parse("1.2.3.4,,0,5.6.7.8,");
        assert_eq!(list.entries(), ["1.2.3.4", "5.6.7.8", ""]);
        assert_eq!(list.to_string(), "'1.2.3.4', '5.6.7.8', ''");
    }

    #[test]
    fn test_empty_setting_only_admits_empty_ip() {
        let list = AllowList::parse("");
        assert_eq!(list.entries(), [""]);
        assert!(!evaluate(b"1.2.3.4", "").is_allowed());
        assert!(evaluate(b"", "").is_allowed());
    }

    #[test]
    fn test_non_utf8_ip_never_matches_text_entry() {
        assert!(!evaluate(b"1.2.3.4\xa0", "1.2.3.4,1.2.3.4\u{a0}").is_allowed());
        assert!(!listed_verbatim("1.2.3.4\u{a0}", b"1.2.3.4\xa0"));
    }

    #[test]
    fn test_listed_verbatim() {
        assert!(listed_verbatim("1.2.3.4,5.6.7.8", b"5.6.7.8"));
        assert!(!listed_verbatim("1.2.3.4,5.6.7.8", b""));
        assert!(listed_verbatim("1.2.3.4,", b""));
        assert!(!listed_verbatim("1.2.3.4, 5.6.7.8", b"5.6.7.8"));
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(b"1.2.3.4"));
        assert!(truthy(b" "));
        assert!(!truthy(b""));
        assert!(!truthy(b"0"));
    }
}
