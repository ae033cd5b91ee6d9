use crate::FinderError;
use lazy_regex::regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Postcode(String);

impl Postcode {
    pub fn parse(s: &str) -> Result<Self, FinderError> {
        let candidate = s.trim();
        if regex!(r"^[A-Z]{1,2}[0-9][0-9A-Z]?\s?[0-9][A-Z]{2}$").is_match(candidate) {
            Ok(normalize(candidate))
        } else {
            Err(FinderError::InvalidPostcode(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Postcode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Puts a single space before the last 3 characters, unless there is one already.
pub fn normalize(s: &str) -> Postcode {
    if s.contains(' ') {
        return Postcode(s.to_string());
    }

    // The pattern allows any single whitespace (tabs, no-break spaces) in the middle.
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.char_indices().rev().nth(2) {
        Some((i, _)) if i > 0 => Postcode(format!("{} {}", &compact[..i], &compact[i..])),
        _ => Postcode(compact),
    }
}

// Shape only: no check against real postcode areas.
pub fn extract(text: &str) -> BTreeSet<Postcode> {
    regex!(r"[A-Z]{1,2}[0-9][0-9A-Z]?\s?[0-9][A-Z]{2}")
        .find_iter(text)
        .map(|m| normalize(m.as_str()))
        .collect()
}

pub fn extract_all<I, S>(fragments: I) -> BTreeSet<Postcode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .flat_map(|fragment| extract(fragment.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(pcs: &[&str]) -> BTreeSet<Postcode> {
        pcs.iter().map(|pc| Postcode(pc.to_string())).collect()
    }

    #[test]
    fn test_normalize_inserts_space() {
        assert_eq!(normalize("CB42FY").as_str(), "CB4 2FY");
        assert_eq!(normalize("W1A0AX").as_str(), "W1A 0AX");
        assert_eq!(normalize("M11AE").as_str(), "M1 1AE");
        assert_eq!(normalize("EC1A1BB").as_str(), "EC1A 1BB");
    }

    #[test]
    fn test_normalize_keeps_spaced() {
        assert_eq!(normalize("CB4 2FY").as_str(), "CB4 2FY");
    }

    #[test]
    fn test_normalize_other_whitespace() {
        assert_eq!(normalize("CB4\t2FY").as_str(), "CB4 2FY");
        assert_eq!(normalize("CB4\u{a0}2FY").as_str(), "CB4 2FY");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["CB42FY", "CB4 2FY", "M11AE", "EC1A1BB", "SW1A\n2AA"] {
            let once = normalize(raw);
            assert_eq!(normalize(once.as_str()), once);
        }
    }

    #[test]
    fn test_extract_is_spacing_invariant() {
        assert_eq!(extract("CB4 2FY"), set(&["CB4 2FY"]));
        assert_eq!(extract("Our office: CB42FY, open daily"), set(&["CB4 2FY"]));
        assert_eq!(extract("CB4 2FY or CB42FY"), set(&["CB4 2FY"]));
    }

    #[test]
    fn test_extract_ignores_partial_shapes() {
        assert!(extract("Sector ZZ9 only").is_empty());
        assert!(extract("cb4 2fy").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_extract_multiple() {
        let text = "Visit us at CB1 1AB or our London branch, SW1A 2AA. Fax from M1 1AE.";
        assert_eq!(extract(text), set(&["CB1 1AB", "M1 1AE", "SW1A 2AA"]));
    }

    #[test]
    fn test_extract_all_merges_fragments() {
        let fragments = vec!["Pool: CB1 1AB", "Gym: CB11AB", "Shop: CB2 3QF"];
        assert_eq!(extract_all(&fragments), set(&["CB1 1AB", "CB2 3QF"]));
    }

    #[test]
    fn test_parse_home() {
        assert_eq!(Postcode::parse("CB4 2FY").unwrap().as_str(), "CB4 2FY");
        assert_eq!(Postcode::parse(" CB42FY ").unwrap().as_str(), "CB4 2FY");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in ["", "ZZ9", "CB4 2FY extra", "12345", "CB4  2FY", "cb4 2fy", "Cb42FY"] {
            assert!(matches!(
                Postcode::parse(bad),
                Err(FinderError::InvalidPostcode(s)) if s == bad
            ));
        }
    }
}
