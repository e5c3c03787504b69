use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::VANILLA_DOMAIN;

/// Namespaced block identifier, e.g. `game:soil-medium-sparse`.
///
/// The path is a `-` separated list of variant parts. The first part names the
/// block type, the remaining parts are positional variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCode {
    pub domain: String,
    pub path: String,
}

impl BlockCode {
    pub fn new(domain: &str, path: impl Into<String>) -> Self {
        Self {
            domain: domain.to_string(),
            path: path.into(),
        }
    }

    /// Parse `domain:path`. A code without a domain belongs to the vanilla domain.
    pub fn parse(code: &str) -> Self {
        match code.split_once(':') {
            Some((domain, path)) => Self::new(domain, path),
            None => Self::new(VANILLA_DOMAIN, code),
        }
    }

    /// Variant parts of the path, block type first.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.path.split('-')
    }

    pub fn part_count(&self) -> usize {
        self.parts().count()
    }

    /// Block type (first path part).
    pub fn first_part(&self) -> &str {
        self.parts().next().unwrap_or("")
    }

    pub fn second_part(&self) -> Option<&str> {
        self.parts().nth(1)
    }

    /// Last path part; for single-part paths this is the block type itself.
    pub fn end_variant(&self) -> &str {
        self.path.rsplit('-').next().unwrap_or("")
    }

    /// Same code with the last path part replaced.
    pub fn with_end_variant(&self, variant: &str) -> Self {
        let base = match self.path.rsplit_once('-') {
            Some((base, _)) => base,
            None => return Self::new(&self.domain, variant),
        };
        Self::new(&self.domain, format!("{base}-{variant}"))
    }

    /// Same code with the part at `index` replaced. Out-of-range indices leave it unchanged.
    pub fn with_part(&self, index: usize, variant: &str) -> Self {
        let parts: Vec<&str> = self
            .parts()
            .enumerate()
            .map(|(i, p)| if i == index { variant } else { p })
            .collect();
        Self::new(&self.domain, parts.join("-"))
    }

    pub fn is_domain(&self, domain: &str) -> bool {
        self.domain == domain
    }
}

impl fmt::Display for BlockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_domain() {
        let a = BlockCode::parse("wayworn:trail-high-new");
        assert_eq!(a.domain, "wayworn");
        assert_eq!(a.path, "trail-high-new");

        let b = BlockCode::parse("soil-low-none");
        assert_eq!(b.domain, "game");
        assert_eq!(b.to_string(), "game:soil-low-none");
    }

    #[test]
    fn test_part_accessors() {
        let code = BlockCode::parse("game:rawclay-blue-sparse");
        assert_eq!(code.first_part(), "rawclay");
        assert_eq!(code.second_part(), Some("blue"));
        assert_eq!(code.end_variant(), "sparse");
        assert_eq!(code.part_count(), 3);
    }

    #[test]
    fn test_with_end_variant() {
        let code = BlockCode::parse("game:snowlayer-4");
        assert_eq!(code.with_end_variant("3").path, "snowlayer-3");

        let single = BlockCode::parse("game:lakeice");
        assert_eq!(single.with_end_variant("x").path, "x");
    }

    #[test]
    fn test_with_part() {
        let code = BlockCode::parse("game:tallgrass-short-free");
        assert_eq!(code.with_part(2, "snow").path, "tallgrass-short-snow");
        assert_eq!(code.with_part(9, "snow"), code);
    }
}
