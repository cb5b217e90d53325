//! Lenient parsing of OpenCL version strings.
//!
//! Platform and device version strings have the shape
//! `"<prefix> <major>.<minor><anything>"` (e.g. `"OpenCL 1.2 CUDA 11.4"`).
//! Parsing is deliberately lenient: a string that does not fit the shape
//! degrades to version `(0, 0)` instead of raising an error, which compares
//! as unsupported against any positive requested version.

/// A parsed `major.minor` API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a version string, degrading to `(0, 0)` on any mismatch.
    ///
    /// The prefix word is skipped without being inspected. A version token
    /// with a parsable major but missing or unparsable minor yields
    /// `(major, 0)`, matching the original toolkit's `sscanf` behavior.
    ///
    /// # Examples
    ///
    /// ```
    /// use oclkit_device::version::ApiVersion;
    ///
    /// assert_eq!(ApiVersion::parse("OpenCL 1.2 CUDA"), ApiVersion::new(1, 2));
    /// assert_eq!(ApiVersion::parse("X 2.1 extra"), ApiVersion::new(2, 1));
    /// assert_eq!(ApiVersion::parse("OpenCL 2"), ApiVersion::new(2, 0));
    /// assert_eq!(ApiVersion::parse(""), ApiVersion::new(0, 0));
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut words = text.split_whitespace();
        let _prefix = words.next();
        let token = match words.next() {
            Some(token) => token,
            None => return Self::default(),
        };

        let mut parts = token.splitn(2, '.');
        let major = match parts.next().and_then(leading_number) {
            Some(major) => major,
            None => return Self::default(),
        };
        let minor = parts.next().and_then(leading_number).unwrap_or(0);

        Self { major, minor }
    }

    /// Inclusive comparison: `true` iff this version is `major.minor` or
    /// newer.
    pub const fn at_least(self, major: u32, minor: u32) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parse the leading decimal digits of `text`, if any.
fn leading_number(text: &str) -> Option<u32> {
    let digits: &str = {
        let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
        &text[..end]
    };
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_string() {
        assert_eq!(ApiVersion::parse("OpenCL 1.2 FULL_PROFILE"), ApiVersion::new(1, 2));
    }

    #[test]
    fn arbitrary_prefix_word() {
        assert_eq!(ApiVersion::parse("X 2.1 extra"), ApiVersion::new(2, 1));
    }

    #[test]
    fn missing_minor_defaults_to_zero() {
        assert_eq!(ApiVersion::parse("OpenCL 2"), ApiVersion::new(2, 0));
    }

    #[test]
    fn trailing_junk_on_minor_is_ignored() {
        assert_eq!(ApiVersion::parse("OpenCL 1.2.1"), ApiVersion::new(1, 2));
        assert_eq!(ApiVersion::parse("OpenCL 3.0beta"), ApiVersion::new(3, 0));
    }

    #[test]
    fn unparsable_degrades_to_zero_zero() {
        assert_eq!(ApiVersion::parse(""), ApiVersion::new(0, 0));
        assert_eq!(ApiVersion::parse("OpenCL"), ApiVersion::new(0, 0));
        assert_eq!(ApiVersion::parse("OpenCL x.y"), ApiVersion::new(0, 0));
    }

    #[test]
    fn at_least_boundaries() {
        let v = ApiVersion::parse("X 2.1 extra");
        assert!(v.at_least(2, 0));
        assert!(v.at_least(2, 1));
        assert!(!v.at_least(2, 2));
        assert!(v.at_least(1, 9));
        assert!(!v.at_least(3, 0));
    }

    #[test]
    fn zero_zero_supports_nothing_positive() {
        let v = ApiVersion::parse("garbage");
        assert!(v.at_least(0, 0));
        assert!(!v.at_least(1, 0));
        assert!(!v.at_least(0, 1));
    }

    #[test]
    fn refcount_gate_threshold() {
        assert!(ApiVersion::parse("OpenCL 1.2").at_least(1, 2));
        assert!(ApiVersion::parse("OpenCL 2.0").at_least(1, 2));
        assert!(!ApiVersion::parse("OpenCL 1.1").at_least(1, 2));
    }
}
