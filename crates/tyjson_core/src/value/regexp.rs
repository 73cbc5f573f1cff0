use core::fmt;

/// A regular expression literal, kept as its source and flags.
///
/// The converter never compiles the pattern; it only transcribes it using the
/// `"/source/flags"` literal form.
///
/// # Examples
///
/// ```
/// use tyjson_core::RegExp;
///
/// let re = RegExp::new("a+b", "gi");
/// assert_eq!(re.to_literal(), "/a+b/gi");
/// assert_eq!(RegExp::parse_literal("/a+b/gi"), Some(re));
/// assert_eq!(RegExp::parse_literal("a+b"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegExp {
    source: String,
    flags: String,
}

impl RegExp {
    /// Source used for an empty pattern.
    pub const EMPTY_SOURCE: &'static str = "(?:)";

    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            source: if source.is_empty() {
                Self::EMPTY_SOURCE.to_owned()
            } else {
                source
            },
            flags: flags.into(),
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Returns the `"/source/flags"` form.
    pub fn to_literal(&self) -> String {
        format!("/{}/{}", self.source, self.flags)
    }

    /// Parses the `"/source/flags"` form.
    ///
    /// The flags are everything after the last `/` and must be ASCII letters.
    pub fn parse_literal(literal: &str) -> Option<Self> {
        let rest = literal.strip_prefix('/')?;
        let split = rest.rfind('/')?;
        let (source, flags) = (&rest[..split], &rest[split + 1..]);
        if !flags.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self::new(source, flags))
    }
}

impl Default for RegExp {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
