//! Warning types for non-fatal errors during archive document processing.
//!
//! When decoding an array document it is often desirable to keep the
//! readable records even when individual elements are malformed. The
//! [`Warning`] type reports those skipped elements to the caller so a
//! partial load is never silent.

/// A non-fatal warning raised while decoding an archive document.
///
/// Each variant carries the zero-based index of the array element it
/// refers to, matching the element's position in the JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An array element could not be decoded into the target record type.
    ///
    /// The element is skipped and decoding continues with the next one.
    MalformedElement {
        /// Zero-based index of the element within the document array.
        index: usize,
        /// Description of the decode error.
        error: String,
    },
}

impl Warning {
    /// Returns the element index associated with this warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiver_archive::Warning;
    ///
    /// let warning = Warning::MalformedElement {
    ///     index: 3,
    ///     error: "missing field `name`".to_string(),
    /// };
    /// assert_eq!(warning.index(), 3);
    /// ```
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::MalformedElement { index, .. } => *index,
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiver_archive::Warning;
    ///
    /// let warning = Warning::MalformedElement {
    ///     index: 0,
    ///     error: "invalid type: string".to_string(),
    /// };
    /// let desc = warning.description();
    /// assert!(desc.contains("element 0"));
    /// assert!(desc.contains("invalid type: string"));
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedElement { index, error } => {
                format!("element {index}: malformed record: {error}")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    ///
    /// Useful for filtering and grouping warnings without matching on
    /// the enum variants.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedElement { .. } => "malformed_element",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Warning {}
