//! Document module - identity and typing of a unit of work

use std::fmt;

/// Content type of a source document, derived from its filename suffix
///
/// The pipeline never opens documents itself; the extraction service
/// fetches them by reference. The only thing the pipeline needs to know
/// about the content is which MIME tag to hand the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// HTML document (`.html`, `.htm`)
    Html,
    /// PDF document (`.pdf`)
    Pdf,
    /// Plain text document (`.txt`)
    PlainText,
    /// Unrecognized suffix; never emitted by the enumerator
    Unknown,
}

impl ContentKind {
    /// Derive the content kind from an object name or location
    ///
    /// Matching is case-insensitive on the filename suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use covenant_domain::ContentKind;
    ///
    /// assert_eq!(ContentKind::from_location("gs://b/2020/a.PDF"), ContentKind::Pdf);
    /// assert_eq!(ContentKind::from_location("report.htm"), ContentKind::Html);
    /// assert_eq!(ContentKind::from_location("archive.zip"), ContentKind::Unknown);
    /// ```
    pub fn from_location(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.ends_with(".html") || lower.ends_with(".htm") {
            ContentKind::Html
        } else if lower.ends_with(".pdf") {
            ContentKind::Pdf
        } else if lower.ends_with(".txt") {
            ContentKind::PlainText
        } else {
            ContentKind::Unknown
        }
    }

    /// Whether the enumerator should submit documents of this kind
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ContentKind::Unknown)
    }

    /// The MIME tag passed to the extraction service
    ///
    /// Unknown kinds fall back to HTML, matching the service's most
    /// permissive document handler.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ContentKind::Html | ContentKind::Unknown => "text/html",
            ContentKind::Pdf => "application/pdf",
            ContentKind::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Html => "html",
            ContentKind::Pdf => "pdf",
            ContentKind::PlainText => "text",
            ContentKind::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// One unit of work: a document in the object store
///
/// Immutable; created by the source enumerator and consumed read-only by
/// the worker pool. `location` is the unique key within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    /// Opaque store path or URI, unique within a run
    pub location: String,

    /// Content kind derived from the location's suffix
    pub kind: ContentKind,
}

impl DocumentRef {
    /// Create a document reference, deriving the content kind from the
    /// location suffix
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        let kind = ContentKind::from_location(&location);
        Self { location, kind }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: suffix matching ignores case anywhere in the location
        #[test]
        fn test_kind_case_invariance(stem in "[a-z0-9/]{1,20}", ext in "(html|htm|pdf|txt)") {
            let lower = format!("{}.{}", stem, ext);
            let upper = format!("{}.{}", stem.to_ascii_uppercase(), ext.to_ascii_uppercase());
            prop_assert_eq!(
                ContentKind::from_location(&lower),
                ContentKind::from_location(&upper)
            );
            prop_assert!(ContentKind::from_location(&lower).is_recognized());
        }
    }
}
