/// Error types for bundle construction, loading and lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L10nError {
    /// A translation key was empty
    EmptyKey,
    /// The same key appeared twice in one bundle
    DuplicateKey(String),
    /// No translation for `key` in the (domain, locale) bundle
    MissingTranslation {
        domain: String,
        locale: String,
        key: String,
    },
    /// A plural lookup hit a key holding a single string
    NotPlural(String),
    /// A plural entry does not carry one variant per category
    PluralVariantCount {
        key: String,
        expected: usize,
        found: usize,
    },
    /// Plural-Forms header could not be parsed
    PluralParse { offset: usize, message: String },
    /// Plural expression failed at evaluation time
    PluralEval(String),
    /// Negative or otherwise unusable quantity
    InvalidArgument(String),
    /// Locale tag rejected by ICU
    InvalidLocale(String),
    /// Plural rule disagrees with the CLDR cardinal categories
    CldrMismatch(String),
    /// No bundle registered for (domain, locale)
    UnknownBundle { domain: String, locale: String },
    /// A bundle for (domain, locale) is already registered
    AlreadyRegistered { domain: String, locale: String },
    /// File system error, with the path in the message
    Io(String),
    /// JSON decoding error
    Json(String),
    /// Input did not have the expected l10n file shape
    Format(String),
}

impl std::fmt::Display for L10nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            L10nError::EmptyKey => write!(f, "Translation key must not be empty"),
            L10nError::DuplicateKey(key) => write!(f, "Duplicate translation key: '{}'", key),
            L10nError::MissingTranslation {
                domain,
                locale,
                key,
            } => write!(
                f,
                "Missing translation for '{}' in {}/{}",
                key, domain, locale
            ),
            L10nError::NotPlural(key) => {
                write!(f, "Translation '{}' has no plural variants", key)
            }
            L10nError::PluralVariantCount {
                key,
                expected,
                found,
            } => write!(
                f,
                "Translation '{}' has {} plural variants, expected {}",
                key, found, expected
            ),
            L10nError::PluralParse { offset, message } => {
                write!(f, "Plural-Forms parse error at {}: {}", offset, message)
            }
            L10nError::PluralEval(msg) => write!(f, "Plural evaluation error: {}", msg),
            L10nError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            L10nError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            L10nError::CldrMismatch(msg) => write!(f, "CLDR mismatch: {}", msg),
            L10nError::UnknownBundle { domain, locale } => {
                write!(f, "No bundle registered for {}/{}", domain, locale)
            }
            L10nError::AlreadyRegistered { domain, locale } => {
                write!(f, "Bundle {}/{} is already registered", domain, locale)
            }
            L10nError::Io(msg) => write!(f, "I/O error: {}", msg),
            L10nError::Json(msg) => write!(f, "JSON error: {}", msg),
            L10nError::Format(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for L10nError {}

impl From<serde_json::Error> for L10nError {
    fn from(err: serde_json::Error) -> Self {
        L10nError::Json(err.to_string())
    }
}

/// Result type for l10n operations
pub type L10nResult<T> = Result<T, L10nError>;
