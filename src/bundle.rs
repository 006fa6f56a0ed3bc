use std::collections::HashMap;

use icu_locale::Locale;
use serde::{Deserialize, Serialize};

use crate::error::{L10nError, L10nResult};
use crate::plural::PluralRule;

/// A translated message: a single string, or one variant per plural category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Translation {
    Singular(String),
    Plural(Vec<String>),
}

impl Translation {
    /// The singular text, or the first plural variant.
    pub fn as_str(&self) -> &str {
        match self {
            Translation::Singular(text) => text,
            Translation::Plural(variants) => variants.first().map(String::as_str).unwrap_or(""),
        }
    }
}

impl From<&str> for Translation {
    fn from(text: &str) -> Self {
        Translation::Singular(text.to_string())
    }
}

/// Key under which the host stores plural messages: `_<singular>_::_<plural>_`.
pub fn plural_key(singular: &str, plural: &str) -> String {
    format!("_{}_::_{}_", singular, plural)
}

/// Checks a locale tag with ICU. POSIX-style underscores (`es_PR`) are accepted.
pub fn validate_locale(tag: &str) -> L10nResult<Locale> {
    tag.replace('_', "-")
        .parse::<Locale>()
        .map_err(|e| L10nError::InvalidLocale(format!("Failed to parse locale '{}': {}", tag, e)))
}

/// Translations and the plural rule for one (domain, locale) pair.
///
/// Built once through [`BundleBuilder`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationBundle {
    domain: String,
    locale: String,
    entries: HashMap<String, Translation>,
    plural_rule: PluralRule,
}

impl LocalizationBundle {
    pub fn builder(domain: &str, locale: &str) -> BundleBuilder {
        BundleBuilder::new(domain, locale)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn plural_rule(&self) -> &PluralRule {
        &self.plural_rule
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Translation> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &HashMap<String, Translation> {
        &self.entries
    }

    /// Entries ordered by key, for stable listings.
    pub fn sorted_entries(&self) -> Vec<(&str, &Translation)> {
        let mut entries: Vec<(&str, &Translation)> = self
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    fn missing(&self, key: &str) -> L10nError {
        L10nError::MissingTranslation {
            domain: self.domain.clone(),
            locale: self.locale.clone(),
            key: key.to_string(),
        }
    }

    /// Returns the stored translation for `key`, exactly as loaded.
    ///
    /// A missing key is an error; what to show instead is the caller's decision.
    pub fn translate(&self, key: &str) -> L10nResult<&str> {
        self.entries
            .get(key)
            .map(Translation::as_str)
            .ok_or_else(|| self.missing(key))
    }

    /// Like [`LocalizationBundle::translate`], but returns `key` when it is missing.
    pub fn translate_or_key<'a>(&'a self, key: &'a str) -> &'a str {
        match self.translate(key) {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!(
                    domain = %self.domain,
                    locale = %self.locale,
                    key,
                    "missing translation, using key"
                );
                key
            }
        }
    }

    /// Picks the plural variant of `_<singular>_::_<plural>_` for quantity `n`.
    ///
    /// The variant text is returned verbatim; `%n` is not substituted.
    pub fn translate_plural(&self, singular: &str, plural: &str, n: i64) -> L10nResult<&str> {
        let key = plural_key(singular, plural);
        let variants = match self.entries.get(&key) {
            Some(Translation::Plural(variants)) => variants,
            Some(Translation::Singular(_)) => return Err(L10nError::NotPlural(key)),
            None => return Err(self.missing(&key)),
        };
        let index = self.plural_rule.category(n)?;
        variants
            .get(index)
            .map(String::as_str)
            .ok_or(L10nError::PluralVariantCount {
                key,
                expected: self.plural_rule.nplurals(),
                found: variants.len(),
            })
    }
}

/// Collects entries for a [`LocalizationBundle`], rejecting bad keys as they arrive.
#[derive(Debug)]
pub struct BundleBuilder {
    domain: String,
    locale: String,
    entries: HashMap<String, Translation>,
}

impl BundleBuilder {
    pub fn new(domain: &str, locale: &str) -> Self {
        BundleBuilder {
            domain: domain.to_string(),
            locale: locale.to_string(),
            entries: HashMap::new(),
        }
    }

    /// Adds an entry. Empty and duplicate keys are rejected; nothing is overwritten.
    pub fn with_translation(&mut self, key: &str, translation: Translation) -> L10nResult<&mut Self> {
        if key.is_empty() {
            return Err(L10nError::EmptyKey);
        }
        if self.entries.contains_key(key) {
            return Err(L10nError::DuplicateKey(key.to_string()));
        }
        self.entries.insert(key.to_owned(), translation);
        Ok(self)
    }

    pub fn with_message(&mut self, key: &str, message: &str) -> L10nResult<&mut Self> {
        self.with_translation(key, Translation::Singular(message.to_owned()))
    }

    pub fn with_plural_message(
        &mut self,
        singular: &str,
        plural: &str,
        variants: &[&str],
    ) -> L10nResult<&mut Self> {
        let variants = variants.iter().map(|v| v.to_string()).collect();
        self.with_translation(&plural_key(singular, plural), Translation::Plural(variants))
    }

    /// Adds every pair, stopping at the first bad key.
    pub fn with_messages<'a>(
        &mut self,
        messages: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> L10nResult<&mut Self> {
        for (key, message) in messages {
            self.with_message(key, message)?;
        }
        Ok(self)
    }

    /// Compiles `plural_forms` and validates the collected entries against it.
    pub fn build(self, plural_forms: &str) -> L10nResult<LocalizationBundle> {
        let plural_rule = PluralRule::parse(plural_forms)?;
        self.build_with_rule(plural_rule)
    }

    pub fn build_with_rule(self, plural_rule: PluralRule) -> L10nResult<LocalizationBundle> {
        if self.domain.is_empty() {
            return Err(L10nError::Format("domain must not be empty".to_string()));
        }
        validate_locale(&self.locale)?;

        for (key, translation) in &self.entries {
            if let Translation::Plural(variants) = translation {
                if variants.len() != plural_rule.nplurals() {
                    return Err(L10nError::PluralVariantCount {
                        key: key.clone(),
                        expected: plural_rule.nplurals(),
                        found: variants.len(),
                    });
                }
            }
        }

        tracing::debug!(
            domain = %self.domain,
            locale = %self.locale,
            entries = self.entries.len(),
            nplurals = plural_rule.nplurals(),
            "built localization bundle"
        );

        Ok(LocalizationBundle {
            domain: self.domain,
            locale: self.locale,
            entries: self.entries,
            plural_rule,
        })
    }
}
