use std::collections::HashMap;

use crate::bundle::LocalizationBundle;
use crate::error::{L10nError, L10nResult};

/// Registered bundles, keyed by domain and then by locale.
///
/// e.g. bundles["richdocuments"]["es_PR"]
///      bundles["richdocuments"]["de"]
///      bundles["files"]["es_PR"]
///
/// Lookups never fall back to another locale or domain.
#[derive(Debug, Default)]
pub struct Registry {
    bundles: HashMap<String, HashMap<String, LocalizationBundle>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            bundles: HashMap::new(),
        }
    }

    /// Registers `bundle` under its own domain and locale.
    ///
    /// A second bundle for the same pair is rejected; the first one stays.
    pub fn register(&mut self, bundle: LocalizationBundle) -> L10nResult<&mut Self> {
        let locales = self.bundles.entry(bundle.domain().to_string()).or_default();
        if locales.contains_key(bundle.locale()) {
            return Err(L10nError::AlreadyRegistered {
                domain: bundle.domain().to_string(),
                locale: bundle.locale().to_string(),
            });
        }
        tracing::debug!(
            domain = bundle.domain(),
            locale = bundle.locale(),
            entries = bundle.len(),
            "registered bundle"
        );
        locales.insert(bundle.locale().to_string(), bundle);
        Ok(self)
    }

    pub fn bundle(&self, domain: &str, locale: &str) -> L10nResult<&LocalizationBundle> {
        self.bundles
            .get(domain)
            .and_then(|locales| locales.get(locale))
            .ok_or_else(|| L10nError::UnknownBundle {
                domain: domain.to_string(),
                locale: locale.to_string(),
            })
    }

    pub fn translate(&self, domain: &str, locale: &str, key: &str) -> L10nResult<&str> {
        self.bundle(domain, locale)?.translate(key)
    }

    pub fn translate_plural(
        &self,
        domain: &str,
        locale: &str,
        singular: &str,
        plural: &str,
        n: i64,
    ) -> L10nResult<&str> {
        self.bundle(domain, locale)?
            .translate_plural(singular, plural, n)
    }

    /// Registered domains, sorted.
    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        domains.sort_unstable();
        domains
    }

    /// Locales registered for `domain`, sorted; empty for an unknown domain.
    pub fn locales(&self, domain: &str) -> Vec<&str> {
        let mut locales: Vec<&str> = self
            .bundles
            .get(domain)
            .map(|locales| locales.keys().map(String::as_str).collect())
            .unwrap_or_default();
        locales.sort_unstable();
        locales
    }

    pub fn len(&self) -> usize {
        self.bundles.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
