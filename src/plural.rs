use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

use crate::ast::Expr;
use crate::error::{L10nError, L10nResult};
use crate::parser::Parser;

/// Upper bound on `nplurals`; no language needs more than the six CLDR categories.
pub const MAX_PLURALS: usize = 6;

/// A compiled gettext plural rule.
///
/// The `Plural-Forms` header is parsed once, at construction; [`PluralRule::category`]
/// only walks the resulting expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRule {
    source: String,
    nplurals: usize,
    expr: Expr,
}

impl PluralRule {
    /// Compiles a header such as `nplurals=2; plural=n != 1;`.
    pub fn parse(header: &str) -> L10nResult<Self> {
        let forms = Parser::new(header).parse_header()?;
        if forms.nplurals == 0 || forms.nplurals > MAX_PLURALS {
            return Err(L10nError::PluralParse {
                offset: 0,
                message: format!(
                    "nplurals must be between 1 and {}, got {}",
                    MAX_PLURALS, forms.nplurals
                ),
            });
        }
        Ok(PluralRule {
            source: header.trim().to_string(),
            nplurals: forms.nplurals,
            expr: forms.plural,
        })
    }

    /// The header text this rule was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn nplurals(&self) -> usize {
        self.nplurals
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Returns the category index in `[0, nplurals)` for quantity `n`.
    ///
    /// Negative quantities are rejected rather than mapped to a guessed
    /// category. An expression that yields an index outside the declared range
    /// is reported as an evaluation error.
    pub fn category(&self, n: i64) -> L10nResult<usize> {
        let n = u64::try_from(n).map_err(|_| {
            L10nError::InvalidArgument(format!(
                "plural quantity must be non-negative, got {}",
                n
            ))
        })?;
        self.category_for_count(n)
    }

    /// Same as [`PluralRule::category`] for quantities that cannot be negative.
    pub fn category_for_count(&self, n: u64) -> L10nResult<usize> {
        let index = self.expr.evaluate(n)?;
        if index >= self.nplurals as u64 {
            return Err(L10nError::PluralEval(format!(
                "rule '{}' selected category {} for n = {}, but nplurals = {}",
                self.source, index, n, self.nplurals
            )));
        }
        Ok(index as usize)
    }

    /// Cross-checks this rule against the CLDR cardinal rules for `locale`.
    ///
    /// Every gettext category index reached by `samples` must correspond to
    /// exactly one CLDR category, and no two indices may share a CLDR category.
    /// Returns the CLDR category for each index, in index order; indices never
    /// reached by the samples are `None`.
    pub fn cldr_agreement(
        &self,
        locale_str: &str,
        samples: impl IntoIterator<Item = u64>,
    ) -> L10nResult<Vec<Option<PluralCategory>>> {
        let locale: Locale = locale_str.replace('_', "-").parse().map_err(|e| {
            L10nError::InvalidLocale(format!("Failed to parse locale '{}': {}", locale_str, e))
        })?;

        let pr = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).map_err(
            |e| {
                L10nError::InvalidLocale(format!(
                    "Failed to create PluralRules for locale '{}': {}",
                    locale_str, e
                ))
            },
        )?;

        let mut by_index: Vec<Option<PluralCategory>> = vec![None; self.nplurals];
        let mut by_category: Vec<(PluralCategory, usize)> = Vec::new();

        for n in samples {
            let index = self.category_for_count(n)?;
            let cldr = pr.category_for(n as usize);

            match by_index[index] {
                Some(seen) if seen != cldr => {
                    return Err(L10nError::CldrMismatch(format!(
                        "gettext category {} covers both CLDR '{}' and '{}' (n = {})",
                        index,
                        category_name(seen),
                        category_name(cldr),
                        n
                    )));
                }
                Some(_) => {}
                None => by_index[index] = Some(cldr),
            }

            match by_category.iter().find(|(category, _)| *category == cldr) {
                Some(&(_, other)) if other != index => {
                    return Err(L10nError::CldrMismatch(format!(
                        "CLDR '{}' is split across gettext categories {} and {} (n = {})",
                        category_name(cldr),
                        other,
                        index,
                        n
                    )));
                }
                Some(_) => {}
                None => by_category.push((cldr, index)),
            }
        }

        tracing::debug!(
            locale = locale_str,
            categories = ?by_index,
            "plural rule agrees with CLDR"
        );
        Ok(by_index)
    }
}

/// CLDR keyword for a category, as used in LDML (`one`, `many`, ...).
pub fn category_name(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Representative quantities for sweeping a rule: all of `0..=1000`, then
/// every multiple of 1000 and the values either side of it, up to `limit`.
pub fn sample_counts(limit: u64) -> impl Iterator<Item = u64> {
    let dense = 0..=limit.min(1000);
    let sparse = (2..=limit / 1000).flat_map(|k| {
        let base = k * 1000;
        [base - 1, base, base + 1]
    });
    dense.chain(sparse).filter(move |n| *n <= limit)
}
