//! Localization bundles for the richdocuments front end.
//!
//! A [`LocalizationBundle`] holds the translations of one (domain, locale)
//! pair together with its gettext plural rule. The rule is compiled once from
//! its `Plural-Forms` header into a [`PluralRule`], so selecting a plural
//! variant is a walk over a small expression tree.
//!
//! ```
//! use richdocuments_l10n::locales::es_pr;
//!
//! let bundle = es_pr::bundle().unwrap();
//! assert_eq!(bundle.translate("Save").unwrap(), "Guardar");
//! assert_eq!(bundle.plural_rule().category(1_000_000).unwrap(), 1);
//! ```

pub mod ast;
pub mod bundle;
pub mod error;
pub mod loader;
pub mod locales;
pub mod parser;
pub mod plural;
pub mod registry;


pub use ast::{BinaryOp, Expr};
pub use bundle::{BundleBuilder, LocalizationBundle, Translation, plural_key, validate_locale};
pub use error::{L10nError, L10nResult};
pub use loader::{
    load_all_bundles_from_dir, load_bundle_from_file, parse_js_registration, parse_json,
};
pub use parser::{Parser, PluralForms};
pub use plural::{PluralRule, category_name, sample_counts};
pub use registry::Registry;
