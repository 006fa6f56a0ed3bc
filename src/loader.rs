use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

use crate::bundle::{BundleBuilder, LocalizationBundle, Translation};
use crate::error::{L10nError, L10nResult};

/// Translation entries in file order, duplicates included.
///
/// Deserializing into a map would keep only the last of two equal keys; the
/// entries are collected as pairs so the bundle builder can reject them.
#[derive(Debug, Default)]
struct RawEntries(Vec<(String, Translation)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of translations")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Translation>()? {
                    entries.push((key, value));
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// The JSON sibling of a registration script:
/// `{"translations": {...}, "pluralForm": "nplurals=...; plural=...;"}`
#[derive(Debug, Deserialize)]
struct JsonL10nFile {
    translations: RawEntries,
    #[serde(rename = "pluralForm")]
    plural_form: String,
}

fn build_bundle(
    domain: &str,
    locale: &str,
    entries: RawEntries,
    plural_form: &str,
) -> L10nResult<LocalizationBundle> {
    let mut builder = BundleBuilder::new(domain, locale);
    for (key, translation) in entries.0 {
        builder.with_translation(&key, translation)?;
    }
    builder.build(plural_form)
}

/// Editors on some platforms save l10n files with a leading UTF-8 byte order mark.
fn strip_bom(text: &str) -> &str {
    text.trim_start_matches('\u{feff}')
}

/// Parse the JSON l10n format
///
/// ```json
/// {
///     "translations": {
///         "Save": "Guardar",
///         "_%n file_::_%n files_": ["%n archivo", "%n de archivos", "%n archivos"]
///     },
///     "pluralForm": "nplurals=3; plural=n == 1 ? 0 : n != 0 && n % 1000000 == 0 ? 1 : 2;"
/// }
/// ```
///
/// The format does not name its domain, so the caller supplies it.
///
/// # Errors
/// - Invalid JSON or a missing field
/// - Empty or duplicate keys
/// - Unparsable plural form
pub fn parse_json(text: &str, domain: &str, locale: &str) -> L10nResult<LocalizationBundle> {
    let file: JsonL10nFile = serde_json::from_str(strip_bom(text))?;
    build_bundle(domain, locale, file.translations, &file.plural_form)
}

/// Parse a JavaScript registration script
///
/// The script holds a single call:
///
/// ```js
/// OC.L10N.register(
///     "richdocuments",
///     {
///     "Save" : "Guardar"
/// },
/// "nplurals=3; plural=n == 1 ? 0 : n != 0 && n % 1000000 == 0 ? 1 : 2;");
/// ```
///
/// The domain and plural form are read from the call. The object literal must
/// be valid JSON (double-quoted strings, no trailing comma), which is how the
/// translation tooling writes it.
///
/// # Errors
/// - Text is not a single `OC.L10N.register(...)` call
/// - Invalid object literal
/// - Empty or duplicate keys
/// - Unparsable plural form
pub fn parse_js_registration(text: &str, locale: &str) -> L10nResult<LocalizationBundle> {
    let re = Regex::new(
        r#"(?s)^\s*OC\.L10N\.register\(\s*("(?:[^"\\]|\\.)*")\s*,\s*(\{.*\})\s*,\s*("(?:[^"\\]|\\.)*")\s*\)\s*;?\s*$"#,
    )
    .map_err(|e| L10nError::Format(format!("Invalid registration pattern: {}", e)))?;

    let caps = re.captures(strip_bom(text)).ok_or_else(|| {
        L10nError::Format("expected a single OC.L10N.register(domain, {...}, pluralForm) call".to_string())
    })?;

    let domain: String = serde_json::from_str(&caps[1])?;
    let entries: RawEntries = serde_json::from_str(&caps[2])?;
    let plural_form: String = serde_json::from_str(&caps[3])?;

    build_bundle(&domain, locale, entries, &plural_form)
}

/// Load a bundle from a `.js` or `.json` l10n file
///
/// The locale is taken from the file name (`es_PR.js` -> `es_PR`). A script
/// registering a domain other than `domain` is rejected.
///
/// # Errors
/// - File not found or unreadable
/// - Unknown extension
/// - Any parse error of [`parse_json`] / [`parse_js_registration`]
pub fn load_bundle_from_file(path: &Path, domain: &str) -> L10nResult<LocalizationBundle> {
    let locale = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| L10nError::Format(format!("Invalid filename: {}", path.display())))?;

    let content = fs::read_to_string(path)
        .map_err(|e| L10nError::Io(format!("Failed to read file '{}': {}", path.display(), e)))?;

    let with_path = |e: L10nError| match e {
        L10nError::Json(msg) => L10nError::Json(format!("{}: {}", path.display(), msg)),
        L10nError::Format(msg) => L10nError::Format(format!("{}: {}", path.display(), msg)),
        other => other,
    };

    let bundle = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&content, domain, locale).map_err(with_path)?,
        Some("js") => {
            let bundle = parse_js_registration(&content, locale).map_err(with_path)?;
            if bundle.domain() != domain {
                return Err(L10nError::Format(format!(
                    "{}: registers domain '{}', expected '{}'",
                    path.display(),
                    bundle.domain(),
                    domain
                )));
            }
            bundle
        }
        _ => {
            return Err(L10nError::Format(format!(
                "Unsupported l10n file (expected .js or .json): {}",
                path.display()
            )));
        }
    };

    tracing::debug!(
        path = %path.display(),
        locale = bundle.locale(),
        entries = bundle.len(),
        "loaded l10n file"
    );
    Ok(bundle)
}

/// Load every l10n file of one domain from a directory
///
/// Scans `dir` for `*.js` and `*.json` files; the file stem is the locale.
/// When both formats exist for a locale, the JSON file is used.
///
/// # Returns
/// A HashMap mapping locale codes to bundles
///
/// # Errors
/// - Directory not found
/// - File read/parse errors
pub fn load_all_bundles_from_dir(
    dir: &Path,
    domain: &str,
) -> L10nResult<HashMap<String, LocalizationBundle>> {
    if !dir.is_dir() {
        return Err(L10nError::Io(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| L10nError::Io(format!("Failed to read directory '{}': {}", dir.display(), e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| L10nError::Io(format!("Error reading directory entry: {}", e)))?;
        let path = entry.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("js") | Some("json") => paths.push(path),
            _ => continue,
        }
    }
    // .js sorts before .json for the same stem, so JSON is inserted last
    paths.sort();

    let mut bundles: HashMap<String, LocalizationBundle> = HashMap::new();
    for path in paths {
        let bundle = load_bundle_from_file(&path, domain)?;
        if let Some(previous) = bundles.insert(bundle.locale().to_string(), bundle) {
            tracing::warn!(
                locale = previous.locale(),
                path = %path.display(),
                "locale has both .js and .json files, using the JSON file"
            );
        }
    }

    if bundles.is_empty() {
        tracing::warn!(dir = %dir.display(), "no l10n files found");
    }

    Ok(bundles)
}
