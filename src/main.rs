use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use richdocuments_l10n::locales::es_pr;
use richdocuments_l10n::{
    L10nError, LocalizationBundle, PluralRule, Translation, category_name,
    load_all_bundles_from_dir, load_bundle_from_file, sample_counts,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Largest quantity swept when comparing a rule with CLDR.
const CLDR_SWEEP_LIMIT: u64 = 10_000_000;

fn file_arg() -> Arg {
    Arg::new("file")
        .long("file")
        .short('f')
        .help("Read a .js or .json l10n file instead of the embedded es_PR bundle")
        .value_parser(clap::value_parser!(PathBuf))
}

fn domain_arg() -> Arg {
    Arg::new("domain")
        .long("domain")
        .short('d')
        .help("Translation domain the files belong to")
        .default_value(es_pr::DOMAIN)
}

fn cli() -> Command {
    Command::new("richdocuments-l10n")
        .version("0.1.0")
        .about("Inspect and validate richdocuments localization bundles")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log at debug level")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("list")
                .about("Print every translation as `key = value`, sorted by key")
                .arg(file_arg())
                .arg(domain_arg()),
        )
        .subcommand(
            Command::new("get")
                .about("Print the translation of one key")
                .arg(
                    Arg::new("key")
                        .help("Source-language key, e.g. \"Save\"")
                        .required(true)
                        .index(1),
                )
                .arg(file_arg())
                .arg(domain_arg()),
        )
        .subcommand(
            Command::new("plural")
                .about("Print the plural category index for a quantity")
                .arg(
                    Arg::new("n")
                        .help("Quantity")
                        .required(true)
                        .allow_negative_numbers(true)
                        .index(1),
                )
                .arg(
                    Arg::new("forms")
                        .long("forms")
                        .help("Plural-Forms header to evaluate (default: the es_PR rule)")
                        .default_value(es_pr::PLURAL_FORMS),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Load and validate an l10n file or directory")
                .arg(
                    Arg::new("path")
                        .help("A .js / .json file, or a directory of them")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(domain_arg())
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail when a plural rule disagrees with CLDR")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn domain(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("domain")
        .map(String::as_str)
        .unwrap_or(es_pr::DOMAIN)
}

fn selected_bundle(matches: &ArgMatches) -> Result<LocalizationBundle, L10nError> {
    match matches.get_one::<PathBuf>("file") {
        Some(path) => load_bundle_from_file(path, domain(matches)),
        None => es_pr::bundle(),
    }
}

fn format_translation(translation: &Translation) -> String {
    match translation {
        Translation::Singular(text) => text.clone(),
        Translation::Plural(variants) => format!("[{}]", variants.join(" | ")),
    }
}

fn run_list(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = selected_bundle(matches)?;
    for (key, translation) in bundle.sorted_entries() {
        println!("{} = {}", key, format_translation(translation));
    }
    Ok(())
}

fn run_get(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = selected_bundle(matches)?;
    let key = matches
        .get_one::<String>("key")
        .ok_or("missing key argument")?;
    println!("{}", bundle.translate(key)?);
    Ok(())
}

fn run_plural(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let raw = matches.get_one::<String>("n").ok_or("missing quantity")?;
    let forms = matches
        .get_one::<String>("forms")
        .map(String::as_str)
        .unwrap_or(es_pr::PLURAL_FORMS);

    let n: i64 = raw.trim().parse().map_err(|_| {
        L10nError::InvalidArgument(format!("quantity must be an integer, got '{}'", raw))
    })?;
    let rule = PluralRule::parse(forms)?;
    println!("{}", rule.category(n)?);
    Ok(())
}

/// Validates one bundle; returns false when the plural rule disagrees with CLDR.
fn check_bundle(bundle: &LocalizationBundle) -> bool {
    let rule = bundle.plural_rule();
    println!(
        "{}/{}: {} entries, nplurals={}",
        bundle.domain(),
        bundle.locale(),
        bundle.len(),
        rule.nplurals()
    );

    match rule.cldr_agreement(bundle.locale(), sample_counts(CLDR_SWEEP_LIMIT)) {
        Ok(categories) => {
            for (index, category) in categories.into_iter().enumerate() {
                let name = category.map(category_name).unwrap_or("(unused)");
                println!("  plural {} -> CLDR {}", index, name);
            }
            true
        }
        Err(e) => {
            warn!(locale = bundle.locale(), "{}", e);
            println!("  {}", e);
            false
        }
    }
}

fn run_check(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = matches
        .get_one::<PathBuf>("path")
        .ok_or("missing path argument")?;
    let strict = matches.get_flag("strict");
    let domain = domain(matches);

    let mut bundles: Vec<LocalizationBundle> = if path.is_dir() {
        load_all_bundles_from_dir(path, domain)?.into_values().collect()
    } else {
        vec![load_bundle_from_file(path, domain)?]
    };
    bundles.sort_by(|a, b| a.locale().cmp(b.locale()));

    let mut disagreements = 0;
    for bundle in &bundles {
        if !check_bundle(bundle) {
            disagreements += 1;
        }
    }

    info!(
        path = %path.display(),
        bundles = bundles.len(),
        disagreements,
        "check finished"
    );
    if strict && disagreements > 0 {
        return Err(format!(
            "{} bundle(s) with plural rules that disagree with CLDR",
            disagreements
        )
        .into());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("list", sub)) => run_list(sub),
        Some(("get", sub)) => run_get(sub),
        Some(("plural", sub)) => run_plural(sub),
        Some(("check", sub)) => run_check(sub),
        _ => Err("unknown command".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_parse_plural_subcommand() {
        let matches = cli()
            .try_get_matches_from(["richdocuments-l10n", "plural", "-3"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "plural");
        assert_eq!(sub.get_one::<String>("n").unwrap(), "-3");
        assert!(matches!(
            run_plural(sub).unwrap_err().downcast_ref::<L10nError>(),
            Some(L10nError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_get_missing_key_fails() {
        let matches = cli()
            .try_get_matches_from(["richdocuments-l10n", "get", "Open"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let err = run_get(sub).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<L10nError>(),
            Some(L10nError::MissingTranslation { .. })
        ));
    }

    #[test]
    fn test_format_translation() {
        assert_eq!(format_translation(&Translation::from("Guardar")), "Guardar");
        assert_eq!(
            format_translation(&Translation::Plural(vec![
                "a".to_string(),
                "b".to_string()
            ])),
            "[a | b]"
        );
    }

    #[test]
    fn test_check_embedded_agrees_with_cldr() {
        assert!(check_bundle(&es_pr::bundle().unwrap()));
    }

    const GERMANIC_FORMS: &str = "nplurals=2; plural=n != 1;";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "richdocuments-l10n-cli-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_l10n_json(dir: &std::path::Path, locale: &str, forms: &str) {
        let text = format!(
            r#"{{"translations": {{"Save": "Save"}}, "pluralForm": "{}"}}"#,
            forms
        );
        std::fs::write(dir.join(format!("{}.json", locale)), text).unwrap();
    }

    fn check(args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
        let matches = cli()
            .try_get_matches_from(["richdocuments-l10n", "check"].iter().chain(args).copied())
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        run_check(sub)
    }

    #[test]
    fn test_check_dir_cldr_disagreement_is_a_warning() {
        // the two-form rule fits German but not CLDR's es, which has "many"
        let dir = scratch_dir("warn");
        write_l10n_json(&dir, "de", GERMANIC_FORMS);
        write_l10n_json(&dir, "es", GERMANIC_FORMS);
        let path = dir.to_str().unwrap();

        assert!(check(&[path]).is_ok());
        let err = check(&[path, "--strict"]).unwrap_err();
        assert!(err.to_string().contains("1 bundle(s)"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_check_dir_all_agreeing_passes_strict() {
        let dir = scratch_dir("strict-ok");
        write_l10n_json(&dir, "de", GERMANIC_FORMS);
        write_l10n_json(&dir, "es_PR", es_pr::PLURAL_FORMS);

        assert!(check(&[dir.to_str().unwrap(), "--strict"]).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_check_dir_with_broken_file_fails() {
        let dir = scratch_dir("broken");
        write_l10n_json(&dir, "de", GERMANIC_FORMS);
        std::fs::write(dir.join("fr.json"), "{").unwrap();

        let err = check(&[dir.to_str().unwrap()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<L10nError>(),
            Some(L10nError::Json(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_check_single_file() {
        let l10n = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("l10n").join("es_PR.js");
        assert!(check(&[l10n.to_str().unwrap(), "--strict"]).is_ok());
    }
}
