use anyhow::{anyhow, Context, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use pctsptw_converter::run_batch;
use pctsptw_instances::{pctsptw::PctsptwInstance, rewards::BetaSampler};
use pctsptw_structs::config::ConversionConfig;
use pctsptw_utils::{dejsonify, derive_instance_seed, jsonify_pretty};
use serde_json::json;
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("pctsptw-converter")
        .about("Converts TSPTW instances into prize-collecting PCTSPTW instances")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Converts every instance file under an input directory")
                .arg(
                    arg!(--settings [SETTINGS] "Settings json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--in_dir [PATH] "Input directory (default: data/TSPTW/RifkiSolnon)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--out_dir [PATH] "Output directory (default: data/PCTSPTW/RifkiSolnon)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--r_min [R_MIN] "Minimum reward for non-depot nodes (default: 10)")
                        .value_parser(clap::value_parser!(i64))
                        .allow_negative_numbers(true),
                )
                .arg(
                    arg!(--r_max [R_MAX] "Maximum reward for non-depot nodes (default: 100)")
                        .value_parser(clap::value_parser!(i64))
                        .allow_negative_numbers(true),
                )
                .arg(
                    arg!(--alpha [ALPHA] "Beta(alpha, beta) parameter alpha (default: 2.0)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--beta [BETA] "Beta(alpha, beta) parameter beta (default: 2.0)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--beta_sampler [SAMPLER] "Beta sampling algorithm (default: gamma_ratio)")
                        .value_parser(["gamma_ratio", "rand_distr"]),
                )
                .arg(
                    arg!(--normalize_mean_to [MEAN] "Rescale rewards to approximately this mean, <0 disables (default: 50.0)")
                        .value_parser(clap::value_parser!(f64))
                        .allow_negative_numbers(true),
                )
                .arg(
                    arg!(--quota_fraction [FRACTION] "Quota is ceil(fraction * total_reward) (default: 0.65)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--enforce_metric "Always compute the metric closure")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--global_seed [SEED] "Global seed mixed with each instance path (default: 12345)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--suffix [SUFFIX] "Inserted before the extension of output files (default: _pctsptw)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--report [REPORT_FILE] "If set, a json report of the run is saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Checks a PCTSPTW instance file and prints a summary")
                .arg(arg!(<FILE> "Path to a PCTSPTW instance").value_parser(clap::value_parser!(PathBuf))),
        )
        .subcommand(
            Command::new("derive_seed")
                .about("Prints the seed an instance path is converted with")
                .arg(arg!(<GLOBAL_SEED> "Global seed").value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(<REL_PATH> "Instance path relative to the input directory")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("convert", sub_m)) => load_config(sub_m).and_then(|config| {
            convert(config, sub_m.get_one::<PathBuf>("report").cloned())
        }),
        Some(("inspect", sub_m)) => inspect(sub_m.get_one::<PathBuf>("FILE").unwrap().clone()),
        Some(("derive_seed", sub_m)) => derive_seed(
            *sub_m.get_one::<u64>("GLOBAL_SEED").unwrap(),
            sub_m.get_one::<String>("REL_PATH").unwrap().clone(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

pub fn convert(config: ConversionConfig, report_file: Option<PathBuf>) -> Result<()> {
    let report = run_batch(&config)?;
    if let Some(path) = report_file {
        fs::write(&path, report.to_json()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }
    println!(
        "Done. Converted {} of {} instance(s) into {}",
        report.num_converted,
        report.num_files,
        config.out_dir.display()
    );
    Ok(())
}

pub fn inspect(path: PathBuf) -> Result<()> {
    let instance = PctsptwInstance::read_from_file(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    instance
        .verify()
        .with_context(|| format!("Invalid instance {}", path.display()))?;
    let summary = json!({
        "num_nodes": instance.num_nodes,
        "quota": instance.quota,
        "total_reward": instance.total_reward(),
        "distance_upper_bound": instance.distance_upper_bound(),
        "horizon": instance.horizon(),
    });
    println!("{}", jsonify_pretty(&summary)?);
    Ok(())
}

pub fn derive_seed(global_seed: u64, rel_path: String) -> Result<()> {
    println!("{}", derive_instance_seed(global_seed, &rel_path));
    Ok(())
}

/// Defaults, then the settings json, then flags given on the command line.
fn load_config(sub_m: &ArgMatches) -> Result<ConversionConfig> {
    let mut config = match sub_m.get_one::<String>("settings") {
        Some(settings) => load_settings(settings)?,
        None => ConversionConfig::default(),
    };
    if let Some(in_dir) = sub_m.get_one::<PathBuf>("in_dir") {
        config.in_dir = in_dir.clone();
    }
    if let Some(out_dir) = sub_m.get_one::<PathBuf>("out_dir") {
        config.out_dir = out_dir.clone();
    }
    if let Some(&r_min) = sub_m.get_one::<i64>("r_min") {
        config.rewards.r_min = r_min;
    }
    if let Some(&r_max) = sub_m.get_one::<i64>("r_max") {
        config.rewards.r_max = r_max;
    }
    if let Some(&alpha) = sub_m.get_one::<f64>("alpha") {
        config.rewards.alpha = alpha;
    }
    if let Some(&beta) = sub_m.get_one::<f64>("beta") {
        config.rewards.beta = beta;
    }
    if let Some(sampler) = sub_m.get_one::<String>("beta_sampler") {
        config.rewards.beta_sampler = match sampler.as_str() {
            "rand_distr" => BetaSampler::RandDistr,
            _ => BetaSampler::GammaRatio,
        };
    }
    if let Some(&mean) = sub_m.get_one::<f64>("normalize_mean_to") {
        config.rewards.normalize_mean_to = mean;
    }
    if let Some(&fraction) = sub_m.get_one::<f64>("quota_fraction") {
        config.quota.fraction = fraction;
    }
    if sub_m.get_flag("enforce_metric") {
        config.enforce_metric = true;
    }
    if let Some(&global_seed) = sub_m.get_one::<u64>("global_seed") {
        config.global_seed = global_seed;
    }
    if let Some(suffix) = sub_m.get_one::<String>("suffix") {
        config.output_suffix = suffix.clone();
    }
    Ok(config)
}

fn load_settings(settings: &str) -> Result<ConversionConfig> {
    let settings = if settings.ends_with(".json") {
        fs::read_to_string(settings)
            .with_context(|| format!("Failed to read settings file: {}", settings))?
    } else {
        settings.to_string()
    };
    dejsonify::<ConversionConfig>(&settings).context("Failed to parse settings")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_matches(args: &[&str]) -> ArgMatches {
        let matches = cli()
            .try_get_matches_from(
                ["pctsptw-converter", "convert"]
                    .iter()
                    .chain(args.iter()),
            )
            .unwrap();
        matches.subcommand_matches("convert").unwrap().clone()
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let config = load_config(&convert_matches(&[])).unwrap();
        assert_eq!(config, ConversionConfig::default());
    }

    #[test]
    fn test_flags_override_settings() {
        let config = load_config(&convert_matches(&[
            "--settings",
            r#"{"global_seed": 1, "rewards": {"r_min": 5, "alpha": 3.0}}"#,
            "--global_seed",
            "99",
            "--normalize_mean_to",
            "-1",
            "--enforce_metric",
            "--beta_sampler",
            "rand_distr",
            "--in_dir",
            "in",
        ]))
        .unwrap();
        assert_eq!(config.global_seed, 99);
        assert_eq!(config.rewards.r_min, 5);
        assert_eq!(config.rewards.alpha, 3.0);
        assert_eq!(config.rewards.target_mean(), None);
        assert!(config.enforce_metric);
        assert_eq!(config.rewards.beta_sampler, BetaSampler::RandDistr);
        assert_eq!(config.in_dir, PathBuf::from("in"));
        assert_eq!(config.out_dir, ConversionConfig::default().out_dir);
    }

    #[test]
    fn test_bad_settings_are_reported() {
        assert!(load_config(&convert_matches(&["--settings", "{not json"])).is_err());
        assert!(load_config(&convert_matches(&["--settings", "missing_settings.json"])).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_sampler() {
        assert!(cli()
            .try_get_matches_from(["pctsptw-converter", "convert", "--beta_sampler", "cheng"])
            .is_err());
    }

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }
}
