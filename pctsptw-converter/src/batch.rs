use anyhow::{anyhow, Result};
use pctsptw_instances::{
    pctsptw::{GenerationParams, PctsptwInstance},
    tsptw::TsptwInstance,
    InstanceError,
};
use pctsptw_structs::{
    config::ConversionConfig,
    core::{ConversionReport, ConvertedInstance, FileOutcome},
};
use pctsptw_utils::{derive_instance_seed, jsonify, rel_path_key};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// `inst01.txt` -> `inst01<suffix>.txt`, keeping the parent directories.
pub fn with_suffix_before_extension(path: &Path, suffix: &str) -> PathBuf {
    let mut file_name = path.file_stem().unwrap_or_default().to_os_string();
    file_name.push(suffix);
    if let Some(extension) = path.extension() {
        file_name.push(".");
        file_name.push(extension);
    }
    path.with_file_name(file_name)
}

/// Every regular file under `in_dir`, sorted. A missing directory or an empty
/// file set is an error.
pub fn discover_instances(in_dir: &Path) -> Result<Vec<PathBuf>> {
    if !in_dir.exists() {
        return Err(anyhow!("Input directory not found: {}", in_dir.display()));
    }
    if !in_dir.is_dir() {
        return Err(anyhow!("Input path is not a directory: {}", in_dir.display()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(in_dir) {
        match entry {
            Ok(entry) if entry.path().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => warn!("[pctsptw] skipping unreadable entry: {}", e),
        }
    }
    if files.is_empty() {
        return Err(anyhow!(
            "No instance files found under: {}",
            in_dir.display()
        ));
    }
    files.sort();
    Ok(files)
}

/// Reads, transforms and writes one instance. `rel_path` is relative to the input
/// directory and decides both the seed and the output location.
pub fn convert_instance(
    config: &ConversionConfig,
    params: &GenerationParams,
    in_path: &Path,
    rel_path: &Path,
) -> Result<ConvertedInstance, InstanceError> {
    let tsptw = TsptwInstance::read_from_file(in_path)?;

    let rel_key = rel_path_key(rel_path);
    let seed = derive_instance_seed(config.global_seed, &rel_key);
    let generated = PctsptwInstance::generate_instance(tsptw, seed, params)?;
    if generated.metric_closure_applied {
        debug!("[pctsptw] applied metric closure to {}", rel_key);
    }

    let out_path = config
        .out_dir
        .join(with_suffix_before_extension(rel_path, &config.output_suffix));
    generated.instance.write_to_file(&out_path)?;

    let instance = &generated.instance;
    Ok(ConvertedInstance {
        rel_path: rel_key,
        out_path,
        seed,
        num_nodes: instance.num_nodes,
        metric_closure_applied: generated.metric_closure_applied,
        total_reward: instance.total_reward(),
        quota: instance.quota,
    })
}

/// Converts every discovered file. Setup problems abort before the first file;
/// a failing file is logged and skipped.
pub fn run_batch(config: &ConversionConfig) -> Result<ConversionReport> {
    config.validate()?;
    let files = discover_instances(&config.in_dir)?;
    info!(
        "[pctsptw] converting {} file(s) from {} (global_seed={})",
        files.len(),
        config.in_dir.display(),
        config.global_seed
    );
    debug!("[pctsptw] config: {}", jsonify(config)?);

    let params = config.generation_params();
    let mut outcomes = Vec::with_capacity(files.len());
    for in_path in &files {
        let rel_path = in_path.strip_prefix(&config.in_dir).unwrap_or(in_path);
        let outcome = match convert_instance(config, &params, in_path, rel_path) {
            Ok(converted) => {
                debug!(
                    "[pctsptw] wrote {} (n={}, quota={}/{})",
                    converted.out_path.display(),
                    converted.num_nodes,
                    converted.quota,
                    converted.total_reward
                );
                FileOutcome::Converted(converted)
            }
            Err(e) => {
                warn!("[pctsptw] Failed converting {}: {}", in_path.display(), e);
                FileOutcome::Skipped {
                    rel_path: rel_path_key(rel_path),
                    reason: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
    }

    let report = ConversionReport::new(config.clone(), outcomes);
    info!(
        "[pctsptw] converted {} of {} file(s), skipped {}",
        report.num_converted,
        report.num_files,
        report.num_skipped()
    );
    if report.num_skipped() > 0 {
        let skipped = report
            .outcomes
            .iter()
            .filter(|o| !o.is_converted())
            .map(|o| o.rel_path())
            .collect::<Vec<&str>>();
        warn!("[pctsptw] skipped files: {}", skipped.join(", "));
    }
    Ok(report)
}
