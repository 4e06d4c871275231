use std::path::{Path, PathBuf};
use std::sync::Arc;

use droidloc::pipeline::{LocaleOutput, collect_units, load_source, output_path};
use droidloc::{BatchTranslator, GoogleTranslateBackend, Localizer, TranslationBackend};
use serde_json::json;

use crate::config::{DEFAULT_CONFIG_FILE_NAME, TranslateConfig};
use crate::discovery::{find_project_root, find_source_strings, resource_root};
use crate::validation::{validate_file_path, validate_language_code};

#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Directory to start project discovery from; the current directory when unset.
    pub project: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Source `strings.xml`, bypassing discovery.
    pub input: Option<PathBuf>,
    /// Overrides the configured target languages when non-empty.
    pub langs: Vec<String>,
    /// Where to write a JSON summary of the run.
    pub report_json: Option<PathBuf>,
    pub dry_run: bool,
}

/// Everything a run needs, resolved from options, config and discovery.
#[derive(Debug, Clone)]
pub struct TranslatePlan {
    pub config: TranslateConfig,
    pub source_file: PathBuf,
    pub res_root: PathBuf,
    pub target_languages: Vec<String>,
}

pub fn resolve_plan(opts: &TranslateOptions) -> Result<TranslatePlan, String> {
    let start = match &opts.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| format!("Cannot determine current directory: {}", e))?,
    };
    let project_root = find_project_root(&start);

    let config = match (&opts.config, &project_root) {
        (Some(path), _) => {
            validate_file_path(path)?;
            TranslateConfig::load(path)?
        }
        (None, Some(root)) if root.join(DEFAULT_CONFIG_FILE_NAME).is_file() => {
            TranslateConfig::load(&root.join(DEFAULT_CONFIG_FILE_NAME))?
        }
        (None, _) if !opts.langs.is_empty() => TranslateConfig::default(),
        (None, _) => {
            return Err(format!(
                "No configuration found; pass --config or create {} in the project root",
                DEFAULT_CONFIG_FILE_NAME
            ));
        }
    };
    config.validate()?;

    let source_file = match &opts.input {
        Some(path) => {
            validate_file_path(path)?;
            path.clone()
        }
        None => {
            let root = project_root.ok_or_else(|| {
                format!(
                    "No settings.gradle or settings.gradle.kts found above {}",
                    start.display()
                )
            })?;
            find_source_strings(&root)?
        }
    };
    let res_root = resource_root(&source_file)?;
    tracing::debug!(
        source = %source_file.display(),
        res_root = %res_root.display(),
        "resolved source strings"
    );

    let target_languages = if opts.langs.is_empty() {
        config.target_languages.clone()
    } else {
        for lang in &opts.langs {
            validate_language_code(lang)?;
        }
        opts.langs.clone()
    };
    if target_languages.is_empty() {
        return Err("No target languages configured".to_string());
    }

    Ok(TranslatePlan {
        config,
        source_file,
        res_root,
        target_languages,
    })
}

pub async fn run_translate_command(opts: TranslateOptions) -> Result<(), String> {
    let plan = resolve_plan(&opts)?;
    let backend = GoogleTranslateBackend::new(plan.config.batch_options().request_timeout)
        .map_err(|e| format!("Cannot create translation client: {}", e))?;
    translate_with_backend(&plan, Arc::new(backend), opts.report_json.as_deref(), opts.dry_run)
        .await
}

/// Runs a resolved plan against `backend`.
pub async fn translate_with_backend(
    plan: &TranslatePlan,
    backend: Arc<dyn TranslationBackend>,
    report_json: Option<&Path>,
    dry_run: bool,
) -> Result<(), String> {
    println!("Source: {}", plan.source_file.display());

    if dry_run {
        return print_dry_run(plan);
    }

    let translator = BatchTranslator::new(backend, plan.config.batch_options());
    let localizer = Localizer::new(translator, plan.config.source_language.clone());
    let outputs = localizer
        .localize_all(&plan.source_file, &plan.res_root, &plan.target_languages)
        .await
        .map_err(|e| format!("Translation failed: {}", e))?;

    for output in &outputs {
        let report = &output.report;
        if report.short_circuited {
            println!(
                "✅ {} (same language as source, copied): {}",
                output.locale,
                output.path.display()
            );
        } else if report.fallback_units > 0 {
            println!(
                "⚠️  {}: {} ({} of {} batches failed, {} texts left untranslated)",
                output.locale,
                output.path.display(),
                report.failed_batches,
                report.batches,
                report.fallback_units
            );
        } else {
            println!("✅ {}: {}", output.locale, output.path.display());
        }
    }
    println!("Translated into {} locale(s)", outputs.len());

    if let Some(report_path) = report_json {
        write_report_json(plan, &outputs, report_path)?;
        println!("Report JSON written: {}", report_path.display());
    }
    Ok(())
}

fn write_report_json(
    plan: &TranslatePlan,
    outputs: &[LocaleOutput],
    report_path: &Path,
) -> Result<(), String> {
    let payload = json!({
        "source_file": plan.source_file,
        "source_language": plan.config.source_language,
        "locales": outputs,
    });
    let content = serde_json::to_string_pretty(&payload)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(report_path, content)
        .map_err(|e| format!("Failed to write report JSON '{}': {}", report_path.display(), e))
}

fn print_dry_run(plan: &TranslatePlan) -> Result<(), String> {
    let document = load_source(&plan.source_file).map_err(|e| e.to_string())?;
    let units = collect_units(&document).map_err(|e| e.to_string())?;
    println!("Translatable texts: {}", units.len());
    for lang in &plan.target_languages {
        println!("  {} -> {}", lang, display_relative(&output_path(&plan.res_root, lang), &plan.res_root));
    }
    println!("Dry-run mode: no files were written");
    Ok(())
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
