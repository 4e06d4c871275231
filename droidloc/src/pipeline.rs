//! End-to-end localization of one source `strings.xml` into many locales.
//!
//! The source is parsed and collected once. Locales are then processed one
//! after another; the batches of each locale run concurrently inside the
//! [`BatchTranslator`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    batch::{BatchTranslator, TranslationReport},
    collector::collect,
    error::Error,
    locale::{directory_for, is_qualified},
    rebuild::rebuild,
    traits::ResourceCodec,
    types::{Document, UnitMap},
};

pub const STRINGS_FILE_NAME: &str = "strings.xml";

/// Result of localizing one target locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleOutput {
    pub locale: String,
    pub path: PathBuf,
    pub report: TranslationReport,
}

/// `<res_root>/<values-qualifier>/strings.xml` for a locale.
pub fn output_path(res_root: &Path, locale_tag: &str) -> PathBuf {
    res_root
        .join(directory_for(locale_tag))
        .join(STRINGS_FILE_NAME)
}

/// Rejects target tags that would resolve to the source's own `values`
/// directory.
pub fn check_target_locale(locale_tag: &str) -> Result<(), Error> {
    if !is_qualified(locale_tag) {
        return Err(Error::Config(format!(
            "target locale '{}' has no language subtag",
            locale_tag
        )));
    }
    Ok(())
}

/// Reads the source document, failing with [`Error::Lookup`] when the file
/// is absent.
pub fn load_source(source_file: &Path) -> Result<Document, Error> {
    if !source_file.is_file() {
        return Err(Error::lookup_error(format!(
            "source file not found: {}",
            source_file.display()
        )));
    }
    Document::read_file(source_file)
}

/// Collects the units of `document`, failing with [`Error::Lookup`] when
/// there is nothing to translate.
pub fn collect_units(document: &Document) -> Result<UnitMap, Error> {
    let units = collect(document);
    if units.is_empty() {
        return Err(Error::lookup_error("no translatable strings found"));
    }
    Ok(units)
}

pub struct Localizer {
    translator: BatchTranslator,
    source_language: String,
}

impl Localizer {
    pub fn new(translator: BatchTranslator, source_language: impl Into<String>) -> Self {
        Self {
            translator,
            source_language: source_language.into(),
        }
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Translates `units` into `locale_tag` and rebuilds `document` with them.
    pub async fn localize_locale(
        &self,
        document: &Document,
        units: &UnitMap,
        locale_tag: &str,
    ) -> (Document, TranslationReport) {
        let (translations, report) = self
            .translator
            .translate_with_report(units, &self.source_language, locale_tag)
            .await;
        (rebuild(document, &translations), report)
    }

    /// Localizes `source_file` into every locale of `target_locales`, writing
    /// each result below `res_root`.
    ///
    /// Target tags without a language subtag and lookup failures abort
    /// before any translation work. Translation failures never do; affected
    /// texts stay in the source language.
    pub async fn localize_all(
        &self,
        source_file: &Path,
        res_root: &Path,
        target_locales: &[String],
    ) -> Result<Vec<LocaleOutput>, Error> {
        for locale_tag in target_locales {
            check_target_locale(locale_tag)?;
        }
        let document = load_source(source_file)?;
        let units = collect_units(&document)?;
        tracing::info!(
            source = %source_file.display(),
            units = units.len(),
            locales = target_locales.len(),
            "loaded source strings"
        );

        let mut outputs = Vec::with_capacity(target_locales.len());
        for locale_tag in target_locales {
            let (localized, report) = self.localize_locale(&document, &units, locale_tag).await;
            let path = write_output(res_root, locale_tag, &localized)?;
            tracing::info!(locale = %locale_tag, path = %path.display(), "wrote localized strings");
            outputs.push(LocaleOutput {
                locale: locale_tag.clone(),
                path,
                report,
            });
        }
        Ok(outputs)
    }
}

/// Writes a localized document to its locale directory, creating it if needed.
pub fn write_output(res_root: &Path, locale_tag: &str, document: &Document) -> Result<PathBuf, Error> {
    check_target_locale(locale_tag)?;
    let path = output_path(res_root, locale_tag);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    document.write_file(&path)?;
    Ok(path)
}
