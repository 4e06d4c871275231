//! Batched, concurrent translation of collected text units.
//!
//! Units are grouped into fixed-size batches. Each batch is sent to the
//! backend as one delimiter-joined payload and the response is split back
//! into one segment per unit. A batch whose response cannot be aligned, that
//! errors or that times out keeps its source texts.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    backend::TranslationBackend,
    error::Error,
    locale,
    types::{TextUnit, Translations, UnitMap},
};

/// Joins unit texts inside one backend payload.
pub const BATCH_DELIMITER: &str = "\n|~|\n";

/// What responses are split on. Backends tend to reflow the whitespace
/// around the delimiter, so only the core is relied upon.
const DELIMITER_CORE: &str = "|~|";

pub const DEFAULT_BATCH_SIZE: usize = 25;
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Maximum number of units per backend call.
    pub batch_size: usize,
    /// Maximum number of backend calls in flight.
    pub max_concurrency: usize,
    /// Deadline of one backend call. Not retried on expiry.
    pub request_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BatchOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(Error::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Units submitted together in one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationBatch {
    pub id: usize,
    pub units: Vec<TextUnit>,
}

impl TranslationBatch {
    /// The texts of the batch joined with [`BATCH_DELIMITER`].
    pub fn payload(&self) -> String {
        self.units
            .iter()
            .map(|unit| unit.text.as_str())
            .collect::<Vec<_>>()
            .join(BATCH_DELIMITER)
    }

    /// Splits a backend response into one segment per unit, in unit order.
    ///
    /// A batch holding one unit whose text contains the delimiter takes the
    /// whole response as its segment. Otherwise the segment count must equal
    /// the unit count.
    pub fn align(&self, response: &str) -> Result<Vec<String>, Error> {
        if self.units.len() == 1 && self.units[0].text.contains(DELIMITER_CORE) {
            return Ok(vec![response.trim().to_string()]);
        }
        let segments = split_segments(response);
        if segments.len() != self.units.len() {
            return Err(Error::SegmentMismatch {
                expected: self.units.len(),
                actual: segments.len(),
            });
        }
        Ok(segments)
    }
}

pub fn split_segments(response: &str) -> Vec<String> {
    response
        .split(DELIMITER_CORE)
        .map(|segment| segment.trim().to_string())
        .collect()
}

/// Groups units into batches of at most `batch_size`, in key order.
///
/// A unit whose own text contains the delimiter could never be split back
/// out of a joined response, so it is given a batch of its own.
pub fn partition(units: &UnitMap, batch_size: usize) -> Vec<TranslationBatch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::new();
    let mut current = Vec::new();

    for unit in units.values() {
        if unit.text.contains(DELIMITER_CORE) {
            push_batch(&mut batches, vec![unit.clone()]);
            continue;
        }
        current.push(unit.clone());
        if current.len() == batch_size {
            push_batch(&mut batches, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_batch(&mut batches, current);
    }
    batches
}

fn push_batch(batches: &mut Vec<TranslationBatch>, units: Vec<TextUnit>) {
    let id = batches.len();
    batches.push(TranslationBatch { id, units });
}

/// Counters of one [`BatchTranslator::translate_with_report`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationReport {
    /// Source and target share a base language; nothing was sent.
    pub short_circuited: bool,
    pub batches: usize,
    pub failed_batches: usize,
    /// Units that kept their source text.
    pub fallback_units: usize,
}

/// Translates unit maps through a [`TranslationBackend`].
#[derive(Clone)]
pub struct BatchTranslator {
    backend: Arc<dyn TranslationBackend>,
    options: BatchOptions,
}

impl BatchTranslator {
    pub fn new(backend: Arc<dyn TranslationBackend>, options: BatchOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Translates every unit from `source_locale` to `target_locale`.
    ///
    /// The result has exactly the keys of `units`; a unit that could not be
    /// translated maps to its source text.
    pub async fn translate(
        &self,
        units: &UnitMap,
        source_locale: &str,
        target_locale: &str,
    ) -> Translations {
        self.translate_with_report(units, source_locale, target_locale)
            .await
            .0
    }

    pub async fn translate_with_report(
        &self,
        units: &UnitMap,
        source_locale: &str,
        target_locale: &str,
    ) -> (Translations, TranslationReport) {
        let mut report = TranslationReport::default();

        if locale::same_language(source_locale, target_locale) {
            tracing::info!(
                source_locale,
                target_locale,
                "target shares the source language, copying source texts"
            );
            report.short_circuited = true;
            return (source_texts(units), report);
        }

        let source = locale::backend_language_code(source_locale);
        let target = locale::backend_language_code(target_locale);
        let batches = partition(units, self.options.batch_size);
        report.batches = batches.len();

        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for batch in batches {
            let backend = Arc::clone(&self.backend);
            let semaphore = Arc::clone(&semaphore);
            let source = source.clone();
            let target = target.clone();
            let timeout = self.options.request_timeout;

            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        dispatch(backend.as_ref(), &batch, &source, &target, timeout).await
                    }
                    Err(e) => Err(Error::translation_error(
                        "worker pool closed",
                        Some(Box::new(e)),
                    )),
                };
                (batch, result)
            });
        }

        let mut translations = Translations::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((batch, Ok(segments))) => {
                    merge_segments(&mut translations, &batch, segments);
                }
                Ok((batch, Err(e))) => {
                    report.failed_batches += 1;
                    tracing::warn!(
                        batch = batch.id,
                        units = batch.units.len(),
                        error = %e,
                        "batch failed, keeping source text"
                    );
                }
                Err(e) => {
                    report.failed_batches += 1;
                    tracing::error!("batch task panicked: {e}");
                }
            }
        }

        for (key, unit) in units {
            if !translations.contains_key(key) {
                translations.insert(key.clone(), unit.text.clone());
                report.fallback_units += 1;
            }
        }

        tracing::info!(
            locale = target_locale,
            batches = report.batches,
            failed = report.failed_batches,
            fallback = report.fallback_units,
            "translated units"
        );
        (translations, report)
    }
}

async fn dispatch(
    backend: &dyn TranslationBackend,
    batch: &TranslationBatch,
    source: &str,
    target: &str,
    timeout: Duration,
) -> Result<Vec<String>, Error> {
    tracing::debug!(
        batch = batch.id,
        units = batch.units.len(),
        backend = backend.name(),
        "dispatching batch"
    );
    let response = tokio::time::timeout(timeout, backend.translate(&batch.payload(), source, target))
        .await
        .map_err(|_| Error::Timeout(timeout))??;
    batch.align(&response)
}

/// Empty segments are left out so those units fall back to their source.
fn merge_segments(translations: &mut Translations, batch: &TranslationBatch, segments: Vec<String>) {
    for (unit, segment) in batch.units.iter().zip(segments) {
        if segment.is_empty() {
            continue;
        }
        translations.insert(unit.key.clone(), segment);
    }
}

fn source_texts(units: &UnitMap) -> Translations {
    units
        .iter()
        .map(|(key, unit)| (key.clone(), unit.text.clone()))
        .collect()
}
