#![forbid(unsafe_code)]
//! Machine translation pipeline for Android `strings.xml` resources.
//!
//! A source document is parsed into a [`Document`], its translatable texts are
//! collected into uniquely keyed [`TextUnit`]s, sent to a [`TranslationBackend`]
//! in delimiter-joined batches, and written back into one document per target
//! locale under the matching `values-*` directory.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::{path::Path, sync::Arc};
//! use droidloc::{BatchOptions, BatchTranslator, GoogleTranslateBackend, Localizer};
//!
//! # async fn run() -> Result<(), droidloc::Error> {
//! let options = BatchOptions::default();
//! let backend = Arc::new(GoogleTranslateBackend::new(options.request_timeout)?);
//! let localizer = Localizer::new(BatchTranslator::new(backend, options), "en");
//! localizer
//!     .localize_all(
//!         Path::new("app/src/main/res/values/strings.xml"),
//!         Path::new("app/src/main/res"),
//!         &["fr".to_string(), "pt-BR".to_string()],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure handling
//!
//! - A missing source file or a source without translatable text is fatal.
//! - Backend errors, timeouts and batches whose segments cannot be aligned
//!   keep the source text for the affected units; output is always written.
//! - Unknown elements are carried over unchanged.

pub mod android_strings;
pub mod backend;
pub mod batch;
pub mod collector;
pub mod error;
pub mod escape;
pub mod locale;
pub mod pipeline;
pub mod rebuild;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    backend::{GoogleTranslateBackend, TranslationBackend},
    batch::{BatchOptions, BatchTranslator, TranslationReport},
    collector::collect,
    error::Error,
    escape::escape,
    locale::directory_for,
    pipeline::{LocaleOutput, Localizer},
    rebuild::rebuild,
    traits::ResourceCodec,
    types::{Document, ResourceElement, TextUnit, Translations, UnitKey, UnitMap},
};
