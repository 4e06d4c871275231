//! CLI library for testing purposes

pub mod config;
pub mod discovery;
pub mod translate;
pub mod validation;

pub use config::TranslateConfig;
pub use translate::{TranslateOptions, TranslatePlan, resolve_plan, translate_with_backend};
