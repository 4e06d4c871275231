use droidloc::{Error, TranslationBackend};
use droidloc_cli::{TranslateOptions, resolve_plan, translate_with_backend};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Wraps every segment in brackets, keeping the delimiter intact.
struct BracketBackend;

#[async_trait::async_trait]
impl TranslationBackend for BracketBackend {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String, Error> {
        Ok(text
            .split("|~|")
            .map(|segment| format!("[{}] {}", target, segment.trim()))
            .collect::<Vec<_>>()
            .join(" |~| "))
    }

    fn name(&self) -> &str {
        "bracket"
    }
}

#[tokio::test]
async fn test_translate_with_backend_writes_every_locale() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("settings.gradle"), "").unwrap();
    fs::write(
        root.join("config.json"),
        r#"{"target_languages": ["fr", "iw", "zh_TW"], "batch_size": 2}"#,
    )
    .unwrap();
    let values = root.join("app/src/main/res/values");
    fs::create_dir_all(&values).unwrap();
    fs::write(
        values.join("strings.xml"),
        r#"<resources>
    <string name="a">One</string>
    <string name="b">Two</string>
    <string name="c">Three</string>
</resources>"#,
    )
    .unwrap();

    let plan = resolve_plan(&TranslateOptions {
        project: Some(root.to_path_buf()),
        ..TranslateOptions::default()
    })
    .unwrap();
    let report_path = root.join("report.json");
    translate_with_backend(&plan, Arc::new(BracketBackend), Some(report_path.as_path()), false)
        .await
        .unwrap();

    let res = root.join("app/src/main/res");
    let fr = fs::read_to_string(res.join("values-fr/strings.xml")).unwrap();
    assert!(fr.contains(r#"<string name="a">[fr] One</string>"#));
    assert!(fr.contains(r#"<string name="c">[fr] Three</string>"#));
    let hebrew = fs::read_to_string(res.join("values-iw/strings.xml")).unwrap();
    assert!(hebrew.contains("[he] Two"));
    assert!(res.join("values-zh-rTW/strings.xml").is_file());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
    let locales = report["locales"].as_array().unwrap();
    assert_eq!(locales.len(), 3);
    assert_eq!(locales[0]["locale"], "fr");
    assert_eq!(locales[0]["report"]["batches"], 2);
    assert_eq!(locales[0]["report"]["fallback_units"], 0);
    assert_eq!(report["source_language"], "en");
}
