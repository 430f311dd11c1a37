use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use metering_core::MeteringSettings;
use metering_engine::{DEFAULT_CONTAINER_SELECTOR, DEFAULT_GATE_CLASS, DEFAULT_STORAGE_KEY};
use metering_logging::meter_info;
use serde::Deserialize;

/// Host configuration read from a RON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub metering: MeteringSettings,
    #[serde(default = "default_container_selector")]
    pub container_selector: String,
    #[serde(default = "default_gate_class")]
    pub gate_class: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_container_selector() -> String {
    DEFAULT_CONTAINER_SELECTOR.to_string()
}

fn default_gate_class() -> String {
    DEFAULT_GATE_CLASS.to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<Self> {
        ron::from_str(text).context("invalid metering config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        meter_info!(
            "Loaded config from {:?}: period={:?} count={}",
            path,
            config.metering.period,
            config.metering.count
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use metering_core::{ContentId, Period};

    #[test]
    fn minimal_config_uses_defaults() {
        let config = AppConfig::parse(
            r#"(
                metering: (period: week, count: 3, post_id: 42),
            )"#,
        )
        .unwrap();

        assert_eq!(config.metering.period, Period::Week);
        assert_eq!(config.metering.count, 3);
        assert_eq!(config.metering.post_id, ContentId::from(42));
        assert_eq!(config.metering.visible_paragraphs, 2);
        assert!(!config.metering.use_more_tag);
        assert_eq!(config.container_selector, ".entry-content");
        assert_eq!(config.gate_class, "content-gate");
        assert_eq!(config.storage_key, "metered-views");
    }

    #[test]
    fn full_config_overrides_defaults() {
        let config = AppConfig::parse(
            r#"(
                metering: (
                    period: day,
                    count: 1,
                    post_id: "post-1",
                    visible_paragraphs: 4,
                    use_more_tag: true,
                ),
                container_selector: "article",
                gate_class: "paywall",
                storage_key: "reader-42",
            )"#,
        )
        .unwrap();

        assert_eq!(config.metering.post_id, ContentId::from("post-1"));
        assert_eq!(config.metering.visible_paragraphs, 4);
        assert!(config.metering.use_more_tag);
        assert_eq!(config.container_selector, "article");
        assert_eq!(config.storage_key, "reader-42");
    }

    #[test]
    fn unknown_period_is_accepted() {
        let config =
            AppConfig::parse("(metering: (period: fortnight, count: 1, post_id: 1))").unwrap();
        assert_eq!(config.metering.period, Period::Unrecognized);
    }

    #[test]
    fn missing_metering_section_is_an_error() {
        assert!(AppConfig::parse("(gate_class: \"x\")").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("meter.ron");
        std::fs::write(&path, "(metering: (period: year, count: 5, post_id: 7))").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.metering.period, Period::Year);
    }
}
