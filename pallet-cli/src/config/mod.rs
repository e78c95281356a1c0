//! Configuration file handling
//!
//! Settings come from `~/.config/pallet-cli/config.toml` (or `--config`),
//! with environment overrides for the paths that differ per deployment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pallets::DuplicatePolicy;
use crate::template::{TemplateLayout, parse_cell, parse_column};

/// Overrides `template.path`
pub const TEMPLATE_ENV: &str = "PALLET_TEMPLATE";
/// Overrides `output.directory`
pub const OUTPUT_DIR_ENV: &str = "PALLET_OUTPUT_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub template: TemplateConfig,
    pub output: OutputConfig,
    pub review: ReviewConfig,
}

/// Location and layout of the reference template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub path: PathBuf,
    /// Sheet name; first sheet when unset
    pub sheet: Option<String>,
    pub label_column: String,
    pub code_column: String,
    pub quantity_column: String,
    /// First data row, 1-based as shown in Excel
    pub first_row: u32,
    pub date_cell: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("planilha_base.xlsx"),
            sheet: None,
            label_column: "A".to_string(),
            code_column: "B".to_string(),
            quantity_column: "C".to_string(),
            first_row: 3,
            date_cell: "C1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// File name prefix, followed by `_DD-MM-YYYY`
    pub file_prefix: String,
    pub pdf_title: String,
    /// Produce the PDF report without `--pdf`
    pub always_pdf: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: "CONTROLE_DE_PALETES".to_string(),
            pdf_title: "Controle de Paletes".to_string(),
            always_pdf: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Fail the review when a code is entered twice instead of keeping the last
    pub reject_duplicates: bool,
}

impl Config {
    /// Default config file location (~/.config/pallet-cli/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pallet-cli").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present and built-in defaults otherwise. Environment overrides are
    /// applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    log::debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.template_layout()?;
        Ok(config)
    }

    /// Apply environment overrides through the given lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(TEMPLATE_ENV).filter(|v| !v.trim().is_empty()) {
            log::debug!("Template path overridden by {}: {}", TEMPLATE_ENV, path);
            self.template.path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            log::debug!("Output directory overridden by {}: {}", OUTPUT_DIR_ENV, dir);
            self.output.directory = PathBuf::from(dir);
        }
    }

    /// Resolve the column letters and cell references into a layout
    pub fn template_layout(&self) -> Result<TemplateLayout> {
        let t = &self.template;
        if t.first_row == 0 {
            anyhow::bail!("template.first_row is 1-based and cannot be 0");
        }

        Ok(TemplateLayout {
            sheet: t.sheet.clone(),
            label_column: parse_column(&t.label_column).context("template.label_column")?,
            code_column: parse_column(&t.code_column).context("template.code_column")?,
            quantity_column: parse_column(&t.quantity_column)
                .context("template.quantity_column")?,
            first_row: t.first_row - 1,
            date_cell: parse_cell(&t.date_cell).context("template.date_cell")?,
        })
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.review.reject_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::LastWriteWins
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_warehouse_template() {
        let config = Config::default();
        let layout = config.template_layout().unwrap();
        assert_eq!(layout, TemplateLayout::default());
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::LastWriteWins);
        assert_eq!(config.output.file_prefix, "CONTROLE_DE_PALETES");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [template]
            path = "/srv/paletes/base.xlsx"
            code_column = "D"
            first_row = 5

            [review]
            reject_duplicates = true
            "#,
        )
        .unwrap();

        assert_eq!(config.template.path, PathBuf::from("/srv/paletes/base.xlsx"));
        assert_eq!(config.template.quantity_column, "C");
        let layout = config.template_layout().unwrap();
        assert_eq!(layout.code_column, 3);
        assert_eq!(layout.first_row, 4);
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Reject);
    }

    #[test]
    fn test_bad_layout_is_rejected() {
        assert!(Config::from_toml("[template]\ndate_cell = \"1C\"").is_err());
        assert!(Config::from_toml("[template]\nfirst_row = 0").is_err());
        assert!(Config::from_toml("[template]\ncode_column = 4").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            TEMPLATE_ENV => Some("/tmp/base.xlsx".to_string()),
            OUTPUT_DIR_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.template.path, PathBuf::from("/tmp/base.xlsx"));
        assert_eq!(config.output.directory, PathBuf::from("."));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nalways_pdf = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.output.always_pdf);

        let missing = dir.path().join("missing.toml");
        assert!(Config::from_file(&missing).is_err());
    }
}
