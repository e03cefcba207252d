use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::block::{StyleTag, TokenKind};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub header: HeaderConfig,
    pub inline: InlineConfig,
    pub code_block: CodeBlockConfig,
    pub separator: SeparatorConfig,
    pub page: PageConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Body text size in points
    pub size: f64,
    pub code_size: f64,
    pub code_family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: 13.0,
            code_size: 11.5,
            code_family: "DejaVu Sans Mono".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub size: f64,
    pub color: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: "#00008b".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
    pub bold_color: String,
    pub code_color: String,
    pub code_background: String,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            bold_color: "#2f4f4f".to_string(),
            code_color: "#8b0000".to_string(),
            code_background: "#ffffe0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodeBlockConfig {
    pub background: String,
    pub border: String,
    /// Padding inside the background wrapper, in points
    pub inset: f64,
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        Self {
            background: "#f0f0f51e".to_string(),
            border: "#d3d3d3".to_string(),
            inset: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeparatorConfig {
    pub color: String,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            color: "#d3d3d3".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Semibold,
    Bold,
}

impl FontWeight {
    /// Name of the weight as Typst spells it.
    pub fn as_typst(self) -> &'static str {
        match self {
            FontWeight::Regular => "regular",
            FontWeight::Semibold => "semibold",
            FontWeight::Bold => "bold",
        }
    }
}

/// Visual attributes applied to a token or run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub color: String,
    pub weight: FontWeight,
}

impl TextStyle {
    fn new(color: &str, weight: FontWeight) -> Self {
        Self {
            color: color.to_string(),
            weight,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("#000000", FontWeight::Regular)
    }
}

/// Per-token-kind colors for highlighted code
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub keyword: TextStyle,
    pub type_name: TextStyle,
    pub string: TextStyle,
    pub number: TextStyle,
    pub comment: TextStyle,
    pub preprocessor: TextStyle,
    pub operator: TextStyle,
    pub plain: TextStyle,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            keyword: TextStyle::new("#0000ff", FontWeight::Bold),
            type_name: TextStyle::new("#008b8b", FontWeight::Semibold),
            string: TextStyle::new("#8b0000", FontWeight::Regular),
            number: TextStyle::new("#ff8c00", FontWeight::Regular),
            comment: TextStyle::new("#008000", FontWeight::Regular),
            preprocessor: TextStyle::new("#8b008b", FontWeight::Regular),
            operator: TextStyle::new("#a9a9a9", FontWeight::Regular),
            plain: TextStyle::new("#000000", FontWeight::Regular),
        }
    }
}

impl ThemeConfig {
    pub fn style_of(&self, kind: TokenKind) -> &TextStyle {
        match kind {
            TokenKind::Keyword => &self.keyword,
            TokenKind::TypeName => &self.type_name,
            TokenKind::StringLiteral => &self.string,
            TokenKind::NumberLiteral => &self.number,
            TokenKind::Comment => &self.comment,
            TokenKind::Preprocessor => &self.preprocessor,
            TokenKind::Operator => &self.operator,
            TokenKind::PlainText => &self.plain,
        }
    }
}

impl Config {
    /// Defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from a TOML file, or return defaults if it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::compiled_default()
            }
        }
    }

    /// Visual attributes for an inline run style.
    pub fn run_style(&self, tag: StyleTag) -> TextStyle {
        match tag {
            StyleTag::Plain => self.theme.plain.clone(),
            StyleTag::Bold => TextStyle::new(&self.inline.bold_color, FontWeight::Bold),
            StyleTag::InlineCode => TextStyle::new(&self.inline.code_color, FontWeight::Regular),
        }
    }
}
