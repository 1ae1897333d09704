//! Pre-processor configuration (spec §4.1) and builder configuration
//! (spec §4.5), kept in `kw-core` since both are consumed directly by the
//! types in this crate. `kw-config` re-exports/embeds these as sections of
//! the process-wide `RunConfig`.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

const fn default_min_header_level() -> u8 {
    1
}

const fn default_max_header_level() -> u8 {
    6
}

const fn default_list_indent_threshold() -> u32 {
    2
}

const fn default_tab_width() -> u32 {
    4
}

/// Pre-processor toggles, spec §4.1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DocumentStructureConfig {
    #[serde(default = "default_true")]
    pub detect_markdown: bool,

    #[serde(default)]
    pub detect_html: bool,

    #[serde(default = "default_true")]
    pub detect_indentation: bool,

    #[serde(default = "default_min_header_level")]
    pub min_header_level: u8,

    #[serde(default = "default_max_header_level")]
    pub max_header_level: u8,

    #[serde(default = "default_list_indent_threshold")]
    pub list_indent_threshold: u32,

    #[serde(default = "default_tab_width")]
    pub tab_width: u32,
}

impl Default for DocumentStructureConfig {
    fn default() -> Self {
        Self {
            detect_markdown: true,
            detect_html: false,
            detect_indentation: true,
            min_header_level: default_min_header_level(),
            max_header_level: default_max_header_level(),
            list_indent_threshold: default_list_indent_threshold(),
            tab_width: default_tab_width(),
        }
    }
}

const fn default_min_chars() -> usize {
    200
}

const fn default_max_chars() -> usize {
    1200
}

/// Chunk size bounds, spec §4.5. Characters are canonical; `min_tokens`/
/// `max_tokens` are advisory guards only applied when set (spec §9 open
/// question resolution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuilderConfig {
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default)]
    pub min_tokens: Option<usize>,

    #[serde(default)]
    pub max_tokens: Option<usize>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            min_tokens: None,
            max_tokens: None,
        }
    }
}

impl BuilderConfig {
    /// Validates `min_chars <= max_chars` and the token bounds' ordering,
    /// the same defensive posture `zen-config`'s section validators use.
    ///
    /// # Errors
    ///
    /// Returns a message describing the violated bound.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_chars > self.max_chars {
            return Err(format!(
                "min_chars ({}) must not exceed max_chars ({})",
                self.min_chars, self.max_chars
            ));
        }
        if let (Some(min), Some(max)) = (self.min_tokens, self.max_tokens)
            && min > max
        {
            return Err(format!(
                "min_tokens ({min}) must not exceed max_tokens ({max})"
            ));
        }
        Ok(())
    }
}
