//! Chinese block matching and line filtering.
//!
//! A block is a run of CJK-range characters, optionally extended through
//! word characters, whitespace and connector symbols as long as another
//! CJK-range run follows. Lines inside a block are then kept only when they
//! carry at least one core ideograph.

use crate::config::DEFAULT_CONNECTORS;
use crate::error::Result;
use regex::Regex;

/// Core ideographs, CJK symbols and punctuation, halfwidth and fullwidth forms.
const CJK_CLASS: &str = r"[\x{4E00}-\x{9FFF}\x{3000}-\x{303F}\x{FF00}-\x{FFEF}]";

#[derive(Debug, Clone)]
pub struct ChinesePattern {
    regex: Regex,
}

impl ChinesePattern {
    pub fn new() -> Result<Self> {
        Self::with_connectors(DEFAULT_CONNECTORS)
    }

    /// Builds the block pattern with a custom connector set. Every character
    /// of `connectors` is matched literally.
    pub fn with_connectors(connectors: &str) -> Result<Self> {
        let escaped: String = connectors
            .chars()
            .map(|c| regex::escape(c.encode_utf8(&mut [0u8; 4])))
            .collect();

        let source = format!(
            r"{cjk}+(?:[\w\s{escaped}]*{cjk}+)*",
            cjk = CJK_CLASS,
            escaped = escaped
        );

        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    /// All non-overlapping blocks, left to right.
    pub fn find_blocks<'t>(&self, content: &'t str) -> Vec<&'t str> {
        self.regex.find_iter(content).map(|m| m.as_str()).collect()
    }

    /// Lines worth keeping from `content`. Empty when no block matched or no
    /// block line carries an ideograph.
    pub fn extract_lines(&self, content: &str) -> Vec<String> {
        filter_lines(&self.find_blocks(content))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Splits each block into lines and keeps the trimmed lines that contain a
/// core ideograph, in source order. `\n`, `\r\n` and a lone `\r` all break
/// lines; the empty piece inside `\r\n` has no ideograph and drops out.
pub fn filter_lines<S: AsRef<str>>(blocks: &[S]) -> Vec<String> {
    blocks
        .iter()
        .flat_map(|block| block.as_ref().trim().split(['\n', '\r']))
        .filter(|line| contains_ideograph(line))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_core_ideograph(c: char) -> bool {
    matches!(c as u32, 0x4E00..=0x9FFF)
}

pub fn contains_ideograph(text: &str) -> bool {
    text.chars().any(is_core_ideograph)
}
