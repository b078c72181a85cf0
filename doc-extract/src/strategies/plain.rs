use super::{StrategyError, TextExtractor};

/// UTF-8 text files (`.txt`, `.md`). Invalid sequences are replaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextStrategy;

impl TextExtractor for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["txt", "md"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, StrategyError> {
        let text = String::from_utf8_lossy(bytes);
        let text: &str = &text;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }
}
