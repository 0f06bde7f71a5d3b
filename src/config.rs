//! # Engine Options
//!
//! Settings that apply to a whole parse: the encoding tokens start from and
//! how deeply tokens may nest. Options round-trip through serde, so they can
//! be kept next to a grammar in JSON or YAML:
//!
//! ```rust
//! use strata::EngineOptions;
//! let options = EngineOptions::from_yaml("max_depth: 64\nencoding:\n  byte_order: little_endian\n").unwrap();
//! assert_eq!(options.max_depth, 64);
//! assert!(!options.encoding.is_signed());
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{EngineError, Result};
use crate::encoding::Encoding;
use crate::token::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Encoding used by tokens that do not set their own.
    pub encoding: Encoding,
    /// Deepest allowed nesting of token invocations.
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EngineError::Config {
            message: "options are not valid JSON".to_string(),
            source: Some(Box::new(e)),
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| EngineError::Config {
            message: "options are not valid YAML".to_string(),
            source: Some(Box::new(e)),
        })
    }

    pub fn with_encoding(self, encoding: Encoding) -> Self {
        Self { encoding, ..self }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;
    use crate::encoding::{ByteOrder, Charset, Sign};

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(EngineOptions::from_json("{}").unwrap(), EngineOptions::default());
        assert_eq!(EngineOptions::default().max_depth, 1000);
    }

    #[test]
    fn json_overrides_individual_fields() {
        let options = EngineOptions::from_json(r#"{"encoding": {"sign": "signed", "charset": "utf8"}}"#).unwrap();
        assert_eq!(options.encoding.sign, Sign::Signed);
        assert_eq!(options.encoding.charset, Charset::Utf8);
        assert_eq!(options.encoding.byte_order, ByteOrder::BigEndian);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn malformed_input_is_a_configuration_error() {
        let err = EngineOptions::from_json(r#"{"max_depth": "deep"}"#).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Configuration);
        assert!(std::error::Error::source(&err).is_some());

        let err = EngineOptions::from_yaml("unknown: 1").unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
    }

    #[test]
    fn options_round_trip_through_yaml() {
        let options = EngineOptions::default()
            .with_encoding(Encoding::little_endian())
            .with_max_depth(12);
        let text = serde_yaml::to_string(&options).unwrap();
        assert_eq!(EngineOptions::from_yaml(&text).unwrap(), options);
    }
}
