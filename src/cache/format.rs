//! On-disk payload formats
//!
//! A cache directory stores every entry in one format, picked when the cache
//! is built. `Json` holds any serde value; `Text` holds a bare string under a
//! chosen file extension.

use super::finite::has_non_finite;
use super::CacheError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Extension used by `CacheFormat::text()`
const DEFAULT_TEXT_EXTENSION: &str = "txt";

/// How entries are encoded on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheFormat {
    /// Compact UTF-8 JSON, stored as `<key>.json`
    #[default]
    Json,
    /// The result string written verbatim, stored as `<key>.<extension>`
    Text {
        #[serde(default = "default_text_extension")]
        extension: String,
    },
}

fn default_text_extension() -> String {
    DEFAULT_TEXT_EXTENSION.to_string()
}

impl CacheFormat {
    /// Raw text stored with the `txt` extension
    pub fn text() -> Self {
        Self::Text {
            extension: default_text_extension(),
        }
    }

    /// Raw text stored with a custom extension (e.g. `html`)
    pub fn text_with_extension(extension: impl Into<String>) -> Self {
        Self::Text {
            extension: extension.into(),
        }
    }

    /// File extension for entries in this format, without the dot
    pub fn extension(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::Text { extension } => extension,
        }
    }

    /// Checks that entries in this format get a usable file name
    ///
    /// The extension must be non-empty and must not contain a path separator.
    pub fn validate(&self) -> Result<(), CacheError> {
        let extension = self.extension();
        if extension.is_empty() || extension.contains(['/', '\\', '\0']) {
            return Err(CacheError::InvalidFormat(extension.to_string()));
        }
        Ok(())
    }

    /// Encodes a computed result into the file contents.
    ///
    /// `path` only labels errors; nothing is written here.
    pub fn encode<R: Serialize>(&self, value: &R, path: &Path) -> Result<String, CacheError> {
        let encode_err = |source| CacheError::Encode {
            path: path.to_path_buf(),
            source,
        };
        match self {
            Self::Json if has_non_finite(value) => Err(CacheError::NonFinite {
                path: path.to_path_buf(),
            }),
            Self::Json => serde_json::to_string(value).map_err(encode_err),
            Self::Text { .. } => match serde_json::to_value(value).map_err(encode_err)? {
                Value::String(text) => Ok(text),
                _ => Err(CacheError::NotText {
                    path: path.to_path_buf(),
                }),
            },
        }
    }

    /// Decodes stored file contents into the return type
    pub fn decode<R: DeserializeOwned>(
        &self,
        contents: String,
        path: &Path,
    ) -> Result<R, CacheError> {
        let decoded = match self {
            Self::Json => serde_json::from_str(&contents),
            Self::Text { .. } => serde_json::from_value(Value::String(contents)),
        };
        decoded.map_err(|source| CacheError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for CacheFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for CacheFormat {
    type Err = CacheError;

    /// `"json"` selects JSON; any other name selects raw text under that extension
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s {
            "json" => Self::Json,
            other => Self::text_with_extension(other),
        };
        format.validate()?;
        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn path() -> &'static Path {
        Path::new("entry")
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Forecast {
        beach: String,
        temperatures: Vec<f64>,
        advisory: Option<String>,
    }

    #[test]
    fn test_default_is_json() {
        assert_eq!(CacheFormat::default(), CacheFormat::Json);
        assert_eq!(CacheFormat::default().extension(), "json");
    }

    #[test]
    fn test_json_encoding_is_compact() {
        let mut value = BTreeMap::new();
        value.insert("a", vec![1, 2]);

        let encoded = CacheFormat::Json.encode(&value, path()).unwrap();

        assert_eq!(encoded, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_json_roundtrip_nested_record() {
        let original = Forecast {
            beach: "English Bay".to_string(),
            temperatures: vec![18.5, 21.0],
            advisory: None,
        };

        let encoded = CacheFormat::Json.encode(&original, path()).unwrap();
        let decoded: Forecast = CacheFormat::Json.decode(encoded, path()).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_json_decode_failure_names_path() {
        let err = CacheFormat::Json
            .decode::<i64>("{not json".to_string(), Path::new("c/3.json"))
            .unwrap_err();

        match err {
            CacheError::Decode { path, .. } => assert_eq!(path, Path::new("c/3.json")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_json_rejects_non_finite_floats() {
        let err = CacheFormat::Json.encode(&f64::NAN, path()).unwrap_err();
        assert!(matches!(err, CacheError::NonFinite { .. }));

        let nested = CacheFormat::Json.encode(&vec![Some(1.0), Some(f64::INFINITY)], path());
        assert!(matches!(nested, Err(CacheError::NonFinite { .. })));
    }

    #[test]
    fn test_validate_rejects_unusable_extensions() {
        assert!(CacheFormat::Json.validate().is_ok());
        assert!(CacheFormat::text_with_extension("html").validate().is_ok());
        assert!(CacheFormat::text_with_extension("").validate().is_err());
        assert!(CacheFormat::text_with_extension("a/b").validate().is_err());
        assert!(CacheFormat::text_with_extension("a\\b").validate().is_err());

        let from_config: CacheFormat =
            serde_json::from_str(r#"{"text":{"extension":""}}"#).unwrap();
        assert!(matches!(
            from_config.validate(),
            Err(CacheError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_text_encodes_string_verbatim() {
        let encoded = CacheFormat::text()
            .encode(&"<p>\"quoted\"</p>\n", path())
            .unwrap();

        assert_eq!(encoded, "<p>\"quoted\"</p>\n");
    }

    #[test]
    fn test_text_rejects_non_string() {
        let err = CacheFormat::text().encode(&6, path()).unwrap_err();

        assert!(matches!(err, CacheError::NotText { .. }));
    }

    #[test]
    fn test_text_decodes_contents_verbatim() {
        let decoded: String = CacheFormat::text()
            .decode("  line one\nline two".to_string(), path())
            .unwrap();

        assert_eq!(decoded, "  line one\nline two");
    }

    #[test]
    fn test_text_decode_into_number_fails() {
        let result = CacheFormat::text().decode::<i64>("6".to_string(), path());

        assert!(matches!(result, Err(CacheError::Decode { .. })));
    }

    #[test]
    fn test_from_str_follows_format_names() {
        assert_eq!("json".parse::<CacheFormat>().unwrap(), CacheFormat::Json);
        assert_eq!("txt".parse::<CacheFormat>().unwrap(), CacheFormat::text());
        assert_eq!(
            "html".parse::<CacheFormat>().unwrap(),
            CacheFormat::text_with_extension("html")
        );
        assert!(matches!(
            "".parse::<CacheFormat>(),
            Err(CacheError::InvalidFormat(_))
        ));
        assert!(matches!(
            "tar/gz".parse::<CacheFormat>(),
            Err(CacheError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_display_prints_extension() {
        assert_eq!(CacheFormat::Json.to_string(), "json");
        assert_eq!(CacheFormat::text_with_extension("md").to_string(), "md");
    }

    #[test]
    fn test_serde_representation() {
        let json: CacheFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(json, CacheFormat::Json);

        let text: CacheFormat = serde_json::from_str(r#"{"text":{}}"#).unwrap();
        assert_eq!(text, CacheFormat::text());

        let html: CacheFormat =
            serde_json::from_str(r#"{"text":{"extension":"html"}}"#).unwrap();
        assert_eq!(html.extension(), "html");
    }
}
