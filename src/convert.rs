//! Conversion between XML and JSON text

use tracing::instrument;

use crate::config::Config;
use crate::error::Result;
use crate::xml::{serialize, Parser};

/// Convert XML to compact JSON
pub fn xml_to_json(text: &str) -> Result<String> {
    xml_to_json_with_config(text, Config::default())
}

/// Convert XML to compact JSON with custom options
#[instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn xml_to_json_with_config(text: &str, config: Config) -> Result<String> {
    let parsed = Parser::new(config).parse(text)?;
    Ok(serde_json::to_string(&parsed)?)
}

/// Convert XML to indented JSON
pub fn xml_to_json_pretty(text: &str) -> Result<String> {
    let parsed = Parser::default().parse(text)?;
    Ok(serde_json::to_string_pretty(&parsed)?)
}

/// Convert JSON to XML. The JSON root must be an object.
pub fn json_to_xml(text: &str) -> Result<String> {
    json_to_xml_with_config(text, Config::default())
}

/// Convert JSON to XML with custom options
#[instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn json_to_xml_with_config(text: &str, config: Config) -> Result<String> {
    config.check_size(text.len())?;
    let value: serde_json::Value = serde_json::from_str(text)?;
    serialize(&value, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_xml_to_json() -> Result<()> {
        assert_eq!(
            xml_to_json("<a>1</a>")?,
            r#"{"a":{"value":"1","attributes":{}}}"#
        );
        Ok(())
    }

    #[test]
    fn test_xml_to_json_raw() -> Result<()> {
        let config = Config::default().with_parse_children(false);
        assert_eq!(
            xml_to_json_with_config("<a><b>1</b></a>", config)?,
            r#"[{"a":"<b>1</b>"}]"#
        );
        Ok(())
    }

    #[test]
    fn test_json_to_xml() -> Result<()> {
        assert_eq!(
            json_to_xml(r#"{"a": 1, "b": {"c": 2}}"#)?,
            "<a>1</a><b><c>2</c></b>"
        );
        Ok(())
    }

    #[test]
    fn test_json_to_xml_invalid_json() {
        let err = json_to_xml("{not json").err();
        assert!(matches!(
            err.as_ref().map(|e| e.kind()),
            Some(ErrorKind::Json { .. })
        ));
    }

    #[test]
    fn test_json_to_xml_requires_object() {
        let err = json_to_xml("[1, 2]").err();
        assert_eq!(err.map(|e| e.is_argument_error()), Some(true));
    }
}
