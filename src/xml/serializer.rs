//! XML serializer

use serde_json::{Map, Number, Value};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::xml::entities::escape;

/// Serializes a JSON object into concatenated `<key>...</key>` elements.
///
/// Nested objects recurse, arrays recurse keyed by index and every other
/// value is written as text. There is no root element and no declaration.
pub fn serialize(value: &Value, config: &Config) -> Result<String> {
    let Value::Object(map) = value else {
        return Err(Error::invalid_argument(format!(
            "expected an object, found {}",
            type_name(value)
        )));
    };

    let mut output = String::new();
    write_object(map, &mut output, config);
    Ok(output)
}

fn write_object(map: &Map<String, Value>, output: &mut String, config: &Config) {
    for (name, value) in map {
        write_element(name, value, output, config);
    }
}

fn write_element(name: &str, value: &Value, output: &mut String, config: &Config) {
    output.push('<');
    output.push_str(name);
    output.push('>');

    match value {
        Value::Object(map) => write_object(map, output, config),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                write_element(&index.to_string(), item, output, config);
            }
        }
        Value::String(text) => write_text(text, output, config),
        Value::Number(n) => output.push_str(&number_text(n)),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Null => output.push_str("null"),
    }

    output.push_str("</");
    output.push_str(name);
    output.push('>');
}

fn write_text(text: &str, output: &mut String, config: &Config) {
    if config.escape_entities {
        output.push_str(&escape(text));
    } else {
        output.push_str(text);
    }
}

/// Integers as written, floats in shortest form without a trailing `.0`
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => float_text(f),
        _ => n.to_string(),
    }
}

/// Plain decimals for exponents -6 through 20, `1e+21` / `1e-7` style
/// outside that range
fn float_text(f: f64) -> String {
    let exponential = format!("{f:e}");
    let Some((mantissa, exponent)) = exponential.split_once('e') else {
        return f.to_string();
    };

    match exponent.parse::<i32>() {
        Ok(exp) if (-6..21).contains(&exp) => f.to_string(),
        Ok(exp) if exp >= 0 => format!("{mantissa}e+{exp}"),
        _ => exponential,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_xml(value: &Value) -> Result<String> {
        serialize(value, &Config::default())
    }

    #[test]
    fn test_float_exponent_range() -> Result<()> {
        let value = json!({"a": 1e21, "b": 1e-7, "c": -1.5e-9, "d": 1e20, "e": 1e-6, "f": 2.5e300});
        assert_eq!(
            to_xml(&value)?,
            "<a>1e+21</a><b>1e-7</b><c>-1.5e-9</c><d>100000000000000000000</d>\
             <e>0.000001</e><f>2.5e+300</f>"
        );
        Ok(())
    }

    #[test]
    fn test_serialize_nested() -> Result<()> {
        let value = json!({"a": 1, "b": {"c": 2}});
        assert_eq!(to_xml(&value)?, "<a>1</a><b><c>2</c></b>");
        Ok(())
    }

    #[test]
    fn test_serialize_keeps_insertion_order() -> Result<()> {
        let value = json!({"z": "1", "a": "2", "m": "3"});
        assert_eq!(to_xml(&value)?, "<z>1</z><a>2</a><m>3</m>");
        Ok(())
    }

    #[test]
    fn test_serialize_scalars() -> Result<()> {
        let value = json!({"f": 1.5, "i": 1.0, "t": true, "n": null, "s": "x"});
        assert_eq!(
            to_xml(&value)?,
            "<f>1.5</f><i>1</i><t>true</t><n>null</n><s>x</s>"
        );
        Ok(())
    }

    #[test]
    fn test_serialize_arrays_by_index() -> Result<()> {
        let value = json!({"list": ["a", {"b": 1}]});
        assert_eq!(to_xml(&value)?, "<list><0>a</0><1><b>1</b></1></list>");
        Ok(())
    }

    #[test]
    fn test_serialize_empty_object() -> Result<()> {
        assert_eq!(to_xml(&json!({}))?, "");
        assert_eq!(to_xml(&json!({"a": {}}))?, "<a></a>");
        Ok(())
    }

    #[test]
    fn test_serialize_rejects_non_objects() {
        for value in [json!(null), json!(1), json!("x"), json!([1, 2]), json!(true)] {
            let err = to_xml(&value).err();
            assert_eq!(err.map(|e| e.is_argument_error()), Some(true));
        }
    }

    #[test]
    fn test_serialize_escaping_is_opt_in() -> Result<()> {
        let value = json!({"a": "x < y & \"z\""});
        assert_eq!(to_xml(&value)?, "<a>x < y & \"z\"</a>");

        let config = Config::default().with_escape_entities(true);
        assert_eq!(
            serialize(&value, &config)?,
            "<a>x &lt; y &amp; &quot;z&quot;</a>"
        );
        Ok(())
    }
}
