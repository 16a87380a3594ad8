//! Colours as `#rrggbb` or `#rrggbbaa` hex strings.

use engine::graphics::Color;
use serde::{Deserialize, Deserializer, Serializer, de::Error};

pub fn serialize<S>(value: &Color, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_hex(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_hex(&text).ok_or_else(|| D::Error::custom(format!("invalid colour {text:?}")))
}

pub fn to_hex(color: Color) -> String {
    if color[3] == u8::MAX {
        format!("#{}", hex::encode(&color[..3]))
    } else {
        format!("#{}", hex::encode(color))
    }
}

pub fn parse_hex(text: &str) -> Option<Color> {
    let digits = text.trim().strip_prefix('#')?;
    let bytes = hex::decode(digits).ok()?;
    match bytes.as_slice() {
        &[r, g, b] => Some([r, g, b, u8::MAX]),
        &[r, g, b, a] => Some([r, g, b, a]),
        _ => None,
    }
}
