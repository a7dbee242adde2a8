//! Flat XML wire format.
//!
//! Every payload is a single `<xml>` root whose children are scalar fields.
//! Integers are written as plain text and strings as CDATA, which is the form
//! the gateway emits and accepts.

use crate::core::{AppError, ParamSet, ParamValue, Result};
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Root element name
pub const ROOT: &str = "xml";

/// Content type of wire payloads
pub const CONTENT_TYPE: &str = "text/xml";

fn encode_err(e: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("XML encode error: {}", e))
}

fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Serialize a parameter set into wire XML
pub fn to_xml(params: &ParamSet) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Start(BytesStart::new(ROOT)))
        .map_err(encode_err)?;

    for (key, value) in params {
        if !is_valid_field_name(key) {
            return Err(AppError::validation(format!(
                "Field name '{}' cannot be encoded as XML",
                key
            )));
        }

        writer
            .write_event(Event::Start(BytesStart::new(key.as_str())))
            .map_err(encode_err)?;

        let body = match value {
            ParamValue::Int(n) => Event::Text(BytesText::from_escaped(n.to_string())),
            // CDATA cannot hold its own terminator
            ParamValue::Text(s) if s.contains("]]>") => Event::Text(BytesText::new(s)),
            ParamValue::Text(s) => Event::CData(BytesCData::new(s.as_str())),
        };
        writer.write_event(body).map_err(encode_err)?;

        writer
            .write_event(Event::End(BytesEnd::new(key.as_str())))
            .map_err(encode_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT)))
        .map_err(encode_err)?;

    String::from_utf8(writer.into_inner()).map_err(encode_err)
}

/// Field currently being read
struct Field {
    name: String,
    /// Text and CDATA segments in document order; `true` marks CDATA
    segments: Vec<(bool, String)>,
}

impl Field {
    fn new(name: String) -> Self {
        Self {
            name,
            segments: Vec::new(),
        }
    }

    fn into_value(self) -> ParamValue {
        let has_cdata = self.segments.iter().any(|(cdata, _)| *cdata);

        if has_cdata {
            // Indentation around a CDATA section is not part of the value
            let content: String = self
                .segments
                .into_iter()
                .filter(|(cdata, text)| *cdata || !text.trim().is_empty())
                .map(|(_, text)| text)
                .collect();
            return ParamValue::Text(content);
        }

        let content: String = self.segments.into_iter().map(|(_, text)| text).collect();
        if let Ok(n) = content.parse::<i64>() {
            if n.to_string() == content {
                return ParamValue::Int(n);
            }
        }
        ParamValue::Text(content)
    }
}

/// Deserialize wire XML into a parameter set.
///
/// Unknown fields are kept. Nested elements are rejected.
pub fn from_xml(raw: &[u8]) -> Result<ParamSet> {
    let mut reader = Reader::from_reader(raw);

    let mut params = ParamSet::new();
    let mut saw_root = false;
    let mut depth = 0usize;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match depth {
                    0 if saw_root => {
                        return Err(AppError::decode("Multiple root elements"));
                    }
                    0 => saw_root = true,
                    1 => field = Some(Field::new(name)),
                    _ => {
                        return Err(AppError::decode(format!(
                            "Nested element '{}' in flat payload",
                            name
                        )));
                    }
                }
                depth += 1;
            }

            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match depth {
                    0 if saw_root => return Err(AppError::decode("Multiple root elements")),
                    0 => saw_root = true,
                    1 => {
                        params.insert(name, "");
                    }
                    _ => {
                        return Err(AppError::decode(format!(
                            "Nested element '{}' in flat payload",
                            name
                        )));
                    }
                }
            }

            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some(mut f) = field.take() {
                        let name = std::mem::take(&mut f.name);
                        params.insert(name, f.into_value());
                    }
                }
            }

            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| AppError::decode(format!("XML text error: {}", e)))?;
                match field.as_mut() {
                    Some(f) => f.segments.push((false, text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(AppError::decode("Text outside of a field element"));
                    }
                }
            }

            Ok(Event::CData(e)) => {
                let text = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| AppError::decode(format!("CDATA is not UTF-8: {}", e)))?;
                match field.as_mut() {
                    Some(f) => f.segments.push((true, text)),
                    None => {
                        return Err(AppError::decode("CDATA outside of a field element"));
                    }
                }
            }

            Ok(Event::Eof) => break,

            Ok(_) => {}

            Err(e) => {
                return Err(AppError::decode(format!("XML parse error: {}", e)));
            }
        }
    }

    if !saw_root {
        return Err(AppError::decode("Empty document"));
    }
    if depth != 0 {
        return Err(AppError::decode("Unexpected end of document"));
    }

    Ok(params)
}
