//! Payload acquisition: files, stdin, inline text and admin page contexts.

use std::borrow::Cow;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::models::{DecodeError, SeriesKind};


/// Where one payload's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Inline(String),
    File(PathBuf),
    Stdin,
    /// A source that already failed to read, kept with its reason.
    Unreadable(String),
}


impl PayloadSource {
    /// Interpret a path argument, `-` meaning stdin.
    pub fn from_path_arg(arg: &str) -> Self {
        if arg == "-" {
            PayloadSource::Stdin
        } else {
            PayloadSource::File(PathBuf::from(arg))
        }
    }

    /// Read the raw payload text.
    pub fn read(&self) -> Result<String, DecodeError> {
        match self {
            PayloadSource::Inline(text) => Ok(text.clone()),
            PayloadSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                DecodeError::Unavailable {
                    reason: format!("cannot read {}: {}", path.display(), e),
                }
            }),
            PayloadSource::Stdin => read_stream(std::io::stdin()),
            PayloadSource::Unreadable(reason) => Err(DecodeError::Unavailable { reason: reason.clone() }),
        }
    }
}


fn read_stream<R: Read>(mut reader: R) -> Result<String, DecodeError> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map_err(|e| DecodeError::Unavailable {
            reason: format!("cannot read stdin: {}", e),
        })?;
    Ok(buf)
}


/// Inputs for one render pass.
///
/// An explicit source for a series wins over the page context.
#[derive(Debug, Clone, Default)]
pub struct PayloadInputs {
    pub mint: Option<PayloadSource>,
    pub sales: Option<PayloadSource>,
    pub context: Option<PathBuf>,
}


/// Raw payload text for both series, each read independently.
#[derive(Debug)]
pub struct PayloadSet {
    pub mint: Result<String, DecodeError>,
    pub sales: Result<String, DecodeError>,
}


impl PayloadSet {
    #[allow(dead_code)]
    pub fn get(&self, kind: SeriesKind) -> &Result<String, DecodeError> {
        match kind {
            SeriesKind::Mint => &self.mint,
            SeriesKind::Sales => &self.sales,
        }
    }

    /// Take one payload, dropping the other.
    pub fn take(self, kind: SeriesKind) -> Result<String, DecodeError> {
        match kind {
            SeriesKind::Mint => self.mint,
            SeriesKind::Sales => self.sales,
        }
    }
}


impl PayloadInputs {
    pub fn source(&self, kind: SeriesKind) -> Option<&PayloadSource> {
        match kind {
            SeriesKind::Mint => self.mint.as_ref(),
            SeriesKind::Sales => self.sales.as_ref(),
        }
    }

    /// Read a stdin source now and keep its text, so repeated loads
    /// see the same payload instead of an exhausted stream.
    pub fn capture_stdin(self) -> Self {
        self.capture_stdin_from(std::io::stdin())
    }

    pub(crate) fn capture_stdin_from<R: Read>(self, reader: R) -> Self {
        let mut reader = Some(reader);
        let mut capture = |source: Option<PayloadSource>| match source {
            Some(PayloadSource::Stdin) => {
                let text = reader.take().map(read_stream).unwrap_or_else(|| Ok(String::new()));
                Some(match text {
                    Ok(text) => PayloadSource::Inline(text),
                    Err(DecodeError::Unavailable { reason }) => PayloadSource::Unreadable(reason),
                    Err(err) => PayloadSource::Unreadable(err.to_string()),
                })
            }
            other => other,
        };

        let mint = capture(self.mint);
        let sales = capture(self.sales);
        PayloadInputs { mint, sales, context: self.context }
    }

    /// Read both payloads. Never fails as a whole: every problem is
    /// recorded against the series it affects.
    pub fn load(&self) -> PayloadSet {
        let context = self.context.as_deref().map(load_context);

        let resolve = |kind: SeriesKind| -> Result<String, DecodeError> {
            if let Some(source) = self.source(kind) {
                return source.read();
            }
            match &context {
                Some(Ok(value)) => payload_from_context(value, kind),
                Some(Err(reason)) => Err(DecodeError::Unavailable { reason: reason.clone() }),
                None => Err(DecodeError::Unavailable {
                    reason: format!("no {} payload given", kind),
                }),
            }
        };

        PayloadSet {
            mint: resolve(SeriesKind::Mint),
            sales: resolve(SeriesKind::Sales),
        }
    }
}


/// Load an admin page context (`{"mint_data": ..., "sales_data": ...}`).
fn load_context(path: &Path) -> Result<Value, String> {
    debug!(path = %path.display(), "loading page context");

    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read page context {}: {}", path.display(), e))?;

    serde_json::from_str(&text)
        .map_err(|e| format!("page context {} is not valid JSON: {}", path.display(), e))
}


/// Pull one payload out of a page context.
///
/// The view may hand over either the escaped text or the object itself.
fn payload_from_context(context: &Value, kind: SeriesKind) -> Result<String, DecodeError> {
    match context.get(kind.context_key()) {
        None | Some(Value::Null) => Err(DecodeError::Unavailable {
            reason: format!("page context has no {}", kind.context_key()),
        }),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Ok(other.to_string()),
    }
}


fn entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));")
            .expect("entity pattern is valid")
    })
}


/// Undo the HTML escaping a template engine applies to embedded text.
///
/// Runs as a single left-to-right pass, so `&amp;quot;` becomes `&quot;`
/// and is not unescaped twice. Unknown entities are left untouched.
pub fn unescape_html(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    entity_regex().replace_all(text, |caps: &Captures| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
        } else {
            caps.get(3).and_then(|name| named_entity(name.as_str()))
        };

        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}


fn named_entity(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_named_and_numeric() {
        assert_eq!(unescape_html("&quot;a&quot; &amp; &#x27;b&#39; &lt;c&gt;"), "\"a\" & 'b' <c>");
        assert_eq!(unescape_html("&#34;x&#x22;"), "\"x\"");
    }

    #[test]
    fn test_unescape_single_pass() {
        assert_eq!(unescape_html("&amp;quot;"), "&quot;");
    }

    #[test]
    fn test_unescape_leaves_unknown() {
        assert_eq!(unescape_html("&bogus; & &#xZZ;"), "&bogus; & &#xZZ;");
        assert!(matches!(unescape_html("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_from_path_arg() {
        assert_eq!(PayloadSource::from_path_arg("-"), PayloadSource::Stdin);
        assert_eq!(
            PayloadSource::from_path_arg("mint.json"),
            PayloadSource::File(PathBuf::from("mint.json"))
        );
    }

    #[test]
    fn test_context_string_and_object_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.json");
        std::fs::write(
            &path,
            r#"{"mint_data": "{&quot;labels&quot;: [], &quot;data&quot;: []}",
                "sales_data": {"labels": ["2024-01-01"], "data": [10]}}"#,
        )
        .unwrap();

        let inputs = PayloadInputs { context: Some(path), ..Default::default() };
        let set = inputs.load();

        assert_eq!(set.mint.as_deref().unwrap(), "{&quot;labels&quot;: [], &quot;data&quot;: []}");
        let sales: Value = serde_json::from_str(set.sales.as_deref().unwrap()).unwrap();
        assert_eq!(sales["data"][0], 10);
    }

    #[test]
    fn test_explicit_source_overrides_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.json");
        std::fs::write(&path, r#"{"mint_data": "from-context"}"#).unwrap();

        let inputs = PayloadInputs {
            mint: Some(PayloadSource::Inline("inline".into())),
            sales: None,
            context: Some(path),
        };
        let set = inputs.load();

        assert_eq!(set.mint.as_deref().unwrap(), "inline");
        assert!(matches!(set.sales, Err(DecodeError::Unavailable { .. })));
    }

    #[test]
    fn test_missing_file_is_per_series() {
        let inputs = PayloadInputs {
            mint: Some(PayloadSource::File(PathBuf::from("/nonexistent/mint.json"))),
            sales: Some(PayloadSource::Inline("{}".into())),
            context: None,
        };
        let set = inputs.load();

        assert!(matches!(set.get(SeriesKind::Mint), Err(DecodeError::Unavailable { .. })));
        assert_eq!(set.get(SeriesKind::Sales).as_deref().unwrap(), "{}");
    }

    #[test]
    fn test_captured_stdin_survives_repeated_loads() {
        let inputs = PayloadInputs {
            mint: Some(PayloadSource::Stdin),
            sales: Some(PayloadSource::Inline("{}".into())),
            context: None,
        }
        .capture_stdin_from(std::io::Cursor::new(r#"{"labels": ["a"], "data": [1]}"#));

        assert_eq!(inputs.mint, Some(PayloadSource::Inline(r#"{"labels": ["a"], "data": [1]}"#.into())));
        let first = inputs.load();
        let second = inputs.load();
        assert_eq!(first.mint.as_deref().unwrap(), second.mint.as_deref().unwrap());
        assert_eq!(second.sales.as_deref().unwrap(), "{}");
    }

    #[test]
    fn test_unreadable_source_keeps_reason() {
        let source = PayloadSource::Unreadable("cannot read stdin: broken pipe".into());
        match source.read() {
            Err(DecodeError::Unavailable { reason }) => assert!(reason.contains("broken pipe")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_context_fails_both() {
        let inputs = PayloadInputs {
            context: Some(PathBuf::from("/nonexistent/context.json")),
            ..Default::default()
        };
        let set = inputs.load();
        assert!(set.mint.is_err());
        assert!(set.sales.is_err());
    }
}
