//! Nested-message extraction for opaque error payloads.
//!
//! Upstream failures arrive in many shapes: plain strings, JSON response
//! bodies, I/O errors, argument-parser errors. [`Detail`] lets each shape say
//! which human-facing text it carries, and [`Cause`] erases the concrete type
//! so [`CliError`](super::CliError) variants can hold any of them.
//!
//! Text is chosen with a fixed precedence:
//!
//! 1. a string `message`
//! 2. a string `data`
//! 3. the payload itself, when it is a string
//! 4. a structured dump of the payload

use clap::error::{ContextKind, ContextValue};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

pub trait Detail: fmt::Debug + Send + Sync {
    /// Human-facing `message` carried by the payload.
    fn message(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Secondary `data` text carried by the payload.
    fn data(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// The payload as text, when it is nothing but text.
    fn text(&self) -> Option<&str> {
        None
    }

    /// Whether the payload is a control-flow signal whose output has already
    /// been shown to the user.
    fn is_handled_signal(&self) -> bool {
        false
    }

    /// Last-resort rendering. Must be deterministic.
    fn dump(&self) -> String {
        format!("{self:?}")
    }
}

/// Apply the extraction precedence to a payload.
#[must_use]
pub fn extract_message(detail: &dyn Detail) -> String {
    if let Some(message) = detail.message() {
        return message.into_owned();
    }
    if let Some(data) = detail.data() {
        return data.into_owned();
    }
    if let Some(text) = detail.text() {
        return text.to_owned();
    }
    detail.dump()
}

impl Detail for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Detail for &'static str {
    fn text(&self) -> Option<&str> {
        Some(*self)
    }
}

impl Detail for Value {
    fn message(&self) -> Option<Cow<'_, str>> {
        self.get("message").and_then(Value::as_str).map(Cow::Borrowed)
    }

    fn data(&self) -> Option<Cow<'_, str>> {
        self.get("data").and_then(Value::as_str).map(Cow::Borrowed)
    }

    fn text(&self) -> Option<&str> {
        self.as_str()
    }

    fn dump(&self) -> String {
        self.to_string()
    }
}

impl Detail for std::io::Error {
    fn message(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl Detail for serde_json::Error {
    fn message(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl Detail for anyhow::Error {
    fn message(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(format!("{self:#}")))
    }
}

impl Detail for reqwest::Error {
    fn message(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl Detail for clap::Error {
    /// The rendered error up to the blank line before clap's usage block,
    /// joined onto one line. Missing arguments are named from the context when
    /// the rendering leaves them out.
    fn message(&self) -> Option<Cow<'_, str>> {
        let rendered = self.to_string();
        let mut message = rendered
            .lines()
            .map(str::trim)
            .take_while(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if self.kind() == clap::error::ErrorKind::MissingRequiredArgument {
            let missing = match self.get(ContextKind::InvalidArg) {
                Some(ContextValue::Strings(args)) => args.join(", "),
                Some(ContextValue::String(arg)) => arg.clone(),
                _ => String::new(),
            };
            if !missing.is_empty() && !message.contains(&missing) {
                message = format!("{message} {missing}");
            }
        }

        Some(Cow::Owned(message))
    }

    fn is_handled_signal(&self) -> bool {
        matches!(
            self.kind(),
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
        )
    }
}

/// Type-erased payload attached to a [`CliError`](super::CliError).
///
/// `Display` renders the extracted message.
#[derive(Debug)]
pub struct Cause(Box<dyn Detail>);

impl Cause {
    pub fn new(detail: impl Detail + 'static) -> Self {
        Self(Box::new(detail))
    }

    #[must_use]
    pub fn message(&self) -> String {
        extract_message(self.0.as_ref())
    }

    #[must_use]
    pub fn is_handled_signal(&self) -> bool {
        self.0.is_handled_signal()
    }

    /// Structured rendering of the payload, skipping message extraction.
    #[must_use]
    pub fn dump(&self) -> String {
        self.0.dump()
    }
}

impl<T: Detail + 'static> From<T> for Cause {
    fn from(detail: T) -> Self {
        Self::new(detail)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    #[allow(dead_code)]
    struct Opaque {
        code: u16,
    }

    impl Detail for Opaque {}

    #[test]
    fn message_wins_over_data() {
        let cause = Cause::from(json!({"message": "m", "data": "d"}));
        assert_eq!(cause.message(), "m");
    }

    #[test]
    fn data_used_without_message() {
        assert_eq!(Cause::from(json!({"data": "d"})).message(), "d");
    }

    #[test]
    fn non_string_message_is_skipped() {
        let cause = Cause::from(json!({"message": 42, "data": "d"}));
        assert_eq!(cause.message(), "d");
    }

    #[test]
    fn bare_strings_are_verbatim() {
        assert_eq!(Cause::from("plain text").message(), "plain text");
        assert_eq!(Cause::from(String::from("owned")).message(), "owned");
        assert_eq!(Cause::from(json!("json string")).message(), "json string");
    }

    #[test]
    fn fields_missing_falls_back_to_dump() {
        let payload = json!({"detail": {"reason": "boom"}});
        let first = Cause::from(payload.clone()).message();
        let second = Cause::from(payload).message();
        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert_eq!(first, r#"{"detail":{"reason":"boom"}}"#);

        assert_eq!(Cause::from(json!(null)).message(), "null");
        assert_eq!(Cause::from(json!([1, 2])).message(), "[1,2]");
    }

    #[test]
    fn unknown_types_dump_debug() {
        assert_eq!(Cause::from(Opaque { code: 7 }).message(), "Opaque { code: 7 }");
    }

    #[test]
    fn io_errors_expose_message() {
        let err = std::io::Error::other("disk full");
        assert_eq!(Cause::from(err).message(), "disk full");
    }

    #[test]
    fn anyhow_chain_is_included() {
        let err = anyhow::anyhow!("root cause").context("loading tokens");
        assert_eq!(Cause::from(err).message(), "loading tokens: root cause");
    }

    #[test]
    fn plain_payloads_are_not_handled_signals() {
        assert!(!Cause::from("help").is_handled_signal());
        assert!(!Cause::from(json!({"message": "x"})).is_handled_signal());
    }
}
