//! Response renderers: small boundary conveniences over the write surface.

use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::response::ResponseWriter;

const PLAIN_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug)]
pub enum RenderError {
    Serialize(serde_json::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "serialization failed: {err}"),
        }
    }
}

impl Error for RenderError {}

/// One way of writing a response body (and its content type).
pub trait Render {
    fn write_content_type(&self, writer: &mut ResponseWriter);
    fn render(self, writer: &mut ResponseWriter) -> Result<(), RenderError>;
}

fn content_type_if_absent(writer: &mut ResponseWriter, value: &str) {
    if writer.header("Content-Type").is_none() {
        writer.set_header("Content-Type", value);
    }
}

/// 1xx, 204 and 304 responses must not carry a body.
pub(crate) fn body_allowed_for_status(status: u16) -> bool {
    !matches!(status, 100..=199 | 204 | 304)
}

pub struct Text<'a>(pub &'a str);

impl Render for Text<'_> {
    fn write_content_type(&self, writer: &mut ResponseWriter) {
        content_type_if_absent(writer, PLAIN_CONTENT_TYPE);
    }

    fn render(self, writer: &mut ResponseWriter) -> Result<(), RenderError> {
        self.write_content_type(writer);
        writer.write_string(self.0);
        Ok(())
    }
}

pub struct Json<'a, T: Serialize>(pub &'a T);

impl<T: Serialize> Render for Json<'_, T> {
    fn write_content_type(&self, writer: &mut ResponseWriter) {
        content_type_if_absent(writer, JSON_CONTENT_TYPE);
    }

    fn render(self, writer: &mut ResponseWriter) -> Result<(), RenderError> {
        let encoded = serde_json::to_vec(self.0).map_err(RenderError::Serialize)?;
        self.write_content_type(writer);
        writer.write(&encoded);
        Ok(())
    }
}

pub struct Data<'a> {
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl Render for Data<'_> {
    fn write_content_type(&self, writer: &mut ResponseWriter) {
        content_type_if_absent(writer, self.content_type);
    }

    fn render(self, writer: &mut ResponseWriter) -> Result<(), RenderError> {
        writer.set_header("Content-Type", self.content_type);
        writer.write(self.data);
        Ok(())
    }
}

pub struct Redirect<'a> {
    pub location: &'a str,
}

impl Render for Redirect<'_> {
    fn write_content_type(&self, _writer: &mut ResponseWriter) {}

    fn render(self, writer: &mut ResponseWriter) -> Result<(), RenderError> {
        writer.set_header("Location", self.location);
        writer.write_header_now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_forbidden_statuses() {
        assert!(!body_allowed_for_status(100));
        assert!(!body_allowed_for_status(204));
        assert!(!body_allowed_for_status(304));
        assert!(body_allowed_for_status(200));
        assert!(body_allowed_for_status(404));
    }

    #[test]
    fn json_sets_content_type_and_body() {
        let mut writer = ResponseWriter::new();
        Json(&serde_json::json!({"ok": true}))
            .render(&mut writer)
            .unwrap();
        assert_eq!(writer.header("Content-Type"), Some(JSON_CONTENT_TYPE));
        let response = writer.take_response();
        assert_eq!(response.body, br#"{"ok":true}"#);
    }

    #[test]
    fn explicit_content_type_wins() {
        let mut writer = ResponseWriter::new();
        writer.set_header("Content-Type", "application/problem+json");
        Text("x").render(&mut writer).unwrap();
        assert_eq!(
            writer.header("Content-Type"),
            Some("application/problem+json")
        );
    }
}
