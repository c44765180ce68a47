//! TwiML rendering for webhook replies.
//!
//! The SMS provider expects every webhook response to be a TwiML document
//! with content-type text/xml, even when there is nothing to say.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// A webhook reply body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Twiml {
    /// `<Response></Response>`: acknowledge without sending a message.
    Empty,
    /// `<Response><Message>..</Message></Response>`.
    Message(String),
}

impl Twiml {
    pub fn message(text: impl Into<String>) -> Self {
        Twiml::Message(text.into())
    }

    /// Render the XML document. Message text is escaped.
    pub fn render(&self) -> String {
        match self {
            Twiml::Empty => {
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>".to_string()
            }
            Twiml::Message(text) => format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
                escape_xml(text)
            ),
        }
    }

    /// Render as a response with the given status code.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (
            status,
            [(header::CONTENT_TYPE, "text/xml")],
            self.render(),
        )
            .into_response()
    }
}

impl IntoResponse for Twiml {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_message() {
        let twiml = Twiml::message("Registration confirmed!");
        assert_eq!(
            twiml.render(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>Registration confirmed!</Message></Response>"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            Twiml::Empty.render(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>"
        );
    }

    #[test]
    fn test_render_escapes_xml() {
        let twiml = Twiml::message("Tom & Jerry <3 \"quotes\"");
        let rendered = twiml.render();
        assert!(rendered.contains("Tom &amp; Jerry &lt;3 &quot;quotes&quot;"));
        assert!(!rendered.contains("Tom & Jerry"));
    }

    #[test]
    fn test_render_preserves_newlines() {
        let twiml = Twiml::message("line one\n\nline two");
        assert!(twiml.render().contains("line one\n\nline two"));
    }

    #[test]
    fn test_into_response_is_xml() {
        let response = Twiml::message("hi").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/xml"
        );
    }

    #[test]
    fn test_into_response_with_status() {
        let response = Twiml::message("An error occurred. Please try again later.")
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
