//! One request per submission, normalized into a [`ResponseEnvelope`].

use crate::config::BackendConfig;
use crate::envelope::{EnvelopeContent, ResponseEnvelope, SolveResult};
use crate::form::{SolveRequest, SubmitMode};
use crate::transport::Transport;
use log::{debug, info, warn};
use serde_json::Value;

/// Message shown when a body could not be parsed as JSON.
///
/// Known statuses get a fixed message; anything else falls back to the raw body text, and
/// to the bare status when the body is empty too.
pub fn status_message(status: u16, raw_body: &str) -> String {
    match status {
        429 => "Too many requests... slow down!".to_string(),
        400 => "Bad input data".to_string(),
        500 => "Something went wrong".to_string(),
        _ if !raw_body.trim().is_empty() => raw_body.to_string(),
        _ => format!("HTTP {status}"),
    }
}

pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Interprets a textual body for `mode`.
///
/// A JSON object with an `error` string is always an error. A successful solve yields the
/// result record. Everything else goes through [`status_message`].
pub fn interpret_text(mode: SubmitMode, status: u16, body: &str) -> EnvelopeContent {
    let parsed = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!("unparsable {} response body (status {status})", mode.path());
            return EnvelopeContent::error(status_message(status, body));
        }
    };

    if let Some(Value::String(error)) = parsed.get("error") {
        return EnvelopeContent::error(error.clone());
    }

    if is_success(status) && !mode.is_graph() {
        match serde_json::from_value::<SolveResult>(Value::Object(parsed)) {
            Ok(result) => return EnvelopeContent::Result(result),
            Err(err) => warn!("solve result did not match the expected shape: {err}"),
        }
    }

    EnvelopeContent::error(status_message(status, body))
}

pub struct Dispatcher<T> {
    transport: T,
    config: BackendConfig,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, config: BackendConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Sends `request` to the route for `mode` and waits for the reply. Never fails: every
    /// outcome, including a dropped connection, comes back as an envelope.
    pub async fn submit(&self, request: &SolveRequest, mode: SubmitMode) -> ResponseEnvelope {
        let is_graph = mode.is_graph();
        let url = self.config.endpoint(mode);

        let body = match serde_json::to_string(request) {
            Ok(body) => body,
            Err(err) => {
                warn!("failed to encode solve request: {err}");
                return ResponseEnvelope::network_failure(
                    is_graph,
                    format!("Failed to encode request: {err}"),
                );
            }
        };

        debug!("posting {} request to {url}", mode.path());
        let response = match self.transport.post_json(&url, body).await {
            Ok(response) => response,
            Err(err) => {
                warn!("request to {url} failed: {err}");
                return ResponseEnvelope::network_failure(is_graph, err.to_string());
            }
        };

        let status = self.transport.status(&response);
        let ok = is_success(status);

        let content = if is_graph && ok {
            match self.transport.read_image(response).await {
                Ok(image) => EnvelopeContent::Image { image },
                Err(err) => {
                    warn!("graph image could not be read: {err}");
                    return ResponseEnvelope {
                        is_graph,
                        status,
                        ok: false,
                        content: EnvelopeContent::error(err.to_string()),
                    };
                }
            }
        } else {
            match self.transport.read_text(response).await {
                Ok(text) => interpret_text(mode, status, &text),
                Err(err) => {
                    warn!("response body could not be read: {err}");
                    EnvelopeContent::error(status_message(status, ""))
                }
            }
        };

        info!("{} finished with status {status}", mode.path());
        ResponseEnvelope {
            is_graph,
            status,
            ok,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ImageRef;
    use crate::transport::TransportError;
    use futures::executor::block_on;
    use serde_json::{json, Map};
    use std::cell::RefCell;

    enum Scripted {
        Offline(&'static str),
        Reply { status: u16, body: &'static str },
        BrokenImage { status: u16 },
    }

    struct ScriptedResponse {
        status: u16,
        body: &'static str,
        broken_image: bool,
    }

    /// Replays one canned outcome and records what was posted.
    struct ScriptedTransport {
        script: Scripted,
        posted: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedTransport {
        fn new(script: Scripted) -> Self {
            Self {
                script,
                posted: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        type Response = ScriptedResponse;

        async fn post_json(
            &self,
            url: &str,
            body: String,
        ) -> Result<ScriptedResponse, TransportError> {
            self.posted.borrow_mut().push((url.to_string(), body));
            match self.script {
                Scripted::Offline(message) => Err(TransportError::Network(message.to_string())),
                Scripted::Reply { status, body } => Ok(ScriptedResponse {
                    status,
                    body,
                    broken_image: false,
                }),
                Scripted::BrokenImage { status } => Ok(ScriptedResponse {
                    status,
                    body: "",
                    broken_image: true,
                }),
            }
        }

        fn status(&self, response: &ScriptedResponse) -> u16 {
            response.status
        }

        async fn read_text(&self, response: ScriptedResponse) -> Result<String, TransportError> {
            Ok(response.body.to_string())
        }

        async fn read_image(&self, response: ScriptedResponse) -> Result<ImageRef, TransportError> {
            if response.broken_image {
                Err(TransportError::Image("blob unavailable".to_string()))
            } else {
                Ok(ImageRef(format!("blob:graph/{}", response.body)))
            }
        }
    }

    fn request() -> SolveRequest {
        SolveRequest {
            equation: "x + 1 = 2".to_string(),
            domain: None,
            solve_for: Some("x".to_string()),
            functions: Vec::new(),
            constants: Map::new(),
        }
    }

    fn run(script: Scripted, mode: SubmitMode) -> (ResponseEnvelope, Vec<(String, String)>) {
        let transport = ScriptedTransport::new(script);
        let dispatcher = Dispatcher::new(
            transport,
            BackendConfig::new("http://backend.test").expect("config"),
        );
        let envelope = block_on(dispatcher.submit(&request(), mode));
        let posted = dispatcher.transport.posted.take();
        (envelope, posted)
    }

    #[test]
    fn status_table_maps_known_codes() {
        assert_eq!(status_message(429, "<html>"), "Too many requests... slow down!");
        assert_eq!(status_message(400, "<html>"), "Bad input data");
        assert_eq!(status_message(500, "<html>"), "Something went wrong");
        assert_eq!(status_message(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(status_message(503, ""), "HTTP 503");
    }

    #[test]
    fn submit_posts_json_body_to_mode_endpoint() {
        let (_, posted) = run(
            Scripted::Reply {
                status: 200,
                body: "{}",
            },
            SubmitMode::Solve,
        );
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, "http://backend.test/solve");
        let body: Value = serde_json::from_str(&posted[0].1).expect("json body");
        assert_eq!(body["equation"], json!("x + 1 = 2"));
        assert_eq!(body["solve_for"], json!("x"));
        assert_eq!(body["domain"], Value::Null);

        let (_, posted) = run(
            Scripted::Reply {
                status: 200,
                body: "png",
            },
            SubmitMode::Graph,
        );
        assert_eq!(posted[0].0, "http://backend.test/graph");
    }

    #[test]
    fn network_failure_yields_status_zero() {
        let (envelope, _) = run(Scripted::Offline("Failed to fetch"), SubmitMode::Solve);
        assert_eq!(envelope.status, 0);
        assert!(!envelope.ok);
        assert_eq!(envelope.content.error_message(), Some("Failed to fetch"));
    }

    #[test]
    fn unparsable_bodies_use_status_table() {
        for (status, expected) in [
            (429, "Too many requests... slow down!"),
            (400, "Bad input data"),
            (500, "Something went wrong"),
        ] {
            let (envelope, _) = run(
                Scripted::Reply {
                    status,
                    body: "<!doctype html>",
                },
                SubmitMode::Solve,
            );
            assert_eq!(envelope.status, status);
            assert!(!envelope.ok);
            assert_eq!(envelope.content.error_message(), Some(expected));
        }
    }

    #[test]
    fn structured_error_body_is_surfaced_verbatim() {
        let (envelope, _) = run(
            Scripted::Reply {
                status: 500,
                body: r#"{"error": "division by zero"}"#,
            },
            SubmitMode::Solve,
        );
        assert_eq!(envelope.content.error_message(), Some("division by zero"));
    }

    #[test]
    fn successful_solve_yields_result_record() {
        let (envelope, _) = run(
            Scripted::Reply {
                status: 200,
                body: r#"{"equation": "x + 1 = 2", "simplified_equation": "x = 1", "derivative": "1"}"#,
            },
            SubmitMode::Solve,
        );
        assert!(envelope.ok);
        assert!(!envelope.is_graph);
        match envelope.content {
            EnvelopeContent::Result(result) => {
                assert_eq!(result.simplified_equation.as_deref(), Some("x = 1"));
                assert_eq!(result.derivative.as_deref(), Some("1"));
                assert_eq!(result.factored, None);
            }
            other => panic!("expected result, got {other:?}"),
        }
    }

    #[test]
    fn successful_solve_keeps_sections_when_one_field_is_not_text() {
        let content = interpret_text(
            SubmitMode::Solve,
            200,
            r#"{"equation":"x^2=4","simplified_equation":"x^2=4","derivative":"2x","max":4}"#,
        );
        let result = match content {
            EnvelopeContent::Result(result) => result,
            other => panic!("expected result, got {other:?}"),
        };
        assert_eq!(result.derivative.as_deref(), Some("2x"));
        assert_eq!(result.max.as_deref(), Some("4"));

        let envelope = ResponseEnvelope {
            is_graph: false,
            status: 200,
            ok: true,
            content: EnvelopeContent::Result(result),
        };
        let view = crate::view::render(Some(&envelope));
        let titles: Vec<&str> = view.sections().iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Simplified", "Derivative", "Maxima & Minima"]);
    }

    #[test]
    fn successful_solve_with_unparsable_body_is_an_error() {
        let (envelope, _) = run(
            Scripted::Reply {
                status: 200,
                body: "not json",
            },
            SubmitMode::Solve,
        );
        assert!(envelope.ok);
        assert!(envelope.is_error());
        assert_eq!(envelope.content.error_message(), Some("not json"));
    }

    #[test]
    fn successful_graph_yields_image_reference() {
        let (envelope, _) = run(
            Scripted::Reply {
                status: 200,
                body: "png",
            },
            SubmitMode::Graph,
        );
        assert!(envelope.is_graph);
        assert!(envelope.ok);
        assert_eq!(
            envelope.content,
            EnvelopeContent::Image {
                image: ImageRef("blob:graph/png".to_string())
            }
        );
    }

    #[test]
    fn failed_graph_reads_json_error_or_falls_back_to_table() {
        let (envelope, _) = run(
            Scripted::Reply {
                status: 500,
                body: r#"{"error": "cannot graph inequality"}"#,
            },
            SubmitMode::Graph,
        );
        assert!(envelope.is_graph);
        assert_eq!(envelope.content.error_message(), Some("cannot graph inequality"));

        let (envelope, _) = run(
            Scripted::Reply {
                status: 429,
                body: "rate limited",
            },
            SubmitMode::Graph,
        );
        assert_eq!(
            envelope.content.error_message(),
            Some("Too many requests... slow down!")
        );
    }

    #[test]
    fn unreadable_graph_image_becomes_error() {
        let (envelope, _) = run(Scripted::BrokenImage { status: 200 }, SubmitMode::Graph);
        assert!(!envelope.ok);
        assert_eq!(envelope.status, 200);
        assert_eq!(
            envelope.content.error_message(),
            Some("Failed to read graph image: blob unavailable")
        );
    }

    #[test]
    fn error_status_without_error_field_uses_table() {
        let content = interpret_text(SubmitMode::Solve, 400, r#"{"detail": "nope"}"#);
        assert_eq!(content.error_message(), Some("Bad input data"));
    }
}
