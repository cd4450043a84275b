//! Chat page and WebSocket relay endpoint.
//!
//! # Data Flow
//! ```text
//! Client ──text frame──→ /ws ──→ ChatSession ──→ InferenceProvider
//! Client ←─status frame── /ws
//! Client ←─reply frame─── /ws ←── reply | Error: ... | fallback
//! ```
//!
//! # Design Decisions
//! - One task per upgraded connection, owned transcript
//! - Frames are handled strictly in order; a second message waits for the first reply
//! - A client close is answered with a close; transport errors end the session quietly
//! - Send failures are reported best-effort, then the socket is closed

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{Html, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{Sink, SinkExt};
use serde_json::{json, Value};

use crate::config::ChatConfig;
use crate::inference::{self, InferenceError, InferenceProvider};
use crate::lifecycle::Shutdown;
use crate::relay::{ChatSession, ConnectionRegistry, RelaySettings, SessionId};

/// Shared state for every chat connection.
#[derive(Clone)]
pub struct ChatState {
    pub registry: ConnectionRegistry,
    pub provider: Arc<dyn InferenceProvider>,
    pub settings: Arc<RelaySettings>,
    pub app_name: Arc<str>,
    pub provider_configured: bool,
    pub shutdown: Shutdown,
}

impl ChatState {
    pub fn from_config(config: &ChatConfig, shutdown: Shutdown) -> Result<Self, InferenceError> {
        let provider = inference::from_config(config)?;
        let mut state = Self::new(provider, RelaySettings::from(config), shutdown);
        state.app_name = Arc::from(config.app_name.as_str());
        state.provider_configured = config.api_token.is_some();
        Ok(state)
    }

    pub fn new(provider: Arc<dyn InferenceProvider>, settings: RelaySettings, shutdown: Shutdown) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            provider,
            settings: Arc::new(settings),
            app_name: Arc::from("My ChatBot"),
            provider_configured: true,
            shutdown,
        }
    }
}

pub fn router(state: ChatState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<ChatState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model": state.provider.model(),
        "provider_configured": state.provider_configured,
        "active_sessions": state.registry.active_count(),
    }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ChatState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: ChatState) {
    let mut session = ChatSession::new(Arc::clone(&state.provider), Arc::clone(&state.settings));
    let session_id = session.open(&state.registry);

    if let Err(e) = relay(&mut socket, &mut session, &state.shutdown).await {
        tracing::error!(session_id = %session_id, error = %e, "WebSocket error");
        report_failure(&mut socket, &e).await;
    }

    session.close();
}

/// Best-effort error frame followed by a close.
async fn report_failure<S>(sink: &mut S, error: &axum::Error)
where
    S: Sink<Message> + Unpin,
{
    let _ = sink
        .send(Message::Text(format!("Connection error: {}", error).into()))
        .await;
    let _ = sink.send(Message::Close(None)).await;
}

/// Serve frames until the client leaves or the server shuts down.
///
/// Only send failures are returned as errors.
async fn relay(
    socket: &mut WebSocket,
    session: &mut ChatSession,
    shutdown: &Shutdown,
) -> Result<(), axum::Error> {
    let mut stop = shutdown.subscribe();
    loop {
        let next = if shutdown.is_triggered() {
            None
        } else {
            tokio::select! {
                frame = socket.recv() => Some(frame),
                _ = stop.recv() => None,
            }
        };
        let Some(frame) = next else {
            tracing::debug!(session_id = ?session.id(), "Closing session for shutdown");
            let _ = socket.send(Message::Close(None)).await;
            return Ok(());
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                let status = session.begin_turn(text.as_str()).to_string();
                socket.send(Message::Text(status.into())).await?;

                let reply = session.finish_turn().await;
                socket.send(Message::Text(reply.into())).await?;
            }
            Some(Ok(Message::Close(_))) => {
                log_disconnect(session.id(), "client closed");
                let _ = socket.send(Message::Close(None)).await;
                return Ok(());
            }
            None => {
                log_disconnect(session.id(), "stream ended");
                return Ok(());
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                log_disconnect(session.id(), &e.to_string());
                return Ok(());
            }
        }
    }
}

fn log_disconnect(session_id: Option<SessionId>, reason: &str) {
    tracing::debug!(session_id = ?session_id, reason = %reason, "Client disconnected");
}

async fn index(State(state): State<ChatState>) -> Html<String> {
    Html(render_index(
        &state.app_name,
        state.provider.model(),
        &state.settings.status_message,
    ))
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{app_name}}</title>
<style>
body { font-family: sans-serif; max-width: 720px; margin: 2rem auto; }
#chat-messages { border: 1px solid #ccc; height: 420px; overflow-y: auto; padding: 0.5rem; }
.message { margin: 0.4rem 0; padding: 0.4rem 0.6rem; border-radius: 6px; }
.user { background: #dbeafe; text-align: right; }
.bot { background: #f3f4f6; }
.typing { color: #6b7280; font-style: italic; }
</style>
</head>
<body>
<h1>{{app_name}}</h1>
<p>Model: <code>{{model_name}}</code></p>
<div id="chat-messages"></div>
<form id="chat-form">
<input id="user-input" autocomplete="off" placeholder="Type a message..." size="60">
<button id="send-btn" type="submit">Send</button>
</form>
<script>
const STATUS = {{status_json}};
const log = document.getElementById("chat-messages");
const input = document.getElementById("user-input");
let socket = null;

function append(text, cls) {
  const el = document.createElement("div");
  el.className = "message " + cls;
  el.textContent = text;
  log.appendChild(el);
  log.scrollTop = log.scrollHeight;
  return el;
}

function connect() {
  const proto = location.protocol === "https:" ? "wss:" : "ws:";
  socket = new WebSocket(proto + "//" + location.host + "/ws");
  socket.onmessage = (event) => {
    const typing = document.querySelector(".typing");
    if (typing) typing.remove();
    if (event.data === STATUS) {
      append(STATUS, "bot typing");
    } else {
      append(event.data, "bot");
    }
  };
  socket.onclose = () => setTimeout(connect, 3000);
}

document.getElementById("chat-form").addEventListener("submit", (event) => {
  event.preventDefault();
  const text = input.value.trim();
  if (!text || !socket || socket.readyState !== WebSocket.OPEN) return;
  append(text, "user");
  socket.send(text);
  input.value = "";
});

connect();
</script>
</body>
</html>
"#;

fn render_index(app_name: &str, model: &str, status_message: &str) -> String {
    let status_json = serde_json::to_string(status_message)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c");

    INDEX_TEMPLATE
        .replace("{{app_name}}", &escape_html(app_name))
        .replace("{{model_name}}", &escape_html(model))
        .replace("{{status_json}}", &status_json)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_names_model_and_app() {
        let html = render_index("My ChatBot", "org/model-7B", "Bot is thinking...");
        assert!(html.contains("<title>My ChatBot</title>"));
        assert!(html.contains("<code>org/model-7B</code>"));
        assert!(html.contains(r#"const STATUS = "Bot is thinking...";"#));
    }

    #[tokio::test]
    async fn test_send_failure_reports_then_closes() {
        let mut frames: Vec<Message> = Vec::new();
        report_failure(&mut frames, &axum::Error::new("broken pipe")).await;

        assert_eq!(frames.len(), 2);
        assert!(matches!(&frames[0], Message::Text(t) if t.as_str() == "Connection error: broken pipe"));
        assert!(matches!(&frames[1], Message::Close(None)));
    }

    #[test]
    fn test_index_escapes_values() {
        let html = render_index("<b>bot</b>", "m", "</script>");
        assert!(html.contains("&lt;b&gt;bot&lt;/b&gt;"));
        assert!(!html.contains("\"</script>\""));
    }
}
