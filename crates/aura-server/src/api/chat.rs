//! Chat transport: a stateless POST endpoint and the WebSocket session.
//!
//! The WebSocket owns the transcript; it lives exactly as long as the
//! connection. The POST endpoint accepts the transcript from the caller so
//! stateless clients can still hold a conversation.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension, Json,
};
use serde::Deserialize;

use aura_core::Transcript;

use crate::composer::{self, ChatReply};
use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ChatRequest {
    pub message: String,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub history: Transcript,
}

/// One stateless chat turn.
pub(super) async fn chat_turn(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ChatRequest>,
) -> Json<ApiResponse<ChatReply>> {
    let reply = composer::compose(
        &state.pool,
        state.genai.as_deref(),
        &body.history,
        &body.message,
        body.user_id,
    )
    .await;

    Json(ApiResponse {
        data: reply,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn chat_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| chat_session(socket, state))
}

#[derive(Debug, Deserialize)]
struct IncomingTurn {
    message: String,
    user_id: Option<i64>,
}

/// Runs one WebSocket chat session. Greets on connect, then treats every
/// text frame as one turn; the transcript accumulates for the lifetime of
/// the connection and dies with it.
async fn chat_session(mut socket: WebSocket, state: AppState) {
    let mut transcript = Transcript::new();

    let welcome = composer::welcome();
    transcript.push_assistant(welcome.text.clone());
    if send_reply(&mut socket, &welcome).await.is_err() {
        return;
    }

    while let Some(Ok(frame)) = socket.recv().await {
        match frame {
            Message::Text(text) => {
                // A bare text frame is treated as an anonymous message.
                let turn: IncomingTurn =
                    serde_json::from_str(&text).unwrap_or_else(|_| IncomingTurn {
                        message: text.to_string(),
                        user_id: None,
                    });

                let reply = composer::compose(
                    &state.pool,
                    state.genai.as_deref(),
                    &transcript,
                    &turn.message,
                    turn.user_id,
                )
                .await;

                transcript.push_user(turn.message);
                transcript.push_assistant(reply.text.clone());

                if send_reply(&mut socket, &reply).await.is_err() {
                    return;
                }
            }
            Message::Close(_) => return,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }
}

async fn send_reply(socket: &mut WebSocket, reply: &ChatReply) -> Result<(), axum::Error> {
    let json = serde_json::to_string(reply).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}
