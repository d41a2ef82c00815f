/// HTTP client for the MediAssist backend.
///
/// Every endpoint speaks JSON over a fixed base URL. List/history payloads go
/// through the tolerant decoders in `decode`; non-success responses for the
/// auth and conversation endpoints carry `{"error": "..."}` which becomes the
/// user-visible message.
///
/// The conversation operations live behind the `ChatBackend` trait so the
/// controller can be exercised against a recording fake in tests.
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::decode::{self, Conversation, Message};
use crate::error::ApiError;
use crate::profile::SessionProfile;

/// Reply text used when the backend answers without a `respuesta` field.
pub const NO_REPLY_PLACEHOLDER: &str = "Sin respuesta";

// ── Request bodies ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LoginBody<'a> {
    correo: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    nombre: &'a str,
    correo: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct UserBody<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    user_id: &'a str,
    conversacion_id: &'a str,
    contenido: &'a str,
}

#[derive(Serialize)]
struct FeedbackBody {
    message_index: usize,
    is_positive: bool,
    timestamp: String,
}

// ── Backend seam ──────────────────────────────────────────────────────────────

/// The conversation operations the controller needs. Implemented by
/// `ApiClient` for real use and by a call-recording fake in controller tests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, ApiError>;
    async fn create_conversation(&self, user_id: &str) -> Result<Conversation, ApiError>;
    async fn conversation_messages(&self, conversation_id: &str) -> Result<Vec<Message>, ApiError>;
    async fn delete_conversation(&self, conversation_id: &str) -> Result<(), ApiError>;
    async fn send_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        content: &str,
    ) -> Result<String, ApiError>;
    async fn submit_feedback(&self, message_index: usize, is_positive: bool)
        -> Result<(), ApiError>;
}

// ── Client ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST /login. A success response without `user_id` is still a failure.
    pub async fn login(&self, correo: &str, password: &str) -> Result<SessionProfile, ApiError> {
        let resp = self
            .http
            .post(self.url("/login"))
            .json(&LoginBody { correo, password })
            .send()
            .await?;
        let data = ok_json(resp, "Error al iniciar sesión").await?;
        profile_from(&data, correo, None)
    }

    /// POST /register. Same contract as login.
    pub async fn register(
        &self,
        nombre: &str,
        correo: &str,
        password: &str,
    ) -> Result<SessionProfile, ApiError> {
        let resp = self
            .http
            .post(self.url("/register"))
            .json(&RegisterBody { nombre, correo, password })
            .send()
            .await?;
        let data = ok_json(resp, "Error al registrar").await?;
        profile_from(&data, correo, Some(nombre))
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, ApiError> {
        let resp = self
            .http
            .get(self.url("/conversaciones"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let data: Value = resp.json().await?;
        Ok(decode::conversations_from(&data))
    }

    async fn create_conversation(&self, user_id: &str) -> Result<Conversation, ApiError> {
        let resp = self
            .http
            .post(self.url("/nueva-conversacion"))
            .json(&UserBody { user_id })
            .send()
            .await?;
        let data = ok_json(resp, "Error al crear conversación").await?;
        Conversation::from_value(&data)
            .ok_or_else(|| ApiError::Transport("Nueva conversación sin ID".to_string()))
    }

    async fn conversation_messages(&self, conversation_id: &str) -> Result<Vec<Message>, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/conversacion/{conversation_id}")))
            .send()
            .await?;
        let data: Value = resp.json().await?;
        Ok(decode::messages_from(&data))
    }

    async fn delete_conversation(&self, conversation_id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/conversacion/{conversation_id}")))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(server_error(status, &body, "Error al eliminar la conversación"));
        }
        Ok(())
    }

    async fn send_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        content: &str,
    ) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.url("/mensaje"))
            .json(&MessageBody { user_id, conversacion_id: conversation_id, contenido: content })
            .send()
            .await?;
        let data = ok_json(resp, "Error al enviar el mensaje").await?;
        Ok(reply_from(&data))
    }

    /// Best-effort: callers ignore the result beyond logging.
    async fn submit_feedback(
        &self,
        message_index: usize,
        is_positive: bool,
    ) -> Result<(), ApiError> {
        self.http
            .post(self.url("/feedback"))
            .json(&FeedbackBody {
                message_index,
                is_positive,
                timestamp: chrono::Utc::now().to_rfc3339(),
            })
            .send()
            .await?;
        Ok(())
    }
}

// ── Response handling ─────────────────────────────────────────────────────────

/// Check status, then parse JSON. Non-success becomes `ApiError::Server` with
/// the body's `error` string when present, else `fallback`.
async fn ok_json(resp: reqwest::Response, fallback: &str) -> Result<Value, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(server_error(status.as_u16(), &body, fallback));
    }
    Ok(serde_json::from_str(&body)?)
}

fn server_error(status: u16, body: &str, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| fallback.to_string());
    ApiError::Server { status, message }
}

/// Build a session profile from an auth response. `nombre` falls back to the
/// response's, then the registration form's, then "Usuario".
fn profile_from(data: &Value, correo: &str, nombre: Option<&str>) -> Result<SessionProfile, ApiError> {
    let user_id = match data.get("user_id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(ApiError::Transport(
                "No se recibió user_id del servidor".to_string(),
            ));
        }
    };
    let nombre = data
        .get("nombre")
        .and_then(Value::as_str)
        .or(nombre)
        .unwrap_or("Usuario")
        .to_string();
    Ok(SessionProfile { user_id, nombre, correo: correo.to_string() })
}

fn reply_from(data: &Value) -> String {
    match data.get("respuesta").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NO_REPLY_PLACEHOLDER.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_error_prefers_body_error_field() {
        let err = server_error(400, r#"{"error": "correo en uso"}"#, "Error al registrar");
        assert_eq!(err.user_message(), "correo en uso");

        let err = server_error(500, "not json", "Error al registrar");
        assert_eq!(err.user_message(), "Error al registrar");
    }

    #[test]
    fn profile_requires_user_id() {
        let err = profile_from(&json!({"nombre": "Ana"}), "a@b.c", None).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));

        let p = profile_from(&json!({"user_id": 9}), "a@b.c", None).unwrap();
        assert_eq!(p.user_id, "9");
        assert_eq!(p.nombre, "Usuario");
    }

    #[test]
    fn profile_nombre_fallback_order() {
        let p = profile_from(&json!({"user_id": "u", "nombre": "Ana"}), "a@b.c", Some("Form"))
            .unwrap();
        assert_eq!(p.nombre, "Ana");

        let p = profile_from(&json!({"user_id": "u"}), "a@b.c", Some("Form")).unwrap();
        assert_eq!(p.nombre, "Form");
    }

    #[test]
    fn missing_reply_becomes_placeholder() {
        assert_eq!(reply_from(&json!({"respuesta": "Hola"})), "Hola");
        assert_eq!(reply_from(&json!({})), NO_REPLY_PLACEHOLDER);
        assert_eq!(reply_from(&json!({"respuesta": ""})), NO_REPLY_PLACEHOLDER);
    }
}
