/// Tolerant decoding of backend payloads.
///
/// The backend has shipped several field-name generations (Spanish and
/// English, mixed casing), and list endpoints sometimes wrap their array in
/// an envelope object. This module holds the fixed alias-priority list for
/// every logical attribute and is the only place raw `serde_json::Value`
/// payloads are inspected — everything past this boundary is strongly typed.
use serde_json::Value;

// ── Alias tables ──────────────────────────────────────────────────────────────

const ARRAY_KEYS: &[&str] = &["conversaciones", "items", "rows", "data", "result", "results"];
const CONV_ID_KEYS: &[&str] = &["id_conversacion", "id", "conversation_id", "uuid", "ID"];
const CONV_TITLE_KEYS: &[&str] = &["titulo", "title", "nombre"];
const CONV_DATE_KEYS: &[&str] = &["fecha_inicio", "fecha", "created_at", "createdAt", "FECHA"];
const MSG_ROLE_KEYS: &[&str] = &["role", "remitente"];
const MSG_CONTENT_KEYS: &[&str] = &["content", "contenido", "texto"];

// ── Typed records ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    /// Raw date string as the backend sent it; display-only.
    pub started_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// ── Array extraction ──────────────────────────────────────────────────────────

/// Pull the payload array out of a list response: a bare array, or the first
/// array found under one of the known wrapper keys. Anything else decodes to
/// an empty list rather than an error.
pub fn pick_array(data: &Value) -> Vec<Value> {
    if let Some(arr) = data.as_array() {
        return arr.clone();
    }
    if let Some(obj) = data.as_object() {
        for key in ARRAY_KEYS {
            if let Some(arr) = obj.get(*key).and_then(Value::as_array) {
                return arr.clone();
            }
        }
    }
    Vec::new()
}

// ── Field resolution ──────────────────────────────────────────────────────────

/// First non-null value among `keys`, stringified. Numeric ids come back as
/// strings so identity comparison is uniform everywhere.
fn pick_string(obj: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            Some(Value::Null) | None => continue,
            Some(other) => return Some(other.to_string()),
        }
    }
    None
}

impl Conversation {
    /// Decode one conversation object. Returns None when no id can be
    /// resolved — a conversation without an id is unusable in the UI.
    pub fn from_value(v: &Value) -> Option<Conversation> {
        let id = pick_string(v, CONV_ID_KEYS)?;
        let title = pick_string(v, CONV_TITLE_KEYS)
            .unwrap_or_else(|| format!("Chat {id}").trim().to_string());
        let started_at = pick_string(v, CONV_DATE_KEYS);
        Some(Conversation { id, title, started_at })
    }
}

/// Decode a list response into conversations, dropping entries without ids.
pub fn conversations_from(data: &Value) -> Vec<Conversation> {
    pick_array(data).iter().filter_map(Conversation::from_value).collect()
}

impl Role {
    fn from_str(s: &str) -> Role {
        match s {
            "assistant" | "bot" => Role::Assistant,
            _ => Role::User,
        }
    }
}

impl Message {
    /// Decode one history message. Role defaults to user, content to empty —
    /// a half-decoded message still renders rather than poisoning the load.
    pub fn from_value(v: &Value) -> Message {
        let role = pick_string(v, MSG_ROLE_KEYS)
            .map(|s| Role::from_str(&s))
            .unwrap_or(Role::User);
        let content = pick_string(v, MSG_CONTENT_KEYS).unwrap_or_default();
        Message { role, content }
    }
}

/// Decode a history response (bare or wrapped array) into messages.
pub fn messages_from(data: &Value) -> Vec<Message> {
    pick_array(data).iter().map(Message::from_value).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_and_all_wrappers_decode_identically() {
        let items = json!([{"id": 1, "titulo": "Gripe"}, {"id": 2, "titulo": "Tos"}]);
        let bare = conversations_from(&items);
        assert_eq!(bare.len(), 2);

        for key in ["conversaciones", "items", "rows", "data", "result", "results"] {
            let wrapped = json!({ key: items.clone() });
            assert_eq!(conversations_from(&wrapped), bare, "wrapper key {key}");
        }
    }

    #[test]
    fn unknown_shapes_decode_to_empty() {
        assert!(conversations_from(&json!("nope")).is_empty());
        assert!(conversations_from(&json!({"unrelated": 3})).is_empty());
        assert!(conversations_from(&json!(null)).is_empty());
    }

    #[test]
    fn conversation_id_alias_priority() {
        // id_conversacion wins over id
        let c = Conversation::from_value(&json!({"id_conversacion": "a", "id": "b"})).unwrap();
        assert_eq!(c.id, "a");

        // numeric ids are stringified
        let c = Conversation::from_value(&json!({"uuid": 42, "title": "T"})).unwrap();
        assert_eq!(c.id, "42");

        // no id at all → unusable
        assert!(Conversation::from_value(&json!({"titulo": "sin id"})).is_none());
    }

    #[test]
    fn conversation_title_fallback() {
        let c = Conversation::from_value(&json!({"ID": 7})).unwrap();
        assert_eq!(c.title, "Chat 7");

        let c = Conversation::from_value(&json!({"id": 7, "nombre": "Consulta"})).unwrap();
        assert_eq!(c.title, "Consulta");
    }

    #[test]
    fn conversation_date_aliases() {
        let c = Conversation::from_value(&json!({"id": 1, "created_at": "2026-01-01"})).unwrap();
        assert_eq!(c.started_at.as_deref(), Some("2026-01-01"));

        let c = Conversation::from_value(&json!({"id": 1})).unwrap();
        assert!(c.started_at.is_none());
    }

    #[test]
    fn message_role_and_content_aliases() {
        let m = Message::from_value(&json!({"remitente": "assistant", "contenido": "hola"}));
        assert_eq!(m.role, Role::Assistant);
        assert_eq!(m.content, "hola");

        let m = Message::from_value(&json!({"texto": "buenas"}));
        assert_eq!(m.role, Role::User);
        assert_eq!(m.content, "buenas");

        // entirely empty object still yields a renderable message
        let m = Message::from_value(&json!({}));
        assert_eq!(m.role, Role::User);
        assert_eq!(m.content, "");
    }

    #[test]
    fn messages_accept_bare_and_wrapped_arrays() {
        let bare = json!([{"role": "user", "content": "a"}]);
        let wrapped = json!({"data": [{"role": "user", "content": "a"}]});
        assert_eq!(messages_from(&bare), messages_from(&wrapped));
    }
}
