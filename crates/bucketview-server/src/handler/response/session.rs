use serde::Serialize;

/// Identity of the signed-in user; `id` is `null` without a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponse {
    pub id: Option<String>,
}
