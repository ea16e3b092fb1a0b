use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AjaxQuery {
    pub call: String,
}

#[derive(Debug, Serialize)]
pub struct HookResponse {
    pub status: String,
}
