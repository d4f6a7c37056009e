//! Messages exchanged between the page side and the translation service.
//!
//! The JSON shape is fixed: replies may arrive through a direct callback or
//! through an independent notification, and both carry the same object.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "TRANSLATE_REQUEST", rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub job_id: String,
}

impl TranslateRequest {
    pub fn new(job_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            job_id: job_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TranslateReply {
    #[serde(rename = "TRANSLATE_RESPONSE", rename_all = "camelCase")]
    Response {
        job_id: String,
        translated_text: String,
        success: bool,
    },
    #[serde(rename = "TRANSLATE_ERROR", rename_all = "camelCase")]
    Error {
        job_id: String,
        error: String,
        success: bool,
    },
}

impl TranslateReply {
    pub fn translated(job_id: impl Into<String>, translated_text: impl Into<String>) -> Self {
        TranslateReply::Response {
            job_id: job_id.into(),
            translated_text: translated_text.into(),
            success: true,
        }
    }

    pub fn failed(job_id: impl Into<String>, error: impl Into<String>) -> Self {
        TranslateReply::Error {
            job_id: job_id.into(),
            error: error.into(),
            success: false,
        }
    }

    pub fn job_id(&self) -> &str {
        match self {
            TranslateReply::Response { job_id, .. } | TranslateReply::Error { job_id, .. } => {
                job_id
            }
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            TranslateReply::Response { success, .. } | TranslateReply::Error { success, .. } => {
                *success
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_wire_field_names() {
        let request = TranslateRequest::new("msg_bubble_1_1", "Hello there");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "TRANSLATE_REQUEST", "text": "Hello there", "jobId": "msg_bubble_1_1"})
        );
    }

    #[test]
    fn replies_use_wire_field_names() {
        assert_eq!(
            serde_json::to_value(TranslateReply::translated("j", "Hola")).unwrap(),
            json!({"type": "TRANSLATE_RESPONSE", "jobId": "j", "translatedText": "Hola", "success": true})
        );
        assert_eq!(
            serde_json::to_value(TranslateReply::failed("j", "boom")).unwrap(),
            json!({"type": "TRANSLATE_ERROR", "jobId": "j", "error": "boom", "success": false})
        );
    }

    #[test]
    fn notification_from_another_channel_parses() {
        let raw = r#"{"type":"TRANSLATE_ERROR","jobId":"msg_bubble_9_2","error":"quota","success":false}"#;
        let reply: TranslateReply = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.job_id(), "msg_bubble_9_2");
        assert!(!reply.is_success());
    }
}
