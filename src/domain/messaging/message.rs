//! Messages exchanged between contexts.
//!
//! Contexts share no memory: everything that crosses the broker is plain,
//! serializable data.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ticket::{ApiResponse, TicketId};

/// Requests a context can send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Message {
    /// Page agent asks the coordinator to perform the authenticated call.
    #[serde(rename = "makeAPICall", rename_all = "camelCase")]
    MakeApiCall {
        ticket_id: TicketId,
        target_url: String,
    },

    /// Control panel asks the page agent to run the pipeline now.
    #[serde(rename = "manualInvoke", rename_all = "camelCase")]
    ManualInvoke {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ticket_id: Option<TicketId>,
    },
}

impl Message {
    pub fn tag(&self) -> MessageTag {
        match self {
            Message::MakeApiCall { .. } => MessageTag::MakeApiCall,
            Message::ManualInvoke { .. } => MessageTag::ManualInvoke,
        }
    }
}

/// Discriminant used to route a message to its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageTag {
    MakeApiCall,
    ManualInvoke,
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageTag::MakeApiCall => f.write_str("makeAPICall"),
            MessageTag::ManualInvoke => f.write_str("manualInvoke"),
        }
    }
}

/// Exactly one reply is produced per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "camelCase")]
pub enum Reply {
    ApiResult(ApiResponse),
    ManualInvoke(ManualInvokeReply),
}

/// Acknowledgement for a manual invoke request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ManualInvokeReply {
    #[serde(rename_all = "camelCase")]
    Invoked { ticket_id: TicketId },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket() -> TicketId {
        TicketId::new("120349000058009045").unwrap()
    }

    #[test]
    fn make_api_call_uses_action_tag() {
        let message = Message::MakeApiCall {
            ticket_id: ticket(),
            target_url: "https://api/ticket/details/120349000058009045".to_string(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "action": "makeAPICall",
                "ticketId": "120349000058009045",
                "targetUrl": "https://api/ticket/details/120349000058009045"
            })
        );
    }

    #[test]
    fn manual_invoke_ticket_is_optional() {
        let parsed: Message = serde_json::from_value(json!({"action": "manualInvoke"})).unwrap();
        assert_eq!(parsed, Message::ManualInvoke { ticket_id: None });
        assert_eq!(parsed.tag(), MessageTag::ManualInvoke);
    }

    #[test]
    fn manual_invoke_reply_serializes_status() {
        let reply = ManualInvokeReply::Invoked { ticket_id: ticket() };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"status": "invoked", "ticketId": "120349000058009045"})
        );
    }
}
