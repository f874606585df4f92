use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Language;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinMessage {
    pub room: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EditMessage {
    pub room: String,
    /// Opaque localized mutation. Forwarded verbatim, never interpreted here.
    #[serde(default)]
    pub delta: Option<Value>,
    /// Full resulting content, the authoritative snapshot and fallback.
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LanguageMessage {
    pub room: String,
    pub language: Language,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OutputMessage {
    pub room: String,
    pub output: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PeersRequest {
    pub room: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OfferMessage {
    pub target: String,
    pub payload: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnswerMessage {
    pub target: String,
    pub payload: Value,
}

/// Messages a client may send. One enum, one dispatch point per connection.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "join")]
    Join(JoinMessage),
    #[serde(rename = "edit")]
    Edit(EditMessage),
    #[serde(rename = "language")]
    Language(LanguageMessage),
    #[serde(rename = "output")]
    Output(OutputMessage),
    #[serde(rename = "peers")]
    Peers(PeersRequest),
    #[serde(rename = "offer")]
    Offer(OfferMessage),
    #[serde(rename = "answer")]
    Answer(AnswerMessage),
    #[serde(rename = "ping")]
    Ping,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SyncMessage {
    pub content: String,
    pub language: Language,
    pub output: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EditForward {
    #[serde(default)]
    pub delta: Option<Value>,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LanguageForward {
    pub language: Language,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OutputForward {
    pub output: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MembersMessage {
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PeersMessage {
    pub peers: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IncomingOffer {
    pub sender: String,
    pub payload: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IncomingAnswer {
    pub responder: String,
    pub payload: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PeerLeftMessage {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

/// Messages the server sends back.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "sync")]
    Sync(SyncMessage),
    #[serde(rename = "edit")]
    Edit(EditForward),
    #[serde(rename = "language")]
    Language(LanguageForward),
    #[serde(rename = "output")]
    Output(OutputForward),
    #[serde(rename = "members")]
    Members(MembersMessage),
    #[serde(rename = "peers")]
    Peers(PeersMessage),
    #[serde(rename = "offer")]
    Offer(IncomingOffer),
    #[serde(rename = "answer")]
    Answer(IncomingAnswer),
    #[serde(rename = "peerLeft")]
    PeerLeft(PeerLeftMessage),
    #[serde(rename = "pong")]
    Pong(PongMessage),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edit_without_delta_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"edit","room":"abc","content":"x"}"#).unwrap();
        match msg {
            ClientMessage::Edit(edit) => {
                assert_eq!(edit.room, "abc");
                assert!(edit.delta.is_none());
                assert_eq!(edit.content, "x");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn edit_delta_is_accepted_as_arbitrary_json() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"edit","room":"abc","delta":{"weird":["shape",1]},"content":"x"}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::Edit(edit) => assert!(edit.delta.is_some()),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn server_messages_carry_lowercase_tags() {
        let json =
            serde_json::to_value(ServerMessage::Members(MembersMessage { count: 2 })).unwrap();
        assert_eq!(json, json!({"type": "members", "count": 2}));

        let json = serde_json::to_value(ServerMessage::PeerLeft(PeerLeftMessage {
            id: "c1".to_string(),
        }))
        .unwrap();
        assert_eq!(json, json!({"type": "peerLeft", "id": "c1"}));
    }

    #[test]
    fn offer_round_trips_with_opaque_payload() {
        let payload = json!({"sdp": "v=0...", "kind": "offer"});
        let wire = serde_json::to_string(&ServerMessage::Offer(IncomingOffer {
            sender: "a".to_string(),
            payload: payload.clone(),
        }))
        .unwrap();
        let back: ServerMessage = serde_json::from_str(&wire).unwrap();
        match back {
            ServerMessage::Offer(offer) => {
                assert_eq!(offer.sender, "a");
                assert_eq!(offer.payload, payload);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
