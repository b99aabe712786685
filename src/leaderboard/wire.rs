//! Wire contracts for the GraphQL-style score API.
//!
//! Responses arrive as `{"data": {...}, "errors": [...]}` envelopes. Every
//! entry is checked for its required fields here so malformed payloads never
//! reach the [`ScoreStore`](super::store::ScoreStore).

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use super::entry::ScoreEntry;

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("remote error: {0}")]
    Remote(String),
    #[error("payload has no `{0}` data")]
    MissingData(&'static str),
    #[error("entry is missing `{0}`")]
    MissingField(&'static str),
    #[error("entry has an empty `{0}`")]
    EmptyField(&'static str),
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<RemoteError>,
}

#[derive(Deserialize)]
struct RemoteError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListData {
    list_users: Option<ItemPage>,
}

#[derive(Deserialize)]
struct ItemPage {
    #[serde(default)]
    items: Vec<RawEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    create_user: Option<RawEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OnCreateData {
    on_create_user: Option<RawEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    id: Option<String>,
    user_name: Option<String>,
    value: Option<i64>,
}

impl RawEntry {
    fn validate(self) -> Result<ScoreEntry, DecodeError> {
        let id = self.id.ok_or(DecodeError::MissingField("id"))?;
        if id.is_empty() { return Err(DecodeError::EmptyField("id")); }
        let user_name = self.user_name.ok_or(DecodeError::MissingField("userName"))?;
        if user_name.is_empty() { return Err(DecodeError::EmptyField("userName")); }
        let value = self.value.ok_or(DecodeError::MissingField("value"))?;
        Ok(ScoreEntry { id, user_name, value })
    }
}

fn open<T: DeserializeOwned>(payload: &str, what: &'static str) -> Result<T, DecodeError> {
    let envelope: Envelope<T> = serde_json::from_str(payload)?;
    if let Some(first) = envelope.errors.into_iter().next() {
        return Err(DecodeError::Remote(first.message));
    }
    envelope.data.ok_or(DecodeError::MissingData(what))
}

/// Decode a `listUsers` query response.
pub fn decode_list(payload: &str) -> Result<Vec<ScoreEntry>, DecodeError> {
    let data: ListData = open(payload, "listUsers")?;
    let page = data.list_users.ok_or(DecodeError::MissingData("listUsers"))?;
    page.items.into_iter().map(RawEntry::validate).collect()
}

/// Decode a `createUser` mutation response.
pub fn decode_created(payload: &str) -> Result<ScoreEntry, DecodeError> {
    let data: CreateData = open(payload, "createUser")?;
    data.create_user.ok_or(DecodeError::MissingData("createUser"))?.validate()
}

/// Decode an `onCreateUser` subscription event.
pub fn decode_on_create(payload: &str) -> Result<ScoreEntry, DecodeError> {
    let data: OnCreateData = open(payload, "onCreateUser")?;
    data.on_create_user.ok_or(DecodeError::MissingData("onCreateUser"))?.validate()
}

pub fn list_payload(entries: &[ScoreEntry]) -> String {
    json!({ "data": { "listUsers": { "items": entries } } }).to_string()
}

pub fn created_payload(entry: &ScoreEntry) -> String {
    json!({ "data": { "createUser": entry } }).to_string()
}

pub fn on_create_payload(entry: &ScoreEntry) -> String {
    json!({ "data": { "onCreateUser": entry } }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_list_items_in_order() {
        let payload = r#"{"data":{"listUsers":{"items":[
            {"id":"1","userName":"bob","value":5},
            {"id":"2","userName":"amy","value":0}
        ]}}}"#;
        let entries = decode_list(payload).unwrap();
        assert_eq!(entries, vec![ScoreEntry::new("1", "bob", 5), ScoreEntry::new("2", "amy", 0)]);
    }

    #[test]
    fn one_bad_item_rejects_the_whole_list() {
        let payload = r#"{"data":{"listUsers":{"items":[
            {"id":"1","userName":"bob","value":5},
            {"id":"2","value":3}
        ]}}}"#;
        assert!(matches!(decode_list(payload), Err(DecodeError::MissingField("userName"))));
    }

    #[test]
    fn rejects_empty_identifier() {
        let payload = r#"{"data":{"onCreateUser":{"id":"","userName":"bob","value":1}}}"#;
        assert!(matches!(decode_on_create(payload), Err(DecodeError::EmptyField("id"))));
    }

    #[test]
    fn rejects_missing_value() {
        let payload = r#"{"data":{"createUser":{"id":"9","userName":"bob"}}}"#;
        assert!(matches!(decode_created(payload), Err(DecodeError::MissingField("value"))));
    }

    #[test]
    fn rejects_wrongly_typed_value() {
        let payload = r#"{"data":{"createUser":{"id":"9","userName":"bob","value":"ten"}}}"#;
        assert!(matches!(decode_created(payload), Err(DecodeError::Json(_))));
    }

    #[test]
    fn surfaces_remote_errors() {
        let payload = r#"{"data":null,"errors":[{"message":"Not Authorized"}]}"#;
        match decode_list(payload) {
            Err(DecodeError::Remote(msg)) => assert_eq!(msg, "Not Authorized"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_data_is_an_error() {
        assert!(matches!(decode_on_create(r#"{"data":{}}"#), Err(DecodeError::MissingData("onCreateUser"))));
        assert!(matches!(decode_list("{}"), Err(DecodeError::MissingData("listUsers"))));
    }

    #[test]
    fn encoded_payloads_decode_back() {
        let entry = ScoreEntry::new("01J", "amy", 12);
        assert_eq!(decode_created(&created_payload(&entry)).unwrap(), entry);
        assert_eq!(decode_on_create(&on_create_payload(&entry)).unwrap(), entry);
        assert_eq!(decode_list(&list_payload(&[entry.clone()])).unwrap(), vec![entry]);
    }
}
