//! The command facade.
//!
//! [`JsonClient`] has one method per JSON command. Every method encodes the
//! request, performs exactly one round trip on the injected transport, and
//! decodes the reply with the shape that command defines. There are no
//! retries and no caching, and JSON values are never parsed on this side.

use crate::connection::Transport;
use crate::error::JsonResult;
use crate::protocol::RespValue;
use tracing::debug;

use super::command::{self, JsonCommand, SetMode};
use super::options::GetOptions;
use super::reply::{self, KeyValue};

/// JSON commands over any [`Transport`].
///
/// # Example
///
/// ```ignore
/// use flashjson::{Connection, ConnectionConfig, JsonClient, SetMode};
///
/// let conn = Connection::connect(&ConnectionConfig::default()).await?;
/// let mut json = JsonClient::new(conn);
///
/// json.set("obj", ".", r#"{"name":"Leonard Cohen"}"#, SetMode::Always).await?;
/// assert_eq!(json.type_of("obj", Some(".name")).await?.as_deref(), Some("string"));
/// ```
pub struct JsonClient<T> {
    transport: T,
}

impl<T: Transport> JsonClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    async fn call(&mut self, key: &str, command: JsonCommand) -> JsonResult<RespValue> {
        debug!(command = command.name(), key, "Sending JSON command");
        let reply = self.transport.request(command.into_resp()).await?;
        if let RespValue::Error(msg) = &reply {
            debug!(key, error = %msg, "Server rejected command");
        }
        Ok(reply)
    }

    /// Stores `value` at `path`. Returns `Some("OK")` when written and
    /// `None` when `mode` prevented the write.
    pub async fn set(
        &mut self,
        key: &str,
        path: &str,
        value: &str,
        mode: SetMode,
    ) -> JsonResult<Option<String>> {
        let reply = self.call(key, command::set(key, path, value, mode)).await?;
        reply::nilable_string(reply)
    }

    /// The whole document at `key`, or `None` if the key does not exist.
    pub async fn get(&mut self, key: &str) -> JsonResult<Option<String>> {
        self.get_with(key, &GetOptions::default(), &[]).await
    }

    /// The values at `paths`. With more than one path the server answers
    /// with an object keyed by path.
    pub async fn get_paths(&mut self, key: &str, paths: &[&str]) -> JsonResult<Option<String>> {
        self.get_with(key, &GetOptions::default(), paths).await
    }

    /// Like [`get_paths`](Self::get_paths) with formatting options.
    pub async fn get_with(
        &mut self,
        key: &str,
        options: &GetOptions,
        paths: &[&str],
    ) -> JsonResult<Option<String>> {
        let reply = self.call(key, command::get(key, options, paths)).await?;
        reply::nilable_string(reply)
    }

    /// Reads `path` from each of `keys`. The result has one entry per key,
    /// in the same order, with `None` for missing keys. An empty `keys`
    /// returns an empty list without a round trip.
    pub async fn mget(&mut self, path: &str, keys: &[&str]) -> JsonResult<Vec<KeyValue>> {
        let Some(&first) = keys.first() else {
            return Ok(Vec::new());
        };
        let reply = self.call(first, command::mget(path, keys)).await?;
        reply::key_values(keys, reply)
    }

    /// Deletes the value at `path` (the whole key when `None`). Returns the
    /// number of values removed.
    pub async fn del(&mut self, key: &str, path: Option<&str>) -> JsonResult<i64> {
        let reply = self.call(key, command::del(key, path)).await?;
        reply::integer(reply)
    }

    /// The JSON type name at `path`, or `None` if the key does not exist.
    pub async fn type_of(&mut self, key: &str, path: Option<&str>) -> JsonResult<Option<String>> {
        let reply = self.call(key, command::type_of(key, path)).await?;
        reply::nilable_string(reply)
    }

    /// Adds `increment` to the number at `path` and returns the new number
    /// as the server formats it.
    pub async fn numincrby(&mut self, key: &str, path: &str, increment: f64) -> JsonResult<String> {
        let reply = self
            .call(key, command::num_incr_by(key, path, increment))
            .await?;
        reply::string(reply)
    }

    /// Multiplies the number at `path` by `factor`.
    pub async fn nummultby(&mut self, key: &str, path: &str, factor: f64) -> JsonResult<String> {
        let reply = self
            .call(key, command::num_mult_by(key, path, factor))
            .await?;
        reply::string(reply)
    }

    /// Length of the string at `path`.
    ///
    /// A missing key answers nil, which is reported as
    /// [`JsonError::ProtocolMismatch`](crate::JsonError::ProtocolMismatch).
    pub async fn strlen(&mut self, key: &str, path: Option<&str>) -> JsonResult<i64> {
        let reply = self.call(key, command::str_len(key, path)).await?;
        reply::integer(reply)
    }

    /// Appends `value` (a JSON string, quotes included) and returns the new
    /// length.
    pub async fn strappend(
        &mut self,
        key: &str,
        path: Option<&str>,
        value: &str,
    ) -> JsonResult<i64> {
        let reply = self
            .call(key, command::str_append(key, path, value))
            .await?;
        reply::integer(reply)
    }

    /// Appends `values` to the array at `path` and returns its new length.
    pub async fn arrappend(&mut self, key: &str, path: &str, values: &[&str]) -> JsonResult<i64> {
        let reply = self
            .call(key, command::arr_append(key, path, values))
            .await?;
        reply::integer(reply)
    }

    /// Inserts `values` before `index` and returns the new length.
    pub async fn arrinsert(
        &mut self,
        key: &str,
        path: &str,
        index: i64,
        values: &[&str],
    ) -> JsonResult<i64> {
        let reply = self
            .call(key, command::arr_insert(key, path, index, values))
            .await?;
        reply::integer(reply)
    }

    /// Keeps only `start..=stop` and returns the new length.
    pub async fn arrtrim(&mut self, key: &str, path: &str, start: i64, stop: i64) -> JsonResult<i64> {
        let reply = self
            .call(key, command::arr_trim(key, path, start, stop))
            .await?;
        reply::integer(reply)
    }

    /// Removes and returns the element at `index` (the last one when
    /// `None`). Returns `None` for an empty array.
    pub async fn arrpop(
        &mut self,
        key: &str,
        path: Option<&str>,
        index: Option<i64>,
    ) -> JsonResult<Option<String>> {
        let reply = self.call(key, command::arr_pop(key, path, index)).await?;
        reply::nilable_string(reply)
    }

    /// Length of the array at `path`. A missing key answers nil and is
    /// reported as [`JsonError::ProtocolMismatch`](crate::JsonError::ProtocolMismatch).
    pub async fn arrlen(&mut self, key: &str, path: Option<&str>) -> JsonResult<i64> {
        let reply = self.call(key, command::arr_len(key, path)).await?;
        reply::integer(reply)
    }

    /// Position of the first element equal to `value`, or -1.
    pub async fn arrindex(
        &mut self,
        key: &str,
        path: &str,
        value: &str,
        start: Option<i64>,
        stop: Option<i64>,
    ) -> JsonResult<i64> {
        let reply = self
            .call(key, command::arr_index(key, path, value, start, stop))
            .await?;
        reply::integer(reply)
    }

    /// Number of keys in the object at `path`. A missing key answers nil and
    /// is reported as [`JsonError::ProtocolMismatch`](crate::JsonError::ProtocolMismatch).
    pub async fn objlen(&mut self, key: &str, path: Option<&str>) -> JsonResult<i64> {
        let reply = self.call(key, command::obj_len(key, path)).await?;
        reply::integer(reply)
    }

    /// Object keys in document order. A missing key answers nil and is
    /// reported as [`JsonError::ProtocolMismatch`](crate::JsonError::ProtocolMismatch).
    pub async fn objkeys(&mut self, key: &str, path: Option<&str>) -> JsonResult<Vec<String>> {
        let reply = self.call(key, command::obj_keys(key, path)).await?;
        reply::string_list(reply)
    }

    /// Empties arrays and objects and zeroes numbers at `path`. Returns how
    /// many values were cleared.
    pub async fn clear(&mut self, key: &str, path: Option<&str>) -> JsonResult<i64> {
        let reply = self.call(key, command::clear(key, path)).await?;
        reply::integer(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionError;
    use crate::error::JsonError;
    use crate::json::reply::Shape;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    const JSON: &str = r#"{"name":"Leonard Cohen","lastSeen":1478476800,"loggedOut":true}"#;

    /// Records every request and answers from a queue of canned replies.
    #[derive(Default)]
    struct Scripted {
        sent: Vec<Vec<String>>,
        replies: VecDeque<Result<RespValue, ConnectionError>>,
    }

    impl Scripted {
        fn replying(replies: Vec<RespValue>) -> Self {
            Self {
                sent: Vec::new(),
                replies: replies.into_iter().map(Ok).collect(),
            }
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn request(&mut self, command: RespValue) -> Result<RespValue, ConnectionError> {
            let tokens = command
                .as_array()
                .expect("requests are arrays")
                .iter()
                .map(|t| t.as_str().expect("tokens are text").to_string())
                .collect();
            self.sent.push(tokens);
            self.replies.pop_front().expect("no scripted reply left")
        }
    }

    fn client(replies: Vec<RespValue>) -> JsonClient<Scripted> {
        JsonClient::new(Scripted::replying(replies))
    }

    fn bulk(s: &str) -> RespValue {
        RespValue::bulk_string(s.to_string())
    }

    fn sent(json: &JsonClient<Scripted>) -> &[Vec<String>] {
        &json.transport().sent
    }

    #[tokio::test]
    async fn test_set_and_modes() {
        let mut json = client(vec![RespValue::ok(), RespValue::Null, RespValue::Null]);

        assert_eq!(
            json.set("obj", ".", JSON, SetMode::Always).await.unwrap().as_deref(),
            Some("OK")
        );
        assert_eq!(json.set("obj", ".", JSON, SetMode::IfAbsent).await.unwrap(), None);
        assert_eq!(json.set("obj", ".", "true", SetMode::IfPresent).await.unwrap(), None);

        assert_eq!(
            sent(&json),
            [
                vec!["JSON.SET", "obj", ".", JSON],
                vec!["JSON.SET", "obj", ".", JSON, "NX"],
                vec!["JSON.SET", "obj", ".", "true", "XX"],
            ]
        );
    }

    #[tokio::test]
    async fn test_get_variants() {
        let pretty = "{#___\".name\":_\"Leonard Cohen\",#___\".loggedOut\":_true#}";
        let mut json = client(vec![bulk(JSON), RespValue::Null, bulk(pretty)]);

        assert_eq!(json.get("obj").await.unwrap().as_deref(), Some(JSON));
        assert_eq!(json.get_paths("gone", &[".name"]).await.unwrap(), None);

        let options = GetOptions::builder()
            .indent("___")
            .newline("#")
            .no_escape(true)
            .space("_")
            .build();
        let result = json
            .get_with("obj", &options, &[".name", ".loggedOut"])
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some(pretty));

        assert_eq!(sent(&json)[0], ["JSON.GET", "obj"]);
        assert_eq!(sent(&json)[1], ["JSON.GET", "gone", ".name"]);
        assert_eq!(
            sent(&json)[2],
            [
                "JSON.GET", "obj", "INDENT", "___", "NEWLINE", "#", "SPACE", "_", "NOESCAPE",
                ".name", ".loggedOut"
            ]
        );
    }

    #[tokio::test]
    async fn test_mget_keeps_request_order() {
        let mut json = client(vec![RespValue::array(vec![
            bulk(JSON),
            RespValue::Null,
            bulk("{}"),
        ])]);

        let results = json.mget(".", &["obj1", "obj2", "obj3"]).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], KeyValue::new("obj1", Some(JSON.to_string())));
        assert_eq!(results[1], KeyValue::new("obj2", None));
        assert_eq!(results[2], KeyValue::new("obj3", Some("{}".to_string())));
        assert_eq!(sent(&json)[0], ["JSON.MGET", "obj1", "obj2", "obj3", "."]);
    }

    #[tokio::test]
    async fn test_mget_without_keys_sends_nothing() {
        let mut json = client(vec![]);

        assert!(json.mget(".", &[]).await.unwrap().is_empty());
        assert!(sent(&json).is_empty());
    }

    #[tokio::test]
    async fn test_del_then_get_is_absent() {
        let mut json = client(vec![RespValue::integer(1), RespValue::Null]);
        assert_eq!(json.del("obj", None).await.unwrap(), 1);
        assert_eq!(json.get("obj").await.unwrap(), None);
        assert_eq!(sent(&json)[0], ["JSON.DEL", "obj"]);
    }

    #[tokio::test]
    async fn test_type_names() {
        let mut json = client(vec![
            RespValue::simple_string("object"),
            RespValue::simple_string("string"),
            RespValue::simple_string("boolean"),
            RespValue::simple_string("integer"),
            RespValue::Null,
        ]);

        assert_eq!(json.type_of("obj", None).await.unwrap().as_deref(), Some("object"));
        assert_eq!(json.type_of("obj", Some(".name")).await.unwrap().as_deref(), Some("string"));
        assert_eq!(
            json.type_of("obj", Some(".loggedOut")).await.unwrap().as_deref(),
            Some("boolean")
        );
        assert_eq!(
            json.type_of("obj", Some(".lastSeen")).await.unwrap().as_deref(),
            Some("integer")
        );
        assert_eq!(json.type_of("nope", None).await.unwrap(), None);
        assert_eq!(sent(&json)[1], ["JSON.TYPE", "obj", ".name"]);
    }

    #[tokio::test]
    async fn test_numeric_ops() {
        let mut json = client(vec![bulk("1478476923.456"), bulk("182528888482.9")]);

        let incremented = json.numincrby("obj", ".lastSeen", 123.456).await.unwrap();
        assert_eq!(incremented, "1478476923.456");
        let multiplied = json.nummultby("obj", ".lastSeen", 123.456).await.unwrap();
        assert_eq!(multiplied, "182528888482.9");

        assert_eq!(
            sent(&json),
            [
                vec!["JSON.NUMINCRBY", "obj", ".lastSeen", "123.456"],
                vec!["JSON.NUMMULTBY", "obj", ".lastSeen", "123.456"],
            ]
        );
    }

    #[tokio::test]
    async fn test_strings() {
        let mut json = client(vec![RespValue::integer(3), RespValue::integer(6)]);
        assert_eq!(json.strlen("foo", Some(".")).await.unwrap(), 3);
        assert_eq!(json.strappend("foo", Some("."), "\"baz\"").await.unwrap(), 6);
        assert_eq!(sent(&json)[1], ["JSON.STRAPPEND", "foo", ".", "\"baz\""]);
    }

    #[tokio::test]
    async fn test_arrays() {
        let mut json = client(vec![
            RespValue::integer(1),
            RespValue::integer(3),
            RespValue::integer(1),
            RespValue::integer(1),
            RespValue::integer(0),
            bulk("-1"),
            RespValue::Null,
        ]);

        assert_eq!(json.arrappend("arr", ".", &["0"]).await.unwrap(), 1);
        assert_eq!(json.arrinsert("arr", ".", 0, &["-2", "-1"]).await.unwrap(), 3);
        assert_eq!(json.arrtrim("arr", ".", 1, 1).await.unwrap(), 1);
        assert_eq!(json.arrlen("arr", None).await.unwrap(), 1);
        assert_eq!(json.arrindex("arr", ".", "-1", None, None).await.unwrap(), 0);
        assert_eq!(json.arrpop("arr", None, None).await.unwrap().as_deref(), Some("-1"));
        assert_eq!(json.arrpop("arr", None, Some(0)).await.unwrap(), None);

        assert_eq!(
            sent(&json),
            [
                vec!["JSON.ARRAPPEND", "arr", ".", "0"],
                vec!["JSON.ARRINSERT", "arr", ".", "0", "-2", "-1"],
                vec!["JSON.ARRTRIM", "arr", ".", "1", "1"],
                vec!["JSON.ARRLEN", "arr"],
                vec!["JSON.ARRINDEX", "arr", ".", "-1"],
                vec!["JSON.ARRPOP", "arr"],
                vec!["JSON.ARRPOP", "arr", ".", "0"],
            ]
        );
    }

    #[tokio::test]
    async fn test_objects_and_clear() {
        let mut json = client(vec![
            RespValue::integer(3),
            RespValue::array(vec![bulk("name"), bulk("lastSeen"), bulk("loggedOut")]),
            RespValue::integer(1),
        ]);

        assert_eq!(json.objlen("obj", Some(".")).await.unwrap(), 3);
        assert_eq!(
            json.objkeys("obj", Some(".")).await.unwrap(),
            ["name", "lastSeen", "loggedOut"]
        );
        assert_eq!(json.clear("obj", None).await.unwrap(), 1);
        assert_eq!(sent(&json)[2], ["JSON.CLEAR", "obj"]);
    }

    #[tokio::test]
    async fn test_server_error_is_not_swallowed() {
        let mut json = client(vec![RespValue::error(
            "ERR wrong type of path value - expected a number but found string",
        )]);

        let err = json.numincrby("obj", ".name", 1.0).await.unwrap_err();
        assert_eq!(
            err.server_message(),
            Some("ERR wrong type of path value - expected a number but found string")
        );
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_reported() {
        let mut json = client(vec![bulk("3")]);
        match json.objlen("obj", None).await {
            Err(JsonError::ProtocolMismatch { expected, actual }) => {
                assert_eq!(expected, Shape::Integer);
                assert_eq!(actual, "bulk string");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_length_of_missing_key_is_mismatch() {
        let mut json = client(vec![RespValue::Null, RespValue::Null]);

        match json.strlen("gone", None).await {
            Err(JsonError::ProtocolMismatch { expected, actual }) => {
                assert_eq!(expected, Shape::Integer);
                assert_eq!(actual, "nil");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            json.objkeys("gone", None).await,
            Err(JsonError::ProtocolMismatch { expected: Shape::StringList, .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let mut json = JsonClient::new(Scripted {
            sent: Vec::new(),
            replies: VecDeque::from([Err(ConnectionError::Timeout(
                std::time::Duration::from_millis(10),
            ))]),
        });

        let err = json.get("obj").await.unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(
            err,
            JsonError::Transport(ConnectionError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_borrowed_transport() {
        let mut transport = Scripted::replying(vec![RespValue::integer(2)]);
        {
            let mut json = JsonClient::new(&mut transport);
            assert_eq!(json.objlen("obj", None).await.unwrap(), 2);
        }
        assert_eq!(transport.sent.len(), 1);
    }
}
