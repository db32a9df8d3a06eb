use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::RequestId;

/// Named parameters for a call.
///
/// Always a JSON object: a request that omits `params` (or sends `null`)
/// normalizes to an empty map, so a dispatcher never observes "no params".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(Map<String, Value>);

impl RequestParams {
    pub fn new() -> Self {
        RequestParams(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    fn deserialize_or_empty<'de, D>(deserializer: D) -> Result<RequestParams, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `"params": null` counts as absent
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(RequestParams(map.unwrap_or_default()))
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams(map)
    }
}

impl FromIterator<(String, Value)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        RequestParams(iter.into_iter().collect())
    }
}

/// A JSON-RPC call envelope: `{ method, params?, id? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub method: String,
    #[serde(
        default,
        deserialize_with = "RequestParams::deserialize_or_empty",
        skip_serializing_if = "RequestParams::is_empty"
    )]
    pub params: RequestParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: RequestParams::default(),
            id: None,
        }
    }

    pub fn with_params(mut self, params: impl Into<RequestParams>) -> Self {
        self.params = params.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<RequestId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }
}
