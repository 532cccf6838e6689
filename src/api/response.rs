// SPDX-License-Identifier: MPL-2.0

//! The backend answers in several shapes. They are classified once here and
//! never inspected anywhere else.

use crate::api::RemoteError;
use crate::config::{BLOGS_ENDPOINT, WRITERS_ENDPOINT};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Blog,
    Writer,
}

impl Resource {
    pub fn endpoint(self) -> &'static str {
        match self {
            Resource::Blog => BLOGS_ENDPOINT,
            Resource::Writer => WRITERS_ENDPOINT,
        }
    }

    /// Key of the array in `{ "<key>": [...] }`
    pub fn collection_key(self) -> &'static str {
        match self {
            Resource::Blog => "blogs",
            Resource::Writer => "writers",
        }
    }

    /// Key of the object in `{ "<key>": {...} }`
    pub fn item_key(self) -> &'static str {
        match self {
            Resource::Blog => "blog",
            Resource::Writer => "writer",
        }
    }
}

/// Every body shape the backend is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `[...]`
    Array(Vec<Value>),
    /// `{ "blogs": [...] }` or `{ "blog": {...} }`
    Keyed(Vec<Value>),
    /// `{ "data": ... }`, classified again one level down
    Data(Box<ResponseShape>),
    /// A bare record with `_id` or `id`
    Single(Value),
    /// Anything else, including `null` and `{ "message": "..." }`
    Empty,
}

impl ResponseShape {
    pub fn classify(resource: Resource, body: Value) -> Self {
        match body {
            Value::Array(items) => ResponseShape::Array(items),
            Value::Object(mut map) => {
                if let Some(Value::Array(items)) = map.remove(resource.collection_key()) {
                    return ResponseShape::Keyed(items);
                }
                if let Some(item @ Value::Object(_)) = map.remove(resource.item_key()) {
                    return ResponseShape::Keyed(vec![item]);
                }
                if map.contains_key("_id") || map.contains_key("id") {
                    return ResponseShape::Single(Value::Object(map));
                }
                if let Some(data) = map.remove("data") {
                    return ResponseShape::Data(Box::new(Self::classify(resource, data)));
                }
                ResponseShape::Empty
            }
            _ => ResponseShape::Empty,
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            ResponseShape::Array(items) | ResponseShape::Keyed(items) => items,
            ResponseShape::Data(inner) => inner.into_items(),
            ResponseShape::Single(item) => vec![item],
            ResponseShape::Empty => Vec::new(),
        }
    }
}

/// Decode a body into a list, whatever its shape.
pub fn decode_list<T: DeserializeOwned>(
    resource: Resource,
    body: Value,
) -> Result<Vec<T>, RemoteError> {
    ResponseShape::classify(resource, body)
        .into_items()
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| {
                RemoteError::invalid_response(format!("malformed {}: {e}", resource.item_key()))
            })
        })
        .collect()
}

/// Decode a body that should hold one record. `Ok(None)` when it holds none.
pub fn decode_one<T: DeserializeOwned>(
    resource: Resource,
    body: Value,
) -> Result<Option<T>, RemoteError> {
    Ok(decode_list(resource, body)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WriterRecord;
    use serde_json::json;

    fn writer(id: &str) -> Value {
        json!({ "_id": id, "name": "Ada", "email": format!("{id}@example.com") })
    }

    #[test]
    fn every_shape_normalizes_to_the_same_list() {
        let shapes = [
            json!([writer("w1")]),
            json!({ "writers": [writer("w1")] }),
            json!({ "data": [writer("w1")] }),
            json!({ "data": { "writers": [writer("w1")] } }),
            writer("w1"),
        ];

        for body in shapes {
            let list: Vec<WriterRecord> = decode_list(Resource::Writer, body.clone()).unwrap();
            assert_eq!(list.len(), 1, "shape {body}");
            assert_eq!(list[0].id, "w1");
        }
    }

    #[test]
    fn unknown_shapes_are_empty() {
        for body in [Value::Null, json!({ "message": "ok" }), json!("text")] {
            let list: Vec<WriterRecord> = decode_list(Resource::Writer, body).unwrap();
            assert!(list.is_empty());
        }
    }

    #[test]
    fn singular_key_wraps_one_record() {
        let body = json!({ "blog": { "_id": "p1", "title": "T", "content": "C", "writer": "w1" } });
        assert_eq!(
            ResponseShape::classify(Resource::Blog, body).into_items().len(),
            1
        );
    }

    #[test]
    fn malformed_record_is_an_error() {
        let body = json!([{ "_id": "w1" }]);
        let err = decode_list::<WriterRecord>(Resource::Writer, body).unwrap_err();
        assert_eq!(err.status, None);
    }
}
