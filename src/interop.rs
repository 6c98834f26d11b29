//! Conversions between the document tree and `serde_json::Value`.
//!
//! The tree is the right shape for byte-faithful editing and path queries;
//! `serde_json::Value` is what the wider ecosystem consumes. These
//! conversions are lossless at the value level (source ranges and
//! modification state do not survive a round trip).

use std::collections::BTreeMap;

use serde::ser::{Error as SerError, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{Error, Result};
use crate::node::{Node, ValueType};

impl Node {
    /// Materializes this sub-tree as a `serde_json::Value`.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        match self.kind() {
            ValueType::Null => Ok(serde_json::Value::Null),
            ValueType::Bool => Ok(serde_json::Value::Bool(self.get_bool()?)),
            ValueType::Number => {
                let number = self.get_numeric()?;
                serde_json::Number::from_f64(number)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| {
                        Error::type_mismatch("number value is not representable in JSON")
                    })
            }
            ValueType::String => Ok(serde_json::Value::String(self.get_string()?)),
            ValueType::Array => {
                let mut items = Vec::with_capacity(self.size());
                for element in self.get_array()? {
                    items.push(element.to_value()?);
                }
                Ok(serde_json::Value::Array(items))
            }
            ValueType::Object => {
                let mut members = serde_json::Map::with_capacity(self.size());
                for (key, member) in self.get_object()? {
                    members.insert(key, member.to_value()?);
                }
                Ok(serde_json::Value::Object(members))
            }
        }
    }

    /// Builds a detached (modified) tree from a `serde_json::Value`.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Node {
        match value {
            serde_json::Value::Null => Node::null(""),
            serde_json::Value::Bool(b) => Node::boolean("", *b),
            serde_json::Value::Number(n) => Node::number("", n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Node::string("", s.clone()),
            serde_json::Value::Array(items) => {
                Node::array("", items.iter().map(Node::from_value).collect())
            }
            serde_json::Value::Object(members) => {
                let members: BTreeMap<String, Node> = members
                    .iter()
                    .map(|(k, v)| (k.clone(), Node::from_value(v)))
                    .collect();
                Node::object("", members)
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.kind() {
            ValueType::Null => serializer.serialize_unit(),
            ValueType::Bool => serializer
                .serialize_bool(self.get_bool().map_err(S::Error::custom)?),
            ValueType::Number => serializer
                .serialize_f64(self.get_numeric().map_err(S::Error::custom)?),
            ValueType::String => serializer
                .serialize_str(&self.get_string().map_err(S::Error::custom)?),
            ValueType::Array => {
                let elements = self.get_array().map_err(S::Error::custom)?;
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in &elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            ValueType::Object => {
                let members = self.get_object().map_err(S::Error::custom)?;
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, member) in &members {
                    map.serialize_entry(key, member)?;
                }
                map.end()
            }
        }
    }
}
