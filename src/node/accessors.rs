//! Read-side node API: predicates, lookups, lazy value materialization and
//! sub-tree collectors.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Weak;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::escape::unquote;
use crate::literals::parse_float_literal;

use super::{Node, Value, ValueType};

impl Node {
    /// Tagged kind of this node.
    #[must_use]
    pub fn kind(&self) -> ValueType {
        self.inner.borrow().kind
    }

    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind() == ValueType::Array
    }

    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.kind() == ValueType::Object
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind() == ValueType::Null
    }

    #[inline]
    #[must_use]
    pub fn is_bool(&self) -> bool {
        self.kind() == ValueType::Bool
    }

    #[inline]
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind() == ValueType::String
    }

    #[inline]
    #[must_use]
    pub fn is_number(&self) -> bool {
        self.kind() == ValueType::Number
    }

    /// True for arrays and objects.
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.kind(), ValueType::Array | ValueType::Object)
    }

    /// True once this node or any ancestor has been mutated since parse.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.inner.borrow().modified
    }

    /// Member name of this node within its parent object, if any.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        self.inner.borrow().key.clone()
    }

    /// Position of this node within its parent array, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.inner.borrow().index
    }

    /// Number of direct children; zero for non-containers.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// True when the node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().children.is_empty()
    }

    /// Whether a direct child is stored under `key`. Array children are
    /// stored under the string form of their index.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.inner.borrow().children.contains_key(key)
    }

    /// Direct child names: member names for objects, stringified indices for
    /// arrays.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().children.keys().cloned().collect()
    }

    /// Every member name appearing in this object or in any container below
    /// it, each once. Empty for non-objects.
    #[must_use]
    pub fn unique_keys(&self) -> Vec<String> {
        if !self.is_object() {
            return Vec::new();
        }

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if node.is_object() {
                for key in node.keys() {
                    seen.insert(key);
                }
            }
            for child in node.sorted_children() {
                if child.is_container() {
                    stack.push(child);
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Looks up an object member.
    pub fn get_key(&self, key: &str) -> Result<Node> {
        if !self.is_object() {
            return Err(Error::type_mismatch(format!(
                "target node is not object type. got: {}",
                self.kind()
            )));
        }
        self.inner
            .borrow()
            .children
            .get(key)
            .cloned()
            .ok_or_else(|| Error::key_not_found(key))
    }

    /// Looks up an array element. Negative indices count from the end.
    pub fn get_index(&self, index: isize) -> Result<Node> {
        if !self.is_array() {
            return Err(Error::type_mismatch(format!(
                "target node is not array type. got: {}",
                self.kind()
            )));
        }

        let size = self.size() as isize;
        let real = if index < 0 { index + size } else { index };
        if real < 0 || real >= size {
            return Err(Error::index_out_of_range(index));
        }

        self.inner
            .borrow()
            .children
            .get(&real.to_string())
            .cloned()
            .ok_or_else(|| Error::index_out_of_range(index))
    }

    /// Parent container, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Node> {
        self.inner
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Node { inner })
    }

    /// Topmost ancestor of this node (itself for detached nodes).
    #[must_use]
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Original input bytes of this node, available while it is ready and
    /// unmodified.
    #[must_use]
    pub fn source(&self) -> Option<Bytes> {
        let d = self.inner.borrow();
        if d.borders.1 != 0 && !d.modified {
            d.data
                .as_ref()
                .map(|data| data.slice(d.borders.0..d.borders.1))
        } else {
            None
        }
    }

    /// Path expression of this node from its root: `$`, then `['key']` for
    /// object steps and `[index]` for array steps.
    #[must_use]
    pub fn path(&self) -> String {
        let Some(parent) = self.parent() else {
            return "$".to_string();
        };

        let mut path = parent.path();
        let d = self.inner.borrow();
        if let Some(index) = d.index {
            path.push_str(&format!("[{index}]"));
        } else if let Some(key) = &d.key {
            path.push_str(&format!("['{key}']"));
        }
        path
    }

    /// Materialized native value, computed from the stored source on first
    /// access and cached.
    pub fn value(&self) -> Result<Value> {
        if let Some(value) = &self.inner.borrow().value {
            return Ok(value.clone());
        }

        let computed = self.materialize()?;
        self.inner.borrow_mut().value = Some(computed.clone());
        Ok(computed)
    }

    fn materialize(&self) -> Result<Value> {
        match self.kind() {
            ValueType::Null => Ok(Value::Null),
            ValueType::Number => {
                let source = self.raw_source()?;
                parse_float_literal(&source).map(Value::Number)
            }
            ValueType::String => {
                let source = self.raw_source()?;
                unquote(&source, b'"').map(Value::String)
            }
            ValueType::Bool => {
                let source = self.raw_source()?;
                let first = *source
                    .first()
                    .ok_or_else(|| Error::type_mismatch("empty boolean value"))?;
                Ok(Value::Bool(first == b't' || first == b'T'))
            }
            ValueType::Array => {
                let d = self.inner.borrow();
                let mut elements: Vec<Option<Node>> = vec![None; d.children.len()];
                for child in d.children.values() {
                    let index = child
                        .index()
                        .filter(|&i| i < elements.len())
                        .ok_or_else(|| Error::type_mismatch("array element index out of shape"))?;
                    elements[index] = Some(child.clone());
                }
                let elements = elements
                    .into_iter()
                    .enumerate()
                    .map(|(i, e)| {
                        e.ok_or_else(|| {
                            Error::type_mismatch(format!("array element {i} is not found"))
                        })
                    })
                    .collect::<Result<Vec<Node>>>()?;
                Ok(Value::Array(elements))
            }
            ValueType::Object => {
                let d = self.inner.borrow();
                let members: BTreeMap<String, Node> = d
                    .children
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok(Value::Object(members))
            }
        }
    }

    fn raw_source(&self) -> Result<Bytes> {
        let d = self.inner.borrow();
        if d.borders.1 == 0 {
            return Err(Error::not_serializable("node has no source bytes"));
        }
        d.data
            .as_ref()
            .map(|data| data.slice(d.borders.0..d.borders.1))
            .ok_or_else(|| Error::not_serializable("node has no source bytes"))
    }

    /// Null accessor, present for API symmetry with the other kinds.
    pub fn get_null(&self) -> Result<()> {
        if !self.is_null() {
            return Err(Error::type_mismatch("node is not null"));
        }
        Ok(())
    }

    /// Numeric value of a number node.
    pub fn get_numeric(&self) -> Result<f64> {
        if !self.is_number() {
            return Err(Error::type_mismatch("node is not number"));
        }
        match self.value()? {
            Value::Number(n) => Ok(n),
            _ => Err(Error::type_mismatch("node is not number")),
        }
    }

    /// Decoded text of a string node.
    pub fn get_string(&self) -> Result<String> {
        if !self.is_string() {
            return Err(Error::type_mismatch("node is not string"));
        }
        match self.value()? {
            Value::String(s) => Ok(s),
            _ => Err(Error::type_mismatch("node is not string")),
        }
    }

    /// Boolean value of a bool node.
    pub fn get_bool(&self) -> Result<bool> {
        if !self.is_bool() {
            return Err(Error::type_mismatch("node is not bool"));
        }
        match self.value()? {
            Value::Bool(b) => Ok(b),
            _ => Err(Error::type_mismatch("node is not bool")),
        }
    }

    /// Elements of an array node, in index order.
    pub fn get_array(&self) -> Result<Vec<Node>> {
        if !self.is_array() {
            return Err(Error::type_mismatch(format!(
                "node is not array. got: {}",
                self.kind()
            )));
        }
        match self.value()? {
            Value::Array(elements) => Ok(elements),
            _ => Err(Error::type_mismatch("node is not array")),
        }
    }

    /// Members of an object node.
    pub fn get_object(&self) -> Result<BTreeMap<String, Node>> {
        if !self.is_object() {
            return Err(Error::type_mismatch("node is not object"));
        }
        match self.value()? {
            Value::Object(members) => Ok(members),
            _ => Err(Error::type_mismatch("node is not object")),
        }
    }

    /// Every string value in this sub-tree, in document order.
    #[must_use]
    pub fn get_strings(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if node.is_string() {
                if let Ok(s) = node.get_string() {
                    out.push(s);
                }
            }
        });
        out
    }

    /// Every whole number in this sub-tree, in document order.
    #[must_use]
    pub fn get_ints(&self) -> Vec<i64> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if node.is_number() {
                if let Ok(n) = node.get_numeric() {
                    if n.fract() == 0.0 {
                        out.push(n as i64);
                    }
                }
            }
        });
        out
    }

    /// Every fractional number in this sub-tree, in document order.
    #[must_use]
    pub fn get_floats(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if node.is_number() {
                if let Ok(n) = node.get_numeric() {
                    if n.fract() != 0.0 {
                        out.push(n);
                    }
                }
            }
        });
        out
    }

    /// Every boolean value in this sub-tree, in document order.
    #[must_use]
    pub fn get_bools(&self) -> Vec<bool> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if node.is_bool() {
                if let Ok(b) = node.get_bool() {
                    out.push(b);
                }
            }
        });
        out
    }

    /// Runs `callback` over each array element in index order.
    pub fn array_each(&self, mut callback: impl FnMut(usize, &Node)) {
        if !self.is_array() {
            return;
        }
        for (i, child) in self.sorted_children().into_iter().enumerate() {
            callback(i, &child);
        }
    }

    /// Runs `callback` over each object member in stored (lexicographic)
    /// key order.
    pub fn object_each(&self, mut callback: impl FnMut(&str, &Node)) {
        if !self.is_object() {
            return;
        }
        let members: Vec<(String, Node)> = {
            let d = self.inner.borrow();
            d.children
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };
        for (key, child) in members {
            callback(&key, &child);
        }
    }

    /// Depth-first walk over the sub-tree, parents before children.
    fn walk(&self, visit: &mut impl FnMut(&Node)) {
        visit(self);
        for child in self.sorted_children() {
            child.walk(visit);
        }
    }

    /// Direct children in deterministic order: arrays by index, objects by
    /// stored key order.
    pub(crate) fn sorted_children(&self) -> Vec<Node> {
        let d = self.inner.borrow();
        match d.kind {
            ValueType::Array => {
                let mut out = Vec::with_capacity(d.children.len());
                for i in 0..d.children.len() {
                    if let Some(child) = d.children.get(&i.to_string()) {
                        out.push(child.clone());
                    }
                }
                out
            }
            ValueType::Object => d.children.values().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Panicking variant of [`Node::get_key`].
    #[must_use]
    pub fn must_key(&self, key: &str) -> Node {
        match self.get_key(key) {
            Ok(node) => node,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`Node::get_index`].
    #[must_use]
    pub fn must_index(&self, index: isize) -> Node {
        match self.get_index(index) {
            Ok(node) => node,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`Node::get_numeric`].
    #[must_use]
    pub fn must_numeric(&self) -> f64 {
        match self.get_numeric() {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`Node::get_string`].
    #[must_use]
    pub fn must_string(&self) -> String {
        match self.get_string() {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`Node::get_bool`].
    #[must_use]
    pub fn must_bool(&self) -> bool {
        match self.get_bool() {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`Node::get_array`].
    #[must_use]
    pub fn must_array(&self) -> Vec<Node> {
        match self.get_array() {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`Node::get_object`].
    #[must_use]
    pub fn must_object(&self) -> BTreeMap<String, Node> {
        match self.get_object() {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`Node::get_null`].
    pub fn must_null(&self) {
        match self.get_null() {
            Ok(()) => (),
            Err(err) => panic!("{err}"),
        }
    }
}
