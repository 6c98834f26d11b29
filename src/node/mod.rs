//! The mutable JSON document tree.
//!
//! A [`Node`] is a cheap handle (`Rc<RefCell<…>>`) onto one vertex of the
//! tree. Containers own their children; every child holds a weak
//! back-reference to its parent, so dropping the root drops the whole tree.
//! Nodes decoded from input remember the byte range that produced them and
//! reproduce it verbatim on serialization until they (or an ancestor of
//! theirs) are mutated.
//!
//! The tree is deliberately single-threaded: handles are `!Send`/`!Sync`,
//! which is what makes the interior-mutability discipline of the lazy value
//! cache sound.

mod accessors;
mod compare;
mod mutators;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use bytes::Bytes;

use crate::encoder::marshal;

/// Tagged kind of a node, exactly one per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Materialized native value of a node.
///
/// Container variants alias the node's own children: the vector/map elements
/// are the same shared handles, not copies.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Node>),
    Object(BTreeMap<String, Node>),
}

pub(crate) struct NodeData {
    pub(crate) kind: ValueType,
    pub(crate) parent: Option<Weak<RefCell<NodeData>>>,
    pub(crate) key: Option<String>,
    pub(crate) index: Option<usize>,
    pub(crate) children: BTreeMap<String, Node>,
    pub(crate) data: Option<Bytes>,
    pub(crate) borders: (usize, usize),
    pub(crate) value: Option<Value>,
    pub(crate) modified: bool,
}

impl Drop for NodeData {
    // Dismantles deep chains iteratively; the default recursive drop glue
    // would exhaust the stack near the nesting limit.
    fn drop(&mut self) {
        self.value = None;
        let mut queue: Vec<Node> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(node) = queue.pop() {
            // Strip a child only when this queue holds the last handle;
            // sub-trees still reachable elsewhere must stay intact.
            if Rc::strong_count(&node.inner) == 1 {
                let mut d = node.inner.borrow_mut();
                d.value = None;
                queue.extend(std::mem::take(&mut d.children).into_values());
            }
        }
    }
}

impl NodeData {
    fn detached(kind: ValueType, key: &str) -> Self {
        Self {
            kind,
            parent: None,
            key: Some(key.to_string()),
            index: None,
            children: BTreeMap::new(),
            data: None,
            borders: (0, 0),
            value: None,
            modified: true,
        }
    }
}

/// Handle onto one vertex of a JSON document tree.
///
/// `Clone` duplicates the handle, not the vertex: both handles see and apply
/// the same mutations. Use [`Node::deep_clone`] for a detached structural
/// copy.
#[derive(Clone)]
pub struct Node {
    pub(crate) inner: Rc<RefCell<NodeData>>,
}

impl Node {
    pub(crate) fn from_data(data: NodeData) -> Self {
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// True iff both handles point at the same vertex.
    pub(crate) fn same_node(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Creates a detached null node.
    #[must_use]
    pub fn null(key: &str) -> Node {
        let mut data = NodeData::detached(ValueType::Null, key);
        data.value = Some(Value::Null);
        Node::from_data(data)
    }

    /// Creates a detached number node.
    #[must_use]
    pub fn number(key: &str, value: f64) -> Node {
        let mut data = NodeData::detached(ValueType::Number, key);
        data.value = Some(Value::Number(value));
        Node::from_data(data)
    }

    /// Creates a detached string node holding already-decoded text.
    #[must_use]
    pub fn string(key: &str, value: impl Into<String>) -> Node {
        let mut data = NodeData::detached(ValueType::String, key);
        data.value = Some(Value::String(value.into()));
        Node::from_data(data)
    }

    /// Creates a detached boolean node.
    #[must_use]
    pub fn boolean(key: &str, value: bool) -> Node {
        let mut data = NodeData::detached(ValueType::Bool, key);
        data.value = Some(Value::Bool(value));
        Node::from_data(data)
    }

    /// Creates a detached array node, re-parenting the given elements.
    #[must_use]
    pub fn array(key: &str, elements: Vec<Node>) -> Node {
        let node = Node::from_data(NodeData::detached(ValueType::Array, key));
        for element in elements {
            // A freshly created container cannot be a descendant of anything,
            // so adoption cannot fail.
            let _ = node.adopt(None, element);
        }
        node
    }

    /// Creates a detached object node, re-parenting the given members.
    #[must_use]
    pub fn object(key: &str, members: BTreeMap<String, Node>) -> Node {
        let node = Node::from_data(NodeData::detached(ValueType::Object, key));
        for (member_key, member) in members {
            let _ = node.adopt(Some(member_key), member);
        }
        node
    }

    /// Node created by the decoder for the token starting at `start`.
    ///
    /// The node is attached to `parent` right away: array parents assign the
    /// next free index, object parents require `key`.
    pub(crate) fn parsed(
        parent: Option<&Node>,
        data: &Bytes,
        start: usize,
        kind: ValueType,
        key: Option<String>,
    ) -> crate::error::Result<Node> {
        let node = Node::from_data(NodeData {
            kind,
            parent: None,
            key: None,
            index: None,
            children: BTreeMap::new(),
            data: Some(data.clone()),
            borders: (start, 0),
            value: None,
            modified: false,
        });

        match parent {
            None => {
                node.inner.borrow_mut().key = key;
            }
            Some(p) if p.is_array() => {
                let size = p.size();
                node.inner.borrow_mut().index = Some(size);
                node.inner.borrow_mut().parent = Some(Rc::downgrade(&p.inner));
                p.inner
                    .borrow_mut()
                    .children
                    .insert(size.to_string(), node.clone());
            }
            Some(p) if p.is_object() => {
                let key = key.ok_or_else(|| {
                    crate::error::Error::type_mismatch("key is required for object member")
                })?;
                node.inner.borrow_mut().key = Some(key.clone());
                node.inner.borrow_mut().parent = Some(Rc::downgrade(&p.inner));
                if let Some(old) = p.inner.borrow_mut().children.insert(key, node.clone()) {
                    old.inner.borrow_mut().parent = None;
                }
            }
            Some(_) => {
                return Err(crate::error::Error::type_mismatch(
                    "parent node is not a container",
                ))
            }
        }

        Ok(node)
    }

    /// Closes the source window of a node built by the decoder.
    pub(crate) fn close_border(&self, end: usize) {
        self.inner.borrow_mut().borders.1 = end;
    }

    pub(crate) fn ready(&self) -> bool {
        self.inner.borrow().borders.1 != 0
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.inner.borrow();
        f.debug_struct("Node")
            .field("kind", &d.kind)
            .field("key", &d.key)
            .field("index", &d.index)
            .field("children", &d.children.len())
            .field("borders", &d.borders)
            .field("modified", &d.modified)
            .finish()
    }
}

/// Renders the node's JSON text: original source bytes while unmodified,
/// a fresh marshal otherwise.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = self.source() {
            return f.write_str(&String::from_utf8_lossy(&source));
        }
        match marshal(self) {
            Ok(bytes) => f.write_str(&String::from_utf8_lossy(&bytes)),
            Err(err) => write!(f, "error: {err}"),
        }
    }
}

/// Unwraps a decode or lookup result, panicking on failure.
///
/// For callers that treat a malformed document as a programming bug.
#[must_use]
pub fn must(result: crate::error::Result<Node>) -> Node {
    match result {
        Ok(node) => node,
        Err(err) => panic!("{err}"),
    }
}
