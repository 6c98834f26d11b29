//! Write-side node API: setters, container edits, deletion and deep copy.
//!
//! Every mutator marks the node and its ancestors modified (propagation
//! stops at the first already-modified ancestor), drops the node's source
//! window so [`Node::source`] goes quiet, and refuses edits that would make
//! a node its own descendant.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{Error, Result};

use super::{Node, NodeData, Value, ValueType};

impl Node {
    /// Replaces this node's value, dispatching on the payload kind.
    pub fn set(&self, value: Value) -> Result<()> {
        match value {
            Value::Null => self.set_null(),
            Value::Bool(b) => self.set_bool(b),
            Value::Number(n) => self.set_number(n),
            Value::String(s) => self.set_string(s),
            Value::Array(elements) => self.set_array(elements),
            Value::Object(members) => self.set_object(members),
        }
    }

    /// Turns this node into a null node.
    pub fn set_null(&self) -> Result<()> {
        self.update(ValueType::Null, Value::Null)
    }

    /// Turns this node into a number node.
    pub fn set_number(&self, value: f64) -> Result<()> {
        self.update(ValueType::Number, Value::Number(value))
    }

    /// Turns this node into a string node.
    pub fn set_string(&self, value: impl Into<String>) -> Result<()> {
        self.update(ValueType::String, Value::String(value.into()))
    }

    /// Turns this node into a boolean node.
    pub fn set_bool(&self, value: bool) -> Result<()> {
        self.update(ValueType::Bool, Value::Bool(value))
    }

    /// Turns this node into an array of the given elements.
    pub fn set_array(&self, elements: Vec<Node>) -> Result<()> {
        self.update(ValueType::Array, Value::Array(elements))
    }

    /// Turns this node into an object of the given members.
    pub fn set_object(&self, members: BTreeMap<String, Node>) -> Result<()> {
        self.update(ValueType::Object, Value::Object(members))
    }

    /// Logically replaces this node's value with a deep copy of `other`,
    /// keeping this node's parent linkage intact.
    pub fn set_node(&self, other: &Node) -> Result<()> {
        if self.is_self_or_ancestor(other) {
            return Err(Error::cycle_detected());
        }

        let copy = other.deep_clone();
        let children: Vec<Node> = copy.inner.borrow().children.values().cloned().collect();
        for child in children {
            child.inner.borrow_mut().parent = Some(Rc::downgrade(&self.inner));
        }

        let orphans: Vec<Node> = self.inner.borrow().children.values().cloned().collect();
        for orphan in orphans {
            orphan.inner.borrow_mut().parent = None;
        }

        {
            let c = copy.inner.borrow();
            let mut d = self.inner.borrow_mut();
            d.kind = c.kind;
            d.children = c.children.clone();
            d.data = c.data.clone();
            d.borders = c.borders;
            d.value = c.value.clone();
            d.modified = false;
        }
        self.mark();
        Ok(())
    }

    /// Appends elements to this array node, re-parenting each one (a node
    /// that already lives in another container is first removed from it).
    pub fn append_array(&self, elements: Vec<Node>) -> Result<()> {
        if !self.is_array() {
            return Err(Error::type_mismatch("can't append value to non-array node"));
        }
        for element in &elements {
            if self.is_self_or_ancestor(element) {
                return Err(Error::cycle_detected());
            }
        }

        for element in elements {
            self.adopt(None, element)?;
        }
        self.mark();
        self.clear_source();
        Ok(())
    }

    /// Inserts (or overwrites) one member of this object node.
    pub fn append_object(&self, key: impl Into<String>, value: Node) -> Result<()> {
        if !self.is_object() {
            return Err(Error::type_mismatch(
                "can't append value to non-object node",
            ));
        }
        if self.is_self_or_ancestor(&value) {
            return Err(Error::cycle_detected());
        }

        self.adopt(Some(key.into()), value)?;
        self.mark();
        self.clear_source();
        Ok(())
    }

    /// Removes this node from its parent. A root node is left untouched.
    ///
    /// Array parents rebase the indices of the surviving later elements down
    /// by one so the index keys stay contiguous.
    pub fn delete(&self) -> Result<()> {
        match self.parent() {
            None => Ok(()),
            Some(parent) => parent.remove_child(self),
        }
    }

    /// Removes the array element at `index` (negative counts from the end).
    pub fn delete_index(&self, index: isize) -> Result<()> {
        self.get_index(index)?.delete()
    }

    /// Detached deep copy: no parent, no key, no index; same document
    /// content, byte-for-byte when this sub-tree is unmodified.
    #[must_use]
    pub fn deep_clone(&self) -> Node {
        let copy = self.clone_subtree();
        {
            let mut d = copy.inner.borrow_mut();
            d.parent = None;
            d.key = None;
            d.index = None;
        }
        copy
    }

    fn clone_subtree(&self) -> Node {
        let d = self.inner.borrow();
        // Scalar caches travel with the copy; container caches are rebuilt
        // lazily because they alias children of the source tree.
        let value = match &d.value {
            Some(v @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => {
                Some(v.clone())
            }
            _ => None,
        };

        let copy = Node::from_data(NodeData {
            kind: d.kind,
            parent: None,
            key: d.key.clone(),
            index: d.index,
            children: BTreeMap::new(),
            data: d.data.clone(),
            borders: d.borders,
            value,
            modified: d.modified,
        });

        for (key, child) in &d.children {
            let child_copy = child.clone_subtree();
            child_copy.inner.borrow_mut().parent = Some(Rc::downgrade(&copy.inner));
            copy.inner
                .borrow_mut()
                .children
                .insert(key.clone(), child_copy);
        }
        copy
    }

    /// Marks this node and its ancestors modified, stopping at the first
    /// ancestor that is already marked.
    pub(crate) fn mark(&self) {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            {
                let mut d = node.inner.borrow_mut();
                if d.modified {
                    break;
                }
                d.modified = true;
            }
            current = node.parent();
        }
    }

    fn clear_source(&self) {
        let mut d = self.inner.borrow_mut();
        d.data = None;
        d.borders.1 = 0;
    }

    /// True iff `candidate` is this node or one of its ancestors, which is
    /// exactly the condition under which adopting it would create a cycle.
    pub(crate) fn is_self_or_ancestor(&self, candidate: &Node) -> bool {
        if self.same_node(candidate) {
            return true;
        }
        let mut current = self.parent();
        while let Some(node) = current {
            if node.same_node(candidate) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Attaches `child` under this container: next free index for arrays
    /// (`key == None`), the member name for objects.
    pub(crate) fn adopt(&self, key: Option<String>, child: Node) -> Result<()> {
        if self.is_self_or_ancestor(&child) {
            return Err(Error::cycle_detected());
        }

        if let Some(old_parent) = child.parent() {
            old_parent.remove_child(&child)?;
        }

        {
            let mut c = child.inner.borrow_mut();
            c.parent = Some(Rc::downgrade(&self.inner));
            c.key = key.clone();
        }

        let mut d = self.inner.borrow_mut();
        d.value = None;
        match key {
            None => {
                let size = d.children.len();
                child.inner.borrow_mut().index = Some(size);
                d.children.insert(size.to_string(), child);
            }
            Some(k) => {
                child.inner.borrow_mut().index = None;
                if let Some(old) = d.children.insert(k, child) {
                    old.inner.borrow_mut().parent = None;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn remove_child(&self, child: &Node) -> Result<()> {
        if !self.is_container() {
            return Err(Error::type_mismatch(format!(
                "can't remove value from non-container node. got: {}",
                self.kind()
            )));
        }
        if !child.parent().is_some_and(|p| p.same_node(self)) {
            return Err(Error::type_mismatch("invalid parent node"));
        }

        self.mark();
        self.clear_source();

        let index = child.index();
        {
            let mut d = self.inner.borrow_mut();
            d.value = None;
            if let Some(i) = index {
                d.children.remove(&i.to_string());
            } else if let Some(key) = child.key() {
                d.children.remove(&key);
            }
        }
        if self.is_array() {
            if let Some(i) = index {
                self.drop_index(i);
            }
        }

        child.inner.borrow_mut().parent = None;
        Ok(())
    }

    /// Shifts array keys above `index` down by one after a removal.
    fn drop_index(&self, index: usize) {
        let mut d = self.inner.borrow_mut();
        let last = d.children.len();
        for i in (index + 1)..=last {
            if let Some(child) = d.children.remove(&i.to_string()) {
                child.inner.borrow_mut().index = Some(i - 1);
                d.children.insert((i - 1).to_string(), child);
            }
        }
    }

    fn update(&self, kind: ValueType, value: Value) -> Result<()> {
        // Validate incoming containers before touching any state, so a
        // failed call leaves the tree unchanged.
        match &value {
            Value::Array(elements) => {
                for element in elements {
                    if self.is_self_or_ancestor(element) {
                        return Err(Error::cycle_detected());
                    }
                }
            }
            Value::Object(members) => {
                for member in members.values() {
                    if self.is_self_or_ancestor(member) {
                        return Err(Error::cycle_detected());
                    }
                }
            }
            _ => {}
        }

        self.mark();
        {
            let orphans: Vec<Node> = self.inner.borrow().children.values().cloned().collect();
            for orphan in orphans {
                orphan.inner.borrow_mut().parent = None;
            }
            let mut d = self.inner.borrow_mut();
            d.children.clear();
            d.data = None;
            d.borders.1 = 0;
            d.kind = kind;
            d.value = None;
        }

        match value {
            Value::Array(elements) => {
                for element in elements {
                    self.adopt(None, element)?;
                }
            }
            Value::Object(members) => {
                for (key, member) in members {
                    self.adopt(Some(key), member)?;
                }
            }
            scalar => self.inner.borrow_mut().value = Some(scalar),
        }
        Ok(())
    }
}
