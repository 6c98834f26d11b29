//! Node comparison and truthiness, the value semantics behind filter
//! predicates.

use std::cmp::Ordering;

use crate::error::{Error, Result};

use super::{Node, ValueType};

impl Node {
    /// Structural equality by kind: scalars compare by value, containers
    /// element- or member-wise, nulls are equal, different kinds are not.
    pub fn equals(&self, other: &Node) -> Result<bool> {
        if self.kind() != other.kind() {
            return Ok(false);
        }

        match self.kind() {
            ValueType::Null => Ok(true),
            ValueType::Bool => Ok(self.get_bool()? == other.get_bool()?),
            ValueType::Number => Ok(self.get_numeric()? == other.get_numeric()?),
            ValueType::String => Ok(self.get_string()? == other.get_string()?),
            ValueType::Array => {
                let lhs = self.get_array()?;
                let rhs = other.get_array()?;
                if lhs.len() != rhs.len() {
                    return Ok(false);
                }
                for (l, r) in lhs.iter().zip(rhs.iter()) {
                    if !l.equals(r)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ValueType::Object => {
                let lhs = self.get_object()?;
                let rhs = other.get_object()?;
                if lhs.len() != rhs.len() {
                    return Ok(false);
                }
                for (key, l) in &lhs {
                    let Some(r) = rhs.get(key) else {
                        return Ok(false);
                    };
                    if !l.equals(r)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    pub fn gt(&self, other: &Node) -> Result<bool> {
        Ok(self.ordering(other)? == Ordering::Greater)
    }

    pub fn gte(&self, other: &Node) -> Result<bool> {
        Ok(self.ordering(other)? != Ordering::Less)
    }

    pub fn lt(&self, other: &Node) -> Result<bool> {
        Ok(self.ordering(other)? == Ordering::Less)
    }

    pub fn lte(&self, other: &Node) -> Result<bool> {
        Ok(self.ordering(other)? != Ordering::Greater)
    }

    /// Ordering is defined for same-kind numbers and strings only.
    fn ordering(&self, other: &Node) -> Result<Ordering> {
        if self.kind() != other.kind() {
            return Err(Error::type_mismatch(
                "can't order values of different kinds",
            ));
        }

        match self.kind() {
            ValueType::Number => self
                .get_numeric()?
                .partial_cmp(&other.get_numeric()?)
                .ok_or_else(|| Error::type_mismatch("number values are not comparable")),
            ValueType::String => Ok(self.get_string()?.cmp(&other.get_string()?)),
            kind => Err(Error::type_mismatch(format!(
                "ordering is not supported for {kind} values"
            ))),
        }
    }

    /// Truthiness projection used by boolean filter operators: booleans
    /// as-is, non-zero numbers, non-empty strings and containers; null is
    /// false.
    pub fn truthy(&self) -> Result<bool> {
        match self.kind() {
            ValueType::Bool => self.get_bool(),
            ValueType::Number => Ok(self.get_numeric()? != 0.0),
            ValueType::String => Ok(!self.get_string()?.is_empty()),
            ValueType::Null => Ok(false),
            ValueType::Array | ValueType::Object => Ok(!self.is_empty()),
        }
    }
}
