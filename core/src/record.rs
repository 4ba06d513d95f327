//! Record structure.
//!
//! A record is one row of an entity type's table: a primary key, the type it
//! belongs to and its attribute values.

use crate::{Attributes, RecordId, TypeId, Value};

/// A persisted row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Primary key, unique within the record's table.
    pub id: RecordId,
    /// Type of this record (reference to registry).
    pub type_id: TypeId,
    /// Attribute values.
    pub attributes: Attributes,
}

impl Record {
    /// Create a new record with the given properties.
    pub fn new(id: RecordId, type_id: TypeId, attributes: Attributes) -> Self {
        Self {
            id,
            type_id,
            attributes,
        }
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute value, returning the previous one.
    pub fn set_attr(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(name.into(), value)
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Read a foreign key column.
    pub fn foreign_key(&self, column: &str) -> Option<RecordId> {
        self.get_attr(column).and_then(Value::as_record_id)
    }

    /// Check whether a foreign key column points at `target`.
    pub fn references(&self, column: &str, target: RecordId) -> bool {
        self.foreign_key(column) == Some(target)
    }

    /// Render a display template against this record.
    ///
    /// `{id}` expands to the primary key and `{name}` to the rendered
    /// attribute `name`. Unknown placeholders expand to nothing and `{{`
    /// / `}}` escape literal braces.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    for k in chars.by_ref() {
                        if k == '}' {
                            break;
                        }
                        key.push(k);
                    }
                    let key = key.trim();
                    if key == "id" {
                        out.push_str(&self.id.to_string());
                    } else if let Some(value) = self.get_attr(key) {
                        out.push_str(&value.render());
                    }
                }
                other => out.push(other),
            }
        }

        out
    }
}
