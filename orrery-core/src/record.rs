// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The flat key-value representation of one object's declared state: the unit
//! produced by serialize and consumed by deserialize. Scalars are stored
//! verbatim; graph edges are stored as serials, never as nested objects.

use crate::types::Serial;

/// Primitive representation handled by the value codec.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// An identity placeholder: the serial of a referenced entity, or
    /// [`crate::types::NULL_SERIAL`] for "no object".
    Serial(Serial),
    List(Vec<Value>),
    /// Ordered string-keyed pairs; used for reference maps and plain maps.
    Pairs(Vec<(String, Value)>),
    Record(Record),
}

impl Value {
    /// One-word shape name for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Serial(_) => "serial",
            Value::List(_) => "list",
            Value::Pairs(_) => "pairs",
            Value::Record(_) => "record",
        }
    }
}

/// An ordered bag of key-value pairs for one object. Write order is
/// preserved: key order does not matter for correctness, but determinism
/// keeps payloads byte-stable across runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    /// Appends a field. Keys are expected to be unique per record; the
    /// composer guarantees this by construction (one table entry per key).
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.fields.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Record {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}
