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

use std::collections::{BTreeSet, HashSet};

use crate::error::Error;
use crate::field::Field;
use crate::member::MemberCx;
use crate::record::Value;

// String sets serialize as sorted lists; element order inside the set is
// not meaningful, sorting keeps payloads byte-stable.

impl Field for HashSet<String> {
    fn save(&self, _cx: &MemberCx) -> Result<Value, Error> {
        let mut items: Vec<&String> = self.iter().collect();
        items.sort();
        Ok(Value::List(
            items.into_iter().map(|s| Value::Str(s.clone())).collect(),
        ))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::List(items) => {
                let mut out = HashSet::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Str(s) => {
                            out.insert(s.clone());
                        }
                        other => {
                            return Err(Error::shape_mismatch(format!(
                                "{}.{}: expected string list element, got {}",
                                cx.owner,
                                cx.key,
                                other.shape()
                            )))
                        }
                    }
                }
                *self = out;
                Ok(())
            }
            other => Err(Error::shape_mismatch(format!(
                "{}.{}: expected list, got {}",
                cx.owner,
                cx.key,
                other.shape()
            ))),
        }
    }
}

impl Field for BTreeSet<String> {
    fn save(&self, _cx: &MemberCx) -> Result<Value, Error> {
        Ok(Value::List(
            self.iter().map(|s| Value::Str(s.clone())).collect(),
        ))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::List(items) => {
                let mut out = BTreeSet::new();
                for item in items {
                    match item {
                        Value::Str(s) => {
                            out.insert(s.clone());
                        }
                        other => {
                            return Err(Error::shape_mismatch(format!(
                                "{}.{}: expected string list element, got {}",
                                cx.owner,
                                cx.key,
                                other.shape()
                            )))
                        }
                    }
                }
                *self = out;
                Ok(())
            }
            other => Err(Error::shape_mismatch(format!(
                "{}.{}: expected list, got {}",
                cx.owner,
                cx.key,
                other.shape()
            ))),
        }
    }
}
