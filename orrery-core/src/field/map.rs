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

use std::collections::BTreeMap;

use crate::entity::Replicated;
use crate::error::Error;
use crate::field::link::Link;
use crate::field::Field;
use crate::member::MemberCx;
use crate::record::Value;
use crate::resolver::graph::ResolveCx;
use crate::types::NULL_SERIAL;

/// A string-keyed collection of edges. Keys are plain data; only the values
/// carry identity. Reference-keyed maps are deliberately unrepresentable:
/// there is no `Field` impl with a `Link` key, so a declaration attempting
/// one fails to compile.
#[derive(Debug, Default, PartialEq)]
pub struct LinkMap<T: Replicated> {
    links: BTreeMap<String, Link<T>>,
}

impl<T: Replicated> LinkMap<T> {
    pub fn new() -> LinkMap<T> {
        LinkMap {
            links: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, target: &T) {
        self.links.insert(key.into(), Link::to(target));
    }

    pub fn insert_link(&mut self, key: impl Into<String>, link: Link<T>) {
        self.links.insert(key.into(), link);
    }

    pub fn get(&self, key: &str) -> Option<&Link<T>> {
        self.links.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Link<T>> {
        self.links.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link<T>)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<T: Replicated> Clone for LinkMap<T> {
    fn clone(&self) -> LinkMap<T> {
        LinkMap {
            links: self.links.clone(),
        }
    }
}

impl<T: Replicated> Field for LinkMap<T> {
    fn save(&self, cx: &MemberCx) -> Result<Value, Error> {
        let mut pairs = Vec::with_capacity(self.links.len());
        for (key, link) in &self.links {
            match link.serial() {
                Some(serial) => pairs.push((key.clone(), Value::Serial(serial))),
                None => {
                    return Err(Error::integrity(format!(
                        "{}.{}[{:?}]: map value references no object",
                        cx.owner, cx.key, key
                    )))
                }
            }
        }
        Ok(Value::Pairs(pairs))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::Pairs(pairs) => {
                let mut links = BTreeMap::new();
                for (key, item) in pairs {
                    match item {
                        // Same contract as reference lists: the null
                        // sentinel is never a legitimate map value.
                        Value::Serial(serial) if *serial == NULL_SERIAL => {
                            return Err(Error::integrity(format!(
                                "{}.{}[{:?}]: null serial in reference map",
                                cx.owner, cx.key, key
                            )))
                        }
                        Value::Serial(serial) => {
                            links.insert(key.clone(), Link::raw(*serial));
                        }
                        other => {
                            return Err(Error::shape_mismatch(format!(
                                "{}.{}: expected serial map value, got {}",
                                cx.owner,
                                cx.key,
                                other.shape()
                            )))
                        }
                    }
                }
                self.links = links;
                Ok(())
            }
            other => Err(Error::shape_mismatch(format!(
                "{}.{}: expected pairs, got {}",
                cx.owner,
                cx.key,
                other.shape()
            ))),
        }
    }

    fn relink(&mut self, resolve: &ResolveCx<'_>, cx: &MemberCx) -> Result<(), Error> {
        for link in self.links.values_mut() {
            link.relink(resolve, cx)?;
        }
        Ok(())
    }

    fn clear_pending(&mut self) {
        if self.links.values().any(Link::pending) {
            self.links.clear();
        }
    }

    fn pending(&self) -> bool {
        self.links.values().any(Link::pending)
    }
}
