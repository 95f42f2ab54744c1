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

use crate::entity::Replicated;
use crate::error::Error;
use crate::field::link::Link;
use crate::field::Field;
use crate::member::MemberCx;
use crate::record::Value;
use crate::resolver::graph::ResolveCx;
use crate::types::{Serial, NULL_SERIAL};

/// An ordered collection of same-typed edges. Serialized as a list of
/// serials; order is preserved through deserialize and resolution.
///
/// Unlike a standalone [`Link`], an element is never a null placeholder:
/// holding an absent link inside a list is an integrity error at save time
/// regardless of the member's nullable tag.
#[derive(Debug, Default, PartialEq)]
pub struct LinkList<T: Replicated> {
    links: Vec<Link<T>>,
}

impl<T: Replicated> LinkList<T> {
    pub fn new() -> LinkList<T> {
        LinkList { links: Vec::new() }
    }

    pub fn push(&mut self, target: &T) {
        self.links.push(Link::to(target));
    }

    pub fn push_link(&mut self, link: Link<T>) {
        self.links.push(link);
    }

    pub fn retain_serials(&mut self, keep: impl Fn(Serial) -> bool) {
        self.links.retain(|l| l.serial().map(&keep).unwrap_or(false));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link<T>> {
        self.links.iter()
    }

    pub fn serials(&self) -> impl Iterator<Item = Serial> + '_ {
        self.links.iter().filter_map(Link::serial)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }
}

impl<T: Replicated> Clone for LinkList<T> {
    fn clone(&self) -> LinkList<T> {
        LinkList {
            links: self.links.clone(),
        }
    }
}

impl<T: Replicated> Field for LinkList<T> {
    fn save(&self, cx: &MemberCx) -> Result<Value, Error> {
        let mut items = Vec::with_capacity(self.links.len());
        for (index, link) in self.links.iter().enumerate() {
            match link.serial() {
                Some(serial) => items.push(Value::Serial(serial)),
                None => {
                    return Err(Error::integrity(format!(
                        "{}.{}[{}]: list element references no object",
                        cx.owner, cx.key, index
                    )))
                }
            }
        }
        Ok(Value::List(items))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::List(items) => {
                let mut links = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        // A list never legitimately carries the null
                        // sentinel; save refuses to write one.
                        Value::Serial(serial) if *serial == NULL_SERIAL => {
                            return Err(Error::integrity(format!(
                                "{}.{}[{}]: null serial in reference list",
                                cx.owner, cx.key, index
                            )))
                        }
                        Value::Serial(serial) => links.push(Link::raw(*serial)),
                        other => {
                            return Err(Error::shape_mismatch(format!(
                                "{}.{}: expected serial list element, got {}",
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
                "{}.{}: expected list, got {}",
                cx.owner,
                cx.key,
                other.shape()
            ))),
        }
    }

    fn relink(&mut self, resolve: &ResolveCx<'_>, cx: &MemberCx) -> Result<(), Error> {
        for link in &mut self.links {
            link.relink(resolve, cx)?;
        }
        Ok(())
    }

    fn clear_pending(&mut self) {
        // A half-loaded list is worthless; drop it whole.
        if self.links.iter().any(Link::pending) {
            self.links.clear();
        }
    }

    fn pending(&self) -> bool {
        self.links.iter().any(Link::pending)
    }
}
