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

//! Typed graph edges. A [`Link`] holds a serial, never a pointer, so an
//! entity record always serializes to a flat identity and the whole graph
//! can be materialized in any order before links are resolved.

use std::marker::PhantomData;

use crate::entity::Replicated;
use crate::error::Error;
use crate::field::Field;
use crate::member::MemberCx;
use crate::record::Value;
use crate::resolver::graph::{Registry, ResolveCx};
use crate::types::{Serial, NULL_SERIAL};

/// Resolution state of one edge.
///
/// `Raw` exists only between phase one and phase two of a deserialize: it is
/// the in-field replacement for a separate pending-link side table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
    /// No referenced object.
    #[default]
    Absent,
    /// A serial read from a payload, not yet checked against the registry.
    Raw(Serial),
    /// A serial verified to name a live object of the declared type.
    Live(Serial),
}

/// A nullable-by-default reference to another entity, by serial.
///
/// Dereferencing goes through a registry lookup each time: links never pin
/// the referenced object, and a `Live` link can still come back `None` if
/// the target has since been removed from the registry.
pub struct Link<T: Replicated> {
    state: LinkState,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Replicated> Link<T> {
    pub fn none() -> Link<T> {
        Link {
            state: LinkState::Absent,
            _marker: PhantomData,
        }
    }

    /// Points this link at a live object.
    pub fn to(target: &T) -> Link<T> {
        Link {
            state: LinkState::Live(target.serial()),
            _marker: PhantomData,
        }
    }

    /// A link holding an unverified serial, as if freshly deserialized.
    pub fn raw(serial: Serial) -> Link<T> {
        if serial == NULL_SERIAL {
            return Link::none();
        }
        Link {
            state: LinkState::Raw(serial),
            _marker: PhantomData,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The held serial, raw or live. `None` when absent.
    pub fn serial(&self) -> Option<Serial> {
        match self.state {
            LinkState::Absent => None,
            LinkState::Raw(s) | LinkState::Live(s) => Some(s),
        }
    }

    pub fn is_none(&self) -> bool {
        self.state == LinkState::Absent
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.state, LinkState::Raw(_))
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, LinkState::Live(_))
    }

    /// Looks the target up in `registry`. `None` for absent or raw links
    /// and for targets that no longer exist.
    pub fn get<'r>(&self, registry: &'r dyn Registry) -> Option<&'r T> {
        match self.state {
            LinkState::Live(serial) => registry
                .resolve(serial)
                .and_then(|e| e.as_any().downcast_ref::<T>()),
            _ => None,
        }
    }
}

impl<T: Replicated> Default for Link<T> {
    fn default() -> Link<T> {
        Link::none()
    }
}

impl<T: Replicated> Clone for Link<T> {
    fn clone(&self) -> Link<T> {
        Link {
            state: self.state,
            _marker: PhantomData,
        }
    }
}

impl<T: Replicated> std::fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Link<{}>({:?})", T::TYPE_NAME, self.state)
    }
}

impl<T: Replicated> PartialEq for Link<T> {
    fn eq(&self, other: &Link<T>) -> bool {
        self.state == other.state
    }
}

impl<T: Replicated> Field for Link<T> {
    fn save(&self, cx: &MemberCx) -> Result<Value, Error> {
        let serial = match self.state {
            LinkState::Absent => {
                if !cx.nullable {
                    return Err(Error::integrity(format!(
                        "{}.{}: required reference is unset",
                        cx.owner, cx.key
                    )));
                }
                NULL_SERIAL
            }
            LinkState::Raw(s) | LinkState::Live(s) => s,
        };
        if cx.debug {
            log::debug!("{}.{}: save serial {}", cx.owner, cx.key, serial);
        }
        Ok(Value::Serial(serial))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::Serial(serial) => {
                self.state = if *serial == NULL_SERIAL {
                    LinkState::Absent
                } else {
                    LinkState::Raw(*serial)
                };
                if cx.debug {
                    log::debug!("{}.{}: load serial {}", cx.owner, cx.key, serial);
                }
                Ok(())
            }
            other => Err(Error::shape_mismatch(format!(
                "{}.{}: expected serial, got {}",
                cx.owner,
                cx.key,
                other.shape()
            ))),
        }
    }

    fn relink(&mut self, resolve: &ResolveCx<'_>, cx: &MemberCx) -> Result<(), Error> {
        match self.state {
            LinkState::Absent => {
                if !cx.nullable {
                    return Err(Error::required_null(cx.owner, cx.key));
                }
                Ok(())
            }
            LinkState::Raw(serial) => {
                resolve.require::<T>(serial, cx)?;
                self.state = LinkState::Live(serial);
                Ok(())
            }
            LinkState::Live(_) => Ok(()),
        }
    }

    fn clear_pending(&mut self) {
        if let LinkState::Raw(_) = self.state {
            self.state = LinkState::Absent;
        }
    }

    fn pending(&self) -> bool {
        self.is_raw()
    }
}
