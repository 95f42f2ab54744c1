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

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::entity::{Entity, Replicated};
use crate::error::Error;
use crate::member::MemberCx;
use crate::types::{Serial, NULL_SERIAL};

/// Lookup surface the resolution pass works against: any container of live
/// entities keyed by serial. [`GraphStore`] is the standard implementation;
/// game code with its own entity storage can implement this directly.
pub trait Registry {
    fn resolve(&self, serial: Serial) -> Option<&dyn Entity>;

    /// Called once per resolved edge, with the referencing and referenced
    /// serials. Default does nothing; [`GraphStore`] records an inbound
    /// index from it.
    fn note_inbound(&self, _from: Serial, _to: Serial) {}
}

/// Per-entity context for the resolution pass.
///
/// During the pass the owner is temporarily detached from its registry, so
/// a self-referencing edge cannot be looked up; `require` special-cases the
/// owner's own serial against the owner's type instead.
pub struct ResolveCx<'r> {
    registry: &'r dyn Registry,
    owner_serial: Serial,
    owner_type_id: TypeId,
}

impl<'r> ResolveCx<'r> {
    pub fn new(
        registry: &'r dyn Registry,
        owner_serial: Serial,
        owner_type_id: TypeId,
    ) -> ResolveCx<'r> {
        ResolveCx {
            registry,
            owner_serial,
            owner_type_id,
        }
    }

    pub fn registry(&self) -> &'r dyn Registry {
        self.registry
    }

    /// Verifies that `serial` names a live object of type `T`. Does not
    /// hand the object back: resolution is a pure existence and type check,
    /// the caller flips its raw serial to a live one on success.
    pub fn require<T: Replicated>(&self, serial: Serial, cx: &MemberCx) -> Result<(), Error> {
        if serial == NULL_SERIAL {
            return Err(Error::unresolved(cx.owner, cx.key, serial));
        }
        if serial == self.owner_serial {
            if self.owner_type_id != TypeId::of::<T>() {
                return Err(Error::shape_mismatch(format!(
                    "{}.{}: serial {} is not a {}",
                    cx.owner,
                    cx.key,
                    serial,
                    T::TYPE_NAME
                )));
            }
        } else {
            let entity = self
                .registry
                .resolve(serial)
                .ok_or_else(|| Error::unresolved(cx.owner, cx.key, serial))?;
            if !entity.as_any().is::<T>() {
                return Err(Error::shape_mismatch(format!(
                    "{}.{}: serial {} is not a {}",
                    cx.owner,
                    cx.key,
                    serial,
                    T::TYPE_NAME
                )));
            }
        }
        self.registry.note_inbound(self.owner_serial, serial);
        Ok(())
    }
}

/// The standard entity registry: owns every live entity of one world, keyed
/// by serial, and maintains an inbound-reference index as graphs resolve.
///
/// Ordered storage so iteration (and therefore resolution and packing) is
/// deterministic.
#[derive(Default)]
pub struct GraphStore {
    entities: BTreeMap<Serial, Box<dyn Entity>>,
    inbound: Mutex<BTreeMap<Serial, BTreeSet<Serial>>>,
}

impl GraphStore {
    pub fn new() -> GraphStore {
        GraphStore::default()
    }

    /// Takes ownership of an entity. The serial must be strictly positive
    /// and not already held.
    pub fn adopt(&mut self, entity: Box<dyn Entity>) -> Result<(), Error> {
        let serial = entity.serial();
        if serial == NULL_SERIAL {
            return Err(Error::integrity("cannot adopt an entity with serial 0"));
        }
        if self.entities.contains_key(&serial) {
            return Err(Error::integrity(format!(
                "serial {serial} is already registered"
            )));
        }
        self.entities.insert(serial, entity);
        Ok(())
    }

    /// Convenience for typed insertion.
    pub fn insert<T: Replicated>(&mut self, entity: T) -> Result<(), Error> {
        self.adopt(Box::new(entity))
    }

    pub fn contains(&self, serial: Serial) -> bool {
        self.entities.contains_key(&serial)
    }

    pub fn entity(&self, serial: Serial) -> Option<&dyn Entity> {
        self.entities.get(&serial).map(|e| e.as_ref())
    }

    pub fn entity_mut(&mut self, serial: Serial) -> Option<&mut dyn Entity> {
        self.entities.get_mut(&serial).map(|e| e.as_mut())
    }

    pub fn get<T: Replicated>(&self, serial: Serial) -> Option<&T> {
        self.entities
            .get(&serial)
            .and_then(|e| e.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Replicated>(&mut self, serial: Serial) -> Option<&mut T> {
        self.entities
            .get_mut(&serial)
            .and_then(|e| e.as_any_mut().downcast_mut::<T>())
    }

    /// Detaches an entity, forgetting any inbound bookkeeping pointing at
    /// it. Links elsewhere that still name this serial will fail their next
    /// resolution.
    pub fn remove(&mut self, serial: Serial) -> Option<Box<dyn Entity>> {
        let removed = self.entities.remove(&serial);
        if removed.is_some() {
            let mut inbound = self.inbound.lock().unwrap();
            inbound.remove(&serial);
            for sources in inbound.values_mut() {
                sources.remove(&serial);
            }
        }
        removed
    }

    /// Temporary detach for the resolution walk; no index cleanup.
    pub(crate) fn take(&mut self, serial: Serial) -> Option<Box<dyn Entity>> {
        self.entities.remove(&serial)
    }

    pub(crate) fn put_back(&mut self, entity: Box<dyn Entity>) {
        self.entities.insert(entity.serial(), entity);
    }

    pub fn serials(&self) -> Vec<Serial> {
        self.entities.keys().copied().collect()
    }

    /// All entities in serial order.
    pub fn iter(&self) -> impl Iterator<Item = (Serial, &dyn Entity)> {
        self.entities.iter().map(|(s, e)| (*s, e.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Serials of entities holding a resolved edge to `serial`, in order.
    /// Populated by resolution passes; edges made by hand through
    /// [`crate::field::Link::to`] are not tracked.
    pub fn inbound_links(&self, serial: Serial) -> Vec<Serial> {
        self.inbound
            .lock()
            .unwrap()
            .get(&serial)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Registry for GraphStore {
    fn resolve(&self, serial: Serial) -> Option<&dyn Entity> {
        self.entity(serial)
    }

    fn note_inbound(&self, from: Serial, to: Serial) {
        self.inbound
            .lock()
            .unwrap()
            .entry(to)
            .or_default()
            .insert(from);
    }
}
