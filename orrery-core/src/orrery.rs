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

//! The serialization engine. An [`Orrery`] holds one harness per registered
//! entity type and drives the three passes: record composition (serialize),
//! phase-one restore (deserialize), and phase-two link resolution.

use std::any::TypeId;
use std::collections::HashMap;

use crate::entity::{Entity, Replicated};
use crate::envelope::{Compressor, Lz4Compressor};
use crate::error::Error;
use crate::record::Record;
use crate::resolver::graph::{GraphStore, ResolveCx};
use crate::resolver::queue::FinishedQueue;
use crate::types::{Scope, Serial};

/// Erased per-type dispatch table, one per registered type. Plain function
/// pointers over monomorphized generics, so harnesses stay `Copy` and the
/// engine never boxes per call.
#[derive(Clone, Copy)]
pub(crate) struct Harness {
    pub(crate) type_name: &'static str,
    type_id: TypeId,
    pub(crate) make: fn() -> Box<dyn Entity>,
    save: fn(&dyn Entity, Scope) -> Result<Record, Error>,
    load: fn(&mut dyn Entity, &Record) -> Result<(), Error>,
    relink: fn(&mut dyn Entity, &ResolveCx<'_>) -> Result<(), Error>,
}

impl Harness {
    fn of<T: Replicated + Default>() -> Harness {
        Harness {
            type_name: T::TYPE_NAME,
            type_id: TypeId::of::<T>(),
            make: make_harness::<T>,
            save: save_harness::<T>,
            load: load_harness::<T>,
            relink: relink_harness::<T>,
        }
    }
}

fn make_harness<T: Replicated + Default>() -> Box<dyn Entity> {
    Box::new(T::default())
}

fn downcast<T: Replicated>(entity: &dyn Entity) -> Result<&T, Error> {
    entity.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::not_serializable(format!("entity is not a {}", T::TYPE_NAME))
    })
}

fn downcast_mut<T: Replicated>(entity: &mut dyn Entity) -> Result<&mut T, Error> {
    entity.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
        Error::not_serializable(format!("entity is not a {}", T::TYPE_NAME))
    })
}

fn save_harness<T: Replicated>(entity: &dyn Entity, scope: Scope) -> Result<Record, Error> {
    let entity = downcast::<T>(entity)?;
    let table = T::members();
    let mut record = Record::new();
    for def in table.entries() {
        if !def.tag().included_in(scope) {
            continue;
        }
        record.push(def.key(), def.save(entity, table.type_name())?);
    }
    Ok(record)
}

fn load_harness<T: Replicated>(entity: &mut dyn Entity, record: &Record) -> Result<(), Error> {
    let entity = downcast_mut::<T>(entity)?;
    let table = T::members();
    // A fresh load invalidates raw serials left over from an abandoned one.
    for def in table.entries() {
        def.clear_pending(entity);
    }
    for (key, value) in record.iter() {
        match table.get(key) {
            Some(def) => def.load(entity, value, table.type_name())?,
            // Unknown keys are skipped so newer payloads load into older
            // declarations.
            None => log::trace!("{}: skipping unknown field `{}`", T::TYPE_NAME, key),
        }
    }
    Ok(())
}

fn relink_harness<T: Replicated>(
    entity: &mut dyn Entity,
    resolve: &ResolveCx<'_>,
) -> Result<(), Error> {
    let entity = downcast_mut::<T>(entity)?;
    let table = T::members();
    for def in table.entries() {
        def.relink(entity, resolve, table.type_name())?;
    }
    Ok(())
}

/// Configures and creates an [`Orrery`].
pub struct OrreryBuilder {
    compress: bool,
    compressor: Box<dyn Compressor>,
}

impl OrreryBuilder {
    /// Whether packed payload bodies are compressed. Defaults to on;
    /// unpacking honors the header flag either way.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn compressor(mut self, compressor: Box<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn build(self) -> Orrery {
        Orrery {
            by_name: HashMap::new(),
            by_type: HashMap::new(),
            compress: self.compress,
            compressor: self.compressor,
            finished: FinishedQueue::new(),
        }
    }
}

impl Default for OrreryBuilder {
    fn default() -> OrreryBuilder {
        OrreryBuilder {
            compress: true,
            compressor: Box::new(Lz4Compressor),
        }
    }
}

/// The engine. Register every serializable type up front, then serialize,
/// deserialize and resolve through it. Registration is the only mutating
/// operation; a configured `Orrery` is shared freely across threads.
pub struct Orrery {
    by_name: HashMap<&'static str, Harness>,
    by_type: HashMap<TypeId, Harness>,
    pub(crate) compress: bool,
    pub(crate) compressor: Box<dyn Compressor>,
    finished: FinishedQueue,
}

impl std::fmt::Debug for Orrery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orrery")
            .field("types", &self.by_name.keys().collect::<Vec<_>>())
            .field("compress", &self.compress)
            .finish_non_exhaustive()
    }
}

impl Default for Orrery {
    fn default() -> Orrery {
        Orrery::builder().build()
    }
}

impl Orrery {
    pub fn new() -> Orrery {
        Orrery::default()
    }

    pub fn builder() -> OrreryBuilder {
        OrreryBuilder::default()
    }

    /// Registers an entity type. Forces the member table to build, so any
    /// declaration problem surfaces here rather than mid-save. Registering
    /// the same type or type name twice is a configuration error.
    pub fn register<T: Replicated + Default>(&mut self) -> Result<&mut Self, Error> {
        let table = T::members();
        let harness = Harness::of::<T>();
        if self.by_type.contains_key(&harness.type_id) {
            return Err(Error::config(format!(
                "type `{}` is already registered",
                T::TYPE_NAME
            )));
        }
        if self.by_name.contains_key(T::TYPE_NAME) {
            return Err(Error::config(format!(
                "type name `{}` is already registered by another type",
                T::TYPE_NAME
            )));
        }
        log::debug!(
            "registered `{}` with {} members",
            T::TYPE_NAME,
            table.len()
        );
        self.by_name.insert(T::TYPE_NAME, harness);
        self.by_type.insert(harness.type_id, harness);
        Ok(self)
    }

    pub fn is_registered<T: Replicated>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn harness_by_name(&self, type_name: &str) -> Option<&Harness> {
        self.by_name.get(type_name)
    }

    fn harness_of(&self, entity: &dyn Entity) -> Result<&Harness, Error> {
        self.by_type
            .get(&entity.as_any().type_id())
            .ok_or_else(|| Error::not_serializable("entity type is not registered"))
    }

    /// The registered type name of a live entity.
    pub fn type_name_of(&self, entity: &dyn Entity) -> Result<&'static str, Error> {
        Ok(self.harness_of(entity)?.type_name)
    }

    /// Composes the record of one entity for the given scope. Members whose
    /// tags exclude them from the scope are left out entirely.
    pub fn serialize<T: Replicated>(&self, entity: &T, scope: Scope) -> Result<Record, Error> {
        if !self.is_registered::<T>() {
            return Err(Error::not_serializable(T::TYPE_NAME));
        }
        save_harness::<T>(entity, scope)
    }

    /// Type-erased serialize, used when walking a heterogeneous store.
    pub fn serialize_dyn(&self, entity: &dyn Entity, scope: Scope) -> Result<Record, Error> {
        let harness = self.harness_of(entity)?;
        (harness.save)(entity, scope)
    }

    /// Phase one: restores scalars and stashes raw serials into the
    /// entity's reference members. Unknown record keys are skipped; links
    /// stay pending until a resolution pass runs.
    pub fn deserialize<T: Replicated>(&self, entity: &mut T, record: &Record) -> Result<(), Error> {
        if !self.is_registered::<T>() {
            return Err(Error::not_serializable(T::TYPE_NAME));
        }
        load_harness::<T>(entity, record)
    }

    pub fn deserialize_dyn(&self, entity: &mut dyn Entity, record: &Record) -> Result<(), Error> {
        let harness = *self.harness_of(entity)?;
        (harness.load)(entity, record)
    }

    /// Phase two for one entity: checks every raw serial against the store
    /// and flips it live. On success the serial joins the finished queue.
    pub fn resolve_entity(&self, store: &mut GraphStore, serial: Serial) -> Result<(), Error> {
        let mut boxed = store
            .take(serial)
            .ok_or_else(|| Error::integrity(format!("serial {serial} is not in the store")))?;
        let harness = match self.harness_of(boxed.as_ref()) {
            Ok(harness) => *harness,
            Err(err) => {
                store.put_back(boxed);
                return Err(err);
            }
        };
        let result = {
            let cx = ResolveCx::new(&*store, serial, boxed.as_any().type_id());
            (harness.relink)(boxed.as_mut(), &cx)
        };
        store.put_back(boxed);
        result?;
        self.finished.push(serial);
        Ok(())
    }

    /// Resolves every entity in the store, strictly: the first dangling or
    /// mistyped serial aborts the pass. Save-file loads use this; a save
    /// with a broken edge is corrupt, not repairable.
    pub fn resolve_graph(&self, store: &mut GraphStore) -> Result<(), Error> {
        for serial in store.serials() {
            self.resolve_entity(store, serial)?;
        }
        Ok(())
    }

    /// Lenient resolution for network graphs: a failed entity never fails
    /// the pass. Entities in `fresh` (the ones the current unpack created)
    /// are dropped from the store with a warning; entities that were
    /// already live are kept, their broken edges left unresolved, so a
    /// malformed or late delta cannot destroy client state. Returns the
    /// serials that were dropped.
    pub fn resolve_lenient(&self, store: &mut GraphStore, fresh: &[Serial]) -> Vec<Serial> {
        let mut dropped = Vec::new();
        for serial in store.serials() {
            if let Err(err) = self.resolve_entity(store, serial) {
                if fresh.contains(&serial) {
                    log::warn!("dropping entity {serial}: {err}");
                    store.remove(serial);
                    dropped.push(serial);
                } else {
                    log::warn!("keeping live entity {serial}, update left unresolved: {err}");
                }
            }
        }
        dropped
    }

    /// Serials that have completed both deserialization phases since the
    /// last drain, in completion order.
    pub fn drain_finished(&self) -> Vec<Serial> {
        self.finished.drain()
    }
}
