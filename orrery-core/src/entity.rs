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

use std::any::Any;

use crate::member::MemberTable;
use crate::types::Serial;

/// An identity-bearing game object: anything that can appear in the entity
/// graph and be referenced by serial from other objects.
///
/// Implemented by the [`crate::members!`] macro; the serial member is named
/// in the declaration and never appears in the member table itself (the
/// envelope stores it alongside each record).
pub trait Entity: Any + Send {
    /// The stable, strictly-positive identity of this object. At most one
    /// live object per serial within a given registry.
    fn serial(&self) -> Serial;

    /// Restores the identity while materializing an object from a payload.
    fn set_serial(&mut self, serial: Serial);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A serializable entity type with a declared member table.
///
/// The table is built exactly once per type on first use and cached for the
/// process lifetime; concurrent first-use is safe (`LazyLock` inside the
/// macro expansion).
pub trait Replicated: Entity + Sized + 'static {
    /// Stable serialized type identifier, written into packed payloads and
    /// mapped across format versions by [`crate::mapper::SaveTypeMapper`].
    const TYPE_NAME: &'static str;

    fn members() -> &'static MemberTable<Self>;
}
