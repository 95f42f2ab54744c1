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

//! Field serialization strategies. Every member type declared through
//! [`crate::members!`] implements [`Field`]; the member table dispatches to
//! it without knowing whether the field is a scalar, a container, or a
//! graph edge.

pub mod link;
pub mod list;
pub mod map;
pub mod plain;
pub mod set;

use crate::error::Error;
use crate::member::MemberCx;
use crate::record::Value;
use crate::resolver::graph::ResolveCx;

pub use link::Link;
pub use list::LinkList;
pub use map::LinkMap;
pub use plain::Scalar;

/// One serializable field of an entity.
///
/// Scalars implement only `save`/`load`; the remaining methods exist for
/// reference-bearing fields, which carry raw serials out of phase one and
/// swap them for verified identities during phase two.
pub trait Field: Send + Sync {
    fn save(&self, cx: &MemberCx) -> Result<Value, Error>;

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error>;

    /// Phase two: resolve any raw serial held by this field against the
    /// registry. Scalars have nothing to resolve.
    fn relink(&mut self, _resolve: &ResolveCx<'_>, _cx: &MemberCx) -> Result<(), Error> {
        Ok(())
    }

    /// Drops any raw serial left over from an earlier, abandoned load.
    fn clear_pending(&mut self) {}

    /// Whether this field still holds a raw, unresolved serial.
    fn pending(&self) -> bool {
        false
    }
}
