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

//! # Orrery
//!
//! Tag-driven entity-graph serialization: one member declaration per type
//! drives both save files and network replication.
//!
//! Entities carry a stable serial identity. References between entities
//! serialize as serials rather than nested objects, so arbitrary graphs,
//! cycles included, round-trip through a two-phase deserialize: scalars
//! first, link resolution once the whole graph is live.
//!
//! ```rust
//! use orrery::{members, GraphStore, Link, Orrery, Scope};
//!
//! #[derive(Default)]
//! struct Faction {
//!     serial: u64,
//!     name: String,
//! }
//!
//! #[derive(Default)]
//! struct Planet {
//!     serial: u64,
//!     name: String,
//!     population: i64,
//!     owner: Link<Faction>,
//! }
//!
//! members! {
//!     Faction => "Faction" {
//!         id: serial;
//!         "Name" => name: String [remote],
//!     }
//! }
//!
//! members! {
//!     Planet => "Planet" {
//!         id: serial;
//!         "Name" => name: String [remote],
//!         "Population" => population: i64 [],
//!         "Owner" => owner: Link<Faction> [remote],
//!     }
//! }
//!
//! # fn main() -> Result<(), orrery::Error> {
//! let mut orrery = Orrery::new();
//! orrery.register::<Faction>()?;
//! orrery.register::<Planet>()?;
//!
//! let faction = Faction { serial: 3, name: "Concord".into() };
//! let planet = Planet {
//!     serial: 7,
//!     name: "Vesta".into(),
//!     population: 12_000_000,
//!     owner: Link::to(&faction),
//! };
//!
//! let mut store = GraphStore::new();
//! store.insert(faction)?;
//! store.insert(planet)?;
//!
//! let bytes = orrery.pack(&store, 7, Scope::Persistent)?;
//!
//! let mut loaded = GraphStore::new();
//! let root = orrery.unpack(&bytes, &mut loaded)?;
//! assert_eq!(root, 7);
//! assert_eq!(loaded.get::<Planet>(7).unwrap().owner.serial(), Some(3));
//! # Ok(())
//! # }
//! ```

pub use orrery_core::entity::{Entity, Replicated};
pub use orrery_core::envelope::{Compressor, Lz4Compressor, PayloadHeader};
pub use orrery_core::error::Error;
pub use orrery_core::field::{Field, Link, LinkList, LinkMap, Scalar};
pub use orrery_core::mapper::SaveTypeMapper;
pub use orrery_core::member::{MemberCx, MemberDef, MemberTable};
pub use orrery_core::members;
pub use orrery_core::orrery::{Orrery, OrreryBuilder};
pub use orrery_core::record::{Record, Value};
pub use orrery_core::resolver::{FinishedQueue, GraphStore, Registry, ResolveCx};
pub use orrery_core::tag::Tag;
pub use orrery_core::types::{Scope, Serial, NULL_SERIAL};
