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

//! Core engine for tag-driven entity-graph serialization.
//!
//! Entity types declare their serializable members once through the
//! [`members!`] macro; the same declaration then serves both save files
//! (persistent scope) and network replication (remote scope). References
//! between entities serialize as serials and are resolved in a second pass
//! once a whole graph has been materialized, so graphs with cycles and
//! arbitrary arrival order round-trip without special handling.
//!
//! Most users want the `orrery` facade crate rather than this one.

pub mod buffer;
pub mod codec;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod field;
pub mod mapper;
pub mod member;
pub mod orrery;
pub mod record;
pub mod resolver;
pub mod tag;
pub mod types;

pub use crate::entity::{Entity, Replicated};
pub use crate::envelope::{Compressor, Lz4Compressor, PayloadHeader};
pub use crate::error::Error;
pub use crate::field::{Field, Link, LinkList, LinkMap};
pub use crate::mapper::SaveTypeMapper;
pub use crate::member::{MemberCx, MemberDef, MemberTable};
pub use crate::orrery::{Orrery, OrreryBuilder};
pub use crate::record::{Record, Value};
pub use crate::resolver::{FinishedQueue, GraphStore, Registry, ResolveCx};
pub use crate::tag::Tag;
pub use crate::types::{Scope, Serial, NULL_SERIAL};
