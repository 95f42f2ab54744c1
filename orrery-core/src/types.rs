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

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Stable, process-unique identity of one live entity. The unit of
/// cross-object reference: graph edges are serials, never pointers.
pub type Serial = u64;

/// Reserved sentinel meaning "no object". Live serials are strictly positive.
pub const NULL_SERIAL: Serial = 0;

/// Magic number opening every packed payload.
pub const MAGIC_NUMBER: u16 = 0x0a7e;

/// Current envelope format version. Bumped when the header or body layout
/// changes; the save-file loader selects a [`crate::mapper::SaveTypeMapper`]
/// from it before unpacking the body.
pub const FORMAT_VERSION: u16 = 2;

/// Caller intent for one serialize/pack operation. Decides which tagged
/// members of a type make it into the record: the same declaration set
/// produces a small network delta and a larger save-file record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Save-file write: members tagged `persists` (the default) are kept.
    Persistent,
    /// Network replication: only members tagged `remote` are kept.
    Remote,
}

/// Wire tag byte identifying the shape of the next encoded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum WireTag {
    Null = 0,
    Bool = 1,
    Int = 2,
    UInt = 3,
    Float = 4,
    Str = 5,
    Bytes = 6,
    Serial = 7,
    List = 8,
    Pairs = 9,
    Record = 10,
}

/// Envelope header bitmap flags.
pub mod envelope_flags {
    /// Payload was packed with [`super::Scope::Persistent`].
    pub const IS_PERSISTENT_FLAG: u8 = 1 << 0;
    /// Body bytes are compressed.
    pub const IS_COMPRESSED_FLAG: u8 = 1 << 1;
}
