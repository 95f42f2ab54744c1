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

use crate::types::Scope;

/// Per-member serialization metadata. Pure data, attached once at
/// declaration time through the [`crate::members!`] macro and immutable
/// thereafter.
///
/// Defaults: not replicated over the network, included in save files,
/// nullable, no debug tracing, key derived from the member name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag {
    remote: bool,
    persists: bool,
    nullable: bool,
    debug: bool,
    key: Option<&'static str>,
}

impl Tag {
    pub const fn new() -> Tag {
        Tag {
            remote: false,
            persists: true,
            nullable: true,
            debug: false,
            key: None,
        }
    }

    /// Include this member in network replication records.
    pub const fn remote(mut self) -> Tag {
        self.remote = true;
        self
    }

    /// Exclude this member from save files (network-only state).
    pub const fn transient(mut self) -> Tag {
        self.persists = false;
        self
    }

    /// An absent referenced object is an error rather than a null.
    pub const fn required(mut self) -> Tag {
        self.nullable = false;
        self
    }

    /// Emit a debug log line every time this member is written or read.
    pub const fn debug(mut self) -> Tag {
        self.debug = true;
        self
    }

    /// Override the serialized key. Empty overrides are ignored, matching
    /// the "key if set and non-empty, else member name" contract.
    pub const fn key(mut self, key: &'static str) -> Tag {
        self.key = Some(key);
        self
    }

    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    pub const fn is_persistent(&self) -> bool {
        self.persists
    }

    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub const fn needs_debug(&self) -> bool {
        self.debug
    }

    /// The serialized key: the override if set and non-empty, else the
    /// member's own name.
    pub const fn resolved_key(&self, member_name: &'static str) -> &'static str {
        match self.key {
            Some(key) => {
                if key.is_empty() {
                    member_name
                } else {
                    key
                }
            }
            None => member_name,
        }
    }

    /// Whether a record built for `scope` includes this member.
    pub const fn included_in(&self, scope: Scope) -> bool {
        match scope {
            Scope::Persistent => self.persists,
            Scope::Remote => self.remote,
        }
    }
}

impl Default for Tag {
    fn default() -> Tag {
        Tag::new()
    }
}
