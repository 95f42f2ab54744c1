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

use std::collections::HashMap;

/// Translates type names stored in old save files to their current
/// registered names. The loader inspects the payload header version first,
/// then picks the mapper for that version before unpacking the body.
///
/// Unmapped names pass through unchanged; a stored name that neither maps
/// nor matches a registered type still fails the unpack with an
/// unknown-type error.
#[derive(Clone, Debug, Default)]
pub struct SaveTypeMapper {
    mappings: HashMap<String, String>,
}

impl SaveTypeMapper {
    pub fn new() -> SaveTypeMapper {
        SaveTypeMapper::default()
    }

    /// Declares that objects stored as `stored` should load as `current`.
    pub fn add_mapping(&mut self, stored: impl Into<String>, current: impl Into<String>) {
        self.mappings.insert(stored.into(), current.into());
    }

    pub fn with_mapping(mut self, stored: impl Into<String>, current: impl Into<String>) -> Self {
        self.add_mapping(stored, current);
        self
    }

    /// The current name for a stored type name. Identity when unmapped.
    pub fn resolve<'a>(&'a self, stored: &'a str) -> &'a str {
        self.mappings.get(stored).map(String::as_str).unwrap_or(stored)
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
