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

//! The byte-stream envelope: a fixed header followed by an optionally
//! compressed body holding the root serial and every entity record of one
//! graph. Packing walks a [`GraphStore`]; unpacking materializes or updates
//! entities in place, then runs link resolution over the whole graph.

use chrono::{DateTime, Utc};

use crate::buffer::{Reader, Writer};
use crate::codec::{read_record, write_record};
use crate::error::Error;
use crate::mapper::SaveTypeMapper;
use crate::orrery::Orrery;
use crate::resolver::graph::GraphStore;
use crate::types::{envelope_flags, Scope, Serial, FORMAT_VERSION, MAGIC_NUMBER};

/// Body compression seam. The engine ships LZ4; anything block-oriented
/// slots in here.
pub trait Compressor: Send + Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, Error>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, Error>;
}

/// LZ4 block compression with a length prefix, so decompression can size
/// its output buffer up front.
pub struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        Ok(lz4_flex::compress_prepend_size(data))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        lz4_flex::decompress_size_prepended(data)
            .map_err(|e| Error::invalid_data(format!("lz4 decompression failed: {e}")))
    }
}

/// Fixed-size header opening every packed payload.
///
/// Read this alone (via [`PayloadHeader::read`]) to learn the format
/// version of a save file before committing to an unpack, so the right
/// [`SaveTypeMapper`] can be chosen for the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayloadHeader {
    version: u16,
    flags: u8,
    timestamp_micros: i64,
}

impl PayloadHeader {
    fn new(flags: u8) -> PayloadHeader {
        PayloadHeader {
            version: FORMAT_VERSION,
            flags,
            timestamp_micros: Utc::now().timestamp_micros(),
        }
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn is_persistent(&self) -> bool {
        self.flags & envelope_flags::IS_PERSISTENT_FLAG != 0
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & envelope_flags::IS_COMPRESSED_FLAG != 0
    }

    /// When the payload was packed, if the stored micros are in range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.timestamp_micros)
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_u16(MAGIC_NUMBER);
        writer.write_u16(self.version);
        writer.write_u8(self.flags);
        writer.write_i64(self.timestamp_micros);
    }

    /// Reads and validates a header, leaving the reader at the body.
    pub fn read(reader: &mut Reader) -> Result<PayloadHeader, Error> {
        let magic = reader.read_u16()?;
        if magic != MAGIC_NUMBER {
            return Err(Error::invalid_data(format!(
                "bad magic number {magic:#06x}, not a packed payload"
            )));
        }
        let version = reader.read_u16()?;
        if version > FORMAT_VERSION {
            return Err(Error::invalid_data(format!(
                "payload format version {version} is newer than supported {FORMAT_VERSION}"
            )));
        }
        let flags = reader.read_u8()?;
        let timestamp_micros = reader.read_i64()?;
        Ok(PayloadHeader {
            version,
            flags,
            timestamp_micros,
        })
    }

    /// Peeks the header of a packed payload without touching the body.
    pub fn peek(bytes: &[u8]) -> Result<PayloadHeader, Error> {
        PayloadHeader::read(&mut Reader::new(bytes))
    }
}

impl Orrery {
    /// Packs a whole graph into one self-describing byte stream. Every
    /// entity in the store is serialized for `scope`; `root` names the
    /// entry point the unpacking side hands back and must be in the store.
    pub fn pack(&self, store: &GraphStore, root: Serial, scope: Scope) -> Result<Vec<u8>, Error> {
        if !store.contains(root) {
            return Err(Error::integrity(format!(
                "root serial {root} is not in the store"
            )));
        }

        let mut body = Writer::new();
        body.write_varuint64(root);
        body.write_varuint64(store.len() as u64);
        for (serial, entity) in store.iter() {
            let record = self.serialize_dyn(entity, scope)?;
            body.write_varuint64(serial);
            body.write_str(self.type_name_of(entity)?);
            write_record(&mut body, &record);
        }
        let body = body.dump();

        let mut flags = 0u8;
        if scope == Scope::Persistent {
            flags |= envelope_flags::IS_PERSISTENT_FLAG;
        }
        let body = if self.compress {
            flags |= envelope_flags::IS_COMPRESSED_FLAG;
            self.compressor.compress(&body)?
        } else {
            body
        };

        let mut out = Writer::new();
        PayloadHeader::new(flags).write(&mut out);
        out.write_bytes(&body);
        log::debug!(
            "packed {} entities, root {}, {} bytes",
            store.len(),
            root,
            out.len()
        );
        Ok(out.dump())
    }

    /// Unpacks a payload into the store and resolves the graph. Returns the
    /// root serial.
    pub fn unpack(&self, bytes: &[u8], store: &mut GraphStore) -> Result<Serial, Error> {
        self.unpack_with_mapper(bytes, store, &SaveTypeMapper::new())
    }

    /// Unpack with stored type names translated through `mapper`.
    ///
    /// Entities already present in the store under a packed serial are
    /// updated in place; others are created fresh. Persistent payloads
    /// resolve strictly; network payloads resolve leniently, dropping
    /// entities whose edges dangle.
    pub fn unpack_with_mapper(
        &self,
        bytes: &[u8],
        store: &mut GraphStore,
        mapper: &SaveTypeMapper,
    ) -> Result<Serial, Error> {
        let mut reader = Reader::new(bytes);
        let header = PayloadHeader::read(&mut reader)?;

        let decompressed;
        let mut body = if header.is_compressed() {
            decompressed = self.compressor.decompress(reader.read_bytes(reader.remaining())?)?;
            Reader::new(&decompressed)
        } else {
            Reader::new(reader.read_bytes(reader.remaining())?)
        };

        let root = body.read_varuint64()?;
        let count = body.read_varuint64()?;
        let mut adopted = Vec::new();
        for _ in 0..count {
            let serial = body.read_varuint64()?;
            let stored_name = body.read_str()?;
            let record = read_record(&mut body)?;
            let type_name = mapper.resolve(&stored_name);
            let harness = self
                .harness_by_name(type_name)
                .ok_or_else(|| Error::unknown_type(type_name.to_string()))?;

            if store.contains(serial) {
                let existing = store
                    .entity_mut(serial)
                    .ok_or_else(|| Error::integrity(format!("serial {serial} vanished mid-unpack")))?;
                if self.type_name_of(&*existing)? != harness.type_name {
                    return Err(Error::integrity(format!(
                        "serial {} is live as a different type than stored `{}`",
                        serial, stored_name
                    )));
                }
                self.deserialize_dyn(existing, &record)?;
            } else {
                let mut entity = (harness.make)();
                entity.set_serial(serial);
                self.deserialize_dyn(entity.as_mut(), &record)?;
                store.adopt(entity)?;
                adopted.push(serial);
            }
        }
        if body.remaining() != 0 {
            return Err(Error::invalid_data(format!(
                "{} trailing bytes after last entity record",
                body.remaining()
            )));
        }
        if !store.contains(root) {
            return Err(Error::invalid_data(format!(
                "root serial {root} was not among the packed entities"
            )));
        }

        if header.is_persistent() {
            self.resolve_graph(store)?;
        } else {
            // Only entities this unpack created are droppable; a bad delta
            // must never delete state that was live before it arrived.
            self.resolve_lenient(store, &adopted);
        }
        Ok(root)
    }
}
