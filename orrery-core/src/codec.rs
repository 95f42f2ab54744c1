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

//! Binary value codec: turns [`Value`] trees and [`Record`]s into bytes and
//! back. One tag byte per value, varint-packed integers and lengths,
//! little-endian floats. The composer never touches bytes itself; this is
//! the only seam between records and the envelope.

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::record::{Record, Value};
use crate::types::WireTag;

/// Maximum nesting depth accepted when decoding. A corrupt length field must
/// not be able to drive unbounded recursion.
const MAX_DEPTH: u32 = 64;

pub fn write_value(writer: &mut Writer, value: &Value) {
    match value {
        Value::Null => writer.write_u8(WireTag::Null.into()),
        Value::Bool(v) => {
            writer.write_u8(WireTag::Bool.into());
            writer.write_u8(*v as u8);
        }
        Value::Int(v) => {
            writer.write_u8(WireTag::Int.into());
            writer.write_varint64(*v);
        }
        Value::UInt(v) => {
            writer.write_u8(WireTag::UInt.into());
            writer.write_varuint64(*v);
        }
        Value::Float(v) => {
            writer.write_u8(WireTag::Float.into());
            writer.write_f64(*v);
        }
        Value::Str(v) => {
            writer.write_u8(WireTag::Str.into());
            writer.write_str(v);
        }
        Value::Bytes(v) => {
            writer.write_u8(WireTag::Bytes.into());
            writer.write_varuint64(v.len() as u64);
            writer.write_bytes(v);
        }
        Value::Serial(v) => {
            writer.write_u8(WireTag::Serial.into());
            writer.write_varuint64(*v);
        }
        Value::List(items) => {
            writer.write_u8(WireTag::List.into());
            writer.write_varuint64(items.len() as u64);
            for item in items {
                write_value(writer, item);
            }
        }
        Value::Pairs(pairs) => {
            writer.write_u8(WireTag::Pairs.into());
            writer.write_varuint64(pairs.len() as u64);
            for (key, item) in pairs {
                writer.write_str(key);
                write_value(writer, item);
            }
        }
        Value::Record(record) => {
            writer.write_u8(WireTag::Record.into());
            write_record(writer, record);
        }
    }
}

pub fn write_record(writer: &mut Writer, record: &Record) {
    writer.write_varuint64(record.len() as u64);
    for (key, value) in record.iter() {
        writer.write_str(key);
        write_value(writer, value);
    }
}

pub fn read_value(reader: &mut Reader) -> Result<Value, Error> {
    read_value_at(reader, 0)
}

pub fn read_record(reader: &mut Reader) -> Result<Record, Error> {
    read_record_at(reader, 0)
}

fn read_value_at(reader: &mut Reader, depth: u32) -> Result<Value, Error> {
    if depth > MAX_DEPTH {
        return Err(Error::invalid_data("value nesting exceeds maximum depth"));
    }
    let raw = reader.read_u8()?;
    let tag = WireTag::try_from(raw)
        .map_err(|_| Error::invalid_data(format!("unknown value tag byte {raw:#04x}")))?;
    match tag {
        WireTag::Null => Ok(Value::Null),
        WireTag::Bool => Ok(Value::Bool(reader.read_u8()? != 0)),
        WireTag::Int => Ok(Value::Int(reader.read_varint64()?)),
        WireTag::UInt => Ok(Value::UInt(reader.read_varuint64()?)),
        WireTag::Float => Ok(Value::Float(reader.read_f64()?)),
        WireTag::Str => Ok(Value::Str(reader.read_str()?)),
        WireTag::Bytes => {
            let len = reader.read_varuint64()? as usize;
            Ok(Value::Bytes(reader.read_bytes(len)?.to_vec()))
        }
        WireTag::Serial => Ok(Value::Serial(reader.read_varuint64()?)),
        WireTag::List => {
            let len = reader.read_varuint64()? as usize;
            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                items.push(read_value_at(reader, depth + 1)?);
            }
            Ok(Value::List(items))
        }
        WireTag::Pairs => {
            let len = reader.read_varuint64()? as usize;
            let mut pairs = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                let key = reader.read_str()?;
                let value = read_value_at(reader, depth + 1)?;
                pairs.push((key, value));
            }
            Ok(Value::Pairs(pairs))
        }
        WireTag::Record => Ok(Value::Record(read_record_at(reader, depth + 1)?)),
    }
}

fn read_record_at(reader: &mut Reader, depth: u32) -> Result<Record, Error> {
    if depth > MAX_DEPTH {
        return Err(Error::invalid_data("record nesting exceeds maximum depth"));
    }
    let len = reader.read_varuint64()? as usize;
    let mut record = Record::new();
    for _ in 0..len {
        let key = reader.read_str()?;
        let value = read_value_at(reader, depth + 1)?;
        record.push(key, value);
    }
    Ok(record)
}
