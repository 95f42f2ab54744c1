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

//! Scalar fields and scalar containers. These carry no identity: they are
//! written verbatim during serialize and restored fully in phase one of
//! deserialize, with nothing left to resolve.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::Error;
use crate::field::Field;
use crate::member::MemberCx;
use crate::record::Value;

fn shape_error(cx: &MemberCx, expected: &str, got: &Value) -> Error {
    Error::shape_mismatch(format!(
        "{}.{}: expected {}, got {}",
        cx.owner,
        cx.key,
        expected,
        got.shape()
    ))
}

/// A value type with a direct [`Value`] representation. Implementing this
/// is what makes a type usable inside `Vec`, `Option` and string-keyed maps
/// without a dedicated [`Field`] impl for every combination.
pub trait Scalar: Clone + Send + Sync {
    const SHAPE: &'static str;

    fn to_value(&self) -> Value;

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error>;
}

macro_rules! int_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const SHAPE: &'static str = "int";

                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }

                fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(*v).map_err(|_| {
                            Error::shape_mismatch(format!(
                                "{}.{}: int {} out of range for {}",
                                cx.owner, cx.key, v, stringify!($ty)
                            ))
                        }),
                        other => Err(shape_error(cx, Self::SHAPE, other)),
                    }
                }
            }
        )*
    };
}

macro_rules! uint_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const SHAPE: &'static str = "uint";

                fn to_value(&self) -> Value {
                    Value::UInt(*self as u64)
                }

                fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
                    match value {
                        Value::UInt(v) => <$ty>::try_from(*v).map_err(|_| {
                            Error::shape_mismatch(format!(
                                "{}.{}: uint {} out of range for {}",
                                cx.owner, cx.key, v, stringify!($ty)
                            ))
                        }),
                        other => Err(shape_error(cx, Self::SHAPE, other)),
                    }
                }
            }
        )*
    };
}

int_scalar!(i8, i16, i32, i64);
uint_scalar!(u8, u16, u32, u64);

impl Scalar for bool {
    const SHAPE: &'static str = "bool";

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
        match value {
            Value::Bool(v) => Ok(*v),
            other => Err(shape_error(cx, Self::SHAPE, other)),
        }
    }
}

impl Scalar for f32 {
    const SHAPE: &'static str = "float";

    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
        match value {
            Value::Float(v) => Ok(*v as f32),
            other => Err(shape_error(cx, Self::SHAPE, other)),
        }
    }
}

impl Scalar for f64 {
    const SHAPE: &'static str = "float";

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
        match value {
            Value::Float(v) => Ok(*v),
            other => Err(shape_error(cx, Self::SHAPE, other)),
        }
    }
}

impl Scalar for String {
    const SHAPE: &'static str = "string";

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
        match value {
            Value::Str(v) => Ok(v.clone()),
            other => Err(shape_error(cx, Self::SHAPE, other)),
        }
    }
}

impl Scalar for Vec<u8> {
    const SHAPE: &'static str = "bytes";

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
        match value {
            Value::Bytes(v) => Ok(v.clone()),
            other => Err(shape_error(cx, Self::SHAPE, other)),
        }
    }
}

impl Scalar for NaiveDate {
    const SHAPE: &'static str = "int";

    fn to_value(&self) -> Value {
        Value::Int(self.num_days_from_ce() as i64)
    }

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
        match value {
            Value::Int(days) => {
                let days = i32::try_from(*days).ok();
                days.and_then(NaiveDate::from_num_days_from_ce_opt)
                    .ok_or_else(|| {
                        Error::shape_mismatch(format!(
                            "{}.{}: day number out of calendar range",
                            cx.owner, cx.key
                        ))
                    })
            }
            other => Err(shape_error(cx, Self::SHAPE, other)),
        }
    }
}

impl Scalar for NaiveDateTime {
    const SHAPE: &'static str = "int";

    fn to_value(&self) -> Value {
        Value::Int(self.and_utc().timestamp_micros())
    }

    fn from_value(value: &Value, cx: &MemberCx) -> Result<Self, Error> {
        match value {
            Value::Int(micros) => chrono::DateTime::from_timestamp_micros(*micros)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| {
                    Error::shape_mismatch(format!(
                        "{}.{}: timestamp out of range",
                        cx.owner, cx.key
                    ))
                }),
            other => Err(shape_error(cx, Self::SHAPE, other)),
        }
    }
}

/// Implements [`Field`] for a concrete scalar type by delegating to its
/// [`Scalar`] impl. Concrete impls rather than a blanket one so container
/// fields below can have their own.
macro_rules! impl_plain_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn save(&self, cx: &MemberCx) -> Result<Value, Error> {
                    if cx.debug {
                        log::debug!("{}.{}: save {:?}", cx.owner, cx.key, self);
                    }
                    Ok(self.to_value())
                }

                fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
                    *self = <$ty as Scalar>::from_value(value, cx)?;
                    if cx.debug {
                        log::debug!("{}.{}: load {:?}", cx.owner, cx.key, self);
                    }
                    Ok(())
                }
            }
        )*
    };
}

// Vec<u8> is deliberately absent here: as a member it goes through the
// generic Vec<S> impl below, while its Scalar impl keeps byte blobs compact
// when nested inside Option or another container.
impl_plain_field!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    NaiveDate,
    NaiveDateTime,
);

impl<S: Scalar> Field for Vec<S> {
    fn save(&self, _cx: &MemberCx) -> Result<Value, Error> {
        Ok(Value::List(self.iter().map(Scalar::to_value).collect()))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(S::from_value(item, cx)?);
                }
                *self = out;
                Ok(())
            }
            other => Err(shape_error(cx, "list", other)),
        }
    }
}

impl<S: Scalar> Field for Option<S> {
    fn save(&self, _cx: &MemberCx) -> Result<Value, Error> {
        Ok(match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        })
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        *self = match value {
            Value::Null => None,
            other => Some(S::from_value(other, cx)?),
        };
        Ok(())
    }
}

impl<S: Scalar> Field for HashMap<String, S> {
    fn save(&self, _cx: &MemberCx) -> Result<Value, Error> {
        // Sorted for byte-stable output across runs.
        let mut pairs: Vec<(String, Value)> = self
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Value::Pairs(pairs))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::Pairs(pairs) => {
                let mut out = HashMap::with_capacity(pairs.len());
                for (key, item) in pairs {
                    out.insert(key.clone(), S::from_value(item, cx)?);
                }
                *self = out;
                Ok(())
            }
            other => Err(shape_error(cx, "pairs", other)),
        }
    }
}

impl<S: Scalar> Field for BTreeMap<String, S> {
    fn save(&self, _cx: &MemberCx) -> Result<Value, Error> {
        Ok(Value::Pairs(
            self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
        ))
    }

    fn load(&mut self, value: &Value, cx: &MemberCx) -> Result<(), Error> {
        match value {
            Value::Pairs(pairs) => {
                let mut out = BTreeMap::new();
                for (key, item) in pairs {
                    out.insert(key.clone(), S::from_value(item, cx)?);
                }
                *self = out;
                Ok(())
            }
            other => Err(shape_error(cx, "pairs", other)),
        }
    }
}
