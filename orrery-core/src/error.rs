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

use std::borrow::Cow;

use thiserror::Error;

use crate::types::Serial;

/// Set `ORRERY_PANIC_ON_ERROR=1` at compile time to panic at the exact point
/// an error is constructed, with a full stack trace. Debugging aid only.
pub const PANIC_ON_ERROR: bool = option_env!("ORRERY_PANIC_ON_ERROR").is_some();

/// Error type for serialization, deserialization and link resolution.
///
/// Prefer the static constructor functions (`Error::config`,
/// `Error::integrity`, `Error::unresolved`, ...) over building variants
/// directly: they accept anything convertible to `Cow<'static, str>` and
/// honor the `ORRERY_PANIC_ON_ERROR` debug switch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A member or type declaration that can never serialize correctly.
    /// Detected at registration, never per instance.
    #[error("{0}")]
    Config(Cow<'static, str>),

    /// The object handed in is not a registered serializable type.
    #[error("type `{0}` is not serializable (not registered)")]
    NotSerializable(Cow<'static, str>),

    /// A stored type name that no registered type (or mapping) matches.
    #[error("unknown stored type `{0}`")]
    UnknownType(Cow<'static, str>),

    /// A non-nullable reference member was empty at serialize time.
    #[error("{0}")]
    Integrity(Cow<'static, str>),

    /// A cached serial did not resolve against the registry.
    #[error("{owner}.{key}: unresolved serial {serial}")]
    Unresolved {
        owner: Cow<'static, str>,
        key: Cow<'static, str>,
        serial: Serial,
    },

    /// A non-nullable reference member carried the null sentinel.
    #[error("{owner}.{key}: cannot resolve a required reference to null")]
    RequiredNull {
        owner: Cow<'static, str>,
        key: Cow<'static, str>,
    },

    /// A record value whose shape does not match the member's declared type.
    #[error("{0}")]
    ShapeMismatch(Cow<'static, str>),

    /// Corrupt or truncated payload.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// Buffer boundary violation during read.
    #[error("buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// Generic wrapped error (compressor failures and the like).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

macro_rules! cow_ctor {
    ($(#[$doc:meta])* $name:ident => $variant:ident) => {
        $(#[$doc])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $name<S: Into<Cow<'static, str>>>(s: S) -> Self {
            let err = Error::$variant(s.into());
            if PANIC_ON_ERROR {
                panic!("ORRERY_PANIC_ON_ERROR: {}", err);
            }
            err
        }
    };
}

impl Error {
    cow_ctor! {
        /// A declaration-level misconfiguration, fatal at registration.
        config => Config
    }
    cow_ctor! {
        /// The type was never registered with the engine.
        not_serializable => NotSerializable
    }
    cow_ctor! {
        /// A stored type name with no registered counterpart.
        unknown_type => UnknownType
    }
    cow_ctor! {
        /// A required reference was empty when asked to serialize.
        integrity => Integrity
    }
    cow_ctor! {
        /// A record value of the wrong shape for its member.
        shape_mismatch => ShapeMismatch
    }
    cow_ctor! {
        /// Corrupt or truncated payload bytes.
        invalid_data => InvalidData
    }

    /// A serial that the registry could not resolve (dangling reference).
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unresolved(owner: &'static str, key: &'static str, serial: Serial) -> Self {
        let err = Error::Unresolved {
            owner: owner.into(),
            key: key.into(),
            serial,
        };
        if PANIC_ON_ERROR {
            panic!("ORRERY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// A non-nullable reference member resolving to the null sentinel.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn required_null(owner: &'static str, key: &'static str) -> Self {
        let err = Error::RequiredNull {
            owner: owner.into(),
            key: key.into(),
        };
        if PANIC_ON_ERROR {
            panic!("ORRERY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Buffer boundary violation, preserved as raw offsets for diagnostics.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        let err = Error::BufferOutOfBound(offset, length, capacity);
        if PANIC_ON_ERROR {
            panic!("ORRERY_PANIC_ON_ERROR: {}", err);
        }
        err
    }
}

/// Ensures a condition holds; otherwise returns an [`enum@Error`].
///
/// ```
/// use orrery_core::ensure;
/// use orrery_core::error::Error;
///
/// fn check(n: i64) -> Result<(), Error> {
///     ensure!(n > 0, "serial must be positive");
///     ensure!(n < 10, "serial {} too large", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`enum@Error`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::invalid_data($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)))
    };
}
