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

//! Per-type member tables: the declarative replacement for the original
//! reflection scan. Each entry wraps one field behind a pair of accessor
//! functions and dispatches to the [`Field`] strategy chosen by the field's
//! declared type.

use crate::entity::Replicated;
use crate::error::Error;
use crate::field::Field;
use crate::record::Value;
use crate::resolver::graph::ResolveCx;
use crate::tag::Tag;

/// Read-only member context handed to every field strategy call: the owning
/// type and resolved key for error messages, plus the tag bits the strategy
/// honors.
#[derive(Clone, Copy, Debug)]
pub struct MemberCx {
    pub owner: &'static str,
    pub key: &'static str,
    pub nullable: bool,
    pub debug: bool,
}

type SaveFn<T> = Box<dyn Fn(&T, &MemberCx) -> Result<Value, Error> + Send + Sync>;
type LoadFn<T> = Box<dyn Fn(&mut T, &Value, &MemberCx) -> Result<(), Error> + Send + Sync>;
type RelinkFn<T> = Box<dyn Fn(&mut T, &ResolveCx<'_>, &MemberCx) -> Result<(), Error> + Send + Sync>;
type ClearFn<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// One serializable member of `T`: tag, resolved key, and the erased
/// strategy calls. Stateless beyond the accessors; shared by every instance
/// of the owning type.
pub struct MemberDef<T> {
    tag: Tag,
    key: &'static str,
    save: SaveFn<T>,
    load: LoadFn<T>,
    relink: RelinkFn<T>,
    clear: ClearFn<T>,
}

impl<T: 'static> MemberDef<T> {
    fn of<F: Field + 'static>(
        tag: Tag,
        member_name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> MemberDef<T> {
        MemberDef {
            tag,
            key: tag.resolved_key(member_name),
            save: Box::new(move |t, cx| get(t).save(cx)),
            load: Box::new(move |t, value, cx| get_mut(t).load(value, cx)),
            relink: Box::new(move |t, resolve, cx| get_mut(t).relink(resolve, cx)),
            clear: Box::new(move |t| get_mut(t).clear_pending()),
        }
    }

    /// Lifts a base type's member through a field projection, so an
    /// embedding type serializes the base's members as its own.
    fn lifted<B: 'static>(
        base: &'static MemberDef<B>,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> MemberDef<T> {
        MemberDef {
            tag: base.tag,
            key: base.key,
            save: Box::new(move |t, cx| (base.save)(get(t), cx)),
            load: Box::new(move |t, value, cx| (base.load)(get_mut(t), value, cx)),
            relink: Box::new(move |t, resolve, cx| (base.relink)(get_mut(t), resolve, cx)),
            clear: Box::new(move |t| (base.clear)(get_mut(t))),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    fn cx(&self, owner: &'static str) -> MemberCx {
        MemberCx {
            owner,
            key: self.key,
            nullable: self.tag.is_nullable(),
            debug: self.tag.needs_debug(),
        }
    }

    pub fn save(&self, entity: &T, owner: &'static str) -> Result<Value, Error> {
        (self.save)(entity, &self.cx(owner))
    }

    pub fn load(&self, entity: &mut T, value: &Value, owner: &'static str) -> Result<(), Error> {
        (self.load)(entity, value, &self.cx(owner))
    }

    pub fn relink(
        &self,
        entity: &mut T,
        resolve: &ResolveCx<'_>,
        owner: &'static str,
    ) -> Result<(), Error> {
        (self.relink)(entity, resolve, &self.cx(owner))
    }

    pub fn clear_pending(&self, entity: &mut T) {
        (self.clear)(entity)
    }
}

/// The per-type member table: ordered entries, at most one per serialized
/// key. Later insertions replace earlier ones in place, which is how an
/// embedding type's own declaration overrides an embedded base's member
/// under the same key.
pub struct MemberTable<T> {
    type_name: &'static str,
    entries: Vec<MemberDef<T>>,
}

impl<T: 'static> MemberTable<T> {
    pub fn new(type_name: &'static str) -> MemberTable<T> {
        MemberTable {
            type_name,
            entries: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declares one member. The field's type picks the serialization
    /// strategy through its [`Field`] impl.
    pub fn insert<F: Field + 'static>(
        &mut self,
        tag: Tag,
        member_name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) {
        self.insert_def(MemberDef::of(tag, member_name, get, get_mut));
    }

    /// Pulls every member of an embedded base type into this table through
    /// the given projections. Call before declaring own members so that a
    /// re-declaration under the same key takes precedence.
    pub fn inherit<B: Replicated>(&mut self, get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) {
        for base in B::members().entries() {
            self.insert_def(MemberDef::lifted(base, get, get_mut));
        }
    }

    fn insert_def(&mut self, def: MemberDef<T>) {
        match self.entries.iter_mut().find(|e| e.key == def.key) {
            Some(slot) => *slot = def,
            None => self.entries.push(def),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MemberDef<T>> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entries(&self) -> &[MemberDef<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declares the serializable members of an entity type and implements
/// [`Entity`](crate::entity::Entity) and
/// [`Replicated`](crate::entity::Replicated) for it.
///
/// The first line names the serial field. An optional `embed { .. }` block
/// pulls in member tables of embedded base structs; own declarations listed
/// after it override embedded members that resolve to the same key. Each
/// member line is `"Key" => field: Type [flags]` with the key override
/// optional and flags drawn from `remote`, `transient`, `required`, `debug`
/// (see [`Tag`](crate::tag::Tag)).
///
/// ```rust
/// use orrery_core::field::link::Link;
/// use orrery_core::members;
///
/// #[derive(Default)]
/// struct Faction {
///     serial: u64,
///     name: String,
/// }
///
/// #[derive(Default)]
/// struct Planet {
///     serial: u64,
///     name: String,
///     owner: Link<Faction>,
/// }
///
/// members! {
///     Faction => "Faction" {
///         id: serial;
///         "Name" => name: String [remote],
///     }
/// }
///
/// members! {
///     Planet => "Planet" {
///         id: serial;
///         "Name" => name: String [remote],
///         "Owner" => owner: Link<Faction> [remote required],
///     }
/// }
/// ```
#[macro_export]
macro_rules! members {
    (
        $ty:ident => $type_name:literal {
            id: $id:ident;
            $( $( $key:literal => )? $f:ident : $ft:ty [ $( $flag:ident )* ] ),* $(,)?
        }
    ) => {
        $crate::members! {
            $ty => $type_name {
                id: $id;
                embed { }
                $( $( $key => )? $f : $ft [ $( $flag )* ] ),*
            }
        }
    };
    (
        $ty:ident => $type_name:literal {
            id: $id:ident;
            embed { $( $ef:ident : $et:ty ),* $(,)? }
            $( $( $key:literal => )? $f:ident : $ft:ty [ $( $flag:ident )* ] ),* $(,)?
        }
    ) => {
        impl $crate::entity::Entity for $ty {
            fn serial(&self) -> $crate::types::Serial {
                self.$id
            }

            fn set_serial(&mut self, serial: $crate::types::Serial) {
                self.$id = serial;
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::entity::Replicated for $ty {
            const TYPE_NAME: &'static str = $type_name;

            fn members() -> &'static $crate::member::MemberTable<$ty> {
                static TABLE: ::std::sync::LazyLock<$crate::member::MemberTable<$ty>> =
                    ::std::sync::LazyLock::new(|| {
                        let mut table = $crate::member::MemberTable::new($type_name);
                        $(
                            table.inherit(
                                (|e: &$ty| &e.$ef) as fn(&$ty) -> &$et,
                                (|e: &mut $ty| &mut e.$ef) as fn(&mut $ty) -> &mut $et,
                            );
                        )*
                        $(
                            table.insert(
                                $crate::tag::Tag::new() $( .key($key) )? $( .$flag() )*,
                                stringify!($f),
                                (|e: &$ty| &e.$f) as fn(&$ty) -> &$ft,
                                (|e: &mut $ty| &mut e.$f) as fn(&mut $ty) -> &mut $ft,
                            );
                        )*
                        table
                    });
                &TABLE
            }
        }
    };
}
