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

use orrery::{
    members, GraphStore, Link, Orrery, PayloadHeader, SaveTypeMapper, Scope,
};

#[derive(Default)]
struct Faction {
    serial: u64,
    name: String,
}

#[derive(Default)]
struct Planet {
    serial: u64,
    name: String,
    population: i64,
    owner: Link<Faction>,
}

// Same shape as Planet under the current type name, standing in for a
// renamed type across save versions.
#[derive(Default)]
struct World {
    serial: u64,
    name: String,
    population: i64,
    owner: Link<Faction>,
}

members! {
    Faction => "Faction" {
        id: serial;
        "Name" => name: String [remote],
    }
}

members! {
    Planet => "Planet" {
        id: serial;
        "Name" => name: String [remote],
        "Population" => population: i64 [],
        "Owner" => owner: Link<Faction> [remote],
    }
}

members! {
    World => "World" {
        id: serial;
        "Name" => name: String [remote],
        "Population" => population: i64 [],
        "Owner" => owner: Link<Faction> [remote],
    }
}

fn engine() -> Orrery {
    let mut orrery = Orrery::new();
    orrery.register::<Faction>().unwrap();
    orrery.register::<Planet>().unwrap();
    orrery
}

fn sample_store() -> Result<GraphStore, orrery::Error> {
    let mut store = GraphStore::new();
    let faction = Faction {
        serial: 3,
        name: "Concord".into(),
    };
    let planet = Planet {
        serial: 7,
        name: "Vesta".into(),
        population: 12_000_000,
        owner: Link::to(&faction),
    };
    store.insert(faction)?;
    store.insert(planet)?;
    Ok(store)
}

#[test]
fn test_pack_unpack_round_trip() {
    let orrery = engine();
    let store = sample_store().unwrap();
    let bytes = orrery.pack(&store, 7, Scope::Persistent).unwrap();

    let mut loaded = GraphStore::new();
    let root = orrery.unpack(&bytes, &mut loaded).unwrap();
    assert_eq!(root, 7);
    assert_eq!(loaded.len(), 2);

    let planet = loaded.get::<Planet>(7).unwrap();
    assert_eq!(planet.name, "Vesta");
    assert_eq!(planet.population, 12_000_000);
    assert!(planet.owner.is_live());
    assert_eq!(planet.owner.get(&loaded).unwrap().name, "Concord");
}

#[test]
fn test_header_describes_payload() {
    let orrery = engine();
    let store = sample_store().unwrap();
    let bytes = orrery.pack(&store, 7, Scope::Persistent).unwrap();

    let header = PayloadHeader::peek(&bytes).unwrap();
    assert!(header.is_persistent());
    assert!(header.is_compressed());
    assert!(header.timestamp().is_some());

    let mut delta_engine = Orrery::builder().compress(false).build();
    delta_engine.register::<Faction>().unwrap();
    delta_engine.register::<Planet>().unwrap();
    let bytes = delta_engine.pack(&store, 7, Scope::Remote).unwrap();
    let header = PayloadHeader::peek(&bytes).unwrap();
    assert!(!header.is_persistent());
    assert!(!header.is_compressed());
}

#[test]
fn test_uncompressed_payload_round_trips() {
    let mut orrery = Orrery::builder().compress(false).build();
    orrery.register::<Faction>().unwrap();
    orrery.register::<Planet>().unwrap();

    let store = sample_store().unwrap();
    let bytes = orrery.pack(&store, 7, Scope::Persistent).unwrap();
    let mut loaded = GraphStore::new();
    orrery.unpack(&bytes, &mut loaded).unwrap();
    assert_eq!(loaded.get::<Planet>(7).unwrap().name, "Vesta");
}

#[test]
fn test_remote_pack_drops_save_only_members() {
    let orrery = engine();
    let store = sample_store().unwrap();
    let bytes = orrery.pack(&store, 7, Scope::Remote).unwrap();

    let mut loaded = GraphStore::new();
    orrery.unpack(&bytes, &mut loaded).unwrap();
    // Population is save-only, so the delta leaves the default.
    assert_eq!(loaded.get::<Planet>(7).unwrap().population, 0);
    assert_eq!(loaded.get::<Planet>(7).unwrap().name, "Vesta");
}

#[test]
fn test_unpack_updates_live_entities_in_place() {
    let orrery = engine();
    let store = sample_store().unwrap();
    let bytes = orrery.pack(&store, 7, Scope::Remote).unwrap();

    // The receiving side already holds both entities, with older state and
    // local-only state that the delta must not clobber.
    let mut live = sample_store().unwrap();
    live.get_mut::<Planet>(7).unwrap().name = "stale".into();
    live.get_mut::<Planet>(7).unwrap().population = 11_000_000;

    orrery.unpack(&bytes, &mut live).unwrap();
    let planet = live.get::<Planet>(7).unwrap();
    assert_eq!(planet.name, "Vesta");
    assert_eq!(planet.population, 11_000_000);
}

#[test]
fn test_bad_delta_keeps_live_entities() {
    let orrery = engine();

    // A delta updating planet 7 with an owner serial the receiver has
    // never heard of.
    let mut sender = GraphStore::new();
    sender
        .insert(Planet {
            serial: 7,
            name: "Vesta".into(),
            population: 0,
            owner: Link::raw(99),
        })
        .unwrap();
    let bytes = orrery.pack(&sender, 7, Scope::Remote).unwrap();

    let mut live = sample_store().unwrap();
    live.get_mut::<Planet>(7).unwrap().name = "stale".into();

    // The update itself lands, but the broken edge must not take the
    // already-live planet down with it.
    let root = orrery.unpack(&bytes, &mut live).unwrap();
    assert_eq!(root, 7);
    assert!(live.contains(7));
    let planet = live.get::<Planet>(7).unwrap();
    assert_eq!(planet.name, "Vesta");
    assert!(planet.owner.get(&live).is_none());
}

#[test]
fn test_bad_delta_drops_entities_it_introduced() {
    let orrery = engine();

    let mut sender = GraphStore::new();
    sender
        .insert(Planet {
            serial: 7,
            name: "Vesta".into(),
            population: 0,
            owner: Link::raw(99),
        })
        .unwrap();
    let bytes = orrery.pack(&sender, 7, Scope::Remote).unwrap();

    // Same payload into a store that never held planet 7: the fresh
    // entity is unusable and gets dropped.
    let mut empty = GraphStore::new();
    let root = orrery.unpack(&bytes, &mut empty).unwrap();
    assert_eq!(root, 7);
    assert!(!empty.contains(7));
}

#[test]
fn test_type_mapper_loads_renamed_types() {
    let orrery = engine();
    let store = sample_store().unwrap();
    let bytes = orrery.pack(&store, 7, Scope::Persistent).unwrap();

    // A newer build renamed Planet to World.
    let mut current = Orrery::new();
    current.register::<Faction>().unwrap();
    current.register::<World>().unwrap();

    let mut loaded = GraphStore::new();
    let err = current.unpack(&bytes, &mut loaded).unwrap_err();
    assert!(err.to_string().contains("unknown stored type `Planet`"));

    let mapper = SaveTypeMapper::new().with_mapping("Planet", "World");
    let mut loaded = GraphStore::new();
    let root = current
        .unpack_with_mapper(&bytes, &mut loaded, &mapper)
        .unwrap();
    assert_eq!(loaded.get::<World>(root).unwrap().name, "Vesta");
}

#[test]
fn test_bad_magic_is_rejected() {
    let orrery = engine();
    let err = orrery
        .unpack(&[0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 0, 0, 0, 0, 0, 0], &mut GraphStore::new())
        .unwrap_err();
    assert!(err.to_string().contains("bad magic number"));
}

#[test]
fn test_truncated_payload_is_rejected() {
    let orrery = engine();
    let store = sample_store().unwrap();
    let bytes = orrery.pack(&store, 7, Scope::Persistent).unwrap();
    let err = orrery
        .unpack(&bytes[..bytes.len() - 3], &mut GraphStore::new())
        .unwrap_err();
    assert!(err.to_string().contains("lz4 decompression failed"));
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut orrery = Orrery::builder().compress(false).build();
    orrery.register::<Faction>().unwrap();
    orrery.register::<Planet>().unwrap();

    let store = sample_store().unwrap();
    let mut bytes = orrery.pack(&store, 7, Scope::Persistent).unwrap();
    bytes.push(0x00);
    let err = orrery.unpack(&bytes, &mut GraphStore::new()).unwrap_err();
    assert!(err.to_string().contains("trailing bytes"));
}

#[test]
fn test_pack_requires_root_in_store() {
    let orrery = engine();
    let store = sample_store().unwrap();
    let err = orrery.pack(&store, 99, Scope::Persistent).unwrap_err();
    assert!(err.to_string().contains("root serial 99"));
}
