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

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use orrery::{members, Orrery, Record, Scope, Value};

#[derive(Default)]
struct Colony {
    serial: u64,
    name: String,
    population: i64,
    habitability: f64,
    fortified: bool,
    exports: Vec<String>,
    stockpile: BTreeMap<String, u64>,
    doctrines: HashSet<String>,
    founded: NaiveDate,
    motto: Option<String>,
}

members! {
    Colony => "Colony" {
        id: serial;
        "Name" => name: String [remote],
        "Population" => population: i64 [remote],
        "Habitability" => habitability: f64 [],
        "Fortified" => fortified: bool [remote],
        "Exports" => exports: Vec<String> [],
        "Stockpile" => stockpile: BTreeMap<String, u64> [],
        "Doctrines" => doctrines: HashSet<String> [],
        "Founded" => founded: NaiveDate [],
        "Motto" => motto: Option<String> [],
    }
}

fn sample() -> Colony {
    Colony {
        serial: 9,
        name: "New Cydonia".into(),
        population: 4_800_000,
        habitability: 0.62,
        fortified: true,
        exports: vec!["tritanium".into(), "isotopes".into()],
        stockpile: BTreeMap::from([("fuel".to_string(), 1200), ("ore".to_string(), 88)]),
        doctrines: HashSet::from(["expansion".to_string(), "trade".to_string()]),
        founded: NaiveDate::from_ymd_opt(2201, 6, 9).unwrap(),
        motto: Some("per ardua".into()),
    }
}

fn engine() -> Orrery {
    let mut orrery = Orrery::new();
    orrery.register::<Colony>().unwrap();
    orrery
}

#[test]
fn test_scalar_round_trip() {
    let orrery = engine();
    let colony = sample();
    let record = orrery.serialize(&colony, Scope::Persistent).unwrap();

    let mut restored = Colony::default();
    orrery.deserialize(&mut restored, &record).unwrap();

    assert_eq!(restored.name, colony.name);
    assert_eq!(restored.population, colony.population);
    assert_eq!(restored.habitability, colony.habitability);
    assert_eq!(restored.fortified, colony.fortified);
    assert_eq!(restored.exports, colony.exports);
    assert_eq!(restored.stockpile, colony.stockpile);
    assert_eq!(restored.doctrines, colony.doctrines);
    assert_eq!(restored.founded, colony.founded);
    assert_eq!(restored.motto, colony.motto);
}

#[test]
fn test_none_round_trips_as_null() {
    let orrery = engine();
    let mut colony = sample();
    colony.motto = None;
    let record = orrery.serialize(&colony, Scope::Persistent).unwrap();
    assert_eq!(record.get("Motto"), Some(&Value::Null));

    let mut restored = Colony::default();
    restored.motto = Some("stale".into());
    orrery.deserialize(&mut restored, &record).unwrap();
    assert_eq!(restored.motto, None);
}

#[test]
fn test_unknown_fields_are_skipped() {
    let orrery = engine();
    let mut record = orrery.serialize(&sample(), Scope::Persistent).unwrap();
    // As if written by a newer build that grew an extra member.
    record.push("Atmosphere", Value::Str("thin".into()));

    let mut restored = Colony::default();
    orrery.deserialize(&mut restored, &record).unwrap();
    assert_eq!(restored.name, "New Cydonia");
}

#[test]
fn test_wrong_shape_is_an_error() {
    let orrery = engine();
    let mut record = Record::new();
    record.push("Population", Value::Str("lots".into()));

    let mut restored = Colony::default();
    let err = orrery.deserialize(&mut restored, &record).unwrap_err();
    assert_eq!(err.to_string(), "Colony.Population: expected int, got string");
}

#[test]
fn test_serialize_unregistered_type_fails() {
    let orrery = Orrery::new();
    let err = orrery.serialize(&sample(), Scope::Persistent).unwrap_err();
    assert!(err.to_string().contains("not serializable"));
}

#[test]
fn test_duplicate_registration_fails() {
    let mut orrery = engine();
    let err = orrery.register::<Colony>().unwrap_err();
    assert!(err.to_string().contains("already registered"));
}
