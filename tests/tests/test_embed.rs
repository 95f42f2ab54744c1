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

use orrery::{members, Orrery, Scope, Value};

#[derive(Default)]
struct Body {
    serial: u64,
    mass: f64,
    designation: String,
}

#[derive(Default)]
struct Station {
    serial: u64,
    body: Body,
    designation: String,
    docking_bays: u32,
}

members! {
    Body => "Body" {
        id: serial;
        "Mass" => mass: f64 [remote],
        "Designation" => designation: String [],
    }
}

members! {
    Station => "Station" {
        id: serial;
        embed { body: Body }
        "Designation" => designation: String [remote],
        "DockingBays" => docking_bays: u32 [remote],
    }
}

#[test]
fn test_embedded_members_serialize_flat() {
    let mut orrery = Orrery::new();
    orrery.register::<Station>().unwrap();

    let station = Station {
        serial: 4,
        body: Body {
            serial: 0,
            mass: 5_400.0,
            designation: "ignored".into(),
        },
        designation: "Highport".into(),
        docking_bays: 12,
    };
    let record = orrery.serialize(&station, Scope::Persistent).unwrap();

    // The base contributes Mass; its Designation is shadowed by the
    // station's own declaration under the same key.
    assert_eq!(record.get("Mass"), Some(&Value::Float(5_400.0)));
    assert_eq!(record.get("Designation"), Some(&Value::Str("Highport".into())));
    assert_eq!(record.get("DockingBays"), Some(&Value::UInt(12)));
    assert_eq!(record.len(), 3);
}

#[test]
fn test_embedded_members_load_into_base() {
    let mut orrery = Orrery::new();
    orrery.register::<Station>().unwrap();

    let station = Station {
        serial: 4,
        body: Body {
            serial: 0,
            mass: 5_400.0,
            designation: String::new(),
        },
        designation: "Highport".into(),
        docking_bays: 12,
    };
    let record = orrery.serialize(&station, Scope::Persistent).unwrap();

    let mut restored = Station::default();
    orrery.deserialize(&mut restored, &record).unwrap();
    assert_eq!(restored.body.mass, 5_400.0);
    assert_eq!(restored.designation, "Highport");
    // The shadowed base member is never written to.
    assert_eq!(restored.body.designation, "");
}

#[test]
fn test_override_respects_own_tags() {
    let mut orrery = Orrery::new();
    orrery.register::<Station>().unwrap();

    let station = Station {
        serial: 4,
        body: Body::default(),
        designation: "Highport".into(),
        docking_bays: 12,
    };
    // Base Designation is save-only; the station's override is replicated.
    let record = orrery.serialize(&station, Scope::Remote).unwrap();
    assert_eq!(record.get("Designation"), Some(&Value::Str("Highport".into())));
}
