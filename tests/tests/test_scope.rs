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

use orrery::{members, Orrery, Scope};

#[derive(Default)]
struct Ship {
    serial: u64,
    // Saved and replicated.
    name: String,
    // Saved only: clients recompute it locally.
    maintenance_cost: f64,
    // Replicated only: meaningless across sessions.
    target_heading: f64,
    // Neither: scratch state, declared for debug tracing.
    cached_path_len: u32,
}

members! {
    Ship => "Ship" {
        id: serial;
        "Name" => name: String [remote],
        "MaintenanceCost" => maintenance_cost: f64 [],
        "TargetHeading" => target_heading: f64 [remote transient],
        "CachedPathLen" => cached_path_len: u32 [transient debug],
    }
}

fn sample() -> Ship {
    Ship {
        serial: 21,
        name: "Dauntless".into(),
        maintenance_cost: 14.5,
        target_heading: 1.25,
        cached_path_len: 9,
    }
}

#[test]
fn test_persistent_record_keeps_saved_members_only() {
    let mut orrery = Orrery::new();
    orrery.register::<Ship>().unwrap();
    let record = orrery.serialize(&sample(), Scope::Persistent).unwrap();

    assert!(record.contains_key("Name"));
    assert!(record.contains_key("MaintenanceCost"));
    assert!(!record.contains_key("TargetHeading"));
    assert!(!record.contains_key("CachedPathLen"));
}

#[test]
fn test_remote_record_keeps_replicated_members_only() {
    let mut orrery = Orrery::new();
    orrery.register::<Ship>().unwrap();
    let record = orrery.serialize(&sample(), Scope::Remote).unwrap();

    assert!(record.contains_key("Name"));
    assert!(record.contains_key("TargetHeading"));
    assert!(!record.contains_key("MaintenanceCost"));
    assert!(!record.contains_key("CachedPathLen"));
}

#[test]
fn test_partial_record_leaves_other_members_untouched() {
    let mut orrery = Orrery::new();
    orrery.register::<Ship>().unwrap();
    let delta = orrery.serialize(&sample(), Scope::Remote).unwrap();

    let mut live = sample();
    live.name = "stale".into();
    live.maintenance_cost = 99.0;
    orrery.deserialize(&mut live, &delta).unwrap();

    // The delta carried Name and TargetHeading, nothing else.
    assert_eq!(live.name, "Dauntless");
    assert_eq!(live.maintenance_cost, 99.0);
}
