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
struct Reactor {
    serial: u64,
    output_mw: f64,
}

members! {
    Reactor => "Reactor" {
        id: serial;
        "OutputMw" => output_mw: f64 [remote debug],
    }
}

// Run with RUST_LOG=debug to see the per-member trace lines.
#[test]
fn test_debug_tagged_member_round_trips() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut orrery = Orrery::new();
    orrery.register::<Reactor>().unwrap();

    let reactor = Reactor {
        serial: 5,
        output_mw: 850.0,
    };
    let record = orrery.serialize(&reactor, Scope::Remote).unwrap();
    let mut restored = Reactor::default();
    orrery.deserialize(&mut restored, &record).unwrap();
    assert_eq!(restored.output_mw, 850.0);
}
