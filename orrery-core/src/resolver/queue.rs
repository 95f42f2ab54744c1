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

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::types::Serial;

/// FIFO of serials whose entities have finished both deserialization
/// phases. Producers (network threads finishing deltas) and the consumer
/// (the game loop firing post-load hooks) may run on different threads.
#[derive(Default)]
pub struct FinishedQueue {
    inner: Mutex<VecDeque<Serial>>,
}

impl FinishedQueue {
    pub fn new() -> FinishedQueue {
        FinishedQueue::default()
    }

    pub fn push(&self, serial: Serial) {
        self.inner.lock().unwrap().push_back(serial);
    }

    /// Takes everything queued so far, in arrival order.
    pub fn drain(&self) -> Vec<Serial> {
        self.inner.lock().unwrap().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
