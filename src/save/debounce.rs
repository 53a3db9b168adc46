// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Leading-edge debounce: the first call for a key runs, further calls for the same key inside
/// `window` of the last accepted one are dropped.
#[derive(Debug)]
pub struct Debounce<K> {
    window: Duration,
    last: Mutex<HashMap<K, Instant>>,
}

impl<K: Eq + Hash> Debounce<K> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` if the call for `key` should run.
    pub fn try_acquire(&self, key: K) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock().expect("debounce lock poisoned");
        match last.get(&key) {
            Some(prev) if now.duration_since(*prev) < self.window => false,
            _ => {
                last.insert(key, now);
                true
            }
        }
    }
}
