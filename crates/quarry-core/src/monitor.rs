// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The logging sink used by the content layers.

use crate::operation::Owner;
use log::Level;

/// Receives log messages from the content coordinator and its managers.
///
/// Messages attributed to an owner go through [`Monitor::log_as`], so hosts
/// can route them to that owner's log.
pub trait Monitor: Send + Sync {
    /// Logs a message from the content system itself.
    fn log(&self, level: Level, message: &str);

    /// Logs a message on behalf of a content owner.
    fn log_as(&self, owner: &Owner, level: Level, message: &str) {
        self.log(level, &format!("[{}] {}", owner.display_name(), message));
    }
}
