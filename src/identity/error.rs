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
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::identity::backends::error::IdentityDatabaseError;

#[derive(Debug, Error)]
pub enum IdentityProviderError {
    /// Unsupported driver.
    #[error("unsupported identity driver {0}")]
    UnsupportedDriver(String),

    #[error(transparent)]
    IdentityDatabase {
        #[from]
        source: IdentityDatabaseError,
    },

    #[error(transparent)]
    Validation {
        #[from]
        source: validator::ValidationErrors,
    },
}
