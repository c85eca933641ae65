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

use crate::config::ConfigError;

/// Failure talking to the CAS server. Tickets are single-use, so nothing in
/// the validation path is ever retried automatically.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Configuration {
        #[from]
        source: ConfigError,
    },

    #[error(transparent)]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error(transparent)]
    UrlParse {
        #[from]
        source: url::ParseError,
    },
}
