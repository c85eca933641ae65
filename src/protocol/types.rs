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

use serde::{Deserialize, Serialize};

use crate::mapping::AttributeBag;

/// The ticket validation variant the deployment is configured for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ProtocolVariant {
    /// CAS protocol v2 `serviceValidate` (XML over GET).
    ServiceValidation,

    /// SAML 1.1 validation (SOAP over POST).
    SamlValidation,
}

/// Result of one ticket validation attempt. Consumed immediately by the
/// attribute mapper; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationOutcome {
    /// The CAS server vouched for the ticket.
    Success {
        /// Username asserted by the response itself. The SAML variant
        /// carries the username inside the attribute bag instead.
        username: Option<String>,

        /// Flattened response attributes.
        attributes: AttributeBag,
    },

    /// The CAS server explicitly denied the ticket.
    Failure {
        /// Text of the failure element.
        reason: String,
    },

    /// The response did not have the expected shape. Treated as a denial
    /// downstream, parser irregularities never propagate.
    Malformed,
}
