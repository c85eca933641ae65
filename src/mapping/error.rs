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

#[derive(Debug, Error, PartialEq)]
pub enum MappingError {
    /// A `user_mapping` entry does not follow the `field~key[+key...]` shape.
    #[error("malformed user mapping entry `{0}`, expected `field~key[+key...]`")]
    InvalidEntry(String),

    /// The same normalized field is mapped twice.
    #[error("user mapping declares field `{0}` more than once")]
    DuplicateField(String),

    /// A required normalized field could not be resolved from the attribute
    /// bag the CAS server returned.
    #[error("required attribute `{0}` could not be resolved")]
    MissingAttribute(&'static str),
}
