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

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A local user directory entry. The stored password placeholder never
/// leaves the backend.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct LocalUser {
    /// The user ID.
    pub id: String,

    /// The user name. Unique across the directory.
    pub name: String,

    /// Email address delivered by the identity provider.
    pub email: String,

    /// Display name, when the identity provider carries one.
    #[builder(default)]
    pub fullname: Option<String>,

    /// Whether the user has the administrative role.
    #[builder(default)]
    pub sysadmin: bool,
}

/// User creation data.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[builder(setter(strip_option, into))]
pub struct UserCreate {
    /// The ID of the user. When unset a new UUID would be assigned.
    #[builder(default)]
    #[validate(length(min = 1, max = 64))]
    pub id: Option<String>,

    /// The user name. Must be unique across the directory.
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Email address.
    #[validate(email)]
    pub email: String,

    /// Display name.
    #[builder(default)]
    pub fullname: Option<String>,

    /// Password placeholder. When unset a random value would be written;
    /// the account can then only be entered through the single sign-on.
    #[builder(default)]
    pub password: Option<String>,

    /// Whether the user has the administrative role.
    #[builder(default)]
    pub sysadmin: bool,
}

/// User update data. Only the attributes the identity provider may drift on
/// are exposed.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[builder(setter(into))]
pub struct UserUpdate {
    /// New email address.
    #[builder(default)]
    #[validate(email)]
    pub email: Option<String>,

    /// New display name (`Some(None)` clears it).
    #[builder(default)]
    pub fullname: Option<Option<String>>,

    /// New administrative role flag.
    #[builder(default)]
    pub sysadmin: Option<bool>,
}
