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
//! # Attribute mapper
//!
//! Converts the attribute bag of a validation response into a normalized
//! [`UserProfile`] using the `cas.user_mapping` configuration. The mapping is
//! parsed once at startup and is immutable afterwards.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod error;

pub use error::MappingError;

/// Flattened attribute bag of a validation response.
pub type AttributeBag = HashMap<String, String>;

/// How the raw role marker attribute is turned into the discriminator token
/// compared against `cas.admin_property`/`cas.member_property`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarkerStyle {
    /// The marker is a distinguished name; the token sits between `cn=` and
    /// `,o=` (CAS v2 `isMemberOf` values).
    Bracketed,

    /// The marker is compared verbatim (SAML attribute values).
    Plain,
}

/// Normalized result of mapping a validation response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct UserProfile {
    /// Local username.
    pub username: String,

    /// Email address. Always populated, the mapping configuration is
    /// rejected at startup otherwise.
    pub email: String,

    /// Display name.
    pub fullname: Option<String>,

    /// Role discriminator token. `None` when the response carried no usable
    /// marker; the authenticator rejects such logins.
    pub role_marker: Option<String>,
}

/// Mapping from normalized field names to external attribute keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeMapping {
    fields: Vec<(String, Vec<String>)>,
}

impl AttributeMapping {
    /// Parse `field~key` / `field~key1+key2` entries.
    pub fn parse<'a, I: IntoIterator<Item = &'a str>>(
        entries: I,
    ) -> Result<Self, MappingError> {
        let mut fields: Vec<(String, Vec<String>)> = Vec::new();
        for entry in entries {
            let Some((field, keys)) = entry.split_once('~') else {
                return Err(MappingError::InvalidEntry(entry.to_string()));
            };
            let field = field.trim();
            let keys: Vec<String> = keys
                .split('+')
                .map(str::trim)
                .map(String::from)
                .collect();
            if field.is_empty() || keys.iter().any(String::is_empty) {
                return Err(MappingError::InvalidEntry(entry.to_string()));
            }
            if fields.iter().any(|(f, _)| f == field) {
                return Err(MappingError::DuplicateField(field.to_string()));
            }
            fields.push((field.to_string(), keys));
        }
        Ok(Self { fields })
    }

    /// Is the normalized field mapped at all?
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|(f, _)| f == field)
    }

    /// Resolve a normalized field against the attribute bag. Joined lookups
    /// concatenate the values found with a single space in the declared
    /// order; keys absent from the bag contribute nothing. `None` when no
    /// key resolved.
    pub fn resolve(&self, field: &str, attributes: &AttributeBag) -> Option<String> {
        let (_, keys) = self.fields.iter().find(|(f, _)| f == field)?;
        let found: Vec<&str> = keys
            .iter()
            .filter_map(|key| attributes.get(key))
            .map(String::as_str)
            .collect();
        if found.is_empty() {
            None
        } else {
            Some(found.join(" "))
        }
    }
}

/// Extract the discriminator token between `cn=` and `,o=` of a
/// distinguished name, mirroring how group memberships are published by the
/// upstream directory.
fn bracketed_token(value: &str) -> String {
    let after = value.split_once("cn=").map_or("", |(_, rest)| rest);
    after
        .split_once(",o=")
        .map_or(after, |(token, _)| token)
        .to_string()
}

/// Map the attribute bag onto a [`UserProfile`].
///
/// `username` is the name asserted by the validation response itself (CAS v2
/// carries it outside the attribute bag); when absent it is resolved through
/// the `user` mapping instead.
pub fn build_profile(
    mapping: &AttributeMapping,
    attributes: &AttributeBag,
    username: Option<String>,
    marker_style: MarkerStyle,
) -> Result<UserProfile, MappingError> {
    let username = match username {
        Some(name) => name,
        None => mapping
            .resolve("user", attributes)
            .ok_or(MappingError::MissingAttribute("user"))?,
    };
    let email = mapping
        .resolve("email", attributes)
        .ok_or(MappingError::MissingAttribute("email"))?;
    let fullname = mapping.resolve("fullname", attributes);

    let role_marker = mapping
        .resolve("sysadmin", attributes)
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| match marker_style {
            MarkerStyle::Bracketed => bracketed_token(&raw),
            MarkerStyle::Plain => raw,
        });

    Ok(UserProfile {
        username,
        email,
        fullname,
        role_marker,
    })
}
