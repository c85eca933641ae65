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
//! # Configuration
//!
//! The configuration is read once at startup from an INI file and never
//! mutated afterwards. All CAS related options live in the `[cas]` section;
//! violations of the required-option rules are raised eagerly through
//! [`Config::validate`] so a misconfigured service refuses to start instead
//! of rejecting every login at runtime.
use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use thiserror::Error;

use crate::mapping::{AttributeMapping, MappingError};
use crate::protocol::types::ProtocolVariant;

/// Configuration validation errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("option `cas.{0}` is required")]
    MissingOption(&'static str),

    #[error(
        "configure either `cas.service_validation_url` or `cas.saml_validation_url`, not both"
    )]
    ValidationUrlConflict,

    #[error("one of `cas.service_validation_url` or `cas.saml_validation_url` is required")]
    ValidationUrlMissing,

    #[error("`cas.user_mapping` must map the `email` attribute")]
    EmailMappingRequired,

    #[error("`cas.user_mapping` must map the `user` attribute when SAML validation is used")]
    UserMappingRequired,

    #[error(transparent)]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("invalid url in `cas.{option}`: {source}")]
    InvalidUrl {
        option: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Global configuration options
    #[serde(rename = "DEFAULT")]
    pub default: Option<DefaultSection>,

    /// CAS protocol and attribute-mapping configuration.
    #[serde(default)]
    pub cas: CasSection,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseSection,

    /// Identity (local user directory) configuration.
    #[serde(default)]
    pub identity: IdentitySection,

    /// Session provider configuration.
    #[serde(default)]
    pub session: SessionSection,

    /// Ticket ledger configuration.
    #[serde(default)]
    pub ticket: TicketSection,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DefaultSection {
    /// Debug logging
    pub debug: Option<bool>,
}

/// The `[cas]` section.
///
/// `login_url`, `logout_url` and `application_url` are required, as are the
/// three role discriminator properties. Exactly one of
/// `service_validation_url` (CAS protocol v2) and `saml_validation_url`
/// (SAML 1.1 over SOAP) must be set; it selects the validation variant for
/// the whole deployment.
#[derive(Clone, Debug, Deserialize)]
pub struct CasSection {
    /// CAS server login endpoint.
    #[serde(default)]
    pub login_url: String,

    /// CAS server logout endpoint.
    #[serde(default)]
    pub logout_url: String,

    /// Base URL under which this application is reachable.
    #[serde(default)]
    pub application_url: String,

    /// CAS v2 `serviceValidate` endpoint.
    #[serde(default)]
    pub service_validation_url: Option<String>,

    /// SAML 1.1 validation endpoint.
    #[serde(default)]
    pub saml_validation_url: Option<String>,

    /// User attribute mapping entries of the form `field~key` or
    /// `field~key1+key2`. Joined lookups concatenate the resolved values
    /// with a single space in the declared order.
    #[serde(default, deserialize_with = "csv")]
    pub user_mapping: Vec<String>,

    /// Role marker value granting sysadmin rights.
    #[serde(default)]
    pub admin_property: String,

    /// Role marker value granting plain membership.
    #[serde(default)]
    pub member_property: String,

    /// Substring selecting the relevant `isMemberOf` occurrence when the
    /// validation response carries several of them.
    #[serde(default)]
    pub base_property: String,

    /// Verify the CAS server TLS certificate.
    #[serde(default = "default_true")]
    pub verify_certificate: bool,

    /// Propagate logouts to the CAS server.
    #[serde(default)]
    pub single_sign_out: bool,

    /// Where to send the browser when the CAS server rejects a ticket. When
    /// unset a rejected login fails with 401.
    #[serde(default)]
    pub unsuccessful_login_redirect_url: Option<String>,

    /// Query parameter carrying the ticket on the callback.
    #[serde(default = "default_ticket_key")]
    pub ticket_key: String,

    /// Query parameter carrying the service URL on validation requests.
    #[serde(default = "default_service_key")]
    pub service_key: String,

    /// Login checkup cool-down in seconds.
    #[serde(default = "default_login_checkup_time")]
    pub login_checkup_time: u64,

    /// Name of the cookie suppressing repeated login checkups.
    #[serde(default = "default_login_checkup_cookie")]
    pub login_checkup_cookie: String,

    /// Name of the local session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Optional path prefix the application is mounted under.
    #[serde(default)]
    pub root_path: Option<String>,

    /// When set, `/user/register` redirects to this URL.
    #[serde(default)]
    pub register_url: Option<String>,

    /// Redirect anonymous page requests through a CAS gateway login check.
    /// Off by default; the checkup cookie throttles the round trips.
    #[serde(default)]
    pub gateway_login: bool,
}

impl Default for CasSection {
    fn default() -> Self {
        Self {
            login_url: String::new(),
            logout_url: String::new(),
            application_url: String::new(),
            service_validation_url: None,
            saml_validation_url: None,
            user_mapping: Vec::new(),
            admin_property: String::new(),
            member_property: String::new(),
            base_property: String::new(),
            verify_certificate: true,
            single_sign_out: false,
            unsuccessful_login_redirect_url: None,
            ticket_key: default_ticket_key(),
            service_key: default_service_key(),
            login_checkup_time: default_login_checkup_time(),
            login_checkup_cookie: default_login_checkup_cookie(),
            cookie_name: default_cookie_name(),
            root_path: None,
            register_url: None,
            gateway_login: false,
        }
    }
}

impl CasSection {
    /// The validation variant selected by the configuration.
    pub fn protocol_variant(&self) -> Result<ProtocolVariant, ConfigError> {
        match (&self.service_validation_url, &self.saml_validation_url) {
            (Some(_), Some(_)) => Err(ConfigError::ValidationUrlConflict),
            (Some(_), None) => Ok(ProtocolVariant::ServiceValidation),
            (None, Some(_)) => Ok(ProtocolVariant::SamlValidation),
            (None, None) => Err(ConfigError::ValidationUrlMissing),
        }
    }

    /// Parse the `user_mapping` entries into an [`AttributeMapping`].
    pub fn attribute_mapping(&self) -> Result<AttributeMapping, ConfigError> {
        Ok(AttributeMapping::parse(
            self.user_mapping.iter().map(String::as_str),
        )?)
    }
}

pub fn csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Into::into)
        .collect())
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DatabaseSection {
    /// Database URL.
    #[serde(default)]
    pub connection: SecretString,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IdentitySection {
    #[serde(default = "default_sql_driver")]
    pub driver: String,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            driver: default_sql_driver(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionSection {
    #[serde(default = "default_sql_driver")]
    pub driver: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            driver: default_sql_driver(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TicketSection {
    #[serde(default = "default_sql_driver")]
    pub driver: String,
}

impl Default for TicketSection {
    fn default() -> Self {
        Self {
            driver: default_sql_driver(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ticket_key() -> String {
    "ticket".into()
}

fn default_service_key() -> String {
    "service".into()
}

fn default_login_checkup_time() -> u64 {
    600
}

fn default_login_checkup_cookie() -> String {
    "cas_login_check".into()
}

fn default_cookie_name() -> String {
    "sessionid".into()
}

fn default_sql_driver() -> String {
    "sql".into()
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        let cfg: Self = builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the required-option rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cas.login_url.is_empty() {
            return Err(ConfigError::MissingOption("login_url"));
        }
        if self.cas.logout_url.is_empty() {
            return Err(ConfigError::MissingOption("logout_url"));
        }
        if self.cas.application_url.is_empty() {
            return Err(ConfigError::MissingOption("application_url"));
        }
        if self.cas.admin_property.is_empty() {
            return Err(ConfigError::MissingOption("admin_property"));
        }
        if self.cas.member_property.is_empty() {
            return Err(ConfigError::MissingOption("member_property"));
        }
        if self.cas.base_property.is_empty() {
            return Err(ConfigError::MissingOption("base_property"));
        }

        let variant = self.cas.protocol_variant()?;

        if self.cas.user_mapping.is_empty() {
            return Err(ConfigError::MissingOption("user_mapping"));
        }
        let mapping = self.cas.attribute_mapping()?;
        if !mapping.contains("email") {
            return Err(ConfigError::EmailMappingRequired);
        }
        // The SAML response does not carry a dedicated `user` element, the
        // username has to come from the mapped attributes.
        if matches!(variant, ProtocolVariant::SamlValidation) && !mapping.contains("user") {
            return Err(ConfigError::UserMappingRequired);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_cas_section() -> CasSection {
        CasSection {
            login_url: "https://sso.example.org/cas/login".into(),
            logout_url: "https://sso.example.org/cas/logout".into(),
            application_url: "https://data.example.org".into(),
            service_validation_url: Some("https://sso.example.org/cas/serviceValidate".into()),
            user_mapping: vec![
                "user~uid".into(),
                "email~mail".into(),
                "fullname~givenName+sn".into(),
                "sysadmin~isMemberOf".into(),
            ],
            admin_property: "opendata-admins".into(),
            member_property: "opendata-members".into(),
            base_property: "ou=opendata".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        let cfg = Config {
            cas: valid_cas_section(),
            ..Default::default()
        };
        cfg.validate().unwrap();
        assert_eq!(
            cfg.cas.protocol_variant().unwrap(),
            ProtocolVariant::ServiceValidation
        );
    }

    #[test]
    fn test_validate_requires_login_url() {
        let mut cas = valid_cas_section();
        cas.login_url = String::new();
        let cfg = Config {
            cas,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MissingOption("login_url"))
        ));
    }

    #[test]
    fn test_validation_url_xor() {
        let mut cas = valid_cas_section();
        cas.saml_validation_url = Some("https://sso.example.org/cas/samlValidate".into());
        let cfg = Config {
            cas: cas.clone(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ValidationUrlConflict)
        ));

        cas.service_validation_url = None;
        cas.saml_validation_url = None;
        let cfg = Config {
            cas,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ValidationUrlMissing)
        ));
    }

    #[test]
    fn test_email_mapping_required() {
        let mut cas = valid_cas_section();
        cas.user_mapping = vec!["user~uid".into(), "fullname~cn".into()];
        let cfg = Config {
            cas,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmailMappingRequired)
        ));
    }

    #[test]
    fn test_saml_requires_user_mapping() {
        let mut cas = valid_cas_section();
        cas.service_validation_url = None;
        cas.saml_validation_url = Some("https://sso.example.org/cas/samlValidate".into());
        cas.user_mapping = vec!["email~mail".into()];
        let cfg = Config {
            cas,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UserMappingRequired)
        ));
    }

    #[test]
    fn test_defaults() {
        let cas = CasSection::default();
        assert!(cas.verify_certificate);
        assert!(!cas.single_sign_out);
        assert_eq!(cas.ticket_key, "ticket");
        assert_eq!(cas.service_key, "service");
        assert_eq!(cas.login_checkup_time, 600);
        assert_eq!(cas.login_checkup_cookie, "cas_login_check");
        assert_eq!(cas.cookie_name, "sessionid");
    }
}
