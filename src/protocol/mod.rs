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
//! # CAS protocol client
//!
//! Talks to the CAS server to redeem a service ticket. The variant (CAS v2
//! `serviceValidate` or SAML 1.1 over SOAP) is fixed by the configuration for
//! the whole deployment; both produce the same [`ValidationOutcome`] shape so
//! everything downstream is variant-agnostic.
use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;
use reqwest::header::CONTENT_TYPE;
use url::Url;

pub mod error;
pub mod saml_validate;
pub mod service_validate;
pub mod types;

use crate::config::Config;
use crate::protocol::error::ProtocolError;
use crate::protocol::types::{ProtocolVariant, ValidationOutcome};

#[derive(Clone, Debug)]
pub struct ProtocolClient {
    client: reqwest::Client,
    variant: ProtocolVariant,
    validation_url: String,
    ticket_key: String,
    service_key: String,
    base_property: String,
}

#[async_trait]
pub trait ProtocolApi: Send + Sync + Clone {
    /// Redeem a ticket against the CAS server. `service` is the callback URL
    /// the ticket was issued for.
    async fn validate<'a>(
        &self,
        ticket: &'a str,
        service: &'a str,
    ) -> Result<ValidationOutcome, ProtocolError>;
}

impl ProtocolClient {
    pub fn new(config: &Config) -> Result<Self, ProtocolError> {
        let variant = config.cas.protocol_variant()?;
        let validation_url = match variant {
            ProtocolVariant::ServiceValidation => config.cas.service_validation_url.clone(),
            ProtocolVariant::SamlValidation => config.cas.saml_validation_url.clone(),
        }
        .ok_or(crate::config::ConfigError::ValidationUrlMissing)?;

        // CAS hands the browser back with the ticket attached, so the client
        // itself must never follow redirects.
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.cas.verify_certificate)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            variant,
            validation_url,
            ticket_key: config.cas.ticket_key.clone(),
            service_key: config.cas.service_key.clone(),
            base_property: config.cas.base_property.clone(),
        })
    }

    async fn service_validate(
        &self,
        ticket: &str,
        service: &str,
    ) -> Result<ValidationOutcome, ProtocolError> {
        let url = Url::parse_with_params(
            &self.validation_url,
            [
                (self.ticket_key.as_str(), ticket),
                (self.service_key.as_str(), service),
            ],
        )?;
        let body = self.client.get(url).send().await?.text().await?;
        Ok(service_validate::parse_response(&body, &self.base_property))
    }

    async fn saml_validate(
        &self,
        ticket: &str,
        service: &str,
    ) -> Result<ValidationOutcome, ProtocolError> {
        let url = Url::parse_with_params(&self.validation_url, [("TARGET", service)])?;
        let body = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml")
            .body(saml_validate::build_request(ticket))
            .send()
            .await?
            .text()
            .await?;
        Ok(saml_validate::parse_response(&body))
    }
}

#[async_trait]
impl ProtocolApi for ProtocolClient {
    #[tracing::instrument(level = "info", skip(self))]
    async fn validate<'a>(
        &self,
        ticket: &'a str,
        service: &'a str,
    ) -> Result<ValidationOutcome, ProtocolError> {
        match self.variant {
            ProtocolVariant::ServiceValidation => self.service_validate(ticket, service).await,
            ProtocolVariant::SamlValidation => self.saml_validate(ticket, service).await,
        }
    }
}

#[cfg(test)]
mock! {
    pub ProtocolClient {
        pub fn new(cfg: &Config) -> Result<Self, ProtocolError>;
    }

    #[async_trait]
    impl ProtocolApi for ProtocolClient {
        async fn validate<'a>(
            &self,
            ticket: &'a str,
            service: &'a str,
        ) -> Result<ValidationOutcome, ProtocolError>;
    }

    impl Clone for ProtocolClient {
        fn clone(&self) -> Self;
    }
}
