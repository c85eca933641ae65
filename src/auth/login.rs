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
//! Redirect URL construction towards the CAS server.

use url::Url;

use crate::auth::error::AuthenticationError;
use crate::config::CasSection;
use crate::protocol::types::ProtocolVariant;

/// Callback path of the configured validation variant.
pub fn callback_path(variant: ProtocolVariant) -> &'static str {
    match variant {
        ProtocolVariant::ServiceValidation => "/cas/callback",
        ProtocolVariant::SamlValidation => "/cas/saml_callback",
    }
}

/// The service URL the CAS server hands the browser back to. `next` rides
/// inside the service URL so it survives the round trip to the CAS server.
pub fn service_url(
    cas: &CasSection,
    variant: ProtocolVariant,
    next: Option<&str>,
) -> Result<Url, AuthenticationError> {
    let base = format!("{}{}", cas.application_url, callback_path(variant));
    let url = match next {
        // Carrying the login page as `next` would bounce the browser between
        // the application and the CAS server forever.
        Some(next) if !next.contains("/user/login") => {
            Url::parse_with_params(&base, [("next", next)])?
        }
        _ => Url::parse(&base)?,
    };
    Ok(url)
}

/// The CAS login page URL the browser is redirected to.
///
/// With `gateway` the CAS server checks for an existing single-sign-on
/// session without prompting for credentials.
pub fn login_url(
    cas: &CasSection,
    variant: ProtocolVariant,
    gateway: bool,
    next: Option<&str>,
) -> Result<Url, AuthenticationError> {
    let service = service_url(cas, variant, next)?;
    let url = if gateway {
        Url::parse_with_params(
            &cas.login_url,
            [("gateway", "true"), ("service", service.as_str())],
        )?
    } else {
        Url::parse_with_params(&cas.login_url, [("service", service.as_str())])?
    };
    Ok(url)
}

/// The CAS logout URL used for single sign-out.
pub fn single_sign_out_url(cas: &CasSection) -> Result<Url, AuthenticationError> {
    let service = format!("{}/cas/logout", cas.application_url);
    Ok(Url::parse_with_params(
        &cas.logout_url,
        [("service", service.as_str())],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::valid_cas_section;

    #[test]
    fn test_login_url_with_next() {
        let url = login_url(
            &valid_cas_section(),
            ProtocolVariant::ServiceValidation,
            false,
            Some("https://data.example.org/dataset/x"),
        )
        .unwrap();
        assert!(url.as_str().starts_with("https://sso.example.org/cas/login?service="));
        let service: String = url
            .query_pairs()
            .find(|(k, _)| k == "service")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(
            service,
            "https://data.example.org/cas/callback?next=https%3A%2F%2Fdata.example.org%2Fdataset%2Fx"
        );
    }

    #[test]
    fn test_login_url_drops_login_page_next() {
        let url = service_url(
            &valid_cas_section(),
            ProtocolVariant::ServiceValidation,
            Some("https://data.example.org/user/login"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://data.example.org/cas/callback");
    }

    #[test]
    fn test_gateway_login_url() {
        let url = login_url(
            &valid_cas_section(),
            ProtocolVariant::ServiceValidation,
            true,
            None,
        )
        .unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "gateway" && v == "true"));
    }

    #[test]
    fn test_saml_variant_uses_saml_callback() {
        let url = service_url(
            &valid_cas_section(),
            ProtocolVariant::SamlValidation,
            None,
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://data.example.org/cas/saml_callback");
    }

    #[test]
    fn test_single_sign_out_url() {
        let url = single_sign_out_url(&valid_cas_section()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sso.example.org/cas/logout?service=https%3A%2F%2Fdata.example.org%2Fcas%2Flogout"
        );
    }
}
