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
//! SAML 1.1 ticket validation over SOAP.

use chrono::Utc;
use uuid::Uuid;

use crate::mapping::AttributeBag;
use crate::protocol::types::ValidationOutcome;

const ISSUE_INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Build the SOAP envelope carrying a SAML 1.0 `Request` with the ticket as
/// the `AssertionArtifact`.
pub fn build_request(ticket: &str) -> String {
    format!(
        r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/"><SOAP-ENV:Header/><SOAP-ENV:Body><samlp:Request xmlns:samlp="urn:oasis:names:tc:SAML:1.0:protocol" MajorVersion="1" MinorVersion="1" RequestID="{}" IssueInstant="{}"><samlp:AssertionArtifact>{}</samlp:AssertionArtifact></samlp:Request></SOAP-ENV:Body></SOAP-ENV:Envelope>"#,
        Uuid::new_v4().simple(),
        Utc::now().format(ISSUE_INSTANT_FORMAT),
        ticket,
    )
}

/// Parse the SOAP response of the SAML validation endpoint.
///
/// Success is `StatusCode/@Value == "samlp:Success"`; the attribute bag is
/// flattened from the `AttributeStatement`, the username travels inside it.
pub fn parse_response(body: &str) -> ValidationOutcome {
    let doc = match roxmltree::Document::parse(body) {
        Ok(doc) => doc,
        Err(error) => {
            tracing::debug!(%error, "unparseable SAML validation response");
            return ValidationOutcome::Malformed;
        }
    };

    let Some(status_code) = doc
        .descendants()
        .find(|node| node.tag_name().name() == "StatusCode")
    else {
        return ValidationOutcome::Malformed;
    };

    if status_code.attribute("Value") != Some("samlp:Success") {
        return match doc
            .descendants()
            .find(|node| node.tag_name().name() == "StatusMessage")
            .and_then(|node| node.text())
        {
            Some(message) => ValidationOutcome::Failure {
                reason: message.trim().to_string(),
            },
            None => ValidationOutcome::Malformed,
        };
    }

    let mut attributes = AttributeBag::new();
    for attribute in doc
        .descendants()
        .filter(|node| node.tag_name().name() == "Attribute")
    {
        let Some(name) = attribute.attribute("AttributeName") else {
            continue;
        };
        let value = attribute
            .children()
            .find(|node| node.tag_name().name() == "AttributeValue")
            .and_then(|node| node.text())
            .unwrap_or_default();
        attributes.insert(name.to_string(), value.trim().to_string());
    }

    ValidationOutcome::Success {
        username: None,
        attributes,
    }
}
