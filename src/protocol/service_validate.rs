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
//! CAS protocol v2 `serviceValidate` response parsing.

use crate::mapping::AttributeBag;
use crate::protocol::types::ValidationOutcome;

/// Parse a `serviceValidate` response body.
///
/// Attributes are flattened by local element name, first occurrence wins.
/// The `isMemberOf` attribute is special: the upstream directory publishes
/// one occurrence per group, and the occurrence whose text contains
/// `base_property` replaces the first one in the flattened bag.
pub fn parse_response(body: &str, base_property: &str) -> ValidationOutcome {
    let doc = match roxmltree::Document::parse(body) {
        Ok(doc) => doc,
        Err(error) => {
            tracing::debug!(%error, "unparseable serviceValidate response");
            return ValidationOutcome::Malformed;
        }
    };

    if let Some(failure) = doc
        .descendants()
        .find(|node| node.tag_name().name() == "authenticationFailure")
    {
        return ValidationOutcome::Failure {
            reason: failure.text().unwrap_or_default().trim().to_string(),
        };
    }

    let Some(success) = doc
        .descendants()
        .find(|node| node.tag_name().name() == "authenticationSuccess")
    else {
        return ValidationOutcome::Malformed;
    };

    let Some(username) = success
        .children()
        .find(|node| node.tag_name().name() == "user")
        .and_then(|node| node.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
    else {
        return ValidationOutcome::Malformed;
    };

    let mut attributes = AttributeBag::new();
    if let Some(container) = success
        .children()
        .find(|node| node.tag_name().name() == "attributes")
    {
        let mut member_of_override: Option<String> = None;
        for attribute in container.children().filter(|node| node.is_element()) {
            let name = attribute.tag_name().name().to_string();
            let value = attribute.text().unwrap_or_default().trim().to_string();
            if name == "isMemberOf" && value.contains(base_property) {
                member_of_override = Some(value.clone());
            }
            attributes.entry(name).or_insert(value);
        }
        if let Some(value) = member_of_override {
            attributes.insert("isMemberOf".to_string(), value);
        }
    }

    ValidationOutcome::Success {
        username: Some(username),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS: &str = r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
        <cas:authenticationSuccess>
            <cas:user>alice</cas:user>
            <cas:attributes>
                <cas:mail>alice@example.com</cas:mail>
                <cas:givenName>Alice</cas:givenName>
                <cas:isMemberOf>cn=staff,ou=common,o=example</cas:isMemberOf>
                <cas:isMemberOf>cn=opendata-admins,ou=opendata,o=example</cas:isMemberOf>
            </cas:attributes>
        </cas:authenticationSuccess>
    </cas:serviceResponse>"#;

    const FAILURE: &str = r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
        <cas:authenticationFailure code="INVALID_TICKET">
            Ticket ST-1 not recognized
        </cas:authenticationFailure>
    </cas:serviceResponse>"#;

    #[test]
    fn test_success_with_member_of_selection() {
        assert_eq!(
            parse_response(SUCCESS, "ou=opendata"),
            ValidationOutcome::Success {
                username: Some("alice".into()),
                attributes: AttributeBag::from([
                    ("mail".to_string(), "alice@example.com".to_string()),
                    ("givenName".to_string(), "Alice".to_string()),
                    (
                        "isMemberOf".to_string(),
                        "cn=opendata-admins,ou=opendata,o=example".to_string()
                    ),
                ]),
            }
        );
    }

    #[test]
    fn test_first_member_of_wins_without_base_match() {
        let ValidationOutcome::Success { attributes, .. } =
            parse_response(SUCCESS, "ou=elsewhere")
        else {
            panic!("expected success");
        };
        assert_eq!(
            attributes.get("isMemberOf").map(String::as_str),
            Some("cn=staff,ou=common,o=example")
        );
    }

    #[test]
    fn test_failure() {
        assert_eq!(
            parse_response(FAILURE, ""),
            ValidationOutcome::Failure {
                reason: "Ticket ST-1 not recognized".into(),
            }
        );
    }

    #[test]
    fn test_success_without_user_is_malformed() {
        let body = r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
            <cas:authenticationSuccess/>
        </cas:serviceResponse>"#;
        assert_eq!(parse_response(body, ""), ValidationOutcome::Malformed);
    }

    #[test]
    fn test_non_xml_is_malformed() {
        assert_eq!(
            parse_response("502 Bad Gateway", ""),
            ValidationOutcome::Malformed
        );
    }
}
