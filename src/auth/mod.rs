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
//! # Authenticator
//!
//! Ties the protocol client, the attribute mapper, the identity reconciler,
//! the ticket ledger and the session provider into the login state machine:
//!
//! ```text
//! callback(ticket) ── validate ──> VALIDATED ── map/reconcile ──> AUTHENTICATED
//!        │                             │
//!   no ticket                      REJECTED (denied, malformed, role mismatch)
//! ```
//!
//! Each callback is a fresh run; nothing here is retried since a service
//! ticket is single-use.
use chrono::Utc;

pub mod error;
pub mod identify;
pub mod login;
pub mod reconcile;

pub use identify::{IdentifyOutcome, identify};

use crate::auth::error::AuthenticationError;
use crate::identity::types::LocalUser;
use crate::mapping::{MarkerStyle, build_profile};
use crate::protocol::ProtocolApi;
use crate::protocol::types::{ProtocolVariant, ValidationOutcome};
use crate::service::ServiceState;
use crate::session::SessionApi;
use crate::session::types::Session;
use crate::ticket::TicketApi;
use crate::ticket::types::TicketEntry;

/// Terminal state of a successful callback run.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedLogin {
    /// The reconciled local account.
    pub user: LocalUser,

    /// Fresh session binding for the browser.
    pub session: Session,

    /// Where to send the browser next.
    pub redirect_to: String,
}

/// Post-login redirect target. `next` is honored unless it points back at
/// the generic login page, which would loop; the dashboard is used instead.
fn redirect_target(state: &ServiceState, next: Option<&str>, username: &str) -> String {
    let app = &state.config.cas.application_url;
    match next {
        Some(next) if next.contains("user/login") => format!("{app}/dashboard/{username}"),
        Some(next) if next.starts_with('/') => format!("{app}{next}"),
        Some(next) => next.to_string(),
        None => app.clone(),
    }
}

/// Run the whole callback state machine for a present ticket: validate it,
/// map the attributes, reconcile the account, record the ledger row and
/// start a session.
#[tracing::instrument(level = "info", skip(state, next))]
pub async fn authenticate_ticket(
    state: &ServiceState,
    variant: ProtocolVariant,
    ticket: &str,
    next: Option<&str>,
) -> Result<AuthenticatedLogin, AuthenticationError> {
    let service = login::service_url(&state.config.cas, variant, next)?;
    let outcome = state
        .provider
        .get_protocol_client()
        .validate(ticket, service.as_str())
        .await?;

    let (username, attributes) = match outcome {
        ValidationOutcome::Success {
            username,
            attributes,
        } => (username, attributes),
        ValidationOutcome::Failure { reason } => {
            return Err(AuthenticationError::Rejected {
                ticket: ticket.to_string(),
                reason,
            });
        }
        ValidationOutcome::Malformed => {
            return Err(AuthenticationError::Rejected {
                ticket: ticket.to_string(),
                reason: "unexpected validation response".to_string(),
            });
        }
    };
    tracing::info!(ticket, "validation of the ticket succeeded");

    let marker_style = match variant {
        ProtocolVariant::ServiceValidation => MarkerStyle::Bracketed,
        ProtocolVariant::SamlValidation => MarkerStyle::Plain,
    };
    let mapping = state.config.cas.attribute_mapping()?;
    let profile = build_profile(&mapping, &attributes, username, marker_style)?;

    let user = reconcile::reconcile(state, &profile).await?;

    state
        .provider
        .get_ticket_provider()
        .register(
            state,
            TicketEntry {
                ticket: ticket.to_string(),
                username: user.name.clone(),
                created_at: Utc::now(),
            },
        )
        .await?;

    let session = state
        .provider
        .get_session_provider()
        .start_session(state, &user.name)
        .await?;

    let redirect_to = redirect_target(state, next, &user.name);
    Ok(AuthenticatedLogin {
        user,
        session,
        redirect_to,
    })
}

/// Drop the local session and ledger state of a user. When single sign-out
/// is configured the caller follows up with a redirect to the CAS logout
/// page.
#[tracing::instrument(level = "info", skip(state))]
pub async fn logout(
    state: &ServiceState,
    session_id: Option<&str>,
) -> Result<(), AuthenticationError> {
    let Some(session_id) = session_id else {
        return Ok(());
    };
    let sessions = state.provider.get_session_provider();
    if let Some(session) = sessions.get_session(state, session_id).await? {
        state
            .provider
            .get_ticket_provider()
            .delete_for_user(state, &session.username)
            .await?;
        sessions.clear_session(state, session_id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::config::tests::valid_cas_section;
    use crate::identity::MockIdentityProvider;
    use crate::mapping::AttributeBag;
    use crate::protocol::MockProtocolClient;
    use crate::provider::{Provider, ProviderBuilder};
    use crate::service::Service;
    use crate::session::MockSessionProvider;
    use crate::ticket::MockTicketProvider;

    fn state(builder: ProviderBuilder) -> ServiceState {
        let config = Config {
            cas: valid_cas_section(),
            ..Config::default()
        };
        Arc::new(
            Service::new(config, DatabaseConnection::Disconnected, builder.build().unwrap())
                .unwrap(),
        )
    }

    fn success_outcome() -> ValidationOutcome {
        ValidationOutcome::Success {
            username: Some("alice".into()),
            attributes: AttributeBag::from([
                ("mail".to_string(), "alice@example.com".to_string()),
                ("givenName".to_string(), "Alice".to_string()),
                ("sn".to_string(), "Doe".to_string()),
                (
                    "isMemberOf".to_string(),
                    "cn=opendata-members,ou=opendata,o=example".to_string(),
                ),
            ]),
        }
    }

    fn local_user() -> LocalUser {
        LocalUser {
            id: "uid".into(),
            name: "alice".into(),
            email: "alice@example.com".into(),
            fullname: Some("Alice Doe".into()),
            sysadmin: false,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_ticket_login() {
        let mut protocol_mock = MockProtocolClient::default();
        protocol_mock
            .expect_validate()
            .withf(|ticket, service| {
                ticket == "ST-1" && service == "https://data.example.org/cas/callback"
            })
            .returning(|_, _| Ok(success_outcome()));
        let mut identity_mock = MockIdentityProvider::default();
        identity_mock.expect_get_user().returning(|_, _| Ok(None));
        identity_mock
            .expect_create_user()
            .returning(|_, _| Ok(local_user()));
        let mut ticket_mock = MockTicketProvider::default();
        ticket_mock
            .expect_register()
            .withf(|_, entry| entry.ticket == "ST-1" && entry.username == "alice")
            .times(1)
            .returning(|_, entry| Ok(entry));
        let mut session_mock = MockSessionProvider::default();
        session_mock
            .expect_start_session()
            .withf(|_, username| username == "alice")
            .returning(|_, username| {
                Ok(Session {
                    id: "sid".into(),
                    username: username.into(),
                    ..Default::default()
                })
            });

        let state = state(
            Provider::mocked_builder()
                .protocol(protocol_mock)
                .identity(identity_mock)
                .ticket(ticket_mock)
                .session(session_mock),
        );

        let login = authenticate_ticket(
            &state,
            ProtocolVariant::ServiceValidation,
            "ST-1",
            None,
        )
        .await
        .unwrap();
        assert_eq!(login.user, local_user());
        assert_eq!(login.session.id, "sid");
        assert_eq!(login.redirect_to, "https://data.example.org");
    }

    #[tokio::test]
    async fn test_denied_ticket_is_rejected() {
        let mut protocol_mock = MockProtocolClient::default();
        protocol_mock.expect_validate().returning(|_, _| {
            Ok(ValidationOutcome::Failure {
                reason: "ticket expired".into(),
            })
        });
        let state = state(Provider::mocked_builder().protocol(protocol_mock));

        match authenticate_ticket(&state, ProtocolVariant::ServiceValidation, "ST-2", None).await
        {
            Err(AuthenticationError::Rejected { ticket, reason }) => {
                assert_eq!(ticket, "ST-2");
                assert_eq!(reason, "ticket expired");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_is_rejected() {
        let mut protocol_mock = MockProtocolClient::default();
        protocol_mock
            .expect_validate()
            .returning(|_, _| Ok(ValidationOutcome::Malformed));
        let state = state(Provider::mocked_builder().protocol(protocol_mock));

        assert!(matches!(
            authenticate_ticket(&state, ProtocolVariant::ServiceValidation, "ST-3", None).await,
            Err(AuthenticationError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_email_attribute_is_a_mapping_rejection() {
        let mut protocol_mock = MockProtocolClient::default();
        protocol_mock.expect_validate().returning(|_, _| {
            Ok(ValidationOutcome::Success {
                username: Some("alice".into()),
                attributes: AttributeBag::new(),
            })
        });
        let state = state(Provider::mocked_builder().protocol(protocol_mock));

        assert!(matches!(
            authenticate_ticket(&state, ProtocolVariant::ServiceValidation, "ST-4", None).await,
            Err(AuthenticationError::Mapping { .. })
        ));
    }

    #[test]
    fn test_redirect_target() {
        let state = state(Provider::mocked_builder());
        assert_eq!(
            redirect_target(&state, None, "alice"),
            "https://data.example.org"
        );
        assert_eq!(
            redirect_target(&state, Some("/dataset/x"), "alice"),
            "https://data.example.org/dataset/x"
        );
        assert_eq!(
            redirect_target(&state, Some("https://data.example.org/p"), "alice"),
            "https://data.example.org/p"
        );
        assert_eq!(
            redirect_target(&state, Some("/user/login"), "alice"),
            "https://data.example.org/dashboard/alice"
        );
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_ledger() {
        let mut session_mock = MockSessionProvider::default();
        session_mock.expect_get_session().returning(|_, _| {
            Ok(Some(Session {
                id: "sid".into(),
                username: "alice".into(),
                ..Default::default()
            }))
        });
        session_mock
            .expect_clear_session()
            .withf(|_, id| id == "sid")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut ticket_mock = MockTicketProvider::default();
        ticket_mock
            .expect_delete_for_user()
            .withf(|_, username| username == "alice")
            .times(1)
            .returning(|_, _| Ok(()));
        let state = state(
            Provider::mocked_builder()
                .session(session_mock)
                .ticket(ticket_mock),
        );

        logout(&state, Some("sid")).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_without_session_is_a_noop() {
        let state = state(Provider::mocked_builder());
        logout(&state, None).await.unwrap();
    }
}
