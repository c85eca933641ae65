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
//! Per-request identification against the session binding and the ticket
//! ledger.

use crate::auth::error::AuthenticationError;
use crate::service::ServiceState;
use crate::session::SessionApi;
use crate::session::types::Session;
use crate::ticket::TicketApi;

/// What the current request is allowed to act as.
#[derive(Clone, Debug, PartialEq)]
pub enum IdentifyOutcome {
    /// A session exists and the ticket ledger still vouches for the user.
    Authenticated(Session),

    /// A session exists but the CAS server stopped vouching for the user
    /// (single sign-out). The session binding has already been dropped.
    SignedOut,

    /// No usable session.
    Anonymous,
}

/// Resolve the session cookie against the session store and cross-check the
/// ticket ledger. The ledger is the signal for upstream logout: a session
/// without a ledger row is terminated on the spot.
#[tracing::instrument(level = "debug", skip(state))]
pub async fn identify(
    state: &ServiceState,
    session_id: Option<&str>,
) -> Result<IdentifyOutcome, AuthenticationError> {
    let Some(session_id) = session_id else {
        return Ok(IdentifyOutcome::Anonymous);
    };
    let Some(session) = state
        .provider
        .get_session_provider()
        .get_session(state, session_id)
        .await?
    else {
        return Ok(IdentifyOutcome::Anonymous);
    };

    if state
        .provider
        .get_ticket_provider()
        .is_valid(state, &session.username)
        .await?
    {
        Ok(IdentifyOutcome::Authenticated(session))
    } else {
        tracing::info!(
            username = %session.username,
            "user logged out of the CAS server, dropping the local session"
        );
        state
            .provider
            .get_session_provider()
            .clear_session(state, session_id)
            .await?;
        Ok(IdentifyOutcome::SignedOut)
    }
}
