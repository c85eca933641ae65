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
//! Reconciliation of a mapped profile against the local user directory.

use crate::auth::error::AuthenticationError;
use crate::identity::IdentityApi;
use crate::identity::types::{LocalUser, UserCreate, UserUpdate};
use crate::mapping::UserProfile;
use crate::service::ServiceState;

/// Admin or member, decided by exact match of the role discriminator token.
/// Anything else is a hard rejection, not a downgrade to non-admin.
fn is_admin(state: &ServiceState, profile: &UserProfile) -> Result<bool, AuthenticationError> {
    let marker = profile.role_marker.as_deref().unwrap_or_default();
    if marker == state.config.cas.admin_property {
        Ok(true)
    } else if marker == state.config.cas.member_property {
        Ok(false)
    } else {
        Err(AuthenticationError::RoleNotAllowed)
    }
}

/// Provision or refresh the local account for a validated profile.
///
/// A missing account is created on the spot; creation failures abort the
/// login. An existing account is updated only when an attribute actually
/// drifted, and an update failure is logged and swallowed so a directory
/// hiccup does not lock the user out.
#[tracing::instrument(level = "info", skip(state, profile), fields(username = %profile.username))]
pub async fn reconcile(
    state: &ServiceState,
    profile: &UserProfile,
) -> Result<LocalUser, AuthenticationError> {
    let is_admin = is_admin(state, profile)?;
    let identity = state.provider.get_identity_provider();

    let Some(existing) = identity.get_user(state, &profile.username).await? else {
        let user = UserCreate {
            id: None,
            name: profile.username.clone(),
            email: profile.email.clone(),
            fullname: profile.fullname.clone(),
            password: None,
            sysadmin: is_admin,
        };
        tracing::info!(username = %profile.username, "provisioning new local user");
        return identity
            .create_user(state, user)
            .await
            .map_err(|source| AuthenticationError::Provisioning { source });
    };

    if existing.email == profile.email
        && existing.fullname == profile.fullname
        && existing.sysadmin == is_admin
    {
        return Ok(existing);
    }

    let update = UserUpdate {
        email: Some(profile.email.clone()),
        fullname: Some(profile.fullname.clone()),
        sysadmin: Some(is_admin),
    };
    match identity.update_user(state, &existing.name, update).await {
        Ok(updated) => Ok(updated),
        Err(error) => {
            tracing::warn!(
                username = %existing.name,
                %error,
                "refreshing the local user failed, continuing with the stale record"
            );
            Ok(existing)
        }
    }
}
