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
//! Cookie plumbing shared by the CAS endpoints.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;

use crate::config::CasSection;

/// The application landing page, honoring a configured root path.
pub(crate) fn application_home(cas: &CasSection) -> String {
    match &cas.root_path {
        Some(root) => format!("{}{}", cas.application_url, root),
        None => cas.application_url.clone(),
    }
}

/// The session cookie binding the browser to a session id.
pub(crate) fn session_cookie(cas: &CasSection, session_id: &str) -> Cookie<'static> {
    Cookie::build((cas.cookie_name.clone(), session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// An expired session cookie, used to drop the binding on logout.
pub(crate) fn clear_session_cookie(cas: &CasSection) -> Cookie<'static> {
    let mut cookie = Cookie::build((cas.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie
}

/// The login-checkup cookie. Its presence tells the gateway it already asked
/// the CAS server about this browser recently, breaking redirect loops when
/// the callback comes back without a ticket.
pub(crate) fn checkup_cookie(cas: &CasSection) -> Cookie<'static> {
    Cookie::build((
        cas.login_checkup_cookie.clone(),
        Utc::now().timestamp().to_string(),
    ))
    .path("/")
    .max_age(time::Duration::seconds(cas.login_checkup_time as i64))
    .build()
}
