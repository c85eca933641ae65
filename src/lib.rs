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

//! # CAS single-sign-on gateway
//!
//! A small identity gateway sitting between a data portal and an external CAS
//! (Central Authentication Service) server. Users are redirected to the CAS
//! login page; the service ticket returned by the CAS server is validated
//! against one of two protocol variants (the CAS v2 XML `serviceValidate`
//! endpoint or the legacy SAML 1.1 SOAP validation endpoint), the attributes
//! carried by the validation response are mapped onto a local user profile,
//! and the local account is provisioned or refreshed on every login.
//!
//! Next to the validation path the service keeps a small ticket ledger
//! holding the last validated ticket per user. The ledger is advisory and is
//! consulted on every request to detect single sign-out: once the CAS server
//! stops vouching for a user the local session is dropped as well.
//!
//! The crate is organized as a set of providers, each hiding its storage
//! behind a backend driver:
//!
//! - [`ticket`] — the ticket ledger,
//! - [`protocol`] — the remote validation client,
//! - [`mapping`] — attribute-bag to user-profile mapping,
//! - [`identity`] — the local user directory,
//! - [`session`] — local session binding,
//! - [`auth`] — the per-request authenticator tying them together,
//! - [`api`] — the HTTP surface (`/cas/login`, `/cas/callback`,
//!   `/cas/saml_callback`, `/cas/logout`, `/user/register`).

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod mapping;
pub mod protocol;
pub mod provider;
pub mod service;
pub mod session;
pub mod ticket;
