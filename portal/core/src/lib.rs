// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Accord Account-Management Portal — Core
//!
//! Session-backed web front end for an account-management portal: signed-in
//! users manage organisation details, team members, and permission delegation
//! through multi-step wizard flows. Business data lives in a downstream
//! "facade" REST API; this crate holds the journey/session state machine that
//! keeps users from skipping ahead in a wizard, and the glue around it.
//!
//! ## Layers
//!
//! - [`domain`] — journey log, session aggregate, permission derivation
//! - [`application`] — session manager, account service
//! - [`infrastructure`] — session store, facade client, configuration
//! - [`presentation`] — axum router, middleware, handlers

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
