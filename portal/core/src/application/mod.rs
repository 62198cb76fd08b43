// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0

pub mod account_service;
pub mod session_manager;
