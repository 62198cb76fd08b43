// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0

pub mod config;
pub mod facade;
pub mod session_store;
