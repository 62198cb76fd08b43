// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0

pub mod companies_house;
pub mod health;
pub mod manage_account;
pub mod manage_permissions;
