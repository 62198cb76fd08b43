// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0

pub mod journey;
pub mod permission;
pub mod session;
