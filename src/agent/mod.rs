// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Agent gateway module
//!
//! The boundary to the remote agent runtime: the gateway trait, an HTTP
//! implementation, and a scripted mock for tests.

pub mod gateway;
pub mod http;
pub mod mock_gateway;

pub use gateway::*;
