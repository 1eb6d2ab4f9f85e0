// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Planwright integration tests.
//!
//! - [`MockProvider`] / [`MockProviderFactory`]: scripted generation events
//! - [`MockTicketSource`]: in-memory tracker with a fetch counter
//! - [`TestHarness`]: temp database, real stores, and a wired generator

pub mod harness;
pub mod mock_provider;
pub mod mock_source;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{MockProvider, MockProviderFactory};
pub use mock_source::{MockTicketSource, sample_ticket};
