// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test-plan generation orchestrator.
//!
//! [`Generator`] resolves a ticket (cache or tracker) and a template, streams
//! a plan from the selected provider, and records the result in history.
//! [`DefaultProviderFactory`] binds provider selections to saved settings.

pub mod factory;
pub mod orchestrator;

pub use factory::DefaultProviderFactory;
pub use orchestrator::{GenerationOutcome, GenerationRequest, Generator, GeneratorParts};
