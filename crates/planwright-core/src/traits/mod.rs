// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility, so the
//! orchestrator can hold `Arc<dyn Trait>` handles injected at startup.

pub mod provider;
pub mod settings;
pub mod source;
pub mod store;

pub use provider::{EventStream, GenerationProvider, ProviderFactory};
pub use settings::CredentialStore;
pub use source::TicketSource;
pub use store::{HistoryStore, TemplateStore, TicketCache};
