// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Planwright.
//!
//! This crate provides the error taxonomy, domain types, generation event
//! schema, and the collaborator traits that the storage, ticket-source,
//! provider, and orchestrator crates implement or consume.

pub mod error;
pub mod prompt;
pub mod settings;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, PlanError};
pub use settings::{ProviderSettings, SettingsUpdate, SettingsView, TrackerCredentials};
pub use types::{
    Attachment, ConnectionTest, GenerationContext, GenerationEvent, HistoryEntry,
    NewHistoryRecord, NewTemplate, ProviderKind, Template, Ticket, normalize_ticket_key,
};

pub use traits::{
    CredentialStore, EventStream, GenerationProvider, HistoryStore, ProviderFactory,
    TemplateStore, TicketCache, TicketSource,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_has_all_variants() {
        let _config = PlanError::Config("test".into());
        let _precondition = PlanError::Precondition("test".into());
        let _not_found = PlanError::not_found("ticket", "ABC-1");
        let _unreachable = PlanError::unreachable("test");
        let _bad_gateway = PlanError::bad_gateway("test");
        let _unauthorized = PlanError::Unauthorized("test".into());
        let _rate_limited = PlanError::RateLimited("test".into());
        let _invalid = PlanError::InvalidInput("test".into());
        let _storage = PlanError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _vault = PlanError::Vault("test".into());
        let _timeout = PlanError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = PlanError::Internal("test".into());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_provider<T: GenerationProvider>() {}
        fn _assert_source<T: TicketSource>() {}
        fn _assert_cache<T: TicketCache>() {}
        fn _assert_templates<T: TemplateStore>() {}
        fn _assert_history<T: HistoryStore>() {}
        fn _assert_credentials<T: CredentialStore>() {}
        fn _assert_factory<T: ProviderFactory>() {}
    }
}
