// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation provider capability (cloud API, local daemon).

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::PlanError;
use crate::types::{ConnectionTest, GenerationContext, GenerationEvent, ProviderKind};

/// Lazy, single-pass event sequence. Dropping it stops the producer and
/// releases the upstream connection.
pub type EventStream = Pin<Box<dyn Stream<Item = GenerationEvent> + Send>>;

/// A backend that turns a generation context into a streamed test plan.
#[async_trait]
pub trait GenerationProvider: Send + Sync + 'static {
    /// Which variant this provider is.
    fn kind(&self) -> ProviderKind;

    /// Temperature this provider generates with. Cloud reads the persisted
    /// per-provider value; local uses a fixed default.
    fn temperature(&self) -> f32;

    /// Starts a generation. Nothing happens until the stream is polled.
    ///
    /// The returned stream ends with exactly one `complete` or `error` event.
    /// Provider failures are classified into [`PlanError`] kinds before they
    /// are emitted.
    fn generate(&self, context: GenerationContext) -> EventStream;

    /// Lightweight reachability and credential check. Expected failures are
    /// reported with `success: false`, never as errors.
    async fn test_connection(&self) -> ConnectionTest;

    /// Ordered list of model identifiers this provider can use.
    async fn list_models(&self) -> Result<Vec<String>, PlanError>;
}

/// Maps a provider selection onto a configuration-bound provider instance.
#[async_trait]
pub trait ProviderFactory: Send + Sync + 'static {
    async fn provider(&self, kind: ProviderKind) -> Result<Arc<dyn GenerationProvider>, PlanError>;
}
