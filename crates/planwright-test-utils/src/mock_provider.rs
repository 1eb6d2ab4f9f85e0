// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation provider with scripted event sequences.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use planwright_core::{
    ConnectionTest, EventStream, GenerationContext, GenerationEvent, GenerationProvider,
    PlanError, ProviderFactory, ProviderKind,
};
use tokio::sync::Mutex;

/// Replays a fixed list of events on every `generate` call and records the
/// contexts it was given.
pub struct MockProvider {
    kind: ProviderKind,
    temperature: f32,
    script: Vec<GenerationEvent>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    contexts: Arc<Mutex<Vec<GenerationContext>>>,
}

impl MockProvider {
    /// Emits `fragments` as content events followed by `complete`.
    pub fn streaming(kind: ProviderKind, fragments: &[&str]) -> Self {
        let mut script: Vec<GenerationEvent> =
            vec![GenerationEvent::progress("Connecting to mock...", 30)];
        script.extend(fragments.iter().map(|f| GenerationEvent::content(*f)));
        script.push(GenerationEvent::complete(fragments.concat()));
        Self::scripted(kind, script)
    }

    /// Emits exactly `script`, in order.
    pub fn scripted(kind: ProviderKind, script: Vec<GenerationEvent>) -> Self {
        Self {
            kind,
            temperature: 0.7,
            script,
            delay: None,
            calls: AtomicUsize::new(0),
            contexts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Emits `fragments` and then fails with `error`.
    pub fn failing_after(kind: ProviderKind, fragments: &[&str], error: &PlanError) -> Self {
        let mut script: Vec<GenerationEvent> =
            fragments.iter().map(|f| GenerationEvent::content(*f)).collect();
        script.push(GenerationEvent::error(error));
        Self::scripted(kind, script)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sleeps before each event, for cancellation tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Contexts passed to `generate`, oldest first.
    pub async fn contexts(&self) -> Vec<GenerationContext> {
        self.contexts.lock().await.clone()
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn generate(&self, context: GenerationContext) -> EventStream {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.clone();
        let delay = self.delay;
        let contexts = Arc::clone(&self.contexts);
        Box::pin(replay(contexts, context, script, delay))
    }

    async fn test_connection(&self) -> ConnectionTest {
        ConnectionTest::ok("mock provider ready", Some(vec!["mock-model".into()]))
    }

    async fn list_models(&self) -> Result<Vec<String>, PlanError> {
        Ok(vec!["mock-model".into()])
    }
}

/// Records the context once polled, then replays the script.
fn replay(
    contexts: Arc<Mutex<Vec<GenerationContext>>>,
    context: GenerationContext,
    script: Vec<GenerationEvent>,
    delay: Option<Duration>,
) -> impl futures::Stream<Item = GenerationEvent> + Send {
    use futures::StreamExt;

    let record = futures::stream::once(async move {
        contexts.lock().await.push(context);
    })
    .filter_map(|()| async { None::<GenerationEvent> });

    let events = futures::stream::iter(script).then(move |event| async move {
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        event
    });

    record.chain(events)
}

/// Hands out registered providers; unregistered kinds fail with
/// `Precondition`.
#[derive(Default)]
pub struct MockProviderFactory {
    providers: HashMap<ProviderKind, Arc<MockProvider>>,
}

impl MockProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Arc<MockProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }
}

#[async_trait]
impl ProviderFactory for MockProviderFactory {
    async fn provider(&self, kind: ProviderKind) -> Result<Arc<dyn GenerationProvider>, PlanError> {
        self.providers
            .get(&kind)
            .map(|p| Arc::clone(p) as Arc<dyn GenerationProvider>)
            .ok_or_else(|| PlanError::Precondition(format!("provider `{kind}` is not configured")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use planwright_core::Ticket;

    fn context() -> GenerationContext {
        GenerationContext {
            ticket: Ticket {
                id: None,
                key: "QA-1".into(),
                summary: "s".into(),
                description: String::new(),
                priority: None,
                status: None,
                assignee: None,
                labels: vec![],
                acceptance_criteria: String::new(),
                attachments: vec![],
                fetched_at: chrono::Utc::now(),
            },
            template_content: "t".into(),
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn replays_script_and_records_context() {
        let provider = MockProvider::streaming(ProviderKind::Cloud, &["a", "b"]);
        let events: Vec<_> = provider.generate(context()).collect().await;
        assert_eq!(events.len(), 4);
        assert_eq!(events[3], GenerationEvent::complete("ab"));
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.contexts().await[0].ticket.key, "QA-1");
    }

    #[tokio::test]
    async fn factory_rejects_unregistered_kind() {
        let factory = MockProviderFactory::new()
            .with(Arc::new(MockProvider::streaming(ProviderKind::Local, &["x"])));
        assert!(factory.provider(ProviderKind::Local).await.is_ok());
        assert!(factory.provider(ProviderKind::Cloud).await.is_err());
    }
}
