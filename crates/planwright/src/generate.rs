// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `planwright generate`: runs the pipeline in-process. Plan text goes to
//! stdout as it streams; progress goes to stderr.

use std::io::Write;

use futures::StreamExt;
use planwright_config::PlanwrightConfig;
use planwright_core::{GenerationEvent, PlanError, ProviderKind};
use planwright_generator::GenerationRequest;
use tracing::warn;

use crate::app::App;

pub async fn run_generate(
    config: PlanwrightConfig,
    ticket: &str,
    template: Option<i64>,
    provider: Option<ProviderKind>,
) -> Result<(), PlanError> {
    crate::init_tracing(&config.server.log_level);

    let app = App::open(&config).await?;
    let mut events = app.generator.generate(GenerationRequest {
        ticket_id: ticket.to_string(),
        template_id: template,
        provider,
    });

    let mut stdout = std::io::stdout();
    let mut printed = false;
    let mut outcome = Ok(());
    while let Some(event) = events.next().await {
        match event {
            GenerationEvent::Progress { message, progress } => {
                eprintln!("[{progress:>3}%] {message}");
            }
            GenerationEvent::Content { data, .. } => {
                printed |= !data.is_empty();
                write_out(&mut stdout, &data)?;
            }
            GenerationEvent::Complete { data, .. } => {
                if !printed {
                    write_out(&mut stdout, &data)?;
                }
                write_out(&mut stdout, "\n")?;
                break;
            }
            GenerationEvent::Error { message, kind } => {
                outcome = Err(PlanError::Reported { kind, message });
                break;
            }
        }
    }
    drop(events);

    if let Err(e) = app.db.close().await {
        warn!(error = %e, "database close failed");
    }
    outcome
}

fn write_out(out: &mut impl Write, text: &str) -> Result<(), PlanError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| PlanError::Internal(format!("cannot write to stdout: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_out_flushes_text() {
        let mut buf = Vec::new();
        write_out(&mut buf, "# Plan").unwrap();
        assert_eq!(buf, b"# Plan");
    }
}
