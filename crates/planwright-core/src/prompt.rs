// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction shared by every generation provider.
//!
//! The output is a pure function of the [`GenerationContext`]: identical
//! contexts always produce identical messages.

use std::fmt::Write;

use crate::types::{GenerationContext, Ticket};

/// Fixed system instruction framing the model as a QA expert.
pub const SYSTEM_PROMPT: &str = "You are an expert QA engineer with deep experience in \
software testing, test design techniques, and risk-based test planning. You write clear, \
thorough, and actionable test plans that developers and testers can execute directly. \
Always follow the structure of the template you are given.";

const INSTRUCTIONS: &str = "\
Using the ticket details and the template above, write a complete test plan:
1. Follow the template's sections and ordering exactly.
2. Derive test scenarios from the description and every acceptance criterion.
3. Cover positive, negative, boundary, and error-handling cases.
4. For each test case give an id, title, preconditions, steps, and expected result.
5. Call out risks, assumptions, and anything that needs clarification.
6. Format the entire output as Markdown.";

/// The two messages sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    pub system: String,
    pub user: String,
}

/// Builds the system and user messages for a generation request.
pub fn build_messages(context: &GenerationContext) -> PromptMessages {
    PromptMessages {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_message(&context.ticket, &context.template_content),
    }
}

fn build_user_message(ticket: &Ticket, template: &str) -> String {
    let mut out = String::with_capacity(template.len() + ticket.description.len() + 1024);

    out.push_str("Generate a test plan for the following ticket.\n\n");
    out.push_str("## Ticket Details\n");
    let _ = writeln!(out, "- Ticket ID: {}", ticket.key);
    let _ = writeln!(out, "- Summary: {}", ticket.summary);
    let _ = writeln!(out, "- Priority: {}", or_none(ticket.priority.as_deref()));
    let _ = writeln!(out, "- Status: {}", or_none(ticket.status.as_deref()));
    let _ = writeln!(
        out,
        "- Assignee: {}",
        ticket.assignee.as_deref().unwrap_or("Unassigned")
    );
    let labels = if ticket.labels.is_empty() {
        "None".to_string()
    } else {
        ticket.labels.join(", ")
    };
    let _ = writeln!(out, "- Labels: {labels}");

    out.push_str("\n## Description\n");
    out.push_str(non_empty_or(&ticket.description, "No description provided."));
    out.push_str("\n\n## Acceptance Criteria\n");
    out.push_str(non_empty_or(
        &ticket.acceptance_criteria,
        "No acceptance criteria specified.",
    ));

    out.push_str("\n\n## Template\n");
    out.push_str(template);
    out.push_str("\n\n## Instructions\n");
    out.push_str(INSTRUCTIONS);
    out
}

fn or_none(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "None",
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value.trim()
    }
}
