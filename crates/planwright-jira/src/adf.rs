// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atlassian Document Format to plain text.
//!
//! Block nodes end with a newline, headings become `#` lines, list items get
//! `- ` or `N. ` markers (indented two spaces per nesting level), and unknown
//! nodes are flattened through their children. Plain strings, which older
//! API versions return, pass through unchanged.

use serde_json::Value;

/// Flattens an ADF document (or plain string) into text.
pub fn flatten(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => {
            let mut out = Flattener::default();
            out.node(other);
            let text = out.buf.trim_end().to_string();
            collapse_blank_lines(&text)
        }
    }
}

#[derive(Default)]
struct Flattener {
    buf: String,
    list_depth: usize,
}

impl Flattener {
    fn children(&mut self, node: &Value) {
        if let Some(content) = node.get("content").and_then(Value::as_array) {
            for child in content {
                self.node(child);
            }
        }
    }

    fn node(&mut self, node: &Value) {
        let kind = node.get("type").and_then(Value::as_str).unwrap_or_default();
        let attr = |name: &str| node.pointer(&format!("/attrs/{name}"));

        match kind {
            "text" => {
                if let Some(text) = node.get("text").and_then(Value::as_str) {
                    self.buf.push_str(text);
                }
            }
            "hardBreak" => self.buf.push('\n'),
            "paragraph" => {
                self.children(node);
                self.end_block();
            }
            "heading" => {
                let level = attr("level").and_then(Value::as_u64).unwrap_or(1).clamp(1, 6);
                self.start_block();
                self.buf.push_str(&"#".repeat(level as usize));
                self.buf.push(' ');
                self.children(node);
                self.end_block();
            }
            "bulletList" => self.list(node, None),
            "orderedList" => {
                let start = attr("order").and_then(Value::as_u64).unwrap_or(1);
                self.list(node, Some(start));
            }
            "codeBlock" => {
                self.start_block();
                self.buf.push_str("```\n");
                self.children(node);
                self.start_block();
                self.buf.push_str("```");
                self.end_block();
            }
            "blockquote" => {
                let mut inner = Flattener::default();
                inner.children(node);
                for line in inner.buf.trim_end().lines() {
                    self.buf.push_str("> ");
                    self.buf.push_str(line);
                    self.buf.push('\n');
                }
            }
            "rule" => {
                self.start_block();
                self.buf.push_str("---\n");
            }
            "mention" => {
                let text = attr("text").and_then(Value::as_str).unwrap_or_default();
                if !text.starts_with('@') {
                    self.buf.push('@');
                }
                self.buf.push_str(text);
            }
            "emoji" => {
                let text = attr("text")
                    .or_else(|| attr("shortName"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                self.buf.push_str(text);
            }
            "inlineCard" | "blockCard" => {
                if let Some(url) = attr("url").and_then(Value::as_str) {
                    self.buf.push_str(url);
                }
            }
            "tableRow" => {
                let cells: Vec<String> = node
                    .get("content")
                    .and_then(Value::as_array)
                    .map(|cells| {
                        cells
                            .iter()
                            .map(|cell| {
                                let mut inner = Flattener::default();
                                inner.children(cell);
                                inner.buf.trim().replace('\n', " ")
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                self.buf.push_str("| ");
                self.buf.push_str(&cells.join(" | "));
                self.buf.push_str(" |\n");
            }
            _ => self.children(node),
        }
    }

    fn list(&mut self, node: &Value, ordered_from: Option<u64>) {
        self.start_block();
        let indent = "  ".repeat(self.list_depth);
        self.list_depth += 1;
        let items = node.get("content").and_then(Value::as_array);
        for (i, item) in items.into_iter().flatten().enumerate() {
            self.buf.push_str(&indent);
            match ordered_from {
                Some(start) => self.buf.push_str(&format!("{}. ", start + i as u64)),
                None => self.buf.push_str("- "),
            }
            let mark = self.buf.len();
            self.children(item);
            // Paragraph inside a list item already ended the line.
            if self.buf.len() == mark || !self.buf.ends_with('\n') {
                self.buf.push('\n');
            }
        }
        self.list_depth -= 1;
        if self.list_depth == 0 {
            self.buf.push('\n');
        }
    }

    fn start_block(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    /// Ends the current line; top-level blocks are followed by a blank line.
    fn end_block(&mut self) {
        self.start_block();
        if self.list_depth == 0 {
            self.buf.push('\n');
        }
    }
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(t: &str) -> Value {
        json!({"type": "text", "text": t})
    }

    fn para(children: Vec<Value>) -> Value {
        json!({"type": "paragraph", "content": children})
    }

    fn item(t: &str) -> Value {
        json!({"type": "listItem", "content": [para(vec![text(t)])]})
    }

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(flatten(&json!("h2. Steps\n* one")), "h2. Steps\n* one");
        assert_eq!(flatten(&Value::Null), "");
    }

    #[test]
    fn paragraphs_and_headings() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [text("Overview")]},
                para(vec![text("Users "), text("log in"), json!({"type": "hardBreak"}), text("via SSO.")]),
            ]
        });
        assert_eq!(flatten(&doc), "## Overview\n\nUsers log in\nvia SSO.");
    }

    #[test]
    fn bullet_and_ordered_lists() {
        let doc = json!({
            "type": "doc",
            "content": [
                {"type": "bulletList", "content": [item("first"), item("second")]},
                {"type": "orderedList", "attrs": {"order": 3}, "content": [item("third"), item("fourth")]},
            ]
        });
        assert_eq!(flatten(&doc), "- first\n- second\n\n3. third\n4. fourth");
    }

    #[test]
    fn nested_list_is_indented() {
        let nested = json!({
            "type": "listItem",
            "content": [
                para(vec![text("parent")]),
                {"type": "bulletList", "content": [item("child")]},
            ]
        });
        let doc = json!({"type": "doc", "content": [{"type": "bulletList", "content": [nested]}]});
        assert_eq!(flatten(&doc), "- parent\n  - child");
    }

    #[test]
    fn inline_nodes() {
        let doc = json!({
            "type": "doc",
            "content": [para(vec![
                text("Ping "),
                json!({"type": "mention", "attrs": {"id": "abc", "text": "@Jane Doe"}}),
                text(" see "),
                json!({"type": "inlineCard", "attrs": {"url": "https://acme.io/design"}}),
                text(" "),
                json!({"type": "emoji", "attrs": {"shortName": ":tada:"}}),
            ])]
        });
        assert_eq!(flatten(&doc), "Ping @Jane Doe see https://acme.io/design :tada:");
    }

    #[test]
    fn code_block_is_fenced() {
        let doc = json!({
            "type": "doc",
            "content": [{"type": "codeBlock", "attrs": {"language": "json"}, "content": [text("{\"a\": 1}")]}]
        });
        assert_eq!(flatten(&doc), "```\n{\"a\": 1}\n```");
    }

    #[test]
    fn unknown_nodes_recurse() {
        let doc = json!({
            "type": "doc",
            "content": [{"type": "panel", "attrs": {"panelType": "info"}, "content": [para(vec![text("inside panel")])]}]
        });
        assert_eq!(flatten(&doc), "inside panel");
    }

    #[test]
    fn table_rows_become_pipes() {
        let cell = |t: &str| json!({"type": "tableCell", "content": [para(vec![text(t)])]});
        let doc = json!({
            "type": "doc",
            "content": [{"type": "table", "content": [
                {"type": "tableRow", "content": [cell("Input"), cell("Expected")]},
                {"type": "tableRow", "content": [cell("blank"), cell("error")]},
            ]}]
        });
        assert_eq!(flatten(&doc), "| Input | Expected |\n| blank | error |");
    }
}
