//! CLI output formatting utilities.

use crate::answer::ToolOutcome;
use crate::tools::{ContextDocument, ToolArgs};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a tool call.
    pub fn tool_call(name: &str, args: &ToolArgs) {
        let args = serde_json::to_string(args).unwrap_or_default();
        println!(
            "{} {}({})",
            style("->").cyan().bold(),
            style(name).bold(),
            content_preview(&args, 120)
        );
    }

    /// Print a tool result with optional contexts.
    pub fn tool_result(name: &str, outcome: &ToolOutcome, contexts: Option<&[ContextDocument]>) {
        match outcome {
            ToolOutcome::Success { summary, .. } => {
                println!("{} {}: {}", style("<-").green().bold(), style(name).bold(), summary);
            }
            ToolOutcome::Error { message } => {
                println!("{} {}: {}", style("<-").red().bold(), style(name).bold(), message);
            }
        }

        for (i, doc) in contexts.unwrap_or_default().iter().enumerate() {
            let title = doc.title.as_deref().unwrap_or(&doc.source);
            let score = doc.score.map(|s| format!(" (score: {:.2})", s)).unwrap_or_default();
            println!("   [{}] {}{}", i + 1, style(title).bold(), score);
            println!("       {}", style(content_preview(&doc.content, 100)).dim());
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_len: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_len {
        content
    } else {
        let truncated: String = content.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("line one\nline two", 100), "line one line two");
        assert_eq!(content_preview("abcdefghij", 4), "abcd...");
        assert_eq!(content_preview("månen har ingen hovedstad", 5), "månen...");
    }
}
