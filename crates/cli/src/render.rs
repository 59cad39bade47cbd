//! Human-readable output for each subcommand. `--json` bypasses this and
//! prints the serialized value instead.

use std::fmt::Write as _;

use pipeline::{RunOutcome, StepDescriptor, WorkflowResult};
use workflow::HealthReport;

const PREVIEW_CHARS: usize = 60;

pub fn steps(steps: &[&StepDescriptor]) -> String {
    let width = steps.iter().map(|s| s.id.as_str().len()).max().unwrap_or(0);
    let mut out = String::new();
    for step in steps {
        let _ = writeln!(
            out,
            "{:<width$}  {}: {}",
            step.id.as_str(),
            step.name,
            step.description
        );
    }
    out
}

pub fn run(result: &WorkflowResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Run {} ({}), {}/{} steps succeeded, {} tokens",
        result.run_id(),
        outcome_label(result.outcome()),
        result.succeeded_count(),
        result.selected_steps().len(),
        result.total_tokens().as_u64()
    );

    for (index, step) in result.results().iter().enumerate() {
        out.push('\n');
        match step.error() {
            None => {
                let _ = writeln!(
                    out,
                    "[{}] {} ({}, {} tokens, {} ms)",
                    index + 1,
                    step.step_name(),
                    step.model().map(|m| m.as_str()).unwrap_or("-"),
                    step.tokens_used().map(|t| t.as_u64()).unwrap_or(0),
                    step.latency_ms().unwrap_or(0)
                );
                let _ = writeln!(out, "{}", step.output().unwrap_or_default());
            }
            Some(error) => {
                let _ = writeln!(out, "[{}] {} FAILED", index + 1, step.step_name());
                let _ = writeln!(out, "{error}");
            }
        }
    }

    let skipped = &result.selected_steps()[result.results().len()..];
    if !skipped.is_empty() {
        let names: Vec<&str> = skipped.iter().map(|id| id.as_str()).collect();
        let _ = writeln!(out, "\nNot run: {}", names.join(", "));
    }
    out
}

pub fn history(runs: &[WorkflowResult]) -> String {
    if runs.is_empty() {
        return "No workflow runs recorded yet.\n".to_string();
    }
    let mut out = String::new();
    for run in runs {
        let steps: Vec<&str> = run.selected_steps().iter().map(|id| id.as_str()).collect();
        let _ = writeln!(
            out,
            "{}  {}  {:<9}  {}",
            run.executed_at(),
            run.run_id(),
            outcome_label(run.outcome()),
            steps.join(" > ")
        );
        let _ = writeln!(out, "    {}", preview(run.input_text()));
    }
    out
}

pub fn health(report: &HealthReport) -> String {
    format!(
        "backend: {}\nhistory: {}\nllm:     {}\nchecked: {}\n",
        report.backend, report.history, report.llm, report.timestamp
    )
}

fn outcome_label(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Completed => "completed",
        RunOutcome::Halted => "halted",
    }
}

/// First line of `text`, cut to a fixed number of characters.
fn preview(text: &str) -> String {
    let line = text.trim().lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{GatewayResult, ModelId, RunId, StepId, StepResult, Timestamp, TokenCount};
    use workflow::{BuiltinStep, ComponentStatus};

    fn descriptor(step: BuiltinStep) -> StepDescriptor {
        StepDescriptor::new(StepId::from_static(step.id()), step.name(), step.description())
    }

    fn halted_run() -> WorkflowResult {
        let clean = descriptor(BuiltinStep::CleanText);
        let summarize = descriptor(BuiltinStep::Summarize);
        WorkflowResult::new(
            RunId::new_random(),
            "An input text that is long enough",
            vec![
                clean.id.clone(),
                summarize.id.clone(),
                StepId::from_static("tag_category"),
            ],
            vec![
                StepResult::succeeded(
                    &clean,
                    GatewayResult {
                        output: "Cleaned.".into(),
                        model: ModelId::from_static("llama-3.1-8b-instant"),
                        tokens_used: TokenCount::new(12),
                        latency_ms: 80,
                    },
                ),
                StepResult::failed(&summarize, "groq rate limit exceeded."),
            ],
            Timestamp::now(),
        )
    }

    #[test]
    fn steps_are_listed_one_per_line() {
        let descriptors: Vec<StepDescriptor> =
            BuiltinStep::ALL.iter().map(|s| descriptor(*s)).collect();
        let refs: Vec<&StepDescriptor> = descriptors.iter().collect();

        let out = steps(&refs);
        assert_eq!(out.lines().count(), 4);
        assert!(out.starts_with("clean_text"));
    }

    #[test]
    fn halted_run_shows_failure_and_skipped_steps() {
        let out = run(&halted_run());

        assert!(out.contains("(halted), 1/3 steps succeeded, 12 tokens"));
        assert!(out.contains("[1] Clean Text (llama-3.1-8b-instant, 12 tokens, 80 ms)"));
        assert!(out.contains("Cleaned."));
        assert!(out.contains("[2] Summarize FAILED"));
        assert!(out.contains("groq rate limit exceeded."));
        assert!(out.contains("Not run: tag_category"));
    }

    #[test]
    fn history_previews_are_truncated() {
        assert_eq!(history(&[]), "No workflow runs recorded yet.\n");
        assert_eq!(preview(&"x".repeat(80)), format!("{}...", "x".repeat(60)));
        assert_eq!(preview("  first line\nsecond"), "first line");

        let out = history(&[halted_run()]);
        assert!(out.contains("halted"));
        assert!(out.contains("clean_text > summarize > tag_category"));
    }

    #[test]
    fn health_lists_each_component() {
        let report = HealthReport {
            backend: ComponentStatus::Ok,
            history: ComponentStatus::Ok,
            llm: ComponentStatus::Error,
            timestamp: Timestamp::now(),
        };
        let out = health(&report);
        assert!(out.contains("history: ok"));
        assert!(out.contains("llm:     error"));
    }
}
