use std::{fmt, process::Command};

use tracing::debug;

use crate::config::EngineSettings;
use crate::error::ComposeError;
use crate::resolve::ExperimentConfig;

/// A ready-to-run engine invocation.
///
/// `Display` renders a single shell line in which the task description is one
/// double-quoted word; [`EngineCommand::to_process`] passes the same arguments
/// without a shell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineCommand {
    program: String,
    args: Vec<String>,
}

impl EngineCommand {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The task description handed to the entry point.
    pub fn task_description(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or_default()
    }

    pub fn to_process(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_word(&self.program))?;
        let (task, leading) = match self.args.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };
        for arg in leading {
            write!(f, " {}", quote_word(arg))?;
        }
        write!(f, " {}", double_quote(task))
    }
}

/// Build the engine invocation for `config`.
pub fn compose(config: &ExperimentConfig, settings: &EngineSettings) -> Result<EngineCommand, ComposeError> {
    if config.budget().is_unset() {
        return Err(ComposeError::MissingBudget);
    }

    let learner_token = config
        .learner()
        .task_token()
        .ok_or(ComposeError::UnmappedLearner {
            learner: config.learner().name(),
        })?;

    for (field, value) in [
        ("binary", &settings.binary),
        ("classpath", &settings.classpath),
        ("entry_point", &settings.entry_point),
        ("evaluation_task", &settings.evaluation_task),
    ] {
        if value.is_empty() {
            return Err(ComposeError::EmptySetting { field });
        }
    }

    let mut task = format!(
        "{} -l ({} -l {})",
        settings.evaluation_task,
        learner_token,
        config.base_learner().class_path()
    );
    if let Some(stream) = settings.stream.as_deref().filter(|stream| !stream.is_empty()) {
        task.push_str(&format!(" -s ({stream})"));
    }
    task.push_str(&format!(" -b {}", config.budget()));
    if let Some(limit) = settings.instance_limit {
        task.push_str(&format!(" -i {limit}"));
    }
    if let Some(limit) = settings.time_limit {
        task.push_str(&format!(" -t {limit}"));
    }

    debug!(task = %task, "composed task description");

    Ok(EngineCommand {
        program: settings.binary.clone(),
        args: vec![
            "-cp".to_string(),
            settings.classpath.clone(),
            settings.entry_point.clone(),
            task,
        ],
    })
}

fn double_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

fn quote_word(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "-_./:=+,@%".contains(ch));
    if plain {
        value.to_string()
    } else {
        double_quote(value)
    }
}
