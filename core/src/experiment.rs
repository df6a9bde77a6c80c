//! Command-line arguments of the experiment tools.
//!
//! Arguments are read in a single pass into immutable structs; nothing here
//! checks learner names or budgets. That happens once, in
//! [`crate::resolve::resolve`].

use std::{env, path::PathBuf};

use anyhow::{anyhow, Result};

/// Arguments of the launcher: `-l <learner> -B <baseLearner> -b <budget>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchArgs {
    learner: String,
    base_learner: String,
    budget: String,
    config: Option<PathBuf>,
    dry_run: bool,
    help_requested: bool,
}

impl LaunchArgs {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut learner: Option<String> = None;
        let mut base_learner: Option<String> = None;
        let mut budget: Option<String> = None;
        let mut config: Option<PathBuf> = None;
        let mut dry_run = false;
        let mut help_requested = false;
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = split_inline(&arg);
            match flag {
                "-l" | "--learner" => set_once(&mut learner, take_value(flag, inline, &mut iter)?, flag)?,
                "-B" | "--base-learner" => {
                    set_once(&mut base_learner, take_value(flag, inline, &mut iter)?, flag)?
                }
                "-b" | "--budget" => set_once(&mut budget, take_value(flag, inline, &mut iter)?, flag)?,
                "-c" | "--config" => {
                    let path = PathBuf::from(take_value(flag, inline, &mut iter)?);
                    set_once(&mut config, path, flag)?
                }
                "-n" | "--dry-run" if inline.is_none() => dry_run = true,
                "-h" | "--help" if inline.is_none() => help_requested = true,
                _ => return Err(anyhow!("unexpected argument: {}", arg)),
            }
        }

        Ok(Self {
            learner: learner.unwrap_or_default(),
            base_learner: base_learner.unwrap_or_default(),
            budget: budget.unwrap_or_default(),
            config,
            dry_run,
            help_requested,
        })
    }

    /// Learner name as typed; empty when `-l` was not given.
    pub fn learner(&self) -> &str {
        &self.learner
    }

    pub fn base_learner(&self) -> &str {
        &self.base_learner
    }

    pub fn budget(&self) -> &str {
        &self.budget
    }

    pub fn config(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }
}

/// Arguments of the tradeoff plotter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeoffArgs {
    results: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    report: Option<PathBuf>,
    help_requested: bool,
}

impl TradeoffArgs {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = split_inline(&arg);
            let slot = match flag {
                "-f" | "--results" => &mut parsed.results,
                "-o" | "--output" => &mut parsed.output,
                "-c" | "--config" => &mut parsed.config,
                "-r" | "--report" => &mut parsed.report,
                "-h" | "--help" if inline.is_none() => {
                    parsed.help_requested = true;
                    continue;
                }
                _ => return Err(anyhow!("unexpected argument: {}", arg)),
            };
            let value = PathBuf::from(take_value(flag, inline, &mut iter)?);
            set_once(slot, value, flag)?;
        }

        if parsed.results.is_none() && !parsed.help_requested {
            return Err(anyhow!("missing required argument -f <results.csv>"));
        }

        Ok(parsed)
    }

    pub fn results(&self) -> Option<&PathBuf> {
        self.results.as_ref()
    }

    pub fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }

    pub fn config(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    pub fn report(&self) -> Option<&PathBuf> {
        self.report.as_ref()
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }
}

/// `--flag=value` splits into the flag and its inline value.
fn split_inline(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
        _ => (arg, None),
    }
}

fn take_value<I>(flag: &str, inline: Option<&str>, iter: &mut I) -> Result<String>
where
    I: Iterator<Item = String>,
{
    match inline {
        Some(value) => Ok(value.to_string()),
        None => iter
            .next()
            .ok_or_else(|| anyhow!("expected value after {}", flag)),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<()> {
    if slot.is_some() {
        return Err(anyhow!("{} given more than once", flag));
    }
    *slot = Some(value);
    Ok(())
}
