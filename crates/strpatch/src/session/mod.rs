//! Interactive replacement session.
//!
//! A session collects rules from the operator one at a time:
//!
//! ```text
//! search -> replacement -> continue/save -> (save) file name
//! ```
//!
//! Choosing save with a non-empty, valid file name copies the target into the
//! output directory under that name and runs the patch engine over the copy.
//! The session ends after that attempt whether or not it succeeded. The
//! target itself is never written.
//!
//! [`run_session`] wraps a session with the suspended-process hold.

mod config;
mod destination;
mod prompt;
mod state;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::patch::{PatchEngine, PatchReport, ReplacementRule};
use crate::process::{ProcessGuard, ProcessLauncher};

pub use config::{SessionConfig, SessionConfigBuilder};
pub use destination::resolve_destination;
pub use prompt::Prompter;
pub use state::{Choice, SessionState};

#[cfg(test)]
pub(crate) use prompt::scripted::ScriptedPrompter;

pub const SEARCH_PROMPT: &str = "Enter string to search: ";
pub const REPLACEMENT_PROMPT: &str = "Enter replacement string: ";
pub const CHOICE_PROMPT: &str = "Continue editing or save the file? (c / s): ";
pub const FILE_NAME_PROMPT: &str = "Enter new file name to save changes: ";

/// How a session ended
#[derive(Debug)]
pub enum SessionOutcome {
    Saved {
        path: PathBuf,
        rules: Vec<ReplacementRule>,
        report: PatchReport,
    },
    /// Input closed before anything was saved
    Abandoned,
}

/// Launch the target suspended, run one session, then terminate the target.
///
/// The process is torn down on every path out of this function, including a
/// failed save.
pub fn run_session<L, P>(
    launcher: &L,
    prompter: &mut P,
    config: SessionConfig,
) -> Result<SessionOutcome>
where
    L: ProcessLauncher,
    P: Prompter,
{
    let hold = ProcessGuard::launch(launcher, &config.target)?;
    debug!(
        "Session started for {} (pid {:?})",
        hold.path().display(),
        hold.pid()
    );
    let outcome = ReplacementSession::new(prompter, config).run();
    hold.release();
    outcome
}

enum RuleInput {
    Rule(ReplacementRule),
    Rejected,
    Closed,
}

pub struct ReplacementSession<'a, P: Prompter> {
    prompter: &'a mut P,
    config: SessionConfig,
    engine: PatchEngine,
    state: SessionState,
}

impl<'a, P: Prompter> ReplacementSession<'a, P> {
    pub fn new(prompter: &'a mut P, config: SessionConfig) -> Self {
        Self {
            prompter,
            engine: PatchEngine::new(config.length_policy),
            config,
            state: SessionState::new(),
        }
    }

    /// Collect rules until the operator saves or input closes.
    pub fn run(mut self) -> Result<SessionOutcome> {
        loop {
            match self.read_rule()? {
                RuleInput::Rule(rule) => {
                    debug!("Added rule #{}: {}", self.state.rules().len() + 1, rule);
                    self.state.push_rule(rule);
                }
                RuleInput::Rejected => continue,
                RuleInput::Closed => return Ok(self.abandon()),
            }

            let Some(choice) = self.prompt(CHOICE_PROMPT)? else {
                return Ok(self.abandon());
            };
            if Choice::parse(&String::from_utf8_lossy(&choice)) == Choice::Continue {
                self.prompter
                    .display_message("Continuing without saving changes.");
                continue;
            }

            let Some(name) = self.prompt(FILE_NAME_PROMPT)? else {
                return Ok(self.abandon());
            };
            let name = String::from_utf8_lossy(&name);
            let name = name.trim();
            if name.is_empty() {
                self.prompter
                    .display_message("Continuing without saving changes.");
                continue;
            }

            match resolve_destination(name, &self.config.target, &self.config.output_dir) {
                Ok(destination) => return self.finalize(destination),
                Err(e) => {
                    warn!("{}", e);
                    self.prompter.display_warning(&e.to_string());
                }
            }
        }
    }

    /// Read one search/replacement pair, telling the operator if it is rejected.
    fn read_rule(&mut self) -> Result<RuleInput> {
        let Some(search) = self.prompt(SEARCH_PROMPT)? else {
            return Ok(RuleInput::Closed);
        };
        let Some(replacement) = self.prompt(REPLACEMENT_PROMPT)? else {
            return Ok(RuleInput::Closed);
        };

        match self.build_rule(&search, &replacement) {
            Ok(rule) => Ok(RuleInput::Rule(rule)),
            Err(e) if e.is_rule_rejection() => {
                warn!("Rule rejected: {}", e);
                self.prompter.display_warning(&format!("Rule rejected: {}", e));
                Ok(RuleInput::Rejected)
            }
            Err(e) => Err(e),
        }
    }

    fn build_rule(&self, search: &[u8], replacement: &[u8]) -> Result<ReplacementRule> {
        let format = self.config.input_format;
        let rule = ReplacementRule::new(format.decode(search)?, format.decode(replacement)?);
        rule.validate(self.engine.policy())?;
        Ok(rule)
    }

    /// Copy the target to `destination` and patch the copy.
    fn finalize(mut self, destination: PathBuf) -> Result<SessionOutcome> {
        self.state.finalize();
        self.prompter.display_message(&format!(
            "Saving changes to file: {}",
            destination.display()
        ));

        fs::copy(&self.config.target, &destination).map_err(|source| Error::Copy {
            from: self.config.target.clone(),
            to: destination.clone(),
            source,
        })?;

        let report = self.engine.patch_file(&destination, self.state.rules())?;
        self.prompter.display_success("File saved successfully.");
        info!(
            "Saved {} ({} rules applied)",
            destination.display(),
            self.state.rules().len()
        );

        Ok(SessionOutcome::Saved {
            path: destination,
            rules: self.state.into_rules(),
            report,
        })
    }

    fn abandon(&self) -> SessionOutcome {
        info!(
            "Input closed, ending session without saving ({} rules discarded)",
            self.state.rules().len()
        );
        SessionOutcome::Abandoned
    }

    fn prompt(&mut self, message: &str) -> Result<Option<Vec<u8>>> {
        self.prompter.prompt_line(message).map_err(Error::Prompt)
    }
}
