// ── Batch runner ──
//
// Rows are handled one after another, in file order, with no retries.
// A failing row is recorded and the next one starts. Only a refused
// confirmation ends the run early; once rows are being sent, reporter
// write errors are logged and every row is still attempted.

use std::io;

use tracing::{debug, info, warn};
use zfssa_api::ApplianceClient;

use crate::error::CoreError;
use crate::operation::Operation;
use crate::outcome::Outcome;
use crate::report::{Reporter, record_or_warn};
use crate::row::Row;

/// What the user is asked to approve before a destructive batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub intro: &'static str,
    pub header: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
    pub question: &'static str,
}

impl Preview {
    pub fn for_rows(op: Operation, rows: &[Row]) -> Self {
        let (intro, question) = match op {
            Operation::Update => ("You are about to modify/update", "Do you want to proceed?"),
            _ => ("You are about to destroy", "Do you want to destroy?"),
        };
        Self {
            intro,
            header: op.preview_header(),
            rows: rows.iter().map(|row| op.preview_row(row)).collect(),
            question,
        }
    }
}

/// Asks for a yes/no answer after showing a preview.
pub trait Prompt {
    fn confirm(&self, preview: &Preview) -> io::Result<bool>;
}

impl<F> Prompt for F
where
    F: Fn(&Preview) -> io::Result<bool>,
{
    fn confirm(&self, preview: &Preview) -> io::Result<bool> {
        self(preview)
    }
}

/// Anything but an explicit yes aborts.
pub fn ensure_confirmed(prompt: &dyn Prompt, preview: &Preview) -> Result<(), CoreError> {
    if prompt.confirm(preview)? {
        Ok(())
    } else {
        Err(CoreError::NotConfirmed)
    }
}

pub struct BatchRunner<'a> {
    client: &'a ApplianceClient,
    prompt: Option<&'a dyn Prompt>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(client: &'a ApplianceClient) -> Self {
        Self {
            client,
            prompt: None,
        }
    }

    /// Ask `prompt` before destructive batches. Without a prompt they run
    /// unconfirmed (`--noconfirm`).
    pub fn with_prompt(mut self, prompt: &'a dyn Prompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Run `op` over every row, reporting each outcome as it completes.
    pub async fn run(
        &self,
        op: Operation,
        rows: &[Row],
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<Outcome>, CoreError> {
        if op.is_destructive() {
            if let Some(prompt) = self.prompt {
                ensure_confirmed(prompt, &Preview::for_rows(op, rows))?;
            }
        }

        reporter.start(&op.title(), rows.len())?;
        let mut outcomes = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            debug!(row = idx + 1, "{op}");
            let outcome = op.run(self.client, row).await;
            record_or_warn(reporter, &outcome);
            outcomes.push(outcome);
        }
        if let Err(e) = reporter.finish() {
            warn!(error = %e, "reporter did not finish cleanly");
        }

        let failed = outcomes.iter().filter(|o| o.failed).count();
        info!(total = outcomes.len(), failed, "{op} finished");
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Action;

    fn rows() -> Vec<Row> {
        vec![
            vec!["pool_0".into(), "p1".into()],
            vec!["pool_0".into(), "p2".into()],
        ]
    }

    #[test]
    fn preview_for_deletes() {
        let preview = Preview::for_rows(Operation::Project(Action::Delete), &rows());
        assert_eq!(preview.intro, "You are about to destroy");
        assert_eq!(preview.header, &["Pool", "Project"]);
        assert_eq!(preview.rows[1], vec!["pool_0", "p2"]);
    }

    #[test]
    fn refusal_is_not_confirmed() {
        let no = |_: &Preview| -> io::Result<bool> { Ok(false) };
        let preview = Preview::for_rows(Operation::Update, &[]);
        assert!(matches!(
            ensure_confirmed(&no, &preview),
            Err(CoreError::NotConfirmed)
        ));

        let yes = |_: &Preview| -> io::Result<bool> { Ok(true) };
        assert!(ensure_confirmed(&yes, &preview).is_ok());
    }

    #[test]
    fn prompt_io_error_propagates() {
        let broken = |_: &Preview| -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
        };
        let preview = Preview::for_rows(Operation::Update, &[]);
        assert!(matches!(ensure_confirmed(&broken, &preview), Err(CoreError::Io(_))));
    }
}
