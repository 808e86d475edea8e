// ── Row outcomes ──
//
// Every row yields exactly one `Outcome`; nothing raised while handling a
// row escapes the batch. Messages read `<VERB> - <SUCCESS|FAIL> - <detail>`.

use std::fmt;

use strum::{Display, EnumString};

/// What the user asked to do with an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Create,
    List,
    Delete,
}

/// Leading word of every outcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    Create,
    List,
    Delete,
    Update,
    Explorer,
}

impl From<Action> for Verb {
    fn from(action: Action) -> Self {
        match action {
            Action::Create => Self::Create,
            Action::List => Self::List,
            Action::Delete => Self::Delete,
        }
    }
}

pub const SUCCESS: &str = "SUCCESS";
pub const FAIL: &str = "FAIL";

/// Result of handling one row (or one explorer category).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub failed: bool,
    pub message: String,
}

impl Outcome {
    pub fn success(verb: Verb, detail: impl fmt::Display) -> Self {
        Self {
            failed: false,
            message: format!("{verb} - {SUCCESS} - {detail}"),
        }
    }

    pub fn failure(verb: Verb, detail: impl fmt::Display) -> Self {
        Self {
            failed: true,
            message: format!("{verb} - {FAIL} - {detail}"),
        }
    }

    /// `<VERB> - FAIL - <subject> - Error "<err>"`
    pub fn error(verb: Verb, subject: impl fmt::Display, err: impl fmt::Display) -> Self {
        Self::failure(verb, format!("{subject} - Error \"{err}\""))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_shapes() {
        let ok = Outcome::success(Verb::Create, "project 'p1' pool 'pool_0'");
        assert!(!ok.failed);
        assert_eq!(ok.message, "CREATE - SUCCESS - project 'p1' pool 'pool_0'");

        let bad = Outcome::error(Verb::Delete, "lun 'l1'", "HTTP 404: Not Found");
        assert!(bad.failed);
        assert_eq!(bad.message, "DELETE - FAIL - lun 'l1' - Error \"HTTP 404: Not Found\"");
    }

    #[test]
    fn action_parses_lowercase() {
        assert_eq!("delete".parse::<Action>().unwrap(), Action::Delete);
        assert_eq!(Verb::from(Action::List).to_string(), "LIST");
    }
}
