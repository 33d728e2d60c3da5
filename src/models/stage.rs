use std::fmt;

use serde::Serialize;

/// The three sequential steps of a prompt design run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Lays out the building blocks of the prompt
    Structure,
    /// Writes the prompt body from the structure
    Write,
    /// Reviews the draft and produces a corrected final version
    Review,
}

impl StageKind {
    /// Agent name used in logs and passed to the generation backend
    pub fn agent_name(self) -> &'static str {
        match self {
            StageKind::Structure => "prompt_structure_agent",
            StageKind::Write => "prompt_writer_agent",
            StageKind::Review => "prompt_reviewer_agent",
        }
    }

    /// Short label used in error messages
    pub fn label(self) -> &'static str {
        match self {
            StageKind::Structure => "structure",
            StageKind::Write => "writer",
            StageKind::Review => "reviewer",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
