use std::fmt;

use serde::Serialize;

/// Headings that open the role section of a written prompt
const ROLE_HEADINGS: &[&str] = &["# Role", "# 役割"];

macro_rules! stage_artifact {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(text: impl Into<String>) -> Self {
                Self(text.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

stage_artifact!(
    /// Output of the structure stage: the seven building blocks of the prompt
    Structure
);

stage_artifact!(
    /// Output of the writer stage: a directly usable prompt body
    DraftPrompt
);

stage_artifact!(
    /// Output of the review stage: verdict, issues and the corrected prompt
    Review
);

/// The reviewer's judgement of the draft. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    Ok,
    NeedsRevision,
    Unknown,
}

impl Review {
    /// Parse the verdict from the first line of the review body.
    ///
    /// Heading lines are skipped because the verdict heading itself names
    /// both options.
    pub fn verdict(&self) -> ReviewVerdict {
        let Some(line) = self
            .0
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
        else {
            return ReviewVerdict::Unknown;
        };

        let line = line
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        let line = line
            .strip_prefix("verdict")
            .map(|rest| rest.trim_start_matches([':', ' ', '*']))
            .unwrap_or(line.as_str());

        if line.contains("needs revision") || line.contains("要修正") {
            ReviewVerdict::NeedsRevision
        } else if line.starts_with("ok") {
            ReviewVerdict::Ok
        } else {
            ReviewVerdict::Unknown
        }
    }

    /// Extract the final prompt body from the review.
    ///
    /// Prefers the first fenced code block, then everything from the role
    /// heading onward, then the whole review.
    pub fn final_prompt(&self) -> &str {
        if let Some(block) = first_fenced_block(&self.0) {
            return block;
        }

        if let Some(start) = ROLE_HEADINGS
            .iter()
            .filter_map(|heading| self.0.find(heading))
            .min()
        {
            return self.0[start..].trim();
        }

        self.0.trim()
    }
}

/// Contents of the first ``` block, without a language tag. `None` when there
/// is no fence or the block is blank. An unterminated block runs to the end.
fn first_fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let mut rest = &text[open + 3..];

    if let Some(newline) = rest.find('\n') {
        let tag = rest[..newline].trim();
        if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphabetic()) {
            rest = &rest[newline + 1..];
        }
    }

    let body = match rest.find("```") {
        Some(close) => &rest[..close],
        None => rest,
    };

    let body = body.trim();
    (!body.is_empty()).then_some(body)
}
