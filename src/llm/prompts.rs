use crate::models::{DraftPrompt, Structure, UserRequest};

/// Instructions for the structure agent. `{language}` is substituted once at
/// startup.
pub const STRUCTURE_INSTRUCTIONS: &str = r#"You are the prompt structure agent.
The user has described a prompt they want to build ("I want a prompt that can ...").
From that description, lay out the building blocks of the prompt.

Always organize your output into the following sections, written in {language}:

# 1. Purpose of the prompt
# 2. Intended users / audience
# 3. Input information
# 4. Expected output
# 5. Constraints and rules
# 6. Reasoning process
# 7. Output format"#;

/// Instructions for the writer agent
pub const WRITER_INSTRUCTIONS: &str = r#"You are the prompt writer agent.
Using the structure produced by the structure agent, write one complete, high-quality prompt body.

Rules:
- Write in {language}
- The prompt must be ready to paste directly into an LLM such as ChatGPT
- Include the following structure:

---
# Role
# Goal
# Input instructions (guidance shown to the user)
# Instructions for the model
# Output format
# Rules
---

Do not write any explanation. Output only the prompt body."#;

/// Instructions for the reviewer agent
pub const REVIEWER_INSTRUCTIONS: &str = r#"You are the prompt reviewer agent.
Review the given prompt body and output a final version, corrected where necessary.
Write in {language}.

Output format:

# 1. Verdict (OK / Needs revision)
...

# 2. Issues and improvements
- ...

# 3. Final revised prompt
..."#;

/// Fill the response language into an instruction template
pub fn render_instructions(template: &str, language: &str) -> String {
    template.replace("{language}", language)
}

/// Build the structure stage input
pub fn build_structure_input(request: &UserRequest) -> String {
    format!(
        "User request:\n{request}\n\nOrganize the prompt structure based on this request."
    )
}

/// Build the writer stage input from the request and the structure
pub fn build_writer_input(request: &UserRequest, structure: &Structure) -> String {
    format!(
        "Below is the prompt structure. Write the prompt body following this structure strictly.\n\n\
         [User request]\n{request}\n\n\
         [Prompt structure]\n{structure}\n"
    )
}

/// Build the review stage input from the request and the draft
pub fn build_review_input(request: &UserRequest, draft: &DraftPrompt) -> String {
    format!(
        "Review the following prompt and output a final version, corrected where necessary.\n\n\
         [User request]\n{request}\n\n\
         [Draft prompt]\n{draft}\n"
    )
}
