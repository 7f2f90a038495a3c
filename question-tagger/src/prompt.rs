//! Prompt construction for question classification.

use ai_llm_service::ChatMessage;

use crate::record::TaggingRequest;

/// Fixed instruction describing the task and the exact reply shape.
pub const SYSTEM_PROMPT: &str = r#"
You are an assistant that classifies Cambridge A-Level Mathematics questions.
Return JSON exactly: {"chapters":[...], "difficulty":"easy|medium|hard"}
"#;

/// Renders the user turn: the question text followed by its marks.
pub fn build_user_message(req: &TaggingRequest) -> String {
    format!("{}\nMarks:({})", req.text, req.marks)
}

/// Full conversation sent to the completion service: `[system, user]`.
pub fn build_messages(req: &TaggingRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_message(req)),
    ]
}
