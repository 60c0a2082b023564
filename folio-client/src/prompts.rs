//! Prompt builders for the two assistant features.

/// System instruction for the project explainer.
pub const EXPLAINER_SYSTEM: &str = "You are a helpful portfolio assistant. Your goal is to \
    explain technical concepts simply for a non-technical recruiter or professor. Keep your \
    explanation to one short paragraph.";

/// Explain a project to a recruiter in one paragraph.
pub fn explainer_prompt(title: &str, description: &str) -> String {
    format!(
        "Explain my project \"{title}\" to a recruiter. Here's my description: \
         \"{description}\". What are the key technical concepts in one short paragraph?"
    )
}

/// System instruction for the contact-form drafting assistant.
pub fn draft_system(sender: &str) -> String {
    format!(
        "You are an AI assistant helping a visitor on a personal portfolio. Write a \
         professional and friendly message (maximum 4 sentences) from {sender}."
    )
}

/// Draft a contact message from a few keywords.
pub fn draft_prompt(keywords: &str, sender: &str) -> String {
    format!("Keywords: \"{keywords}\". Sender Name: {sender}. Draft the message.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_their_inputs() {
        let prompt = explainer_prompt("Ray Tracer", "a path tracer in C++");
        assert!(prompt.contains("Ray Tracer"));
        assert!(prompt.contains("a path tracer in C++"));

        assert!(draft_system("Ana").contains("from Ana"));
        assert!(draft_prompt("internship, rust", "Ana").contains("internship, rust"));
    }
}
