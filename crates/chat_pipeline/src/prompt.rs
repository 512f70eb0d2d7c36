//! Prompt construction - persona framing around context and utterance.
//!
//! Pure templating. All optionality has already been resolved by the
//! context assembler.

/// Fixed persona and length framing for every generation.
pub const PERSONA: &str = "You are a friendly plant companion helping someone learn about a plant \
they identified. Respond warmly, respectfully and directly. Keep your answer under 120 words. \
Answer the question first; add at most one short practical tip afterwards, and only if it is \
genuinely useful. When you suggest combining plants, only propose combinations drawn from the \
plants listed in the collection below.";

/// One instruction payload: persona, then context block, then utterance.
pub fn build_prompt(context: &str, utterance: &str) -> String {
    format!(
        "{PERSONA}\n\n# What is known about this plant\n{context}\n# Question\n{utterance}"
    )
}
