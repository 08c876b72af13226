//! Prompt templates in the Mistral instruct format.

use crate::cache::OperationKind;

const GRAMMAR: &str = "[INST] Fix all typos, grammar, and punctuation errors in the following text. \
Keep the same meaning and preserve line breaks. Only return the corrected text without any explanations.\n\n\
Text to fix: {text} [/INST]";

const SUMMARIZE: &str = "[INST] Summarize the following text in a concise and clear manner. \
Keep the main points and key information. Make it about 1/3 the length of the original. \
Only return the summarized text without any explanations.\n\n\
Text to summarize: {text} [/INST]";

const FORMAL_TONE: &str = "[INST] Rewrite the following text to make it more formal and professional \
while keeping the same meaning. Use appropriate business language and tone. \
Only return the formal text without any explanations.\n\n\
Text to make formal: {text} [/INST]";

/// Builds the prompt for `kind` around `text`.
pub fn render(kind: OperationKind, text: &str) -> String {
    let template = match kind {
        OperationKind::Grammar => GRAMMAR,
        OperationKind::Summarize => SUMMARIZE,
        OperationKind::ToneChange => FORMAL_TONE,
    };
    template.replace("{text}", text)
}
