//! Prompt construction for synonym generation.

/// Format example shown to the model inside the instruction.
pub const LIST_FORMAT_EXAMPLE: &str = "[synonym1, synonym2, synonym3]";

pub const SYSTEM_INSTRUCTION: &str = "You are an Arabic lexicon assistant. \
Reply with exactly one list in square brackets, items separated by commas, \
and nothing else: no numbering, no explanations, no meanings.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    /// Attach [`SYSTEM_INSTRUCTION`] as a system message.
    pub system_instruction: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            system_instruction: true,
        }
    }
}

pub fn build_prompt(word: &str, desired_count: usize, options: PromptOptions) -> Prompt {
    let user = format!(
        "Generate {count} synonyms for {word} in Arabic in list format without providing \
         the meaning. For example: {example}. Give the results as a list only.",
        count = desired_count,
        word = word,
        example = LIST_FORMAT_EXAMPLE,
    );

    Prompt {
        system: options
            .system_instruction
            .then(|| SYSTEM_INSTRUCTION.to_string()),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_word_count_and_format() {
        let prompt = build_prompt("سعيد", 7, PromptOptions::default());

        assert!(prompt.user.contains("Generate 7 synonyms for سعيد in Arabic"));
        assert!(prompt.user.contains(LIST_FORMAT_EXAMPLE));
        assert!(prompt.user.contains("without providing the meaning"));
        assert_eq!(prompt.system.as_deref(), Some(SYSTEM_INSTRUCTION));
    }

    #[test]
    fn test_system_instruction_is_optional() {
        let prompt = build_prompt(
            "كبير",
            3,
            PromptOptions {
                system_instruction: false,
            },
        );
        assert!(prompt.system.is_none());
    }
}
