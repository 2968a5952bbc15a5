use once_cell::sync::Lazy;

/// A named system prompt handed to the text provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    pub system_prompt: String,
}

impl PromptTemplate {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

pub static AVAILABLE_PROMPTS: Lazy<Vec<PromptTemplate>> = Lazy::new(|| {
    vec![
        PromptTemplate::new(
            "proofreader",
            "Polishes a transcript while keeping its message intact.",
            r#"Text editor.

GOAL
Polish the given text while preserving its message exactly.

RULES
1. Language
- Flawless spelling
- Precise punctuation
- Clear phrasing

2. Structure
- Logical order
- Sensible paragraphs
- Natural flow

OUTPUT
[The polished text, nothing else]"#,
        ),
        PromptTemplate::new(
            "marketing",
            "Turns a transcript into persuasive promotional copy.",
            r#"Copywriter.

GOAL
Turn the given text into persuasive promotional copy.

RULES
1. Form
- Short, punchy sentences
- Active verbs

2. Marketing
- Lead with the benefit
- Clear calls to action

3. Quality
- Flawless spelling and grammar

OUTPUT
[The rewritten copy, nothing else]"#,
        ),
        PromptTemplate::new(
            "translator",
            "Translates between German and English.",
            r#"German-English translator.

GOAL
Deliver a faithful, natural translation.

RULES
1. Precision
- Exact meaning
- Correct terminology

2. Language
- Natural style in the target language
- Culturally appropriate

OUTPUT
[The translated text, nothing else]"#,
        ),
    ]
});

/// Looks up a built-in template by name.
pub fn find(name: &str) -> Option<&'static PromptTemplate> {
    AVAILABLE_PROMPTS.iter().find(|p| p.name == name)
}
