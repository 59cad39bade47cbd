//! Built-in workflow steps.
//!
//! Each step is one prompt pair: a fixed system prompt that pins down the
//! transformation, and a task instruction that is prefixed to the current
//! pipeline text. All of them share the same ground rules: behave
//! deterministically, do only the stated transformation, add nothing that is
//! not in the input, and return only the transformed text.
//!
//! Adding a step means adding a variant here and listing it in
//! [`BuiltinStep::ALL`].

use async_trait::async_trait;
use pipeline::{GatewayError, GatewayResult, ModelGateway, Step, StepDescriptor, StepId};

const CLEAN_TEXT_PROMPT: &str = "You are a deterministic text processor inside a structured workflow system.
Your task is to clean and normalize the given text.

Rules:
- Remove extra whitespace and blank lines.
- Fix obvious typos and punctuation errors.
- Normalize bullet points and list formatting.
- Do NOT change the meaning or add new content.
- Do NOT summarize; preserve all original information.
- Output only the cleaned text with no commentary.";

const SUMMARIZE_PROMPT: &str = "You are a deterministic text processor inside a structured workflow system.
Your task is to summarize the given text.

Rules:
- Produce a concise summary in 2-4 sentences.
- Preserve all key facts, names, dates, and numbers.
- Use clear, professional language.
- Do NOT add opinions or information not present in the source.
- If the input is already very short, return it as-is.
- Output only the summary text with no commentary.";

const EXTRACT_KEY_POINTS_PROMPT: &str = "You are a deterministic text processor inside a structured workflow system.
Your task is to extract the key points from the given text.

Rules:
- List each key point as a bullet (using \"- \").
- Include only factual, important points from the source text.
- Aim for 3-7 key points depending on text length.
- Keep each point to one clear sentence.
- Do NOT add analysis, opinions, or external information.
- Output only the bullet list with no introduction or conclusion.";

const TAG_CATEGORY_PROMPT: &str = "You are a deterministic text processor inside a structured workflow system.
Your task is to categorize the given text by assigning relevant topic tags.

Rules:
- Assign between 1 and 5 tags that describe the topic of the text.
- Use simple, lowercase, single-word or hyphenated tags (e.g., \"technology\", \"finance\", \"team-management\").
- Output ONLY a comma-separated list of tags.
- Do NOT add descriptions, explanations, or commentary.
- If the text is unclear, assign the tag \"general\".";

/// The closed set of steps shipped with the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinStep {
    /// Lossless normalization of whitespace, punctuation and list formatting.
    CleanText,
    /// 2-4 sentence summary.
    Summarize,
    /// 3-7 one-sentence bullet points.
    ExtractKeyPoints,
    /// 1-5 lowercase comma-separated topic tags.
    TagCategory,
}

impl BuiltinStep {
    /// Every built-in step, in registration order.
    pub const ALL: [BuiltinStep; 4] = [
        BuiltinStep::CleanText,
        BuiltinStep::Summarize,
        BuiltinStep::ExtractKeyPoints,
        BuiltinStep::TagCategory,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::CleanText => "clean_text",
            Self::Summarize => "summarize",
            Self::ExtractKeyPoints => "extract_key_points",
            Self::TagCategory => "tag_category",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::CleanText => "Clean Text",
            Self::Summarize => "Summarize",
            Self::ExtractKeyPoints => "Extract Key Points",
            Self::TagCategory => "Tag Category",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::CleanText => "Removes noise, fixes formatting, and normalizes raw text.",
            Self::Summarize => "Condenses text into a concise 2-4 sentence summary.",
            Self::ExtractKeyPoints => "Extracts structured bullet-point key points from text.",
            Self::TagCategory => "Assigns relevant topic category tags to the text.",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::CleanText => CLEAN_TEXT_PROMPT,
            Self::Summarize => SUMMARIZE_PROMPT,
            Self::ExtractKeyPoints => EXTRACT_KEY_POINTS_PROMPT,
            Self::TagCategory => TAG_CATEGORY_PROMPT,
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::CleanText => "Clean the following text",
            Self::Summarize => "Summarize the following text",
            Self::ExtractKeyPoints => "Extract the key points from the following text",
            Self::TagCategory => "Assign topic category tags to the following text",
        }
    }

    /// Embeds `input` into this step's task template.
    pub fn user_prompt(self, input: &str) -> String {
        format!("{}:\n\n{input}", self.instruction())
    }
}

#[async_trait]
impl Step for BuiltinStep {
    fn descriptor(&self) -> StepDescriptor {
        StepDescriptor::new(StepId::from_static(self.id()), self.name(), self.description())
    }

    async fn run(
        &self,
        gateway: &dyn ModelGateway,
        input: &str,
    ) -> Result<GatewayResult, GatewayError> {
        gateway
            .generate(self.system_prompt(), &self.user_prompt(input))
            .await
    }
}
