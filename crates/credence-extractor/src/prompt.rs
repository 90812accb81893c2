//! Prompts for claim extraction and document description

const EXTRACTION_INSTRUCTIONS: &str = "You are a meticulous claims extractor. Your task is to read \
the following text and identify a list of distinct, self-contained claims. A claim is a single \
statement or assertion that can be debated or verified.

Please return your response as a JSON array of objects. Each object in the array must have two \
keys: \"claim_id\" and \"claim_text\". Do not include any other text or explanation in your \
response. The response must be a valid JSON array only.";

const EXTRACTION_EXAMPLE: &str = r#"Example of desired output:
```json
[
  {"claim_id": "...", "claim_text": "The sky is blue due to Rayleigh scattering."},
  {"claim_id": "...", "claim_text": "Photosynthesis is the process used by plants to convert light energy into chemical energy."}
]
```"#;

const DESCRIBE_INSTRUCTIONS: &str = "Given the following document text, generate a concise title \
(max 50 words) suitable for organizing and categorizing the document, and a short description. \
Return your response as a JSON object with 'title' and 'description' keys. Only output valid JSON.";

/// Builds the per-chunk extraction prompt
pub struct ExtractionPrompt<'a> {
    chunk: &'a str,
}

impl<'a> ExtractionPrompt<'a> {
    /// Prompt for one chunk of text
    pub fn new(chunk: &'a str) -> Self {
        Self { chunk }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(EXTRACTION_EXAMPLE);
        prompt.push_str("\n\nText to analyze:\n---\n");
        prompt.push_str(self.chunk);
        prompt.push_str("\n---\n");
        prompt
    }
}

/// Builds the title/description prompt from the head of a document
pub struct DescribePrompt<'a> {
    text: &'a str,
    prefix_chars: usize,
}

impl<'a> DescribePrompt<'a> {
    /// Prompt showing at most `prefix_chars` characters of `text`
    pub fn new(text: &'a str, prefix_chars: usize) -> Self {
        Self { text, prefix_chars }
    }

    /// The part of the document that is shown, cut on a character boundary
    pub fn excerpt(&self) -> &'a str {
        match self.text.char_indices().nth(self.prefix_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => self.text,
        }
    }

    /// Build the complete describe prompt
    pub fn build(&self) -> String {
        format!("{}\n\nDocument:\n{}...", DESCRIBE_INSTRUCTIONS, self.excerpt())
    }
}
