//! Grounded-answer prompt

use credence_domain::GroundingClaim;

const SYNTHESIS_INSTRUCTIONS: &str = "You are a synthesis engine. Given the following user question \
and a list of claims (with sources), write a concise, well-reasoned answer that only uses these \
claims. Cite each claim's source in your answer.";

/// Builds the prompt handed to the generation service
pub struct SynthesisPrompt<'a> {
    query: &'a str,
    claims: &'a [GroundingClaim],
}

impl<'a> SynthesisPrompt<'a> {
    /// Prompt for `query` grounded in `claims`, in the given order
    pub fn new(query: &'a str, claims: &'a [GroundingClaim]) -> Self {
        Self { query, claims }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(SYNTHESIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Question: {}\n\n", self.query.trim()));

        prompt.push_str("Claims:\n");
        for claim in self.claims {
            prompt.push_str(&format!(
                "- \"{}\" (Source: {})\n",
                claim.claim_text, claim.source_ref
            ));
        }

        prompt.push_str("\nAnswer:");
        prompt
    }
}
