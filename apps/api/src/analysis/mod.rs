// CV analysis pipeline: extract → prompt → LLM call → parse/validate → sort.
// All LLM calls go through llm_client — no direct Anthropic API calls here.

pub mod handlers;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompts;
