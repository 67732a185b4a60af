pub mod handlers;
pub mod history;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod verdict;
