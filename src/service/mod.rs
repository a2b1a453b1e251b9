pub mod analysis;
pub mod frames;
pub mod llm;
pub mod oembed;
pub mod video_id;

pub use analysis::AnalysisService;
pub use llm::GeminiClient;
pub use oembed::OEmbedClient;

#[cfg(test)]
pub(crate) mod test_http;
