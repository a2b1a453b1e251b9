pub mod analysis;
pub mod config;
pub mod video;

pub use analysis::{AnalysisDocument, DecodedAnalysis, Source};
pub use config::{Config, FrameConfig, GenerationConfig, MetadataConfig};
pub use video::{AnalysisMode, AnalysisRequest, Frame, VerifiedMetadata, VideoReference};
