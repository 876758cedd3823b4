// Extraction backends behind the StreamProvider boundary

mod traits;
mod ytdlp;

#[cfg(test)]
pub mod fake;

pub use traits::{ProviderConfig, StreamProvider};
pub use ytdlp::YtDlpProvider;
