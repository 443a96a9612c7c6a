/// Individual report format detectors and decoders

pub mod minimal;
pub mod plist;
pub mod yaml;

// Re-export detector and decoder implementations
pub use minimal::MinimalYamlDecoder;
pub use plist::{PlistDecoder, PlistDetector};
#[cfg(feature = "full-yaml")]
pub use yaml::YamlDecoder;
pub use yaml::YamlDetector;
