use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub search: SearchConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Chunk count requested from the similarity search when the caller
    /// sends no limit.
    pub default_limit: usize,
    /// Minimum per-chunk similarity for a row to be returned at all.
    pub match_threshold: f32,
    /// Minimum mean similarity of the retrieved set; below this the
    /// retrieval is treated as failed and the request degrades to vision
    /// or a not-found answer.
    pub confidence_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// A regex section match shorter than this is a numbered-list false
    /// positive, not a real Item header, and is rejected.
    pub min_section_len: usize,
    /// Page band where Item 19 typically falls in an FDD; pages viewed in
    /// this band get the disclosure disclaimer on the vision path.
    pub item19_page_start: u32,
    pub item19_page_end: u32,
}

impl GateConfig {
    /// Validate config values, returning errors for clearly broken
    /// configurations.
    pub fn validate(&self) -> Result<(), String> {
        if self.search.default_limit == 0 {
            return Err("search.default_limit must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.search.match_threshold) {
            return Err("search.match_threshold must be in [0.0, 1.0]".into());
        }
        if !(0.0..=1.0).contains(&self.search.confidence_threshold) {
            return Err("search.confidence_threshold must be in [0.0, 1.0]".into());
        }
        if self.extraction.min_section_len == 0 {
            return Err("extraction.min_section_len must be > 0".into());
        }
        if self.extraction.item19_page_start > self.extraction.item19_page_end {
            return Err("extraction.item19_page_start must be <= item19_page_end".into());
        }
        Ok(())
    }

    /// Load config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                default_limit: 5,
                match_threshold: 0.3,
                confidence_threshold: 0.4,
            },
            extraction: ExtractionConfig {
                min_section_len: 100,
                item19_page_start: 50,
                item19_page_end: 65,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GateConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let mut config = GateConfig::default();
        config.search.confidence_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = GateConfig::default();
        config.search.default_limit = 0;
        assert!(config.validate().is_err());
    }
}
