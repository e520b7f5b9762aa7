#[cfg(test)]
mod tests {
    use crate::config::{Config, LLMConfig};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(
            config.entity_data_path,
            PathBuf::from("data/restaurant_reviews.csv")
        );
        assert_eq!(
            config.transaction_data_path,
            PathBuf::from("data/menu_sales.csv")
        );
        assert_eq!(config.output_path, PathBuf::from("./outputs"));
        assert!(config.query.is_empty());
        assert!(!config.skip_review);
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_config_default() {
        let llm = LLMConfig::default();

        assert_eq!(llm.api_base_url, "http://localhost:11434");
        assert_eq!(llm.model, "llama3.1");
        assert_eq!(llm.timeout_seconds, 90);
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("margen.toml");
        let content = r#"
entity_data_path = "fixtures/reviews.csv"
transaction_data_path = "fixtures/sales.csv"
output_path = "reports"
query = "How is Cafe Luna performing?"

[llm]
model = "mistral"
timeout_seconds = 30
"#;
        fs::write(&config_path, content).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.entity_data_path, PathBuf::from("fixtures/reviews.csv"));
        assert_eq!(config.output_path, PathBuf::from("reports"));
        assert_eq!(config.query, "How is Cafe Luna performing?");
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.timeout_seconds, 30);
        // 未出现的键落回默认值
        assert_eq!(config.llm.api_base_url, "http://localhost:11434");
        assert!(!config.skip_review);
    }

    #[test]
    fn test_config_from_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::from_file(&temp_dir.path().join("absent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("margen.toml");
        fs::write(&config_path, "not = [valid").unwrap();

        let result = Config::from_file(&config_path);
        assert!(result.is_err());
    }
}
