use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 实体数据文件路径（点评/评分表，CSV）
    pub entity_data_path: PathBuf,

    /// 交易数据文件路径（菜单销售表，CSV）
    pub transaction_data_path: PathBuf,

    /// 输出路径（报告与图表产物）
    pub output_path: PathBuf,

    /// 分析查询文本，为空时不做实体过滤
    pub query: String,

    /// 跳过LLM审校，直接使用本地兜底改写
    pub skip_review: bool,

    /// 是否启用详细日志
    pub verbose: bool,

    /// LLM模型配置
    pub llm: LLMConfig,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM API基地址（Ollama风格的本地服务）
    pub api_base_url: String,

    /// 模型名称
    pub model: String,

    /// 审校调用超时时间（秒），超时视同调用失败
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity_data_path: PathBuf::from("data/restaurant_reviews.csv"),
            transaction_data_path: PathBuf::from("data/menu_sales.csv"),
            output_path: PathBuf::from("./outputs"),
            query: String::new(),
            skip_review: false,
            verbose: false,
            llm: LLMConfig::default(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_seconds: 90,
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

// Include tests
#[cfg(test)]
mod tests;
