use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// margen-rs - 由Rust与本地LLM驱动的市场分析报告生成引擎
#[derive(Parser, Debug)]
#[command(name = "margen-rs")]
#[command(
    about = "Multi-agent market report generation engine. It retrieves and joins restaurant review and menu sales data, analyzes revenue structure and trends, and produces a reviewed business report with chart artifacts."
)]
#[command(version)]
pub struct Args {
    /// 实体数据文件路径（点评/评分表，CSV），缺省时沿用配置
    #[arg(short, long)]
    pub entity_data: Option<PathBuf>,

    /// 交易数据文件路径（菜单销售表，CSV），缺省时沿用配置
    #[arg(short, long)]
    pub transaction_data: Option<PathBuf>,

    /// 输出路径，缺省时沿用配置
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 分析查询文本（可包含餐厅名称以聚焦单个实体）
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// LLM模型名称
    #[arg(long)]
    pub model: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM调用超时时间（秒）
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// 跳过LLM审校，直接使用本地兜底改写
    #[arg(long)]
    pub skip_review: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("margen.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        // 覆盖配置文件中的设置，仅在用户实际给出参数时生效
        if let Some(entity_data) = self.entity_data {
            config.entity_data_path = entity_data;
        }
        if let Some(transaction_data) = self.transaction_data {
            config.transaction_data_path = transaction_data;
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }
        if !self.query.is_empty() {
            config.query = self.query;
        }

        // 覆盖LLM配置
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.llm.timeout_seconds = timeout_seconds;
        }

        // 其他配置
        if self.skip_review {
            config.skip_review = true;
        }
        config.verbose = self.verbose;

        config
    }
}
