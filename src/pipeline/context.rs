use anyhow::Result;

use crate::{config::Config, llm::client::LLMClient};

/// 一次运行共享的流水线上下文
#[derive(Clone)]
pub struct PipelineContext {
    /// LLM调用器，用于报告审校
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
}

impl PipelineContext {
    /// 创建新的流水线上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.llm.clone())?;
        Ok(Self { llm_client, config })
    }
}
