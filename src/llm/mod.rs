//! LLM服务边界 - 文本进、文本出，不假定任何语义结构

use anyhow::Result;
use async_trait::async_trait;

pub mod client;

/// 可注入的文本润色能力。
///
/// Reviewer只依赖此接口，测试中用确定性的mock替换真实服务；
/// 超时由调用方统一施加，实现无需自行处理。
#[async_trait]
pub trait TextRefiner: Send + Sync {
    /// 实现所使用的模型名称，用于反馈说明
    fn model_name(&self) -> &str;

    /// 润色文本：输入完整指令与文档，输出润色后的文本或失败
    async fn refine(&self, prompt: &str) -> Result<String>;
}
