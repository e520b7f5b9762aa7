//! LLM客户端 - 对接Ollama风格的本地文本生成服务

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::TextRefiner;

/// 生成请求体，流式输出固定关闭
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// LLM客户端
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    http: reqwest::Client,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, http })
    }

    /// 调用文本生成接口，返回生成的文本
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/api/generate",
            self.config.api_base_url.trim_end_matches('/')
        );
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("调用模型服务失败: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("模型服务返回错误状态: {}", response.status()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("模型服务响应不是合法JSON")?;
        Ok(body.response.trim().to_string())
    }
}

#[async_trait]
impl TextRefiner for LLMClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn refine(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }
}
