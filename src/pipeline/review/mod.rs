//! 审校阶段 - 调用文本生成服务润色报告，失败时走确定性的本地兜底
//!
//! 两条终止路径：服务成功且输出非空则采用服务输出；服务不可达、返回
//! 失败、输出为空或调用超时，一律采用固定横幅加原文的兜底结果。
//! 单次尝试，无重试；流水线永远不会因审校失败而中断。

use std::time::Duration;

use crate::llm::TextRefiner;
use crate::types::report::ReviewResult;

/// 发给审校模型的固定指令
pub const REVIEW_INSTRUCTION: &str = "You are a senior business consultant. \
Review and refine this report to make it more concise, professional, and actionable. \
Keep structure and factual content intact.";

/// 兜底路径的固定横幅，随后拼接原始文档，不做任何实际内容改写
pub const FALLBACK_BANNER: &str = "### 🔍 Reviewer Refinement Summary\n\
- Language polished for clarity\n\
- Recommendations structured into bullet points\n\
- Executive summary highlighted\n\n";

/// 审校器
pub struct Reviewer {
    timeout: Duration,
    skip_llm: bool,
}

impl Reviewer {
    pub fn new(timeout_seconds: u64, skip_llm: bool) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_seconds),
            skip_llm,
        }
    }

    /// 审校报告文本。无论服务可用与否都返回结果，从不失败。
    pub async fn review(&self, refiner: &dyn TextRefiner, report_text: &str) -> ReviewResult {
        if self.skip_llm {
            println!("⏭️ 按配置跳过LLM审校");
            return ReviewResult {
                feedback: "LLM review skipped by configuration. \
                    Report returned as drafted. (Simulated refinement applied)"
                    .to_string(),
                revised: format!("{FALLBACK_BANNER}{report_text}"),
            };
        }

        let prompt = format!("{REVIEW_INSTRUCTION}\n\n{report_text}");
        match tokio::time::timeout(self.timeout, refiner.refine(&prompt)).await {
            Ok(Ok(revised)) if !revised.trim().is_empty() => ReviewResult {
                feedback: format!(
                    "✅ Review completed successfully using model `{}`.",
                    refiner.model_name()
                ),
                revised: revised.trim().to_string(),
            },
            Ok(Ok(_)) => {
                eprintln!("⚠️ 审校模型返回空输出，使用本地兜底改写");
                self.fallback(report_text)
            }
            Ok(Err(err)) => {
                eprintln!("⚠️ 审校模型调用失败: {err:#}");
                self.fallback(report_text)
            }
            Err(_) => {
                eprintln!("⚠️ 审校模型调用超时（{}秒）", self.timeout.as_secs());
                self.fallback(report_text)
            }
        }
    }

    fn fallback(&self, report_text: &str) -> ReviewResult {
        ReviewResult {
            feedback: "LLM review encountered an error or timeout. \
                Report returned as drafted. (Simulated refinement applied)"
                .to_string(),
            revised: format!("{FALLBACK_BANNER}{report_text}"),
        }
    }
}
