//! 工作流编排 - 四个智能体的严格顺序流水线
//!
//! Retrieve → Research → Compose → Review，每个阶段消费上一阶段的
//! 类型化输出；除Retriever的输入文件错误外，任何阶段失败都以降级
//! 产出收场，流水线始终交付最终报告。

use std::fs;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::llm::TextRefiner;
use crate::pipeline::compose::Writer;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::outlet;
use crate::pipeline::research::{ResearchOutcome, Researcher};
use crate::pipeline::retrieve::Retriever;
use crate::pipeline::review::Reviewer;
use crate::types::report::ReviewResult;

/// 启动报告生成工作流
pub async fn launch(config: &Config) -> Result<()> {
    let context = PipelineContext::new(config.clone())?;
    let refiner = context.llm_client.clone();
    run_pipeline(&context, &refiner).await?;
    Ok(())
}

/// 执行完整流水线。润色能力通过参数注入，测试中可替换为mock。
pub async fn run_pipeline(
    context: &PipelineContext,
    refiner: &dyn TextRefiner,
) -> Result<ReviewResult> {
    let config = &context.config;

    // 图表产物与报告写入同一输出目录
    fs::create_dir_all(&config.output_path).with_context(|| {
        format!("创建输出目录失败: {}", config.output_path.display())
    })?;

    println!("🔎 检索数据中...");
    let retriever = Retriever::new(
        config.entity_data_path.clone(),
        config.transaction_data_path.clone(),
    );
    let data = retriever.query(&config.query)?;

    println!("🔬 分析数据中...");
    let researcher = Researcher::new(data.clone(), config.output_path.clone());
    let outcome = researcher.run();
    if let ResearchOutcome::Degraded(_, reason) = &outcome {
        eprintln!("⚠️ 分析以降级结果完成: {reason}");
    }
    let research = outcome.into_output();
    if config.verbose {
        println!(
            "   事实 {} 项，图表 {} 张",
            research.facts.len(),
            research.figures.len()
        );
    }

    println!("✍️ 撰写报告草稿...");
    let writer = Writer::new(data.detected_entity.clone());
    let draft = writer.draft(&research.facts, &research.figures);

    println!("🧠 审校报告中...");
    let reviewer = Reviewer::new(config.llm.timeout_seconds, config.skip_review);
    let result = reviewer.review(refiner, &draft.markdown()).await;
    println!("📝 {}", result.feedback);

    outlet::save(config, &data, &research.facts, &research.figures, &result)?;
    Ok(result)
}
