//! 产出落盘 - 将最终报告、事实集合与检索数据作为终端产物写入磁盘

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::types::facts::{FactSet, FigureRef};
use crate::types::report::ReviewResult;
use crate::types::table::JoinedTable;

/// 保存一次运行的全部终端产物，返回最终报告路径
pub fn save(
    config: &Config,
    data: &JoinedTable,
    facts: &FactSet,
    figures: &[FigureRef],
    review: &ReviewResult,
) -> Result<PathBuf> {
    println!("\n🖊️ 报告存储中...");
    fs::create_dir_all(&config.output_path).with_context(|| {
        format!("创建输出目录失败: {}", config.output_path.display())
    })?;

    let report_path = config.output_path.join("report_final.md");
    fs::write(&report_path, &review.revised)
        .with_context(|| format!("写入报告失败: {}", report_path.display()))?;

    let facts_path = config.output_path.join("facts.json");
    fs::write(&facts_path, facts.to_json_string()?)
        .with_context(|| format!("写入事实集合失败: {}", facts_path.display()))?;

    let data_path = config.output_path.join("retrieved_data.csv");
    write_table_csv(&data_path, data)?;

    // 核对图表产物是否仍在磁盘上
    for figure in figures {
        match figure.resolve() {
            Some(path) => println!("🖼️ 图表产物就绪: {}", path.display()),
            None => eprintln!("⚠️ 图表产物缺失: {}", figure.path().display()),
        }
    }

    println!("✅ 最终报告已保存: {}", report_path.display());
    Ok(report_path)
}

fn write_table_csv(path: &PathBuf, data: &JoinedTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("写入检索数据失败: {}", path.display()))?;

    writer.write_record(data.table.columns())?;
    for row in data.table.rows() {
        let record: Vec<&str> = row.iter().map(|cell| cell.as_deref().unwrap_or("")).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
