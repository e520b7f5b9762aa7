//! 撰写阶段 - 将事实集合与图表引用渲染为结构化报告草稿
//!
//! 纯函数式渲染：相同输入产出相同草稿，缺失的事实直接省略，从不报错。

use serde_json::Value;

use crate::types::facts::{FactSet, FigureRef};
use crate::types::report::{Draft, DraftSection};
use crate::utils::title_case;

/// 撰写器
pub struct Writer {
    detected_entity: Option<String>,
}

impl Writer {
    pub fn new(detected_entity: Option<String>) -> Self {
        Self { detected_entity }
    }

    /// 渲染报告草稿
    pub fn draft(&self, facts: &FactSet, figures: &[FigureRef]) -> Draft {
        let title = match &self.detected_entity {
            Some(entity) => format!("Market Analysis Report: {entity}"),
            None => "Market Analysis Report".to_string(),
        };

        let sections = vec![
            DraftSection {
                heading: "Executive Summary".to_string(),
                body: self.executive_summary(facts),
            },
            DraftSection {
                heading: "Key Metrics".to_string(),
                body: render_metrics(facts),
            },
            DraftSection {
                heading: "Visualizations".to_string(),
                body: render_figures(figures),
            },
        ];

        Draft { title, sections }
    }

    /// 从已知事实键拼装摘要，键缺失的条目直接省略
    fn executive_summary(&self, facts: &FactSet) -> String {
        let mut lines: Vec<String> = Vec::new();

        if let Some(entity) = &self.detected_entity {
            lines.push(format!("- This report focuses on **{entity}**."));
        }
        if let Some(total) = facts.number("total_revenue") {
            match facts.number("total_records") {
                Some(records) => lines.push(format!(
                    "- Total revenue reached {} across {} records.",
                    format_money(total),
                    format_number(records)
                )),
                None => lines.push(format!(
                    "- Total revenue reached {}.",
                    format_money(total)
                )),
            }
        } else if let Some(records) = facts.number("total_records") {
            lines.push(format!(
                "- The dataset contains {} records.",
                format_number(records)
            ));
        }
        if let Some(category) = facts.text("top_category") {
            match facts.number("top_category_revenue") {
                Some(revenue) => lines.push(format!(
                    "- The strongest category was **{category}** with {} in revenue.",
                    format_money(revenue)
                )),
                None => lines.push(format!("- The strongest category was **{category}**.")),
            }
        }
        if let Some(items) = facts.number("unique_items") {
            lines.push(format!(
                "- {} distinct menu items generated sales.",
                format_number(items)
            ));
        }
        if let (Some(start), Some(end)) = (facts.text("start_date"), facts.text("end_date")) {
            lines.push(format!("- Data covers the period {start} to {end}."));
        }
        if let Some(error) = facts.text("error") {
            lines.push(format!("- Analysis was degraded: {error}"));
        }

        if lines.is_empty() {
            "- No summary metrics were available for this run.".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// 全量事实渲染：标量为单行，嵌套映射为缩进的键值块
fn render_metrics(facts: &FactSet) -> String {
    if facts.is_empty() {
        return "- No metrics were computed.".to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    for (key, value) in facts.iter() {
        match value {
            Value::Object(map) => {
                lines.push(format!("- **{key}**:"));
                for (sub_key, sub_value) in map {
                    lines.push(format!("  - {sub_key}: {}", format_value(sub_value)));
                }
            }
            other => lines.push(format!("- **{key}**: {}", format_value(other))),
        }
    }
    lines.join("\n")
}

fn render_figures(figures: &[FigureRef]) -> String {
    if figures.is_empty() {
        return "- No visualizations were generated for this run.".to_string();
    }

    figures
        .iter()
        .map(|figure| {
            let caption = caption_for(figure);
            format!("![{caption}]({})\n*{caption}*", figure.path().display())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 图表标题：按产物名称关键字匹配，未命中时回退为标题化的文件名
fn caption_for(figure: &FigureRef) -> String {
    let stem = figure.file_stem();
    if stem.contains("monthly") {
        "Monthly Revenue Trend".to_string()
    } else if stem.contains("categories") {
        "Top Categories by Revenue".to_string()
    } else if stem.contains("items") {
        "Top Menu Items by Revenue".to_string()
    } else {
        title_case(stem)
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 数值格式：整数不带小数位，小数保留两位
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_money(value: f64) -> String {
    format!("${value:.2}")
}
