//! 研究阶段 - 在连接后的数据上计算汇总统计并渲染图表产物
//!
//! 每个分析步骤都以其所需的列是否存在为前提，列缺失时静默跳过该步骤；
//! 部分数据也要产出部分洞察。阶段本身从不向调用方返回错误，失败以
//! 降级结果的形式体现在返回值中。

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;

use crate::charts;
use crate::types::facts::{FactSet, FigureRef};
use crate::types::table::{JoinedTable, RawTable};
use crate::utils::{month_bucket, parse_flexible_date};

/// 一次分析运行的产出
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchOutput {
    pub facts: FactSet,
    pub figures: Vec<FigureRef>,
}

/// 分析结果，降级状态显式携带在类型里
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchOutcome {
    /// 全部步骤正常完成
    Completed(ResearchOutput),
    /// 分析中途失败，产出仅含错误说明
    Degraded(ResearchOutput, String),
}

impl ResearchOutcome {
    pub fn output(&self) -> &ResearchOutput {
        match self {
            ResearchOutcome::Completed(output) => output,
            ResearchOutcome::Degraded(output, _) => output,
        }
    }

    pub fn into_output(self) -> ResearchOutput {
        match self {
            ResearchOutcome::Completed(output) => output,
            ResearchOutcome::Degraded(output, _) => output,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ResearchOutcome::Degraded(..))
    }
}

/// 研究器 - 分析数据并生成可视化洞察
pub struct Researcher {
    data: JoinedTable,
    output_dir: PathBuf,
}

impl Researcher {
    pub fn new(data: JoinedTable, output_dir: PathBuf) -> Self {
        Self { data, output_dir }
    }

    /// 主分析流程。任何未被步骤自身吸收的失败在此处收口为降级结果，
    /// 调用方视角下本方法总是成功返回。
    pub fn run(&self) -> ResearchOutcome {
        let mut facts = FactSet::new();
        let mut figures = Vec::new();

        match self.analyze(&mut facts, &mut figures) {
            Ok(()) => {
                println!("✅ 数据分析完成");
                ResearchOutcome::Completed(ResearchOutput { facts, figures })
            }
            Err(err) => {
                eprintln!("❌ 数据分析失败: {err:#}");
                let mut facts = FactSet::new();
                facts.insert_text("error", &format!("{err:#}"));
                ResearchOutcome::Degraded(
                    ResearchOutput {
                        facts,
                        figures: Vec::new(),
                    },
                    err.to_string(),
                )
            }
        }
    }

    fn analyze(&self, facts: &mut FactSet, figures: &mut Vec<FigureRef>) -> Result<()> {
        let table = &self.data.table;

        self.revenue_overview(table, facts);
        self.category_breakdown(table, facts, figures)?;
        self.item_breakdown(table, figures)?;
        self.monthly_trend(table, facts, figures)?;

        // 销售优化附加分析：自身失败只记日志，不影响整个阶段
        if let Err(err) = self.sales_optimization(table, facts) {
            eprintln!("⚠️ 销售优化分析跳过: {err:#}");
        }

        Ok(())
    }

    /// 1️⃣ 营收总览与记录规模
    fn revenue_overview(&self, table: &RawTable, facts: &mut FactSet) {
        if table.has_column("revenue") {
            let values: Vec<f64> = (0..table.len())
                .filter_map(|idx| table.numeric(idx, "revenue"))
                .collect();
            let total: f64 = values.iter().sum();
            let avg = if values.is_empty() {
                0.0
            } else {
                total / values.len() as f64
            };
            facts.insert_number("total_revenue", total);
            facts.insert_number("avg_revenue", avg);
        }

        facts.insert_integer("total_records", table.len() as u64);

        if table.has_column("item_name") {
            let unique: HashSet<&str> = (0..table.len())
                .filter_map(|idx| table.value(idx, "item_name"))
                .collect();
            facts.insert_integer("unique_items", unique.len() as u64);
        }
    }

    /// 2️⃣ 头部品类与Top10品类柱状图
    fn category_breakdown(
        &self,
        table: &RawTable,
        facts: &mut FactSet,
        figures: &mut Vec<FigureRef>,
    ) -> Result<()> {
        if !table.has_column("category") || !table.has_column("revenue") {
            return Ok(());
        }

        let groups = revenue_by_group(table, "category", "revenue");
        let Some((top_name, top_revenue)) = groups.first() else {
            return Ok(());
        };

        facts.insert_text("top_category", top_name);
        facts.insert_number("top_category_revenue", *top_revenue);

        let top10: Vec<(String, f64)> = groups.into_iter().take(10).collect();
        let path = self.output_dir.join("top_categories_revenue.png");
        charts::render_bar_chart(&path, "Top Categories by Revenue", &top10)?;
        figures.push(FigureRef::new(path));
        Ok(())
    }

    /// 3️⃣ Top10单品柱状图
    fn item_breakdown(&self, table: &RawTable, figures: &mut Vec<FigureRef>) -> Result<()> {
        if !table.has_column("item_name") || !table.has_column("revenue") {
            return Ok(());
        }

        let top10: Vec<(String, f64)> = revenue_by_group(table, "item_name", "revenue")
            .into_iter()
            .take(10)
            .collect();
        if top10.is_empty() {
            return Ok(());
        }

        let path = self.output_dir.join("top_items_revenue.png");
        charts::render_bar_chart(&path, "Top Menu Items by Revenue", &top10)?;
        figures.push(FigureRef::new(path));
        Ok(())
    }

    /// 4️⃣ 月度营收趋势折线图与时间范围
    fn monthly_trend(
        &self,
        table: &RawTable,
        facts: &mut FactSet,
        figures: &mut Vec<FigureRef>,
    ) -> Result<()> {
        if !table.has_column("date") || !table.has_column("revenue") {
            return Ok(());
        }

        // 无法解析的日期视为空值，排除在聚合之外
        let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
        let mut min_date: Option<NaiveDate> = None;
        let mut max_date: Option<NaiveDate> = None;
        for idx in 0..table.len() {
            let Some(date) = table.value(idx, "date").and_then(parse_flexible_date) else {
                continue;
            };
            min_date = Some(min_date.map_or(date, |d| d.min(date)));
            max_date = Some(max_date.map_or(date, |d| d.max(date)));

            let revenue = table.numeric(idx, "revenue").unwrap_or(0.0);
            *buckets.entry(month_bucket(&date)).or_insert(0.0) += revenue;
        }

        let (Some(min_date), Some(max_date)) = (min_date, max_date) else {
            return Ok(());
        };

        let series: Vec<(String, f64)> = buckets.into_iter().collect();
        let path = self.output_dir.join("monthly_trend.png");
        charts::render_line_chart(&path, "Monthly Revenue Trend", &series)?;
        figures.push(FigureRef::new(path));

        facts.insert_text("start_date", &min_date.to_string());
        facts.insert_text("end_date", &max_date.to_string());
        Ok(())
    }

    /// 5️⃣ 销售优化附加分析：促销效应、天气影响、头部菜系
    ///
    /// 天气影响在连接后的行上取实体侧营收的均值，因此一个实体的权重
    /// 随其交易行数增长；与直接在原始实体表上分组的口径不同。
    fn sales_optimization(&self, table: &RawTable, facts: &mut FactSet) -> Result<()> {
        // 促销效应：按促销标记分组的营收均值
        if table.has_column("promotion") && table.has_column("revenue") {
            let means = mean_by_group(table, "promotion", "revenue");
            if !means.is_empty() {
                let labeled: BTreeMap<String, f64> = means
                    .into_iter()
                    .map(|(key, mean)| (promotion_label(&key), mean))
                    .collect();
                facts.insert_map("promotion_effect", labeled);
            }
        }

        // 天气影响：首个名称含weather的实体侧列，对实体侧营收取均值
        let weather_column = self
            .data
            .entity_columns
            .iter()
            .find(|c| c.contains("weather"))
            .cloned();
        if let (Some(weather), Some(revenue)) =
            (weather_column, self.data.entity_revenue_column())
        {
            let means = mean_by_group(table, &weather, revenue);
            if !means.is_empty() {
                facts.insert_map("weather_impact", means);
            }
        }

        // 头部菜系：营收Top5品类
        if table.has_column("category") && table.has_column("revenue") {
            let top5: BTreeMap<String, f64> = revenue_by_group(table, "category", "revenue")
                .into_iter()
                .take(5)
                .collect();
            if !top5.is_empty() {
                facts.insert_map("top_cuisines", top5);
            }
        }

        Ok(())
    }
}

/// 分组求和并按总额降序排列；并列时保持首次出现的顺序
fn revenue_by_group(table: &RawTable, group_column: &str, value_column: &str) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for idx in 0..table.len() {
        let Some(key) = table.value(idx, group_column) else {
            continue;
        };
        let value = table.numeric(idx, value_column).unwrap_or(0.0);
        if !totals.contains_key(key) {
            order.push(key.to_string());
        }
        *totals.entry(key.to_string()).or_insert(0.0) += value;
    }

    let mut groups: Vec<(String, f64)> = order
        .into_iter()
        .map(|key| {
            let total = totals[&key];
            (key, total)
        })
        .collect();
    // 稳定排序，总额相同的组保持首次出现顺序
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    groups
}

/// 分组求均值（忽略无法解析的数值）
fn mean_by_group(table: &RawTable, group_column: &str, value_column: &str) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, u64)> = BTreeMap::new();

    for idx in 0..table.len() {
        let Some(key) = table.value(idx, group_column) else {
            continue;
        };
        let Some(value) = table.numeric(idx, value_column) else {
            continue;
        };
        let entry = sums.entry(key.to_string()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// 促销标记重命名：仅0/1编码映射为可读标签，其余取值原样保留
fn promotion_label(key: &str) -> String {
    match key.trim() {
        "0" | "0.0" => "No Promo".to_string(),
        "1" | "1.0" => "Promo".to_string(),
        other => other.to_string(),
    }
}
