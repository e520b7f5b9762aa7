//! 检索阶段 - 加载两张数据表，识别查询中的实体并过滤、连接

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::table::{JoinedTable, RawTable};

/// 检索器 - 将交易表左连接到实体表，并按查询中提到的实体过滤
pub struct Retriever {
    entity_path: PathBuf,
    transaction_path: PathBuf,
}

impl Retriever {
    pub fn new(entity_path: PathBuf, transaction_path: PathBuf) -> Self {
        Self {
            entity_path,
            transaction_path,
        }
    }

    /// 加载数据、识别查询中的实体并连接两张表。
    ///
    /// 输入文件缺失或不可解析是本阶段的致命错误，直接向上传播。
    pub fn query(&self, query_text: &str) -> Result<JoinedTable> {
        let mut entity_table = RawTable::from_csv_path(&self.entity_path)
            .with_context(|| format!("加载实体数据失败: {}", self.entity_path.display()))?;
        let mut transaction_table = RawTable::from_csv_path(&self.transaction_path)
            .with_context(|| format!("加载交易数据失败: {}", self.transaction_path.display()))?;

        // 实体表的名称列，同名列同时用于交易表过滤与名称连接
        let entity_name_column = name_column(&entity_table).map(str::to_string);

        // 在查询文本中识别实体名称：首个命中即采用，不做排序或模糊匹配
        let detected_entity = detect_entity(&entity_table, query_text);

        if let Some(entity) = &detected_entity {
            println!("🎯 聚焦实体: {entity}");
            let needle = entity.to_lowercase();

            if let Some(column) = &entity_name_column {
                entity_table.retain_rows(|table, idx| {
                    table
                        .value(idx, column)
                        .is_some_and(|v| v.to_lowercase() == needle)
                });

                // 交易表缺少名称列时保持原样
                if transaction_table.has_column(column) {
                    transaction_table.retain_rows(|table, idx| {
                        table
                            .value(idx, column)
                            .is_some_and(|v| v.to_lowercase() == needle)
                    });
                }
            }
        }

        // 连接键优先选共享的标识列，退而求其次用名称列
        let key = join_key(
            &transaction_table,
            &entity_table,
            entity_name_column.as_deref(),
        );
        let (table, entity_columns) = match key {
            Some(key) => transaction_table.left_join(&entity_table, &key, &key),
            None => (transaction_table, Vec::new()),
        };

        println!(
            "✅ 检索完成，共 {} 条记录（实体过滤: {}）",
            table.len(),
            detected_entity.as_deref().unwrap_or("无")
        );

        Ok(JoinedTable {
            table,
            detected_entity,
            entity_columns,
        })
    }
}

/// 实体表的名称列：优先restaurant_name，否则取首个包含name的列
fn name_column(table: &RawTable) -> Option<&str> {
    if table.has_column("restaurant_name") {
        return Some("restaurant_name");
    }
    table.find_column_containing("name")
}

/// 在查询文本中扫描实体名称，名称的小写形式是查询小写形式的子串即命中
fn detect_entity(entity_table: &RawTable, query_text: &str) -> Option<String> {
    let column = name_column(entity_table)?;
    let query = query_text.to_lowercase();
    if query.is_empty() {
        return None;
    }

    for idx in 0..entity_table.len() {
        if let Some(name) = entity_table.value(idx, column)
            && query.contains(&name.to_lowercase())
        {
            return Some(name.to_string());
        }
    }
    None
}

/// 选择连接键：两表共享的`*_id`列，否则两表共享的实体名称列
fn join_key(left: &RawTable, right: &RawTable, name_column: Option<&str>) -> Option<String> {
    if let Some(id_column) = left
        .columns()
        .iter()
        .find(|c| c.ends_with("_id") && right.has_column(c))
    {
        return Some(id_column.clone());
    }

    let name = name_column?;
    if left.has_column(name) && right.has_column(name) {
        return Some(name.to_string());
    }
    None
}

// Include tests
#[cfg(test)]
mod tests;
