use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// 表格数据错误 - 输入文件缺失或内容不可解析时为致命错误
#[derive(Debug, Error)]
pub enum TableError {
    #[error("数据文件不存在: {0}")]
    Missing(String),

    #[error("无法读取数据文件 {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// 规范化列名（小写并去除首尾空白）
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 内存中的原始表格 - 有序列名 + 行数据，单元格为可空文本
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// 创建空表，列名在此处统一规范化
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.iter().map(|c| normalize_column(c)).collect(),
            rows: Vec::new(),
        }
    }

    /// 从CSV文件加载表格
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        if !path.exists() {
            return Err(TableError::Missing(path.display().to_string()));
        }

        let unreadable = |source: csv::Error| TableError::Unreadable {
            path: path.display().to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(unreadable)?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(unreadable)?
            .iter()
            .map(normalize_column)
            .collect();

        let mut table = Self {
            columns,
            rows: Vec::new(),
        };

        for record in reader.records() {
            let record = record.map_err(unreadable)?;
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|cell| {
                    let trimmed = cell.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
                .collect();
            // 宽度对齐到表头
            row.resize(table.columns.len(), None);
            table.rows.push(row);
        }

        Ok(table)
    }

    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// 查找第一个列名包含指定子串的列（大小写不敏感）
    pub fn find_column_containing(&self, needle: &str) -> Option<&str> {
        let needle = needle.to_lowercase();
        self.columns
            .iter()
            .find(|c| c.contains(&needle))
            .map(|c| c.as_str())
    }

    /// 取指定行列的单元格文本
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// 取指定行列的数值，无法解析时返回None
    pub fn numeric(&self, row: usize, column: &str) -> Option<f64> {
        self.value(row, column)?.parse::<f64>().ok()
    }

    /// 按谓词保留行
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&RawTable, usize) -> bool,
    {
        let total = self.rows.len();
        let mut kept = Vec::with_capacity(total);
        for idx in 0..total {
            if keep(self, idx) {
                kept.push(self.rows[idx].clone());
            }
        }
        self.rows = kept;
    }

    /// 将本表作为左表，与另一张表做左连接。
    ///
    /// 键值匹配大小写不敏感；右表键列不重复输出，其余与左表同名的
    /// 右表列追加`_entity`后缀。返回连接结果与右表列在结果中的列名。
    /// 左连接不丢行：无匹配的左行在右表列上补空。
    pub fn left_join(
        &self,
        right: &RawTable,
        left_key: &str,
        right_key: &str,
    ) -> (RawTable, Vec<String>) {
        let left_key_idx = self.column_index(left_key);
        let right_key_idx = right.column_index(right_key);

        let mut right_columns: Vec<(usize, String)> = Vec::new();
        for (idx, name) in right.columns.iter().enumerate() {
            if Some(idx) == right_key_idx {
                continue;
            }
            let out_name = if self.has_column(name) {
                format!("{name}_entity")
            } else {
                name.clone()
            };
            right_columns.push((idx, out_name));
        }

        let mut columns = self.columns.clone();
        columns.extend(right_columns.iter().map(|(_, name)| name.clone()));
        let mut joined = RawTable {
            columns,
            rows: Vec::new(),
        };

        // 右表按键值建索引
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        if let Some(key_idx) = right_key_idx {
            for (row_idx, row) in right.rows.iter().enumerate() {
                if let Some(Some(value)) = row.get(key_idx) {
                    index
                        .entry(value.to_lowercase())
                        .or_default()
                        .push(row_idx);
                }
            }
        }

        for row in &self.rows {
            let matches = left_key_idx
                .and_then(|idx| row.get(idx).cloned().flatten())
                .and_then(|value| index.get(&value.to_lowercase()).cloned())
                .unwrap_or_default();

            if matches.is_empty() {
                let mut out = row.clone();
                out.resize(joined.columns.len(), None);
                joined.rows.push(out);
            } else {
                for right_idx in matches {
                    let mut out = row.clone();
                    for (col_idx, _) in &right_columns {
                        out.push(right.rows[right_idx].get(*col_idx).cloned().flatten());
                    }
                    joined.rows.push(out);
                }
            }
        }

        let entity_columns = right_columns.into_iter().map(|(_, name)| name).collect();
        (joined, entity_columns)
    }
}

/// 交易表与实体表左连接后的结果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedTable {
    /// 连接后的数据
    pub table: RawTable,
    /// 从查询文本中识别出的实体名称
    pub detected_entity: Option<String>,
    /// 来自实体表的列在连接结果中的列名
    pub entity_columns: Vec<String>,
}

impl JoinedTable {
    /// 实体侧的营收列名（若存在）
    pub fn entity_revenue_column(&self) -> Option<&str> {
        self.entity_columns
            .iter()
            .find(|c| c.as_str() == "revenue_entity" || c.as_str() == "revenue")
            .map(|c| c.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_normalizes_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "t.csv", " Item_Name ,REVENUE\nBurger,10.5\n");

        let table = RawTable::from_csv_path(&path).unwrap();
        assert_eq!(table.columns(), &["item_name", "revenue"]);
        assert_eq!(table.value(0, "item_name"), Some("Burger"));
        assert_eq!(table.numeric(0, "revenue"), Some(10.5));
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = RawTable::from_csv_path(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, TableError::Missing(_)));
    }

    #[test]
    fn test_empty_cells_become_null() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "t.csv", "a,b\n1,\n,2\n");

        let table = RawTable::from_csv_path(&path).unwrap();
        assert_eq!(table.value(0, "b"), None);
        assert_eq!(table.value(1, "a"), None);
        assert_eq!(table.value(1, "b"), Some("2"));
    }

    #[test]
    fn test_left_join_keeps_all_left_rows() {
        let mut left = RawTable::new(vec!["restaurant_id".into(), "revenue".into()]);
        left.push_row(vec![Some("r1".into()), Some("10".into())]);
        left.push_row(vec![Some("r2".into()), Some("20".into())]);
        left.push_row(vec![None, Some("30".into())]);

        let mut right = RawTable::new(vec!["restaurant_id".into(), "rating".into()]);
        right.push_row(vec![Some("R1".into()), Some("4.5".into())]);

        let (joined, entity_columns) = left.left_join(&right, "restaurant_id", "restaurant_id");

        assert_eq!(joined.len(), 3);
        assert_eq!(entity_columns, vec!["rating".to_string()]);
        // 键匹配大小写不敏感
        assert_eq!(joined.value(0, "rating"), Some("4.5"));
        // 无匹配的行右侧补空
        assert_eq!(joined.value(1, "rating"), None);
        assert_eq!(joined.value(2, "rating"), None);
    }

    #[test]
    fn test_left_join_multi_match_multiplies_rows() {
        let mut left = RawTable::new(vec!["restaurant_name".into(), "revenue".into()]);
        left.push_row(vec![Some("Cafe Luna".into()), Some("10".into())]);

        let mut right = RawTable::new(vec!["restaurant_name".into(), "review".into()]);
        right.push_row(vec![Some("Cafe Luna".into()), Some("good".into())]);
        right.push_row(vec![Some("Cafe Luna".into()), Some("great".into())]);

        let (joined, _) = left.left_join(&right, "restaurant_name", "restaurant_name");
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn test_left_join_suffixes_colliding_columns() {
        let mut left = RawTable::new(vec!["restaurant_name".into(), "revenue".into()]);
        left.push_row(vec![Some("Cafe Luna".into()), Some("10".into())]);

        let mut right = RawTable::new(vec!["restaurant_name".into(), "revenue".into()]);
        right.push_row(vec![Some("Cafe Luna".into()), Some("99".into())]);

        let (joined, entity_columns) = left.left_join(&right, "restaurant_name", "restaurant_name");
        assert_eq!(entity_columns, vec!["revenue_entity".to_string()]);
        assert_eq!(joined.value(0, "revenue"), Some("10"));
        assert_eq!(joined.value(0, "revenue_entity"), Some("99"));
    }
}
