use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 一次分析运行中累积的事实集合。
///
/// 键到值的映射，值可为数值、文本或嵌套映射；同键重写即覆盖。
/// 底层使用BTreeMap，迭代与序列化顺序确定。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet {
    facts: BTreeMap<String, Value>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_number(&mut self, key: &str, value: f64) {
        self.facts.insert(key.to_string(), Value::from(value));
    }

    pub fn insert_integer(&mut self, key: &str, value: u64) {
        self.facts.insert(key.to_string(), Value::from(value));
    }

    pub fn insert_text(&mut self, key: &str, value: &str) {
        self.facts.insert(key.to_string(), Value::from(value));
    }

    /// 写入嵌套映射事实（如分组均值）
    pub fn insert_map(&mut self, key: &str, value: BTreeMap<String, f64>) {
        let map: serde_json::Map<String, Value> = value
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect();
        self.facts.insert(key.to_string(), Value::Object(map));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.facts.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.facts.get(key)?.as_f64()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.facts.get(key)?.as_str()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.facts.iter()
    }

    /// 序列化为带缩进的JSON文本
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.facts)?)
    }
}

/// 指向一张已渲染图表产物的引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRef {
    path: PathBuf,
}

impl FigureRef {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 产物文件名（不含扩展名），用于标题关键字匹配
    pub fn file_stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("figure")
    }

    /// 重新定位图表文件：先按原路径查找，再相对工作目录查找
    pub fn resolve(&self) -> Option<PathBuf> {
        self.resolve_from(std::env::current_dir().ok().as_deref())
    }

    fn resolve_from(&self, base: Option<&Path>) -> Option<PathBuf> {
        if self.path.exists() {
            return Some(self.path.clone());
        }
        let candidate = base?.join(&self.path);
        if candidate.exists() {
            return Some(candidate);
        }
        None
    }
}
