use serde::{Deserialize, Serialize};

/// 报告草稿中的一个小节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSection {
    pub heading: String,
    pub body: String,
}

/// 一次性渲染出的结构化报告草稿，生成后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub sections: Vec<DraftSection>,
}

impl Draft {
    /// 渲染为Markdown文本
    pub fn markdown(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        for section in &self.sections {
            out.push_str(&format!("\n## {}\n\n{}\n", section.heading, section.body));
        }
        out
    }
}

/// 审校结果 - 无论上游LLM服务是否可用都保证产出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// 审校过程说明
    pub feedback: String,
    /// 最终报告文本
    pub revised: String,
}
