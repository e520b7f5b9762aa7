//! 图表渲染 - 将汇总表绘制为PNG产物

use std::path::Path;

use anyhow::{Result, anyhow};
use plotters::prelude::*;

const FIGURE_SIZE: (u32, u32) = (800, 400);
const BAR_COLOR: RGBColor = RGBColor(66, 133, 244);
const LINE_COLOR: RGBColor = RGBColor(219, 68, 55);

fn y_ceiling(data: &[(String, f64)]) -> f64 {
    let max = data.iter().fold(0.0_f64, |acc, (_, v)| acc.max(*v));
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

/// 绘制柱状图，每个条目一根柱，X轴标签为条目名称
pub fn render_bar_chart(path: &Path, title: &str, data: &[(String, f64)]) -> Result<()> {
    if data.is_empty() {
        return Err(anyhow!("柱状图数据为空: {title}"));
    }

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(96)
        .y_label_area_size(72)
        .build_cartesian_2d(0.0..data.len() as f64, 0.0..y_ceiling(data))
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(data.len())
        .x_label_formatter(&|x| {
            data.get(x.floor() as usize)
                .map(|(name, _)| name.clone())
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    chart
        .draw_series(data.iter().enumerate().map(|(i, (_, value))| {
            Rectangle::new(
                [(i as f64 + 0.2, 0.0), (i as f64 + 0.8, *value)],
                BAR_COLOR.filled(),
            )
        }))
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    root.present()
        .map_err(|e| anyhow!("图表写入失败 {title}: {e}"))?;
    Ok(())
}

/// 绘制带数据点标记的折线图，X轴标签为时间桶名称
pub fn render_line_chart(path: &Path, title: &str, data: &[(String, f64)]) -> Result<()> {
    if data.is_empty() {
        return Err(anyhow!("折线图数据为空: {title}"));
    }

    let x_end = (data.len().saturating_sub(1)).max(1) as f64;
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(64)
        .y_label_area_size(72)
        .build_cartesian_2d(0.0..x_end, 0.0..y_ceiling(data))
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    chart
        .configure_mesh()
        .x_labels(data.len())
        .x_label_formatter(&|x| {
            data.get(x.round() as usize)
                .map(|(name, _)| name.clone())
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    chart
        .draw_series(LineSeries::new(
            data.iter()
                .enumerate()
                .map(|(i, (_, value))| (i as f64, *value)),
            &LINE_COLOR,
        ))
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    chart
        .draw_series(
            data.iter()
                .enumerate()
                .map(|(i, (_, value))| Circle::new((i as f64, *value), 4, LINE_COLOR.filled())),
        )
        .map_err(|e| anyhow!("图表绘制失败 {title}: {e}"))?;

    root.present()
        .map_err(|e| anyhow!("图表写入失败 {title}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_bar_chart_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bars.png");
        let data = vec![("Drinks".to_string(), 100.0), ("Mains".to_string(), 300.0)];

        render_bar_chart(&path, "Top Categories by Revenue", &data).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_render_line_chart_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trend.png");
        let data = vec![
            ("2024-01".to_string(), 100.0),
            ("2024-02".to_string(), 300.0),
        ];

        render_line_chart(&path, "Monthly Revenue Trend", &data).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_bar_chart_rejects_empty_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bars.png");

        assert!(render_bar_chart(&path, "Empty", &[]).is_err());
    }

    #[test]
    fn test_render_line_chart_single_point() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("single.png");
        let data = vec![("2024-01".to_string(), 42.0)];

        render_line_chart(&path, "Monthly Revenue Trend", &data).unwrap();
        assert!(path.exists());
    }
}
