//! 统计信息管理器模块
//!
//! 保存外部统计收集器提供的标签级统计信息，并在优化前把它们填充到模式上

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use super::{EdgeTypeStatistics, TagStatistics};
use crate::core::error::{OptimizeError, OptimizeResult};
use crate::query::pattern::ConnectedComponent;

/// 统计信息管理器
///
/// 读多写少，使用读写锁保护；每次更新都会递增版本号，
/// 计划缓存用版本号判断缓存的计划是否基于过期的统计信息
#[derive(Debug, Default)]
pub struct StatisticsManager {
    /// 标签统计信息（以标签名称为键）
    tag_stats: Arc<RwLock<HashMap<String, TagStatistics>>>,
    /// 边类型统计信息
    edge_stats: Arc<RwLock<HashMap<String, EdgeTypeStatistics>>>,
    version: AtomicU64,
}

impl StatisticsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_tag_stats(&self, tag_name: &str) -> Option<TagStatistics> {
        self.tag_stats.read().get(tag_name).cloned()
    }

    pub fn update_tag_stats(&self, stats: TagStatistics) -> OptimizeResult<()> {
        if !stats.vertex_count.is_finite() || stats.vertex_count < 0.0 {
            return Err(OptimizeError::Statistics(format!(
                "标签 {} 的顶点数量非法: {}",
                stats.tag_name, stats.vertex_count
            )));
        }
        self.tag_stats.write().insert(stats.tag_name.clone(), stats);
        self.version.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub fn get_edge_stats(&self, edge_type: &str) -> Option<EdgeTypeStatistics> {
        self.edge_stats.read().get(edge_type).cloned()
    }

    pub fn update_edge_stats(&self, stats: EdgeTypeStatistics) -> OptimizeResult<()> {
        let degree_valid = stats.avg_out_degree.is_finite() && stats.avg_out_degree >= 0.0;
        let histogram_valid = stats.histogram.as_ref().map_or(true, |h| h.is_valid());
        if !degree_valid || !histogram_valid {
            return Err(OptimizeError::Statistics(format!(
                "边类型 {} 的统计信息非法",
                stats.edge_type
            )));
        }
        self.edge_stats.write().insert(stats.edge_type.clone(), stats);
        self.version.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// 获取顶点数量，未知标签返回 None
    pub fn get_vertex_count(&self, tag_name: &str) -> Option<f64> {
        self.get_tag_stats(tag_name).map(|s| s.vertex_count)
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub fn clear_all(&self) {
        self.tag_stats.write().clear();
        self.edge_stats.write().clear();
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// 返回填充了统计信息的分量副本
    ///
    /// 只填充分析器没有给出的字段：节点行数、边的平均出度和直方图
    pub fn annotate(&self, component: &ConnectedComponent) -> ConnectedComponent {
        let mut annotated = component.clone();
        let tag_stats = self.tag_stats.read();
        let edge_stats = self.edge_stats.read();

        let mut filled = 0usize;
        for node in annotated.nodes_mut() {
            if node.estimated_rows.is_some() {
                continue;
            }
            if let Some(stats) = node.label.as_ref().and_then(|l| tag_stats.get(l)) {
                node.estimated_rows = Some(stats.estimate_rows(node.predicates.len()));
                filled += 1;
            }
        }
        for edge in annotated.edges_mut() {
            let Some(stats) = edge.label.as_ref().and_then(|l| edge_stats.get(l)) else {
                continue;
            };
            if edge.average_degree.is_none() {
                edge.average_degree = Some(stats.avg_out_degree);
                filled += 1;
            }
            if edge.statistics.is_none() {
                if let Some(histogram) = &stats.histogram {
                    edge.statistics = Some(histogram.clone());
                    filled += 1;
                }
            }
        }

        debug!("统计信息填充完成: {} 项", filled);
        annotated
    }
}
