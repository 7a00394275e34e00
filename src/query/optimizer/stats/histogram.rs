//! 连接列直方图
//!
//! 直方图把连接键映射到（估计行数，是否热门值）。热门值显式记录，其余值
//! 用密度估计：某个非热门键的期望行数 = density × row_count。
//!
//! `merge` 把两条边在同一连接键上的直方图合并成连接结果的直方图，
//! 同时给出连接选择性。

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// 没有任何统计信息时假定的密度（无索引等值连接的典型选择性）
pub const DEFAULT_DENSITY: f64 = 0.0316228;

/// 单个连接键的估计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub count: f64,
    pub popular: bool,
}

/// 连接列统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    histogram: BTreeMap<i64, Bucket>,
    /// 总行数
    pub row_count: f64,
    /// 非热门值的平均密度
    pub density: f64,
    /// 沿路径累积的选择性
    pub selectivity: f64,
    /// 出现过的最大键
    pub max_value: i64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// 不携带任何信息的统计对象，选择性为 1.0
    pub fn new() -> Self {
        Self {
            histogram: BTreeMap::new(),
            row_count: 0.0,
            density: DEFAULT_DENSITY,
            selectivity: 1.0,
            max_value: 0,
        }
    }

    /// 由 (键, 行数, 是否热门) 构造直方图
    pub fn from_buckets<I>(row_count: f64, buckets: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64, bool)>,
    {
        let mut statistics = Self::new();
        statistics.row_count = row_count;
        for (key, count, popular) in buckets {
            statistics.insert(key, count, popular);
        }
        statistics
    }

    /// 只有平均出度时的估计：每个源行匹配 degree 个汇行，
    /// 相对于笛卡尔积的比例为 degree / 汇行数
    pub fn from_degree(average_degree: f64, sink_rows: f64) -> Self {
        let mut statistics = Self::new();
        statistics.selectivity = degree_selectivity(average_degree, sink_rows);
        statistics
    }

    pub fn insert(&mut self, key: i64, count: f64, popular: bool) {
        if self.histogram.is_empty() || key > self.max_value {
            self.max_value = key;
        }
        self.histogram.insert(key, Bucket { count, popular });
    }

    pub fn bucket(&self, key: i64) -> Option<&Bucket> {
        self.histogram.get(&key)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (i64, &Bucket)> {
        self.histogram.iter().map(|(k, b)| (*k, b))
    }

    pub fn len(&self) -> usize {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// 非热门键的期望行数
    pub fn default_row(&self) -> f64 {
        self.density * self.row_count
    }

    /// 某个键的估计行数，没有显式记录时退回到默认行数
    pub fn estimate(&self, key: i64) -> f64 {
        self.histogram
            .get(&key)
            .map(|b| b.count)
            .unwrap_or_else(|| self.default_row())
    }

    pub fn popular_count(&self) -> f64 {
        self.histogram
            .values()
            .filter(|b| b.popular)
            .map(|b| b.count)
            .sum()
    }

    pub fn is_valid(&self) -> bool {
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;
        finite_non_negative(self.row_count)
            && finite_non_negative(self.density)
            && finite_non_negative(self.selectivity)
            && self.histogram.values().all(|b| finite_non_negative(b.count))
    }

    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.row_count.to_bits().hash(state);
        self.density.to_bits().hash(state);
        self.selectivity.to_bits().hash(state);
        for (key, bucket) in &self.histogram {
            key.hash(state);
            bucket.count.to_bits().hash(state);
            bucket.popular.hash(state);
        }
    }

    /// 合并两个直方图，返回 (连接结果的直方图, 选择性)
    ///
    /// 任一侧没有直方图时结果直方图取另一侧，选择性为两侧先验选择性之积；
    /// 否则按键升序同时遍历两侧：
    /// - 两侧都有且至少一侧热门：行数相乘，记为新的热门值
    /// - 两侧都有且都不热门：累加后统一折算成新的默认密度
    /// - 只有一侧有：乘以另一侧的默认行数
    ///
    /// 此时返回的选择性为 合并行数 / (左行数 × 右行数)，
    /// 结果对象上的 `selectivity` 再乘上两侧的先验选择性
    pub fn merge(cur: &Statistics, new: &Statistics) -> (Statistics, f64) {
        if cur.is_empty() || new.is_empty() {
            let mut result = if cur.is_empty() { new.clone() } else { cur.clone() };
            if cur.is_empty() && new.is_empty() {
                result.density = DEFAULT_DENSITY;
            }
            let selectivity = cur.selectivity * new.selectivity;
            result.selectivity = selectivity;
            return (result, selectivity);
        }

        let cur_default_row = cur.default_row();
        let new_default_row = new.default_row();

        let mut result = Statistics::new();
        let mut row_count = 0.0;
        let mut cur_not_popular = 0.0;
        let mut new_not_popular = 0.0;
        let mut not_popular_keys = 0usize;

        let emit = |result: &mut Statistics, key: i64, count: f64, popular: bool| {
            if count > 0.0 {
                result.insert(key, count, popular);
            }
            count
        };

        let mut cur_iter = cur.histogram.iter().peekable();
        let mut new_iter = new.histogram.iter().peekable();
        loop {
            match (cur_iter.peek(), new_iter.peek()) {
                (Some((&cur_key, cur_bucket)), Some((&new_key, new_bucket))) => {
                    if cur_key == new_key {
                        if cur_bucket.popular || new_bucket.popular {
                            row_count += emit(
                                &mut result,
                                cur_key,
                                cur_bucket.count * new_bucket.count,
                                true,
                            );
                        } else {
                            cur_not_popular += cur_bucket.count;
                            new_not_popular += new_bucket.count;
                            not_popular_keys += 1;
                        }
                        cur_iter.next();
                        new_iter.next();
                    } else if cur_key < new_key {
                        row_count += emit(
                            &mut result,
                            cur_key,
                            cur_bucket.count * new_default_row,
                            cur_bucket.popular,
                        );
                        cur_iter.next();
                    } else {
                        row_count += emit(
                            &mut result,
                            new_key,
                            new_bucket.count * cur_default_row,
                            new_bucket.popular,
                        );
                        new_iter.next();
                    }
                }
                (Some((&cur_key, cur_bucket)), None) => {
                    row_count += emit(
                        &mut result,
                        cur_key,
                        cur_bucket.count * new_default_row,
                        cur_bucket.popular,
                    );
                    cur_iter.next();
                }
                (None, Some((&new_key, new_bucket))) => {
                    row_count += emit(
                        &mut result,
                        new_key,
                        new_bucket.count * cur_default_row,
                        new_bucket.popular,
                    );
                    new_iter.next();
                }
                (None, None) => break,
            }
        }

        let mut shared_default_row = None;
        if not_popular_keys > 0 && cur_not_popular > 0.0 && new_not_popular > 0.0 {
            let mass = cur_not_popular
                * new_not_popular
                * (cur_default_row / cur_not_popular).min(new_default_row / new_not_popular);
            row_count += mass;
            shared_default_row = Some(mass / not_popular_keys as f64);
        }

        result.row_count = row_count;
        // 结果密度按合并后的行数归一化，使 density × row_count 仍是非热门键的默认行数
        result.density = match shared_default_row {
            Some(default_row) if row_count > 0.0 => default_row / row_count,
            _ => cur.density.max(new.density),
        };
        result.max_value = cur.max_value.max(new.max_value);

        let denominator = cur.row_count * new.row_count;
        let join_selectivity = if denominator > 0.0 {
            (row_count / denominator).min(1.0)
        } else {
            1.0
        };
        result.selectivity = cur.selectivity * new.selectivity * join_selectivity;

        (result, join_selectivity)
    }
}

/// 由平均出度推导的选择性，汇行数不足 1 时按 1 计算
pub fn degree_selectivity(average_degree: f64, sink_rows: f64) -> f64 {
    (average_degree / sink_rows.max(1.0)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn popular_stats() -> Statistics {
        Statistics::from_buckets(1000.0, vec![(1, 300.0, true), (5, 200.0, true), (9, 10.0, false)])
    }

    #[test]
    fn test_fresh_statistics() {
        let stats = Statistics::new();
        assert!(stats.is_empty());
        assert_eq!(stats.selectivity, 1.0);
        assert_eq!(stats.density, DEFAULT_DENSITY);
    }

    #[test]
    fn test_max_value_tracks_largest_key() {
        let stats = Statistics::from_buckets(10.0, vec![(7, 1.0, true), (3, 1.0, true), (-2, 1.0, false)]);
        assert_eq!(stats.max_value, 7);
    }

    #[test]
    fn test_estimate_falls_back_to_density() {
        let stats = popular_stats();
        assert_eq!(stats.estimate(1), 300.0);
        assert!(approx_eq(stats.estimate(42), DEFAULT_DENSITY * 1000.0));
    }

    #[test]
    fn test_merge_identity() {
        let stats = popular_stats();
        let (merged, selectivity) = Statistics::merge(&stats, &Statistics::new());
        assert_eq!(merged.buckets().count(), stats.len());
        assert_eq!(merged.bucket(1), stats.bucket(1));
        assert_eq!(selectivity, 1.0);

        let mut filtered = stats.clone();
        filtered.selectivity = 0.25;
        let (merged, selectivity) = Statistics::merge(&Statistics::new(), &filtered);
        assert_eq!(merged.row_count, 1000.0);
        assert_eq!(selectivity, 0.25);
    }

    #[test]
    fn test_merge_both_empty_keeps_default_density() {
        let mut left = Statistics::from_degree(0.5, 1.0);
        left.density = 0.2;
        let (merged, selectivity) = Statistics::merge(&left, &Statistics::from_degree(2.0, 4.0));
        assert!(merged.is_empty());
        assert_eq!(merged.density, DEFAULT_DENSITY);
        assert!(approx_eq(selectivity, 0.25));
    }

    #[test]
    fn test_merge_popular_keys() {
        let left = Statistics::from_buckets(100.0, vec![(1, 10.0, true), (2, 5.0, false)]);
        let right = Statistics::from_buckets(50.0, vec![(1, 4.0, false), (3, 6.0, true)]);
        let (merged, selectivity) = Statistics::merge(&left, &right);

        // 键 1: 两侧都有，左侧热门 -> 10 * 4
        assert_eq!(merged.bucket(1).map(|b| b.count), Some(40.0));
        assert!(merged.bucket(1).unwrap().popular);
        // 键 2: 只在左侧 -> 5 * (右侧默认行数)
        let right_default = 50.0 * DEFAULT_DENSITY;
        assert!(approx_eq(merged.bucket(2).unwrap().count, 5.0 * right_default));
        // 键 3: 只在右侧 -> 6 * (左侧默认行数)
        let left_default = 100.0 * DEFAULT_DENSITY;
        assert!(approx_eq(merged.bucket(3).unwrap().count, 6.0 * left_default));

        let expected_rows = 40.0 + 5.0 * right_default + 6.0 * left_default;
        assert!(approx_eq(merged.row_count, expected_rows));
        assert!(approx_eq(selectivity, expected_rows / 5000.0));
        assert_eq!(merged.max_value, 3);
        // 没有共同的非热门键，密度取两侧较大值
        assert_eq!(merged.density, DEFAULT_DENSITY);
    }

    #[test]
    fn test_merge_not_popular_keys_share_default_density() {
        let mut left = Statistics::from_buckets(100.0, vec![(1, 4.0, false), (2, 6.0, false)]);
        left.density = 0.1;
        let mut right = Statistics::from_buckets(200.0, vec![(1, 8.0, false), (2, 2.0, false)]);
        right.density = 0.05;
        let (merged, _) = Statistics::merge(&left, &right);

        // 左: 非热门 10, 默认行 10; 右: 非热门 10, 默认行 10
        // mass = 10 * 10 * min(10/10, 10/10) = 100
        assert!(approx_eq(merged.row_count, 100.0));
        assert!(merged.is_empty());
        // 每个键分到 50 行，按合并行数归一化
        assert!(approx_eq(merged.default_row(), 50.0));
    }

    #[test]
    fn test_merge_row_count_commutative() {
        let left = Statistics::from_buckets(
            1000.0,
            vec![(1, 120.0, true), (4, 3.0, false), (6, 2.0, false), (8, 40.0, true)],
        );
        let right = Statistics::from_buckets(
            400.0,
            vec![(1, 9.0, false), (4, 5.0, false), (7, 30.0, true), (8, 1.0, false)],
        );
        let (ab, sel_ab) = Statistics::merge(&left, &right);
        let (ba, sel_ba) = Statistics::merge(&right, &left);
        assert_eq!(ab.row_count, ba.row_count);
        assert_eq!(sel_ab, sel_ba);
    }

    #[test]
    fn test_merged_selectivity_accumulates() {
        let mut left = Statistics::from_buckets(10.0, vec![(1, 5.0, true)]);
        left.selectivity = 0.5;
        let right = Statistics::from_buckets(10.0, vec![(1, 2.0, true)]);
        let (merged, join_selectivity) = Statistics::merge(&left, &right);
        assert!(approx_eq(join_selectivity, 0.1));
        assert!(approx_eq(merged.selectivity, 0.05));
    }

    #[test]
    fn test_degree_selectivity() {
        assert_eq!(degree_selectivity(0.5, 1.0), 0.5);
        assert_eq!(degree_selectivity(0.5, 0.0), 0.5);
        assert_eq!(degree_selectivity(10.0, 100.0), 0.1);
        assert_eq!(degree_selectivity(10.0, 2.0), 1.0);
    }
}
