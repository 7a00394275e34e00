//! 计划缓存
//!
//! 相同的模式在统计信息不变时总是得到相同的计划。缓存以分量指纹、
//! 状态上限和统计信息版本为键，统计信息更新后旧条目自然失效。

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use super::MatchPlan;

/// 计划缓存键
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct PlanCacheKey {
    /// 分量指纹
    pub fingerprint: u64,
    pub max_states: usize,
    /// 统计信息版本
    pub stats_version: u64,
}

impl PlanCacheKey {
    pub fn new(fingerprint: u64, max_states: usize, stats_version: u64) -> Self {
        Self {
            fingerprint,
            max_states,
            stats_version,
        }
    }
}

/// 计划缓存统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanCacheStats {
    /// 命中次数
    pub hits: u64,
    /// 未命中次数
    pub misses: u64,
    /// 插入次数
    pub inserts: u64,
    /// 淘汰次数
    pub evictions: u64,
}

impl PlanCacheStats {
    /// 总查询次数
    pub fn total_queries(&self) -> u64 {
        self.hits + self.misses
    }

    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_queries();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 计划缓存
#[derive(Debug)]
pub struct PlanCache {
    /// LRU 缓存
    cache: Mutex<LruCache<PlanCacheKey, MatchPlan>>,
    /// 统计信息
    stats: Mutex<PlanCacheStats>,
}

impl PlanCache {
    /// 容量为 0 时返回 None
    pub fn new(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            cache: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(PlanCacheStats::default()),
        })
    }

    pub fn get(&self, key: &PlanCacheKey) -> Option<MatchPlan> {
        let plan = self.cache.lock().get(key).cloned();
        let mut stats = self.stats.lock();
        if plan.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        plan
    }

    pub fn insert(&self, key: PlanCacheKey, plan: MatchPlan) {
        let evicted = {
            let mut cache = self.cache.lock();
            let full = cache.len() >= cache.cap().get() && !cache.contains(&key);
            cache.put(key, plan);
            full
        };

        let mut stats = self.stats.lock();
        stats.inserts += 1;
        if evicted {
            stats.evictions += 1;
        }
    }

    /// 获取或计算计划，计算失败时不写入缓存
    pub fn get_or_compute<F, E>(&self, key: PlanCacheKey, compute: F) -> Result<MatchPlan, E>
    where
        F: FnOnce() -> Result<MatchPlan, E>,
    {
        if let Some(plan) = self.get(&key) {
            return Ok(plan);
        }
        let plan = compute()?;
        self.insert(key, plan.clone());
        Ok(plan)
    }

    pub fn size(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
        *self.stats.lock() = PlanCacheStats::default();
    }

    pub fn stats(&self) -> PlanCacheStats {
        self.stats.lock().clone()
    }
}
