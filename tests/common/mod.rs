//! 集成测试共享工具模块
//!
//! 提供测试用的图模式和断言函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod pattern_fixtures;

use std::path::PathBuf;

/// 测试用的临时目录，位于项目 target 目录下，测试结束后自动清理
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new(name: &str) -> anyhow::Result<Self> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("target")
            .join("test-temp")
            .join(format!("{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
