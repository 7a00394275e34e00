use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

// 导入库模块
use docgraph::config::{Config, LogConfig};
use docgraph::core::{PublicError, ToPublicError};
use docgraph::query::optimizer::{MatchOptimizer, MatchPlan};
use docgraph::query::pattern::PatternDescription;
use docgraph::utils::logging;

#[derive(Parser)]
#[clap(version = "0.1.0", author = "DocGraph Contributors")]
enum Cli {
    /// Optimize every component of a pattern and print the plans as JSON
    Plan {
        #[clap(short, long)]
        pattern: PathBuf,
        #[clap(short, long)]
        config: Option<PathBuf>,
        /// Override optimizer.max_states from the config file
        #[clap(long)]
        max_states: Option<usize>,
        #[clap(long)]
        pretty: bool,
    },
    /// Validate a pattern without optimizing it
    Check {
        #[clap(short, long)]
        pattern: PathBuf,
    },
}

/// 单个连通分量的输出
#[derive(Serialize)]
struct ComponentOutput {
    component: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<MatchPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<PublicError>,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display())),
        None => Ok(Config {
            log: LogConfig {
                level: "warn".to_string(),
                dir: String::new(),
                ..LogConfig::default()
            },
            ..Config::default()
        }),
    }
}

fn read_pattern(path: &Path) -> Result<PatternDescription> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("无法读取模式文件 {}", path.display()))?;
    PatternDescription::from_json(&text)
        .with_context(|| format!("无法解析模式文件 {}", path.display()))
}

fn plan(pattern: &Path, config: Config, pretty: bool) -> Result<usize> {
    let description = read_pattern(pattern)?;
    let components = description.into_components()?;

    let optimizer = MatchOptimizer::new(config.optimizer)?;
    let outputs: Vec<ComponentOutput> = optimizer
        .optimize_components(&components)
        .into_iter()
        .enumerate()
        .map(|(component, result)| match result {
            Ok(plan) => ComponentOutput {
                component,
                plan: Some(plan),
                error: None,
            },
            Err(e) => {
                log::error!("连通分量 {} 优化失败: {}", component, e);
                ComponentOutput {
                    component,
                    plan: None,
                    error: Some(e.to_public_error()),
                }
            }
        })
        .collect();

    let failed = outputs.iter().filter(|o| o.error.is_some()).count();
    let json = if pretty {
        serde_json::to_string_pretty(&outputs)?
    } else {
        serde_json::to_string(&outputs)?
    };
    println!("{}", json);
    Ok(failed)
}

fn run(cli: Cli) -> Result<()> {
    match cli {
        Cli::Plan {
            pattern,
            config,
            max_states,
            pretty,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(max_states) = max_states {
                config.optimizer.max_states = max_states;
            }
            logging::init(&config.log).map_err(|e| anyhow::anyhow!("日志初始化失败: {}", e))?;

            let failed = plan(&pattern, config, pretty)?;
            if failed > 0 {
                anyhow::bail!("{} 个连通分量优化失败", failed);
            }
        }
        Cli::Check { pattern } => {
            let components = read_pattern(&pattern)?.into_components()?;
            println!("ok: {} 个连通分量", components.len());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let result = run(cli);
    logging::shutdown();
    result
}
