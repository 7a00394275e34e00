//! 自定义断言辅助模块

use std::collections::BTreeSet;

use docgraph::query::optimizer::MatchPlan;
use docgraph::query::pattern::ConnectedComponent;

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言计划恰好覆盖分量中的每个节点一次、每条边至少一次
pub fn assert_covers(plan: &MatchPlan, component: &ConnectedComponent) {
    assert_eq!(
        plan.len(),
        component.node_count(),
        "遍历链长度应等于节点数: {:?}",
        plan.aliases()
    );

    let visited: BTreeSet<&str> = plan.aliases().into_iter().collect();
    assert_eq!(visited.len(), component.node_count(), "每个节点只能出现一次");
    for (_, node) in component.nodes() {
        assert!(visited.contains(node.alias.as_str()), "节点 {} 未被覆盖", node.alias);
    }

    // 只统计各步实际连接的边，种子节点的自环在取文档时一并检查
    let root = plan.chain[0].alias.as_str();
    let mut covered: BTreeSet<&str> = plan
        .chain
        .iter()
        .flat_map(|s| s.pre_materialized.iter().chain(s.post_materialized.iter()))
        .map(|e| e.alias.as_str())
        .collect();
    for (_, edge) in component.edges() {
        if edge.is_self_loop() && component.alias(edge.source) == root {
            covered.insert(edge.alias.as_str());
        }
    }
    for (_, edge) in component.edges() {
        assert!(covered.contains(edge.alias.as_str()), "边 {} 未被连接", edge.alias);
    }

    assert!(plan.chain[0].edge.is_none(), "第一步不应有边");
    assert!(plan.chain.iter().skip(1).all(|s| s.edge.is_some()), "后续步骤都应有边");
}
