//! 测试用图模式

use docgraph::query::pattern::{ConnectedComponent, MatchEdge, MatchNode, PatternBuilder};

/// A -edge1-> B，B 带谓词
pub fn filtered_pair(degree: f64) -> ConnectedComponent {
    let mut builder = PatternBuilder::new();
    let a = builder.add_node(MatchNode::new("A"));
    let b = builder.add_node(MatchNode::new("B").with_predicate("B.name = 'x'"));
    builder.add_edge(MatchEdge::new("edge1", a, b).with_degree(degree));
    builder.build().expect("合法的两节点模式")
}

/// n0 -> n1 -> ... -> n{len-1}
pub fn chain(len: usize) -> ConnectedComponent {
    let mut builder = PatternBuilder::new();
    let nodes: Vec<_> = (0..len)
        .map(|i| builder.add_node(MatchNode::new(format!("n{}", i)).with_rows(10.0 * (i + 1) as f64)))
        .collect();
    for pair in nodes.windows(2) {
        let alias = format!("e{}", pair[0].index());
        builder.add_edge(MatchEdge::new(alias, pair[0], pair[1]).with_degree(2.0));
    }
    builder.build().expect("合法的链式模式")
}

/// A -> B -> C -> A
pub fn triangle() -> ConnectedComponent {
    let mut builder = PatternBuilder::new();
    let a = builder.add_node(MatchNode::new("A"));
    let b = builder.add_node(MatchNode::new("B"));
    let c = builder.add_node(MatchNode::new("C"));
    builder.add_edge(MatchEdge::new("ab", a, b));
    builder.add_edge(MatchEdge::new("bc", b, c));
    builder.add_edge(MatchEdge::new("ca", c, a));
    builder.build().expect("合法的三角形模式")
}

/// center -> leaf000 .. leaf{n-1}
pub fn star(leaves: usize) -> ConnectedComponent {
    let mut builder = PatternBuilder::new();
    let center = builder.add_node(MatchNode::new("center"));
    for i in 0..leaves {
        let leaf = builder.add_node(MatchNode::new(format!("leaf{:03}", i)));
        builder.add_edge(MatchEdge::new(format!("spoke{:03}", i), center, leaf));
    }
    builder.build().expect("合法的星形模式")
}

/// 社交网络查询：person 认识 friend，两人住在同一个 city，friend 关注自己
pub fn social() -> ConnectedComponent {
    let mut builder = PatternBuilder::new();
    let person = builder.add_node(
        MatchNode::new("person")
            .with_label("Person")
            .with_predicate("person.name = 'alice'"),
    );
    let friend = builder.add_node(MatchNode::new("friend").with_label("Person"));
    let city = builder.add_node(MatchNode::new("city").with_label("City"));
    let knows = builder.add_edge(MatchEdge::new("knows", person, friend).with_label("KNOWS"));
    builder.add_reversed(knows).expect("knows 可以反向遍历");
    builder.add_edge(MatchEdge::new("lives", person, city).with_label("LIVES_IN"));
    builder.add_edge(MatchEdge::new("friend_lives", friend, city).with_label("LIVES_IN"));
    builder.add_edge(MatchEdge::new("follows_self", friend, friend).with_label("FOLLOWS"));
    builder.build().expect("合法的社交网络模式")
}
