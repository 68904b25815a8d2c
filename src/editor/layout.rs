//! 노드 상자 크기와 핸들 위치, 그래프 좌표 hit-test.

use eframe::egui;
use serde::Deserialize;

use super::interaction::PointerTarget;
use super::model::{GraphSnapshot, Node, Position, ResolvedConnection};

/// 노드 상자와 핸들의 그래프 좌표 치수이다.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeMetrics {
    pub width: f32,
    pub height: f32,
    pub handle_radius: f32,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 72.0,
            handle_radius: 6.0,
        }
    }
}

impl NodeMetrics {
    /// 노드가 차지하는 그래프 좌표 사각형.
    pub fn rect(&self, node: &Node) -> egui::Rect {
        egui::Rect::from_min_size(node.position.into(), egui::vec2(self.width, self.height))
    }

    /// 입력 핸들 중심. 입력이 없는 유형이면 None.
    pub fn input_anchor(&self, node: &Node) -> Option<Position> {
        node.node_type
            .has_input()
            .then(|| Position::new(node.position.x, node.position.y + self.height / 2.0))
    }

    /// 출력 핸들 중심.
    pub fn output_anchor(&self, node: &Node) -> Position {
        Position::new(
            node.position.x + self.width,
            node.position.y + self.height / 2.0,
        )
    }

    /// 연결의 그래프 좌표 양 끝점. 대상에 입력 핸들이 없으면 그리지 않는다.
    pub fn connection_endpoints(&self, conn: &ResolvedConnection<'_>) -> Option<(Position, Position)> {
        Some((self.output_anchor(conn.from), self.input_anchor(conn.to)?))
    }

    /// 그래프 좌표의 점이 무엇 위에 있는지 판정한다.
    ///
    /// 나중에 그려진 노드가 위에 있으므로 역순으로 검사하고, 핸들을 본문보다 먼저 본다.
    pub fn hit_test(&self, graph: GraphSnapshot<'_>, point: Position) -> PointerTarget {
        let p: egui::Pos2 = point.into();
        let grab = self.handle_radius * 2.0;
        for node in graph.nodes().iter().rev() {
            if p.distance(self.output_anchor(node).into()) <= grab {
                return PointerTarget::OutputHandle(node.id.clone());
            }
            if let Some(input) = self.input_anchor(node) {
                if p.distance(input.into()) <= grab {
                    return PointerTarget::InputHandle(node.id.clone());
                }
            }
            if self.rect(node).contains(p) {
                return PointerTarget::NodeBody(node.id.clone());
            }
        }
        PointerTarget::Background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::model::{Connection, NodeId, NodeType};

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("a", NodeType::Trigger, "A").at(0.0, 0.0),
            Node::new("b", NodeType::Email, "B").at(300.0, 0.0),
        ]
    }

    #[test]
    fn handles_sit_on_vertical_center_of_edges() {
        let metrics = NodeMetrics::default();
        let nodes = nodes();
        assert_eq!(metrics.output_anchor(&nodes[0]), Position::new(200.0, 36.0));
        assert_eq!(metrics.input_anchor(&nodes[1]), Some(Position::new(300.0, 36.0)));
        assert_eq!(metrics.input_anchor(&nodes[0]), None);
    }

    #[test]
    fn hit_test_prefers_handles_and_skips_trigger_input() {
        let metrics = NodeMetrics::default();
        let nodes = nodes();
        let graph = GraphSnapshot::new(&nodes, &[]);
        assert_eq!(
            metrics.hit_test(graph, Position::new(300.0, 36.0)),
            PointerTarget::InputHandle(NodeId::from("b"))
        );
        assert_eq!(
            metrics.hit_test(graph, Position::new(199.0, 37.0)),
            PointerTarget::OutputHandle(NodeId::from("a"))
        );
        assert_eq!(
            metrics.hit_test(graph, Position::new(1.0, 36.0)),
            PointerTarget::NodeBody(NodeId::from("a"))
        );
        assert_eq!(
            metrics.hit_test(graph, Position::new(250.0, 300.0)),
            PointerTarget::Background
        );
    }

    #[test]
    fn endpoints_follow_moved_node() {
        let metrics = NodeMetrics::default();
        let mut nodes = nodes();
        let connections = vec![Connection::new("a", "b")];
        let before = {
            let graph = GraphSnapshot::new(&nodes, &connections);
            metrics.connection_endpoints(&graph.resolved_connections()[0])
        };
        nodes[1].position = Position::new(400.0, 120.0);
        let graph = GraphSnapshot::new(&nodes, &connections);
        let after = metrics.connection_endpoints(&graph.resolved_connections()[0]);
        assert_eq!(before, Some((Position::new(200.0, 36.0), Position::new(300.0, 36.0))));
        assert_eq!(after, Some((Position::new(200.0, 36.0), Position::new(400.0, 156.0))));
    }

    #[test]
    fn connection_into_trigger_has_no_endpoints() {
        let metrics = NodeMetrics::default();
        let nodes = nodes();
        let connections = vec![Connection::new("b", "a")];
        let graph = GraphSnapshot::new(&nodes, &connections);
        let resolved = graph.resolved_connections();
        assert_eq!(metrics.connection_endpoints(&resolved[0]), None);
    }
}
