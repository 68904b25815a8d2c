use std::collections::HashMap;

use super::connection::Connection;
use super::error::ConnectionRejected;
use super::node::{Node, NodeId};

/// 호스트가 건네준 노드/연결 배열에 대한 읽기 전용 뷰이다.
///
/// 캔버스는 이 뷰를 통해서만 그래프를 읽으며 원본 배열을 수정하지 않는다.
#[derive(Debug, Clone, Copy)]
pub struct GraphSnapshot<'a> {
    nodes: &'a [Node],
    connections: &'a [Connection],
}

/// 양 끝 노드가 모두 존재하는 연결이다.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedConnection<'a> {
    /// 호스트 배열에서의 위치. 삭제 요청에 그대로 쓰인다.
    pub index: usize,
    pub from: &'a Node,
    pub to: &'a Node,
}

impl<'a> GraphSnapshot<'a> {
    pub fn new(nodes: &'a [Node], connections: &'a [Connection]) -> Self {
        Self { nodes, connections }
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn connections(&self) -> &'a [Connection] {
        self.connections
    }

    /// ID로 노드를 조회한다.
    pub fn node(&self, id: &NodeId) -> Option<&'a Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// 그릴 수 있는 연결만 원래 인덱스와 함께 반환한다.
    ///
    /// 끝점이 사라진 연결은 조용히 건너뛴다.
    pub fn resolved_connections(&self) -> Vec<ResolvedConnection<'a>> {
        let by_id: HashMap<&NodeId, &'a Node> =
            self.nodes.iter().map(|node| (&node.id, node)).collect();
        self.connections
            .iter()
            .enumerate()
            .filter_map(|(index, conn)| {
                Some(ResolvedConnection {
                    index,
                    from: *by_id.get(&conn.from)?,
                    to: *by_id.get(&conn.to)?,
                })
            })
            .collect()
    }

    /// 새 연결이 그래프 불변식을 지키는지 검사한다. 중복 연결은 허용한다.
    pub fn validate_connection(&self, from: &NodeId, to: &NodeId) -> Result<(), ConnectionRejected> {
        if from == to {
            return Err(ConnectionRejected::SelfConnection(from.clone()));
        }
        self.node(from)
            .ok_or_else(|| ConnectionRejected::UnknownNode(from.clone()))?;
        let target = self
            .node(to)
            .ok_or_else(|| ConnectionRejected::UnknownNode(to.clone()))?;
        if !target.node_type.has_input() {
            return Err(ConnectionRejected::TargetHasNoInput(to.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::model::NodeType;

    fn sample() -> (Vec<Node>, Vec<Connection>) {
        let nodes = vec![
            Node::new("a", NodeType::Trigger, "A").at(0.0, 0.0),
            Node::new("b", NodeType::Email, "B").at(300.0, 0.0),
        ];
        let connections = vec![
            Connection::new("a", "b"),
            Connection::new("a", "ghost"),
            Connection::new("a", "b"),
        ];
        (nodes, connections)
    }

    #[test]
    fn dangling_connections_are_skipped_and_indices_kept() {
        let (nodes, connections) = sample();
        let graph = GraphSnapshot::new(&nodes, &connections);
        let indices: Vec<_> = graph
            .resolved_connections()
            .iter()
            .map(|c| c.index)
            .collect();
        assert_eq!(indices, [0, 2]);
    }

    #[test]
    fn validation_rules() {
        let (nodes, connections) = sample();
        let graph = GraphSnapshot::new(&nodes, &connections);
        let a = NodeId::from("a");
        let b = NodeId::from("b");
        assert_eq!(graph.validate_connection(&a, &b), Ok(()));
        assert_eq!(
            graph.validate_connection(&a, &a),
            Err(ConnectionRejected::SelfConnection(a.clone()))
        );
        assert_eq!(
            graph.validate_connection(&b, &a),
            Err(ConnectionRejected::TargetHasNoInput(a.clone()))
        );
        assert_eq!(
            graph.validate_connection(&a, &NodeId::from("ghost")),
            Err(ConnectionRejected::UnknownNode(NodeId::from("ghost")))
        );
    }
}
