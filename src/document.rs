//! 캔버스의 노드/연결 배열을 소유하는 워크플로 문서.
//!
//! 캔버스가 보낸 의도를 그대로 믿지 않고 여기서 다시 검증한 뒤 반영한다.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::editor::model::{
    CanvasIntent, Connection, ConnectionRejected, GraphSnapshot, Node, NodeId, NodeType, Position,
};
use crate::editor::{NodeTypeRegistry, properties};

/// 문서 조작 중 발생 가능한 오류이다.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// 노드 ID가 중복된 경우이다.
    #[error("중복된 노드 ID가 존재합니다: {0}")]
    DuplicateNodeId(NodeId),
    /// 존재하지 않는 노드를 대상으로 한 요청이다.
    #[error("존재하지 않는 노드입니다: {0}")]
    UnknownNode(NodeId),
    /// 범위를 벗어난 연결 삭제 요청이다.
    #[error("연결 인덱스가 범위를 벗어났습니다: {index} (연결 수 {len})")]
    ConnectionIndexOutOfRange { index: usize, len: usize },
    /// 그래프 불변식을 어기는 연결 요청이다.
    #[error(transparent)]
    Rejected(#[from] ConnectionRejected),
}

/// 저장 단위가 되는 워크플로 문서이다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    /// 문서 표시 이름.
    #[serde(default)]
    pub name: String,
    /// 노드 목록.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// 연결 목록.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl WorkflowDocument {
    /// 빈 문서를 만든다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 캔버스에 넘길 읽기 전용 스냅샷.
    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot::new(&self.nodes, &self.connections)
    }

    /// 노드 ID 중복을 검사한다.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(DocumentError::DuplicateNodeId(node.id.clone()));
            }
        }
        Ok(())
    }

    /// 그려지지 않는 연결 수. 끝점이 없거나 대상에 입력이 없는 연결은 남겨 두되 그리지 않는다.
    pub fn dangling_connections(&self) -> usize {
        let drawable = self
            .snapshot()
            .resolved_connections()
            .iter()
            .filter(|conn| conn.to.node_type.has_input())
            .count();
        self.connections.len() - drawable
    }

    /// 노드와 연결 어디에서도 쓰이지 않은 첫 `{prefix}_{n}` ID를 만든다.
    ///
    /// 끊어진 연결이 가리키는 ID를 다시 쓰면 그 연결이 새 노드에 붙으므로 피한다.
    pub fn generate_id(&self, prefix: &str) -> NodeId {
        let ids: HashSet<&str> = self
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .chain(
                self.connections
                    .iter()
                    .flat_map(|c| [c.from.as_str(), c.to.as_str()]),
            )
            .collect();
        (1..)
            .map(|idx| format!("{prefix}_{idx}"))
            .find(|candidate| !ids.contains(candidate.as_str()))
            .map(NodeId::from)
            .unwrap_or_else(|| NodeId::from(prefix))
    }

    /// 팔레트에서 고른 유형의 노드를 추가하고 ID를 돌려준다.
    pub fn add_node(&mut self, node_type: NodeType) -> NodeId {
        let id = self.generate_id("node");
        let entry = NodeTypeRegistry::entry(&node_type);
        let step = (self.nodes.len() % 10) as f32 * 24.0;
        let base = Position::default();
        let mut node = Node::new(id.clone(), node_type.clone(), format!("{} {}", entry.label, self.nodes.len() + 1));
        node.position = Position::new(base.x + step, base.y + step);
        node.config = NodeTypeRegistry::default_config(&node_type);
        info!(node = %id, kind = %node_type, "노드 추가");
        self.nodes.push(node);
        id
    }

    /// 캔버스 의도를 검증 후 반영한다. 데이터가 바뀌었으면 true를 돌려준다.
    pub fn apply(&mut self, intent: CanvasIntent) -> Result<bool, DocumentError> {
        match intent {
            CanvasIntent::MoveNode { id, position } => {
                let node = self.node_mut(&id)?;
                node.position = position;
                Ok(true)
            }
            CanvasIntent::Connect { from, to: Some(to) } => {
                self.snapshot().validate_connection(&from, &to)?;
                info!(%from, %to, "연결 추가");
                self.connections.push(Connection::new(from, to));
                Ok(true)
            }
            CanvasIntent::DeleteConnection(index) => {
                if index >= self.connections.len() {
                    return Err(DocumentError::ConnectionIndexOutOfRange {
                        index,
                        len: self.connections.len(),
                    });
                }
                let removed = self.connections.remove(index);
                info!(from = %removed.from, to = %removed.to, "연결 삭제");
                Ok(true)
            }
            CanvasIntent::UpdateNode { id, patch } => {
                properties::apply_patch(self.node_mut(&id)?, patch);
                Ok(true)
            }
            CanvasIntent::DeleteNode(id) => {
                let before = self.nodes.len();
                self.nodes.retain(|node| node.id != id);
                if self.nodes.len() == before {
                    return Err(DocumentError::UnknownNode(id));
                }
                self.connections.retain(|conn| !conn.touches(&id));
                info!(node = %id, "노드 삭제");
                Ok(true)
            }
            CanvasIntent::SelectNode(_)
            | CanvasIntent::Connect { to: None, .. }
            | CanvasIntent::CloseProperties => Ok(false),
        }
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes
            .iter_mut()
            .find(|node| &node.id == id)
            .ok_or_else(|| DocumentError::UnknownNode(id.clone()))
    }

    /// YAML 파일을 읽어 문서로 만든다.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut file =
            File::open(path).with_context(|| format!("워크플로 파일 열기 실패: {}", path.display()))?;
        Self::from_reader(&mut file)
    }

    /// Reader에서 YAML을 읽고 ID 중복을 검사한다.
    pub fn from_reader<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        let document: Self = serde_yaml::from_str(&buf).context("워크플로 YAML 파싱 실패")?;
        document.validate()?;
        let dangling = document.dangling_connections();
        if dangling > 0 {
            warn!(dangling, "그릴 수 없는 연결이 있습니다(끝점 없음 또는 입력 없는 대상). 화면에는 표시되지 않습니다");
        }
        Ok(document)
    }

    /// 문서를 YAML 문자열로 직렬화한다.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// 문서를 YAML 파일로 저장한다.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_yaml()?)
            .with_context(|| format!("워크플로 파일 저장 실패: {}", path.display()))?;
        info!(path = %path.display(), "워크플로 저장");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::NodeMetrics;
    use crate::editor::model::NodePatch;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn sample() -> WorkflowDocument {
        let mut doc = WorkflowDocument::new("sample");
        doc.nodes = vec![
            Node::new("a", NodeType::Trigger, "A").at(0.0, 0.0),
            Node::new("b", NodeType::Email, "B").at(300.0, 0.0),
            Node::new("c", NodeType::Webhook, "C").at(300.0, 200.0),
        ];
        doc.nodes[1].config = serde_yaml::from_str("subject: hi\nextra: 1\n").unwrap();
        doc
    }

    fn connect(doc: &mut WorkflowDocument, from: &str, to: &str) -> Result<bool, DocumentError> {
        doc.apply(CanvasIntent::Connect {
            from: from.into(),
            to: Some(to.into()),
        })
    }

    #[test]
    fn no_sequence_of_requests_materializes_a_self_loop() {
        let mut doc = sample();
        for from in ["a", "b", "c", "ghost"] {
            for to in ["a", "b", "c", "ghost"] {
                let _ = connect(&mut doc, from, to);
            }
        }
        assert!(doc.connections.iter().all(|c| c.from != c.to));
        assert!(doc.connections.iter().all(|c| c.to != NodeId::from("a")));
        assert_eq!(doc.connections.len(), 4);
        assert_eq!(
            connect(&mut doc, "b", "b"),
            Err(DocumentError::Rejected(ConnectionRejected::SelfConnection("b".into())))
        );
    }

    #[test]
    fn move_changes_only_the_target_position() {
        let mut doc = sample();
        let before = doc.clone();
        doc.apply(CanvasIntent::MoveNode {
            id: "b".into(),
            position: Position::new(420.0, 64.0),
        })
        .unwrap();
        for (old, new) in before.nodes.iter().zip(&doc.nodes) {
            assert_eq!(old.id, new.id);
            assert_eq!(old.name, new.name);
            assert_eq!(old.config, new.config);
            if new.id.as_str() == "b" {
                assert_eq!(new.position, Position::new(420.0, 64.0));
            } else {
                assert_eq!(old.position.x.to_bits(), new.position.x.to_bits());
                assert_eq!(old.position.y.to_bits(), new.position.y.to_bits());
            }
        }
        assert_eq!(before.connections, doc.connections);
    }

    #[test]
    fn moving_a_node_reflows_attached_connections() {
        let mut doc = sample();
        connect(&mut doc, "a", "b").unwrap();
        connect(&mut doc, "b", "c").unwrap();
        let metrics = NodeMetrics::default();
        doc.apply(CanvasIntent::MoveNode {
            id: "b".into(),
            position: Position::new(500.0, 100.0),
        })
        .unwrap();
        let graph = doc.snapshot();
        let ends: Vec<_> = graph
            .resolved_connections()
            .iter()
            .filter_map(|conn| metrics.connection_endpoints(conn))
            .collect();
        assert_eq!(ends[0].1, Position::new(500.0, 136.0));
        assert_eq!(ends[1].0, Position::new(700.0, 136.0));
    }

    #[test]
    fn deleting_a_node_leaves_remaining_graph_renderable() {
        let mut doc = sample();
        connect(&mut doc, "a", "b").unwrap();
        connect(&mut doc, "b", "c").unwrap();
        // 다른 주체가 노드만 지워 연결이 끊긴 상황
        doc.nodes.retain(|n| n.id.as_str() != "c");
        assert_eq!(doc.dangling_connections(), 1);
        assert_eq!(doc.snapshot().resolved_connections().len(), 1);

        doc.apply(CanvasIntent::DeleteNode("b".into())).unwrap();
        assert!(doc.connections.is_empty());
        assert_eq!(
            doc.apply(CanvasIntent::DeleteNode("b".into())),
            Err(DocumentError::UnknownNode("b".into()))
        );
    }

    #[test]
    fn duplicate_edges_are_allowed_and_deleted_by_index() {
        let mut doc = sample();
        connect(&mut doc, "a", "b").unwrap();
        connect(&mut doc, "a", "b").unwrap();
        connect(&mut doc, "a", "c").unwrap();
        doc.apply(CanvasIntent::DeleteConnection(1)).unwrap();
        assert_eq!(doc.connections, vec![Connection::new("a", "b"), Connection::new("a", "c")]);
        assert_eq!(
            doc.apply(CanvasIntent::DeleteConnection(5)),
            Err(DocumentError::ConnectionIndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn update_node_patches_one_key() {
        let mut doc = sample();
        doc.apply(CanvasIntent::UpdateNode {
            id: "b".into(),
            patch: NodePatch::SetConfig {
                key: "to".into(),
                value: "x@y.com".into(),
            },
        })
        .unwrap();
        let expected: crate::editor::model::NodeConfig =
            serde_yaml::from_str("subject: hi\nextra: 1\nto: x@y.com\n").unwrap();
        assert_eq!(doc.nodes[1].config, expected);
    }

    #[test]
    fn add_node_generates_free_id_and_defaults() {
        let mut doc = sample();
        doc.nodes.push(Node::new("node_1", NodeType::Action, "x"));
        let id = doc.add_node(NodeType::Api);
        assert_eq!(id, NodeId::from("node_2"));
        let node = doc.nodes.last().unwrap();
        assert_eq!(node.config.get("method"), Some(&serde_yaml::Value::from("GET")));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn add_node_never_revives_a_dangling_connection() {
        let yaml = "name: d\nnodes:\n  - {id: a, type: webhook, name: A}\nconnections:\n  - {from: a, to: node_1}\n  - {from: node_2, to: node_2}\n";
        let mut doc = WorkflowDocument::from_reader(&mut yaml.as_bytes()).unwrap();
        assert_eq!(doc.dangling_connections(), 2);
        let id = doc.add_node(NodeType::Email);
        assert_eq!(id, NodeId::from("node_3"));
        assert_eq!(doc.dangling_connections(), 2);
        assert!(doc.snapshot().resolved_connections().is_empty());
    }

    #[test]
    fn edge_into_trigger_from_file_counts_as_undrawable() {
        let yaml = "name: t\nnodes:\n  - {id: t, type: trigger, name: T}\n  - {id: e, type: email, name: E}\nconnections:\n  - {from: e, to: t}\n  - {from: t, to: e}\n";
        let mut doc = WorkflowDocument::from_reader(&mut yaml.as_bytes()).unwrap();
        assert_eq!(doc.dangling_connections(), 1);
        doc.apply(CanvasIntent::DeleteNode("t".into())).unwrap();
        assert!(doc.connections.is_empty());
        assert_eq!(doc.dangling_connections(), 0);
    }

    #[test]
    fn duplicate_ids_are_rejected_on_load() {
        let yaml = "name: dup\nnodes:\n  - {id: a, type: email, name: A}\n  - {id: a, type: api, name: B}\n";
        let err = WorkflowDocument::from_reader(&mut yaml.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DocumentError>(),
            Some(&DocumentError::DuplicateNodeId("a".into()))
        );
    }

    #[test]
    fn save_and_load_preserve_unknown_types_and_config_keys() {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("시스템 시간이 UTC epoch 이전입니다.")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("workflow_canvas_test_{timestamp}"));
        std::fs::create_dir_all(&dir).expect("임시 디렉터리 생성 실패");
        let path = dir.join("flow.yaml");

        let mut doc = sample();
        doc.nodes.push(Node::new("z", NodeType::Unknown("slack".into()), "Z"));
        doc.connections.push(Connection::new("a", "missing"));
        doc.save(&path).expect("저장 실패");
        let loaded = WorkflowDocument::load(&path).expect("로드 실패");
        assert_eq!(loaded, doc);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
