use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// 노드 간의 방향성 연결이다. 화살표는 `to` 쪽에 그려진다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// 출력 쪽 노드 ID.
    pub from: NodeId,
    /// 입력 쪽 노드 ID.
    pub to: NodeId,
}

impl Connection {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// 주어진 노드가 양 끝 중 하나인지 확인한다.
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.from == id || &self.to == id
    }
}
