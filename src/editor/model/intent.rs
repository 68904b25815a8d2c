use super::node::{NodeId, Position};

/// 속성 패널에서 요청하는 노드 단위 변경이다.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    /// 표시 이름을 바꾼다.
    Rename(String),
    /// config의 한 키만 교체한다.
    SetConfig {
        key: String,
        value: serde_yaml::Value,
    },
}

/// 캔버스가 호스트에게 요청하는 변경 의도이다.
///
/// 캔버스는 그래프를 직접 바꾸지 않고 이 의도만 내보낸다.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasIntent {
    MoveNode { id: NodeId, position: Position },
    SelectNode(Option<NodeId>),
    /// `to`가 None이면 연결 시작, Some이면 연결 완료이다.
    Connect { from: NodeId, to: Option<NodeId> },
    DeleteConnection(usize),
    UpdateNode { id: NodeId, patch: NodePatch },
    DeleteNode(NodeId),
    CloseProperties,
}

/// 호스트가 구현하는 콜백 묶음이다.
pub trait CanvasCallbacks {
    fn on_node_move(&mut self, id: &NodeId, position: Position);
    fn on_node_select(&mut self, id: Option<&NodeId>);
    fn on_connect(&mut self, from: &NodeId, to: Option<&NodeId>);
    fn on_delete_connection(&mut self, index: usize);
    fn on_update(&mut self, id: &NodeId, patch: NodePatch);
    fn on_delete_node(&mut self, id: &NodeId);
    fn on_close_properties(&mut self);
}

/// 의도를 순서대로 쌓아 두었다가 프레임 끝에 한 번에 적용하는 구현이다.
impl CanvasCallbacks for Vec<CanvasIntent> {
    fn on_node_move(&mut self, id: &NodeId, position: Position) {
        self.push(CanvasIntent::MoveNode {
            id: id.clone(),
            position,
        });
    }

    fn on_node_select(&mut self, id: Option<&NodeId>) {
        self.push(CanvasIntent::SelectNode(id.cloned()));
    }

    fn on_connect(&mut self, from: &NodeId, to: Option<&NodeId>) {
        self.push(CanvasIntent::Connect {
            from: from.clone(),
            to: to.cloned(),
        });
    }

    fn on_delete_connection(&mut self, index: usize) {
        self.push(CanvasIntent::DeleteConnection(index));
    }

    fn on_update(&mut self, id: &NodeId, patch: NodePatch) {
        self.push(CanvasIntent::UpdateNode {
            id: id.clone(),
            patch,
        });
    }

    fn on_delete_node(&mut self, id: &NodeId) {
        self.push(CanvasIntent::DeleteNode(id.clone()));
    }

    fn on_close_properties(&mut self) {
        self.push(CanvasIntent::CloseProperties);
    }
}
