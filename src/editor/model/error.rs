use super::node::NodeId;

/// 연결 요청이 거부된 사유이다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionRejected {
    /// 자기 자신으로의 연결이다.
    #[error("노드를 자기 자신에 연결할 수 없습니다: {0}")]
    SelfConnection(NodeId),
    /// 존재하지 않는 노드를 참조한다.
    #[error("존재하지 않는 노드입니다: {0}")]
    UnknownNode(NodeId),
    /// 대상 노드에 입력 핸들이 없다.
    #[error("입력을 받을 수 없는 노드입니다: {0}")]
    TargetHasNoInput(NodeId),
}
