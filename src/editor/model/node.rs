use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 노드를 식별하는 불투명 ID이다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// 문자열로부터 ID를 만든다.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 내부 문자열을 반환한다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 에디터가 아는 노드 유형이다.
///
/// 목록에 없는 문자열은 [`NodeType::Unknown`]에 원문 그대로 보관되어
/// 저장 시 손실 없이 다시 기록된다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Trigger,
    Schedule,
    Email,
    Webhook,
    Database,
    Condition,
    Notification,
    Action,
    Document,
    User,
    Calculate,
    Filter,
    Loop,
    Approval,
    Alert,
    Api,
    /// 레지스트리에 없는 유형이다.
    Unknown(String),
}

impl NodeType {
    /// 팔레트에 노출되는 알려진 유형 전체이다.
    pub const KNOWN: [NodeType; 16] = [
        NodeType::Trigger,
        NodeType::Schedule,
        NodeType::Email,
        NodeType::Webhook,
        NodeType::Database,
        NodeType::Condition,
        NodeType::Notification,
        NodeType::Action,
        NodeType::Document,
        NodeType::User,
        NodeType::Calculate,
        NodeType::Filter,
        NodeType::Loop,
        NodeType::Approval,
        NodeType::Alert,
        NodeType::Api,
    ];

    /// 직렬화에 쓰이는 문자열 표현이다.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::Schedule => "schedule",
            NodeType::Email => "email",
            NodeType::Webhook => "webhook",
            NodeType::Database => "database",
            NodeType::Condition => "condition",
            NodeType::Notification => "notification",
            NodeType::Action => "action",
            NodeType::Document => "document",
            NodeType::User => "user",
            NodeType::Calculate => "calculate",
            NodeType::Filter => "filter",
            NodeType::Loop => "loop",
            NodeType::Approval => "approval",
            NodeType::Alert => "alert",
            NodeType::Api => "api",
            NodeType::Unknown(raw) => raw,
        }
    }

    /// 입력 핸들을 가지는지 여부이다. trigger는 그래프의 시작점이라 입력이 없다.
    pub fn has_input(&self) -> bool {
        !matches!(self, NodeType::Trigger)
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "trigger" => NodeType::Trigger,
            "schedule" => NodeType::Schedule,
            "email" => NodeType::Email,
            "webhook" => NodeType::Webhook,
            "database" => NodeType::Database,
            "condition" => NodeType::Condition,
            "notification" => NodeType::Notification,
            "action" => NodeType::Action,
            "document" => NodeType::Document,
            "user" => NodeType::User,
            "calculate" => NodeType::Calculate,
            "filter" => NodeType::Filter,
            "loop" => NodeType::Loop,
            "approval" => NodeType::Approval,
            "alert" => NodeType::Alert,
            "api" => NodeType::Api,
            _ => NodeType::Unknown(value),
        }
    }
}

impl From<NodeType> for String {
    fn from(value: NodeType) -> Self {
        match value {
            NodeType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 그래프 좌표계의 위치이다. 화면 픽셀이 아니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for Position {
    /// 위치가 생략된 노드는 캔버스 좌상단 근처에 놓인다.
    fn default() -> Self {
        Self::new(80.0, 80.0)
    }
}

impl From<Position> for egui::Pos2 {
    fn from(value: Position) -> Self {
        egui::pos2(value.x, value.y)
    }
}

impl From<egui::Pos2> for Position {
    fn from(value: egui::Pos2) -> Self {
        Self::new(value.x, value.y)
    }
}

fn position_or_default<'de, D>(deserializer: D) -> Result<Position, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Position>::deserialize(deserializer)?.unwrap_or_default())
}

/// 노드 유형별 설정 값 묶음이다. 삽입 순서와 미지의 키를 그대로 보존한다.
pub type NodeConfig = serde_yaml::Mapping;

/// 캔버스에 배치되는 워크플로 노드이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 그래프 안에서 고유한 ID.
    pub id: NodeId,
    /// 노드 유형. 에디터에서는 변경하지 않는다.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// 표시 이름.
    pub name: String,
    /// 그래프 좌표. 빠지거나 null이면 기본 위치이다.
    #[serde(default, deserialize_with = "position_or_default")]
    pub position: Position,
    /// 유형별 설정.
    #[serde(default)]
    pub config: NodeConfig,
}

impl Node {
    /// 기본 위치와 빈 설정으로 노드를 만든다.
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            name: name.into(),
            position: Position::default(),
            config: NodeConfig::new(),
        }
    }

    /// 위치를 지정한다.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Position::new(x, y);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_keeps_original_string() {
        let ty = NodeType::from("slack".to_string());
        assert_eq!(ty, NodeType::Unknown("slack".into()));
        assert_eq!(String::from(ty), "slack");
    }

    #[test]
    fn only_trigger_lacks_input() {
        for ty in NodeType::KNOWN {
            assert_eq!(ty.has_input(), ty != NodeType::Trigger, "{ty}");
        }
        assert!(NodeType::Unknown("x".into()).has_input());
    }

    #[test]
    fn missing_position_and_config_get_defaults() {
        let node: Node = serde_yaml::from_str("id: a\ntype: email\nname: 메일\n").unwrap();
        assert_eq!(node.position, Position::default());
        assert!(node.config.is_empty());
        assert_eq!(node.node_type, NodeType::Email);
    }

    #[test]
    fn null_position_falls_back_to_default() {
        let node: Node = serde_yaml::from_str("id: a\ntype: email\nname: 메일\nposition: null\n").unwrap();
        assert_eq!(node.position, Position::default());
        let placed: Node =
            serde_yaml::from_str("id: b\ntype: email\nname: b\nposition: {x: 5, y: -3}\n").unwrap();
        assert_eq!(placed.position, Position::new(5.0, -3.0));
    }

    #[test]
    fn extra_config_keys_survive_yaml() {
        let yaml = "id: w\ntype: webhook\nname: hook\nconfig:\n  url: http://x\n  retries: 3\n  custom:\n    nested: true\n";
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        let back: Node = serde_yaml::from_str(&serde_yaml::to_string(&node).unwrap()).unwrap();
        assert_eq!(node, back);
        let keys: Vec<_> = back.config.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, ["url", "retries", "custom"]);
    }
}
