//! 노드 유형별 아이콘/색상/설정 필드 스키마 레지스트리.

use eframe::egui::Color32;

use super::model::{NodeConfig, NodeType};
use super::properties::number_value;

/// 선택지 하나. `value`가 config에 저장되고 `label`이 화면에 보인다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// 필드 입력 방식이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    MultilineText,
    Choice {
        options: &'static [ChoiceOption],
        default: Option<&'static str>,
    },
    Number {
        default: Option<f64>,
    },
}

/// 다른 필드 값에 따라 필드를 보이게 하는 조건이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleWhen {
    pub key: &'static str,
    pub equals: &'static str,
}

/// config 키 하나에 대한 입력 필드 정의이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub visible_when: Option<VisibleWhen>,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            visible_when: None,
        }
    }

    const fn when(mut self, key: &'static str, equals: &'static str) -> Self {
        self.visible_when = Some(VisibleWhen { key, equals });
        self
    }
}

/// 유형 하나의 레지스트리 항목이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTypeEntry {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: Color32,
    pub fields: &'static [FieldSpec],
}

const fn choice(value: &'static str, label: &'static str) -> ChoiceOption {
    ChoiceOption { value, label }
}

const WEBHOOK_METHODS: &[ChoiceOption] = &[
    choice("GET", "GET"),
    choice("POST", "POST"),
    choice("PUT", "PUT"),
    choice("DELETE", "DELETE"),
];

const API_METHODS: &[ChoiceOption] = &[
    choice("GET", "GET"),
    choice("POST", "POST"),
    choice("PUT", "PUT"),
    choice("PATCH", "PATCH"),
    choice("DELETE", "DELETE"),
];

const SCHEDULE_TYPES: &[ChoiceOption] = &[choice("cron", "Cron 표현식"), choice("interval", "고정 간격")];

const CONDITION_TYPES: &[ChoiceOption] = &[
    choice("equals", "같음"),
    choice("notEquals", "같지 않음"),
    choice("greaterThan", "보다 큼"),
    choice("lessThan", "보다 작음"),
    choice("contains", "포함"),
];

const DB_OPERATIONS: &[ChoiceOption] = &[
    choice("create", "생성"),
    choice("read", "조회"),
    choice("update", "수정"),
    choice("delete", "삭제"),
];

const WEBHOOK_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("url", "URL", FieldKind::Text),
    FieldSpec::new(
        "method",
        "메서드",
        FieldKind::Choice {
            options: WEBHOOK_METHODS,
            default: Some("POST"),
        },
    ),
    FieldSpec::new("headers", "헤더 (JSON)", FieldKind::MultilineText),
];

const SCHEDULE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "scheduleType",
        "스케줄 유형",
        FieldKind::Choice {
            options: SCHEDULE_TYPES,
            default: None,
        },
    ),
    FieldSpec::new("cronExpression", "Cron 표현식", FieldKind::Text).when("scheduleType", "cron"),
    FieldSpec::new(
        "intervalMinutes",
        "간격 (분)",
        FieldKind::Number { default: Some(60.0) },
    )
    .when("scheduleType", "interval"),
];

const EMAIL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("to", "받는 사람", FieldKind::Text),
    FieldSpec::new("subject", "제목", FieldKind::Text),
    FieldSpec::new("body", "본문", FieldKind::MultilineText),
];

const API_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("endpoint", "엔드포인트", FieldKind::Text),
    FieldSpec::new(
        "method",
        "메서드",
        FieldKind::Choice {
            options: API_METHODS,
            default: Some("GET"),
        },
    ),
    FieldSpec::new("body", "요청 본문 (JSON)", FieldKind::MultilineText),
];

const CONDITION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "conditionType",
        "조건",
        FieldKind::Choice {
            options: CONDITION_TYPES,
            default: None,
        },
    ),
    FieldSpec::new("field", "필드", FieldKind::Text),
    FieldSpec::new("value", "값", FieldKind::Text),
];

const DATABASE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "operation",
        "작업",
        FieldKind::Choice {
            options: DB_OPERATIONS,
            default: None,
        },
    ),
    FieldSpec::new("entity", "엔티티", FieldKind::Text),
    FieldSpec::new("data", "데이터 (JSON)", FieldKind::MultilineText),
];

const DEFAULT_FIELDS: &[FieldSpec] = &[FieldSpec::new("description", "설명", FieldKind::MultilineText)];

/// 레지스트리에 없는 유형이 쓰는 기본 항목.
pub const DEFAULT_ENTRY: NodeTypeEntry = NodeTypeEntry {
    icon: "⬜",
    label: "노드",
    color: Color32::from_rgb(140, 140, 150),
    fields: DEFAULT_FIELDS,
};

const fn entry(
    icon: &'static str,
    label: &'static str,
    color: Color32,
    fields: &'static [FieldSpec],
) -> NodeTypeEntry {
    NodeTypeEntry {
        icon,
        label,
        color,
        fields,
    }
}

/// 노드 유형 → 표시 정보/필드 스키마 매핑이다.
pub struct NodeTypeRegistry;

impl NodeTypeRegistry {
    /// 유형에 해당하는 항목을 돌려준다. 알 수 없는 유형은 [`DEFAULT_ENTRY`]로 대체된다.
    pub fn entry(node_type: &NodeType) -> NodeTypeEntry {
        match node_type {
            NodeType::Trigger => entry("⚡", "트리거", Color32::from_rgb(245, 158, 11), DEFAULT_FIELDS),
            NodeType::Schedule => entry("⏰", "스케줄", Color32::from_rgb(59, 130, 246), SCHEDULE_FIELDS),
            NodeType::Email => entry("✉", "이메일", Color32::from_rgb(236, 72, 153), EMAIL_FIELDS),
            NodeType::Webhook => entry("🔗", "웹훅", Color32::from_rgb(139, 92, 246), WEBHOOK_FIELDS),
            NodeType::Database => entry("🗄", "데이터베이스", Color32::from_rgb(16, 185, 129), DATABASE_FIELDS),
            NodeType::Condition => entry("🔀", "조건", Color32::from_rgb(234, 179, 8), CONDITION_FIELDS),
            NodeType::Notification => entry("🔔", "알림", Color32::from_rgb(249, 115, 22), DEFAULT_FIELDS),
            NodeType::Action => entry("▶", "액션", Color32::from_rgb(34, 197, 94), DEFAULT_FIELDS),
            NodeType::Document => entry("📄", "문서", Color32::from_rgb(100, 116, 139), DEFAULT_FIELDS),
            NodeType::User => entry("👤", "사용자", Color32::from_rgb(14, 165, 233), DEFAULT_FIELDS),
            NodeType::Calculate => entry("🧮", "계산", Color32::from_rgb(168, 85, 247), DEFAULT_FIELDS),
            NodeType::Filter => entry("⛃", "필터", Color32::from_rgb(20, 184, 166), DEFAULT_FIELDS),
            NodeType::Loop => entry("🔁", "반복", Color32::from_rgb(99, 102, 241), DEFAULT_FIELDS),
            NodeType::Approval => entry("✅", "승인", Color32::from_rgb(132, 204, 22), DEFAULT_FIELDS),
            NodeType::Alert => entry("⚠", "경보", Color32::from_rgb(239, 68, 68), DEFAULT_FIELDS),
            NodeType::Api => entry("🌐", "API", Color32::from_rgb(6, 182, 212), API_FIELDS),
            NodeType::Unknown(_) => DEFAULT_ENTRY,
        }
    }

    /// 필드 스키마만 필요할 때 쓴다.
    pub fn fields(node_type: &NodeType) -> &'static [FieldSpec] {
        Self::entry(node_type).fields
    }

    /// 새 노드에 채워 넣을 기본 config. 기본값이 정의된 필드만 포함한다.
    pub fn default_config(node_type: &NodeType) -> NodeConfig {
        let mut config = NodeConfig::new();
        for field in Self::fields(node_type) {
            let value = match field.kind {
                FieldKind::Choice {
                    default: Some(default),
                    ..
                } => serde_yaml::Value::from(default),
                FieldKind::Number {
                    default: Some(default),
                } => number_value(default),
                _ => continue,
            };
            config.insert(field.key.into(), value);
        }
        config
    }
}
