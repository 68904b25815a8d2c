//! 선택된 노드의 유형별 설정을 편집하는 속성 패널 로직.
//!
//! JSON처럼 보이는 텍스트(헤더, 본문, 데이터)는 파싱하지 않고 문자열 그대로 둔다.

use std::collections::HashMap;

use serde_yaml::Value;

use super::model::{Node, NodeConfig, NodeId, NodePatch};
use super::registry::{FieldKind, FieldSpec};

/// 정수로 떨어지는 숫자는 정수로 저장해 파일이 `60.0` 대신 `60`이 되도록 한다.
pub fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::from(number as i64)
    } else {
        Value::from(number)
    }
}

/// 조건부 필드가 현재 config에서 보이는지 판정한다.
pub fn is_visible(field: &FieldSpec, config: &NodeConfig) -> bool {
    match field.visible_when {
        Some(cond) => config.get(cond.key).and_then(Value::as_str) == Some(cond.equals),
        None => true,
    }
}

/// 현재 보이는 필드만 스키마 순서대로 돌려준다.
pub fn visible_fields<'a>(
    fields: &'a [FieldSpec],
    config: &'a NodeConfig,
) -> impl Iterator<Item = &'a FieldSpec> + 'a {
    fields.iter().filter(move |field| is_visible(field, config))
}

/// 텍스트 입력에 표시할 값. 값이 없으면 빈 문자열이다.
pub fn text_value(config: &NodeConfig, key: &str) -> String {
    match config.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// 선택 필드의 현재 값. 저장된 값이 없으면 스키마 기본값이다.
pub fn choice_value(config: &NodeConfig, field: &FieldSpec) -> Option<String> {
    match config.get(field.key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => match field.kind {
            FieldKind::Choice { default, .. } => default.map(str::to_string),
            _ => None,
        },
    }
}

/// 숫자 필드의 현재 값. 저장된 값이 숫자가 아니면 기본값이다.
pub fn number_field_value(config: &NodeConfig, field: &FieldSpec) -> Option<f64> {
    config.get(field.key).and_then(Value::as_f64).or(match field.kind {
        FieldKind::Number { default } => default,
        _ => None,
    })
}

/// 키 하나만 교체한 새 config를 만든다. 나머지 키와 순서는 그대로이다.
pub fn update_config(config: &NodeConfig, key: &str, value: Value) -> NodeConfig {
    let mut next = config.clone();
    next.insert(Value::from(key), value);
    next
}

/// 호스트 쪽에서 패치를 노드에 적용한다.
pub fn apply_patch(node: &mut Node, patch: NodePatch) {
    match patch {
        NodePatch::Rename(name) => node.name = name,
        NodePatch::SetConfig { key, value } => node.config = update_config(&node.config, &key, value),
    }
}

/// 속성 패널의 입력 버퍼이다. 선택이 바뀌면 비운다.
#[derive(Debug, Default)]
pub struct PropertyEditorState {
    node_id: Option<NodeId>,
    number_buffers: HashMap<String, String>,
}

impl PropertyEditorState {
    /// 현재 편집 대상 노드를 지정한다.
    pub fn bind(&mut self, id: Option<&NodeId>) {
        if self.node_id.as_ref() != id {
            self.node_id = id.cloned();
            self.number_buffers.clear();
        }
    }

    /// 숫자 필드의 편집 버퍼. 처음 접근하면 현재 값으로 채운다.
    pub fn number_buffer(&mut self, key: &str, current: Option<f64>) -> &mut String {
        self.number_buffers
            .entry(key.to_string())
            .or_insert_with(|| current.map(|n| text_of(&number_value(n))).unwrap_or_default())
    }

    /// 버퍼 내용이 숫자로 해석될 때만 config 패치를 만든다.
    pub fn parse_number(&self, key: &str) -> Option<NodePatch> {
        let raw = self.number_buffers.get(key)?;
        let number: f64 = raw.trim().parse().ok()?;
        number.is_finite().then(|| NodePatch::SetConfig {
            key: key.to_string(),
            value: number_value(number),
        })
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
