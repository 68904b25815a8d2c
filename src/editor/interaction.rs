//! 노드 포인터 상호작용 상태 기계(idle / dragging / connecting).
//!
//! 뷰는 egui 입력을 [`PointerEvent`]로 바꿔 넘기고, 컨트롤러는 그 결과를
//! [`CanvasCallbacks`]로만 내보낸다. 그래프 데이터는 건드리지 않는다.

use std::collections::BTreeSet;

use eframe::egui;
use tracing::{debug, info};

use super::model::{CanvasCallbacks, GraphSnapshot, NodeId};
use super::viewport::ScreenFrame;

/// 포인터가 눌린 대상이다. 뷰의 hit-test 결과이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// 빈 캔버스 배경.
    Background,
    /// 핸들이 아닌 노드 본문.
    NodeBody(NodeId),
    /// 노드 왼쪽의 입력 핸들. trigger 노드에는 존재하지 않는다.
    InputHandle(NodeId),
    /// 노드 오른쪽의 출력 핸들.
    OutputHandle(NodeId),
}

/// 상태 기계에 들어가는 입력이다. 좌표는 모두 화면 좌표이다.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down {
        target: PointerTarget,
        screen: egui::Pos2,
    },
    Move {
        screen: egui::Pos2,
    },
    Up {
        screen: egui::Pos2,
    },
    /// Escape 키나 창 포커스 상실처럼 제스처를 강제로 끝내는 신호.
    Cancel,
}

/// 창 단위 포인터 리스너 등록 핸들. 복제할 수 없어 한 번만 해제된다.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct ListenerHandle(u64);

/// 노드 영역 밖에서도 move/up을 받기 위한 창 단위 리스너 범위이다.
pub trait PointerScope {
    fn attach(&mut self) -> ListenerHandle;
    fn detach(&mut self, handle: ListenerHandle);
}

/// egui 창 전체의 포인터 입력을 구독하는 범위이다.
///
/// 등록된 리스너가 있는 동안 뷰는 hover 여부와 상관없이 창의 포인터
/// 이동/해제를 상태 기계로 전달한다.
#[derive(Debug, Default)]
pub struct WindowPointerScope {
    next: u64,
    active: BTreeSet<u64>,
}

impl WindowPointerScope {
    pub fn is_listening(&self) -> bool {
        !self.active.is_empty()
    }
}

impl PointerScope for WindowPointerScope {
    fn attach(&mut self) -> ListenerHandle {
        self.next += 1;
        self.active.insert(self.next);
        ListenerHandle(self.next)
    }

    fn detach(&mut self, handle: ListenerHandle) {
        self.active.remove(&handle.0);
    }
}

/// 한 번의 드래그 제스처(press → move… → release) 수명이다.
///
/// 리스너 해제는 [`GestureSession::end`]에서만 일어난다.
#[derive(Debug, PartialEq)]
pub struct GestureSession {
    node_id: NodeId,
    /// 그래프 좌표에서 `포인터 - 노드 위치`. 드래그 중 노드가 튀지 않게 한다.
    offset: egui::Vec2,
    listener: ListenerHandle,
}

impl GestureSession {
    fn begin(scope: &mut impl PointerScope, node_id: NodeId, offset: egui::Vec2) -> Self {
        Self {
            node_id,
            offset,
            listener: scope.attach(),
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn offset(&self) -> egui::Vec2 {
        self.offset
    }

    fn end(self, scope: &mut impl PointerScope) {
        scope.detach(self.listener);
    }
}

/// 상호작용 상태이다.
#[derive(Debug, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(GestureSession),
    Connecting {
        source: NodeId,
    },
}

/// 노드 선택과 드래그, 연결 제스처를 처리하는 컨트롤러이다.
#[derive(Debug, Default)]
pub struct NodeInteractionController {
    state: InteractionState,
    selected: Option<NodeId>,
}

impl NodeInteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// 연결 중이면 출발 노드 ID.
    pub fn connecting_from(&self) -> Option<&NodeId> {
        match &self.state {
            InteractionState::Connecting { source } => Some(source),
            _ => None,
        }
    }

    /// 드래그 중인 노드인지 확인한다.
    pub fn is_dragging(&self, id: &NodeId) -> bool {
        matches!(&self.state, InteractionState::Dragging(session) if session.node_id() == id)
    }

    /// 선택을 바꾸고 호스트에 알린다. 선택은 항상 최대 하나이다.
    pub fn select<C: CanvasCallbacks + ?Sized>(&mut self, id: Option<NodeId>, callbacks: &mut C) {
        callbacks.on_node_select(id.as_ref());
        self.selected = id;
    }

    /// 입력 이벤트 하나를 처리한다.
    pub fn handle<S, C>(
        &mut self,
        event: PointerEvent,
        graph: GraphSnapshot<'_>,
        frame: ScreenFrame,
        scope: &mut S,
        callbacks: &mut C,
    ) where
        S: PointerScope,
        C: CanvasCallbacks + ?Sized,
    {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => self.on_idle(event, graph, frame, scope, callbacks),
            InteractionState::Dragging(session) => match event {
                PointerEvent::Move { screen } => {
                    if graph.node(session.node_id()).is_none() {
                        debug!(node = %session.node_id(), "드래그 중 노드가 사라져 제스처를 종료");
                        session.end(scope);
                        return;
                    }
                    let pointer: egui::Pos2 = frame.to_graph(screen).into();
                    callbacks.on_node_move(session.node_id(), (pointer - session.offset()).into());
                    self.state = InteractionState::Dragging(session);
                }
                PointerEvent::Up { .. } | PointerEvent::Cancel => {
                    debug!(node = %session.node_id(), "드래그 종료");
                    session.end(scope);
                }
                down @ PointerEvent::Down { .. } => {
                    // 해제 이벤트를 놓친 경우: 이전 세션을 정리하고 새 입력으로 처리한다.
                    session.end(scope);
                    self.on_idle(down, graph, frame, scope, callbacks);
                }
            },
            InteractionState::Connecting { source } => {
                self.on_connecting(source, event, graph, frame, scope, callbacks)
            }
        }
    }

    fn on_idle<S, C>(
        &mut self,
        event: PointerEvent,
        graph: GraphSnapshot<'_>,
        frame: ScreenFrame,
        scope: &mut S,
        callbacks: &mut C,
    ) where
        S: PointerScope,
        C: CanvasCallbacks + ?Sized,
    {
        let PointerEvent::Down { target, screen } = event else {
            return;
        };
        match target {
            PointerTarget::Background => self.select(None, callbacks),
            PointerTarget::NodeBody(id) => {
                let Some(node) = graph.node(&id) else {
                    return;
                };
                let pointer: egui::Pos2 = frame.to_graph(screen).into();
                let offset = pointer - egui::Pos2::from(node.position);
                debug!(node = %id, "드래그 시작");
                self.state = InteractionState::Dragging(GestureSession::begin(scope, id.clone(), offset));
                self.select(Some(id), callbacks);
            }
            PointerTarget::OutputHandle(id) => {
                if graph.node(&id).is_none() {
                    return;
                }
                debug!(node = %id, "연결 시작");
                callbacks.on_connect(&id, None);
                self.state = InteractionState::Connecting { source: id };
            }
            PointerTarget::InputHandle(_) => {}
        }
    }

    fn on_connecting<S, C>(
        &mut self,
        source: NodeId,
        event: PointerEvent,
        graph: GraphSnapshot<'_>,
        frame: ScreenFrame,
        scope: &mut S,
        callbacks: &mut C,
    ) where
        S: PointerScope,
        C: CanvasCallbacks + ?Sized,
    {
        match event {
            PointerEvent::Down { target, screen } => match target {
                PointerTarget::InputHandle(target) => {
                    match graph.validate_connection(&source, &target) {
                        Ok(()) => {
                            info!(from = %source, to = %target, "연결 요청");
                            callbacks.on_connect(&source, Some(&target));
                        }
                        Err(reason) => debug!(%reason, "연결 제스처 무시"),
                    }
                }
                PointerTarget::Background => debug!(from = %source, "연결 취소"),
                PointerTarget::NodeBody(ref id) | PointerTarget::OutputHandle(ref id)
                    if *id == source =>
                {
                    debug!(from = %source, "연결 취소");
                }
                PointerTarget::OutputHandle(other) => {
                    if graph.node(&other).is_some() {
                        debug!(from = %other, "연결 출발점 변경");
                        callbacks.on_connect(&other, None);
                        self.state = InteractionState::Connecting { source: other };
                    }
                }
                body @ PointerTarget::NodeBody(_) => {
                    debug!(from = %source, "다른 노드를 눌러 연결 취소");
                    self.on_idle(
                        PointerEvent::Down {
                            target: body,
                            screen,
                        },
                        graph,
                        frame,
                        scope,
                        callbacks,
                    );
                }
            },
            PointerEvent::Cancel => debug!(from = %source, "연결 취소"),
            PointerEvent::Move { .. } | PointerEvent::Up { .. } => {
                self.state = InteractionState::Connecting { source };
            }
        }
    }

    /// 호스트가 새 스냅샷을 넘긴 뒤 사라진 노드를 가리키는 상태를 정리한다.
    pub fn sync<S, C>(&mut self, graph: GraphSnapshot<'_>, scope: &mut S, callbacks: &mut C)
    where
        S: PointerScope,
        C: CanvasCallbacks + ?Sized,
    {
        if let Some(selected) = &self.selected {
            if graph.node(selected).is_none() {
                self.select(None, callbacks);
            }
        }
        match std::mem::take(&mut self.state) {
            InteractionState::Dragging(session) if graph.node(session.node_id()).is_none() => {
                session.end(scope);
            }
            InteractionState::Connecting { source } if graph.node(&source).is_none() => {}
            other => self.state = other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::model::{CanvasIntent, Connection, Node, NodeType, Position};
    use crate::editor::viewport::Viewport;

    /// 등록/해제 횟수를 세는 테스트용 범위이다.
    #[derive(Default)]
    struct CountingScope {
        inner: WindowPointerScope,
        attached: usize,
        detached: usize,
    }

    impl PointerScope for CountingScope {
        fn attach(&mut self) -> ListenerHandle {
            self.attached += 1;
            self.inner.attach()
        }

        fn detach(&mut self, handle: ListenerHandle) {
            self.detached += 1;
            self.inner.detach(handle);
        }
    }

    struct Harness {
        nodes: Vec<Node>,
        connections: Vec<Connection>,
        controller: NodeInteractionController,
        scope: CountingScope,
        intents: Vec<CanvasIntent>,
        frame: ScreenFrame,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                nodes: vec![
                    Node::new("a", NodeType::Trigger, "A").at(0.0, 0.0),
                    Node::new("b", NodeType::Email, "B").at(300.0, 0.0),
                    Node::new("c", NodeType::Webhook, "C").at(300.0, 200.0),
                ],
                connections: Vec::new(),
                controller: NodeInteractionController::new(),
                scope: CountingScope::default(),
                intents: Vec::new(),
                frame: Viewport::new().frame(egui::Pos2::ZERO),
            }
        }

        fn send(&mut self, event: PointerEvent) {
            let graph = GraphSnapshot::new(&self.nodes, &self.connections);
            self.controller
                .handle(event, graph, self.frame, &mut self.scope, &mut self.intents);
        }

        fn down(&mut self, target: PointerTarget, x: f32, y: f32) {
            self.send(PointerEvent::Down {
                target,
                screen: egui::pos2(x, y),
            });
        }

        /// 호스트 역할: 수락된 연결 요청을 배열에 반영한다.
        fn apply_connections(&mut self) {
            for intent in &self.intents {
                if let CanvasIntent::Connect { from, to: Some(to) } = intent {
                    let graph = GraphSnapshot::new(&self.nodes, &self.connections);
                    if graph.validate_connection(from, to).is_ok() {
                        self.connections.push(Connection::new(from.clone(), to.clone()));
                    }
                }
            }
        }
    }

    fn id(raw: &str) -> NodeId {
        NodeId::from(raw)
    }

    #[test]
    fn drag_keeps_pointer_offset_and_selects() {
        let mut h = Harness::new();
        h.down(PointerTarget::NodeBody(id("b")), 310.0, 20.0);
        assert!(h.controller.is_dragging(&id("b")));
        assert_eq!(h.controller.selected_node_id(), Some(&id("b")));
        h.send(PointerEvent::Move {
            screen: egui::pos2(360.0, 70.0),
        });
        h.send(PointerEvent::Up {
            screen: egui::pos2(360.0, 70.0),
        });
        assert_eq!(
            h.intents,
            vec![
                CanvasIntent::SelectNode(Some(id("b"))),
                CanvasIntent::MoveNode {
                    id: id("b"),
                    position: Position::new(350.0, 50.0),
                },
            ]
        );
        assert_eq!(h.controller.state(), &InteractionState::Idle);
    }

    #[test]
    fn drag_offset_uses_graph_space_under_zoom() {
        let mut h = Harness::new();
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        viewport.pan_by(egui::vec2(10.0, 10.0));
        h.frame = viewport.frame(egui::Pos2::ZERO);
        // 노드 b(300,0)의 화면 위치는 (610, 10)
        h.down(PointerTarget::NodeBody(id("b")), 630.0, 30.0);
        h.send(PointerEvent::Move {
            screen: egui::pos2(650.0, 30.0),
        });
        assert_eq!(
            h.intents.last(),
            Some(&CanvasIntent::MoveNode {
                id: id("b"),
                position: Position::new(310.0, 0.0),
            })
        );
    }

    #[test]
    fn listeners_are_released_on_every_exit_path() {
        let mut h = Harness::new();
        for _ in 0..5 {
            h.down(PointerTarget::NodeBody(id("a")), 5.0, 5.0);
            h.send(PointerEvent::Up {
                screen: egui::pos2(-500.0, -500.0),
            });
        }
        h.down(PointerTarget::NodeBody(id("a")), 5.0, 5.0);
        h.send(PointerEvent::Cancel);
        h.down(PointerTarget::NodeBody(id("a")), 5.0, 5.0);
        // 해제가 누락된 채 새 press가 들어와도 이전 세션은 정리된다.
        h.down(PointerTarget::NodeBody(id("b")), 305.0, 5.0);
        h.send(PointerEvent::Up {
            screen: egui::pos2(0.0, 0.0),
        });
        assert_eq!(h.scope.attached, 8);
        assert_eq!(h.scope.detached, 8);
        assert!(!h.scope.inner.is_listening());
    }

    #[test]
    fn trigger_to_email_creates_one_connection() {
        let mut h = Harness::new();
        h.down(PointerTarget::OutputHandle(id("a")), 200.0, 36.0);
        assert_eq!(h.controller.connecting_from(), Some(&id("a")));
        h.down(PointerTarget::InputHandle(id("b")), 300.0, 36.0);
        h.apply_connections();
        assert_eq!(h.connections, vec![Connection::new("a", "b")]);
        assert_eq!(h.controller.state(), &InteractionState::Idle);
        assert_eq!(
            h.intents,
            vec![
                CanvasIntent::Connect {
                    from: id("a"),
                    to: None
                },
                CanvasIntent::Connect {
                    from: id("a"),
                    to: Some(id("b"))
                },
            ]
        );
    }

    #[test]
    fn self_connection_is_never_requested() {
        let mut h = Harness::new();
        h.down(PointerTarget::OutputHandle(id("b")), 0.0, 0.0);
        h.down(PointerTarget::InputHandle(id("b")), 0.0, 0.0);
        h.down(PointerTarget::OutputHandle(id("c")), 0.0, 0.0);
        h.down(PointerTarget::NodeBody(id("c")), 0.0, 0.0);
        h.apply_connections();
        assert!(h.connections.is_empty());
        assert!(h.intents.iter().all(|intent| !matches!(
            intent,
            CanvasIntent::Connect { from, to: Some(to) } if from == to
        )));
        assert_eq!(h.controller.state(), &InteractionState::Idle);
    }

    #[test]
    fn trigger_never_becomes_a_target() {
        let mut h = Harness::new();
        let targets = [
            PointerTarget::InputHandle(id("a")),
            PointerTarget::NodeBody(id("a")),
            PointerTarget::OutputHandle(id("a")),
            PointerTarget::Background,
        ];
        for source in ["b", "c"] {
            for target in targets.iter().cloned() {
                h.down(PointerTarget::OutputHandle(id(source)), 0.0, 0.0);
                h.down(target, 0.0, 0.0);
                h.send(PointerEvent::Up {
                    screen: egui::Pos2::ZERO,
                });
                h.send(PointerEvent::Cancel);
            }
        }
        h.apply_connections();
        assert!(h.connections.iter().all(|c| c.to != id("a")));
    }

    #[test]
    fn background_cancels_connecting_without_clearing_selection() {
        let mut h = Harness::new();
        h.down(PointerTarget::NodeBody(id("b")), 300.0, 0.0);
        h.send(PointerEvent::Up {
            screen: egui::pos2(300.0, 0.0),
        });
        h.down(PointerTarget::OutputHandle(id("b")), 0.0, 0.0);
        h.down(PointerTarget::Background, 0.0, 0.0);
        assert_eq!(h.controller.state(), &InteractionState::Idle);
        assert_eq!(h.controller.selected_node_id(), Some(&id("b")));
        h.down(PointerTarget::Background, 0.0, 0.0);
        assert_eq!(h.controller.selected_node_id(), None);
        assert_eq!(h.intents.last(), Some(&CanvasIntent::SelectNode(None)));
    }

    #[test]
    fn escape_cancels_connecting() {
        let mut h = Harness::new();
        h.down(PointerTarget::OutputHandle(id("b")), 0.0, 0.0);
        h.send(PointerEvent::Move {
            screen: egui::pos2(50.0, 50.0),
        });
        assert_eq!(h.controller.connecting_from(), Some(&id("b")));
        h.send(PointerEvent::Cancel);
        assert_eq!(h.controller.connecting_from(), None);
    }

    #[test]
    fn other_output_handle_resources_connection() {
        let mut h = Harness::new();
        h.down(PointerTarget::OutputHandle(id("a")), 0.0, 0.0);
        h.down(PointerTarget::OutputHandle(id("b")), 0.0, 0.0);
        h.down(PointerTarget::InputHandle(id("c")), 0.0, 0.0);
        h.apply_connections();
        assert_eq!(h.connections, vec![Connection::new("b", "c")]);
    }

    #[test]
    fn selection_is_exclusive() {
        let mut h = Harness::new();
        for target in ["a", "b", "c", "b"] {
            h.down(PointerTarget::NodeBody(id(target)), 0.0, 0.0);
            h.send(PointerEvent::Up {
                screen: egui::Pos2::ZERO,
            });
            assert_eq!(h.controller.selected_node_id(), Some(&id(target)));
        }
    }

    #[test]
    fn sync_drops_state_for_removed_nodes() {
        let mut h = Harness::new();
        h.down(PointerTarget::NodeBody(id("c")), 300.0, 200.0);
        h.nodes.retain(|n| n.id != id("c"));
        let graph = GraphSnapshot::new(&h.nodes, &h.connections);
        h.controller.sync(graph, &mut h.scope, &mut h.intents);
        assert_eq!(h.controller.state(), &InteractionState::Idle);
        assert_eq!(h.controller.selected_node_id(), None);
        assert_eq!(h.scope.detached, 1);
    }

    #[test]
    fn window_scope_listens_until_gesture_ends() {
        let mut h = Harness::new();
        assert!(!h.scope.inner.is_listening());
        h.down(PointerTarget::NodeBody(id("b")), 310.0, 10.0);
        assert!(h.scope.inner.is_listening());
        h.send(PointerEvent::Up {
            screen: egui::pos2(900.0, 900.0),
        });
        assert!(!h.scope.inner.is_listening());
    }
}
