//! 두 끝점 사이의 연결 곡선 계산. 특정 노드와 무관한 순수 함수만 둔다.

use eframe::egui;

/// 수평 거리 대비 제어점 오프셋 비율.
pub const CONTROL_FACTOR: f32 = 0.5;
/// 제어점 오프셋 상한. 긴 연결이 과하게 휘지 않도록 한다.
pub const MAX_CONTROL_OFFSET: f32 = 150.0;

/// 3차 베지어로 표현한 연결 경로이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPath {
    pub start: egui::Pos2,
    pub control1: egui::Pos2,
    pub control2: egui::Pos2,
    pub end: egui::Pos2,
}

/// 제어점의 수평 오프셋 `min(|dx| * 0.5, 150)`.
pub fn control_offset(from: egui::Pos2, to: egui::Pos2) -> f32 {
    ((to.x - from.x).abs() * CONTROL_FACTOR).min(MAX_CONTROL_OFFSET)
}

/// `from`의 오른쪽, `to`의 왼쪽으로 제어점을 둔 곡선을 만든다.
pub fn curve(from: egui::Pos2, to: egui::Pos2) -> ConnectionPath {
    let offset = control_offset(from, to);
    ConnectionPath {
        start: from,
        control1: from + egui::vec2(offset, 0.0),
        control2: to - egui::vec2(offset, 0.0),
        end: to,
    }
}

/// 삭제 버튼 위치. 곡선의 실제 중점이 아닌 두 끝점의 산술 평균이다.
pub fn midpoint(from: egui::Pos2, to: egui::Pos2) -> egui::Pos2 {
    egui::pos2((from.x + to.x) / 2.0, (from.y + to.y) / 2.0)
}

impl ConnectionPath {
    pub fn points(&self) -> [egui::Pos2; 4] {
        [self.start, self.control1, self.control2, self.end]
    }

    /// 각 점에 같은 변환을 적용한다. 아핀 변환이면 곡선 자체를 옮긴 것과 같다.
    pub fn map(&self, f: impl Fn(egui::Pos2) -> egui::Pos2) -> Self {
        Self {
            start: f(self.start),
            control1: f(self.control1),
            control2: f(self.control2),
            end: f(self.end),
        }
    }

    /// 매개변수 t에서의 곡선 위 점.
    pub fn point_at(&self, t: f32) -> egui::Pos2 {
        let u = 1.0 - t;
        let p = self.start.to_vec2() * (u * u * u)
            + self.control1.to_vec2() * (3.0 * u * u * t)
            + self.control2.to_vec2() * (3.0 * u * t * t)
            + self.end.to_vec2() * (t * t * t);
        p.to_pos2()
    }

    /// 곡선을 `segments`개의 선분으로 근사한 점 목록.
    pub fn sample(&self, segments: usize) -> Vec<egui::Pos2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// 점에서 곡선까지의 근사 거리. hover 판정에 쓴다.
    pub fn distance_to(&self, point: egui::Pos2, segments: usize) -> f32 {
        self.sample(segments)
            .windows(2)
            .map(|seg| distance_to_segment(point, seg[0], seg[1]))
            .fold(f32::INFINITY, f32::min)
    }

    /// 끝점에 도달하는 방향의 단위 벡터. 화살촉 방향으로 쓴다.
    pub fn end_direction(&self) -> egui::Vec2 {
        let dir = self.end - self.control2;
        if dir.length_sq() > f32::EPSILON {
            dir.normalized()
        } else {
            (self.end - self.start).normalized()
        }
    }
}

fn distance_to_segment(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
