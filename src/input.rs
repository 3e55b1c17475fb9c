use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::CursorMoved;

/// Pixel-unit wheel deltas are divided by this to match line units
const PIXELS_PER_SCROLL_LINE: f32 = 40.0;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorPos>()
            .add_message::<PointerEvent>()
            .add_message::<ScrollEvent>()
            .add_systems(
                Update,
                (track_cursor_pos, collect_pointer_events, collect_scroll_events).chain(),
            );
    }
}

#[derive(Message, Debug, Clone)]
pub struct PointerEvent {
    /// Window (logical) coordinates
    pub position: Vec2,
    pub event_type: PointerEventType,
    pub button: PointerButton,
    /// 0 = mouse, >0 = touch id
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    Down,
    Move,
    Up,
}

/// Left mouse / single touch orbits, right mouse pans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Wheel movement in lines; positive scrolls away from the user
#[derive(Message, Debug, Clone, Copy)]
pub struct ScrollEvent {
    pub lines: f32,
}

#[derive(Resource, Default, Debug, Clone, Copy)]
struct CursorPos(pub Option<Vec2>);

fn track_cursor_pos(mut ev_cursor: MessageReader<CursorMoved>, mut pos: ResMut<CursorPos>) {
    for e in ev_cursor.read() {
        // last event wins
        pos.0 = Some(e.position);
    }
}

fn collect_pointer_events(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorPos>,
    mut touch_events: MessageReader<TouchInput>,
    mut out: MessageWriter<PointerEvent>,
) {
    if let Some(p) = cursor.0 {
        for (mouse, button) in [
            (MouseButton::Left, PointerButton::Primary),
            (MouseButton::Right, PointerButton::Secondary),
        ] {
            let event_type = if mouse_buttons.just_pressed(mouse) {
                Some(PointerEventType::Down)
            } else if mouse_buttons.just_released(mouse) {
                Some(PointerEventType::Up)
            } else if mouse_buttons.pressed(mouse) {
                Some(PointerEventType::Move)
            } else {
                None
            };

            if let Some(event_type) = event_type {
                out.write(PointerEvent {
                    position: p,
                    event_type,
                    button,
                    id: 0,
                });
            }
        }
    }

    for ev in touch_events.read() {
        let event_type = match ev.phase {
            TouchPhase::Started => PointerEventType::Down,
            TouchPhase::Moved => PointerEventType::Move,
            TouchPhase::Ended | TouchPhase::Canceled => PointerEventType::Up,
        };
        out.write(PointerEvent {
            position: ev.position,
            event_type,
            button: PointerButton::Primary,
            id: ev.id + 1,
        });
    }
}

fn collect_scroll_events(mut wheel: MessageReader<MouseWheel>, mut out: MessageWriter<ScrollEvent>) {
    for ev in wheel.read() {
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_SCROLL_LINE,
        };
        if lines != 0.0 {
            out.write(ScrollEvent { lines });
        }
    }
}
