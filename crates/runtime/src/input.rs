use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// User input in surface pixel coordinates.
///
/// `Resize` carries the viewport size; the canvas size is derived from it by
/// the active sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { delta_y: f64 },
    Resize { width: f64, height: f64 },
}

impl InputEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::PointerDown { .. } => "pointer_down",
            InputEvent::PointerMove { .. } => "pointer_move",
            InputEvent::PointerUp => "pointer_up",
            InputEvent::Wheel { .. } => "wheel",
            InputEvent::Resize { .. } => "resize",
        }
    }
}

/// FIFO of pending input events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

impl Extend<InputEvent> for EventQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::{EventQueue, InputEvent};
    use pretty_assertions::assert_eq;

    #[test]
    fn drains_in_arrival_order() {
        let mut queue = EventQueue::new();
        queue.push(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        queue.push(InputEvent::PointerUp);
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                InputEvent::PointerDown { x: 1.0, y: 2.0 },
                InputEvent::PointerUp,
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn events_use_tagged_json() {
        let json = serde_json::to_string(&InputEvent::Wheel { delta_y: -3.0 }).unwrap();
        assert_eq!(json, r#"{"type":"wheel","delta_y":-3.0}"#);

        let script: Vec<InputEvent> = serde_json::from_str(
            r#"[{"type":"pointer_down","x":10,"y":20},{"type":"pointer_up"},
                {"type":"resize","width":640,"height":480}]"#,
        )
        .unwrap();
        assert_eq!(script[0].kind(), "pointer_down");
        assert_eq!(
            script[2],
            InputEvent::Resize {
                width: 640.0,
                height: 480.0
            }
        );
    }
}
