use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use sandcastle_geom::Vec3;
use sandcastle_session::{OperationMode, PointerSample, SessionEvent};
use sandcastle_shapes::{DecorationKind, ShapeId};

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_tick() -> f32 {
    1.0 / 60.0
}

/// One scripted tick.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Step {
    /// Pointer sample; no `position` means the pick missed.
    Pointer {
        #[serde(default)]
        position: Option<[f32; 3]>,
        #[serde(default = "default_up")]
        normal: [f32; 3],
    },
    Begin {
        position: [f32; 3],
        #[serde(default = "default_up")]
        normal: [f32; 3],
    },
    Drag {
        position: [f32; 3],
        #[serde(default = "default_up")]
        normal: [f32; 3],
    },
    Commit,
    Undo,
    Redo,
    Reset,
    Mode {
        mode: OperationMode,
    },
    Shape {
        shape: ShapeId,
    },
    Decoration {
        decoration: DecorationKind,
    },
    Rotate {
        degrees: f32,
    },
    Wait {
        secs: f32,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    /// Clock advance applied before every step.
    #[serde(default = "default_tick")]
    pub tick_secs: f32,
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let script: Script = toml::from_str(s)?;
        Ok(script)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

fn sample(position: [f32; 3], normal: [f32; 3]) -> PointerSample {
    PointerSample::new(Vec3::from_array(position), Vec3::from_array(normal))
}

/// Tracks the press anchor so drags can report where they started.
#[derive(Default, Debug)]
pub struct Translator {
    anchor: Option<PointerSample>,
}

impl Translator {
    /// Session event for `step`, or `None` for steps that only move the clock.
    pub fn event(&mut self, step: &Step) -> Option<SessionEvent> {
        Some(match *step {
            Step::Pointer { position, normal } => {
                SessionEvent::PointerMoved(position.map(|p| sample(p, normal)))
            }
            Step::Begin { position, normal } => {
                let anchor = sample(position, normal);
                self.anchor = Some(anchor);
                SessionEvent::BeginPlacement { anchor }
            }
            Step::Drag { position, normal } => {
                let current = sample(position, normal);
                SessionEvent::Drag {
                    anchor: self.anchor.unwrap_or(current),
                    current,
                }
            }
            Step::Commit => {
                self.anchor = None;
                SessionEvent::CommitOnRelease
            }
            Step::Undo => SessionEvent::Undo,
            Step::Redo => SessionEvent::Redo,
            Step::Reset => SessionEvent::ResetZone,
            Step::Mode { mode } => SessionEvent::SetMode(mode),
            Step::Shape { shape } => SessionEvent::SetShapeType(shape),
            Step::Decoration { decoration } => SessionEvent::SetDecoration(decoration),
            Step::Rotate { degrees } => SessionEvent::RotateCandidate { degrees },
            Step::Wait { .. } => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let script = Script::from_toml_str(
            r#"
            tick_secs = 0.1

            [[step]]
            event = "pointer"
            position = [5.5, 0.0, 5.5]

            [[step]]
            event = "pointer"

            [[step]]
            event = "begin"
            position = [1.5, 0.0, 1.5]
            normal = [1.0, 0.0, 0.0]

            [[step]]
            event = "drag"
            position = [2.5, 0.0, 1.5]

            [[step]]
            event = "commit"

            [[step]]
            event = "undo"

            [[step]]
            event = "redo"

            [[step]]
            event = "reset"

            [[step]]
            event = "mode"
            mode = "subtract"

            [[step]]
            event = "shape"
            shape = "sphere_3x3"

            [[step]]
            event = "decoration"
            decoration = "seaweed"

            [[step]]
            event = "rotate"
            degrees = 90.0

            [[step]]
            event = "wait"
            secs = 0.5
        "#,
        )
        .unwrap();
        assert_eq!(script.tick_secs, 0.1);
        assert_eq!(script.steps.len(), 13);
        assert_eq!(
            script.steps[1],
            Step::Pointer {
                position: None,
                normal: [0.0, 1.0, 0.0]
            }
        );
        assert_eq!(
            script.steps[9],
            Step::Shape {
                shape: ShapeId::Sphere3x3
            }
        );
    }

    #[test]
    fn unknown_events_are_errors() {
        let err = Script::from_toml_str(
            r#"
            [[step]]
            event = "explode"
        "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn drag_reports_press_anchor() {
        let mut t = Translator::default();
        let begin = Step::Begin {
            position: [1.5, 0.0, 1.5],
            normal: default_up(),
        };
        let drag = Step::Drag {
            position: [3.5, 0.0, 1.5],
            normal: default_up(),
        };
        t.event(&begin);
        match t.event(&drag) {
            Some(SessionEvent::Drag { anchor, current }) => {
                assert_eq!(anchor.position, Vec3::new(1.5, 0.0, 1.5));
                assert_eq!(current.position, Vec3::new(3.5, 0.0, 1.5));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(t.event(&Step::Wait { secs: 1.0 }), None);
    }
}
