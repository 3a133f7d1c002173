//! Input aggregation
//!
//! Folds keyboard, pointer and gamepad channels into one [`InputFrame`] per
//! simulation frame. The host forwards raw device events; gamepads are polled.

/// Analog stick dead zone
pub const AXIS_DEAD_ZONE: f32 = 0.25;

/// How the vehicle is steered this frame. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    /// Held directions accelerate the vehicle
    Discrete { left: bool, right: bool },
    /// The vehicle eases toward a world-space x
    Drag { target_x: f32 },
}

/// Per-frame input snapshot handed to the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub pointer_active: bool,
    /// World-space pointer x; only meaningful while `pointer_active`
    pub pointer_x: Option<f32>,
}

impl InputFrame {
    /// Resolve the frame into a single steering mode. An active drag with a known
    /// position overrides the discrete directions.
    pub fn mode(&self) -> InputMode {
        match (self.pointer_active, self.pointer_x) {
            (true, Some(target_x)) => InputMode::Drag { target_x },
            _ => InputMode::Discrete {
                left: self.left,
                right: self.right,
            },
        }
    }

    pub fn drag(target_x: f32) -> Self {
        Self {
            pointer_active: true,
            pointer_x: Some(target_x),
            ..Default::default()
        }
    }
}

/// Live state of one gamepad, as polled from the platform
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadState {
    /// Horizontal axis of the left stick, -1.0 (left) to 1.0 (right)
    pub axis_x: f32,
    pub dpad_left: bool,
    pub dpad_right: bool,
}

impl GamepadState {
    pub fn left(&self) -> bool {
        self.dpad_left || self.axis_x < -AXIS_DEAD_ZONE
    }

    pub fn right(&self) -> bool {
        self.dpad_right || self.axis_x > AXIS_DEAD_ZONE
    }
}

/// Platform hook for reading gamepad state by device index
pub trait GamepadSource {
    fn poll(&self, index: usize) -> Option<GamepadState>;
}

/// No gamepad support on this platform
impl GamepadSource for () {
    fn poll(&self, _index: usize) -> Option<GamepadState> {
        None
    }
}

/// Maps viewport pixels to world coordinates for a letterboxed canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas pixels per world unit
    pub scale: f32,
    /// Left edge of the world inside the viewport, in pixels
    pub offset_x: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
        }
    }
}

impl Viewport {
    pub fn to_world_x(&self, viewport_x: f32) -> f32 {
        (viewport_x - self.offset_x) / self.scale
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConnectedPad {
    index: usize,
    standard_mapping: bool,
}

/// Tracks current input state across all channels
#[derive(Debug, Default)]
pub struct InputAggregator {
    key_left: bool,
    key_right: bool,
    pointer_active: bool,
    pointer_x: Option<f32>,
    viewport: Viewport,
    /// Connected pads in connection order
    pads: Vec<ConnectedPad>,
    active_pad: Option<usize>,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Key-down by DOM-style key name. Returns whether the key is bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => self.key_left = pressed,
            "ArrowRight" | "d" | "D" => self.key_right = pressed,
            _ => return false,
        }
        true
    }

    pub fn pointer_down(&mut self, viewport_x: f32) {
        self.pointer_active = true;
        self.pointer_x = Some(self.viewport.to_world_x(viewport_x));
    }

    /// Pointer movement only matters while dragging
    pub fn pointer_move(&mut self, viewport_x: f32) {
        if self.pointer_active {
            self.pointer_x = Some(self.viewport.to_world_x(viewport_x));
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_active = false;
        self.pointer_x = None;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    pub fn gamepad_connected(&mut self, index: usize, standard_mapping: bool) {
        self.pads.retain(|p| p.index != index);
        self.pads.push(ConnectedPad {
            index,
            standard_mapping,
        });
        if self.active_pad.is_none() || standard_mapping {
            log::info!("Gamepad {index} is now active (standard mapping: {standard_mapping})");
            self.active_pad = Some(index);
        }
    }

    pub fn gamepad_disconnected(&mut self, index: usize) {
        self.pads.retain(|p| p.index != index);
        if self.active_pad == Some(index) {
            // Most recent standard pad, else the earliest remaining one
            self.active_pad = self
                .pads
                .iter()
                .rev()
                .find(|p| p.standard_mapping)
                .or_else(|| self.pads.first())
                .map(|p| p.index);
            log::warn!(
                "Gamepad {index} disconnected, active pad now {:?}",
                self.active_pad
            );
        }
    }

    pub fn active_gamepad(&self) -> Option<usize> {
        self.active_pad
    }

    /// Sample every channel into this frame's snapshot
    pub fn poll(&self, pads: &dyn GamepadSource) -> InputFrame {
        let pad = self
            .active_pad
            .and_then(|index| pads.poll(index))
            .unwrap_or_default();

        InputFrame {
            left: self.key_left || pad.left(),
            right: self.key_right || pad.right(),
            pointer_active: self.pointer_active,
            pointer_x: if self.pointer_active {
                self.pointer_x
            } else {
                None
            },
        }
    }

    /// Drop every latched input (e.g., on focus loss)
    pub fn reset(&mut self) {
        self.key_left = false;
        self.key_right = false;
        self.pointer_up();
    }
}
