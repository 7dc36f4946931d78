//! Software-rendered scene viewer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  coronal R/S panel                                  │
//! │                                                     │
//! │        ◆ Hand1Finger1      ◆ Hand1Finger2           │
//! │                                                     │
//! │  ──────────────┼──────────────  (sensor origin)     │
//! │  status bar                     auto-create: OFF    │
//! │  key legend                                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The panel shows every scene node as a labeled diamond, projected from
//! RAS onto the Right/Superior plane.  In simulation mode the window is
//! also the input device: the mouse drives the synthetic fingertip and the
//! keyboard drives the hand shape and the auto-create toggle.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use ras_scene::RasScene;

use crate::tracking::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 600;
const STATUS_Y:  usize = WIN_H - 40;
const BASE_Y:    usize = STATUS_Y - 24;

const BG_COLOR:     u32 = 0xFF1A1A2E;
const GRID_COLOR:   u32 = 0xFF2E3A5C;
const MARKER_COLOR: u32 = 0xFF66D9EF;
const LABEL_COLOR:  u32 = 0xFFCCCCCC;
const TEXT_BG:      u32 = 0xFF0F3460;
const STATUS_COLOR: u32 = 0xFFEEEEEE;
const ERROR_COLOR:  u32 = 0xFFFF6666;
const LEGEND_COLOR: u32 = 0xFF888888;

/// Millimeters of RAS space shown across the panel width.
const VIEW_SPAN_MM: f32 = 600.0;

// ════════════════════════════════════════════════════════════════════════════
// UiRequest
// ════════════════════════════════════════════════════════════════════════════

/// Control-surface request produced by input polling; everything that is
/// simulation input instead goes straight out over the `SimInput` channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiRequest {
    ToggleAutoCreate,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// Viewer
// ════════════════════════════════════════════════════════════════════════════

pub struct Viewer {
    window:       Window,
    buf:          Vec<u32>,
    sim_tx:       Sender<SimInput>,
    last_pointer: (f32, f32),
}

impl Viewer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Leap Bridge — Fingertip Transforms",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Viewer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            last_pointer: (-1.0, -1.0),
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard and mouse input.  Simulation inputs go out over the
    /// channel; control-surface requests are returned to the caller.
    pub fn poll_input(&mut self) -> Vec<UiRequest> {
        let mut requests = Vec::new();
        if !self.window.is_open() {
            requests.push(UiRequest::Quit);
            return requests;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            requests.push(UiRequest::Quit);
        }
        if one_shot(Key::C) {
            requests.push(UiRequest::ToggleAutoCreate);
        }
        if one_shot(Key::F) {
            let _ = self.sim_tx.send(SimInput::CycleFingers);
        }
        if one_shot(Key::H) {
            let _ = self.sim_tx.send(SimInput::ToggleSecondHand);
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let x = mx / WIN_W as f32;
            let y = my / WIN_H as f32;
            if (x, y) != self.last_pointer {
                self.last_pointer = (x, y);
                let _ = self.sim_tx.send(SimInput::Pointer { x, y });
            }
        }

        requests
    }

    /// Render one frame from a scene snapshot.
    pub fn render(&mut self, scene: &RasScene, status: &str, auto_create: bool, error: Option<&str>) {
        self.buf.fill(BG_COLOR);

        // ── R/S panel axes ───────────────────────────────────────────────
        let cx = WIN_W / 2;
        for x in 0..WIN_W {
            self.set_pixel(x, BASE_Y, GRID_COLOR);
        }
        for y in 0..BASE_Y {
            self.set_pixel(cx, y, GRID_COLOR);
        }
        self.draw_label("R", 8, BASE_Y - 10, GRID_COLOR);
        self.draw_label("S", cx + 6, 6, GRID_COLOR);

        // ── node markers ─────────────────────────────────────────────────
        let scale = WIN_W as f32 / VIEW_SPAN_MM; // px per mm
        for node in scene.nodes() {
            let t = node.local_transform().w_axis;
            let sx = cx as f32 + t.x * scale;
            let sy = BASE_Y as f32 - t.z * scale;
            if sx < 0.0 || sx >= WIN_W as f32 || sy < 0.0 || sy >= BASE_Y as f32 {
                continue;
            }
            self.draw_diamond(sx as usize, sy as usize, 5, MARKER_COLOR);
            self.draw_label(node.name(), sx as usize + 9, sy as usize, LABEL_COLOR);
        }

        // ── status bar ───────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        match error {
            Some(e) => {
                let line = format!("TRACKING ERROR: {}", e);
                self.draw_label(&line, 10, STATUS_Y + 6, ERROR_COLOR);
            }
            None => self.draw_label(status, 10, STATUS_Y + 6, STATUS_COLOR),
        }
        let flag = if auto_create { "auto-create: ON" } else { "auto-create: OFF" };
        self.draw_label(flag, WIN_W - 150, STATUS_Y + 6, STATUS_COLOR);

        // ── key legend ───────────────────────────────────────────────────
        self.draw_label(
            "MOUSE=fingertip  F=fingers  H=second hand  C=auto-create  Q=quit",
            10,
            WIN_H - 14,
            LEGEND_COLOR,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// Minimal bitmap font — 3×5 characters for label rendering.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
