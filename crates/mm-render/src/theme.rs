//! Canvas colours.
//!
//! `ThemeColors` holds CSS colour strings as a host would supply them
//! (stylesheet variables, a settings file). `Palette` is the parsed form the
//! painters use.

use serde::{Deserialize, Serialize};

/// 8-bit straight-alpha colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS colour: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb(r, g, b)` or `rgba(r, g, b, a)` with `a` in `0..=1`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        let (args, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };

        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |p: &str| -> Option<u8> {
            let v: f32 = p.parse().ok()?;
            Some(v.round().clamp(0.0, 255.0) as u8)
        };
        let a = if has_alpha {
            let v: f32 = parts[3].parse().ok()?;
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            255
        };
        Some(Self::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ))
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                let a = match bytes.get(3) {
                    Some(&c) => hex_val(c)?,
                    None => 0xF,
                };
                Some(Self::rgba(r * 17, g * 17, b * 17, a * 17))
            }
            6 | 8 => {
                let pair = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);
                let a = if bytes.len() == 8 { pair(6)? } else { 255 };
                Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, a))
            }
            _ => None,
        }
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ─── Theme ───────────────────────────────────────────────────────────────

/// The nine colours the canvas is painted with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeColors {
    pub canvas_bg: String,
    pub edge: String,
    pub node: String,
    pub node_selected: String,
    pub node_border: String,
    pub node_border_selected: String,
    pub node_selected_glow: String,
    pub text: String,
    pub text_selected: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::light()
    }
}

impl ThemeColors {
    pub fn light() -> Self {
        Self {
            canvas_bg: "#f5f6f8".into(),
            edge: "#b1b7c0".into(),
            node: "#ffffff".into(),
            node_selected: "#3f6fe5".into(),
            node_border: "#d7dce3".into(),
            node_border_selected: "#2f56b8".into(),
            node_selected_glow: "rgba(63, 111, 229, 0.32)".into(),
            text: "#1f2328".into(),
            text_selected: "#ffffff".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            canvas_bg: "#1c1d21".into(),
            edge: "#4a505a".into(),
            node: "#2a2c31".into(),
            node_selected: "#4d7cf0".into(),
            node_border: "#3a3e46".into(),
            node_border_selected: "#8aa8f5".into(),
            node_selected_glow: "rgba(77, 124, 240, 0.4)".into(),
            text: "#e6e8eb".into(),
            text_selected: "#ffffff".into(),
        }
    }

    /// Parse a JSON object of colours. Missing keys keep the light defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// All nine values joined with `|`. Two themes with the same key paint
    /// identically.
    pub fn cache_key(&self) -> String {
        [
            self.canvas_bg.as_str(),
            self.edge.as_str(),
            self.node.as_str(),
            self.node_selected.as_str(),
            self.node_border.as_str(),
            self.node_border_selected.as_str(),
            self.node_selected_glow.as_str(),
            self.text.as_str(),
            self.text_selected.as_str(),
        ]
        .join("|")
    }

    /// Parse every colour. Values that do not parse fall back to the light
    /// theme's colour for the same slot.
    pub fn palette(&self) -> Palette {
        let fallback = Palette::light();
        Palette {
            canvas_bg: pick("canvasBg", &self.canvas_bg, fallback.canvas_bg),
            edge: pick("edge", &self.edge, fallback.edge),
            node: pick("node", &self.node, fallback.node),
            node_selected: pick("nodeSelected", &self.node_selected, fallback.node_selected),
            node_border: pick("nodeBorder", &self.node_border, fallback.node_border),
            node_border_selected: pick(
                "nodeBorderSelected",
                &self.node_border_selected,
                fallback.node_border_selected,
            ),
            node_selected_glow: pick(
                "nodeSelectedGlow",
                &self.node_selected_glow,
                fallback.node_selected_glow,
            ),
            text: pick("text", &self.text, fallback.text),
            text_selected: pick("textSelected", &self.text_selected, fallback.text_selected),
        }
    }
}

fn pick(name: &str, value: &str, default: Rgba) -> Rgba {
    Rgba::parse(value).unwrap_or_else(|| {
        log::warn!("theme: cannot parse {name} = {value:?}, using default");
        default
    })
}

/// Parsed theme colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub canvas_bg: Rgba,
    pub edge: Rgba,
    pub node: Rgba,
    pub node_selected: Rgba,
    pub node_border: Rgba,
    pub node_border_selected: Rgba,
    pub node_selected_glow: Rgba,
    pub text: Rgba,
    pub text_selected: Rgba,
}

impl Palette {
    const fn light() -> Self {
        Self {
            canvas_bg: Rgba::rgb(0xf5, 0xf6, 0xf8),
            edge: Rgba::rgb(0xb1, 0xb7, 0xc0),
            node: Rgba::rgb(0xff, 0xff, 0xff),
            node_selected: Rgba::rgb(0x3f, 0x6f, 0xe5),
            node_border: Rgba::rgb(0xd7, 0xdc, 0xe3),
            node_border_selected: Rgba::rgb(0x2f, 0x56, 0xb8),
            node_selected_glow: Rgba::rgba(63, 111, 229, 82),
            text: Rgba::rgb(0x1f, 0x23, 0x28),
            text_selected: Rgba::rgb(0xff, 0xff, 0xff),
        }
    }
}
