//! CSS color values and parsing.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/) with the
//! Level 5 additions the engine needs: `color-mix()`, `light-dark()`, and
//! relative color syntax (`rgb(from red r g b)`).
//!
//! All parsing happens on flattened declaration text (the component-value
//! serialization); every path converges on 8-bit sRGB with channels
//! clamped on output.

use serde::Serialize;

use super::calc::evaluate_math_expression;
use super::length::EvalContext;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    /// Opaque black (#000000).
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Opaque white (#ffffff).
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Construct from channel values.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// "The syntax of a <hex-color> is a <hash-token> token whose value
    /// consists of 3, 4, 6, or 8 hexadecimal digits." Short forms expand
    /// by nibble-doubling.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let nibble = |i: usize| -> Option<u8> {
            hex[i..=i].chars().next()?.to_digit(16).map(|d| d as u8)
        };
        let pair = |i: usize| -> Option<u8> { Some(nibble(i)? * 16 + nibble(i + 1)?) };
        let doubled = |i: usize| -> Option<u8> { Some(nibble(i)? * 17) };

        match hex.len() {
            // "#RGB is converted into six-digit form by replicating
            // digits, not by adding zeros."
            3 => Some(Self {
                r: doubled(0)?,
                g: doubled(1)?,
                b: doubled(2)?,
                a: 255,
            }),
            4 => Some(Self {
                r: doubled(0)?,
                g: doubled(1)?,
                b: doubled(2)?,
                a: doubled(3)?,
            }),
            6 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: 255,
            }),
            8 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: pair(6)?,
            }),
            _ => None,
        }
    }

    /// Serialize as `#rrggbb` (or `#rrggbbaa` when not fully opaque).
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
///
/// The baseline named-color table plus common aliases. Extended X11 names
/// beyond these parse as failures and the declaration keeps its cascaded
/// value.
fn named_color(name: &str) -> Option<Color> {
    let c = |r, g, b| Some(Color::rgba(r, g, b, 255));
    match name {
        "black" => c(0, 0, 0),
        "white" => c(255, 255, 255),
        "red" => c(255, 0, 0),
        "green" => c(0, 128, 0),
        "blue" => c(0, 0, 255),
        "yellow" => c(255, 255, 0),
        "orange" => c(255, 165, 0),
        "purple" => c(128, 0, 128),
        "pink" => c(255, 192, 203),
        "brown" => c(165, 42, 42),
        "gray" | "grey" => c(128, 128, 128),
        "lightgray" | "lightgrey" => c(211, 211, 211),
        "darkgray" | "darkgrey" => c(169, 169, 169),
        "dimgray" | "dimgrey" => c(105, 105, 105),
        "silver" => c(192, 192, 192),
        "maroon" => c(128, 0, 0),
        "olive" => c(128, 128, 0),
        "lime" => c(0, 255, 0),
        "aqua" | "cyan" => c(0, 255, 255),
        "teal" => c(0, 128, 128),
        "navy" => c(0, 0, 128),
        "fuchsia" | "magenta" => c(255, 0, 255),
        "gold" => c(255, 215, 0),
        "indigo" => c(75, 0, 130),
        "violet" => c(238, 130, 238),
        "coral" => c(255, 127, 80),
        "salmon" => c(250, 128, 114),
        "khaki" => c(240, 230, 140),
        "plum" => c(221, 160, 221),
        "orchid" => c(218, 112, 214),
        "turquoise" => c(64, 224, 208),
        "tan" => c(210, 180, 140),
        "beige" => c(245, 245, 220),
        "ivory" => c(255, 255, 240),
        "lavender" => c(230, 230, 250),
        "crimson" => c(220, 20, 60),
        "tomato" => c(255, 99, 71),
        "chocolate" => c(210, 105, 30),
        "skyblue" => c(135, 206, 235),
        "steelblue" => c(70, 130, 180),
        "royalblue" => c(65, 105, 225),
        "seagreen" => c(46, 139, 87),
        "forestgreen" => c(34, 139, 34),
        "darkred" => c(139, 0, 0),
        "darkgreen" => c(0, 100, 0),
        "darkblue" => c(0, 0, 139),
        "rebeccapurple" => c(102, 51, 153),
        "transparent" => Some(Color::TRANSPARENT),
        _ => None,
    }
}

/// The `light-dark()` override channel.
///
/// `Auto` follows the environment's dark-mode flag; the forced variants
/// pin the choice regardless of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Follow [`ParseEnvironment::dark_mode`].
    #[default]
    Auto,
    /// Always pick the light argument of `light-dark()`.
    ForceLight,
    /// Always pick the dark argument of `light-dark()`.
    ForceDark,
}

/// Ambient parse state the color parser reads.
///
/// The original engine kept the dark-mode flag and its override in mutable
/// statics; they travel here as an explicit value the embedder constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseEnvironment {
    /// The system dark-mode flag.
    pub dark_mode: bool,
    /// Three-state override consulted before the flag.
    pub scheme: ColorScheme,
}

impl ParseEnvironment {
    /// Resolve the effective dark-mode state for `light-dark()`.
    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        match self.scheme {
            ColorScheme::Auto => self.dark_mode,
            ColorScheme::ForceLight => false,
            ColorScheme::ForceDark => true,
        }
    }
}

/// Parse any CSS `<color>` production from flattened declaration text.
///
/// Accepts hex notations, the named-color table, `currentcolor` (resolved
/// to opaque black at parse time; callers tracking inherited color should
/// re-resolve at the use site), the `rgb`/`hsl`/`hwb`/`lab`/`lch`/`oklab`/
/// `oklch` functions with modern or legacy argument syntax, `color()`,
/// `color-mix()`, `light-dark()`, and relative color syntax (`from REF`)
/// for rgb/hsl/hwb/oklab/oklch/lab.
#[must_use]
pub fn parse_color(input: &str, env: &ParseEnvironment) -> Option<Color> {
    let value = input.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }

    if let Some(color) = named_color(&value) {
        return Some(color);
    }

    if value.starts_with('#') {
        return Color::from_hex(&value);
    }

    // currentcolor resolves to opaque black here; the intended "inherit
    // from color" semantics belong to style computation.
    if value == "currentcolor" {
        return Some(Color::BLACK);
    }

    if let Some(args) = function_args(&value, "rgb").or_else(|| function_args(&value, "rgba")) {
        return parse_rgb(args, env);
    }
    if let Some(args) = function_args(&value, "hsl").or_else(|| function_args(&value, "hsla")) {
        return parse_hsl(args, env);
    }
    if let Some(args) = function_args(&value, "hwb") {
        return parse_hwb(args, env);
    }
    if let Some(args) = function_args(&value, "oklch") {
        return parse_oklch(args, env);
    }
    if let Some(args) = function_args(&value, "oklab") {
        return parse_oklab(args, env);
    }
    if let Some(args) = function_args(&value, "lab") {
        return parse_lab(args, env);
    }
    if let Some(args) = function_args(&value, "lch") {
        return parse_lch(args);
    }
    if let Some(args) = function_args(&value, "color-mix") {
        return parse_color_mix(args, env);
    }
    if let Some(args) = function_args(&value, "light-dark") {
        return parse_light_dark(args, env);
    }
    if let Some(args) = function_args(&value, "color") {
        return parse_color_function(args);
    }

    None
}

// ---------------------------------------------------------------------
// Argument plumbing
// ---------------------------------------------------------------------

/// If `value` is a call of `name`, return the text between its outermost
/// parentheses.
fn function_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    let rest = value.strip_prefix(name)?;
    let rest = rest.strip_prefix('(')?;
    let close = rest.rfind(')')?;
    Some(&rest[..close])
}

/// Numeric channel values: commas, slashes, and percent signs all act as
/// separators; angle suffixes are stripped. Legacy and modern syntaxes
/// converge on the same list.
fn numeric_args(content: &str, max: usize) -> Vec<f32> {
    let mut cleaned = content.replace([',', '/', '%'], " ");
    for suffix in ["deg", "grad", "rad", "turn"] {
        cleaned = cleaned.replace(suffix, " ");
    }
    cleaned
        .split_whitespace()
        .filter_map(|tok| tok.parse::<f32>().ok())
        .take(max)
        .collect()
}

/// Clamp to [0, 255] and truncate to 8 bits (parsed-value time clamping
/// per [§ 4.1](https://www.w3.org/TR/css-color-4/#rgb-functions)).
fn clamp_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Relative color syntax: split `from <ref-color> <channels…>` into the
/// reference color text and the channel expression text. Parenthesis-aware
/// so `from rgb(1 2 3) …` keeps the reference intact.
fn split_relative(args: &str) -> Option<(&str, &str)> {
    let rest = args.trim().strip_prefix("from ")?.trim_start();

    let mut depth = 0usize;
    let mut ref_end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ' ' | '/' if depth == 0 => {
                ref_end = i;
                break;
            }
            _ => {}
        }
    }
    Some((rest[..ref_end].trim(), rest[ref_end..].trim()))
}

/// Split channel expressions on top-level spaces, commas, and slashes.
fn split_channels(channels: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in channels.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ' ' | ',' | '/' if depth == 0 => {
                if !current.is_empty() {
                    out.push(current.clone());
                    current.clear();
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Resolve one channel expression against the reference channel bindings.
///
/// A bare keyword picks up the reference channel; `N%` scales
/// `percent_base`; a math function is evaluated with the channel names
/// substituted by their numeric values, so `calc(r * 0.5)` works.
fn resolve_channel(token: &str, bindings: &[(&str, f32)], percent_base: f32) -> f32 {
    let token = token.trim();
    if token.is_empty() {
        return 0.0;
    }

    for (name, value) in bindings {
        if token == *name {
            return *value;
        }
    }

    if let Some(pct) = token.strip_suffix('%') {
        if let Ok(v) = pct.parse::<f32>() {
            return v / 100.0 * percent_base;
        }
    }

    if let Ok(v) = token.parse::<f32>() {
        return v;
    }

    // Math expression: substitute channel names, then evaluate.
    let substituted = substitute_channels(token, bindings);
    evaluate_math_expression(&substituted, &EvalContext::default()).unwrap_or(0.0)
}

/// Replace standalone channel identifiers in a math expression with their
/// numeric values (`calc(r * 0.5)` → `calc(255 * 0.5)`).
fn substitute_channels(expr: &str, bindings: &[(&str, f32)]) -> String {
    let mut out = String::new();
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        if word.is_empty() {
            return;
        }
        let replaced = bindings
            .iter()
            .find(|(name, _)| *name == word.as_str())
            .map(|(_, value)| format!("{value}"));
        match replaced {
            Some(v) => out.push_str(&v),
            None => out.push_str(word),
        }
        word.clear();
    };

    for c in expr.chars() {
        if c.is_ascii_alphabetic() {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

// ---------------------------------------------------------------------
// sRGB / linear-light conversions
// ---------------------------------------------------------------------

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Linear-light sRGB triple → clamped 8-bit color.
fn color_from_linear(r: f32, g: f32, b: f32, alpha: f32) -> Color {
    Color {
        r: clamp_u8(linear_to_srgb(r) * 255.0),
        g: clamp_u8(linear_to_srgb(g) * 255.0),
        b: clamp_u8(linear_to_srgb(b) * 255.0),
        a: clamp_u8(alpha * 255.0),
    }
}

/// CIE XYZ (D65) → clamped 8-bit sRGB.
fn color_from_xyz(x: f32, y: f32, z: f32, alpha: f32) -> Color {
    let r_lin = 3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z;
    let g_lin = -0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z;
    let b_lin = 0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z;
    color_from_linear(r_lin, g_lin, b_lin, alpha)
}

/// [§ 4.2.4 HSL-to-RGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
///
/// hue in degrees (wraps), saturation and lightness in [0, 1].
fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (f32, f32, f32) {
    let h = ((hue % 360.0) + 360.0) % 360.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let hue2rgb = |p: f32, q: f32, mut t: f32| -> f32 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    };

    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue2rgb(p, q, h / 360.0 + 1.0 / 3.0),
        hue2rgb(p, q, h / 360.0),
        hue2rgb(p, q, h / 360.0 - 1.0 / 3.0),
    )
}

/// sRGB 8-bit → HSL (hue degrees, s/l in [0, 1]).
fn rgb_to_hsl(color: Color) -> (f32, f32, f32) {
    let r = f32::from(color.r) / 255.0;
    let g = f32::from(color.g) / 255.0;
    let b = f32::from(color.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return (0.0, 0.0, l);
    }
    let h = if max == r {
        (60.0 * ((g - b) / delta) + 360.0) % 360.0
    } else if max == g {
        60.0 * ((b - r) / delta) + 120.0
    } else {
        60.0 * ((r - g) / delta) + 240.0
    };
    let s = delta / (1.0 - (2.0 * l - 1.0).abs());
    (h, s, l)
}

/// sRGB 8-bit → OKLab (Björn Ottosson's matrices).
fn rgb_to_oklab(color: Color) -> (f32, f32, f32) {
    let r = srgb_to_linear(f32::from(color.r) / 255.0);
    let g = srgb_to_linear(f32::from(color.g) / 255.0);
    let b = srgb_to_linear(f32::from(color.b) / 255.0);

    let l = 0.412_221_47 * r + 0.536_332_54 * g + 0.051_445_995 * b;
    let m = 0.211_903_5 * r + 0.680_699_5 * g + 0.107_396_96 * b;
    let s = 0.088_302_46 * r + 0.081_784_55 * g + 0.894_386_9 * b;

    let l_c = l.cbrt();
    let m_c = m.cbrt();
    let s_c = s.cbrt();

    (
        0.210_454_26 * l_c + 0.793_617_8 * m_c - 0.004_072_047 * s_c,
        1.977_998_5 * l_c - 2.428_592_2 * m_c + 0.450_593_7 * s_c,
        0.025_904_037 * l_c + 0.782_771_77 * m_c - 0.808_675_77 * s_c,
    )
}

/// OKLab → clamped 8-bit sRGB.
fn oklab_to_color(l: f32, a: f32, b: f32, alpha: f32) -> Color {
    let l_ = l + 0.396_337_78 * a + 0.215_803_76 * b;
    let m_ = l - 0.105_561_346 * a - 0.063_854_17 * b;
    let s_ = l - 0.089_484_18 * a - 1.291_485_5 * b;

    let l3 = l_ * l_ * l_;
    let m3 = m_ * m_ * m_;
    let s3 = s_ * s_ * s_;

    let r_lin = 4.076_741_7 * l3 - 3.307_711_6 * m3 + 0.230_969_93 * s3;
    let g_lin = -1.268_438_f32 * l3 + 2.609_757_4 * m3 - 0.341_319_38 * s3;
    let b_lin = -0.004_196_086_3 * l3 - 0.703_418_6 * m3 + 1.707_614_7 * s3;

    color_from_linear(r_lin, g_lin, b_lin, alpha)
}

/// CIE Lab (D65) → clamped 8-bit sRGB.
fn lab_to_color(l: f32, a: f32, b: f32, alpha: f32) -> Color {
    let fy = (l + 16.0) / 116.0;
    let fx = a / 500.0 + fy;
    let fz = fy - b / 200.0;

    let f_inv = |t: f32| -> f32 {
        let delta = 6.0 / 29.0;
        if t > delta {
            t * t * t
        } else {
            3.0 * delta * delta * (t - 4.0 / 29.0)
        }
    };

    // D65 white point.
    let x = 0.950_47 * f_inv(fx);
    let y = 1.0 * f_inv(fy);
    let z = 1.088_83 * f_inv(fz);

    color_from_xyz(x, y, z, alpha)
}

/// sRGB 8-bit → CIE Lab (D65).
fn rgb_to_lab(color: Color) -> (f32, f32, f32) {
    let r = srgb_to_linear(f32::from(color.r) / 255.0);
    let g = srgb_to_linear(f32::from(color.g) / 255.0);
    let b = srgb_to_linear(f32::from(color.b) / 255.0);

    let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
    let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
    let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

    let f = |t: f32| -> f32 {
        let delta = 6.0 / 29.0;
        if t > delta * delta * delta {
            t.cbrt()
        } else {
            t / (3.0 * delta * delta) + 4.0 / 29.0
        }
    };

    let fx = f(x / 0.950_47);
    let fy = f(y / 1.0);
    let fz = f(z / 1.088_83);

    (116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

// ---------------------------------------------------------------------
// Color functions
// ---------------------------------------------------------------------

/// [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "Values outside these ranges are not invalid, but are clamped to the
/// ranges defined here at parsed-value time."
fn parse_rgb(args: &str, env: &ParseEnvironment) -> Option<Color> {
    if let Some((reference, channels)) = split_relative(args) {
        let reference = parse_color(reference, env)?;
        let bindings: [(&str, f32); 4] = [
            ("r", f32::from(reference.r)),
            ("g", f32::from(reference.g)),
            ("b", f32::from(reference.b)),
            ("alpha", f32::from(reference.a) / 255.0),
        ];

        let tokens = split_channels(channels);
        let mut out = [0.0f32, 0.0, 0.0, 255.0];
        for (i, token) in tokens.iter().take(4).enumerate() {
            // The alpha slot works in [0, 1]; the color channels in
            // [0, 255].
            let value = if i == 3 {
                resolve_channel(token, &bindings, 1.0) * 255.0
            } else {
                resolve_channel(token, &bindings, 255.0)
            };
            out[i] = value;
        }
        return Some(Color {
            r: clamp_u8(out[0]),
            g: clamp_u8(out[1]),
            b: clamp_u8(out[2]),
            a: clamp_u8(out[3]),
        });
    }

    // Channels may be numbers (0-255) or percentages (0%-100%); the alpha
    // slot accepts a [0, 1] number or a percentage.
    let tokens: Vec<&str> = args
        .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() < 3 {
        return None;
    }

    let channel = |tok: &str| -> Option<f32> {
        if let Some(pct) = tok.strip_suffix('%') {
            return pct.parse::<f32>().ok().map(|v| v * 255.0 / 100.0);
        }
        tok.parse::<f32>().ok()
    };

    let r = channel(tokens[0])?;
    let g = channel(tokens[1])?;
    let b = channel(tokens[2])?;
    let alpha = if tokens.len() >= 4 {
        if let Some(pct) = tokens[3].strip_suffix('%') {
            pct.parse::<f32>().ok().map_or(255.0, |v| v * 255.0 / 100.0)
        } else {
            let v: f32 = tokens[3].parse().unwrap_or(1.0);
            if v <= 1.0 { v * 255.0 } else { v }
        }
    } else {
        255.0
    };

    Some(Color {
        r: clamp_u8(r),
        g: clamp_u8(g),
        b: clamp_u8(b),
        a: clamp_u8(alpha),
    })
}

/// [§ 7 HSL](https://www.w3.org/TR/css-color-4/#the-hsl-notation)
fn parse_hsl(args: &str, env: &ParseEnvironment) -> Option<Color> {
    let (h, s, l, alpha) = if let Some((reference, channels)) = split_relative(args) {
        let reference = parse_color(reference, env)?;
        let (ref_h, ref_s, ref_l) = rgb_to_hsl(reference);
        let bindings: [(&str, f32); 4] = [
            ("h", ref_h),
            ("s", ref_s * 100.0),
            ("l", ref_l * 100.0),
            ("alpha", f32::from(reference.a) / 255.0),
        ];
        let tokens = split_channels(channels);
        let mut out = [0.0f32, 0.0, 0.0, 1.0];
        for (i, token) in tokens.iter().take(4).enumerate() {
            let base = if i == 3 { 1.0 } else { 100.0 };
            out[i] = resolve_channel(token, &bindings, base);
        }
        (out[0], out[1], out[2], out[3])
    } else {
        let vals = numeric_args(args, 4);
        if vals.len() < 3 {
            return None;
        }
        let alpha = if vals.len() >= 4 { vals[3] } else { 1.0 };
        (vals[0], vals[1], vals[2], alpha)
    };

    let (r, g, b) = hsl_to_rgb(h, s.clamp(0.0, 100.0) / 100.0, l.clamp(0.0, 100.0) / 100.0);
    Some(Color {
        r: clamp_u8(r * 255.0),
        g: clamp_u8(g * 255.0),
        b: clamp_u8(b * 255.0),
        a: clamp_u8(alpha.clamp(0.0, 1.0) * 255.0),
    })
}

/// [§ 8 HWB](https://www.w3.org/TR/css-color-4/#the-hwb-notation)
///
/// "If white + black is greater than 100%, they are scaled down
/// proportionally."
fn parse_hwb(args: &str, env: &ParseEnvironment) -> Option<Color> {
    let (h, w, b, alpha) = if let Some((reference, channels)) = split_relative(args) {
        let reference = parse_color(reference, env)?;
        let r = f32::from(reference.r) / 255.0;
        let g = f32::from(reference.g) / 255.0;
        let bl = f32::from(reference.b) / 255.0;
        let max = r.max(g).max(bl);
        let min = r.min(g).min(bl);
        let (ref_h, _, _) = rgb_to_hsl(reference);
        let bindings: [(&str, f32); 4] = [
            ("h", ref_h),
            ("w", min * 100.0),
            ("b", (1.0 - max) * 100.0),
            ("alpha", f32::from(reference.a) / 255.0),
        ];
        let tokens = split_channels(channels);
        let mut out = [0.0f32, 0.0, 0.0, 1.0];
        for (i, token) in tokens.iter().take(4).enumerate() {
            let base = if i == 3 { 1.0 } else { 100.0 };
            out[i] = resolve_channel(token, &bindings, base);
        }
        (out[0], out[1], out[2], out[3])
    } else {
        let vals = numeric_args(args, 4);
        if vals.len() < 3 {
            return None;
        }
        let alpha = if vals.len() >= 4 { vals[3] } else { 1.0 };
        (vals[0], vals[1], vals[2], alpha)
    };

    let mut w = w.clamp(0.0, 100.0) / 100.0;
    let mut bl = b.clamp(0.0, 100.0) / 100.0;
    if w + bl > 1.0 {
        let sum = w + bl;
        w /= sum;
        bl /= sum;
    }

    // The pure hue at S=100% L=50%, then mixed toward white and black.
    let (pr, pg, pb) = hsl_to_rgb(h, 1.0, 0.5);
    let mix = |pure: f32| pure * (1.0 - w - bl) + w;
    Some(Color {
        r: clamp_u8(mix(pr) * 255.0),
        g: clamp_u8(mix(pg) * 255.0),
        b: clamp_u8(mix(pb) * 255.0),
        a: clamp_u8(alpha.clamp(0.0, 1.0) * 255.0),
    })
}

/// [CSS Color 4 § 9.2 OKLab](https://www.w3.org/TR/css-color-4/#specifying-oklab-oklch)
fn parse_oklab(args: &str, env: &ParseEnvironment) -> Option<Color> {
    if let Some((reference, channels)) = split_relative(args) {
        let reference = parse_color(reference, env)?;
        let (ref_l, ref_a, ref_b) = rgb_to_oklab(reference);
        let bindings: [(&str, f32); 4] = [
            ("l", ref_l),
            ("a", ref_a),
            ("b", ref_b),
            ("alpha", f32::from(reference.a) / 255.0),
        ];
        let tokens = split_channels(channels);
        let mut out = [0.0f32, 0.0, 0.0, 1.0];
        for (i, token) in tokens.iter().take(4).enumerate() {
            out[i] = resolve_channel(token, &bindings, 1.0);
        }
        return Some(oklab_to_color(out[0], out[1], out[2], out[3].clamp(0.0, 1.0)));
    }

    let vals = numeric_args(args, 4);
    if vals.len() < 3 {
        return None;
    }
    let alpha = if vals.len() >= 4 { vals[3].clamp(0.0, 1.0) } else { 1.0 };
    Some(oklab_to_color(vals[0].clamp(0.0, 1.0), vals[1], vals[2], alpha))
}

/// OKLCH — the polar form of OKLab.
fn parse_oklch(args: &str, env: &ParseEnvironment) -> Option<Color> {
    let (l, c, h, alpha) = if let Some((reference, channels)) = split_relative(args) {
        let reference = parse_color(reference, env)?;
        let (ref_l, ref_a, ref_b) = rgb_to_oklab(reference);
        let ref_c = (ref_a * ref_a + ref_b * ref_b).sqrt();
        let ref_h = if ref_c == 0.0 {
            0.0
        } else {
            let deg = ref_b.atan2(ref_a).to_degrees();
            if deg < 0.0 { deg + 360.0 } else { deg }
        };
        let bindings: [(&str, f32); 4] = [
            ("l", ref_l),
            ("c", ref_c),
            ("h", ref_h),
            ("alpha", f32::from(reference.a) / 255.0),
        ];
        let tokens = split_channels(channels);
        let mut out = [0.0f32, 0.0, 0.0, 1.0];
        for (i, token) in tokens.iter().take(4).enumerate() {
            out[i] = resolve_channel(token, &bindings, 1.0);
        }
        (out[0], out[1], out[2], out[3])
    } else {
        let vals = numeric_args(args, 4);
        if vals.len() < 3 {
            return None;
        }
        let alpha = if vals.len() >= 4 { vals[3] } else { 1.0 };
        (vals[0].clamp(0.0, 1.0), vals[1].clamp(0.0, 0.4), vals[2], alpha)
    };

    let h = ((h % 360.0) + 360.0) % 360.0;
    let h_rad = h.to_radians();
    Some(oklab_to_color(
        l,
        c * h_rad.cos(),
        c * h_rad.sin(),
        alpha.clamp(0.0, 1.0),
    ))
}

/// [CSS Color 4 § 9.1 Lab](https://www.w3.org/TR/css-color-4/#specifying-lab-lch)
/// — CIE Lab, D65 illuminant.
fn parse_lab(args: &str, env: &ParseEnvironment) -> Option<Color> {
    if let Some((reference, channels)) = split_relative(args) {
        let reference = parse_color(reference, env)?;
        let (ref_l, ref_a, ref_b) = rgb_to_lab(reference);
        let bindings: [(&str, f32); 4] = [
            ("l", ref_l),
            ("a", ref_a),
            ("b", ref_b),
            ("alpha", f32::from(reference.a) / 255.0),
        ];
        let tokens = split_channels(channels);
        let mut out = [0.0f32, 0.0, 0.0, 1.0];
        for (i, token) in tokens.iter().take(4).enumerate() {
            let base = if i == 0 { 100.0 } else { 1.0 };
            out[i] = resolve_channel(token, &bindings, base);
        }
        return Some(lab_to_color(
            out[0].clamp(0.0, 100.0),
            out[1],
            out[2],
            out[3].clamp(0.0, 1.0),
        ));
    }

    let vals = numeric_args(args, 4);
    if vals.len() < 3 {
        return None;
    }
    let alpha = if vals.len() >= 4 { vals[3].clamp(0.0, 1.0) } else { 1.0 };
    Some(lab_to_color(vals[0].clamp(0.0, 100.0), vals[1], vals[2], alpha))
}

/// LCH — the polar form of Lab.
fn parse_lch(args: &str) -> Option<Color> {
    let vals = numeric_args(args, 4);
    if vals.len() < 3 {
        return None;
    }
    let l = vals[0].clamp(0.0, 100.0);
    let c = vals[1].max(0.0);
    let h = ((vals[2] % 360.0) + 360.0) % 360.0;
    let alpha = if vals.len() >= 4 { vals[3].clamp(0.0, 1.0) } else { 1.0 };

    let h_rad = h.to_radians();
    Some(lab_to_color(l, c * h_rad.cos(), c * h_rad.sin(), alpha))
}

/// [CSS Color 5 § 3 color-mix()](https://www.w3.org/TR/css-color-5/#color-mix)
///
/// Percentages default to 50/50; a single percentage complements the
/// other. Interpolation happens on gamma sRGB channels regardless of the
/// requested space; a spec-complete implementation would interpolate in
/// the declared space.
fn parse_color_mix(args: &str, env: &ParseEnvironment) -> Option<Color> {
    // Split on top-level commas: "in <space>", color1 [p%], color2 [p%].
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in args.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    // Comma-stripped fallback: "in srgb red 75% blue".
    if parts.len() == 1 {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        if tokens.len() < 4 || !tokens[0].eq_ignore_ascii_case("in") {
            return None;
        }
        let mut index = 2;
        let mut take_color = |tokens: &[&str], index: &mut usize| -> (Option<Color>, f32) {
            if *index >= tokens.len() {
                return (None, -1.0);
            }
            let color = parse_color(tokens[*index], env);
            *index += 1;
            let mut pct = -1.0;
            if *index < tokens.len() {
                if let Some(p) = tokens[*index].strip_suffix('%') {
                    if let Ok(v) = p.parse::<f32>() {
                        pct = v;
                        *index += 1;
                    }
                }
            }
            (color, pct)
        };
        let (c1, p1) = take_color(&tokens, &mut index);
        let (c2, p2) = take_color(&tokens, &mut index);
        return mix_colors(c1?, p1, c2?, p2);
    }

    if parts.len() < 3 {
        return None;
    }

    let parse_with_pct = |part: &str| -> (Option<Color>, f32) {
        let part = part.trim();
        // A trailing percentage after the color text.
        if let Some(pos) = part.rfind('%') {
            if let Some(space) = part[..pos].rfind(' ') {
                if let Ok(pct) = part[space + 1..pos].parse::<f32>() {
                    return (parse_color(part[..space].trim(), env), pct);
                }
            }
        }
        (parse_color(part, env), -1.0)
    };

    let (c1, p1) = parse_with_pct(&parts[1]);
    let (c2, p2) = parse_with_pct(&parts[2]);
    mix_colors(c1?, p1, c2?, p2)
}

/// Resolve the mix percentages and interpolate.
fn mix_colors(c1: Color, p1: f32, c2: Color, p2: f32) -> Option<Color> {
    let (p1, p2) = match (p1 < 0.0, p2 < 0.0) {
        (true, true) => (50.0, 50.0),
        (true, false) => (100.0 - p2, p2),
        (false, true) => (p1, 100.0 - p1),
        (false, false) => (p1, p2),
    };
    let total = p1 + p2;
    if total <= 0.0 {
        return None;
    }
    let f1 = p1 / total;
    let f2 = p2 / total;
    let mix = |a: u8, b: u8| clamp_u8(f32::from(a) * f1 + f32::from(b) * f2);
    Some(Color {
        r: mix(c1.r, c2.r),
        g: mix(c1.g, c2.g),
        b: mix(c1.b, c2.b),
        a: mix(c1.a, c2.a),
    })
}

/// [CSS Color 5 § 7 light-dark()](https://www.w3.org/TR/css-color-5/#light-dark)
///
/// Returns the argument selected by the environment's dark-mode state.
fn parse_light_dark(args: &str, env: &ParseEnvironment) -> Option<Color> {
    let dark = env.is_dark_mode();

    // Split on the first top-level comma; fall back to a space split when
    // the commas were stripped upstream.
    let mut depth = 0usize;
    let mut split = None;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                split = Some(i);
                break;
            }
            _ => {}
        }
    }

    let (light, dark_arg) = match split {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => args.split_once(' ')?,
    };
    parse_color(if dark { dark_arg } else { light }.trim(), env)
}

/// [§ 10.1 color()](https://www.w3.org/TR/css-color-4/#color-function)
///
/// `color(<space> c1 c2 c3 [/ alpha])` with channel values in [0, 1].
/// Unknown spaces fall back to sRGB.
fn parse_color_function(args: &str) -> Option<Color> {
    let cleaned = args.replace(['/', ','], " ");
    let mut tokens = cleaned.split_whitespace();
    let space = tokens.next()?.to_ascii_lowercase();

    let vals: Vec<f32> = tokens.filter_map(|t| t.parse::<f32>().ok()).take(4).collect();
    if vals.len() < 3 {
        return None;
    }
    let (r, g, b) = (vals[0], vals[1], vals[2]);
    let alpha = if vals.len() >= 4 { vals[3].clamp(0.0, 1.0) } else { 1.0 };

    match space.as_str() {
        "srgb-linear" => Some(color_from_linear(r, g, b, alpha)),
        "display-p3" => {
            // P3 → XYZ (D65) → sRGB. The P3 gamut is wider; out-of-gamut
            // results clamp.
            let rl = srgb_to_linear(r);
            let gl = srgb_to_linear(g);
            let bl = srgb_to_linear(b);
            let x = 0.486_570_9 * rl + 0.265_667_7 * gl + 0.198_217_3 * bl;
            let y = 0.228_974_6 * rl + 0.691_738_5 * gl + 0.079_286_9 * bl;
            let z = 0.045_113_4 * gl + 1.043_944_4 * bl;
            Some(color_from_xyz(x, y, z, alpha))
        }
        "a98-rgb" => {
            // Adobe RGB (1998): gamma 563/256, then through XYZ.
            let a98_to_linear = |c: f32| -> f32 {
                if c < 0.0 {
                    -(-c).powf(563.0 / 256.0)
                } else {
                    c.powf(563.0 / 256.0)
                }
            };
            let rl = a98_to_linear(r);
            let gl = a98_to_linear(g);
            let bl = a98_to_linear(b);
            let x = 0.576_730_9 * rl + 0.185_554_0 * gl + 0.188_185_2 * bl;
            let y = 0.297_376_9 * rl + 0.627_349_1 * gl + 0.075_274_1 * bl;
            let z = 0.027_034_3 * rl + 0.070_687_2 * gl + 0.991_108_5 * bl;
            Some(color_from_xyz(x, y, z, alpha))
        }
        // "srgb" and anything unknown.
        _ => Some(Color {
            r: clamp_u8(r * 255.0),
            g: clamp_u8(g * 255.0),
            b: clamp_u8(b * 255.0),
            a: clamp_u8(alpha * 255.0),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Option<Color> {
        parse_color(input, &ParseEnvironment::default())
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse("#fff"), Some(Color::WHITE));
        assert_eq!(parse("#ff0000"), Some(Color::rgba(255, 0, 0, 255)));
        assert_eq!(parse("#ff000080"), Some(Color::rgba(255, 0, 0, 128)));
        assert_eq!(parse("#f00c"), Some(Color::rgba(255, 0, 0, 204)));
        assert_eq!(parse("#12345"), None);
    }

    #[test]
    fn named_and_current() {
        assert_eq!(parse("red"), Some(Color::rgba(255, 0, 0, 255)));
        assert_eq!(parse("REBECCAPURPLE"), Some(Color::rgba(102, 51, 153, 255)));
        assert_eq!(parse("transparent"), Some(Color::TRANSPARENT));
        assert_eq!(parse("currentcolor"), Some(Color::BLACK));
        assert_eq!(parse("nonsense"), None);
    }

    #[test]
    fn rgb_modern_and_legacy() {
        assert_eq!(parse("rgb(255, 128, 0)"), Some(Color::rgba(255, 128, 0, 255)));
        assert_eq!(parse("rgb(255 128 0)"), Some(Color::rgba(255, 128, 0, 255)));
        assert_eq!(
            parse("rgba(255, 0, 0, 0.5)"),
            Some(Color::rgba(255, 0, 0, 127))
        );
        assert_eq!(
            parse("rgb(255 0 0 / 0.25)"),
            Some(Color::rgba(255, 0, 0, 63))
        );
        assert_eq!(parse("rgb(100% 0% 50%)"), Some(Color::rgba(255, 0, 127, 255)));
    }

    #[test]
    fn rgb_clamps_out_of_range() {
        assert_eq!(parse("rgb(300 -20 0)"), Some(Color::rgba(255, 0, 0, 255)));
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(parse("hsl(0, 100%, 50%)"), Some(Color::rgba(255, 0, 0, 255)));
        assert_eq!(
            parse("hsl(120, 100%, 50%)"),
            Some(Color::rgba(0, 255, 0, 255))
        );
        assert_eq!(
            parse("hsl(240, 100%, 50%)"),
            Some(Color::rgba(0, 0, 255, 255))
        );
    }

    #[test]
    fn hwb_extremes() {
        // 100% white dominates.
        assert_eq!(parse("hwb(0 100% 0%)"), Some(Color::WHITE));
        // 100% black dominates.
        assert_eq!(parse("hwb(0 0% 100%)"), Some(Color::BLACK));
    }

    #[test]
    fn oklch_white_roundtrip() {
        let white = parse("oklch(1 0 0)").unwrap();
        assert!(white.r >= 254 && white.g >= 254 && white.b >= 254);
    }

    #[test]
    fn lab_black_and_white() {
        let black = parse("lab(0 0 0)").unwrap();
        assert!(black.r <= 1 && black.g <= 1 && black.b <= 1);
        let white = parse("lab(100 0 0)").unwrap();
        assert!(white.r >= 254 && white.g >= 254 && white.b >= 254);
    }

    #[test]
    fn color_function_spaces() {
        assert_eq!(parse("color(srgb 1 0 0)"), Some(Color::rgba(255, 0, 0, 255)));
        // Unknown spaces read as sRGB.
        assert_eq!(
            parse("color(martian 0 1 0)"),
            Some(Color::rgba(0, 255, 0, 255))
        );
        let linear_mid = parse("color(srgb-linear 0.5 0.5 0.5)").unwrap();
        // Linear 0.5 gamma-encodes to ~0.735.
        assert!((f32::from(linear_mid.r) / 255.0 - 0.735).abs() < 0.01);
    }

    #[test]
    fn color_mix_defaults_to_even_split() {
        let mixed = parse("color-mix(in srgb, black, white)").unwrap();
        assert_eq!(mixed.r, mixed.g);
        assert!((f32::from(mixed.r) - 127.5).abs() <= 1.0);
    }

    #[test]
    fn color_mix_single_percentage_complements() {
        let mixed = parse("color-mix(in srgb, rgb(255 0 0) 25%, rgb(0 0 255))").unwrap();
        assert_eq!(mixed.r, 63);
        assert_eq!(mixed.b, 191);
    }

    #[test]
    fn light_dark_follows_environment() {
        let light_env = ParseEnvironment::default();
        let dark_env = ParseEnvironment {
            dark_mode: true,
            ..ParseEnvironment::default()
        };
        let forced_light = ParseEnvironment {
            dark_mode: true,
            scheme: ColorScheme::ForceLight,
        };
        assert_eq!(
            parse_color("light-dark(white, black)", &light_env),
            Some(Color::WHITE)
        );
        assert_eq!(
            parse_color("light-dark(white, black)", &dark_env),
            Some(Color::BLACK)
        );
        assert_eq!(
            parse_color("light-dark(white, black)", &forced_light),
            Some(Color::WHITE)
        );
    }

    #[test]
    fn relative_rgb_keywords_and_calc() {
        // Channels pass through by keyword.
        assert_eq!(
            parse("rgb(from red r g b)"),
            Some(Color::rgba(255, 0, 0, 255))
        );
        // calc() over a channel keyword: half of 255 truncates to 127.
        let halved = parse("rgb(from red calc(r * 0.5) g b)").unwrap();
        assert_eq!(halved.r, 127);
        assert_eq!(halved.g, 0);
        assert_eq!(halved.b, 0);
        assert_eq!(halved.a, 255);
    }

    #[test]
    fn relative_hsl_rotates_hue() {
        let rotated = parse("hsl(from red calc(h + 120) s l)").unwrap();
        // Red rotated 120° is green.
        assert_eq!(rotated.g, 255);
        assert_eq!(rotated.r, 0);
    }

    #[test]
    fn relative_alpha_channel() {
        let faded = parse("rgb(from red r g b / calc(alpha / 2))").unwrap();
        assert_eq!(faded.a, 127);
        assert_eq!(faded.r, 255);
    }

    #[test]
    fn to_hex_string_roundtrip() {
        assert_eq!(Color::rgba(255, 0, 0, 255).to_hex_string(), "#ff0000");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex_string(), "#01020304");
    }
}
