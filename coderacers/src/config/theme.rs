use std::collections::HashMap;

use racecore::RenderedCharacter;
use racecore::render::{CURSOR_CLASS, INCORRECT_CLASS};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use terminal_colorsaurus::QueryOptions;

/// How a style class is drawn in the terminal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub underlined: bool,
    pub reversed: bool,
}

impl ClassStyle {
    fn style(&self) -> Style {
        let mut style = Style::new();
        if let Some(fg) = self.fg {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.reversed {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

/// General theme
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    /// Color of characters without a highlight color
    pub text: Color,
    /// Terminal background, pending characters fade towards it. Detected when not set.
    pub background: Option<Color>,
    /// Color of the countdown once ten seconds or less are left
    pub warning: Color,
    /// Terminal styles of the marker classes merged in by the renderer
    pub classes: HashMap<String, ClassStyle>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut classes = HashMap::new();
        let [text_class, bg_class] = incorrect_classes();

        classes.insert(
            text_class.to_string(),
            ClassStyle {
                fg: Some(Color::Rgb(0xef, 0x44, 0x44)),
                ..Default::default()
            },
        );
        classes.insert(
            bg_class.to_string(),
            ClassStyle {
                bg: Some(Color::Rgb(0x99, 0x1b, 0x1b)),
                ..Default::default()
            },
        );
        classes.insert(
            CURSOR_CLASS.to_string(),
            ClassStyle {
                underlined: true,
                reversed: true,
                ..Default::default()
            },
        );

        Self {
            text: Color::Rgb(0xe2, 0xdf, 0xe7),
            background: None,
            warning: Color::Yellow,
            classes,
        }
    }
}

fn incorrect_classes() -> [&'static str; 2] {
    let mut classes = INCORRECT_CLASS.split_whitespace();
    [
        classes.next().unwrap_or_default(),
        classes.next().unwrap_or_default(),
    ]
}

impl Theme {
    /// Ask the terminal for its background color, unless one is configured
    pub fn detect_background(&mut self) {
        if self.background.is_some() {
            return;
        }

        match terminal_colorsaurus::color_palette(QueryOptions::default()) {
            Ok(palette) => {
                let (r, g, b) = palette.background.scale_to_8bit();
                self.background = Some(Color::Rgb(r, g, b));
            }
            Err(error) => {
                tracing::debug!(%error, "Could not query terminal colors");
            }
        }
    }

    /// The terminal style of a rendered snippet character
    pub fn style_for(&self, rendered: &RenderedCharacter) -> Style {
        let attributes = &rendered.style_attributes;

        let foreground = attributes
            .get("color")
            .and_then(|color| color.parse::<Color>().ok())
            .unwrap_or(self.text);

        let foreground = match attributes
            .get("opacity")
            .and_then(|opacity| opacity.parse::<f32>().ok())
        {
            Some(opacity) => fade(foreground, self.background, opacity),
            None => foreground,
        };

        rendered
            .style_class
            .split_whitespace()
            .filter_map(|class| self.classes.get(class))
            .fold(Style::new().fg(foreground), |style, class| {
                style.patch(class.style())
            })
    }
}

/// Blend `color` towards `background`, keeping `opacity` of the original
///
/// Colors that can't be blended are left as they are.
pub fn fade(color: Color, background: Option<Color>, opacity: f32) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    match (color, background.unwrap_or(Color::Rgb(0, 0, 0))) {
        (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
            let mix = |fg: u8, bg: u8| {
                (f32::from(fg) * opacity + f32::from(bg) * (1.0 - opacity)).round() as u8
            };
            Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
        }
        _ => color,
    }
}
