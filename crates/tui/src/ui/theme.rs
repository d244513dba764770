use ratatui::style::Color;

/// Slice colors for expense groups, assigned by group position.
const GROUP_PALETTE: [Color; 8] = [
    Color::Rgb(0, 136, 254),
    Color::Rgb(0, 196, 159),
    Color::Rgb(255, 187, 40),
    Color::Rgb(255, 128, 66),
    Color::Rgb(136, 132, 216),
    Color::Rgb(130, 202, 157),
    Color::Rgb(255, 198, 88),
    Color::Rgb(164, 222, 108),
];

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(160, 160, 160),
            dim: Color::Rgb(120, 120, 120),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
            accent: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(90, 180, 110),
            negative: Color::Rgb(210, 90, 90),
            warning: Color::Rgb(220, 170, 60),
            error: Color::Rgb(200, 80, 80),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 248),
            surface: Color::Rgb(238, 240, 242),
            text: Color::Rgb(30, 34, 40),
            text_muted: Color::Rgb(90, 96, 104),
            dim: Color::Rgb(140, 146, 152),
            border: Color::Rgb(200, 204, 210),
            border_focused: Color::Rgb(20, 110, 120),
            accent: Color::Rgb(20, 110, 120),
            positive: Color::Rgb(30, 130, 60),
            negative: Color::Rgb(180, 40, 40),
            warning: Color::Rgb(170, 110, 0),
            error: Color::Rgb(180, 40, 40),
        }
    }

    pub fn group_color(&self, index: usize) -> Color {
        GROUP_PALETTE[index % GROUP_PALETTE.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
