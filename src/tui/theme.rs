use ratatui::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub mention: Color,
    pub link: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            mention: Color::Rgb(0xCC, 0x66, 0xFF),
            link: Color::Rgb(0x44, 0xDD, 0xFF),
        }
    }
}

impl Theme {
    /// Color for a work item state. Unknown states use the text color.
    pub fn state_color(&self, state: &str) -> Color {
        match state.to_ascii_lowercase().as_str() {
            "new" | "to do" | "proposed" => self.text_bright,
            "active" | "in progress" | "committed" | "doing" => self.highlight,
            "resolved" | "ready" => self.cyan,
            "closed" | "done" | "completed" => self.green,
            "removed" | "blocked" => self.red,
            _ => self.text,
        }
    }

    /// Color for a work item type.
    pub fn type_color(&self, work_item_type: &str) -> Color {
        match work_item_type {
            "Bug" => self.red,
            "Task" => self.yellow,
            "User Story" | "Product Backlog Item" => self.blue,
            "Feature" => self.purple,
            "Epic" => self.highlight,
            _ => self.dim,
        }
    }
}
