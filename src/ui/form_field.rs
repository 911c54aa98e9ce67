//! Form field widgets for the biodata wizard TUI.
//!
//! Each widget is built from a [`FieldSpec`] in the wizard rule table, so
//! the TUI renders exactly the fields the validation layer knows about.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::wizard::{FieldSpec, FieldValue, InputKind};

/// A form field widget for one biodata field.
pub enum FormField {
    /// Single-line text input
    TextInput { value: String, cursor_pos: usize },
    /// Multi-line text input using tui-textarea
    TextArea { textarea: Box<TextArea<'static>> },
    /// Selection from the field's fixed option list
    Select {
        options: &'static [&'static str],
        selected: usize,
        list_state: ListState,
        answered: bool,
    },
    /// Yes/no toggle
    Toggle { value: Option<bool> },
    /// Date input (YYYY-MM-DD format)
    DateInput { value: String, cursor_pos: usize },
    /// Bounded integer input
    IntegerInput { value: String, min: i64, max: i64 },
    /// Location path chosen through the district picker overlay
    LocationPath { value: String },
}

impl FormField {
    /// Create a widget for a field spec, prefilled from the wizard form data.
    pub fn from_spec(spec: &FieldSpec, existing: Option<&FieldValue>) -> Self {
        let text = existing.map(ToString::to_string).unwrap_or_default();
        match spec.input {
            InputKind::Text => FormField::TextInput {
                cursor_pos: text.len(),
                value: text,
            },
            InputKind::LongText => {
                let mut textarea = TextArea::default();
                if !text.is_empty() {
                    textarea.insert_str(&text);
                }
                FormField::TextArea {
                    textarea: Box::new(textarea),
                }
            }
            InputKind::Select(options) => {
                let preselected = options.iter().position(|o| *o == text);
                let mut list_state = ListState::default();
                list_state.select(Some(preselected.unwrap_or(0)));
                FormField::Select {
                    options,
                    selected: preselected.unwrap_or(0),
                    list_state,
                    answered: preselected.is_some(),
                }
            }
            InputKind::Toggle => FormField::Toggle {
                value: match existing {
                    Some(FieldValue::Bool(b)) => Some(*b),
                    _ => None,
                },
            },
            InputKind::Date => FormField::DateInput {
                cursor_pos: text.len(),
                value: text,
            },
            InputKind::Integer { min, max } => FormField::IntegerInput {
                value: text,
                min,
                max,
            },
            InputKind::District => FormField::LocationPath { value: text },
        }
    }

    /// The current value, if the field has been answered.
    pub fn value(&self) -> Option<FieldValue> {
        match self {
            FormField::TextInput { value, .. } | FormField::DateInput { value, .. } => {
                (!value.trim().is_empty()).then(|| FieldValue::Text(value.trim().to_string()))
            }
            FormField::TextArea { textarea } => {
                let joined = textarea.lines().join("\n");
                (!joined.trim().is_empty()).then(|| FieldValue::Text(joined.trim().to_string()))
            }
            FormField::Select {
                options,
                selected,
                answered,
                ..
            } => answered
                .then(|| options.get(*selected))
                .flatten()
                .map(|o| FieldValue::Text((*o).to_string())),
            FormField::Toggle { value } => value.map(FieldValue::Bool),
            FormField::IntegerInput { value, .. } => value
                .trim()
                .parse::<i64>()
                .ok()
                .map(|n| FieldValue::Number(n as f64)),
            FormField::LocationPath { value } => {
                (!value.trim().is_empty()).then(|| FieldValue::Text(value.trim().to_string()))
            }
        }
    }

    /// Widget-level validity, checked before the wizard's own rule table.
    pub fn is_valid(&self, required: bool) -> bool {
        match self {
            FormField::IntegerInput { value, min, max } => {
                if value.trim().is_empty() {
                    return !required;
                }
                value
                    .trim()
                    .parse::<i64>()
                    .map(|n| (*min..=*max).contains(&n))
                    .unwrap_or(false)
            }
            _ => !required || self.value().is_some(),
        }
    }

    /// Whether Enter on this field opens the district picker overlay.
    pub fn wants_picker(&self) -> bool {
        matches!(self, FormField::LocationPath { .. })
    }

    /// Store a picker result.
    pub fn set_location(&mut self, path: String) {
        if let FormField::LocationPath { value } = self {
            *value = path;
        }
    }

    /// Handle a key event, returns true if the key was consumed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput { value, cursor_pos } => {
                edit_line(value, cursor_pos, key, None)
            }
            FormField::TextArea { textarea } => {
                textarea.input(crossterm::event::KeyEvent::new(
                    key,
                    crossterm::event::KeyModifiers::NONE,
                ));
                true
            }
            FormField::Select {
                options,
                selected,
                list_state,
                answered,
            } => match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    if *selected > 0 {
                        *selected -= 1;
                        list_state.select(Some(*selected));
                    }
                    *answered = true;
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected < options.len().saturating_sub(1) {
                        *selected += 1;
                        list_state.select(Some(*selected));
                    }
                    *answered = true;
                    true
                }
                KeyCode::Char(' ') => {
                    *answered = true;
                    true
                }
                _ => false,
            },
            FormField::Toggle { value } => match key {
                KeyCode::Char(' ') => {
                    *value = Some(!value.unwrap_or(false));
                    true
                }
                KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('n') => {
                    *value = Some(false);
                    true
                }
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('y') => {
                    *value = Some(true);
                    true
                }
                _ => false,
            },
            FormField::DateInput { value, cursor_pos } => match key {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    if value.len() < 10 {
                        value.insert(*cursor_pos, c);
                        *cursor_pos += 1;
                    }
                    true
                }
                _ => edit_line(value, cursor_pos, key, Some(&[])),
            },
            FormField::IntegerInput { value, .. } => match key {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if value.len() < 6 {
                        value.push(c);
                    }
                    true
                }
                KeyCode::Backspace => {
                    value.pop();
                    true
                }
                _ => false,
            },
            // The picker overlay owns input while it is open.
            FormField::LocationPath { .. } => false,
        }
    }

    /// Rows needed to render this field.
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextArea { .. } => 4,
            FormField::Select { options, .. } => (options.len() as u16).min(5),
            _ => 1,
        }
    }

    /// Render the field into `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let dim = Style::default().fg(Color::DarkGray);
        let body_style = Style::default().fg(if focused { Color::White } else { Color::Gray });
        let placeholder = if matches!(self, FormField::DateInput { .. }) {
            "YYYY-MM-DD"
        } else {
            "type here"
        };

        match self {
            FormField::TextInput { value, cursor_pos }
            | FormField::DateInput { value, cursor_pos } => {
                let mut text = value.clone();
                if focused {
                    if *cursor_pos < text.len() {
                        text.insert(*cursor_pos, '|');
                    } else {
                        text.push('|');
                    }
                }
                let line = if value.is_empty() && !focused {
                    Line::from(Span::styled(placeholder, dim))
                } else {
                    Line::from(text)
                };
                frame.render_widget(Paragraph::new(line).style(body_style), area);
            }
            FormField::TextArea { textarea } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(if focused {
                            Color::Cyan
                        } else {
                            Color::Gray
                        })),
                );
                frame.render_widget(&**textarea, area);
            }
            FormField::Select {
                options,
                selected,
                list_state,
                answered,
            } => {
                let items: Vec<ListItem> = options
                    .iter()
                    .enumerate()
                    .map(|(i, opt)| {
                        let style = if i == *selected && *answered {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        ListItem::new(Span::styled(*opt, style))
                    })
                    .collect();
                let list = List::new(items)
                    .highlight_style(
                        Style::default()
                            .add_modifier(Modifier::REVERSED)
                            .fg(Color::Cyan),
                    )
                    .highlight_symbol("> ");
                frame.render_stateful_widget(list, area, list_state);
            }
            FormField::Toggle { value } => {
                let (yes_style, no_style) = match value {
                    Some(true) => (
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                        dim,
                    ),
                    Some(false) => (
                        dim,
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    None => (dim, dim),
                };
                let line = Line::from(vec![
                    Span::styled("[Yes]", yes_style),
                    Span::raw(" / "),
                    Span::styled("[No]", no_style),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            FormField::IntegerInput { value, min, max } => {
                let hint = format!("  ({min}..{max})");
                let line = if value.is_empty() && !focused {
                    Line::from(Span::styled(format!("number{hint}"), dim))
                } else {
                    Line::from(vec![
                        Span::raw(value.clone()),
                        Span::styled(hint, dim),
                    ])
                };
                frame.render_widget(Paragraph::new(line).style(body_style), area);
            }
            FormField::LocationPath { value } => {
                let line = if value.is_empty() {
                    Line::from(Span::styled("press Enter to pick a district", dim))
                } else {
                    Line::from(value.clone())
                };
                frame.render_widget(Paragraph::new(line).style(body_style), area);
            }
        }
    }
}

/// Shared single-line editing. `extra_chars = Some(..)` restricts which
/// printable characters are accepted (empty slice = movement keys only).
fn edit_line(
    value: &mut String,
    cursor_pos: &mut usize,
    key: KeyCode,
    extra_chars: Option<&[char]>,
) -> bool {
    match key {
        KeyCode::Char(c) => {
            if let Some(allowed) = extra_chars {
                if !allowed.contains(&c) {
                    return false;
                }
            }
            value.insert(*cursor_pos, c);
            *cursor_pos += 1;
            true
        }
        KeyCode::Backspace => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
                value.remove(*cursor_pos);
            }
            true
        }
        KeyCode::Delete => {
            if *cursor_pos < value.len() {
                value.remove(*cursor_pos);
            }
            true
        }
        KeyCode::Left => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
            }
            true
        }
        KeyCode::Right => {
            if *cursor_pos < value.len() {
                *cursor_pos += 1;
            }
            true
        }
        KeyCode::Home => {
            *cursor_pos = 0;
            true
        }
        KeyCode::End => {
            *cursor_pos = value.len();
            true
        }
        _ => false,
    }
}
