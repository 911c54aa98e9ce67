//! The interactive biodata wizard screen.
//!
//! Owns a [`WizardController`] and renders one step at a time: a step
//! indicator gated by furthest progress, the step's form fields, and the
//! validation errors from the last advance attempt. Navigation policy lives
//! here (which steps are clickable); step semantics live in the controller.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::form_field::FormField;
use crate::ui::picker::{OptionPicker, PickerEvent};
use crate::wizard::{step_schema, FieldSpec, WizardController};

/// What a key press did to the wizard as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    /// Still running
    Continue,
    /// All steps validated and confirmed
    Finished,
    /// User backed out of the wizard
    Cancelled,
}

pub struct WizardScreen {
    controller: WizardController,
    fields: Vec<(&'static FieldSpec, FormField)>,
    focused: usize,
    picker: Option<OptionPicker>,
    feedback: Option<String>,
}

impl WizardScreen {
    pub fn new() -> Self {
        let mut screen = Self {
            controller: WizardController::standard(),
            fields: Vec::new(),
            focused: 0,
            picker: None,
            feedback: None,
        };
        screen.rebuild_fields();
        screen
    }

    /// Resume a previous session (e.g. a saved draft).
    pub fn with_controller(controller: WizardController) -> Self {
        let mut screen = Self {
            controller,
            fields: Vec::new(),
            focused: 0,
            picker: None,
            feedback: None,
        };
        screen.rebuild_fields();
        screen
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    /// Take the controller out of a finished wizard.
    pub fn into_controller(self) -> WizardController {
        self.controller
    }

    /// Rebuild the widget list for the current step, prefilled from the
    /// accumulated form data.
    fn rebuild_fields(&mut self) {
        self.fields.clear();
        self.focused = 0;
        if let Some(schema) = step_schema(self.controller.current_step()) {
            for spec in schema.fields {
                let existing = self.controller.field(spec.name);
                self.fields.push((spec, FormField::from_spec(spec, existing)));
            }
        }
    }

    /// Push every answered widget value into the controller.
    fn sync_to_controller(&mut self) {
        let updates: Vec<(String, crate::wizard::FieldValue)> = self
            .fields
            .iter()
            .filter_map(|(spec, field)| field.value().map(|v| (spec.name.to_string(), v)))
            .collect();
        self.controller.update_form_data(updates);
    }

    /// Validate and move forward; finishes the wizard on the last step.
    fn advance(&mut self) -> ScreenEvent {
        self.sync_to_controller();
        if !self.controller.validate_current_step() {
            self.feedback = Some(format!(
                "{} field(s) need attention",
                self.controller.errors().len()
            ));
            return ScreenEvent::Continue;
        }

        let step = self.controller.current_step();
        self.controller.mark_step_complete(step);
        self.feedback = None;

        if self.controller.is_last_step() {
            return ScreenEvent::Finished;
        }
        self.controller.next_step();
        self.rebuild_fields();
        ScreenEvent::Continue
    }

    /// Go back one step, keeping everything typed so far.
    fn retreat(&mut self) -> ScreenEvent {
        if self.controller.is_first_step() {
            return ScreenEvent::Cancelled;
        }
        self.sync_to_controller();
        self.controller.prev_step();
        self.rebuild_fields();
        self.feedback = None;
        ScreenEvent::Continue
    }

    /// Direct jump, gated by the step indicator's reachability policy:
    /// only steps up to the furthest one reached are clickable.
    pub fn jump_to(&mut self, step: u8) {
        if step <= self.controller.highest_step_reached() {
            self.sync_to_controller();
            self.controller.go_to_step(step);
            self.rebuild_fields();
            self.feedback = None;
        } else {
            self.feedback = Some("complete the current step first".to_string());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenEvent {
        if key.kind == KeyEventKind::Release {
            return ScreenEvent::Continue;
        }

        // The picker overlay owns input while open.
        if let Some(picker) = self.picker.as_mut() {
            match picker.handle_key(key.code) {
                PickerEvent::Picked(district) => {
                    let path = format!("Bangladesh > {district}");
                    if let Some((_, field)) = self.fields.get_mut(self.focused) {
                        field.set_location(path);
                    }
                    self.picker = None;
                }
                PickerEvent::Cancelled => self.picker = None,
                PickerEvent::Open => {}
            }
            return ScreenEvent::Continue;
        }

        match key.code {
            KeyCode::Esc => return self.retreat(),
            KeyCode::Enter => {
                let opens_picker = self
                    .fields
                    .get(self.focused)
                    .is_some_and(|(_, field)| field.wants_picker());
                if opens_picker {
                    self.picker = Some(OptionPicker::districts());
                    return ScreenEvent::Continue;
                }
                return self.advance();
            }
            KeyCode::PageDown => return self.advance(),
            KeyCode::PageUp => return self.retreat(),
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::F(n) => self.jump_to(n as u8),
            code => {
                let consumed = self
                    .fields
                    .get_mut(self.focused)
                    .map(|(_, field)| field.handle_key(code))
                    .unwrap_or(false);
                if !consumed {
                    match code {
                        KeyCode::Down => self.focus_next(),
                        KeyCode::Up => self.focus_prev(),
                        _ => {}
                    }
                }
            }
        }
        ScreenEvent::Continue
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = if self.focused == 0 {
                self.fields.len() - 1
            } else {
                self.focused - 1
            };
        }
    }

    /// Step indicator line: completed steps get a check, the current step
    /// is highlighted, unreached steps are dimmed and not clickable.
    fn indicator_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for step in 1..=self.controller.total_steps() {
            let completed = self.controller.completed_steps().contains(&step);
            let current = step == self.controller.current_step();
            let reachable = step <= self.controller.highest_step_reached();

            let label = if completed {
                format!(" {step}\u{2713} ")
            } else {
                format!(" {step} ")
            };
            let style = if current {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if completed {
                Style::default().fg(Color::Green)
            } else if reachable {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(label, style));
        }
        Line::from(spans)
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // title + indicator
                Constraint::Min(5),    // fields
                Constraint::Length(2), // feedback + hints
            ])
            .split(area);

        let title = step_schema(self.controller.current_step())
            .map(|s| s.title)
            .unwrap_or("Biodata");
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                format!(
                    "Biodata wizard: {} (step {}/{})",
                    title,
                    self.controller.current_step(),
                    self.controller.total_steps()
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            self.indicator_line(),
        ]);
        frame.render_widget(header, chunks[0]);

        self.render_fields(frame, chunks[1]);

        let errors = self.controller.errors();
        let status = if let Some(ref feedback) = self.feedback {
            Span::styled(feedback.clone(), Style::default().fg(Color::Red))
        } else if errors.is_empty() {
            Span::styled(
                "Enter continue | Esc back | Tab next field | F1-F5 jump",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::styled(
                errors
                    .values()
                    .next()
                    .cloned()
                    .unwrap_or_default(),
                Style::default().fg(Color::Red),
            )
        };
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[2]);

        if let Some(picker) = self.picker.as_mut() {
            let modal = centered_rect(area, 40, 14);
            picker.render(frame, modal);
        }
    }

    fn render_fields(&mut self, frame: &mut Frame, area: Rect) {
        let errors = self.controller.errors().clone();
        let mut y = area.y;
        let focused = self.focused;
        for (idx, (spec, field)) in self.fields.iter_mut().enumerate() {
            if y >= area.y + area.height {
                break;
            }
            let has_error = errors.contains_key(spec.name);
            let marker = if spec.required { "*" } else { " " };
            let label_style = if idx == focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if has_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Gray)
            };
            let label_area = Rect {
                x: area.x,
                y,
                width: 28.min(area.width),
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{marker}{}", spec.label),
                    label_style,
                )),
                label_area,
            );

            let field_height = field.render_height();
            let field_area = Rect {
                x: area.x + 29.min(area.width.saturating_sub(1)),
                y,
                width: area.width.saturating_sub(30),
                height: field_height.min((area.y + area.height).saturating_sub(y)),
            };
            field.render(frame, field_area, idx == focused);
            y += field_height;
        }
    }
}

impl Default for WizardScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(screen: &mut WizardScreen, s: &str) {
        for c in s.chars() {
            screen.handle_key(press(KeyCode::Char(c)));
        }
    }

    /// Answer every field of step 1 through key events.
    fn fill_step_one(screen: &mut WizardScreen) {
        // religion, biodataType, maritalStatus: selects answered with Space
        for _ in 0..3 {
            screen.handle_key(press(KeyCode::Char(' ')));
            screen.handle_key(press(KeyCode::Tab));
        }
        // dateOfBirth
        type_str(screen, "1998-04-12");
        screen.handle_key(press(KeyCode::Tab));
        // age, height, weight
        for digits in ["27", "172", "68"] {
            type_str(screen, digits);
            screen.handle_key(press(KeyCode::Tab));
        }
        // complexion
        screen.handle_key(press(KeyCode::Char(' ')));
        screen.handle_key(press(KeyCode::Tab));
        // profession
        type_str(screen, "Engineer");
        screen.handle_key(press(KeyCode::Tab));
        // bloodGroup
        screen.handle_key(press(KeyCode::Char(' ')));
        screen.handle_key(press(KeyCode::Tab));
        // permanentLocation via picker
        screen.handle_key(press(KeyCode::Enter)); // opens picker
        type_str(screen, "tangail");
        screen.handle_key(press(KeyCode::Enter)); // picks Tangail
        screen.handle_key(press(KeyCode::Tab));
        // permanentArea
        type_str(screen, "Sadar");
        screen.handle_key(press(KeyCode::Tab));
        // healthIssues
        type_str(screen, "None");
        screen.handle_key(press(KeyCode::Tab));
        // sameAsPermanent
        screen.handle_key(press(KeyCode::Char('y')));
    }

    #[test]
    fn test_screen_starts_on_step_one() {
        let screen = WizardScreen::new();
        assert_eq!(screen.controller().current_step(), 1);
        assert!(!screen.fields.is_empty());
    }

    #[test]
    fn test_advance_blocked_until_step_valid() {
        let mut screen = WizardScreen::new();
        let event = screen.handle_key(press(KeyCode::PageDown));
        assert_eq!(event, ScreenEvent::Continue);
        assert_eq!(screen.controller().current_step(), 1);
        assert!(!screen.controller().errors().is_empty());
    }

    #[test]
    fn test_filled_step_one_advances() {
        let mut screen = WizardScreen::new();
        fill_step_one(&mut screen);

        let event = screen.handle_key(press(KeyCode::PageDown));
        assert_eq!(event, ScreenEvent::Continue);
        assert_eq!(screen.controller().current_step(), 2);
        assert!(screen.controller().completed_steps().contains(&1));
        assert!(screen.controller().errors().is_empty());
    }

    #[test]
    fn test_esc_on_first_step_cancels() {
        let mut screen = WizardScreen::new();
        assert_eq!(screen.handle_key(press(KeyCode::Esc)), ScreenEvent::Cancelled);
    }

    #[test]
    fn test_esc_goes_back_and_keeps_values() {
        let mut screen = WizardScreen::new();
        fill_step_one(&mut screen);
        screen.handle_key(press(KeyCode::PageDown));
        assert_eq!(screen.controller().current_step(), 2);

        screen.handle_key(press(KeyCode::Esc));
        assert_eq!(screen.controller().current_step(), 1);
        // Back on step 1 the profession survives the round trip.
        assert_eq!(
            screen.controller().field("profession").map(ToString::to_string),
            Some("Engineer".to_string())
        );
        // Going back never lowers the furthest progress.
        assert_eq!(screen.controller().highest_step_reached(), 2);
    }

    #[test]
    fn test_jump_gated_by_progress() {
        let mut screen = WizardScreen::new();
        screen.jump_to(3);
        assert_eq!(screen.controller().current_step(), 1);
        assert!(screen.feedback.is_some());

        fill_step_one(&mut screen);
        screen.handle_key(press(KeyCode::PageDown));
        screen.jump_to(1);
        assert_eq!(screen.controller().current_step(), 1);
        screen.jump_to(2);
        assert_eq!(screen.controller().current_step(), 2);
    }

    #[test]
    fn test_picker_fills_location_path() {
        let mut screen = WizardScreen::new();
        // focus the permanentLocation field
        while !screen
            .fields
            .get(screen.focused)
            .map(|(spec, _)| spec.name == "permanentLocation")
            .unwrap_or(false)
        {
            screen.handle_key(press(KeyCode::Tab));
        }
        screen.handle_key(press(KeyCode::Enter));
        assert!(screen.picker.is_some());

        type_str(&mut screen, "gazipur");
        screen.handle_key(press(KeyCode::Enter));
        assert!(screen.picker.is_none());

        screen.sync_to_controller();
        assert_eq!(
            screen
                .controller()
                .field("permanentLocation")
                .map(ToString::to_string),
            Some("Bangladesh > Gazipur".to_string())
        );
    }
}
