//! Paged option picker with type-ahead filtering.
//!
//! Used for long fixed lists that do not fit a select widget, currently the
//! district choice in the location step. Typing narrows the list; paging
//! and selection always operate on the filtered view.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Districts of Bangladesh, the option list for the location step.
pub const DISTRICTS: &[&str] = &[
    "Bagerhat", "Bandarban", "Barguna", "Barishal", "Bhola", "Bogura", "Brahmanbaria", "Chandpur",
    "Chapai Nawabganj", "Chattogram", "Chuadanga", "Cox's Bazar", "Cumilla", "Dhaka", "Dinajpur",
    "Faridpur", "Feni", "Gaibandha", "Gazipur", "Gopalganj", "Habiganj", "Jamalpur", "Jashore",
    "Jhalakathi", "Jhenaidah", "Joypurhat", "Khagrachhari", "Khulna", "Kishoreganj", "Kurigram",
    "Kushtia", "Lakshmipur", "Lalmonirhat", "Madaripur", "Magura", "Manikganj", "Meherpur",
    "Moulvibazar", "Munshiganj", "Mymensingh", "Naogaon", "Narail", "Narayanganj", "Narsingdi",
    "Natore", "Netrokona", "Nilphamari", "Noakhali", "Pabna", "Panchagarh", "Patuakhali",
    "Pirojpur", "Rajbari", "Rajshahi", "Rangamati", "Rangpur", "Satkhira", "Shariatpur",
    "Sherpur", "Sirajganj", "Sunamganj", "Sylhet", "Tangail", "Thakurgaon",
];

/// What a key press did to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// Still open, state may have changed
    Open,
    /// User confirmed the highlighted option
    Picked(String),
    /// User dismissed the picker
    Cancelled,
}

/// A modal list picker over a fixed option set.
pub struct OptionPicker {
    title: String,
    options: Vec<String>,
    filter: String,
    /// Index into the filtered view
    selected: usize,
    page_size: usize,
    list_state: ListState,
}

impl OptionPicker {
    pub fn new(title: &str, options: &[&str], page_size: usize) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            title: title.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
            filter: String::new(),
            selected: 0,
            page_size: page_size.max(1),
            list_state,
        }
    }

    pub fn districts() -> Self {
        Self::new("Pick a district", DISTRICTS, 10)
    }

    /// Options surviving the current filter, in list order.
    pub fn filtered(&self) -> Vec<&str> {
        let needle = self.filter.to_lowercase();
        self.options
            .iter()
            .filter(|opt| needle.is_empty() || opt.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Pages over the filtered view, never zero.
    pub fn total_pages(&self) -> usize {
        let count = self.filtered().len();
        if count == 0 {
            1
        } else {
            count.div_ceil(self.page_size)
        }
    }

    /// 1-indexed page of the current selection.
    pub fn current_page(&self) -> usize {
        self.selected / self.page_size + 1
    }

    pub fn selected_option(&self) -> Option<String> {
        self.filtered().get(self.selected).map(ToString::to_string)
    }

    fn clamp_selection(&mut self) {
        let count = self.filtered().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
        self.list_state.select(Some(self.selected % self.page_size));
    }

    pub fn select_next(&mut self) {
        let count = self.filtered().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
        self.clamp_selection();
    }

    pub fn select_prev(&mut self) {
        let count = self.filtered().len();
        if count > 0 {
            self.selected = if self.selected == 0 {
                count - 1
            } else {
                self.selected - 1
            };
        }
        self.clamp_selection();
    }

    pub fn next_page(&mut self) {
        let count = self.filtered().len();
        if count > 0 {
            self.selected = (self.selected + self.page_size).min(count - 1);
        }
        self.clamp_selection();
    }

    pub fn prev_page(&mut self) {
        self.selected = self.selected.saturating_sub(self.page_size);
        self.clamp_selection();
    }

    /// Feed one key press into the picker.
    pub fn handle_key(&mut self, key: KeyCode) -> PickerEvent {
        match key {
            KeyCode::Esc => PickerEvent::Cancelled,
            KeyCode::Enter => match self.selected_option() {
                Some(option) => PickerEvent::Picked(option),
                None => PickerEvent::Open,
            },
            KeyCode::Up => {
                self.select_prev();
                PickerEvent::Open
            }
            KeyCode::Down => {
                self.select_next();
                PickerEvent::Open
            }
            KeyCode::PageDown => {
                self.next_page();
                PickerEvent::Open
            }
            KeyCode::PageUp => {
                self.prev_page();
                PickerEvent::Open
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.selected = 0;
                self.clamp_selection();
                PickerEvent::Open
            }
            KeyCode::Char(c) if c.is_alphanumeric() || c == ' ' || c == '\'' => {
                self.filter.push(c);
                self.selected = 0;
                self.clamp_selection();
                PickerEvent::Open
            }
            _ => PickerEvent::Open,
        }
    }

    /// Render the picker as a modal over `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let filtered: Vec<String> = self.filtered().iter().map(ToString::to_string).collect();
        let page_start = (self.selected / self.page_size) * self.page_size;
        let page_items: Vec<ListItem> = filtered
            .iter()
            .skip(page_start)
            .take(self.page_size)
            .map(|opt| ListItem::new(opt.clone()))
            .collect();

        let footer = if filtered.is_empty() {
            "no match".to_string()
        } else {
            format!(
                "{} match(es)  page {}/{}",
                filtered.len(),
                self.current_page(),
                self.total_pages()
            )
        };

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let filter_line = Line::from(vec![
            Span::styled("filter: ", Style::default().fg(Color::DarkGray)),
            Span::raw(self.filter.clone()),
            Span::styled("|", Style::default().fg(Color::Cyan)),
        ]);
        let filter_area = Rect { height: 1, ..inner };
        frame.render_widget(Paragraph::new(filter_line), filter_area);

        let list_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(2),
            ..inner
        };
        let list = List::new(page_items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        let footer_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };
        frame.render_widget(
            Paragraph::new(Span::styled(footer, Style::default().fg(Color::DarkGray))),
            footer_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_picker_pages_all_districts() {
        let picker = OptionPicker::districts();
        assert_eq!(picker.filtered().len(), DISTRICTS.len());
        assert_eq!(picker.total_pages(), DISTRICTS.len().div_ceil(10));
    }

    #[test]
    fn test_typeahead_narrows_the_view() {
        let mut picker = OptionPicker::districts();
        for c in "syl".chars() {
            picker.handle_key(KeyCode::Char(c));
        }
        assert_eq!(picker.filtered(), vec!["Sylhet"]);
        assert_eq!(picker.total_pages(), 1);
        assert_eq!(picker.selected_option().as_deref(), Some("Sylhet"));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut picker = OptionPicker::districts();
        for c in "GANJ".chars() {
            picker.handle_key(KeyCode::Char(c));
        }
        let matches = picker.filtered();
        assert!(matches.contains(&"Gopalganj"));
        assert!(matches.contains(&"Sirajganj"));
        assert!(!matches.contains(&"Dhaka"));
    }

    #[test]
    fn test_selection_wraps_over_filtered_view() {
        let mut picker = OptionPicker::new("t", &["alpha", "beta"], 10);
        picker.select_next();
        assert_eq!(picker.selected_option().as_deref(), Some("beta"));
        picker.select_next();
        assert_eq!(picker.selected_option().as_deref(), Some("alpha"));
        picker.select_prev();
        assert_eq!(picker.selected_option().as_deref(), Some("beta"));
    }

    #[test]
    fn test_paging_clamps_at_the_tail() {
        let mut picker = OptionPicker::districts();
        for _ in 0..100 {
            picker.next_page();
        }
        assert_eq!(picker.current_page(), picker.total_pages());
        assert!(picker.selected_option().is_some());
    }

    #[test]
    fn test_enter_picks_and_esc_cancels() {
        let mut picker = OptionPicker::districts();
        for c in "tangail".chars() {
            picker.handle_key(KeyCode::Char(c));
        }
        assert_eq!(
            picker.handle_key(KeyCode::Enter),
            PickerEvent::Picked("Tangail".to_string())
        );
        assert_eq!(picker.handle_key(KeyCode::Esc), PickerEvent::Cancelled);
    }

    #[test]
    fn test_enter_on_empty_filter_result_stays_open() {
        let mut picker = OptionPicker::districts();
        for c in "zzz".chars() {
            picker.handle_key(KeyCode::Char(c));
        }
        assert!(picker.filtered().is_empty());
        assert_eq!(picker.handle_key(KeyCode::Enter), PickerEvent::Open);
    }

    #[test]
    fn test_backspace_widens_the_view_again() {
        let mut picker = OptionPicker::districts();
        for c in "sylhet".chars() {
            picker.handle_key(KeyCode::Char(c));
        }
        assert_eq!(picker.filtered().len(), 1);
        for _ in 0.."sylhet".len() {
            picker.handle_key(KeyCode::Backspace);
        }
        assert_eq!(picker.filtered().len(), DISTRICTS.len());
    }
}
