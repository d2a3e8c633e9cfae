use std::collections::HashSet;
use std::time::Instant;

use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::editor::EditorBridge;
use crate::input::{Action, Dispatch, InputMachine, JumpUnit, Overlay, Step};
use crate::model::{BucketFilter, Record};
use crate::store::{RecordStore, StoreError};
use crate::ui::theme::Theme;
use crate::view::agenda::{AGENDA_COLUMNS, jump_target, today_index};
use crate::view::month::{day_records, move_date};
use crate::view::{MonthFocus, ViewMode, clamp_index, step_index};

/// Interaction state shared by both views. Never persisted.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub view: ViewMode,
    pub agenda_index: usize,
    pub agenda_scroll: usize,
    pub agenda_column: usize,
    pub expand_all: bool,
    /// Rows whose expansion differs from `expand_all`.
    pub overrides: HashSet<Record>,
    pub bucket_filter: BucketFilter,
    pub month_date: NaiveDate,
    pub month_focus: MonthFocus,
    pub month_index: usize,
    pub month_scroll: usize,
    pub input: InputMachine,
}

impl ViewState {
    pub fn new(view: ViewMode, expand_all: bool, today: NaiveDate, input: InputMachine) -> Self {
        Self {
            view,
            agenda_index: 0,
            agenda_scroll: 0,
            agenda_column: 0,
            expand_all,
            overrides: HashSet::new(),
            bucket_filter: BucketFilter::All,
            month_date: today,
            month_focus: MonthFocus::Grid,
            month_index: 0,
            month_scroll: 0,
            input,
        }
    }

    pub fn is_expanded(&self, record: &Record) -> bool {
        self.expand_all ^ self.overrides.contains(record)
    }
}

/// Records to hand to the editor and the ones they replace, by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRequest {
    pub seeds: Vec<Record>,
    pub replacing: Vec<Record>,
}

const WRITES_BLOCKED: &str = "Storage error: records failed to load, changes are disabled";

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct App {
    pub records: Vec<Record>,
    pub state: ViewState,
    pub theme: Theme,
    pub should_quit: bool,
    store: Box<dyn RecordStore>,
    editor: Box<dyn EditorBridge>,
    pending_edit: Option<EditRequest>,
    clock: fn() -> NaiveDateTime,
    writes_blocked: bool,
}

impl App {
    pub fn new(
        config: &Config,
        theme: Theme,
        records: Vec<Record>,
        store: Box<dyn RecordStore>,
        editor: Box<dyn EditorBridge>,
    ) -> Self {
        let input = InputMachine::new(config.leader_timeout(), config.delete_timeout());
        let state = ViewState::new(config.default_view, config.expand_all, local_now().date(), input);
        Self {
            records,
            state,
            theme,
            should_quit: false,
            store,
            editor,
            pending_edit: None,
            clock: local_now,
            writes_blocked: false,
        }
    }

    /// Start after a failed load: the list stays empty, the error is shown,
    /// and nothing is written so the unread file is left as it was.
    pub fn with_load_error(mut self, err: &StoreError) -> Self {
        warn!(error = %err, "starting without records");
        self.writes_blocked = true;
        self.state.input.show_error(err.to_string());
        self
    }

    pub fn writes_blocked(&self) -> bool {
        self.writes_blocked
    }

    /// False, with an error overlay, while writes are blocked.
    fn check_writable(&mut self) -> bool {
        if self.writes_blocked {
            self.state.input.show_error(WRITES_BLOCKED);
        }
        !self.writes_blocked
    }

    /// Replace the wall clock used for "today".
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self.state.month_date = clock().date();
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)().date()
    }

    /// Records passing the bucket filter, in list order.
    pub fn visible_records(&self) -> Vec<&Record> {
        let filter = self.state.bucket_filter;
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Records of the month view's selected day that pass the filter.
    pub fn day_records(&self) -> Vec<&Record> {
        day_records(&self.visible_records(), self.state.month_date)
    }

    /// Record under the cursor in the active view, if any.
    pub fn selected_record(&self) -> Option<&Record> {
        match self.state.view {
            ViewMode::Agenda => self.visible_records().get(self.state.agenda_index).copied(),
            ViewMode::Month => match self.state.month_focus {
                MonthFocus::Grid => None,
                MonthFocus::Records => self.day_records().get(self.state.month_index).copied(),
            },
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        crate::ui::render(self, frame);
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        self.handle_input_at(key, Instant::now())
    }

    /// Feed one key press. Returns true when the screen needs a redraw.
    pub fn handle_input_at(&mut self, key: KeyEvent, now: Instant) -> bool {
        match self.state.input.feed(key, now) {
            Dispatch::Action(action) => {
                debug!(?action, view = ?self.state.view, "dispatch");
                self.apply(action);
                true
            }
            Dispatch::Pending | Dispatch::Consumed => true,
            Dispatch::Ignored => false,
        }
    }

    /// Expire pending key sequences. Returns true when the footer changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.state.input.tick(now)
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending_edit.is_some()
    }

    pub fn take_pending_edit(&mut self) -> Option<EditRequest> {
        self.pending_edit.take()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => {
                let next = if *self.state.input.overlay() == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                self.state.input.set_overlay(next);
            }
            Action::Cancel => {
                if self.state.view == ViewMode::Month {
                    self.state.month_focus = MonthFocus::Grid;
                }
            }
            Action::ToggleView => self.switch_view(self.state.view.toggled()),
            Action::ShowAgenda => self.switch_view(ViewMode::Agenda),
            Action::ShowMonth => self.switch_view(ViewMode::Month),
            Action::Today => self.jump_to_today(),
            Action::CycleBucket(step) => {
                self.state.bucket_filter = self.state.bucket_filter.cycle(step.is_forward());
                self.clamp_selection();
            }
            Action::ToggleExpandAll => {
                self.state.expand_all = !self.state.expand_all;
                self.state.overrides.clear();
            }
            Action::ToggleRowExpansion => {
                if let Some(record) = self.selected_record().cloned() {
                    if !self.state.overrides.remove(&record) {
                        self.state.overrides.insert(record);
                    }
                }
            }
            Action::MoveSelection(step) => self.move_selection(step),
            Action::MoveColumn(step) => self.move_column(step),
            Action::Jump(unit, step) => self.jump(unit, step),
            Action::ToggleFocus => self.toggle_focus(),
            Action::Edit => self.request_edit(),
            Action::Create => {
                if !self.check_writable() {
                    return;
                }
                let day = match self.state.view {
                    ViewMode::Agenda => self.today(),
                    ViewMode::Month => self.state.month_date,
                };
                self.pending_edit = Some(self.seed_request(day));
            }
            Action::Delete => self.delete_selected(),
        }
    }

    fn switch_view(&mut self, view: ViewMode) {
        if view == ViewMode::Month && self.state.view == ViewMode::Agenda {
            if let Some(record) = self.selected_record() {
                self.state.month_date = record.date();
            }
            self.state.month_focus = MonthFocus::Grid;
            self.state.month_index = 0;
            self.state.month_scroll = 0;
        }
        self.state.view = view;
    }

    fn jump_to_today(&mut self) {
        match self.state.view {
            ViewMode::Agenda => {
                let now = (self.clock)();
                self.state.agenda_index = today_index(&self.visible_records(), now);
            }
            ViewMode::Month => {
                self.state.month_date = self.today();
                self.state.month_index = 0;
                self.state.month_scroll = 0;
                if self.day_records().is_empty() {
                    self.state.month_focus = MonthFocus::Grid;
                }
            }
        }
    }

    fn move_selection(&mut self, step: Step) {
        match (self.state.view, self.state.month_focus) {
            (ViewMode::Agenda, _) => {
                let len = self.visible_records().len();
                self.state.agenda_index = step_index(self.state.agenda_index, step.delta(), len);
            }
            (ViewMode::Month, MonthFocus::Grid) => self.move_month_date(JumpUnit::Week, step),
            (ViewMode::Month, MonthFocus::Records) => {
                let len = self.day_records().len();
                self.state.month_index = step_index(self.state.month_index, step.delta(), len);
            }
        }
    }

    fn move_column(&mut self, step: Step) {
        match (self.state.view, self.state.month_focus) {
            (ViewMode::Agenda, _) => {
                let last = AGENDA_COLUMNS.len() - 1;
                self.state.agenda_column = step_index(self.state.agenda_column, step.delta(), last + 1);
            }
            (ViewMode::Month, MonthFocus::Grid) => self.move_month_date(JumpUnit::Day, step),
            (ViewMode::Month, MonthFocus::Records) => {}
        }
    }

    fn jump(&mut self, unit: JumpUnit, step: Step) {
        match self.state.view {
            ViewMode::Agenda => {
                let visible = self.visible_records();
                if let Some(target) = jump_target(&visible, self.state.agenda_index, unit, step) {
                    self.state.agenda_index = target;
                }
            }
            ViewMode::Month => self.move_month_date(unit, step),
        }
    }

    /// Move the month cursor. Leaves the records pane when the new day has
    /// nothing to show.
    fn move_month_date(&mut self, unit: JumpUnit, step: Step) {
        self.state.month_date = move_date(self.state.month_date, unit, step);
        self.state.month_index = 0;
        self.state.month_scroll = 0;
        if self.day_records().is_empty() {
            self.state.month_focus = MonthFocus::Grid;
        }
    }

    fn toggle_focus(&mut self) {
        if self.state.view != ViewMode::Month {
            return;
        }
        self.state.month_focus = match self.state.month_focus {
            MonthFocus::Grid if !self.day_records().is_empty() => {
                self.state.month_index = 0;
                self.state.month_scroll = 0;
                MonthFocus::Records
            }
            _ => MonthFocus::Grid,
        };
    }

    fn seed_request(&self, day: NaiveDate) -> EditRequest {
        EditRequest {
            seeds: vec![Record::seed(day, self.state.bucket_filter.bucket())],
            replacing: Vec::new(),
        }
    }

    fn request_edit(&mut self) {
        if !self.check_writable() {
            return;
        }
        let request = match self.state.view {
            ViewMode::Agenda => match self.selected_record() {
                Some(record) => EditRequest {
                    seeds: vec![record.clone()],
                    replacing: vec![record.clone()],
                },
                None => self.seed_request(self.today()),
            },
            ViewMode::Month => {
                let targets: Vec<Record> = match self.state.month_focus {
                    MonthFocus::Records => self.selected_record().cloned().into_iter().collect(),
                    MonthFocus::Grid => self.day_records().into_iter().cloned().collect(),
                };
                if targets.is_empty() {
                    self.seed_request(self.state.month_date)
                } else {
                    EditRequest {
                        seeds: targets.clone(),
                        replacing: targets,
                    }
                }
            }
        };
        self.pending_edit = Some(request);
    }

    /// Run the queued edit through the editor and store. The caller suspends
    /// the terminal around this call.
    pub fn run_pending_edit(&mut self) {
        if let Some(request) = self.pending_edit.take() {
            self.run_edit(request);
        }
    }

    pub fn run_edit(&mut self, request: EditRequest) {
        if !self.check_writable() {
            return;
        }
        let results = match self.editor.edit(&request.seeds) {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "edit failed");
                self.state.input.show_error(err.to_string());
                return;
            }
        };
        if results.is_empty() {
            self.state.input.show_message("Nothing to save");
            return;
        }

        let mut records = self.records.clone();
        let mut last_saved = None;
        let mut failure = None;
        for (idx, record) in results.into_iter().enumerate() {
            match self
                .store
                .upsert(&records, record.clone(), request.replacing.get(idx))
            {
                Ok(next) => {
                    records = next;
                    last_saved = Some(record);
                }
                Err(err) => {
                    warn!(error = %err, "save failed");
                    failure = Some(err.to_string());
                    break;
                }
            }
        }

        self.records = records;
        if let Some(message) = failure {
            self.state.input.show_error(message);
        }
        match last_saved {
            Some(record) => {
                info!(count = self.records.len(), "records updated");
                self.reselect(&record);
            }
            None => self.clamp_selection(),
        }
    }

    fn delete_selected(&mut self) {
        if !self.check_writable() {
            return;
        }
        let Some(target) = self.selected_record().cloned() else {
            return;
        };
        match self.store.delete(&self.records, &target) {
            Ok(next) => {
                info!(remaining = next.len(), "record deleted");
                self.records = next;
                self.clamp_selection();
            }
            Err(err) => {
                warn!(error = %err, "delete failed");
                self.state.input.show_error(err.to_string());
            }
        }
    }

    /// Point the active view at `identity` after the list was replaced,
    /// falling back to clamping the current position.
    fn reselect(&mut self, identity: &Record) {
        self.prune_overrides();
        match self.state.view {
            ViewMode::Agenda => {
                match self.visible_records().iter().position(|r| *r == identity) {
                    Some(idx) => self.state.agenda_index = idx,
                    None => self.clamp_selection(),
                }
            }
            ViewMode::Month => {
                if !self.state.bucket_filter.matches(identity) {
                    self.clamp_selection();
                    return;
                }
                self.state.month_date = identity.date();
                self.state.month_index = self
                    .day_records()
                    .iter()
                    .position(|r| *r == identity)
                    .unwrap_or(0);
            }
        }
    }

    fn prune_overrides(&mut self) {
        let records = &self.records;
        self.state.overrides.retain(|r| records.contains(r));
    }

    /// Keep every index inside its list after any mutation.
    pub fn clamp_selection(&mut self) {
        self.prune_overrides();
        let agenda_len = self.visible_records().len();
        self.state.agenda_index = clamp_index(self.state.agenda_index, agenda_len);
        let day_len = self.day_records().len();
        self.state.month_index = clamp_index(self.state.month_index, day_len);
        if day_len == 0 {
            self.state.month_focus = MonthFocus::Grid;
        }
    }
}
