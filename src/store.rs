//! Process-wide application state, provided once via context at startup.

use leptos::prelude::*;

/// The four mutually-exclusive screens of the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
	Analysis,
	Communities,
	EntityExplorer,
	RelationshipGraph,
}

/// A backend dataset the data screens can filter by.
///
/// The value is forwarded verbatim as the `report` query parameter; the
/// backend treats `tesla` specially and anything else as the latest run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
	Tesla,
	Latest,
}

impl Report {
	pub fn query_value(self) -> &'static str {
		match self {
			Report::Tesla => "tesla",
			Report::Latest => "latest",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Report::Tesla => "Tesla report",
			Report::Latest => "Latest run",
		}
	}
}

/// Where an analysis run currently stands. Strictly forward:
/// start -> running -> finish; a new run resets through running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisState {
	Start,
	Running,
	Finish,
}

/// One progress update from the analyze stream, timestamped at capture.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisEvent {
	pub stage: String,
	pub message: String,
	pub at_ms: f64,
}

/// Shared state container. All fields are signals, so the struct is `Copy`
/// and can be handed to every view; mutation goes through the methods
/// below only.
#[derive(Clone, Copy)]
pub struct AppStore {
	pub screen: RwSignal<Screen>,
	pub selected_report: RwSignal<Option<Report>>,
	pub analysis_state: RwSignal<AnalysisState>,
	pub analysis_events: RwSignal<Vec<AnalysisEvent>>,
	pub loading_dots: RwSignal<u8>,
}

impl AppStore {
	pub fn new() -> Self {
		Self {
			screen: RwSignal::new(Screen::Analysis),
			selected_report: RwSignal::new(None),
			analysis_state: RwSignal::new(AnalysisState::Start),
			analysis_events: RwSignal::new(Vec::new()),
			loading_dots: RwSignal::new(1),
		}
	}

	/// Fetch the store provided by [`crate::App`].
	pub fn use_store() -> Self {
		expect_context::<AppStore>()
	}

	pub fn go_to(&self, screen: Screen) {
		self.screen.set(screen);
	}

	pub fn select_report(&self, report: Report) {
		self.selected_report.set(Some(report));
	}

	/// Arm a new run: clears the previous event log and enters `Running`.
	pub fn begin_analysis(&self) {
		self.clear_events();
		self.analysis_state.set(AnalysisState::Running);
	}

	pub fn finish_analysis(&self) {
		self.analysis_state.set(AnalysisState::Finish);
	}

	pub fn clear_events(&self) {
		self.analysis_events.set(Vec::new());
	}

	/// Append one event, preserving arrival order.
	pub fn push_event(&self, event: AnalysisEvent) {
		self.analysis_events.update(|events| events.push(event));
	}

	/// Advance the textual loading animation: 1,2,3,4,5,1,...
	/// Only moves while a run is in flight.
	pub fn tick_dots(&self) {
		if self.analysis_state.get_untracked() != AnalysisState::Running {
			return;
		}
		self.loading_dots.update(|dots| *dots = *dots % 5 + 1);
	}
}

impl Default for AppStore {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn event(stage: &str, message: &str, at_ms: f64) -> AnalysisEvent {
		AnalysisEvent {
			stage: stage.to_string(),
			message: message.to_string(),
			at_ms,
		}
	}

	#[test]
	fn defaults() {
		let store = AppStore::new();
		assert_eq!(store.screen.get_untracked(), Screen::Analysis);
		assert_eq!(store.selected_report.get_untracked(), None);
		assert_eq!(store.analysis_state.get_untracked(), AnalysisState::Start);
		assert!(store.analysis_events.get_untracked().is_empty());
		assert_eq!(store.loading_dots.get_untracked(), 1);
	}

	#[test]
	fn run_moves_forward_only() {
		let store = AppStore::new();
		store.begin_analysis();
		assert_eq!(store.analysis_state.get_untracked(), AnalysisState::Running);
		store.finish_analysis();
		assert_eq!(store.analysis_state.get_untracked(), AnalysisState::Finish);

		// Re-arming a finished run resets through Running and wipes the log.
		store.push_event(event("complete", "done", 3.0));
		store.begin_analysis();
		assert_eq!(store.analysis_state.get_untracked(), AnalysisState::Running);
		assert!(store.analysis_events.get_untracked().is_empty());
	}

	#[test]
	fn events_append_in_order() {
		let store = AppStore::new();
		store.push_event(event("ranking", "first", 1.0));
		store.push_event(event("saving", "second", 2.0));
		let events = store.analysis_events.get_untracked();
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].stage, "ranking");
		assert_eq!(events[1].stage, "saving");
	}

	#[test]
	fn dots_cycle_one_to_five_while_running() {
		let store = AppStore::new();

		// Not running: the counter must not move.
		store.tick_dots();
		assert_eq!(store.loading_dots.get_untracked(), 1);

		store.begin_analysis();
		let mut seen = Vec::new();
		for _ in 0..6 {
			store.tick_dots();
			seen.push(store.loading_dots.get_untracked());
		}
		assert_eq!(seen, vec![2, 3, 4, 5, 1, 2]);

		store.finish_analysis();
		store.tick_dots();
		assert_eq!(store.loading_dots.get_untracked(), 2);
	}

	#[test]
	fn report_query_values() {
		assert_eq!(Report::Tesla.query_value(), "tesla");
		assert_eq!(Report::Latest.query_value(), "latest");
	}
}
