//! Input/trigger screen: starts an analysis run, tails its progress log,
//! and hands off to the communities view once the run finishes.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::stream::run_analysis;
use crate::store::{AnalysisState, AppStore, Report, Screen};

const DOTS_INTERVAL_MS: u32 = 350;

/// Human label for a backend stage; unknown stages pass through as-is.
pub fn stage_label(stage: &str) -> String {
	match stage {
		"crawling_reddit" => "Crawling Reddit",
		"searching_google" => "Searching Google",
		"asking_gemini" => "Asking Gemini",
		"aggregating" => "Aggregating sources",
		"aggregated" => "Sources aggregated",
		"ranking" => "Ranking subreddits",
		"processing_batch" => "Processing batch",
		"saving" => "Saving results",
		"extracting" => "Extracting entities",
		"batch_completed" => "Batch completed",
		"building_entities" => "Building entity list",
		"storing" => "Storing relationships",
		"complete" => "Complete",
		"error" => "Error",
		other => return other.to_string(),
	}
	.to_string()
}

/// Offset of an event from the start of the run, for the log margin.
pub fn offset_label(first_at_ms: f64, at_ms: f64) -> String {
	format!("+{:.1}s", (at_ms - first_at_ms) / 1000.0)
}

#[component]
pub fn AnalysisPage() -> impl IntoView {
	let store = AppStore::use_store();

	let start = move |_| {
		if store.analysis_state.get_untracked() == AnalysisState::Running {
			return;
		}
		run_analysis(store);
		// Drive the "Analyzing..." dots while this run is in flight.
		spawn_local(async move {
			while store.analysis_state.get_untracked() == AnalysisState::Running {
				TimeoutFuture::new(DOTS_INTERVAL_MS).await;
				store.tick_dots();
			}
		});
	};

	let open_report = move |report: Report| {
		store.select_report(report);
		store.go_to(Screen::Communities);
	};

	view! {
		<section class="screen analysis-screen">
			<h1>"Community analysis"</h1>
			<p class="subtitle">
				"Discover and rank communities, then explore the entity relationships mined from them."
			</p>

			<button
				class="primary"
				disabled=move || store.analysis_state.get() == AnalysisState::Running
				on:click=start
			>
				{move || match store.analysis_state.get() {
					AnalysisState::Start => "Run analysis",
					AnalysisState::Running => "Running...",
					AnalysisState::Finish => "Run again",
				}}
			</button>

			{move || (store.analysis_state.get() == AnalysisState::Running).then(|| view! {
				<p class="analyzing">
					"Analyzing" {move || ".".repeat(store.loading_dots.get() as usize)}
				</p>
			})}

			<div class="event-log">
				{move || {
					let events = store.analysis_events.get();
					let first_at = events.first().map(|e| e.at_ms).unwrap_or(0.0);
					events
						.iter()
						.map(|event| {
							let stage_class = if event.stage == "error" {
								"event-stage error"
							} else {
								"event-stage"
							};
							view! {
								<div class="event-row">
									<span class="event-offset">{offset_label(first_at, event.at_ms)}</span>
									<span class=stage_class>{stage_label(&event.stage)}</span>
									<span class="event-message">{event.message.clone()}</span>
								</div>
							}
						})
						.collect_view()
				}}
			</div>

			{move || (store.analysis_state.get() == AnalysisState::Finish).then(|| view! {
				<div class="report-pickers">
					<p>"Browse a report:"</p>
					<button on:click=move |_| open_report(Report::Tesla)>
						{Report::Tesla.label()}
					</button>
					<button on:click=move |_| open_report(Report::Latest)>
						{Report::Latest.label()}
					</button>
				</div>
			})}
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_stages_get_labels() {
		assert_eq!(stage_label("ranking"), "Ranking subreddits");
		assert_eq!(stage_label("complete"), "Complete");
	}

	#[test]
	fn unknown_stages_pass_through() {
		assert_eq!(stage_label("warming_up"), "warming_up");
	}

	#[test]
	fn offsets_are_relative_to_the_first_event() {
		assert_eq!(offset_label(1_000.0, 1_000.0), "+0.0s");
		assert_eq!(offset_label(1_000.0, 3_450.0), "+2.5s");
	}
}
