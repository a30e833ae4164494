use leptos::prelude::*;

use crate::pages::analysis::AnalysisPage;
use crate::pages::communities::CommunitiesPage;
use crate::pages::entities::EntitiesPage;
use crate::pages::graph::GraphPage;
use crate::store::{AppStore, Screen};

/// Root page: a store-driven switcher over the four screens. The data
/// screens stay locked until a report has been selected on the analysis
/// screen.
#[component]
pub fn Home() -> impl IntoView {
	let store = AppStore::use_store();

	let nav_button = move |screen: Screen, label: &'static str, needs_report: bool| {
		view! {
			<button
				class:active=move || store.screen.get() == screen
				disabled=move || needs_report && store.selected_report.get().is_none()
				on:click=move |_| store.go_to(screen)
			>
				{label}
			</button>
		}
	};

	view! {
		<div class="app-shell">
			<nav class="top-nav">
				<span class="brand">"Community Atlas"</span>
				{nav_button(Screen::Analysis, "Analysis", false)}
				{nav_button(Screen::Communities, "Communities", true)}
				{nav_button(Screen::EntityExplorer, "Entities", true)}
				{nav_button(Screen::RelationshipGraph, "Graph", true)}
				<span class="report-badge">
					{move || {
						store
							.selected_report
							.get()
							.map(|report| format!("Report: {}", report.label()))
							.unwrap_or_default()
					}}
				</span>
			</nav>
			<main>
				{move || match store.screen.get() {
					Screen::Analysis => view! { <AnalysisPage /> }.into_any(),
					Screen::Communities => view! { <CommunitiesPage /> }.into_any(),
					Screen::EntityExplorer => view! { <EntitiesPage /> }.into_any(),
					Screen::RelationshipGraph => view! { <GraphPage /> }.into_any(),
				}}
			</main>
		</div>
	}
}
