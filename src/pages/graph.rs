//! Relationship graph screen: the canvas viewer plus the edge detail
//! panel. Clicking an edge replaces the panel's content; the close
//! control restores the full-width graph.

use leptos::prelude::*;

use crate::api::hooks::{RemoteData, use_force_graph};
use crate::components::relationship_graph::{EdgeSelection, RelationshipGraphCanvas};
use crate::store::AppStore;

#[component]
pub fn GraphPage() -> impl IntoView {
	let store = AppStore::use_store();
	let graph = use_force_graph(store.selected_report.into());
	let selected = RwSignal::new(None::<EdgeSelection>);

	view! {
		<section class="screen graph-screen">
			<h1>"Relationship graph"</h1>
			<div
				class="graph-layout"
				class=("with-panel", move || selected.get().is_some())
			>
				<div class="graph-canvas-container">
					{move || match graph.get() {
						RemoteData::Loading => {
							view! { <p class="placeholder">"Loading graph..."</p> }.into_any()
						}
						RemoteData::Ready(data) => view! {
							<RelationshipGraphCanvas
								data=Signal::derive(move || data.clone())
								on_edge_select=move |edge| selected.set(Some(edge))
							/>
						}
						.into_any(),
						RemoteData::Failed(_) => view! {
							<p class="placeholder error">"Failed to load graph, please try again."</p>
						}
						.into_any(),
					}}
				</div>

				{move || selected.get().map(|edge| view! {
					<aside class="side-panel">
						<header>
							<h2>{format!("{} \u{2192} {}", edge.source, edge.target)}</h2>
							<button class="close" on:click=move |_| selected.set(None)>"×"</button>
						</header>
						<div class="edge-relationships">
							{edge
								.relationships
								.iter()
								.map(|rel| view! { <span class="chip">{rel.clone()}</span> })
								.collect_view()}
						</div>
						<h3>"Evidence"</h3>
						<ul class="evidences">
							{edge
								.evidences
								.iter()
								.map(|evidence| view! { <li>{evidence.clone()}</li> })
								.collect_view()}
						</ul>
						<h3>"Posts"</h3>
						<div class="post-links">
							{edge
								.post_urls
								.iter()
								.map(|url| view! {
									<a href=url.clone() target="_blank">{url.clone()}</a>
								})
								.collect_view()}
						</div>
					</aside>
				})}
			</div>
		</section>
	}
}
