//! Entity explorer: entities ranked by how connected they are, with a
//! drill-down panel for their directional relationship groups.

use leptos::prelude::*;

use crate::api::hooks::{RemoteData, use_entities};
use crate::api::types::{Entity, GroupedRelationship, sort_by_relationship_total};
use crate::store::AppStore;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
	ReferencedBy,
	References,
}

#[component]
pub fn EntitiesPage() -> impl IntoView {
	let store = AppStore::use_store();
	let entities = use_entities(store.selected_report.into());
	let selected = RwSignal::new(None::<Entity>);
	let tab = RwSignal::new(Direction::ReferencedBy);

	let select = move |entity: Entity| {
		tab.set(Direction::ReferencedBy);
		selected.set(Some(entity));
	};

	view! {
		<section class="screen entities-screen">
			<h1>"Entity explorer"</h1>
			<div
				class="explorer-layout"
				class=("with-panel", move || selected.get().is_some())
			>
				<div class="entity-table">
					{move || match entities.get() {
						RemoteData::Loading => {
							view! { <p class="placeholder">"Loading entities..."</p> }.into_any()
						}
						RemoteData::Ready(items) => {
							let mut items: Vec<Entity> = items;
							sort_by_relationship_total(&mut items);
							view! {
								<table class="data-table">
									<thead>
										<tr>
											<th>"Entity"</th>
											<th>"Relationships"</th>
										</tr>
									</thead>
									<tbody>
										{items
											.into_iter()
											.map(|entity| {
												let total = entity.relationship_total();
												let name = entity.entity_name.clone();
												let is_selected = {
													let name = name.clone();
													move || {
														selected
															.get()
															.is_some_and(|e| e.entity_name == name)
													}
												};
												view! {
													<tr
														class="selectable"
														class:selected=is_selected
														on:click=move |_| select(entity.clone())
													>
														<td class="name-cell">{name.clone()}</td>
														<td>{total}</td>
													</tr>
												}
											})
											.collect_view()}
									</tbody>
								</table>
							}
							.into_any()
						}
						RemoteData::Failed(_) => view! {
							<p class="placeholder error">"Failed to load entities, please try again."</p>
						}
						.into_any(),
					}}
				</div>

				{move || selected.get().map(|entity| view! {
					<aside class="side-panel">
						<header>
							<h2>{entity.entity_name.clone()}</h2>
							<button class="close" on:click=move |_| selected.set(None)>"×"</button>
						</header>
						<div class="tabs">
							<button
								class:active=move || tab.get() == Direction::ReferencedBy
								on:click=move |_| tab.set(Direction::ReferencedBy)
							>
								"Referenced by"
							</button>
							<button
								class:active=move || tab.get() == Direction::References
								on:click=move |_| tab.set(Direction::References)
							>
								"References"
							</button>
						</div>
						{move || {
							let groups = match tab.get() {
								Direction::ReferencedBy => entity.left_relationships.clone(),
								Direction::References => entity.right_relationships.clone(),
							};
							view! { <RelationshipGroups groups=groups /> }
						}}
					</aside>
				})}
			</div>
		</section>
	}
}

#[component]
fn RelationshipGroups(groups: Vec<GroupedRelationship>) -> impl IntoView {
	if groups.is_empty() {
		return view! { <p class="placeholder">"No relationships in this direction."</p> }
			.into_any();
	}
	view! {
		<div class="relationship-groups">
			{groups
				.into_iter()
				.map(|group| view! {
					<div class="relationship-group">
						<h3>{group.relationship_type}</h3>
						{group
							.details
							.into_iter()
							.map(|detail| view! {
								<div class="relationship-detail">
									<p class="related-entity">{detail.related_entity}</p>
									<ul class="evidences">
										{detail
											.evidences
											.into_iter()
											.map(|evidence| view! { <li>{evidence}</li> })
											.collect_view()}
									</ul>
									<div class="post-links">
										{detail
											.post_urls
											.into_iter()
											.map(|url| view! {
												<a href=url.clone() target="_blank">"source"</a>
											})
											.collect_view()}
									</div>
								</div>
							})
							.collect_view()}
					</div>
				})
				.collect_view()}
		</div>
	}
	.into_any()
}
