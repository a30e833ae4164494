//! Ranked communities table for the selected report.

use leptos::prelude::*;

use crate::api::hooks::{RemoteData, use_subreddits};
use crate::api::types::{Subreddit, sort_by_relevance};
use crate::store::AppStore;

/// Table cell for a nullable score.
pub fn fmt_score(score: Option<f64>) -> String {
	match score {
		Some(score) => format!("{score:.2}"),
		None => "N/A".to_string(),
	}
}

#[component]
pub fn CommunitiesPage() -> impl IntoView {
	let store = AppStore::use_store();
	let subreddits = use_subreddits(store.selected_report.into());

	view! {
		<section class="screen communities-screen">
			<h1>"Ranked communities"</h1>
			{move || match subreddits.get() {
				RemoteData::Loading => {
					view! { <p class="placeholder">"Loading communities..."</p> }.into_any()
				}
				RemoteData::Ready(items) => {
					let mut items: Vec<Subreddit> = items;
					sort_by_relevance(&mut items);
					view! {
						<table class="data-table">
							<thead>
								<tr>
									<th>"Community"</th>
									<th>"Relevance"</th>
									<th>"Engagement"</th>
									<th>"Freshness"</th>
									<th>"Frequency"</th>
								</tr>
							</thead>
							<tbody>
								{items
									.into_iter()
									.map(|sub| view! {
										<tr>
											<td class="name-cell">{sub.subreddit_name}</td>
											<td>{fmt_score(sub.relevance_score)}</td>
											<td>{fmt_score(sub.engagement_score)}</td>
											<td>{fmt_score(sub.freshness_score)}</td>
											<td>{fmt_score(sub.frequency_score)}</td>
										</tr>
									})
									.collect_view()}
							</tbody>
						</table>
					}
					.into_any()
				}
				RemoteData::Failed(_) => view! {
					<p class="placeholder error">"Failed to load communities, please try again."</p>
				}
				.into_any(),
			}}
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_scores_render_as_na() {
		assert_eq!(fmt_score(None), "N/A");
		assert_eq!(fmt_score(Some(0.954)), "0.95");
	}
}
