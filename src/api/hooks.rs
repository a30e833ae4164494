//! Remote data accessors: one per backend endpoint. Each hands back a
//! signal that starts at `Loading`, refetches whenever the selected
//! report changes, and settles to `Ready` or `Failed`. The freshness
//! cache in [`super::client`] sits underneath, so a re-entry into a view
//! within the cache window costs no network round trip.

use leptos::prelude::*;
use serde::de::DeserializeOwned;
use wasm_bindgen_futures::spawn_local;

use super::client::{FetchError, get_json};
use super::types::{Entity, GraphData, Subreddit};
use crate::store::Report;

/// Lifecycle of one remote fetch as seen by a view.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteData<T> {
	Loading,
	Ready(T),
	Failed(FetchError),
}

fn remote<T>(path: &'static str, report: Signal<Option<Report>>) -> Signal<RemoteData<T>>
where
	T: DeserializeOwned + Clone + Send + Sync + 'static,
{
	let (data, set_data) = signal(RemoteData::Loading);
	Effect::new(move |_| {
		let report = report.get().map(Report::query_value);
		set_data.set(RemoteData::Loading);
		spawn_local(async move {
			match get_json::<T>(path, report).await {
				Ok(value) => set_data.set(RemoteData::Ready(value)),
				Err(err) => set_data.set(RemoteData::Failed(err)),
			}
		});
	});
	data.into()
}

/// Ranked communities for the current report (`GET /subreddits`).
pub fn use_subreddits(report: Signal<Option<Report>>) -> Signal<RemoteData<Vec<Subreddit>>> {
	remote("/subreddits", report)
}

/// Entities with grouped relationships (`GET /relationships/graph`).
pub fn use_entities(report: Signal<Option<Report>>) -> Signal<RemoteData<Vec<Entity>>> {
	remote("/relationships/graph", report)
}

/// Node/link payload for the graph viewer (`GET /relationships/graph/force`).
pub fn use_force_graph(report: Signal<Option<Report>>) -> Signal<RemoteData<GraphData>> {
	remote("/relationships/graph/force", report)
}
