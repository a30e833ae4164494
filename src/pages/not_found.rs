use leptos::prelude::*;

/// 404 fallback.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="screen">
			<h1>"Not found"</h1>
			<p>"There is nothing at this address."</p>
			<a href="/">"Back to the app"</a>
		</section>
	}
}
