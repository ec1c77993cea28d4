use std::time::Duration;

use leptos::prelude::*;
use log::{error, info, warn};

use crate::components::bridge_graph::{BridgeGraphCanvas, BridgeResult};
use crate::components::bridge_source::{BridgeSource, SampleBridges};

/// Simulated round-trip of the bridge request.
const REQUEST_LATENCY: Duration = Duration::from_millis(900);

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let source = StoredValue::new(SampleBridges::embedded().unwrap_or_else(|err| {
		error!("sample bridges unavailable: {err}");
		SampleBridges::default()
	}));

	let (input_a, set_input_a) = signal(String::new());
	let (input_b, set_input_b) = signal(String::new());
	let (loading, set_loading) = signal(false);
	let (result, set_result) = signal(None::<BridgeResult>);
	let (failure, set_failure) = signal(None::<String>);

	let construct = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let (a, b) = (input_a.get_untracked(), input_b.get_untracked());
		if a.trim().is_empty() || b.trim().is_empty() {
			return;
		}
		set_loading.set(true);
		set_failure.set(None);
		set_result.set(None);
		set_timeout(
			move || {
				match source.with_value(|s| s.request(&a, &b)) {
					Ok(bridge) => {
						info!(
							"bridge \"{}\" constructed, resonance {:.2}",
							bridge.bridge_title, bridge.resonance_score
						);
						set_result.set(Some(bridge));
					}
					Err(err) => {
						warn!("bridge request failed: {err}");
						set_failure.set(Some(err.to_string()));
					}
				}
				set_loading.set(false);
			},
			REQUEST_LATENCY,
		);
	};

	let samples = source.with_value(|s| s.samples().to_vec());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<main class="bridge-page">
				<Show when=move || result.get().is_none() && !loading.get()>
					<div class="hero">
						<h1>"Find the Hidden Geometry Connecting All Things"</h1>
						<div class="samples">
							{samples
								.iter()
								.map(|sample| {
									let (a, b) = (sample.domain_a.clone(), sample.domain_b.clone());
									let caption = format!("{} ↔ {}", sample.domain_a, sample.domain_b);
									view! {
										<button
											class="sample"
											on:click=move |_| {
												set_input_a.set(a.clone());
												set_input_b.set(b.clone());
											}
										>
											{caption}
										</button>
									}
								})
								.collect_view()}
						</div>
					</div>
				</Show>

				<form class="bridge-form" on:submit=construct>
					<input
						placeholder="Domain A"
						prop:value=input_a
						on:input=move |ev| set_input_a.set(event_target_value(&ev))
					/>
					<input
						placeholder="Domain B"
						prop:value=input_b
						on:input=move |ev| set_input_b.set(event_target_value(&ev))
					/>
					<button type="submit" disabled=move || loading.get()>
						"Construct Bridge"
					</button>
				</form>

				{move || failure.get().map(|msg| view! { <p class="error">{msg}</p> })}

				<div class="graph-panel">
					<BridgeGraphCanvas data=result loading=loading />
				</div>
			</main>
		</ErrorBoundary>
	}
}
