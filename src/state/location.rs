//! Cascading country/state/city selection state.
//!
//! The widget is a three-stage dependent-fetch machine: the country list is
//! loaded once at startup, the state list follows the selected country, and
//! the city list follows the selected country/state pair. Changing any level
//! clears everything below it before the replacement fetch is issued, so a
//! child select never shows options that belong to a previous parent.

use eframe::egui;

use crate::api::{LocationClient, LocationError};
use crate::state::StateEvent;
use crate::task::{PollResult, TaggedTask, poll_tagged};

type FetchResult = Result<Vec<String>, LocationError>;

/// User-facing message when the initial country fetch fails
const COUNTRIES_FAILED: &str = "Failed to fetch countries. Please try again later.";

/// Load status of the country list, the gate for the whole widget.
///
/// Until `Ready` no select is shown; `Failed` is terminal for the mount
/// (there is no retry).
#[derive(Debug, Default)]
pub enum CountryLoad {
    #[default]
    Uninitialized,
    Loading,
    Ready(Vec<String>),
    Failed(String),
}

/// Current choice at each level.
///
/// A state requires a country and a city requires both. The setters keep
/// that nesting true by clearing descendants on every upstream change, so
/// callers cannot produce a city without a matching state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
}

impl Selection {
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    fn set_country(&mut self, country: String) {
        self.country = Some(country);
        self.state = None;
        self.city = None;
    }

    fn set_state(&mut self, state: String) -> bool {
        if self.country.is_none() {
            return false;
        }
        self.state = Some(state);
        self.city = None;
        true
    }

    fn set_city(&mut self, city: String) -> bool {
        if self.state.is_none() {
            return false;
        }
        self.city = Some(city);
        true
    }

    /// Full human-readable summary, available once all three levels are set
    pub fn summary(&self) -> Option<String> {
        let country = self.country.as_deref()?;
        let state = self.state.as_deref()?;
        let city = self.city.as_deref()?;
        Some(format!("You selected {city}, {state}, {country}"))
    }
}

/// Selector state: option lists, current selection, and in-flight fetches
#[derive(Default)]
pub struct LocationState {
    countries: CountryLoad,
    states: Vec<String>,
    cities: Vec<String>,
    selection: Selection,
    countries_task: Option<TaggedTask<(), FetchResult>>,
    states_task: Option<TaggedTask<String, FetchResult>>,
    cities_task: Option<TaggedTask<(String, String), FetchResult>>,
}

impl LocationState {
    pub fn countries(&self) -> &CountryLoad {
        &self.countries
    }

    pub fn state_options(&self) -> &[String] {
        &self.states
    }

    pub fn city_options(&self) -> &[String] {
        &self.cities
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether the state select accepts input
    pub fn state_select_enabled(&self) -> bool {
        self.selection.country.is_some()
    }

    /// Whether the city select accepts input
    pub fn city_select_enabled(&self) -> bool {
        self.selection.state.is_some()
    }

    /// Kick off the one-time country fetch. Does nothing once started.
    pub fn begin(&mut self, client: &LocationClient) -> Option<StateEvent> {
        if !matches!(self.countries, CountryLoad::Uninitialized) {
            return None;
        }

        self.countries = CountryLoad::Loading;
        let client = client.clone();
        self.countries_task = Some(TaggedTask::spawn((), async move { client.countries().await }));

        Some(StateEvent::StatusMessage("Loading countries...".to_string()))
    }

    /// Choose a country: reset both child levels, then fetch its states.
    ///
    /// Re-selecting the current country refetches. Any in-flight fetch for
    /// a child level is superseded and aborted.
    pub fn select_country(&mut self, country: String, client: &LocationClient) -> Option<StateEvent> {
        self.selection.set_country(country.clone());
        self.states.clear();
        self.cities.clear();
        if let Some(task) = self.states_task.take() {
            task.abort();
        }
        if let Some(task) = self.cities_task.take() {
            task.abort();
        }

        let client = client.clone();
        let fetch_country = country.clone();
        self.states_task = Some(TaggedTask::spawn(country.clone(), async move {
            client.states(&fetch_country).await
        }));

        Some(StateEvent::StatusMessage(format!(
            "Fetching states for {country}..."
        )))
    }

    /// Choose a state: reset the city level, then fetch its cities.
    /// No-op while no country is selected.
    pub fn select_state(&mut self, state: String, client: &LocationClient) -> Option<StateEvent> {
        let country = self.selection.country().map(str::to_owned)?;
        if !self.selection.set_state(state.clone()) {
            return None;
        }
        self.cities.clear();
        if let Some(task) = self.cities_task.take() {
            task.abort();
        }

        let client = client.clone();
        let scope = (country.clone(), state.clone());
        let status = format!("Fetching cities for {state}...");
        self.cities_task = Some(TaggedTask::spawn(scope, async move {
            client.cities(&country, &state).await
        }));

        Some(StateEvent::StatusMessage(status))
    }

    /// Choose a city. No further fetch; the summary becomes available.
    /// No-op while no state is selected.
    pub fn select_city(&mut self, city: String) -> Option<StateEvent> {
        if !self.selection.set_city(city) {
            return None;
        }
        self.selection.summary().map(StateEvent::StatusMessage)
    }

    /// Poll all in-flight fetches.
    ///
    /// A cascade result is applied only if its tag still matches the current
    /// selection; a superseded response is discarded. Cascade failures fail
    /// into the log only: the list stays empty and no error is surfaced for
    /// that level. Only the initial country fetch reports to the user.
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();
        let mut pending = false;

        match poll_tagged(&mut self.countries_task) {
            PollResult::Complete { result, .. } => match result {
                Ok(Ok(list)) => {
                    events.push(StateEvent::LogInfo(format!(
                        "Loaded {} countries",
                        list.len()
                    )));
                    events.push(StateEvent::StatusMessage("Ready".to_string()));
                    self.countries = CountryLoad::Ready(list);
                }
                Ok(Err(e)) => {
                    events.push(StateEvent::LogError(format!(
                        "Failed to fetch countries: {e}"
                    )));
                    events.push(StateEvent::StatusMessage(COUNTRIES_FAILED.to_string()));
                    self.countries = CountryLoad::Failed(COUNTRIES_FAILED.to_string());
                }
                Err(e) => {
                    if !e.is_cancelled() {
                        events.push(StateEvent::LogError(format!(
                            "Country fetch task panicked: {e}"
                        )));
                        self.countries = CountryLoad::Failed(COUNTRIES_FAILED.to_string());
                    }
                }
            },
            PollResult::Pending => pending = true,
            PollResult::NoTask => {}
        }

        match poll_tagged(&mut self.states_task) {
            PollResult::Complete { tag, result } => match result {
                Ok(Ok(list)) => {
                    if self.selection.country() == Some(tag.as_str()) {
                        self.states = list;
                    } else {
                        events.push(StateEvent::LogInfo(format!(
                            "Discarding stale state list for {tag}"
                        )));
                    }
                }
                Ok(Err(e)) => events.push(StateEvent::LogError(format!(
                    "Failed to fetch states for {tag}: {e}"
                ))),
                Err(e) => {
                    if !e.is_cancelled() {
                        events.push(StateEvent::LogError(format!(
                            "State fetch task panicked: {e}"
                        )));
                    }
                }
            },
            PollResult::Pending => pending = true,
            PollResult::NoTask => {}
        }

        match poll_tagged(&mut self.cities_task) {
            PollResult::Complete {
                tag: (tag_country, tag_state),
                result,
            } => match result {
                Ok(Ok(list)) => {
                    let current = self.selection.country().zip(self.selection.state());
                    if current == Some((tag_country.as_str(), tag_state.as_str())) {
                        self.cities = list;
                    } else {
                        events.push(StateEvent::LogInfo(format!(
                            "Discarding stale city list for {tag_state}, {tag_country}"
                        )));
                    }
                }
                Ok(Err(e)) => events.push(StateEvent::LogError(format!(
                    "Failed to fetch cities for {tag_state}, {tag_country}: {e}"
                ))),
                Err(e) => {
                    if !e.is_cancelled() {
                        events.push(StateEvent::LogError(format!(
                            "City fetch task panicked: {e}"
                        )));
                    }
                }
            },
            PollResult::Pending => pending = true,
            PollResult::NoTask => {}
        }

        if pending {
            ctx.request_repaint();
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        unsafe { std::env::set_var("NO_PROXY", "127.0.0.1,localhost") };
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    fn names(items: &[&str]) -> Json<Vec<String>> {
        Json(items.iter().map(|s| s.to_string()).collect())
    }

    /// Client pointed at a port nobody listens on; used by tests that never
    /// await a fetch result.
    async fn offline_client() -> LocationClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        LocationClient::new(&format!("http://{addr}")).expect("client")
    }

    /// Poll until `done` holds, collecting events along the way
    async fn poll_until(
        state: &mut LocationState,
        ctx: &egui::Context,
        done: impl Fn(&LocationState) -> bool,
    ) -> Vec<StateEvent> {
        let mut events = Vec::new();
        for _ in 0..300 {
            events.extend(state.poll(ctx));
            if done(state) {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("polled condition never reached; events: {events:?}");
    }

    fn has_status(events: &[StateEvent]) -> bool {
        events
            .iter()
            .any(|e| matches!(e, StateEvent::StatusMessage(_)))
    }

    #[tokio::test]
    async fn selecting_country_resets_children_before_fetch() {
        let client = offline_client().await;
        let mut state = LocationState::default();

        state.select_country("India".to_string(), &client);
        state.select_state("Karnataka".to_string(), &client);
        state.select_city("Bangalore".to_string());
        // Fake populated child lists from an earlier cascade
        state.states = vec!["Karnataka".to_string()];
        state.cities = vec!["Bangalore".to_string()];

        state.select_country("USA".to_string(), &client);

        assert_eq!(state.selection().country(), Some("USA"));
        assert_eq!(state.selection().state(), None);
        assert_eq!(state.selection().city(), None);
        assert!(state.state_options().is_empty());
        assert!(state.city_options().is_empty());
    }

    #[tokio::test]
    async fn selecting_state_resets_city_before_fetch() {
        let client = offline_client().await;
        let mut state = LocationState::default();

        state.select_country("India".to_string(), &client);
        state.select_state("Karnataka".to_string(), &client);
        state.select_city("Bangalore".to_string());
        state.cities = vec!["Bangalore".to_string()];

        state.select_state("Goa".to_string(), &client);

        assert_eq!(state.selection().state(), Some("Goa"));
        assert_eq!(state.selection().city(), None);
        assert!(state.city_options().is_empty());
    }

    #[tokio::test]
    async fn child_selects_are_gated_on_ancestors() {
        let client = offline_client().await;
        let mut state = LocationState::default();

        assert!(!state.state_select_enabled());
        assert!(!state.city_select_enabled());
        assert!(state.select_state("Karnataka".to_string(), &client).is_none());
        assert!(state.select_city("Bangalore".to_string()).is_none());
        assert_eq!(state.selection(), &Selection::default());

        state.select_country("India".to_string(), &client);
        assert!(state.state_select_enabled());
        assert!(!state.city_select_enabled());

        state.select_state("Karnataka".to_string(), &client);
        assert!(state.city_select_enabled());
    }

    #[test]
    fn summary_requires_full_selection() {
        let mut selection = Selection::default();
        assert_eq!(selection.summary(), None);

        selection.set_country("India".to_string());
        assert_eq!(selection.summary(), None);

        assert!(selection.set_state("Karnataka".to_string()));
        assert_eq!(selection.summary(), None);

        assert!(selection.set_city("Bangalore".to_string()));
        assert_eq!(
            selection.summary().as_deref(),
            Some("You selected Bangalore, Karnataka, India")
        );
    }

    #[tokio::test]
    async fn initial_load_populates_country_options_in_order() {
        let router = Router::new().route("/countries", get(|| async { names(&["India", "USA"]) }));
        let base = serve(router).await;
        let client = LocationClient::new(&base).expect("client");
        let ctx = egui::Context::default();

        let mut state = LocationState::default();
        assert!(matches!(state.countries(), CountryLoad::Uninitialized));
        state.begin(&client);
        assert!(matches!(state.countries(), CountryLoad::Loading));
        // begin is one-shot
        assert!(state.begin(&client).is_none());

        poll_until(&mut state, &ctx, |s| {
            matches!(s.countries(), CountryLoad::Ready(_))
        })
        .await;

        match state.countries() {
            CountryLoad::Ready(list) => assert_eq!(list, &["India", "USA"]),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn initial_load_failure_blocks_the_widget() {
        let router = Router::new().route(
            "/countries",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = serve(router).await;
        let client = LocationClient::new(&base).expect("client");
        let ctx = egui::Context::default();

        let mut state = LocationState::default();
        state.begin(&client);
        poll_until(&mut state, &ctx, |s| {
            matches!(s.countries(), CountryLoad::Failed(_))
        })
        .await;

        match state.countries() {
            CountryLoad::Failed(message) => {
                assert_eq!(message, "Failed to fetch countries. Please try again later.")
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_cascade_produces_summary() {
        let router = Router::new()
            .route("/countries", get(|| async { names(&["India", "USA"]) }))
            .route(
                "/country=India/states",
                get(|| async { names(&["Karnataka"]) }),
            )
            .route(
                "/country=India/state=Karnataka/cities",
                get(|| async { names(&["Bangalore"]) }),
            );
        let base = serve(router).await;
        let client = LocationClient::new(&base).expect("client");
        let ctx = egui::Context::default();

        let mut state = LocationState::default();
        state.begin(&client);
        poll_until(&mut state, &ctx, |s| {
            matches!(s.countries(), CountryLoad::Ready(_))
        })
        .await;

        state.select_country("India".to_string(), &client);
        poll_until(&mut state, &ctx, |s| !s.state_options().is_empty()).await;
        assert_eq!(state.state_options(), ["Karnataka"]);

        state.select_state("Karnataka".to_string(), &client);
        poll_until(&mut state, &ctx, |s| !s.city_options().is_empty()).await;
        assert_eq!(state.city_options(), ["Bangalore"]);

        state.select_city("Bangalore".to_string());
        assert_eq!(
            state.selection().summary().as_deref(),
            Some("You selected Bangalore, Karnataka, India")
        );
    }

    #[tokio::test]
    async fn state_fetch_failure_is_silent() {
        let router = Router::new()
            .route("/countries", get(|| async { names(&["India"]) }))
            .route(
                "/country=India/states",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let base = serve(router).await;
        let client = LocationClient::new(&base).expect("client");
        let ctx = egui::Context::default();

        let mut state = LocationState::default();
        state.begin(&client);
        poll_until(&mut state, &ctx, |s| {
            matches!(s.countries(), CountryLoad::Ready(_))
        })
        .await;

        state.select_country("India".to_string(), &client);
        let events = poll_until(&mut state, &ctx, |s| s.states_task.is_none()).await;

        // Logged only: the state list stays empty and nothing reaches the user
        assert!(!has_status(&events));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, StateEvent::LogError(_)))
        );
        assert!(state.state_options().is_empty());
        assert_eq!(state.selection().country(), Some("India"));
        assert!(state.state_select_enabled());
        assert!(!state.city_select_enabled());
    }

    #[tokio::test]
    async fn superseded_state_fetch_never_overwrites_newer_selection() {
        let router = Router::new()
            .route("/countries", get(|| async { names(&["Aland", "Belize"]) }))
            .route(
                "/country=Aland/states",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(250)).await;
                    names(&["Stale"])
                }),
            )
            .route(
                "/country=Belize/states",
                get(|| async { names(&["Cayo"]) }),
            );
        let base = serve(router).await;
        let client = LocationClient::new(&base).expect("client");
        let ctx = egui::Context::default();

        let mut state = LocationState::default();
        state.begin(&client);
        poll_until(&mut state, &ctx, |s| {
            matches!(s.countries(), CountryLoad::Ready(_))
        })
        .await;

        state.select_country("Aland".to_string(), &client);
        state.select_country("Belize".to_string(), &client);

        poll_until(&mut state, &ctx, |s| !s.state_options().is_empty()).await;
        assert_eq!(state.state_options(), ["Cayo"]);

        // Give the slow fetch time to land; it must not replace Belize's list
        tokio::time::sleep(Duration::from_millis(400)).await;
        state.poll(&ctx);
        assert_eq!(state.state_options(), ["Cayo"]);
        assert_eq!(state.selection().country(), Some("Belize"));
    }

    #[tokio::test]
    async fn reselecting_same_country_refetches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new()
            .route("/countries", get(|| async { names(&["India"]) }))
            .route(
                "/country=India/states",
                get(move || {
                    let hits = counter.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        names(&["Karnataka"])
                    }
                }),
            );
        let base = serve(router).await;
        let client = LocationClient::new(&base).expect("client");
        let ctx = egui::Context::default();

        let mut state = LocationState::default();
        state.begin(&client);
        poll_until(&mut state, &ctx, |s| {
            matches!(s.countries(), CountryLoad::Ready(_))
        })
        .await;

        state.select_country("India".to_string(), &client);
        poll_until(&mut state, &ctx, |s| !s.state_options().is_empty()).await;

        state.select_country("India".to_string(), &client);
        // The reset shows immediately even for the same country
        assert!(state.state_options().is_empty());
        poll_until(&mut state, &ctx, |s| !s.state_options().is_empty()).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
