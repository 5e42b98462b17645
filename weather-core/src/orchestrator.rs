//! Request lifecycle for place lookups.
//!
//! Each input change starts a new *cycle* tagged with a generation number.
//! Cycles are never aborted. Instead every commit compares its tag with the
//! current generation and is dropped when a newer input has arrived since.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::LookupError,
    model::{ForecastDay, ForecastView, RequestState, ResolvedLocation},
    provider::ForecastProvider,
    resolver::LocationResolver,
};

/// Tag handed out by [`ForecastOrchestrator::submit`] for one lookup cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleTicket {
    generation: u64,
    query: String,
}

impl CycleTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Owns the single [`ForecastView`] and the transitions between its states.
///
/// Cloning is cheap; clones share the same view, so cycles can run on
/// separate tasks.
#[derive(Debug, Clone)]
pub struct ForecastOrchestrator {
    resolver: LocationResolver,
    forecaster: Arc<dyn ForecastProvider>,
    view: Arc<watch::Sender<ForecastView>>,
}

impl ForecastOrchestrator {
    pub fn new(resolver: LocationResolver, forecaster: Arc<dyn ForecastProvider>) -> Self {
        let (tx, _rx) = watch::channel(ForecastView::default());
        Self { resolver, forecaster, view: Arc::new(tx) }
    }

    /// Current snapshot.
    pub fn view(&self) -> ForecastView {
        self.view.borrow().clone()
    }

    /// Receiver notified after every committed transition.
    pub fn subscribe(&self) -> watch::Receiver<ForecastView> {
        self.view.subscribe()
    }

    /// Replace the place name.
    ///
    /// Supersedes any in-flight cycle, clears the displayed name and the
    /// previous error. Returns `None` (state Idle) for an empty query,
    /// otherwise enters Loading and returns the ticket to pass to [`run`].
    ///
    /// [`run`]: ForecastOrchestrator::run
    pub fn submit(&self, query: impl Into<String>) -> Option<CycleTicket> {
        let query = query.into();
        let mut ticket = None;

        self.view.send_modify(|view| {
            view.generation += 1;
            view.query = query.clone();
            view.display_location.clear();

            if query.is_empty() {
                view.state = RequestState::Idle;
            } else {
                view.state = RequestState::Loading;
                ticket = Some(CycleTicket { generation: view.generation, query: query.clone() });
            }
        });

        debug!(generation = self.view.borrow().generation, %query, "query submitted");
        ticket
    }

    /// Input-change entry point: like [`submit`], but a query equal to the
    /// current one is ignored and `None` is returned, so retyping the same
    /// text neither restarts the cycle nor clears the displayed name.
    ///
    /// [`submit`]: ForecastOrchestrator::submit
    pub fn change_query(&self, query: impl Into<String>) -> Option<CycleTicket> {
        let query = query.into();
        if self.view.borrow().query == query {
            return None;
        }
        self.submit(query)
    }

    /// Execute one cycle: geocode, commit the display name, fetch and
    /// normalize the forecast, then commit Success or Failure.
    ///
    /// Does nothing observable if the ticket was superseded before settling.
    pub async fn run(&self, ticket: CycleTicket) {
        match self.lookup(&ticket).await {
            Ok((location, days)) => {
                let committed = self.commit(&ticket, |view| {
                    view.state = RequestState::Success(location, days);
                });
                if committed {
                    info!(query = %ticket.query, "forecast ready");
                }
            }
            Err(LookupError::EmptyQuery) => {}
            Err(err) => {
                let message = err.to_string();
                let committed = self.commit(&ticket, |view| {
                    view.state = RequestState::Failure(message);
                });
                if committed {
                    warn!(query = %ticket.query, error = %err, "lookup failed");
                }
            }
        }
    }

    /// `submit` followed by `run`; returns the resulting snapshot.
    pub async fn search(&self, query: impl Into<String>) -> ForecastView {
        if let Some(ticket) = self.submit(query) {
            self.run(ticket).await;
        }
        self.view()
    }

    async fn lookup(
        &self,
        ticket: &CycleTicket,
    ) -> Result<(ResolvedLocation, Vec<ForecastDay>), LookupError> {
        let location = self.resolver.resolve(&ticket.query).await?;

        let name = location.display_name.clone();
        self.commit(ticket, |view| view.display_location = name);

        let daily = self.forecaster.daily_forecast(&location).await?;
        let days = daily.into_days()?;

        Ok((location, days))
    }

    /// Apply `f` only while `ticket` is still the current generation.
    fn commit(&self, ticket: &CycleTicket, f: impl FnOnce(&mut ForecastView)) -> bool {
        let applied = self.view.send_if_modified(|view| {
            if view.generation != ticket.generation {
                return false;
            }
            f(view);
            true
        });

        if !applied {
            debug!(
                generation = ticket.generation,
                query = %ticket.query,
                "dropping result of superseded query"
            );
        }
        applied
    }
}
