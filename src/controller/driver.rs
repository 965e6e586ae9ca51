//! Query driver
//!
//! Owns the controller and runs its tickets through a `QueryPipeline`.
//! Each query runs as its own task and reports back over a channel, so
//! completions are applied in response order, which may differ from
//! request order. The controller's generation check decides what sticks.

use crate::controller::{Controller, RouteTicket, SearchTicket};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::query::{QueryPipeline, ResultSet, RouteResult};
use crate::surface::{InfoPanel, MapSurface};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A user input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    MapClicked(GeoPoint),
    ResultClicked(usize),
}

/// A finished query with the ticket it was issued under
#[derive(Debug)]
pub enum Completion {
    Search(SearchTicket, Result<ResultSet>),
    Route(RouteTicket, Result<RouteResult>),
}

/// Runs one controller against a query pipeline
pub struct Driver<Q, M, P>
where
    Q: QueryPipeline + 'static,
    M: MapSurface,
    P: InfoPanel,
{
    controller: Controller<M, P>,
    pipeline: Arc<Q>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<Q, M, P> Driver<Q, M, P>
where
    Q: QueryPipeline + 'static,
    M: MapSurface,
    P: InfoPanel,
{
    pub fn new(controller: Controller<M, P>, pipeline: Arc<Q>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            pipeline,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &Controller<M, P> {
        &self.controller
    }

    pub fn into_controller(self) -> Controller<M, P> {
        self.controller
    }

    /// Number of issued queries whose completion has not been applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Handle a user input, issuing at most one query
    ///
    /// Errors are the controller's precondition failures; no query is
    /// issued for them.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::MapClicked(p) => {
                let ticket = self.controller.map_clicked(p)?;
                self.spawn_search(ticket);
            }
            Event::ResultClicked(index) => {
                let ticket = self.controller.result_clicked(index)?;
                self.spawn_route(ticket);
            }
        }
        Ok(())
    }

    fn spawn_search(&mut self, ticket: SearchTicket) {
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let (origin, radius_meters) = (ticket.origin, ticket.radius_meters);
            let query =
                tokio::spawn(async move { pipeline.search_nearby(origin, radius_meters).await });
            // A panicked query still completes its ticket
            let outcome = query
                .await
                .unwrap_or_else(|e| Err(Error::SearchFailed(format!("Search task failed: {}", e))));
            // Receiver gone means the driver was dropped
            let _ = tx.send(Completion::Search(ticket, outcome));
        });
    }

    fn spawn_route(&mut self, ticket: RouteTicket) {
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let (start, end) = (ticket.start, ticket.end);
            let query = tokio::spawn(async move { pipeline.fetch_route(start, end).await });
            let outcome = query
                .await
                .unwrap_or_else(|e| Err(Error::RouteFailed(format!("Route task failed: {}", e))));
            let _ = tx.send(Completion::Route(ticket, outcome));
        });
    }

    /// Wait for the next query to finish
    ///
    /// Returns None immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        self.rx.recv().await
    }

    /// Apply a completion; returns false if it was stale
    pub fn apply(&mut self, completion: Completion) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let applied = match completion {
            Completion::Search(ticket, outcome) => self.controller.search_completed(&ticket, outcome),
            Completion::Route(ticket, outcome) => self.controller.route_completed(&ticket, outcome),
        };
        if !applied {
            debug!("stale response discarded");
        }
        applied
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) {
        while let Some(completion) = self.next_completion().await {
            self.apply(completion);
        }
    }
}
