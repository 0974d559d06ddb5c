//! Request sequencing for an interactive mind-map view.
//!
//! Outline requests are not cancellable, so a slow response can arrive after
//! a newer one. Each request gets a generation number and only the latest
//! generation may install its graph; anything older is dropped.

use crate::error::Error;
use crate::ir::MindmapGraph;
use crate::layout::{LayoutOutcome, TreeLayoutConfig};
use crate::outline::{OutlineNode, OutlineSource, parse_outline};
use crate::transform::{TransformError, TransformOptions, transform_with};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    source: OutlineSource,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &OutlineSource {
        &self.source
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Installed {
        nodes: usize,
        outcome: LayoutOutcome,
    },
    /// A newer request was started, the view was cleared, or this ticket
    /// was already settled.
    Superseded { generation: u64, latest: u64 },
}

#[derive(Debug, Default)]
pub struct MindmapSession {
    layout: TreeLayoutConfig,
    transform: TransformOptions,
    latest: u64,
    pending: Option<RequestTicket>,
    source: Option<OutlineSource>,
    graph: Option<MindmapGraph>,
    error: Option<String>,
}

impl MindmapSession {
    pub fn new(layout: TreeLayoutConfig, transform: TransformOptions) -> Self {
        Self {
            layout,
            transform,
            ..Self::default()
        }
    }

    /// Starts a request for `source`. Any request still in flight is
    /// superseded.
    pub fn begin(&mut self, source: OutlineSource) -> RequestTicket {
        self.latest += 1;
        let ticket = RequestTicket {
            generation: self.latest,
            source: source.clone(),
        };
        log::debug!("request #{} for {}", ticket.generation, source);
        self.pending = Some(ticket.clone());
        self.source = Some(source);
        self.error = None;
        ticket
    }

    /// Re-issues the last requested source from scratch.
    pub fn retry(&mut self) -> Option<RequestTicket> {
        let source = self.source.clone()?;
        Some(self.begin(source))
    }

    /// Installs the outline delivered for `ticket`, unless a newer request
    /// exists.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        outline: &OutlineNode,
    ) -> Result<Completion, TransformError> {
        if let Some(stale) = self.check_stale(ticket) {
            return Ok(stale);
        }
        self.pending = None;
        let mut graph = match transform_with(outline, &self.transform) {
            Ok(graph) => graph,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };
        let outcome = graph.apply_layout(&self.layout);
        let nodes = graph.nodes.len();
        self.graph = Some(graph);
        Ok(Completion::Installed { nodes, outcome })
    }

    /// Like [`complete`](Self::complete) for a raw service response body.
    pub fn complete_body(&mut self, ticket: &RequestTicket, body: &str) -> Result<Completion, Error> {
        if let Some(stale) = self.check_stale(ticket) {
            return Ok(stale);
        }
        let outline = match parse_outline(body) {
            Ok(outline) => outline,
            Err(err) => {
                self.pending = None;
                self.error = Some(err.to_string());
                return Err(err.into());
            }
        };
        Ok(self.complete(ticket, &outline)?)
    }

    /// Records a failed request. Returns `false` when the ticket was already
    /// superseded or settled and the failure is ignored.
    pub fn fail(&mut self, ticket: &RequestTicket, message: impl Into<String>) -> bool {
        if !self.is_pending(ticket) {
            return false;
        }
        self.pending = None;
        self.error = Some(message.into());
        true
    }

    /// Drops the current graph and orphans any request in flight.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.pending = None;
        self.graph = None;
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn graph(&self) -> Option<&MindmapGraph> {
        self.graph.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> Option<&OutlineSource> {
        self.source.as_ref()
    }

    fn is_pending(&self, ticket: &RequestTicket) -> bool {
        self.pending.as_ref() == Some(ticket)
    }

    fn check_stale(&self, ticket: &RequestTicket) -> Option<Completion> {
        if self.is_pending(ticket) {
            return None;
        }
        if ticket.generation == self.latest {
            log::warn!(
                "dropping response #{} for {}: request already settled",
                ticket.generation,
                ticket.source
            );
        } else {
            log::warn!(
                "dropping response #{} for {}: request #{} is newer",
                ticket.generation,
                ticket.source,
                self.latest
            );
        }
        Some(Completion::Superseded {
            generation: ticket.generation,
            latest: self.latest,
        })
    }
}
