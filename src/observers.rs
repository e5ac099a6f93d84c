use tracing::{debug, info};

use crate::events::CatalogEvent;

/// Trait for catalog change observation
pub trait CatalogObserver {
    /// Called after the catalog has applied a change
    fn on_event(&self, event: &CatalogEvent);
}

/// Logs every catalog event
#[derive(Debug)]
pub struct EventLogger;

impl CatalogObserver for EventLogger {
    fn on_event(&self, event: &CatalogEvent) {
        match event {
            CatalogEvent::Inserted { isbn } => info!(%isbn, "book catalogued"),
            CatalogEvent::DuplicateIgnored { isbn } => {
                info!(%isbn, "ISBN already catalogued, existing book kept");
            }
            CatalogEvent::Removed { isbn, title } => info!(%isbn, %title, "book removed"),
            CatalogEvent::AvailabilityChanged { isbn, available, .. } => {
                debug!(%isbn, available, "availability changed");
            }
        }
    }
}

/// Announces loans and returns
#[derive(Debug)]
pub struct LoanNotifier;

impl CatalogObserver for LoanNotifier {
    fn on_event(&self, event: &CatalogEvent) {
        if let CatalogEvent::AvailabilityChanged { isbn, title, available } = event {
            if *available {
                info!(target: "loans", %isbn, "\"{title}\" has been returned");
            } else {
                info!(target: "loans", %isbn, "\"{title}\" has been lent");
            }
        }
    }
}
