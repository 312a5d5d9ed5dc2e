//! Two-pass materialization of a resolved fixture graph.
//!
//! The create pass writes every entity with only its scalar fields; the
//! connect pass then updates every entity with its relation references.
//! Since nothing is connected until everything exists, no insertion order
//! between models is needed.

use crate::error::MaterializeError;
use crate::store::{Connect, FixtureStore, Reference, UpdateRequest};
use fixture_core::ModelDescriptor;
use fixture_generator::{EntityRecord, FixtureGraph, InternalId};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Metrics from a materialize operation.
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    /// Create calls issued.
    pub created: u64,
    /// Update calls issued.
    pub connected: u64,
    /// Time spent in the create pass.
    pub create_duration: Duration,
    /// Time spent in the connect pass.
    pub connect_duration: Duration,
    /// Total time taken.
    pub total_duration: Duration,
}

impl MaterializeReport {
    /// Store calls per second over both passes.
    pub fn calls_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            (self.created + self.connected) as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Writes a [`FixtureGraph`] into a [`FixtureStore`].
pub struct Materializer<'a, S: FixtureStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: FixtureStore + ?Sized> Materializer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run the create pass, then the connect pass.
    ///
    /// Every update payload is built before the first create, so a model
    /// that cannot be addressed fails without touching the store. Calls are
    /// then awaited one at a time in entity creation order. The first
    /// failing call aborts the run; earlier writes are left in place and the
    /// store is flushed either way.
    pub async fn materialize(
        &self,
        graph: &FixtureGraph,
    ) -> Result<MaterializeReport, MaterializeError> {
        let start_time = Instant::now();
        let mut report = MaterializeReport::default();

        info!("Materializing {} fixture entities", graph.len());

        let updates = plan_updates(graph)?;
        let result = self.run_passes(graph, &updates, &mut report).await;
        let flushed = self.store.flush().await;
        result?;
        flushed?;

        report.total_duration = start_time.elapsed();

        info!(
            "Materialization complete: {} created, {} connected in {:?} ({:.2} calls/sec)",
            report.created,
            report.connected,
            report.total_duration,
            report.calls_per_second()
        );

        Ok(report)
    }

    async fn run_passes(
        &self,
        graph: &FixtureGraph,
        updates: &[PlannedUpdate<'_>],
        report: &mut MaterializeReport,
    ) -> Result<(), MaterializeError> {
        let create_start = Instant::now();
        for entity in graph.entities() {
            let model = model_of(graph, entity)?;
            self.store
                .create(&model.operations().create, &entity.scalars)
                .await?;
            report.created += 1;
            debug!("Created {} {}", entity.model, entity.id);
        }
        report.create_duration = create_start.elapsed();

        let connect_start = Instant::now();
        for update in updates {
            self.store.update(&update.operation, &update.request).await?;
            report.connected += 1;
            debug!(
                "Connected {} {} ({} fields)",
                update.entity.model,
                update.entity.id,
                update.request.data.len()
            );
        }
        report.connect_duration = connect_start.elapsed();

        Ok(())
    }
}

/// One update call of the connect pass.
struct PlannedUpdate<'g> {
    entity: &'g EntityRecord,
    operation: String,
    request: UpdateRequest,
}

/// Update calls for every addressable entity, in creation order.
fn plan_updates(graph: &FixtureGraph) -> Result<Vec<PlannedUpdate<'_>>, MaterializeError> {
    let mut updates = Vec::with_capacity(graph.len());
    for entity in graph.entities() {
        if let Some(request) = connect_request(graph, entity)? {
            updates.push(PlannedUpdate {
                entity,
                operation: model_of(graph, entity)?.operations().update,
                request,
            });
        }
    }
    Ok(updates)
}

fn model_of<'g>(
    graph: &'g FixtureGraph,
    entity: &EntityRecord,
) -> Result<&'g ModelDescriptor, MaterializeError> {
    graph
        .schema()
        .get_model(&entity.model)
        .ok_or_else(|| MaterializeError::MissingIdentifier(entity.model.clone()))
}

/// Reference to an entity through its model's identifier field.
fn reference(graph: &FixtureGraph, entity: &EntityRecord) -> Result<Reference, MaterializeError> {
    let missing = || MaterializeError::MissingIdentifier(entity.model.clone());
    let field = model_of(graph, entity)?
        .identifier_field()
        .ok_or_else(missing)?;
    let value = entity.scalars.get(&field.name).ok_or_else(missing)?;
    Ok(Reference::new(field.name.clone(), value.clone()))
}

fn references(
    graph: &FixtureGraph,
    ids: &[InternalId],
) -> Result<Vec<Reference>, MaterializeError> {
    ids.iter()
        .filter_map(|id| graph.get(*id))
        .map(|related| reference(graph, related))
        .collect()
}

/// Update payload for an entity. Every entity with an identifier gets one,
/// possibly with empty `data`. An entity without an identifier is skipped
/// when it has no relation fields; otherwise it cannot be connected.
fn connect_request(
    graph: &FixtureGraph,
    entity: &EntityRecord,
) -> Result<Option<UpdateRequest>, MaterializeError> {
    let mut data = BTreeMap::new();
    for binding in &entity.relations {
        let mut refs = references(graph, binding.ids().unwrap_or_default())?;
        if binding.list {
            data.insert(binding.field.clone(), Connect::many(refs));
        } else if !refs.is_empty() {
            data.insert(binding.field.clone(), Connect::one(refs.swap_remove(0)));
        }
    }

    let target = match reference(graph, entity) {
        Ok(target) => target,
        Err(MaterializeError::MissingIdentifier(model)) if entity.relations.is_empty() => {
            debug!("Skipping update of {} {}: no identifier", model, entity.id);
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    Ok(Some(UpdateRequest { target, data }))
}
