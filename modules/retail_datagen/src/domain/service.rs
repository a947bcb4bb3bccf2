//! Pipeline orchestration
//!
//! Clears every target collection, then runs the stages strictly in
//! dependency order: stores, categories, products, customers, inventory,
//! orders. The first error aborts the run; nothing is retried or resumed, a
//! rerun starts again from the clear step.

use super::batch::{BatchLoader, PairedBatchLoader};
use super::context::GenerationContext;
use super::generators::{
    generate_categories, generate_products, generate_stores, CustomerGenerator,
    InventoryGenerator, OrderGenerator,
};
use super::repository::DocumentSink;
use super::source::SourceCatalogs;
use crate::config::GenerationSettings;
use crate::contract::{Collection, DatagenError, Document, Stage};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Where each collection is written.
///
/// Embeddings go to their own sink so they can be kept out of replicated
/// storage; every other collection goes to the operational sink.
#[derive(Clone)]
pub struct Sinks {
    pub operational: Arc<dyn DocumentSink>,
    pub embeddings: Arc<dyn DocumentSink>,
}

impl Sinks {
    /// Route every collection, embeddings included, to one sink
    pub fn single(sink: Arc<dyn DocumentSink>) -> Self {
        Self {
            operational: sink.clone(),
            embeddings: sink,
        }
    }

    pub fn for_collection(&self, collection: Collection) -> &dyn DocumentSink {
        if collection.is_replicated() {
            self.operational.as_ref()
        } else {
            self.embeddings.as_ref()
        }
    }
}

/// Documents written per collection during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: IndexMap<Collection, usize>,
}

impl RunSummary {
    pub fn get(&self, collection: Collection) -> usize {
        self.written.get(&collection).copied().unwrap_or(0)
    }

    fn record(&mut self, collection: Collection, count: usize) {
        self.written.insert(collection, count);
    }
}

/// Runs the whole generation pipeline against a set of sinks
pub struct Pipeline {
    sinks: Sinks,
    settings: GenerationSettings,
    rng: StdRng,
}

impl Pipeline {
    /// Seeds the random source from `settings.seed`, or from the OS when unset
    pub fn new(sinks: Sinks, settings: GenerationSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(sinks, settings, rng)
    }

    /// Use an explicit random source
    pub fn with_rng(sinks: Sinks, settings: GenerationSettings, rng: StdRng) -> Self {
        Self {
            sinks,
            settings,
            rng,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Clear, then generate and load every collection
    pub async fn run(&mut self, sources: &SourceCatalogs) -> Result<RunSummary, DatagenError> {
        let now = Utc::now();
        let mut ctx = GenerationContext::new();
        let mut summary = RunSummary::default();

        tracing::info!(
            customers = self.settings.num_customers,
            orders = self.settings.num_orders,
            start = %self.settings.start_date,
            end = %self.settings.end_date,
            seeded = self.settings.seed.is_some(),
            "Starting retail data generation"
        );

        self.clear_collections().await?;
        self.load_stores(sources, &mut ctx, &mut summary).await?;
        self.load_categories(sources, &mut ctx, &mut summary).await?;
        self.load_products(sources, &mut ctx, now, &mut summary).await?;
        self.load_customers(&mut ctx, now, &mut summary).await?;
        self.load_inventory(&ctx, now, &mut summary).await?;
        self.load_orders(&ctx, &mut summary).await?;

        tracing::info!(
            stores = summary.get(Collection::Stores),
            categories = summary.get(Collection::Categories),
            products = summary.get(Collection::Products),
            embeddings = summary.get(Collection::ProductEmbeddings),
            customers = summary.get(Collection::Customers),
            inventory = summary.get(Collection::Inventory),
            orders = summary.get(Collection::Orders),
            order_items = summary.get(Collection::OrderItems),
            "All data generated successfully"
        );
        Ok(summary)
    }

    /// Current document count of every collection, as reported by the sinks
    pub async fn collection_counts(&self) -> Result<IndexMap<Collection, u64>, DatagenError> {
        let mut counts = IndexMap::new();
        for collection in Collection::ALL {
            let count = self
                .sinks
                .for_collection(collection)
                .count(collection)
                .await
                .map_err(|e| sink_error(Stage::Summary, collection, e))?;
            counts.insert(collection, count);
        }
        Ok(counts)
    }

    async fn clear_collections(&self) -> Result<(), DatagenError> {
        tracing::info!("Clearing existing collections");
        for collection in Collection::ALL {
            self.sinks
                .for_collection(collection)
                .clear(collection)
                .await
                .map_err(|e| sink_error(Stage::Clear, collection, e))?;
            tracing::debug!(collection = %collection, "Cleared");
        }
        Ok(())
    }

    async fn load_stores(
        &self,
        sources: &SourceCatalogs,
        ctx: &mut GenerationContext,
        summary: &mut RunSummary,
    ) -> Result<(), DatagenError> {
        let stores = generate_stores(&sources.reference, ctx)?;
        ctx.set_year_weights(year_weights(sources));

        let mut loader = self.loader(Collection::Stores, Stage::Stores);
        for store in &stores {
            loader.add(Document::from(store)).await?;
        }
        let written = loader.finish().await?;

        tracing::info!(count = written, "Inserted stores");
        summary.record(Collection::Stores, written);
        Ok(())
    }

    async fn load_categories(
        &self,
        sources: &SourceCatalogs,
        ctx: &mut GenerationContext,
        summary: &mut RunSummary,
    ) -> Result<(), DatagenError> {
        let categories = generate_categories(&sources.products, ctx)?;

        let mut loader = self.loader(Collection::Categories, Stage::Categories);
        for category in &categories {
            loader.add(Document::from(category)).await?;
        }
        let written = loader.finish().await?;

        tracing::info!(count = written, "Inserted categories");
        summary.record(Collection::Categories, written);
        Ok(())
    }

    async fn load_products(
        &self,
        sources: &SourceCatalogs,
        ctx: &mut GenerationContext,
        now: DateTime<Utc>,
        summary: &mut RunSummary,
    ) -> Result<(), DatagenError> {
        let generated = generate_products(&sources.products, ctx, now)?;

        let mut products = self.loader(Collection::Products, Stage::Products);
        for product in &generated.products {
            products.add(Document::from(product)).await?;
        }
        let written = products.finish().await?;

        let mut embeddings = self.loader(Collection::ProductEmbeddings, Stage::Products);
        for embedding in &generated.embeddings {
            embeddings.add(Document::from(embedding)).await?;
        }
        let embedded = embeddings.finish().await?;

        tracing::info!(products = written, embeddings = embedded, "Inserted products");
        summary.record(Collection::Products, written);
        summary.record(Collection::ProductEmbeddings, embedded);
        Ok(())
    }

    async fn load_customers(
        &mut self,
        ctx: &mut GenerationContext,
        now: DateTime<Utc>,
        summary: &mut RunSummary,
    ) -> Result<(), DatagenError> {
        let generator = CustomerGenerator::new(ctx, self.settings.num_customers, now)?;
        tracing::info!(count = generator.count(), "Generating customers");

        let sink = self.sinks.for_collection(Collection::Customers);
        let mut loader = BatchLoader::new(sink, Collection::Customers, Stage::Customers);
        for seq in 1..=generator.count() {
            let customer = generator.generate(seq, &mut self.rng);
            loader.add(Document::from(&customer)).await?;
        }
        let written = loader.finish().await?;

        ctx.set_customers(generator.count(), generator.width());

        tracing::info!(count = written, "Inserted customers");
        summary.record(Collection::Customers, written);
        Ok(())
    }

    async fn load_inventory(
        &mut self,
        ctx: &GenerationContext,
        now: DateTime<Utc>,
        summary: &mut RunSummary,
    ) -> Result<(), DatagenError> {
        let generator = InventoryGenerator::new(ctx, now)?;

        let sink = self.sinks.for_collection(Collection::Inventory);
        let mut loader = BatchLoader::new(sink, Collection::Inventory, Stage::Inventory);
        for store in ctx.stores() {
            let assortment = generator.assortment(store, &mut self.rng);
            if assortment.len() < ctx.product_count() {
                tracing::info!(
                    store = %store.store_id,
                    sampled = assortment.len(),
                    catalog = ctx.product_count(),
                    "Sampled online assortment"
                );
            } else {
                tracing::debug!(
                    store = %store.store_id,
                    products = assortment.len(),
                    "Stocking store"
                );
            }
            for product_id in assortment {
                let record = generator.record(&store.store_id, product_id, &mut self.rng);
                loader.add(Document::from(&record)).await?;
            }
        }
        let written = loader.finish().await?;

        tracing::info!(count = written, "Inserted inventory records");
        summary.record(Collection::Inventory, written);
        Ok(())
    }

    async fn load_orders(
        &mut self,
        ctx: &GenerationContext,
        summary: &mut RunSummary,
    ) -> Result<(), DatagenError> {
        let generator = OrderGenerator::new(
            ctx,
            self.settings.num_orders,
            self.settings.start_date,
            self.settings.end_date,
        )?;
        tracing::info!(count = generator.count(), "Generating orders");

        let mut loader = PairedBatchLoader::new(self.sinks.operational.as_ref(), Stage::Orders);
        for seq in 1..=generator.count() {
            let (order, items) = generator.generate(seq, &mut self.rng)?;
            loader
                .add(
                    Document::from(&order),
                    items.iter().map(Document::from).collect(),
                )
                .await?;
        }
        let (orders, items) = loader.finish().await?;

        tracing::info!(orders, items, "Inserted orders with items");
        summary.record(Collection::Orders, orders);
        summary.record(Collection::OrderItems, items);
        Ok(())
    }

    fn loader(&self, collection: Collection, stage: Stage) -> BatchLoader<'_> {
        BatchLoader::new(self.sinks.for_collection(collection), collection, stage)
    }
}

fn year_weights(sources: &SourceCatalogs) -> IndexMap<i32, f64> {
    sources
        .reference
        .year_weights
        .iter()
        .filter_map(|(year, weight)| year.parse().ok().map(|y| (y, *weight)))
        .collect()
}

fn sink_error(stage: Stage, collection: Collection, err: anyhow::Error) -> DatagenError {
    DatagenError::Sink {
        stage,
        collection: collection.to_string(),
        record_index: 0,
        reason: format!("{:#}", err),
    }
}
