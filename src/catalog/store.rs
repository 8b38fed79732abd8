//! Catalog persistence
//!
//! Loads the scheme catalog from MongoDB, seeding the collection from the
//! built-in list on first run. Listing order follows the `order` field so
//! the catalog reads the same across restarts.

use bson::doc;
use tracing::info;

use crate::catalog::{seed::builtin_schemes, SchemeCatalog};
use crate::db::schemas::{SchemeDoc, SCHEME_COLLECTION};
use crate::db::MongoClient;
use crate::types::Result;

/// Load the catalog from MongoDB, seeding it first if the collection is empty
pub async fn load_or_seed(mongo: &MongoClient) -> Result<SchemeCatalog> {
    let collection = mongo.collection::<SchemeDoc>(SCHEME_COLLECTION).await?;

    if collection.count_documents(doc! {}).await? == 0 {
        let seeds = builtin_schemes();
        info!("Seeding scheme collection with {} built-in schemes", seeds.len());

        for (order, record) in seeds.into_iter().enumerate() {
            collection
                .insert_one(SchemeDoc {
                    order: order as i64,
                    record,
                })
                .await?;
        }
    }

    let docs = collection
        .find_sorted(doc! {}, doc! { "order": 1 })
        .await?;

    Ok(SchemeCatalog::new(
        docs.into_iter().map(|d| d.record).collect(),
    ))
}
