use crate::collection::{FindSpec, PaginatedRead};
use crate::error::{PaginateError, PaginateResult};
use crate::page::Records;
use async_trait::async_trait;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use serde::de::DeserializeOwned;

#[async_trait]
impl<T> PaginatedRead for Collection<T>
where
    T: DeserializeOwned + Send + Sync,
{
    type Record = T;

    async fn count_matching(&self, filter: &Document) -> PaginateResult<u64> {
        let total = self.count_documents(filter.clone()).await?;
        Ok(total)
    }

    async fn find_page(
        &self,
        filter: &Document,
        spec: &FindSpec,
    ) -> PaginateResult<Records<T>> {
        if spec.populate.is_empty() {
            find_plain(self, filter, spec).await
        } else {
            find_with_lookups(self, filter, spec).await
        }
    }
}

async fn find_plain<T>(
    collection: &Collection<T>,
    filter: &Document,
    spec: &FindSpec,
) -> PaginateResult<Records<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let options = find_options(spec)?;

    if spec.lean {
        let docs: Vec<Document> = collection
            .clone_with_type::<Document>()
            .find(filter.clone())
            .with_options(options)
            .await?
            .try_collect()
            .await?;
        Ok(Records::Lean(docs))
    } else {
        let models: Vec<T> = collection
            .find(filter.clone())
            .with_options(options)
            .await?
            .try_collect()
            .await?;
        Ok(Records::Models(models))
    }
}

/// Relation expansion against a raw document store is expressed as an
/// aggregation with one `$lookup` per populate spec.
async fn find_with_lookups<T>(
    collection: &Collection<T>,
    filter: &Document,
    spec: &FindSpec,
) -> PaginateResult<Records<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let pipeline = lookup_pipeline(filter, spec)?;
    let docs: Vec<Document> = collection.aggregate(pipeline).await?.try_collect().await?;

    if spec.lean {
        return Ok(Records::Lean(docs));
    }

    // The aggregation cursor yields raw documents; hydrate them here. The
    // model type must accommodate the expanded populate fields.
    let models = docs
        .into_iter()
        .map(bson::from_document::<T>)
        .collect::<Result<Vec<T>, _>>()?;
    Ok(Records::Models(models))
}

fn find_options(spec: &FindSpec) -> PaginateResult<FindOptions> {
    let mut options = FindOptions::builder()
        .skip(unsigned_skip(spec)?)
        .limit(spec.limit)
        .build();
    options.projection = spec.projection.clone();
    options.sort = spec.sort.clone();
    Ok(options)
}

fn lookup_pipeline(filter: &Document, spec: &FindSpec) -> PaginateResult<Vec<Document>> {
    let skip = unsigned_skip(spec)?;

    let mut pipeline = vec![doc! { "$match": filter.clone() }];
    if let Some(sort) = &spec.sort {
        pipeline.push(doc! { "$sort": sort.clone() });
    }
    pipeline.push(doc! { "$skip": skip as i64 });
    pipeline.push(doc! { "$limit": spec.limit });

    for populate in &spec.populate {
        pipeline.push(doc! {
            "$lookup": {
                "from": populate.from.as_str(),
                "localField": populate.path.as_str(),
                "foreignField": populate.foreign_field.as_str(),
                "as": populate.path.as_str(),
            }
        });
    }

    // Projection runs last so it can address looked-up fields too.
    if let Some(projection) = &spec.projection {
        pipeline.push(doc! { "$project": projection.clone() });
    }

    Ok(pipeline)
}

/// The driver takes an unsigned skip; a skip that resolved below zero is
/// rejected here, at the store boundary, as a per-call query failure.
fn unsigned_skip(spec: &FindSpec) -> PaginateResult<u64> {
    u64::try_from(spec.skip).map_err(|_| PaginateError::NegativeSkip(spec.skip))
}
