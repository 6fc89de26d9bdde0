use rstar::{AABB, Envelope, RTree, RTreeObject};
use tessera_core::Bounds;

/// One entry in the spatial index: a feature id paired with its bounds.
#[derive(Debug, Clone, Copy)]
struct IndexedEnvelope {
	id: u64,
	bounds: [f64; 4],
}

impl RTreeObject for IndexedEnvelope {
	type Envelope = AABB<[f64; 2]>;

	fn envelope(&self) -> Self::Envelope {
		AABB::from_corners([self.bounds[0], self.bounds[1]], [self.bounds[2], self.bounds[3]])
	}
}

fn query_envelope(bounds: &Bounds) -> AABB<[f64; 2]> {
	AABB::from_corners([bounds.left(), bounds.bottom()], [bounds.right(), bounds.top()])
}

/// Backing store for `IndexedFeatures`' bbox lookups. `RTree` is used
/// whenever the `rtree-index` feature is enabled (the default); otherwise a
/// linear scan provides the same `insert`/`intersection` surface.
#[derive(Debug)]
pub(crate) enum SpatialIndex {
	#[cfg(feature = "rtree-index")]
	RTree(RTree<IndexedEnvelope>),
	Linear(Vec<IndexedEnvelope>),
}

impl SpatialIndex {
	pub(crate) fn new() -> Self {
		#[cfg(feature = "rtree-index")]
		{
			SpatialIndex::RTree(RTree::new())
		}
		#[cfg(not(feature = "rtree-index"))]
		{
			SpatialIndex::Linear(Vec::new())
		}
	}

	pub(crate) fn bulk_load(entries: Vec<(u64, [f64; 4])>) -> Self {
		let entries: Vec<IndexedEnvelope> = entries.into_iter().map(|(id, bounds)| IndexedEnvelope { id, bounds }).collect();
		#[cfg(feature = "rtree-index")]
		{
			SpatialIndex::RTree(RTree::bulk_load(entries))
		}
		#[cfg(not(feature = "rtree-index"))]
		{
			SpatialIndex::Linear(entries)
		}
	}

	pub(crate) fn insert(&mut self, id: u64, bounds: [f64; 4]) {
		let entry = IndexedEnvelope { id, bounds };
		match self {
			#[cfg(feature = "rtree-index")]
			SpatialIndex::RTree(tree) => tree.insert(entry),
			SpatialIndex::Linear(items) => items.push(entry),
		}
	}

	pub(crate) fn intersection(&self, bounds: &Bounds) -> Vec<u64> {
		let query = query_envelope(bounds);
		match self {
			#[cfg(feature = "rtree-index")]
			SpatialIndex::RTree(tree) => tree
				.locate_in_envelope_intersecting(&query)
				.map(|entry| entry.id)
				.collect(),
			SpatialIndex::Linear(items) => items
				.iter()
				.filter(|entry| entry.envelope().intersects(&query))
				.map(|entry| entry.id)
				.collect(),
		}
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		match self {
			#[cfg(feature = "rtree-index")]
			SpatialIndex::RTree(tree) => tree.size(),
			SpatialIndex::Linear(items) => items.len(),
		}
	}
}
