//! Threshold-cut agglomerative clustering.
//!
//! The cascade needs one capability here: group a sample of weighted event
//! vectors so that no two members of a group are farther apart than the
//! configured threshold. That capability is the [`Clusterer`] trait; the
//! default backend is [`CompleteLinkage`], built on kodama's agglomerative
//! linkage plus a distance cut of the recorded [`Dendrogram`].

mod complete_linkage;
mod dendrogram;
mod traits;

pub use complete_linkage::CompleteLinkage;
pub use dendrogram::{Dendrogram, Merge};
pub use traits::{ClusterSet, Clusterer};
