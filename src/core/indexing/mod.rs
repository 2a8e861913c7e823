pub mod rptree;

pub use rptree::RpTreeIndex;
