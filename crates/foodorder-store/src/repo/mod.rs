pub mod batches;

pub use batches::BatchesRepo;
