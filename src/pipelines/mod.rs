pub use self::mca_pipeline::McaPipeline;

mod mca_pipeline;
