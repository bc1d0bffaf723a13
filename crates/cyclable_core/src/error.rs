use thiserror::Error;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Itinerary {from} -> {to} failed: {source}")]
    Fetch {
        from: String,
        to: String,
        #[source]
        source: BoxedError,
    },
}
