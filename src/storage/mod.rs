mod transcript;
mod util;

pub use transcript::{JsonFileSink, MemorySink, SinkFuture, Transcript, TranscriptSink};
