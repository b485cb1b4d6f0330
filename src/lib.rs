pub mod cli;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod logger;
pub mod model;
pub mod pool;
pub mod queue;
pub mod runner;
pub mod shutdown;
pub mod summary;
pub mod worker;
