/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded migration runner
///
/// Queries themselves live next to their models in the `models` module.

pub mod migrations;
pub mod pool;
