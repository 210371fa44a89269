pub mod cleaner;
pub mod logging;
