// -----------------------------------------------------------------------------
// Modules

mod driver;

mod array_deserializer;
mod map_deserializer;
mod object_deserializer;
mod set_deserializer;

// -----------------------------------------------------------------------------
// Exports

pub use driver::Deserializer;

#[cfg(test)]
mod tests;
