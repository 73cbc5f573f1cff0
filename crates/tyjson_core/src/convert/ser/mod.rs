// -----------------------------------------------------------------------------
// Modules

mod driver;

mod array_serializer;
mod map_serializer;
mod object_serializer;
mod set_serializer;

// -----------------------------------------------------------------------------
// Exports

pub use driver::Serializer;

#[cfg(test)]
mod tests;
