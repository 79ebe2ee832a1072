/// Grid synthesis over all blocks of an image
pub mod executor;
/// Shape selection strategies
pub mod shapes;
/// Bounded quadrant color reduction
pub mod simplifier;
