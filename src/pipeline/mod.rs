pub mod corpus;
pub mod encode;
pub mod filter;
pub mod normalize;
pub mod sequences;
