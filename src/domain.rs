/// The geometric and topological structure of a finite volume domain
pub mod mesh;
