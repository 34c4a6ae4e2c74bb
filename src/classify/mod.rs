// Classification pipeline: keyword expansion, category matching and
// sublayer scoring.
//
//   seeds --expand--> keywords --match--> CTAs --score--> sublayers
//
// Expansion runs once per batch; everything per record reuses its output.

pub mod batch;
pub mod expand;
pub mod matcher;
pub mod sublayers;
pub mod vectorize;
