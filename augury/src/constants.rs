/// Inputs longer than this get a literal anchor before fuzzy search begins.
pub(crate) const ANCHOR_MIN_INPUT: usize = 5;

/// Jaro score required before the Winkler prefix boost applies.
pub(crate) const BOOST_THRESHOLD: f64 = 0.7;

/// Score a candidate must be able to reach to survive the pruning table.
pub(crate) const PRUNE_THRESHOLD: f64 = 0.75;

/// Longest word the bounded metric scores; anything longer gets 0.0.
pub(crate) const MAX_BOUNDED_LEN: usize = 30;

/// Lengths covered by the pruning table.
pub(crate) const PRUNING_TABLE_SIZE: usize = 35;

/// Upper bound on the Winkler prefix scaling factor.
pub(crate) const MAX_PREFIX_SCALE: f64 = 0.1;

/// Byte tag written before each lookup component of a predictor snapshot.
pub(crate) const LOOKUP_TAG_DAWG: u8 = 0;
pub(crate) const LOOKUP_TAG_SYMMETRIC: u8 = 1;

/// Byte tag written before the language model of a predictor snapshot.
pub(crate) const MODEL_TAG_KNESER_NEY: u8 = 0;
